//! Stroma: a stochastic tumour-growth cellular automaton with a parallel
//! lockstep engine.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the Stroma sub-crates. For most users, adding `stroma` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use stroma::prelude::*;
//!
//! // A 51×51 lattice with immortal, eagerly dividing cells.
//! let mut tumour = TumourAutomaton::new(51).unwrap();
//! tumour.params.ps = 1.0;
//! tumour.params.pp = 1.0;
//! tumour.params.np = 1;
//! tumour.params.rho = 10;
//!
//! // Seed the centre and grow for ten generations on two workers.
//! tumour.seed(25, 25, CellState::Alive);
//! tumour.set_workers(2);
//! tumour.execute(10);
//!
//! assert!(tumour.occupied_cells() > 1);
//! // Queries outside the lattice return the Alive sentinel.
//! assert_eq!(tumour.cell(-1, 0), CellState::Alive);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the
//! prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `stroma-core` | Cell states and growth parameters |
//! | [`lattice`] | `stroma-lattice` | Shared per-cell store and bounding boxes |
//! | [`engine`] | `stroma-engine` | The automaton, barrier, and partitioner |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Cell states and growth parameters (`stroma-core`).
pub use stroma_core as types;

/// Shared lattice store, neighbourhood offsets, and bounding boxes
/// (`stroma-lattice`).
pub use stroma_lattice as lattice;

/// The simulation engine: automaton coordinator, rendezvous barrier, and
/// domain partitioner (`stroma-engine`).
pub use stroma_engine as engine;

/// The most commonly used types, re-exported in one place.
pub mod prelude {
    pub use stroma_core::{CellState, GrowthParams};
    pub use stroma_engine::{Rendezvous, TumourAutomaton};
    pub use stroma_lattice::{BoundingBox, Lattice, LatticeError, NEIGHBOURHOOD};
}
