//! Core types for the Stroma tumour-growth simulator.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! fundamental vocabulary used throughout the Stroma workspace: the cell
//! state machine's states and the growth parameter set.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod params;
pub mod state;

pub use params::GrowthParams;
pub use state::CellState;
