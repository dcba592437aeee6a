//! Benchmark support for the Stroma workspace.
//!
//! The benchmarks themselves live under `benches/`; this library hosts the
//! shared fixture helpers they use.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

use stroma_core::CellState;
use stroma_engine::TumourAutomaton;

/// Build an automaton with the standard measurement configuration:
/// immortal cells (`ps = 1`), the default proliferation/migration mix, and
/// a single `Alive` cell seeded at the centre.
pub fn seeded_colony(size: u32, workers: usize) -> TumourAutomaton {
    let mut tumour = TumourAutomaton::new(size).expect("benchmark lattice size is valid");
    tumour.params.ps = 1.0;
    tumour.set_workers(workers);
    let centre = (size / 2) as i32;
    tumour.seed(centre, centre, CellState::Alive);
    tumour
}
