//! Parallel simulation engine for the Stroma tumour-growth automaton.
//!
//! The engine advances a stochastic cellular automaton in lockstep
//! generations: cells survive, die, proliferate, or migrate on the shared
//! [`stroma_lattice::Lattice`], and work is bounded to the dynamically
//! tracked active region. With more than one worker the active region is
//! partitioned into contiguous row bands, one OS thread per band, with
//! striped boundary locks where bands meet and a reusable [`Rendezvous`]
//! barrier between generations.
//!
//! # Concurrency contract
//!
//! - Every write made during generation *k* is visible to every worker
//!   before any worker begins generation *k + 1*; the barrier rendezvous
//!   (and the final join) is the sole required fence.
//! - [`TumourAutomaton::execute`] runs the requested generation count to
//!   completion and joins all workers before returning; there is no
//!   mid-run cancellation.
//! - Callers must serialize `execute` calls and must not mutate parameters
//!   while a run is in flight. This is a documented precondition, not a
//!   runtime-checked error.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod automaton;
pub mod barrier;
pub mod partition;

mod rule;
mod worker;

pub use automaton::TumourAutomaton;
pub use barrier::Rendezvous;
pub use partition::worker_rows;
