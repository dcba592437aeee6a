//! Lattice state store for Stroma simulations.
//!
//! This crate owns the shared per-cell arrays the update rule operates on
//! (state, proliferation signal, division budget, generation parity) and the
//! active-region bookkeeping ([`BoundingBox`]).
//!
//! # Memory model
//!
//! The [`Lattice`] is shared by reference across all worker threads of a
//! run. Every per-cell access uses `Relaxed` atomic ordering: the engine's
//! barrier rendezvous (and the final thread join) is the sole required
//! happens-before edge between generations, and within a generation the
//! partition + boundary-stripe-lock discipline keeps writers apart. The
//! atomics exist to make the sharing expressible in safe Rust — at
//! `Relaxed` they compile to plain loads and stores, so no per-cell
//! ordering is paid for or relied upon.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod bounds;
pub mod error;
pub mod lattice;

pub use bounds::BoundingBox;
pub use error::LatticeError;
pub use lattice::{Lattice, NEIGHBOURHOOD};
