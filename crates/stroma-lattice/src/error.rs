//! Error types for lattice construction.

use std::fmt;

/// Errors arising from lattice construction.
///
/// Everything past construction is policy, not error: out-of-range reads
/// return the `Alive` sentinel and out-of-range writes are silent no-ops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LatticeError {
    /// Attempted to construct a lattice with zero cells.
    EmptyLattice,
    /// A lattice dimension exceeds the coordinate range.
    DimensionTooLarge {
        /// The requested dimension.
        value: u32,
        /// The maximum supported dimension.
        max: u32,
    },
}

impl fmt::Display for LatticeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyLattice => write!(f, "lattice must have at least one cell"),
            Self::DimensionTooLarge { value, max } => {
                write!(f, "lattice dimension {value} exceeds maximum {max}")
            }
        }
    }
}

impl std::error::Error for LatticeError {}
