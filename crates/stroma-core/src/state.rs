//! Cell states and their stable wire representation.

/// The state of a single lattice cell.
///
/// `Dead` is absorbing — a dead cell is never reconsidered for update.
/// [`New`](CellState::New) and [`Migrated`](CellState::Migrated) are
/// provenance tags: equivalent to [`Alive`](CellState::Alive) for all
/// subsequent processing, they only let external code tell the current
/// generation's newly created cells apart from relocated ones.
///
/// The discriminants are the stable `u8` values used for atomic per-cell
/// storage in the lattice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CellState {
    /// Vacant tissue. The only state the update rule counts as free space.
    #[default]
    Dead = 0,
    /// Alive but blocked: no free neighbour to proliferate or migrate into.
    Dormant = 1,
    /// Actively simulated tumour cell.
    Alive = 2,
    /// Created by proliferation this generation.
    New = 3,
    /// Relocated by migration this generation.
    Migrated = 4,
}

impl CellState {
    /// The stable `u8` value stored in the lattice for this state.
    pub const fn as_raw(self) -> u8 {
        self as u8
    }

    /// Decode a raw lattice value. Returns `None` for values outside `0..=4`.
    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Dead),
            1 => Some(Self::Dormant),
            2 => Some(Self::Alive),
            3 => Some(Self::New),
            4 => Some(Self::Migrated),
            _ => None,
        }
    }

    /// Whether this cell occupies tissue (any non-`Dead` state).
    pub const fn is_occupied(self) -> bool {
        !matches!(self, Self::Dead)
    }

    /// Display glyph for textual rendering:
    /// `Dead` → `' '`, `Dormant` → `'.'`, `Alive` → `'o'`, `New` → `'O'`,
    /// `Migrated` → `'M'`.
    pub const fn glyph(self) -> char {
        match self {
            Self::Dead => ' ',
            Self::Dormant => '.',
            Self::Alive => 'o',
            Self::New => 'O',
            Self::Migrated => 'M',
        }
    }
}
