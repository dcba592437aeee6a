//! The shared per-cell state store.

use std::sync::atomic::{AtomicU32, AtomicU8, Ordering::Relaxed};

use smallvec::SmallVec;
use stroma_core::CellState;

use crate::error::LatticeError;

/// The fixed 8-neighbourhood offsets in stable row-major scan order.
///
/// The update rule's free-mask, cumulative neighbour selection, and
/// dormant-awakening all iterate these offsets in exactly this order, so
/// the order is part of the rule's observable behaviour (ties in neighbour
/// selection break toward earlier offsets).
pub const NEIGHBOURHOOD: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// An N×N per-cell state store.
///
/// Four parallel arrays — state, proliferation signal, division budget, and
/// generation parity — each held in a single contiguous row-major buffer
/// and bounds-checked at this access layer. All methods take `&self`; see
/// the crate docs for the `Relaxed`-everywhere memory model.
///
/// # Boundary policy
///
/// [`state`](Lattice::state) returns the sentinel [`CellState::Alive`] for
/// out-of-bounds coordinates: the update rule then never treats the grid
/// edge as free space, so nothing ever proliferates or migrates off-grid.
/// All writes are silent no-ops out of bounds.
pub struct Lattice {
    size: i32,
    state: Box<[AtomicU8]>,
    signal: Box<[AtomicU32]>,
    budget: Box<[AtomicU32]>,
    parity: Box<[AtomicU8]>,
}

impl Lattice {
    /// Maximum cells per axis: coordinates are `i32`.
    pub const MAX_DIM: u32 = i32::MAX as u32;

    /// Allocate a zero-initialized `size`×`size` lattice.
    ///
    /// Returns [`LatticeError::EmptyLattice`] for `size == 0` and
    /// [`LatticeError::DimensionTooLarge`] when `size` exceeds
    /// [`MAX_DIM`](Self::MAX_DIM).
    pub fn new(size: u32) -> Result<Self, LatticeError> {
        if size == 0 {
            return Err(LatticeError::EmptyLattice);
        }
        if size > Self::MAX_DIM {
            return Err(LatticeError::DimensionTooLarge {
                value: size,
                max: Self::MAX_DIM,
            });
        }
        let cells = (size as usize) * (size as usize);
        Ok(Self {
            size: size as i32,
            state: std::iter::repeat_with(|| AtomicU8::new(0)).take(cells).collect(),
            signal: std::iter::repeat_with(|| AtomicU32::new(0)).take(cells).collect(),
            budget: std::iter::repeat_with(|| AtomicU32::new(0)).take(cells).collect(),
            parity: std::iter::repeat_with(|| AtomicU8::new(0)).take(cells).collect(),
        })
    }

    /// Cells per axis.
    pub fn size(&self) -> i32 {
        self.size
    }

    /// Whether `(x, y)` lies within `[0, size)` on both axes.
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        0 <= x && x < self.size && 0 <= y && y < self.size
    }

    /// Row-major flat index. Caller guarantees `(x, y)` is in bounds.
    fn index(&self, x: i32, y: i32) -> usize {
        (x as usize) * (self.size as usize) + (y as usize)
    }

    /// The state of `(x, y)`, or the [`CellState::Alive`] sentinel out of
    /// bounds.
    pub fn state(&self, x: i32, y: i32) -> CellState {
        if !self.in_bounds(x, y) {
            return CellState::Alive;
        }
        let raw = self.state[self.index(x, y)].load(Relaxed);
        // The store only ever contains values written through `set_state`.
        CellState::from_raw(raw).unwrap_or(CellState::Dead)
    }

    /// Set the state of `(x, y)`. No-op out of bounds.
    pub fn set_state(&self, x: i32, y: i32, state: CellState) {
        if self.in_bounds(x, y) {
            self.state[self.index(x, y)].store(state.as_raw(), Relaxed);
        }
    }

    /// The proliferation signal of `(x, y)`, or 0 out of bounds.
    pub fn signal(&self, x: i32, y: i32) -> u32 {
        if self.in_bounds(x, y) {
            self.signal[self.index(x, y)].load(Relaxed)
        } else {
            0
        }
    }

    /// Set the proliferation signal of `(x, y)`. No-op out of bounds.
    pub fn set_signal(&self, x: i32, y: i32, value: u32) {
        if self.in_bounds(x, y) {
            self.signal[self.index(x, y)].store(value, Relaxed);
        }
    }

    /// Increment the proliferation signal of `(x, y)` and return the new
    /// value. Returns 0 (without effect) out of bounds.
    pub fn bump_signal(&self, x: i32, y: i32) -> u32 {
        if self.in_bounds(x, y) {
            self.signal[self.index(x, y)].fetch_add(1, Relaxed) + 1
        } else {
            0
        }
    }

    /// The division budget of `(x, y)`, or 0 out of bounds.
    pub fn budget(&self, x: i32, y: i32) -> u32 {
        if self.in_bounds(x, y) {
            self.budget[self.index(x, y)].load(Relaxed)
        } else {
            0
        }
    }

    /// Set the division budget of `(x, y)`. No-op out of bounds.
    pub fn set_budget(&self, x: i32, y: i32, value: u32) {
        if self.in_bounds(x, y) {
            self.budget[self.index(x, y)].store(value, Relaxed);
        }
    }

    /// Spend one division from `(x, y)`'s budget, saturating at zero, and
    /// return the remaining budget. A return of 0 means the budget is
    /// exhausted and the cell must die.
    pub fn spend_division(&self, x: i32, y: i32) -> u32 {
        if !self.in_bounds(x, y) {
            return 0;
        }
        let cell = &self.budget[self.index(x, y)];
        match cell.fetch_update(Relaxed, Relaxed, |v| Some(v.saturating_sub(1))) {
            Ok(prev) => prev.saturating_sub(1),
            // fetch_update with a total closure cannot fail.
            Err(prev) => prev.saturating_sub(1),
        }
    }

    /// The generation parity of `(x, y)`, or 0 out of bounds.
    pub fn parity(&self, x: i32, y: i32) -> u8 {
        if self.in_bounds(x, y) {
            self.parity[self.index(x, y)].load(Relaxed)
        } else {
            0
        }
    }

    /// Set the generation parity of `(x, y)`. No-op out of bounds.
    pub fn set_parity(&self, x: i32, y: i32, parity: u8) {
        if self.in_bounds(x, y) {
            self.parity[self.index(x, y)].store(parity, Relaxed);
        }
    }

    /// In-bounds 8-neighbours of `(x, y)` in scan order.
    pub fn neighbours(&self, x: i32, y: i32) -> SmallVec<[(i32, i32); 8]> {
        let mut out = SmallVec::new();
        for (dx, dy) in NEIGHBOURHOOD {
            let (nx, ny) = (x + dx, y + dy);
            if self.in_bounds(nx, ny) {
                out.push((nx, ny));
            }
        }
        out
    }

    /// Zero every per-cell array (all cells `Dead`, counters and parity 0).
    pub fn clear(&self) {
        for i in 0..self.state.len() {
            self.state[i].store(0, Relaxed);
            self.signal[i].store(0, Relaxed);
            self.budget[i].store(0, Relaxed);
            self.parity[i].store(0, Relaxed);
        }
    }

    /// Count of occupied (non-`Dead`) cells over the whole lattice.
    ///
    /// O(N²) — an observation helper for drivers and tests, not part of
    /// any per-generation path.
    pub fn occupied_cells(&self) -> usize {
        self.state
            .iter()
            .filter(|s| s.load(Relaxed) != CellState::Dead.as_raw())
            .count()
    }
}

impl std::fmt::Debug for Lattice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lattice")
            .field("size", &self.size)
            .field("occupied", &self.occupied_cells())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn new_zero_size_is_rejected() {
        assert!(matches!(Lattice::new(0), Err(LatticeError::EmptyLattice)));
    }

    #[test]
    fn new_oversize_is_rejected() {
        let big = Lattice::MAX_DIM + 1;
        assert!(matches!(
            Lattice::new(big),
            Err(LatticeError::DimensionTooLarge { .. })
        ));
    }

    #[test]
    fn fresh_lattice_is_dead_everywhere() {
        let lat = Lattice::new(8).unwrap();
        for x in 0..8 {
            for y in 0..8 {
                assert_eq!(lat.state(x, y), CellState::Dead);
                assert_eq!(lat.signal(x, y), 0);
                assert_eq!(lat.budget(x, y), 0);
                assert_eq!(lat.parity(x, y), 0);
            }
        }
        assert_eq!(lat.occupied_cells(), 0);
    }

    #[test]
    fn out_of_bounds_reads_return_alive_sentinel() {
        let lat = Lattice::new(4).unwrap();
        assert_eq!(lat.state(-1, 0), CellState::Alive);
        assert_eq!(lat.state(0, -1), CellState::Alive);
        assert_eq!(lat.state(4, 0), CellState::Alive);
        assert_eq!(lat.state(0, 4), CellState::Alive);
    }

    #[test]
    fn out_of_bounds_writes_are_noops() {
        let lat = Lattice::new(4).unwrap();
        lat.set_state(-1, 2, CellState::Alive);
        lat.set_state(4, 2, CellState::Alive);
        lat.set_signal(2, -1, 9);
        lat.set_budget(2, 4, 9);
        assert_eq!(lat.occupied_cells(), 0);
        for x in 0..4 {
            for y in 0..4 {
                assert_eq!(lat.signal(x, y), 0);
                assert_eq!(lat.budget(x, y), 0);
            }
        }
    }

    #[test]
    fn state_roundtrip() {
        let lat = Lattice::new(4).unwrap();
        lat.set_state(1, 2, CellState::Migrated);
        assert_eq!(lat.state(1, 2), CellState::Migrated);
        assert_eq!(lat.occupied_cells(), 1);
    }

    #[test]
    fn bump_signal_counts_up() {
        let lat = Lattice::new(4).unwrap();
        assert_eq!(lat.bump_signal(0, 0), 1);
        assert_eq!(lat.bump_signal(0, 0), 2);
        assert_eq!(lat.signal(0, 0), 2);
        // Out of bounds: no effect, returns 0.
        assert_eq!(lat.bump_signal(-1, 0), 0);
    }

    #[test]
    fn spend_division_saturates_at_zero() {
        let lat = Lattice::new(4).unwrap();
        lat.set_budget(0, 0, 2);
        assert_eq!(lat.spend_division(0, 0), 1);
        assert_eq!(lat.spend_division(0, 0), 0);
        // Saturates: budget never wraps below zero.
        assert_eq!(lat.spend_division(0, 0), 0);
        assert_eq!(lat.budget(0, 0), 0);
    }

    #[test]
    fn neighbours_interior_and_corner() {
        let lat = Lattice::new(5).unwrap();
        assert_eq!(lat.neighbours(2, 2).len(), 8);
        let corner = lat.neighbours(0, 0);
        assert_eq!(corner.len(), 3);
        assert!(corner.contains(&(0, 1)));
        assert!(corner.contains(&(1, 0)));
        assert!(corner.contains(&(1, 1)));
    }

    #[test]
    fn neighbours_preserve_scan_order() {
        let lat = Lattice::new(5).unwrap();
        let n = lat.neighbours(2, 2);
        let expected: Vec<_> = NEIGHBOURHOOD.iter().map(|&(dx, dy)| (2 + dx, 2 + dy)).collect();
        assert_eq!(n.as_slice(), expected.as_slice());
    }

    #[test]
    fn clear_zeroes_everything() {
        let lat = Lattice::new(4).unwrap();
        lat.set_state(1, 1, CellState::Alive);
        lat.set_signal(1, 1, 3);
        lat.set_budget(1, 1, 2);
        lat.set_parity(1, 1, 1);
        lat.clear();
        assert_eq!(lat.state(1, 1), CellState::Dead);
        assert_eq!(lat.signal(1, 1), 0);
        assert_eq!(lat.budget(1, 1), 0);
        assert_eq!(lat.parity(1, 1), 0);
    }

    proptest! {
        #[test]
        fn in_bounds_matches_contract(x in -10i32..20, y in -10i32..20) {
            let lat = Lattice::new(10).unwrap();
            let expected = (0..10).contains(&x) && (0..10).contains(&y);
            prop_assert_eq!(lat.in_bounds(x, y), expected);
            if !expected {
                prop_assert_eq!(lat.state(x, y), CellState::Alive);
            }
        }
    }
}
