//! The per-cell stochastic transition function.
//!
//! `step_cell` applies one update to one cell: survival roll, then a
//! proliferation-or-migration decision with weighted random selection of a
//! free neighbour. It mutates the lattice directly and reports any placed
//! cell back to the caller, which owns footprint bookkeeping. The caller
//! also owns the sweep order; the rule itself is orientation-agnostic.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use smallvec::SmallVec;
use stroma_core::{CellState, GrowthParams};
use stroma_lattice::{Lattice, NEIGHBOURHOOD};

use crate::worker::BoundaryStripes;

/// What one application of the update rule did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RuleOutcome {
    /// The cell was dead, or not due in this sweep's parity.
    Skipped,
    /// The cell was processed without writing into a neighbour.
    Settled,
    /// A daughter (or relocated) cell was placed at the coordinate.
    Placed {
        /// Row of the placed cell.
        x: i32,
        /// Column of the placed cell.
        y: i32,
    },
}

/// Apply the update rule to `(x, y)` for the sweep with parity `parity`.
///
/// `stripes` carries the boundary locks guarding this row (empty away from
/// partition boundaries and in sequential runs); they are acquired only
/// around the two mutation sections — kill-and-awaken, and
/// select-and-write — both of which are bounded by a fixed 8-neighbour
/// computation plus at most one cell write.
pub(crate) fn step_cell(
    lattice: &Lattice,
    params: &GrowthParams,
    x: i32,
    y: i32,
    parity: u8,
    stripes: &BoundaryStripes<'_>,
    rng: &mut ChaCha8Rng,
) -> RuleOutcome {
    // Dead cells are absorbing; parity gates each cell to exactly one
    // update per logical generation.
    if lattice.state(x, y) == CellState::Dead || lattice.parity(x, y) != parity {
        return RuleOutcome::Skipped;
    }

    // Mark as processed: eligible again only next sweep.
    lattice.set_parity(x, y, parity ^ 1);

    // Survival roll.
    if rng.random::<f64>() >= params.ps {
        let _guards = stripes.enter();
        lattice.set_state(x, y, CellState::Dead);
        awaken_neighbourhood(lattice, x, y, parity);
        return RuleOutcome::Settled;
    }

    // A dormant cell has no free neighbour; it stays blocked until a
    // death in its neighbourhood awakens it.
    if lattice.state(x, y) == CellState::Dormant {
        return RuleOutcome::Settled;
    }

    // Normalize last generation's provenance tag (New/Migrated) to Alive.
    lattice.set_state(x, y, CellState::Alive);

    // Intent. Short-circuit evaluation is deliberate on both lines: the
    // proliferation signal only accumulates when the pp roll succeeds, and
    // the migration roll happens only when the cell does not proliferate.
    let proliferate =
        rng.random::<f64>() < params.pp && lattice.bump_signal(x, y) >= params.np;
    if !(proliferate || rng.random::<f64>() < params.pm) {
        return RuleOutcome::Settled;
    }

    let _guards = stripes.enter();

    // Free-mask over the fixed neighbourhood in scan order. Only strictly
    // Dead neighbours count as free: Dormant and live neighbours do not,
    // and out-of-bounds reads return the Alive sentinel, so the grid edge
    // is never free either.
    let mut free: SmallVec<[(i32, i32); 8]> = SmallVec::new();
    for (dx, dy) in NEIGHBOURHOOD {
        if lattice.state(x + dx, y + dy) == CellState::Dead {
            free.push((x + dx, y + dy));
        }
    }

    if free.is_empty() {
        // Fully boxed in: block until a neighbour dies.
        lattice.set_state(x, y, CellState::Dormant);
        return RuleOutcome::Settled;
    }

    // Equal-weight cumulative selection over the free neighbours, first
    // cumulative weight exceeding the draw wins (ties break toward earlier
    // scan positions).
    let weight = 1.0 / free.len() as f64;
    let draw = rng.random::<f64>();
    let mut chosen = None;
    let mut cumulative = 0.0;
    for &cell in &free {
        cumulative += weight;
        if draw < cumulative {
            chosen = Some(cell);
            break;
        }
    }
    // Accumulated float error can leave a draw near 1.0 unmatched; it
    // belongs to the last free neighbour.
    let (tx, ty) = chosen.unwrap_or(free[free.len() - 1]);

    if proliferate {
        lattice.set_state(tx, ty, CellState::New);
        lattice.set_signal(tx, ty, 0);
        lattice.set_budget(tx, ty, params.rho);
        // The division spends one budget unit; exhaustion kills the source.
        if lattice.spend_division(x, y) == 0 {
            lattice.set_state(x, y, CellState::Dead);
            awaken_neighbourhood(lattice, x, y, parity);
        }
    } else {
        lattice.set_state(x, y, CellState::Dead);
        lattice.set_state(tx, ty, CellState::Migrated);
        awaken_neighbourhood(lattice, x, y, parity);
        // The signal and remaining budget move with the cell.
        lattice.set_signal(tx, ty, lattice.signal(x, y));
        lattice.set_signal(x, y, 0);
        lattice.set_budget(tx, ty, lattice.budget(x, y));
        lattice.set_budget(x, y, 0);
    }

    // The target is due next sweep.
    lattice.set_parity(tx, ty, parity ^ 1);
    RuleOutcome::Placed { x: tx, y: ty }
}

/// Awaken every dormant cell in the 8-neighbourhood of `(x, y)`: it becomes
/// `Alive` with its parity flipped so the next sweep processes it.
///
/// Dormant cells were processed before, hence already lie inside the active
/// box — awakening never needs to expand a footprint.
pub(crate) fn awaken_neighbourhood(lattice: &Lattice, x: i32, y: i32, parity: u8) {
    for (nx, ny) in lattice.neighbours(x, y) {
        if lattice.state(nx, ny) == CellState::Dormant {
            lattice.set_state(nx, ny, CellState::Alive);
            lattice.set_parity(nx, ny, parity ^ 1);
        }
    }
}
