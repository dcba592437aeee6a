//! Worker task: per-band sweeping with boundary stripe locks.
//!
//! Each worker owns a contiguous band of the active box's rows. The update
//! rule's writes reach one row beyond the cell being processed, so writes
//! near a band boundary can land in the neighbouring worker's band; a
//! striped lock per boundary (shared by the two adjacent workers) guards
//! those rows. The stripe must be held within a 2-row margin of the
//! boundary, not 1: the adjacent worker can write into the same boundary
//! row from its own side of the fence.
//!
//! Worker state lives in engine-owned [`WorkerSlot`]s rather than any
//! thread-local storage: the footprint sub-box is written only by its
//! owning worker mid-generation and read only while all workers are parked
//! at the barrier, and the persisted parity record survives across
//! `execute` calls and pool reconfigurations.

use std::ops::Range;
use std::sync::atomic::{AtomicU8, Ordering::Relaxed};
use std::sync::{Mutex, MutexGuard, PoisonError};

use rand_chacha::ChaCha8Rng;
use stroma_core::GrowthParams;
use stroma_lattice::{BoundingBox, Lattice};

use crate::barrier::Rendezvous;
use crate::partition::worker_rows;
use crate::rule::{step_cell, RuleOutcome};

/// Rows this close to a band boundary take the boundary's stripe lock.
pub(crate) const BOUNDARY_MARGIN: i32 = 2;

/// Lock a mutex, riding through poisoning: a poisoned guard means a peer
/// panicked, and the protected state is still structurally sound.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Engine-owned per-worker state record.
pub(crate) struct WorkerSlot {
    /// Cumulative footprint of this worker's placements. Written only by
    /// the owning worker mid-generation; read only while workers are
    /// parked at the barrier (or joined).
    pub(crate) footprint: Mutex<BoundingBox>,
    /// The last generation parity this worker completed, carried across
    /// `execute` calls so every cell is visited exactly once per logical
    /// generation.
    pub(crate) last_parity: AtomicU8,
}

impl WorkerSlot {
    pub(crate) fn new(extent: i32, parity: u8) -> Self {
        Self {
            footprint: Mutex::new(BoundingBox::empty(extent)),
            last_parity: AtomicU8::new(parity),
        }
    }
}

/// The boundary stripe locks applicable to one row of a worker's band.
///
/// At most two: the stripe below (shared with the previous worker) and the
/// stripe above (shared with the next). Most rows carry neither.
pub(crate) struct BoundaryStripes<'a> {
    low: Option<&'a Mutex<()>>,
    high: Option<&'a Mutex<()>>,
}

impl<'a> BoundaryStripes<'a> {
    /// No locks: interior rows and sequential runs.
    pub(crate) fn none() -> Self {
        Self {
            low: None,
            high: None,
        }
    }

    /// Acquire the applicable stripes, always in ascending stripe order so
    /// a band narrow enough to need both can never deadlock against its
    /// neighbours doing the same.
    pub(crate) fn enter(&self) -> (Option<MutexGuard<'a, ()>>, Option<MutexGuard<'a, ()>>) {
        (self.low.map(lock), self.high.map(lock))
    }
}

/// Stripe-lock selection for a sweep.
pub(crate) enum StripePlan<'a> {
    /// Sequential scan: the lock machinery is disabled entirely.
    Sequential,
    /// Banded scan: `stripes[i]` guards the boundary between workers `i`
    /// and `i + 1`.
    Banded {
        stripes: &'a [Mutex<()>],
        rows: Range<i32>,
        workers: usize,
        index: usize,
    },
}

impl StripePlan<'_> {
    fn for_row(&self, x: i32) -> BoundaryStripes<'_> {
        match self {
            Self::Sequential => BoundaryStripes::none(),
            Self::Banded {
                stripes,
                rows,
                workers,
                index,
            } => {
                let (index, workers) = (*index, *workers);
                let low = if index > 0 && x < rows.start + BOUNDARY_MARGIN {
                    Some(&stripes[index - 1])
                } else {
                    None
                };
                let high = if index + 1 < workers && x >= rows.end - BOUNDARY_MARGIN {
                    Some(&stripes[index])
                } else {
                    None
                };
                BoundaryStripes { low, high }
            }
        }
    }
}

/// Sweep `rows` × `cols` once with the given parity, applying the update
/// rule to every cell and recording placements in `touched`.
///
/// Even parity sweeps forward, odd parity in reverse — alternating the
/// scan direction avoids directional bias in the stochastic diffusion.
pub(crate) fn sweep_span(
    lattice: &Lattice,
    params: &GrowthParams,
    rows: Range<i32>,
    cols: Range<i32>,
    parity: u8,
    plan: &StripePlan<'_>,
    rng: &mut ChaCha8Rng,
    touched: &mut BoundingBox,
) {
    if rows.is_empty() || cols.is_empty() {
        return;
    }
    let mut visit = |x: i32, y: i32, stripes: &BoundaryStripes<'_>| {
        if let RuleOutcome::Placed { x: px, y: py } =
            step_cell(lattice, params, x, y, parity, stripes, rng)
        {
            touched.expand(px, py);
        }
    };
    if parity == 0 {
        for x in rows.clone() {
            let stripes = plan.for_row(x);
            for y in cols.clone() {
                visit(x, y, &stripes);
            }
        }
    } else {
        for x in rows.rev() {
            let stripes = plan.for_row(x);
            for y in cols.clone().rev() {
                visit(x, y, &stripes);
            }
        }
    }
}

/// Fold every worker's footprint into the global active box.
///
/// O(workerCount). Callers guarantee no worker is mid-sweep: the barrier
/// release action and the post-join merge both run with workers parked.
pub(crate) fn merge_footprints(slots: &[WorkerSlot], global: &Mutex<BoundingBox>) {
    let mut merged = lock(global);
    for slot in slots {
        let footprint = lock(&slot.footprint);
        merged.merge(&footprint);
    }
}

/// Everything a spawned worker needs for one `execute` call.
pub(crate) struct WorkerContext<'a> {
    pub(crate) lattice: &'a Lattice,
    pub(crate) params: GrowthParams,
    pub(crate) slots: &'a [WorkerSlot],
    pub(crate) global: &'a Mutex<BoundingBox>,
    pub(crate) barrier: &'a Rendezvous,
    pub(crate) stripes: &'a [Mutex<()>],
    pub(crate) index: usize,
    pub(crate) generations: u32,
    pub(crate) rng: ChaCha8Rng,
}

/// Worker entry point: run every requested generation, rendezvousing with
/// the pool once per generation.
pub(crate) fn run(mut ctx: WorkerContext<'_>) {
    let workers = ctx.slots.len();
    let mut parity = ctx.slots[ctx.index].last_parity.load(Relaxed);

    for _ in 0..ctx.generations {
        parity ^= 1;

        // Rendezvous. The last arriver folds every footprint into the
        // global box while all of its peers are parked right here.
        ctx.barrier
            .wait_with(|| merge_footprints(ctx.slots, ctx.global));

        // Snapshot the merged box once per generation: the row partition
        // derives from it, and capturing the column span up front keeps
        // cells added mid-generation from being visited out of turn.
        let bounds = *lock(ctx.global);
        let rows = worker_rows(bounds.rows(), workers, ctx.index);
        let plan = StripePlan::Banded {
            stripes: ctx.stripes,
            rows: rows.clone(),
            workers,
            index: ctx.index,
        };

        let mut touched = BoundingBox::empty(ctx.lattice.size());
        sweep_span(
            ctx.lattice,
            &ctx.params,
            rows,
            bounds.cols(),
            parity,
            &plan,
            &mut ctx.rng,
            &mut touched,
        );
        lock(&ctx.slots[ctx.index].footprint).merge(&touched);
    }
}
