//! The engine coordinator and public simulation surface.
//!
//! [`TumourAutomaton`] owns the lattice, the growth parameters, the worker
//! pool shape, and the active-region bookkeeping. It is `Send` (can be
//! moved between threads) but all mutating methods take `&mut self`; the
//! borrow checker therefore enforces the no-re-entrant-`execute` contract
//! at compile time for safe callers.

use std::sync::atomic::Ordering::Relaxed;
use std::sync::Mutex;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use stroma_core::{CellState, GrowthParams};
use stroma_lattice::{BoundingBox, Lattice, LatticeError};

use crate::barrier::Rendezvous;
use crate::worker::{self, lock, StripePlan, WorkerContext, WorkerSlot};

/// RNG seed used until [`TumourAutomaton::set_rng_seed`] is called.
const DEFAULT_SEED: u64 = 42;

/// Engine parity before any generation has run. The first generation flips
/// it to 0, matching the zero-initialized per-cell parity, so freshly
/// seeded cells are processed in the very first sweep (which scans
/// forward).
const INITIAL_PARITY: u8 = 1;

/// A stochastic tumour-growth cellular automaton on an N×N lattice.
///
/// Cells survive, die, proliferate, or migrate per [`GrowthParams`],
/// evolved in lockstep generations over the dynamically tracked active
/// region. With [`set_workers`](Self::set_workers) above 1, generations
/// are computed by a pool of scoped OS threads over contiguous row bands
/// with striped boundary locks; at 1 the lock and barrier machinery is
/// disabled and the scan is purely sequential.
///
/// # Example
///
/// ```
/// use stroma_core::CellState;
/// use stroma_engine::TumourAutomaton;
///
/// let mut tumour = TumourAutomaton::new(51).unwrap();
/// tumour.params.ps = 1.0; // immortal cells
/// tumour.seed(25, 25, CellState::Alive);
/// tumour.execute(10);
/// assert!(tumour.occupied_cells() >= 1);
/// ```
pub struct TumourAutomaton {
    lattice: Lattice,
    /// Growth parameters. Plain fields, set directly; must not be mutated
    /// while `execute` is in flight (caller contract).
    pub params: GrowthParams,
    workers: usize,
    slots: Vec<WorkerSlot>,
    stripes: Vec<Mutex<()>>,
    barrier: Rendezvous,
    bounds: Mutex<BoundingBox>,
    parity: u8,
    seed: u64,
    rng: ChaCha8Rng,
    epoch: u64,
}

impl TumourAutomaton {
    /// Allocate an empty `size`×`size` automaton with default parameters,
    /// a single worker, and the default RNG seed.
    pub fn new(size: u32) -> Result<Self, LatticeError> {
        let lattice = Lattice::new(size)?;
        let extent = lattice.size();
        Ok(Self {
            lattice,
            params: GrowthParams::default(),
            workers: 1,
            slots: vec![WorkerSlot::new(extent, INITIAL_PARITY)],
            stripes: Vec::new(),
            barrier: Rendezvous::new(1),
            bounds: Mutex::new(BoundingBox::empty(extent)),
            parity: INITIAL_PARITY,
            seed: DEFAULT_SEED,
            rng: ChaCha8Rng::seed_from_u64(DEFAULT_SEED),
            epoch: 0,
        })
    }

    /// Cells per axis.
    pub fn size(&self) -> i32 {
        self.lattice.size()
    }

    /// The configured worker count.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Read-only access to the underlying lattice (observation surface for
    /// drivers and tests).
    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// A copy of the current global active bounding box.
    pub fn bounds(&self) -> BoundingBox {
        *lock(&self.bounds)
    }

    /// Count of occupied (non-[`CellState::Dead`]) cells. O(N²).
    pub fn occupied_cells(&self) -> usize {
        self.lattice.occupied_cells()
    }

    /// Reseed the deterministic RNG streams. Takes effect immediately:
    /// the sequential stream restarts from `seed` and subsequent worker
    /// streams derive from it.
    pub fn set_rng_seed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self.epoch = 0;
    }

    /// Reconfigure the worker pool. Counts below 1 clamp to 1, which also
    /// disables the boundary-lock and barrier machinery entirely.
    ///
    /// Changing the count tears down and rebuilds the per-worker slots,
    /// the `n − 1` boundary stripes, and the `n`-party barrier. The global
    /// active box is preserved (every footprint is folded into it at the
    /// end of each `execute`).
    pub fn set_workers(&mut self, n: usize) {
        let n = n.max(1);
        if n == self.workers {
            return;
        }
        let extent = self.lattice.size();
        self.workers = n;
        self.slots = (0..n).map(|_| WorkerSlot::new(extent, self.parity)).collect();
        self.stripes = (0..n - 1).map(|_| Mutex::new(())).collect();
        self.barrier = Rendezvous::new(n);
    }

    /// Write a cell's state, expanding the global active box to include
    /// it. Out-of-bounds coordinates are silently ignored.
    ///
    /// Seeding resets the cell's counters: occupied states start with a
    /// zero proliferation signal and a full division budget of the current
    /// `rho` (so a seeded cell with `rho = 1` dies after exactly one
    /// proliferation); `Dead` zeroes both.
    pub fn seed(&mut self, x: i32, y: i32, state: CellState) {
        if !self.lattice.in_bounds(x, y) {
            return;
        }
        self.lattice.set_state(x, y, state);
        self.lattice.set_signal(x, y, 0);
        self.lattice
            .set_budget(x, y, if state.is_occupied() { self.params.rho } else { 0 });
        lock(&self.bounds).expand(x, y);
    }

    /// The state of `(x, y)`, or the [`CellState::Alive`] sentinel out of
    /// bounds.
    pub fn cell(&self, x: i32, y: i32) -> CellState {
        self.lattice.state(x, y)
    }

    /// Run `generations` lockstep generations with the current
    /// configuration. `execute(0)` is a no-op.
    ///
    /// Returns only after every generation has completed and (in banded
    /// mode) every worker thread has been joined. Callers must serialize
    /// calls; `&mut self` enforces this within safe Rust.
    pub fn execute(&mut self, generations: u32) {
        if generations == 0 {
            return;
        }
        if self.workers <= 1 {
            self.execute_sequential(generations);
        } else {
            self.execute_banded(generations);
        }
        self.epoch = self.epoch.wrapping_add(u64::from(generations));
        // Keep every slot's parity record in step with the engine so a
        // later pool reconfiguration or execute call picks up where this
        // one left off.
        for slot in &self.slots {
            slot.last_parity.store(self.parity, Relaxed);
        }
    }

    /// Clear the lattice and every bounding box back to the empty initial
    /// state, preserving parameters and the worker-pool shape. The RNG
    /// streams rewind to the stored seed, so reset-then-reseed reproduces
    /// a freshly constructed engine exactly.
    pub fn reset(&mut self) {
        self.lattice.clear();
        lock(&self.bounds).clear();
        for slot in &self.slots {
            lock(&slot.footprint).clear();
            slot.last_parity.store(INITIAL_PARITY, Relaxed);
        }
        self.parity = INITIAL_PARITY;
        self.epoch = 0;
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
    }

    /// Pure sequential scan: no locks, no barrier, one persistent RNG
    /// stream.
    fn execute_sequential(&mut self, generations: u32) {
        for _ in 0..generations {
            self.parity ^= 1;
            let bounds = {
                let mut merged = lock(&self.bounds);
                merged.merge(&lock(&self.slots[0].footprint));
                *merged
            };
            let mut touched = BoundingBox::empty(self.lattice.size());
            worker::sweep_span(
                &self.lattice,
                &self.params,
                bounds.rows(),
                bounds.cols(),
                self.parity,
                &StripePlan::Sequential,
                &mut self.rng,
                &mut touched,
            );
            lock(&self.slots[0].footprint).merge(&touched);
        }
        // Fold the final generation's footprint in.
        lock(&self.bounds).merge(&lock(&self.slots[0].footprint));
    }

    /// Banded scan: one scoped thread per worker, rendezvousing at the
    /// barrier once per generation.
    fn execute_banded(&mut self, generations: u32) {
        let seeds: Vec<u64> = (0..self.workers)
            .map(|index| self.worker_stream_seed(index))
            .collect();

        let lattice = &self.lattice;
        let params = self.params;
        let slots = &self.slots;
        let global = &self.bounds;
        let barrier = &self.barrier;
        let stripes = &self.stripes;

        std::thread::scope(|scope| {
            for (index, stream_seed) in seeds.into_iter().enumerate() {
                let ctx = WorkerContext {
                    lattice,
                    params,
                    slots,
                    global,
                    barrier,
                    stripes,
                    index,
                    generations,
                    rng: ChaCha8Rng::seed_from_u64(stream_seed),
                };
                scope.spawn(move || worker::run(ctx));
            }
        });

        // All workers joined. Fold the final generation's footprints in —
        // the barrier action only ever merges completed generations.
        worker::merge_footprints(&self.slots, &self.bounds);
        self.parity ^= (generations % 2) as u8;
    }

    /// Derive the RNG stream for one worker of the next run: the stored
    /// seed, the worker index, and the generations-executed epoch, mixed
    /// so repeated `execute` calls never replay a stream.
    fn worker_stream_seed(&self, index: usize) -> u64 {
        self.seed
            ^ self.epoch.wrapping_mul(0x9E37_79B9_7F4A_7C15)
            ^ (index as u64 + 1).wrapping_mul(0xD1B5_4A32_D192_ED03)
    }
}

impl std::fmt::Debug for TumourAutomaton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TumourAutomaton")
            .field("size", &self.lattice.size())
            .field("workers", &self.workers)
            .field("occupied", &self.lattice.occupied_cells())
            .field("bounds", &self.bounds())
            .finish()
    }
}
