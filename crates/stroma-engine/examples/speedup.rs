//! Speedup driver — sequential baseline, then geometrically stepped pools.
//!
//! Measures the same growth run at worker counts 1, 2, 2·step, … up to
//! the requested maximum, printing one `workers speedup time` row per
//! measurement. The automaton is reset and re-seeded between runs.
//!
//! Run with:
//!   cargo run --release --example speedup -- [size] [max-workers] [step] [generations]

use std::time::Instant;

use stroma_core::CellState;
use stroma_engine::TumourAutomaton;

fn arg(position: usize, default: u32) -> u32 {
    std::env::args()
        .nth(position)
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}

fn main() {
    let size = arg(1, 128);
    let max_workers = arg(2, 8) as usize;
    let step = arg(3, 2).max(2) as usize;
    let generations = arg(4, 100);

    let mut tumour = TumourAutomaton::new(size).unwrap();
    tumour.params.ps = 1.0;

    let centre = (size / 2) as i32;
    tumour.seed(centre, centre, CellState::Alive);

    println!("workers\tspeedup\ttime");

    let tic = Instant::now();
    tumour.execute(generations);
    let baseline = tic.elapsed().as_secs_f64();
    println!("1\t1.000\t{baseline:.6}");

    let mut workers = 2;
    while workers <= max_workers {
        tumour.reset();
        tumour.seed(centre, centre, CellState::Alive);

        let tic = Instant::now();
        tumour.set_workers(workers);
        tumour.execute(generations);
        let time = tic.elapsed().as_secs_f64();

        println!("{workers}\t{:.3}\t{time:.6}", baseline / time);
        workers *= step;
    }
}
