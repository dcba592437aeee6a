//! Growth driver — seed the centre cell, run, and render the colony.
//!
//! Times the `execute` call, prints the elapsed seconds on stdout, and
//! renders the final lattice on stderr with the fixed glyph map
//! (`' '` dead, `'.'` dormant, `'o'` alive, `'O'` new, `'M'` migrated).
//!
//! Run with:
//!   cargo run --release --example growth -- [size] [generations] [workers]

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
    let size = arg(1, 64);
    let generations = arg(2, 120);
    let workers = arg(3, 1) as usize;

    let mut tumour = TumourAutomaton::new(size).unwrap();
    tumour.params.ps = 1.0;
    tumour.params.pp = 1.0;

    let centre = (size / 2) as i32;
    tumour.seed(centre, centre, CellState::Alive);

    let tic = Instant::now();
    tumour.set_workers(workers);
    tumour.execute(generations);
    println!("{}", tic.elapsed().as_secs_f64());

    let mut row_text = String::with_capacity(size as usize);
    for x in 0..size as i32 {
        row_text.clear();
        for y in 0..size as i32 {
            row_text.push(tumour.cell(x, y).glyph());
        }
        eprintln!("{row_text}");
    }
}
