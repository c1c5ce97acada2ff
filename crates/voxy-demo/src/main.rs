//! Streaming demo: loads a cube of chunks around a moving observer in shell
//! order, tallies exposed voxel faces through face clusters, and evicts back
//! down to the retention cube.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p voxy-demo -- --view-diameter 11 --shells-per-tick 2`.

mod exposure;
mod grid;
mod streaming;
mod terrain;

use clap::Parser;
use glam::{IVec3, UVec3};
use tracing::{error, info, warn};
use voxy_config::{CliArgs, Config, default_config_dir};
use voxy_coords::expand_each;

use crate::exposure::{FaceExposure, count_exposed_faces};
use crate::grid::ChunkGrid;
use crate::streaming::ShellStreamer;

/// Chunks the observer walks along +X after the initial load.
const WALK_STEPS: i32 = 3;

fn main() {
    let args = CliArgs::parse();

    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    voxy_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    if let Err(e) = config.validate() {
        error!(%e, "Invalid configuration");
        std::process::exit(2);
    }

    let mut grid = ChunkGrid::new();
    let mut streamer = ShellStreamer::new(config.streaming.clone());

    let ticks = stream_to_completion(&mut streamer, &mut grid);
    info!(ticks, chunks = grid.loaded_count(), "Initial view loaded");

    let (exposure, enclosed) = tally_exposure(&grid, &streamer);
    info!(
        exposed = exposure.exposed,
        unresolved = exposure.unresolved,
        enclosed,
        "Exposed faces inside the view cube"
    );

    for step in 1..=WALK_STEPS {
        streamer.set_observer(IVec3::new(step, 0, 0));
        let ticks = stream_to_completion(&mut streamer, &mut grid);
        info!(
            observer = %streamer.observer(),
            ticks,
            chunks = grid.loaded_count(),
            "Observer advanced"
        );
    }

    streamer.evict(&mut grid);
    let reach = grid
        .loaded_addresses()
        .map(|addr| (addr - streamer.observer()).abs().max_element())
        .max()
        .unwrap_or(0);
    info!(chunks = grid.loaded_count(), reach, "Demo finished");
}

/// Ticks until the whole view cube is loaded, returning the tick count.
fn stream_to_completion(streamer: &mut ShellStreamer, grid: &mut ChunkGrid) -> u32 {
    let mut ticks = 0;
    while !streamer.is_complete() {
        streamer.tick(grid);
        ticks += 1;
    }
    ticks
}

/// Sums face exposure over the view cube in center-out order, so the
/// chunks nearest the observer are tallied first. Also counts chunks whose
/// whole 3×3×3 neighborhood is loaded.
fn tally_exposure(grid: &ChunkGrid, streamer: &ShellStreamer) -> (FaceExposure, u32) {
    let mut total = FaceExposure::default();
    let mut enclosed = 0;
    expand_each(streamer.config().view_diameter, |x, y, z| {
        let addr = streamer.chunk_address(UVec3::new(x, y, z));
        let cluster = grid.face_cluster(addr);
        if cluster.center().is_none() {
            warn!(%addr, "View cube chunk missing during exposure pass");
            return;
        }
        total += count_exposed_faces(&cluster);
        if grid.block_cluster(addr).is_complete() {
            enclosed += 1;
        }
    });
    (total, enclosed)
}
