//! Shell-ordered chunk streaming around a moving observer.
//!
//! Chunks are loaded center-out, a configurable number of shells per tick,
//! so the chunks nearest the observer are always available first. Eviction
//! walks the same cube boundary-in and drops outer shells until only the
//! retention cube is left.

use glam::{IVec3, UVec3};
use tracing::{debug, info};
use voxy_config::StreamingConfig;
use voxy_coords::{ShellDirection, Shells};

use crate::grid::ChunkGrid;
use crate::terrain::TerrainGenerator;

/// Result of a single streaming tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamTick {
    /// Chunks generated and inserted this tick.
    pub loaded: u32,
    /// Shells walked this tick.
    pub shells: u32,
    /// Whether the whole view cube has now been walked.
    pub complete: bool,
}

/// Loads and evicts chunks around an observer in shell order.
///
/// Call [`ShellStreamer::tick`] each frame. Moving the observer restarts the
/// center-out walk from the new position; chunks already loaded are kept.
#[derive(Debug)]
pub struct ShellStreamer {
    config: StreamingConfig,
    generator: TerrainGenerator,
    observer: IVec3,
    cursor: Shells,
}

impl ShellStreamer {
    /// Creates a streamer centered on the chunk-grid origin.
    ///
    /// Panics if `config.view_diameter < 2`; run
    /// [`StreamingConfig::validate`] first.
    pub fn new(config: StreamingConfig) -> Self {
        Self {
            generator: TerrainGenerator::new(config.seed, config.ground_level),
            observer: IVec3::ZERO,
            cursor: Shells::new(config.view_diameter, ShellDirection::Expand),
            config,
        }
    }

    pub fn config(&self) -> &StreamingConfig {
        &self.config
    }

    /// Chunk address the view cube is centered on.
    pub fn observer(&self) -> IVec3 {
        self.observer
    }

    /// Moves the observer, restarting the walk if the chunk changed.
    pub fn set_observer(&mut self, observer: IVec3) {
        if observer != self.observer {
            debug!(from = %self.observer, to = %observer, "Observer moved");
            self.observer = observer;
            self.cursor = Shells::expand(self.config.view_diameter);
        }
    }

    /// Whether every shell of the current view cube has been walked.
    pub fn is_complete(&self) -> bool {
        self.cursor.len() == 0
    }

    /// Chunk address of a view-cube cell.
    pub fn chunk_address(&self, cell: UVec3) -> IVec3 {
        self.observer + cell.as_ivec3() - IVec3::splat(self.cursor.center() as i32)
    }

    /// Whether `addr` lies inside the view cube around the observer.
    pub fn in_view(&self, addr: IVec3) -> bool {
        let low = self.chunk_address(UVec3::ZERO);
        let high = self.chunk_address(UVec3::splat(self.config.view_diameter - 1));
        addr.cmpge(low).all() && addr.cmple(high).all()
    }

    /// Walks up to `shells_per_tick` shells (all remaining if 0), generating
    /// every chunk not yet in `grid`.
    pub fn tick(&mut self, grid: &mut ChunkGrid) -> StreamTick {
        let budget = match self.config.shells_per_tick {
            0 => usize::MAX,
            n => n as usize,
        };

        let mut result = StreamTick::default();
        for _ in 0..budget {
            let Some(shell) = self.cursor.next() else {
                break;
            };
            for cell in shell.cells() {
                let addr = self.chunk_address(cell);
                if !grid.contains(addr) {
                    grid.load_chunk(addr, self.generator.generate(addr));
                    result.loaded += 1;
                }
            }
            result.shells += 1;
        }
        result.complete = self.is_complete();

        debug!(
            loaded = result.loaded,
            shells = result.shells,
            remaining = self.cursor.len(),
            "Streaming tick"
        );
        if result.complete && result.shells > 0 {
            info!(
                observer = %self.observer,
                chunks = grid.loaded_count(),
                "View cube fully loaded"
            );
        }
        result
    }

    /// Drops chunks outside the view cube, then strips view-cube shells
    /// boundary-in until only shells no wider than `retain_diameter` remain.
    ///
    /// Returns the number of chunks unloaded.
    pub fn evict(&self, grid: &mut ChunkGrid) -> usize {
        let mut unloaded = grid.retain(|addr| self.in_view(addr));

        let retain = self.config.retain_diameter;
        for shell in Shells::shrink(self.config.view_diameter).take_while(|s| s.side() > retain) {
            for cell in shell.cells() {
                if grid.unload_chunk(self.chunk_address(cell)).is_some() {
                    unloaded += 1;
                }
            }
        }

        info!(
            unloaded,
            retained = grid.loaded_count(),
            retain_diameter = retain,
            "Evicted outer shells"
        );
        unloaded
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
