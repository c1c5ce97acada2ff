//! Command-line arguments for the streaming demo.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// voxy command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "voxy", about = "Shell-ordered voxel chunk streaming")]
pub struct CliArgs {
    /// Side of the chunk cube loaded around the observer.
    #[arg(long)]
    pub view_diameter: Option<u32>,

    /// Side of the chunk cube kept after eviction.
    #[arg(long)]
    pub retain_diameter: Option<u32>,

    /// Shells loaded per streaming tick (0 loads everything at once).
    #[arg(long)]
    pub shells_per_tick: Option<u32>,

    /// World generation seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(d) = args.view_diameter {
            self.streaming.view_diameter = d;
        }
        if let Some(d) = args.retain_diameter {
            self.streaming.retain_diameter = d;
        }
        if let Some(n) = args.shells_per_tick {
            self.streaming.shells_per_tick = n;
        }
        if let Some(seed) = args.seed {
            self.streaming.seed = seed;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            view_diameter: Some(15),
            seed: Some(1),
            ..CliArgs::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.streaming.view_diameter, 15);
        assert_eq!(config.streaming.seed, 1);
        // Non-overridden fields retain defaults
        assert_eq!(config.streaming.retain_diameter, 5);
        assert_eq!(config.debug.log_level, "info");
    }

    #[test]
    fn test_cli_no_override() {
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = CliArgs::parse_from([
            "voxy",
            "--view-diameter",
            "7",
            "--shells-per-tick",
            "0",
            "--log-level",
            "debug",
        ]);
        assert_eq!(args.view_diameter, Some(7));
        assert_eq!(args.shells_per_tick, Some(0));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert!(args.config.is_none());
    }
}
