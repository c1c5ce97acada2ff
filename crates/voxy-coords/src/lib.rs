//! Spatial traversal orders for cubic voxel neighborhoods.
//!
//! The [`shell`] module walks a cube of chunk or voxel coordinates in
//! concentric shells, either center-out or boundary-in.

pub mod shell;

pub use shell::{
    CenteredCoords, Shell, ShellCells, ShellCoords, ShellDirection, ShellParams, Shells, expand,
    expand_each, run_center, run_layer, shrink, shrink_each,
};
