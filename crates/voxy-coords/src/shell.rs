//! Concentric-shell traversal of cubic volumes.
//!
//! A cube of side `N` is partitioned into rings of non-overlapping cubic
//! shells around its center. Odd sizes have a single center cell, even sizes
//! a 2×2×2 center block. Traversal either **expands** from the center
//! outward (progressive loading around an observer) or **shrinks** from the
//! boundary inward (eviction). Both directions visit every cell of `[0, N)³`
//! exactly once and produce the same shells in opposite order.
//!
//! Two interfaces are provided:
//!
//! - Pull: [`Shells`] yields whole [`Shell`]s, [`Shell::cells`] yields the
//!   cells of one shell, and [`expand`] / [`shrink`] flatten both. Stopping
//!   between shells is just not pulling the next one.
//! - Push: [`expand_each`] / [`shrink_each`] run a visitor for every cell,
//!   built from [`run_center`] and [`run_layer`].
//!
//! Within a shell cells come in a fixed order: the two Z faces in full, then
//! the two Y faces without the rows the Z faces already covered, then the two
//! X faces without any edge already covered.

use std::iter::FusedIterator;

use glam::{IVec3, UVec3};
use serde::{Deserialize, Serialize};

/// Order in which shells are visited.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShellDirection {
    /// Center first, outer boundary last.
    #[default]
    Expand,
    /// Outer boundary first, center last.
    Shrink,
}

/// Center layout of a cube, shared by both traversal directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShellParams {
    /// Lowest coordinate of the center unit on every axis.
    pub center: u32,
    /// One past the highest coordinate of the center unit.
    pub positive: u32,
    /// Whether the cube side is even (2×2×2 center block).
    pub is_even: bool,
}

impl ShellParams {
    /// Computes the center layout of a cube of side `size`.
    ///
    /// Panics if `size <= 1`: a single cell has no shell decomposition.
    pub fn prepare(size: u32) -> Self {
        assert!(size > 1, "shell traversal needs a cube side of at least 2, got {size}");
        let is_even = size % 2 == 0;
        let center = (size - 1) / 2;
        let positive = if is_even { center + 2 } else { center + 1 };
        Self {
            center,
            positive,
            is_even,
        }
    }

    /// The innermost shell: one cell for odd sizes, a 2×2×2 block for even.
    pub fn center_shell(&self) -> Shell {
        Shell::new(self.center, self.positive - 1)
    }
}

/// One concentric layer: the boundary cells of the cube `[min, max]³`.
///
/// A shell with `min == max` is the single center cell of an odd cube.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Shell {
    min: u32,
    max: u32,
}

impl Shell {
    /// Creates the shell bounding `[min, max]³`.
    pub fn new(min: u32, max: u32) -> Self {
        debug_assert!(min <= max, "shell bounds inverted: {min} > {max}");
        Self { min, max }
    }

    /// Lowest coordinate on every axis (the negative face).
    pub fn min(&self) -> u32 {
        self.min
    }

    /// Highest coordinate on every axis (the positive face).
    pub fn max(&self) -> u32 {
        self.max
    }

    /// Edge length of the bounding cube.
    pub fn side(&self) -> u32 {
        self.max - self.min + 1
    }

    /// Number of cells in this shell.
    pub fn cell_count(&self) -> usize {
        let side = self.side() as usize;
        if side == 1 {
            1
        } else {
            side.pow(3) - (side - 2).pow(3)
        }
    }

    /// Returns `true` if `cell` lies on this shell.
    pub fn contains(&self, cell: UVec3) -> bool {
        let axes = cell.to_array();
        axes.iter().all(|c| (self.min..=self.max).contains(c))
            && axes.iter().any(|&c| c == self.min || c == self.max)
    }

    /// Lazily yields the cells of this shell.
    pub fn cells(&self) -> ShellCells {
        ShellCells::new(*self)
    }

    /// Calls `on_iter` for every cell of this shell, in [`Shell::cells`] order.
    pub fn for_each_cell<F: FnMut(u32, u32, u32)>(&self, mut on_iter: F) {
        if self.min == self.max {
            on_iter(self.min, self.min, self.min);
        } else {
            run_layer(&mut on_iter, self.max, self.min);
        }
    }
}

/// Inclusive, non-empty box of cells iterated X fastest, then Y, then Z.
#[derive(Clone, Copy, Debug, Default)]
struct CellBox {
    min: UVec3,
    max: UVec3,
}

/// Iterator over the cells of one [`Shell`].
#[derive(Clone, Debug)]
pub struct ShellCells {
    boxes: [CellBox; 6],
    box_count: usize,
    current: usize,
    cursor: UVec3,
    remaining: usize,
}

impl ShellCells {
    fn new(shell: Shell) -> Self {
        let (n, p) = (shell.min, shell.max);
        let mut boxes = [CellBox::default(); 6];
        let mut box_count = 0;
        let mut push = |min: [u32; 3], max: [u32; 3]| {
            boxes[box_count] = CellBox {
                min: UVec3::from_array(min),
                max: UVec3::from_array(max),
            };
            box_count += 1;
        };

        if n == p {
            push([n, n, n], [n, n, n]);
        } else {
            push([n, n, n], [p, p, n]);
            push([n, n, p], [p, p, p]);
            // Faces of a 2-wide shell are fully covered by its Z faces.
            if p - n > 1 {
                let (n1, p1) = (n + 1, p - 1);
                push([n, n, n1], [p, n, p1]);
                push([n, p, n1], [p, p, p1]);
                push([n, n1, n1], [n, p1, p1]);
                push([p, n1, n1], [p, p1, p1]);
            }
        }

        Self {
            cursor: boxes[0].min,
            boxes,
            box_count,
            current: 0,
            remaining: shell.cell_count(),
        }
    }
}

impl Iterator for ShellCells {
    type Item = UVec3;

    fn next(&mut self) -> Option<UVec3> {
        if self.current >= self.box_count {
            return None;
        }
        let cell = self.cursor;
        let CellBox { min, max } = self.boxes[self.current];

        if self.cursor.x < max.x {
            self.cursor.x += 1;
        } else if self.cursor.y < max.y {
            self.cursor.x = min.x;
            self.cursor.y += 1;
        } else if self.cursor.z < max.z {
            self.cursor.x = min.x;
            self.cursor.y = min.y;
            self.cursor.z += 1;
        } else {
            self.current += 1;
            if self.current < self.box_count {
                self.cursor = self.boxes[self.current].min;
            }
        }

        self.remaining -= 1;
        Some(cell)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for ShellCells {}
impl FusedIterator for ShellCells {}

/// Stateful shell cursor over a cube of side `N`.
///
/// Yields every shell of the cube once, center-out for
/// [`ShellDirection::Expand`] and boundary-in for [`ShellDirection::Shrink`].
/// The iterator is double-ended: reversing an expand traversal yields the
/// shrink traversal and vice versa.
#[derive(Clone, Debug)]
pub struct Shells {
    size: u32,
    center: u32,
    direction: ShellDirection,
    /// Next ring to yield from the front, counted in traversal order.
    front: u32,
    /// One past the next ring to yield from the back.
    back: u32,
}

impl Shells {
    /// Starts a traversal of a cube of side `size`. Panics if `size <= 1`.
    pub fn new(size: u32, direction: ShellDirection) -> Self {
        let params = ShellParams::prepare(size);
        Self {
            size,
            center: params.center,
            direction,
            front: 0,
            back: params.center + 1,
        }
    }

    /// Center-out traversal.
    pub fn expand(size: u32) -> Self {
        Self::new(size, ShellDirection::Expand)
    }

    /// Boundary-in traversal.
    pub fn shrink(size: u32) -> Self {
        Self::new(size, ShellDirection::Shrink)
    }

    /// Cube side length.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Traversal direction.
    pub fn direction(&self) -> ShellDirection {
        self.direction
    }

    /// Lowest coordinate of the center unit.
    pub fn center(&self) -> u32 {
        self.center
    }

    /// Number of shells in the whole cube.
    pub fn ring_count(&self) -> u32 {
        self.center + 1
    }

    /// The shell the next call to `next` will yield, without advancing.
    pub fn peek(&self) -> Option<Shell> {
        (self.front < self.back).then(|| self.shell_at(self.front))
    }

    /// Positive face of the next shell, if any.
    pub fn positive(&self) -> Option<u32> {
        self.peek().map(|shell| shell.max)
    }

    /// Negative face of the next shell, if any.
    pub fn negative(&self) -> Option<u32> {
        self.peek().map(|shell| shell.min)
    }

    /// Flattens the remaining shells into their cells.
    pub fn cells(self) -> ShellCoords {
        ShellCoords {
            shells: self,
            current: None,
        }
    }

    /// Shell at traversal position `step`.
    fn shell_at(&self, step: u32) -> Shell {
        let ring = match self.direction {
            ShellDirection::Expand => step,
            ShellDirection::Shrink => self.center - step,
        };
        let negative = self.center - ring;
        Shell::new(negative, self.size - 1 - negative)
    }
}

impl Iterator for Shells {
    type Item = Shell;

    fn next(&mut self) -> Option<Shell> {
        let shell = self.peek()?;
        self.front += 1;
        Some(shell)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = (self.back - self.front) as usize;
        (len, Some(len))
    }
}

impl DoubleEndedIterator for Shells {
    fn next_back(&mut self) -> Option<Shell> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        Some(self.shell_at(self.back))
    }
}

impl ExactSizeIterator for Shells {}
impl FusedIterator for Shells {}

/// Every cell of a cube in shell order.
#[derive(Clone, Debug)]
pub struct ShellCoords {
    shells: Shells,
    current: Option<ShellCells>,
}

impl ShellCoords {
    /// Yields cells as offsets from the cube center instead.
    ///
    /// The center unit's lowest cell maps to the origin, so the offsets
    /// span `[-(N - 1) / 2, N / 2]` on every axis.
    pub fn centered(self) -> CenteredCoords {
        CenteredCoords {
            center: IVec3::splat(self.shells.center as i32),
            inner: self,
        }
    }
}

impl Iterator for ShellCoords {
    type Item = UVec3;

    fn next(&mut self) -> Option<UVec3> {
        loop {
            if let Some(cell) = self.current.as_mut().and_then(Iterator::next) {
                return Some(cell);
            }
            self.current = Some(self.shells.next()?.cells());
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let pending = self.current.as_ref().map_or(0, ExactSizeIterator::len);
        let rest: usize = self.shells.clone().map(|shell| shell.cell_count()).sum();
        (pending + rest, Some(pending + rest))
    }
}

impl ExactSizeIterator for ShellCoords {}
impl FusedIterator for ShellCoords {}

/// Cells of a cube in shell order, relative to the cube center.
#[derive(Clone, Debug)]
pub struct CenteredCoords {
    inner: ShellCoords,
    center: IVec3,
}

impl Iterator for CenteredCoords {
    type Item = IVec3;

    fn next(&mut self) -> Option<IVec3> {
        self.inner.next().map(|cell| cell.as_ivec3() - self.center)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for CenteredCoords {}
impl FusedIterator for CenteredCoords {}

/// Every cell of a cube of side `size`, center-out.
pub fn expand(size: u32) -> ShellCoords {
    Shells::expand(size).cells()
}

/// Every cell of a cube of side `size`, boundary-in.
pub fn shrink(size: u32) -> ShellCoords {
    Shells::shrink(size).cells()
}

/// Visits every cell of the shell `[negative, positive]³` once.
pub fn run_layer<F: FnMut(u32, u32, u32)>(on_iter: &mut F, positive: u32, negative: u32) {
    assert!(positive > negative, "layer bounds inverted: {positive} <= {negative}");
    let (negative_one, positive_one) = (negative + 1, positive - 1);

    // X*Y faces.
    for z in [negative, positive] {
        for y in negative..=positive {
            for x in negative..=positive {
                on_iter(x, y, z);
            }
        }
    }

    // X*Z faces, minus rows on the Z faces.
    for y in [negative, positive] {
        for z in negative_one..=positive_one {
            for x in negative..=positive {
                on_iter(x, y, z);
            }
        }
    }

    // Y*Z faces, minus edges on the faces above.
    for x in [negative, positive] {
        for z in negative_one..=positive_one {
            for y in negative_one..=positive_one {
                on_iter(x, y, z);
            }
        }
    }
}

/// Visits the center unit: one cell for odd cubes, eight for even ones.
pub fn run_center<F: FnMut(u32, u32, u32)>(on_iter: &mut F, params: &ShellParams) {
    if params.is_even {
        for z in params.center..params.positive {
            for y in params.center..params.positive {
                for x in params.center..params.positive {
                    on_iter(x, y, z);
                }
            }
        }
    } else {
        on_iter(params.center, params.center, params.center);
    }
}

/// Visits every cell of a cube of side `size`, center-out.
///
/// Panics if `size <= 1`.
pub fn expand_each<F: FnMut(u32, u32, u32)>(size: u32, mut on_iter: F) {
    let params = ShellParams::prepare(size);
    run_center(&mut on_iter, &params);

    let mut positive = params.positive;
    let mut negative = params.center;
    while positive < size {
        negative -= 1;
        run_layer(&mut on_iter, positive, negative);
        positive += 1;
    }
}

/// Visits every cell of a cube of side `size`, boundary-in.
///
/// Panics if `size <= 1`.
pub fn shrink_each<F: FnMut(u32, u32, u32)>(size: u32, mut on_iter: F) {
    let params = ShellParams::prepare(size);

    let mut positive = size - 1;
    let mut negative = 0;
    while positive - negative > 1 {
        run_layer(&mut on_iter, positive, negative);
        positive -= 1;
        negative += 1;
    }

    run_center(&mut on_iter, &params);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
