//! Slice free-space estimator.
//!
//! Partitions the mask into `num_slices` equal-width vertical bands and counts
//! free pixels in each. `slice_width = floor(width / num_slices)`; columns past
//! `num_slices * slice_width` belong to no slice and are never counted.

use std::ops::Index;

use crate::config::FreeCriterion;
use crate::vision::ObstacleMask;

/// One vertical band `[x_start, x_end)` of the mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slice {
    /// Position from the left, `0..num_slices`
    pub index: usize,
    /// First column (inclusive)
    pub x_start: u32,
    /// Last column (exclusive)
    pub x_end: u32,
}

impl Slice {
    /// Band width in pixels
    pub fn width(&self) -> u32 {
        self.x_end - self.x_start
    }

    /// Horizontal center of the band
    pub fn center_x(&self) -> u32 {
        self.x_start + self.width() / 2
    }
}

/// Slice geometry for a given frame width.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SliceLayout {
    frame_width: u32,
    slice_width: u32,
    slices: Vec<Slice>,
}

impl SliceLayout {
    /// Lay out `num_slices` bands across `frame_width` columns.
    ///
    /// When the frame is narrower than `num_slices` every band is empty.
    pub fn new(frame_width: u32, num_slices: usize) -> Self {
        let num_slices = num_slices.max(1);
        // Counts past u32::MAX leave every slice empty, same as any count wider than the frame
        let slice_width = u32::try_from(num_slices)
            .map(|n| frame_width / n)
            .unwrap_or(0);
        let slices = (0..num_slices)
            .map(|index| {
                let x_start = u32::try_from(index).map_or(0, |i| i * slice_width);
                Slice {
                    index,
                    x_start,
                    x_end: x_start + slice_width,
                }
            })
            .collect();

        Self {
            frame_width,
            slice_width,
            slices,
        }
    }

    /// Width of every slice
    pub fn slice_width(&self) -> u32 {
        self.slice_width
    }

    /// Width of the frame this layout was built for
    pub fn frame_width(&self) -> u32 {
        self.frame_width
    }

    /// Number of slices
    pub fn len(&self) -> usize {
        self.slices.len()
    }

    /// Always false; a layout has at least one slice
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Slices left to right
    pub fn slices(&self) -> &[Slice] {
        &self.slices
    }

    /// Slice by index
    pub fn get(&self, index: usize) -> Option<&Slice> {
        self.slices.get(index)
    }

    /// Columns at the right edge that no slice covers
    pub fn excluded_columns(&self) -> u32 {
        let covered = u32::try_from(self.slices.len())
            .map_or(0, |n| n.saturating_mul(self.slice_width));
        self.frame_width.saturating_sub(covered)
    }
}

/// Free-pixel count per slice, ordered by slice index.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FreeSpaceVector(Vec<u64>);

impl FreeSpaceVector {
    /// Wrap raw counts
    pub fn new(counts: Vec<u64>) -> Self {
        Self(counts)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when there are no entries
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Counts as a slice
    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }

    /// Iterate counts left to right
    pub fn iter(&self) -> std::slice::Iter<'_, u64> {
        self.0.iter()
    }

    /// Index of the largest count, lowest index on ties.
    pub fn argmax(&self) -> Option<usize> {
        let mut best: Option<(usize, u64)> = None;
        for (i, &count) in self.0.iter().enumerate() {
            match best {
                Some((_, best_count)) if count <= best_count => {}
                _ => best = Some((i, count)),
            }
        }
        best.map(|(i, _)| i)
    }
}

impl Index<usize> for FreeSpaceVector {
    type Output = u64;

    fn index(&self, index: usize) -> &u64 {
        &self.0[index]
    }
}

impl From<Vec<u64>> for FreeSpaceVector {
    fn from(counts: Vec<u64>) -> Self {
        Self(counts)
    }
}

/// Count free pixels in every slice of the layout.
pub fn estimate_free_space(
    mask: &ObstacleMask,
    layout: &SliceLayout,
    criterion: FreeCriterion,
) -> FreeSpaceVector {
    FreeSpaceVector(
        layout
            .slices()
            .iter()
            .map(|slice| mask.count_free(slice.x_start, slice.x_end, criterion))
            .collect(),
    )
}
