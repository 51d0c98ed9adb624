//! Point storage layouts for point cloud geometry
//!
//! A point cloud keeps its positions in one of three layouts:
//!
//! - a plain list of vertices,
//! - a flat `x, y, z, x, y, z, ...` buffer,
//! - a flat buffer read through an index buffer, optionally split into
//!   [`DrawRange`]s that each add a base offset to their indices.
//!
//! Every layout enumerates its points as `(local_position, source_index)`
//! pairs through [`PointGeometry::points`].

use crate::aabb::Aabb;
use crate::error::{Error, Result};
use crate::point::{point_from_flat, Point3f};
use serde::{Deserialize, Serialize};
use std::iter::Enumerate;
use std::slice::{self, ChunksExact};

/// A contiguous slice of an index buffer scanned as one unit.
///
/// Every index read from `indices[start..start + count]` is offset by
/// `base_index` before it is used to look up a point slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DrawRange {
    pub start: usize,
    pub count: usize,
    pub base_index: usize,
}

impl DrawRange {
    pub fn new(start: usize, count: usize, base_index: usize) -> Self {
        Self {
            start,
            count,
            base_index,
        }
    }
}

/// How the positions of a point cloud are stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointLayout {
    /// Ordered points; the source index is the position in the list
    VertexList(Vec<Point3f>),
    /// Three floats per point, no indices
    Flat { positions: Vec<f32> },
    /// Three floats per point slot, visited through `indices`.
    /// No ranges means one range covering the whole index buffer.
    FlatIndexed {
        positions: Vec<f32>,
        indices: Vec<u32>,
        ranges: Vec<DrawRange>,
    },
}

/// Point cloud geometry: a point layout plus an optional local-space
/// bounding box used to reject rays early.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointGeometry {
    pub layout: PointLayout,
    pub bounding_box: Option<Aabb>,
}

impl PointGeometry {
    pub fn new(layout: PointLayout) -> Self {
        Self {
            layout,
            bounding_box: None,
        }
    }

    pub fn from_vertices(vertices: Vec<Point3f>) -> Self {
        Self::new(PointLayout::VertexList(vertices))
    }

    pub fn from_flat(positions: Vec<f32>) -> Self {
        Self::new(PointLayout::Flat { positions })
    }

    pub fn from_flat_indexed(
        positions: Vec<f32>,
        indices: Vec<u32>,
        ranges: Vec<DrawRange>,
    ) -> Self {
        Self::new(PointLayout::FlatIndexed {
            positions,
            indices,
            ranges,
        })
    }

    /// Build a flat geometry from a raw vertex buffer of native-endian `f32`
    /// triples, as uploaded to a GPU.
    pub fn from_position_bytes(bytes: &[u8]) -> Result<Self> {
        let floats: &[f32] = bytemuck::try_cast_slice(bytes)
            .map_err(|e| {
                Error::InvalidData(format!("position buffer is not a float array: {e}"))
            })?;

        if floats.len() % 3 != 0 {
            return Err(Error::InvalidData(format!(
                "position buffer holds {} floats, which is not a multiple of 3",
                floats.len()
            )));
        }

        Ok(Self::from_flat(floats.to_vec()))
    }

    /// Builder-style variant of [`PointGeometry::compute_bounding_box`]
    pub fn with_bounding_box(mut self) -> Self {
        self.compute_bounding_box();
        self
    }

    /// Number of point slots stored, independent of any index buffer
    pub fn point_count(&self) -> usize {
        match &self.layout {
            PointLayout::VertexList(vertices) => vertices.len(),
            PointLayout::Flat { positions } | PointLayout::FlatIndexed { positions, .. } => {
                positions.len() / 3
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.point_count() == 0
    }

    /// Ranges scanned for an indexed layout, with the implicit whole-buffer
    /// range filled in. Empty for the non-indexed layouts.
    pub fn draw_ranges(&self) -> Vec<DrawRange> {
        match &self.layout {
            PointLayout::FlatIndexed { indices, ranges, .. } if ranges.is_empty() => {
                vec![DrawRange::new(0, indices.len(), 0)]
            }
            PointLayout::FlatIndexed { ranges, .. } => ranges.clone(),
            _ => Vec::new(),
        }
    }

    /// Append a draw range. Has no effect on non-indexed layouts.
    pub fn add_range(&mut self, range: DrawRange) {
        if let PointLayout::FlatIndexed { ranges, .. } = &mut self.layout {
            ranges.push(range);
        }
    }

    pub fn clear_ranges(&mut self) {
        if let PointLayout::FlatIndexed { ranges, .. } = &mut self.layout {
            ranges.clear();
        }
    }

    /// Enumerate the points as `(local_position, source_index)`.
    ///
    /// Indexed layouts yield one pair per visited index, so a slot referenced
    /// twice is produced twice. Out-of-range indices panic.
    pub fn points(&self) -> Points<'_> {
        match &self.layout {
            PointLayout::VertexList(vertices) => Points::VertexList(vertices.iter().enumerate()),
            PointLayout::Flat { positions } => Points::Flat(positions.chunks_exact(3).enumerate()),
            PointLayout::FlatIndexed {
                positions,
                indices,
                ranges,
            } => Points::FlatIndexed(IndexedPoints::new(positions, indices, ranges)),
        }
    }

    /// Recompute the bounding box from the enumerated points. An empty
    /// geometry has no bounding box.
    pub fn compute_bounding_box(&mut self) {
        let aabb = Aabb::from_points(self.points().map(|(p, _)| p));
        if aabb.is_none() {
            log::debug!("geometry has no points, leaving bounding box unset");
        }
        self.bounding_box = aabb;
    }

    /// Check that every range and index stays inside its buffer.
    ///
    /// Picking does not call this; it is for loaders that take buffers from
    /// untrusted sources.
    pub fn validate(&self) -> Result<()> {
        let (positions, indices) = match &self.layout {
            PointLayout::VertexList(_) => return Ok(()),
            PointLayout::Flat { positions } => (positions, None),
            PointLayout::FlatIndexed {
                positions, indices, ..
            } => (positions, Some(indices)),
        };

        if positions.len() % 3 != 0 {
            return Err(Error::InvalidData(format!(
                "position buffer holds {} floats, which is not a multiple of 3",
                positions.len()
            )));
        }

        let Some(indices) = indices else {
            return Ok(());
        };

        let point_count = positions.len() / 3;
        for range in self.draw_ranges() {
            let end = range.start + range.count;
            if end > indices.len() {
                return Err(Error::InvalidData(format!(
                    "draw range {}..{} exceeds index buffer of length {}",
                    range.start,
                    end,
                    indices.len()
                )));
            }

            for (index, &value) in indices.iter().enumerate().take(end).skip(range.start) {
                let slot = range.base_index + value as usize;
                if slot >= point_count {
                    return Err(Error::IndexOutOfRange {
                        index,
                        slot,
                        point_count,
                    });
                }
            }
        }

        Ok(())
    }
}

/// Iterator over the points of a [`PointGeometry`], see [`PointGeometry::points`]
#[derive(Debug, Clone)]
pub enum Points<'a> {
    VertexList(Enumerate<slice::Iter<'a, Point3f>>),
    Flat(Enumerate<ChunksExact<'a, f32>>),
    FlatIndexed(IndexedPoints<'a>),
}

impl Iterator for Points<'_> {
    type Item = (Point3f, usize);

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Points::VertexList(iter) => iter.next().map(|(i, p)| (*p, i)),
            Points::Flat(iter) => iter
                .next()
                .map(|(i, xyz)| (Point3f::new(xyz[0], xyz[1], xyz[2]), i)),
            Points::FlatIndexed(iter) => iter.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Points::VertexList(iter) => iter.size_hint(),
            Points::Flat(iter) => iter.size_hint(),
            Points::FlatIndexed(iter) => iter.size_hint(),
        }
    }
}

/// Walks the draw ranges of an indexed layout in order, resolving each
/// index to its slot.
#[derive(Debug, Clone)]
pub struct IndexedPoints<'a> {
    positions: &'a [f32],
    indices: &'a [u32],
    /// Ranges not started yet
    ranges: slice::Iter<'a, DrawRange>,
    current: slice::Iter<'a, u32>,
    base_index: usize,
}

impl<'a> IndexedPoints<'a> {
    fn new(positions: &'a [f32], indices: &'a [u32], ranges: &'a [DrawRange]) -> Self {
        // no ranges: the whole index buffer is one range
        let current = if ranges.is_empty() {
            indices.iter()
        } else {
            indices[..0].iter()
        };
        Self {
            positions,
            indices,
            ranges: ranges.iter(),
            current,
            base_index: 0,
        }
    }
}

impl Iterator for IndexedPoints<'_> {
    type Item = (Point3f, usize);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(&index) = self.current.next() {
                let slot = self.base_index + index as usize;
                return Some((point_from_flat(self.positions, slot), slot));
            }
            let range = self.ranges.next()?;
            self.current = self.indices[range.start..range.start + range.count].iter();
            self.base_index = range.base_index;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let pending: usize = self.ranges.clone().map(|range| range.count).sum();
        let len = self.current.len() + pending;
        (len, Some(len))
    }
}

impl Default for PointGeometry {
    fn default() -> Self {
        Self::from_vertices(Vec::new())
    }
}

impl From<Vec<Point3f>> for PointGeometry {
    fn from(vertices: Vec<Point3f>) -> Self {
        Self::from_vertices(vertices)
    }
}
