//! Occupancy grid produced by surface rasterization

use glam::Vec3;

/// Integer cell coordinates in the occupancy grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridCoord {
    pub x: usize,
    pub y: usize,
}

impl GridCoord {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Converts a linear sample index back to cell coordinates.
    ///
    /// The X axis divides by `width` while Y takes the remainder by `height`.
    /// The grid is always square so the two agree with [`GridCoord::to_index`].
    #[inline]
    pub fn from_index(index: usize, width: usize, height: usize) -> Self {
        Self {
            x: index / width,
            y: index % height,
        }
    }

    /// Linear sample index, X-major: `x * height + y`
    #[inline]
    pub fn to_index(self, height: usize) -> usize {
        self.x * height + self.y
    }
}

/// Square traversability grid with one world-space sample per cell
#[derive(Debug, Clone, PartialEq)]
pub struct OccupancyGrid {
    width: usize,
    height: usize,
    /// 1 = traversable (ray hit), 0 = empty; indexed by [`GridCoord::to_index`]
    cells: Vec<u8>,
    /// Picked world point per cell, `None` where the ray hit nothing
    samples: Vec<Option<Vec3>>,
}

impl OccupancyGrid {
    /// Creates an unoccupied `size × size` grid
    pub fn new(size: usize) -> Self {
        Self {
            width: size,
            height: size,
            cells: vec![0; size * size],
            samples: vec![None; size * size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells (`width × height`)
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, coord: GridCoord) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    /// Occupancy value of a cell, 0 outside the grid
    pub fn cell(&self, x: usize, y: usize) -> u8 {
        let coord = GridCoord::new(x, y);
        if !self.contains(coord) {
            return 0;
        }
        self.cells[coord.to_index(self.height)]
    }

    pub fn is_occupied(&self, coord: GridCoord) -> bool {
        self.contains(coord) && self.cells[coord.to_index(self.height)] != 0
    }

    /// Sample at a linear index
    pub fn sample(&self, index: usize) -> Option<Vec3> {
        self.samples.get(index).copied().flatten()
    }

    /// Sample of a cell
    pub fn sample_at(&self, coord: GridCoord) -> Option<Vec3> {
        if !self.contains(coord) {
            return None;
        }
        self.sample(coord.to_index(self.height))
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    pub fn samples(&self) -> &[Option<Vec3>] {
        &self.samples
    }

    /// Number of traversable cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != 0).count()
    }

    /// Records the ray result for a cell; a hit marks it traversable
    pub(crate) fn record(&mut self, coord: GridCoord, hit: Option<Vec3>) {
        let index = coord.to_index(self.height);
        self.cells[index] = u8::from(hit.is_some());
        self.samples[index] = hit;
    }

    /// Grayscale RGBA8 image of the occupancy, row by row (`(y * width + x) * 4`)
    pub fn preview_rgba(&self) -> Vec<u8> {
        let mut data = vec![0u8; self.width * self.height * 4];
        for x in 0..self.width {
            for y in 0..self.height {
                let offset = (y * self.width + x) * 4;
                let value = self.cell(x, y).saturating_mul(255);
                data[offset] = value;
                data[offset + 1] = value;
                data[offset + 2] = value;
                data[offset + 3] = 255;
            }
        }
        data
    }
}
