use nalgebra::Vector3;
use super::{
    component::Color,
    error::RenderError,
};

/// Row-major RGB image, indexed by `y * width + x`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        PixelBuffer {
            width,
            height,
            pixels: vec![Vector3::zeros(); width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        if x < self.width && y < self.height {
            Some(self.pixels[self.index(x, y)])
        } else {
            None
        }
    }

    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        assert!(x < self.width && y < self.height, "Pixel ({}, {}) out of bounds!", x, y);
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    /// Copy of the pixels inside `rect`, row-major within the rectangle.
    pub fn region(&self, rect: TileRect) -> Vec<Color> {
        let mut out = Vec::with_capacity(rect.area());
        for y in rect.y..rect.y + rect.height {
            let start = self.index(rect.x, y);
            out.extend_from_slice(&self.pixels[start..start + rect.width as usize]);
        }
        out
    }

    /// Overwrites `rect` with the matching region of `source`, which must have the same size.
    pub fn copy_region_from(&mut self, source: &PixelBuffer, rect: TileRect) {
        assert_eq!(
            (self.width, self.height),
            (source.width, source.height),
            "Pixel buffer sizes differ!"
        );
        for y in rect.y..rect.y + rect.height {
            let start = self.index(rect.x, y);
            let end = start + rect.width as usize;
            self.pixels[start..end].copy_from_slice(&source.pixels[start..end]);
        }
    }

    /// Flat `[r, g, b, r, g, b, ..]` copy, the layout a float texture upload expects.
    pub fn to_rgb_f32(&self) -> Vec<f32> {
        self.pixels.iter()
            .flat_map(|pixel| [pixel.x, pixel.y, pixel.z])
            .collect()
    }

    /// Splits the buffer into one disjoint mutable view per tile of `grid`, in grid order.
    pub fn tiles_mut(&mut self, grid: &TileGrid) -> Vec<TileMut<'_>> {
        assert_eq!(
            (self.width, self.height),
            (grid.width, grid.height),
            "Tile grid doesn't match the pixel buffer!"
        );
        let mut tiles = grid.iter()
            .map(|rect| TileMut {
                rect,
                rows: Vec::with_capacity(rect.height as usize),
            })
            .collect::<Vec<TileMut>>();
        let tile_size = grid.tile_size as usize;
        let rows = grid.rows() as usize;
        for (y, line) in self.pixels.chunks_mut(self.width as usize).enumerate() {
            let row = y / tile_size;
            for (column, segment) in line.chunks_mut(tile_size).enumerate() {
                tiles[column * rows + row].rows.push(segment);
            }
        }
        tiles
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl TileRect {
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Partition of a `width` x `height` image into square tiles, clipped at the far edges.
///
/// Tiles are ordered column by column: left to right, each column top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    width: u32,
    height: u32,
    tile_size: u32,
}

impl TileGrid {
    pub fn new(width: u32, height: u32, tile_size: u32) -> Result<Self, RenderError> {
        if tile_size == 0 {
            return Err(RenderError::InvalidConfiguration("tile size must be non-zero"));
        }
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidConfiguration("image dimensions must be non-zero"));
        }
        Ok(TileGrid {
            width,
            height,
            tile_size,
        })
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn columns(&self) -> u32 {
        self.width.div_ceil(self.tile_size)
    }

    pub fn rows(&self) -> u32 {
        self.height.div_ceil(self.tile_size)
    }

    pub fn len(&self) -> usize {
        self.columns() as usize * self.rows() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn rect(&self, column: u32, row: u32) -> TileRect {
        let x = column * self.tile_size;
        let y = row * self.tile_size;
        TileRect {
            x,
            y,
            width: self.tile_size.min(self.width - x),
            height: self.tile_size.min(self.height - y),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = TileRect> + '_ {
        (0..self.columns())
            .flat_map(move |column| (0..self.rows()).map(move |row| self.rect(column, row)))
    }
}

/// Mutable view of one tile's pixels, borrowed out of a [`PixelBuffer`].
pub struct TileMut<'a> {
    pub rect: TileRect,
    rows: Vec<&'a mut [Color]>,
}

impl<'a> TileMut<'a> {
    pub fn for_each_pixel<F: FnMut(u32, u32, &mut Color)>(&mut self, mut f: F) {
        let TileRect { x, y, .. } = self.rect;
        for (dy, line) in self.rows.iter_mut().enumerate() {
            for (dx, pixel) in line.iter_mut().enumerate() {
                f(x + dx as u32, y + dy as u32, pixel);
            }
        }
    }
}
