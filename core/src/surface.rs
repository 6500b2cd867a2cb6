use core::ops::{Index, IndexMut};
use ndarray::Array2;

use crate::*;

/// Anything that can answer "which color is at this canonical pixel".
///
/// Implementors are expected to be fully loaded; readiness is decided by whoever hands the surface
/// to a [`Match`].
pub trait ClassificationSurface {
    fn size(&self) -> Dim2;

    /// Color at `coords`, which are always within [`size`](Self::size).
    fn sample(&self, coords: Dim2) -> Rgb;
}

impl<S: ClassificationSurface + ?Sized> ClassificationSurface for alloc::boxed::Box<S> {
    fn size(&self) -> Dim2 {
        (**self).size()
    }

    fn sample(&self, coords: Dim2) -> Rgb {
        (**self).sample(coords)
    }
}

/// Decoded reference raster where each pixel color encodes a scoring zone.
#[derive(Clone, Debug, PartialEq)]
pub struct ReferenceSurface {
    pixels: Array2<Rgb>,
}

const HOLE_RADIUS: i64 = 30;
const FIFTEEN_RADIUS: i64 = 120;
const TEN_RADIUS: i64 = 240;
const FIVE_RADIUS: i64 = 360;

impl ReferenceSurface {
    pub fn from_pixels(pixels: Array2<Rgb>) -> Result<Self> {
        let (width, height) = pixels.dim();
        if width == 0 || height == 0 || width > Dim::MAX as usize || height > Dim::MAX as usize {
            return Err(ScoreError::InvalidSurfaceShape);
        }
        Ok(Self { pixels })
    }

    pub fn filled(size: Dim2, color: Rgb) -> Result<Self> {
        Self::from_pixels(Array2::from_elem(size.to_nd_index(), color))
    }

    /// Builds a surface from row-major packed RGB bytes.
    pub fn from_rgb_bytes(size: Dim2, bytes: &[u8]) -> Result<Self> {
        Self::from_packed(size, bytes, 3)
    }

    /// Builds a surface from row-major RGBA bytes, as read back from a canvas. Alpha is ignored.
    pub fn from_rgba_bytes(size: Dim2, bytes: &[u8]) -> Result<Self> {
        Self::from_packed(size, bytes, 4)
    }

    fn from_packed(size: Dim2, bytes: &[u8], stride: usize) -> Result<Self> {
        let (width, height) = (size.0 as usize, size.1 as usize);
        if bytes.len() != width * height * stride {
            return Err(ScoreError::InvalidSurfaceShape);
        }
        let pixels = Array2::from_shape_fn((width, height), |(x, y)| {
            let offset = (y * width + x) * stride;
            Rgb(bytes[offset], bytes[offset + 1], bytes[offset + 2])
        });
        Self::from_pixels(pixels)
    }

    /// Synthesized standard board: concentric rings around the center of the canonical surface,
    /// painted with the reference colors of the hole, the 15, 10 and 5 rings and the gutter.
    pub fn concentric() -> Self {
        let color = |name| Zone::color_of(name).unwrap_or_default();
        let hole = color("Open 20");
        let fifteen = color("Inner Ring");
        let ten = color("Middle Ring");
        let five = color("Outer Ring");
        let gutter = color("Gutter");

        let (width, height) = CANONICAL_SIZE;
        let (center_x, center_y) = (i64::from(width / 2), i64::from(height / 2));
        let pixels = Array2::from_shape_fn(CANONICAL_SIZE.to_nd_index(), |(x, y)| {
            let dx = x as i64 - center_x;
            let dy = y as i64 - center_y;
            let dist_sq = dx * dx + dy * dy;
            if dist_sq < HOLE_RADIUS * HOLE_RADIUS {
                hole
            } else if dist_sq < FIFTEEN_RADIUS * FIFTEEN_RADIUS {
                fifteen
            } else if dist_sq < TEN_RADIUS * TEN_RADIUS {
                ten
            } else if dist_sq < FIVE_RADIUS * FIVE_RADIUS {
                five
            } else {
                gutter
            }
        });
        Self { pixels }
    }

    /// Paints every pixel within `radius` of `center` with `color`.
    pub fn paint_circle(&mut self, center: Dim2, radius: Dim, color: Rgb) {
        let (width, height) = self.size();
        let radius_sq = u64::from(radius) * u64::from(radius);
        let x_end = center.0.saturating_add(radius).min(width - 1);
        let y_end = center.1.saturating_add(radius).min(height - 1);
        for x in center.0.saturating_sub(radius)..=x_end {
            for y in center.1.saturating_sub(radius)..=y_end {
                let dx = u64::from(x.abs_diff(center.0));
                let dy = u64::from(y.abs_diff(center.1));
                if dx * dx + dy * dy <= radius_sq {
                    self[(x, y)] = color;
                }
            }
        }
    }
}

impl ClassificationSurface for ReferenceSurface {
    fn size(&self) -> Dim2 {
        let dim = self.pixels.dim();
        (dim.0 as Dim, dim.1 as Dim)
    }

    fn sample(&self, coords: Dim2) -> Rgb {
        self[coords]
    }
}

impl Index<Dim2> for ReferenceSurface {
    type Output = Rgb;

    fn index(&self, coords: Dim2) -> &Self::Output {
        &self.pixels[coords.to_nd_index()]
    }
}

impl IndexMut<Dim2> for ReferenceSurface {
    fn index_mut(&mut self, coords: Dim2) -> &mut Self::Output {
        &mut self.pixels[coords.to_nd_index()]
    }
}
