// Binary occupancy masks for pixel-accurate collision

use super::{Bitmap, SpriteError};
use crate::core::math::Rect;
use glam::IVec2;
use image::Rgba;

/// Per-channel tolerance used when erasing near-background fringe
pub const BACKGROUND_TOLERANCE: Rgba<u8> = Rgba([30, 30, 30, 255]);

/// Check a colour against a target, each channel strictly within tolerance
fn within_tolerance(pixel: Rgba<u8>, target: Rgba<u8>, tolerance: Rgba<u8>) -> bool {
    (0..4).all(|i| (i16::from(pixel[i]) - i16::from(target[i])).abs() < i16::from(tolerance[i]))
}

/// A 4-connected cluster of set pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Component {
    pub bounds: Rect,
    pub size: usize,
}

/// Binary occupancy grid, `true` where a pixel is solid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl Mask {
    /// Create an all-clear mask
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![false; (width * height) as usize],
        }
    }

    /// Create a mask from a predicate over pixel coordinates
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> bool) -> Self {
        let mut mask = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                mask.bits[(y * width + x) as usize] = f(x, y);
            }
        }
        mask
    }

    fn ensure_area(bitmap: &Bitmap) -> Result<(), SpriteError> {
        if bitmap.is_empty() {
            return Err(SpriteError::MaskUnavailable {
                width: bitmap.width(),
                height: bitmap.height(),
            });
        }
        Ok(())
    }

    /// Every pixel with non-zero alpha
    pub fn from_alpha(bitmap: &Bitmap) -> Result<Self, SpriteError> {
        Self::ensure_area(bitmap)?;
        Ok(Self::from_fn(bitmap.width(), bitmap.height(), |x, y| {
            bitmap.is_visible(x, y)
        }))
    }

    /// Visible pixels minus anything within tolerance of the bitmap's background
    pub fn silhouette(bitmap: &Bitmap, tolerance: Rgba<u8>) -> Result<Self, SpriteError> {
        Self::silhouette_against(bitmap, bitmap.background(), tolerance)
    }

    /// Visible pixels minus anything within tolerance of an explicit background
    pub fn silhouette_against(
        bitmap: &Bitmap,
        background: Rgba<u8>,
        tolerance: Rgba<u8>,
    ) -> Result<Self, SpriteError> {
        Self::ensure_area(bitmap)?;
        let image = bitmap.image();
        Ok(Self::from_fn(bitmap.width(), bitmap.height(), |x, y| {
            let pixel = *image.get_pixel(x, y);
            pixel[3] > 0 && !within_tolerance(pixel, background, tolerance)
        }))
    }

    /// Pixels within tolerance of a target colour
    pub fn from_color(
        bitmap: &Bitmap,
        target: Rgba<u8>,
        tolerance: Rgba<u8>,
    ) -> Result<Self, SpriteError> {
        Self::ensure_area(bitmap)?;
        let image = bitmap.image();
        Ok(Self::from_fn(bitmap.width(), bitmap.height(), |x, y| {
            within_tolerance(*image.get_pixel(x, y), target, tolerance)
        }))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Point test. Coordinates outside the grid are clear.
    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        self.bits[(y as u32 * self.width + x as u32) as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, value: bool) {
        if x < self.width && y < self.height {
            self.bits[(y * self.width + x) as usize] = value;
        }
    }

    /// Number of set pixels
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Check if no pixel is set
    pub fn is_clear(&self) -> bool {
        !self.bits.iter().any(|&b| b)
    }

    /// Tight rect enclosing all set pixels
    pub fn bounding_rect(&self) -> Option<Rect> {
        let mut min = IVec2::new(i32::MAX, i32::MAX);
        let mut max = IVec2::new(i32::MIN, i32::MIN);
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                if self.get(x, y) {
                    min = min.min(IVec2::new(x, y));
                    max = max.max(IVec2::new(x, y));
                }
            }
        }
        if min.x > max.x {
            return None;
        }
        Some(Rect::new(min.x, min.y, max.x - min.x + 1, max.y - min.y + 1))
    }

    /// Check if any set pixel here lands on a set pixel of `other`,
    /// where `offset` is the position of `other`'s origin relative to ours.
    pub fn overlaps(&self, other: &Mask, offset: IVec2) -> bool {
        let ours = Rect::new(0, 0, self.width as i32, self.height as i32);
        let theirs = Rect::new(offset.x, offset.y, other.width as i32, other.height as i32);
        let Some(region) = ours.intersection(&theirs) else {
            return false;
        };
        for y in region.top()..region.bottom() {
            for x in region.left()..region.right() {
                if self.get(x, y) && other.get(x - offset.x, y - offset.y) {
                    return true;
                }
            }
        }
        false
    }

    /// Mirror left-to-right
    pub fn flipped_horizontal(&self) -> Self {
        let w = self.width;
        Self::from_fn(self.width, self.height, |x, y| {
            self.bits[(y * w + (w - 1 - x)) as usize]
        })
    }

    /// Set pixels that touch a clear pixel or the grid edge, in row order
    pub fn outline(&self) -> Vec<IVec2> {
        let mut points = Vec::new();
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                if !self.get(x, y) {
                    continue;
                }
                let edge = [(-1, 0), (1, 0), (0, -1), (0, 1)]
                    .iter()
                    .any(|&(dx, dy)| !self.get(x + dx, y + dy));
                if edge {
                    points.push(IVec2::new(x, y));
                }
            }
        }
        points
    }

    /// Label 4-connected components and return the largest.
    ///
    /// Scans column by column; on equal size the first cluster found wins.
    /// Uses an explicit worklist so large sprites cannot exhaust the stack.
    pub fn largest_component(&self) -> Option<Component> {
        let (w, h) = (self.width as i32, self.height as i32);
        let mut visited = vec![false; self.bits.len()];
        let index = |x: i32, y: i32| (y * w + x) as usize;
        let mut best: Option<Component> = None;
        let mut worklist = Vec::new();

        for x in 0..w {
            for y in 0..h {
                if !self.get(x, y) || visited[index(x, y)] {
                    continue;
                }
                visited[index(x, y)] = true;
                worklist.push(IVec2::new(x, y));
                let (mut min, mut max) = (IVec2::new(x, y), IVec2::new(x, y));
                let mut size = 0;

                while let Some(p) = worklist.pop() {
                    size += 1;
                    min = min.min(p);
                    max = max.max(p);
                    for n in [
                        p - IVec2::X,
                        p + IVec2::X,
                        p - IVec2::Y,
                        p + IVec2::Y,
                    ] {
                        if self.get(n.x, n.y) && !visited[index(n.x, n.y)] {
                            visited[index(n.x, n.y)] = true;
                            worklist.push(n);
                        }
                    }
                }

                if best.map_or(true, |b| size > b.size) {
                    best = Some(Component {
                        bounds: Rect::new(min.x, min.y, max.x - min.x + 1, max.y - min.y + 1),
                        size,
                    });
                }
            }
        }
        best
    }
}
