// Immutable RGBA pixel grids

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// An immutable RGBA image plus the colour its sheet used as background.
///
/// The background is sampled from pixel (0, 0) when a sheet is loaded and
/// travels with every crop taken from it, so frames can still be keyed later.
#[derive(Debug, Clone)]
pub struct Bitmap {
    image: RgbaImage,
    background: Rgba<u8>,
}

impl Bitmap {
    /// Wrap an image, sampling the background colour from its top-left pixel
    pub fn new(image: RgbaImage) -> Self {
        let background = if image.width() > 0 && image.height() > 0 {
            *image.get_pixel(0, 0)
        } else {
            TRANSPARENT
        };
        Self { image, background }
    }

    /// Wrap an image with an explicit background colour
    pub fn with_background(image: RgbaImage, background: Rgba<u8>) -> Self {
        Self { image, background }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Check if the bitmap has zero area
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub fn background(&self) -> Rgba<u8> {
        self.background
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Sample a pixel, `None` outside the grid
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        if x < self.width() && y < self.height() {
            Some(*self.image.get_pixel(x, y))
        } else {
            None
        }
    }

    /// Exact comparison against the sheet background
    pub fn is_background(&self, x: u32, y: u32) -> bool {
        self.pixel(x, y).map_or(true, |p| p == self.background)
    }

    /// Whether a pixel carries any alpha
    pub fn is_visible(&self, x: u32, y: u32) -> bool {
        self.pixel(x, y).map_or(false, |p| p[3] > 0)
    }

    /// Copy out a sub-rectangle. The region is clamped to the bitmap.
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> Bitmap {
        let image = imageops::crop_imm(&self.image, x, y, width, height).to_image();
        Self::with_background(image, self.background)
    }

    /// Replace every exact-background pixel with full transparency
    pub fn keyed(&self) -> Bitmap {
        let background = self.background;
        let mut image = self.image.clone();
        for pixel in image.pixels_mut() {
            if *pixel == background {
                *pixel = TRANSPARENT;
            }
        }
        Self::with_background(image, background)
    }

    /// Mirror left-to-right
    pub fn flipped_horizontal(&self) -> Bitmap {
        Self::with_background(imageops::flip_horizontal(&self.image), self.background)
    }

    /// Resample to a new size with smooth filtering
    pub fn resized(&self, width: u32, height: u32) -> Bitmap {
        let image = imageops::resize(&self.image, width.max(1), height.max(1), FilterType::Triangle);
        Self::with_background(image, self.background)
    }
}
