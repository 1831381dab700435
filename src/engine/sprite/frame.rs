// Animation frames and ordered frame sets

use super::{Bitmap, Mask, BACKGROUND_TOLERANCE};
use std::cell::OnceCell;
use std::ops::Range;
use std::rc::Rc;

/// A single cropped animation bitmap
#[derive(Debug, Clone)]
pub struct AnimationFrame {
    bitmap: Bitmap,
    mirrored: OnceCell<Bitmap>,
    silhouette: OnceCell<Option<Mask>>,
    mirrored_silhouette: OnceCell<Option<Mask>>,
}

impl AnimationFrame {
    pub fn new(bitmap: Bitmap) -> Self {
        Self {
            bitmap,
            mirrored: OnceCell::new(),
            silhouette: OnceCell::new(),
            mirrored_silhouette: OnceCell::new(),
        }
    }

    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    /// The bitmap as seen facing the other way
    pub fn mirrored(&self) -> &Bitmap {
        self.mirrored.get_or_init(|| self.bitmap.flipped_horizontal())
    }

    /// Pick the source or mirrored bitmap
    pub fn oriented(&self, mirror: bool) -> &Bitmap {
        if mirror {
            self.mirrored()
        } else {
            &self.bitmap
        }
    }

    pub fn width(&self) -> u32 {
        self.bitmap.width()
    }

    pub fn height(&self) -> u32 {
        self.bitmap.height()
    }

    /// Body silhouette, built on first use and cached.
    /// `None` when the frame has no area.
    pub fn silhouette(&self) -> Option<&Mask> {
        self.silhouette
            .get_or_init(|| Mask::silhouette(&self.bitmap, BACKGROUND_TOLERANCE).ok())
            .as_ref()
    }

    /// Silhouette matching `oriented(mirror)`
    pub fn oriented_silhouette(&self, mirror: bool) -> Option<&Mask> {
        if !mirror {
            return self.silhouette();
        }
        self.mirrored_silhouette
            .get_or_init(|| self.silhouette().map(Mask::flipped_horizontal))
            .as_ref()
    }
}

/// Ordered, immutable, cheaply shared sequence of frames
#[derive(Debug, Clone, Default)]
pub struct FrameSet {
    frames: Rc<Vec<AnimationFrame>>,
}

impl FrameSet {
    pub fn new(frames: Vec<AnimationFrame>) -> Self {
        Self {
            frames: Rc::new(frames),
        }
    }

    pub fn from_bitmaps(bitmaps: impl IntoIterator<Item = Bitmap>) -> Self {
        Self::new(bitmaps.into_iter().map(AnimationFrame::new).collect())
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&AnimationFrame> {
        self.frames.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnimationFrame> {
        self.frames.iter()
    }

    /// Copy out a sub-range, clamped to the available frames
    pub fn slice(&self, range: Range<usize>) -> FrameSet {
        let end = range.end.min(self.len());
        let start = range.start.min(end);
        Self::new(self.frames[start..end].to_vec())
    }

    pub fn reversed(&self) -> FrameSet {
        Self::new(self.frames.iter().rev().cloned().collect())
    }

    /// Join several sets in order
    pub fn concat(sets: &[FrameSet]) -> FrameSet {
        Self::new(sets.iter().flat_map(|s| s.iter().cloned()).collect())
    }

    /// Scale every frame by an integer factor
    pub fn scaled(&self, factor: u32) -> FrameSet {
        Self::from_bitmaps(self.iter().map(|f| {
            f.bitmap()
                .resized(f.width() * factor, f.height() * factor)
        }))
    }

    /// Scale every frame to a fixed height, keeping aspect ratio
    pub fn scaled_to_height(&self, height: u32) -> FrameSet {
        Self::from_bitmaps(self.iter().filter(|f| f.height() > 0).map(|f| {
            let scale = height as f32 / f.height() as f32;
            let width = ((f.width() as f32 * scale) as u32).max(1);
            f.bitmap().resized(width, height.max(1))
        }))
    }
}
