// Sprite decomposition and pixel collision
//
// Contact sheets are split into tightly cropped frames once, at load time.
// Frames carry their own silhouette masks for pixel-accurate hit tests.

mod bitmap;
mod extractor;
mod frame;
mod mask;

pub use bitmap::Bitmap;
pub use extractor::{ExtractOptions, FrameExtractor, Keying, Scaling, Slicing};
pub use frame::{AnimationFrame, FrameSet};
pub use mask::{Component, Mask, BACKGROUND_TOLERANCE};

/// Errors raised while slicing sheets or building masks
///
/// None of these are fatal: callers skip the frame or treat the test as a miss.
#[derive(Debug, thiserror::Error)]
pub enum SpriteError {
    #[error("Degenerate frame: columns {x0}..={x1} contain no visible rows")]
    DegenerateFrame { x0: u32, x1: u32 },

    #[error("Mask unavailable for a {width}x{height} bitmap")]
    MaskUnavailable { width: u32, height: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sprite_error_display() {
        let err = SpriteError::MaskUnavailable {
            width: 0,
            height: 3,
        };
        assert_eq!(err.to_string(), "Mask unavailable for a 0x3 bitmap");
    }
}
