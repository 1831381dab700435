// Contact-sheet decomposition
//
// A sheet is a horizontal strip of poses on a flat background colour.
// Frames are found by collapsing ink-bearing columns into runs, then each run
// is cropped to its own vertical extent and optionally to its largest blob.

use super::{Bitmap, FrameSet, Mask, SpriteError};
use log::{debug, warn};

/// How background pixels are told apart from sprite ink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keying {
    /// Anything that differs from the colour at (0, 0) is ink
    Background,
    /// Anything with non-zero alpha is ink
    Alpha,
}

/// How candidate frames are located on the sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slicing {
    /// Maximal runs of ink-bearing columns
    ColumnRuns,
    /// Equal square cells as wide as the sheet is tall
    SquareCells,
    /// The whole image is one pose
    Whole,
}

/// Post-processing resample applied to every extracted frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scaling {
    None,
    Factor(u32),
    Height(u32),
}

/// Extraction settings for one sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExtractOptions {
    pub keying: Keying,
    pub slicing: Slicing,
    /// Crop each run to the first/last ink row inside its own columns
    pub tight_vertical: bool,
    /// Keep only the largest 4-connected cluster of each frame
    pub isolate_largest: bool,
    pub reverse: bool,
    pub scaling: Scaling,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            keying: Keying::Background,
            slicing: Slicing::ColumnRuns,
            tight_vertical: true,
            isolate_largest: false,
            reverse: false,
            scaling: Scaling::None,
        }
    }
}

impl ExtractOptions {
    /// Column runs with a tight vertical crop
    pub fn tight() -> Self {
        Self::default()
    }

    /// Tight runs, then cropped to the largest blob to drop stray pixels
    pub fn isolated() -> Self {
        Self {
            isolate_largest: true,
            ..Self::default()
        }
    }

    /// Column runs that keep the full sheet height
    pub fn full_height() -> Self {
        Self {
            tight_vertical: false,
            ..Self::default()
        }
    }

    pub fn square_cells() -> Self {
        Self {
            slicing: Slicing::SquareCells,
            ..Self::default()
        }
    }

    /// A single pose image cropped to its largest blob
    pub fn whole_image() -> Self {
        Self {
            slicing: Slicing::Whole,
            isolate_largest: true,
            ..Self::default()
        }
    }

    /// Tight runs detected from real transparency
    pub fn alpha() -> Self {
        Self {
            keying: Keying::Alpha,
            ..Self::default()
        }
    }

    pub fn reversed(mut self) -> Self {
        self.reverse = true;
        self
    }

    pub fn with_scaling(mut self, scaling: Scaling) -> Self {
        self.scaling = scaling;
        self
    }
}

/// Splits sheets into tightly cropped frames
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameExtractor {
    options: ExtractOptions,
}

impl FrameExtractor {
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> ExtractOptions {
        self.options
    }

    /// Decompose a sheet into an ordered frame set.
    ///
    /// Falls back to square cells when no runs are found, and to the whole
    /// sheet when that yields nothing. A zero-area sheet yields no frames.
    pub fn extract(&self, sheet: &Bitmap) -> FrameSet {
        let mut frames = match self.options.slicing {
            Slicing::ColumnRuns => self.slice_runs(sheet),
            Slicing::SquareCells => Vec::new(),
            Slicing::Whole => self.slice_whole(sheet),
        };

        if frames.is_empty() {
            if self.options.slicing != Slicing::SquareCells {
                debug!("No frames detected on {}x{} sheet, slicing square cells", sheet.width(), sheet.height());
            }
            frames = self.slice_square_cells(sheet);
        }

        if frames.is_empty() && !sheet.is_empty() {
            debug!("Square slicing failed, using the whole sheet as one frame");
            frames.push(self.key(sheet));
        }

        if self.options.reverse {
            frames.reverse();
        }

        let set = FrameSet::from_bitmaps(frames);
        match self.options.scaling {
            Scaling::None => set,
            Scaling::Factor(factor) => set.scaled(factor),
            Scaling::Height(height) => set.scaled_to_height(height),
        }
    }

    fn is_ink(&self, sheet: &Bitmap, x: u32, y: u32) -> bool {
        match self.options.keying {
            Keying::Background => !sheet.is_background(x, y),
            Keying::Alpha => sheet.is_visible(x, y),
        }
    }

    fn key(&self, bitmap: &Bitmap) -> Bitmap {
        match self.options.keying {
            Keying::Background => bitmap.keyed(),
            Keying::Alpha => bitmap.clone(),
        }
    }

    /// Inclusive column ranges that contain any ink
    pub fn column_runs(&self, sheet: &Bitmap) -> Vec<(u32, u32)> {
        let mut runs = Vec::new();
        let mut run_start = None;
        for x in 0..sheet.width() {
            let has_ink = (0..sheet.height()).any(|y| self.is_ink(sheet, x, y));
            match (has_ink, run_start) {
                (true, None) => run_start = Some(x),
                (false, Some(start)) => {
                    runs.push((start, x - 1));
                    run_start = None;
                }
                _ => {}
            }
        }
        if let Some(start) = run_start {
            runs.push((start, sheet.width() - 1));
        }
        runs
    }

    fn slice_runs(&self, sheet: &Bitmap) -> Vec<Bitmap> {
        self.column_runs(sheet)
            .into_iter()
            .filter_map(|(x0, x1)| match self.crop_run(sheet, x0, x1) {
                Ok(frame) => Some(frame),
                Err(err) => {
                    warn!("Skipping run: {}", err);
                    None
                }
            })
            .collect()
    }

    /// Crop one column run to its vertical extent and key it
    fn crop_run(&self, sheet: &Bitmap, x0: u32, x1: u32) -> Result<Bitmap, SpriteError> {
        let width = x1 - x0 + 1;
        let (y0, height) = if self.options.tight_vertical {
            let rows: Vec<u32> = (0..sheet.height())
                .filter(|&y| (x0..=x1).any(|x| self.is_ink(sheet, x, y)))
                .collect();
            match (rows.first(), rows.last()) {
                (Some(&min_y), Some(&max_y)) => (min_y, max_y - min_y + 1),
                _ => return Err(SpriteError::DegenerateFrame { x0, x1 }),
            }
        } else {
            (0, sheet.height())
        };

        let frame = self.key(&sheet.crop(x0, y0, width, height));
        if self.options.isolate_largest {
            Ok(Self::crop_to_largest(frame))
        } else {
            Ok(frame)
        }
    }

    fn slice_whole(&self, sheet: &Bitmap) -> Vec<Bitmap> {
        if sheet.is_empty() {
            return Vec::new();
        }
        let frame = self.key(sheet);
        if self.options.isolate_largest {
            vec![Self::crop_to_largest(frame)]
        } else {
            vec![frame]
        }
    }

    fn slice_square_cells(&self, sheet: &Bitmap) -> Vec<Bitmap> {
        let cell = sheet.height();
        if cell == 0 || sheet.width() == 0 {
            return Vec::new();
        }
        let count = (sheet.width() / cell).max(1);
        (0..count)
            .map(|i| self.key(&sheet.crop(i * cell, 0, cell, sheet.height())))
            .collect()
    }

    /// Crop a keyed frame to its largest connected cluster.
    /// Frames without any visible cluster are returned unchanged.
    fn crop_to_largest(frame: Bitmap) -> Bitmap {
        let Ok(mask) = Mask::from_alpha(&frame) else {
            return frame;
        };
        match mask.largest_component() {
            Some(component) => {
                let b = component.bounds;
                frame.crop(b.x as u32, b.y as u32, b.width as u32, b.height as u32)
            }
            None => frame,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    const BG: Rgba<u8> = Rgba([0, 0, 255, 255]);
    const INK: Rgba<u8> = Rgba([255, 0, 0, 255]);

    /// Sheet with ink in the given inclusive rectangles (x0, y0, x1, y1)
    fn sheet(width: u32, height: u32, blocks: &[(u32, u32, u32, u32)]) -> Bitmap {
        Bitmap::new(RgbaImage::from_fn(width, height, |x, y| {
            let inside = blocks
                .iter()
                .any(|&(x0, y0, x1, y1)| x >= x0 && x <= x1 && y >= y0 && y <= y1);
            if inside {
                INK
            } else {
                BG
            }
        }))
    }

    fn dims(set: &FrameSet) -> Vec<(u32, u32)> {
        set.iter().map(|f| (f.width(), f.height())).collect()
    }

    #[test]
    fn test_column_runs() {
        let s = sheet(20, 10, &[(2, 1, 4, 8), (8, 3, 8, 5), (15, 0, 19, 9)]);
        let runs = FrameExtractor::default().column_runs(&s);
        assert_eq!(runs, vec![(2, 4), (8, 8), (15, 19)]);
    }

    #[test]
    fn test_blank_run_is_degenerate() {
        let s = sheet(20, 10, &[(2, 1, 4, 8)]);
        let extractor = FrameExtractor::new(ExtractOptions::tight());
        assert!(matches!(
            extractor.crop_run(&s, 10, 12),
            Err(SpriteError::DegenerateFrame { x0: 10, x1: 12 })
        ));
        assert_eq!(extractor.crop_run(&s, 2, 4).map(|f| f.height()).ok(), Some(8));
    }

    #[test]
    fn test_tight_vertical_crop() {
        let s = sheet(20, 10, &[(2, 1, 4, 8), (8, 3, 8, 5)]);
        let set = FrameExtractor::new(ExtractOptions::tight()).extract(&s);
        assert_eq!(dims(&set), vec![(3, 8), (1, 3)]);
    }

    #[test]
    fn test_frames_are_keyed() {
        // A run with an L-shape leaves background inside its crop rect
        let s = sheet(10, 10, &[(1, 1, 1, 5), (1, 5, 4, 5)]);
        let set = FrameExtractor::new(ExtractOptions::tight()).extract(&s);
        let frame = set.get(0).unwrap();
        assert_eq!((frame.width(), frame.height()), (4, 5));
        assert!(!frame.bitmap().is_visible(3, 0));
        assert!(frame.bitmap().is_visible(0, 0));
        assert_eq!(frame.bitmap().background(), BG);
    }

    #[test]
    fn test_full_height_keeps_sheet_rows() {
        let s = sheet(20, 10, &[(2, 1, 4, 8)]);
        let set = FrameExtractor::new(ExtractOptions::full_height()).extract(&s);
        assert_eq!(dims(&set), vec![(3, 10)]);
    }

    #[test]
    fn test_isolate_largest_drops_strays() {
        // Body 5x6 plus a stray pixel in the same column run, separated by a gap row
        let s = sheet(12, 12, &[(2, 4, 6, 9), (2, 1, 2, 1)]);
        let tight = FrameExtractor::new(ExtractOptions::tight()).extract(&s);
        assert_eq!(dims(&tight), vec![(5, 9)]);

        let isolated = FrameExtractor::new(ExtractOptions::isolated()).extract(&s);
        assert_eq!(dims(&isolated), vec![(5, 6)]);
    }

    #[test]
    fn test_square_fallback_when_keying_fails() {
        // Uniform sheet: no column differs from the background
        let s = Bitmap::new(RgbaImage::from_pixel(30, 10, BG));
        let set = FrameExtractor::default().extract(&s);
        assert_eq!(dims(&set), vec![(10, 10), (10, 10), (10, 10)]);
    }

    #[test]
    fn test_square_fallback_narrow_sheet() {
        let s = Bitmap::new(RgbaImage::from_pixel(4, 10, BG));
        let set = FrameExtractor::default().extract(&s);
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(0).unwrap().width(), 4);
    }

    #[test]
    fn test_zero_area_sheet_yields_nothing() {
        let s = Bitmap::new(RgbaImage::new(0, 0));
        assert!(FrameExtractor::default().extract(&s).is_empty());
    }

    #[test]
    fn test_square_cells_slicing() {
        let s = sheet(25, 8, &[(1, 1, 2, 2)]);
        let set = FrameExtractor::new(ExtractOptions::square_cells()).extract(&s);
        assert_eq!(dims(&set), vec![(8, 8), (8, 8), (8, 8)]);
    }

    #[test]
    fn test_whole_image_isolates_pose() {
        let s = sheet(16, 16, &[(3, 2, 10, 14), (14, 0, 14, 0)]);
        let set = FrameExtractor::new(ExtractOptions::whole_image()).extract(&s);
        assert_eq!(dims(&set), vec![(8, 13)]);
    }

    #[test]
    fn test_alpha_keying() {
        let image = RgbaImage::from_fn(10, 6, |x, y| {
            if (2..=3).contains(&x) && (1..=4).contains(&y) || x == 7 && y == 2 {
                INK
            } else {
                Rgba([0, 0, 0, 0])
            }
        });
        let set = FrameExtractor::new(ExtractOptions::alpha()).extract(&Bitmap::new(image));
        assert_eq!(dims(&set), vec![(2, 4), (1, 1)]);
    }

    #[test]
    fn test_reverse_and_scale() {
        let s = sheet(20, 10, &[(2, 1, 4, 8), (8, 3, 8, 5)]);
        let options = ExtractOptions::tight()
            .reversed()
            .with_scaling(Scaling::Factor(3));
        let set = FrameExtractor::new(options).extract(&s);
        assert_eq!(dims(&set), vec![(3, 9), (9, 24)]);
    }
}
