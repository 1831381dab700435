// Tick-based frame cursors
//
// Every animation in a fight advances on whole ticks: a cursor holds a frame
// index plus a countdown, and each playback mode decides what happens when
// the countdown fires. Frame sets may be empty; cursors still count ticks so
// phase timing never depends on whether the art loaded.

use crate::engine::sprite::{AnimationFrame, FrameSet};

/// Position inside a frame set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameCursor {
    index: usize,
    timer: u32,
    ticks_per_frame: u32,
    /// Set once a tail-looping animation has played through
    in_tail: bool,
}

impl FrameCursor {
    pub fn new(ticks_per_frame: u32) -> Self {
        Self {
            index: 0,
            timer: 0,
            ticks_per_frame: ticks_per_frame.max(1),
            in_tail: false,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_in_tail(&self) -> bool {
        self.in_tail
    }

    /// Count one tick, true when the frame should change
    fn step(&mut self) -> bool {
        self.timer += 1;
        if self.timer >= self.ticks_per_frame {
            self.timer = 0;
            true
        } else {
            false
        }
    }

    /// Advance through the set once. Returns true on the tick the index
    /// runs past the end; the caller leaves the animation at that point.
    pub fn play_once(&mut self, len: usize) -> bool {
        if self.step() {
            self.index += 1;
            return self.index >= len;
        }
        false
    }

    /// Advance to the last frame and stay there
    pub fn hold_last(&mut self, len: usize) {
        if self.step() && self.index + 1 < len {
            self.index += 1;
        }
    }

    /// Wrap around the whole set
    pub fn cycle(&mut self, len: usize) {
        if self.step() && len > 0 {
            self.index = (self.index + 1) % len;
        }
    }

    /// Play the set once, then loop only its final `tail` frames
    pub fn cycle_tail(&mut self, len: usize, tail: usize) {
        if !self.step() {
            return;
        }
        let tail_start = len.saturating_sub(tail);
        if !self.in_tail {
            if self.index + 1 < len {
                self.index += 1;
            } else {
                self.in_tail = true;
                self.index = tail_start;
            }
        } else {
            self.index += 1;
            if self.index >= len {
                self.index = tail_start;
            }
        }
    }

    /// The frame under the cursor, clamped to the last frame
    pub fn frame<'a>(&self, frames: &'a FrameSet) -> Option<&'a AnimationFrame> {
        clamped(frames, self.index)
    }
}

/// Fetch a frame, clamping the index into the set
pub fn clamped(frames: &FrameSet, index: usize) -> Option<&AnimationFrame> {
    frames.get(index.min(frames.len().saturating_sub(1)))
}
