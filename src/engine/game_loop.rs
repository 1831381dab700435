/// Fixed-rate tick driver
///
/// Wall-clock time is accumulated and converted into whole simulation ticks.
/// Each tick is one `update()` of the match; drawing happens once per frame
/// after the ticks have run, so a draw never sees a half-advanced tick.
use std::time::{Duration, Instant};

/// Simulation rate (60 ticks per second)
pub const TICK_RATE: u32 = 60;
const FIXED_TIMESTEP_DURATION: Duration = Duration::from_micros(16_667); // ~1/60 second

/// Maximum number of ticks per frame to prevent spiral of death
const MAX_TICKS_PER_FRAME: u32 = 5;

/// Tick timing state
pub struct GameLoop {
    /// Time not yet converted into ticks
    accumulator: Duration,

    /// Time of last frame
    last_frame_time: Instant,

    /// Whether simulation is frozen
    paused: bool,

    /// Current frame number
    frame_count: u64,

    /// Total ticks executed
    tick_count: u64,
}

impl GameLoop {
    pub fn new() -> Self {
        Self {
            accumulator: Duration::ZERO,
            last_frame_time: Instant::now(),
            paused: false,
            frame_count: 0,
            tick_count: 0,
        }
    }

    /// Begin a new frame, returns the number of ticks to run
    pub fn begin_frame(&mut self) -> u32 {
        let now = Instant::now();
        let frame_time = now.duration_since(self.last_frame_time);
        self.last_frame_time = now;
        self.advance(frame_time)
    }

    /// Feed an explicit frame duration, returns the number of ticks to run
    pub fn advance(&mut self, frame_time: Duration) -> u32 {
        self.frame_count += 1;

        // Paused time is dropped, not banked
        if self.paused {
            return 0;
        }

        self.accumulator += frame_time;

        let mut ticks = 0;
        while self.accumulator >= FIXED_TIMESTEP_DURATION && ticks < MAX_TICKS_PER_FRAME {
            self.accumulator -= FIXED_TIMESTEP_DURATION;
            ticks += 1;
        }

        // Whatever is left after the cap is discarded
        if ticks == MAX_TICKS_PER_FRAME {
            self.accumulator = self.accumulator.min(FIXED_TIMESTEP_DURATION);
        }

        self.tick_count += u64::from(ticks);
        ticks
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Simulation frozen");
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            // Reset accumulator to prevent a tick burst
            self.accumulator = Duration::ZERO;
            self.last_frame_time = Instant::now();
            log::info!("Simulation resumed");
        }
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}
