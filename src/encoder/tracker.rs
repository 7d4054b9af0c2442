//! Encoder position and velocity tracking.

/// Cooperative-side view of the encoder.
///
/// `sample` is called once per loop pass with the decoder count and a
/// millisecond clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncoderTracker {
    inches_per_count: f32,
    alpha: f32,
    last_counts: i32,
    last_delta: i32,
    position: f32,
    velocity: f32,
    velocity_smoothed: f32,
    last_sample_ms: u32,
}

impl EncoderTracker {
    /// Create a tracker.
    ///
    /// `alpha` is the EMA weight of the newest velocity sample.
    pub fn new(inches_per_count: f32, alpha: f32, now_ms: u32) -> Self {
        Self {
            inches_per_count,
            alpha,
            last_counts: 0,
            last_delta: 0,
            position: 0.0,
            velocity: 0.0,
            velocity_smoothed: 0.0,
            last_sample_ms: now_ms,
        }
    }

    /// Update from a decoder count. Returns the position in inches.
    ///
    /// Velocity only updates when the clock has advanced since the previous
    /// sample.
    pub fn sample(&mut self, counts: i32, now_ms: u32) -> f32 {
        self.last_delta = counts.wrapping_sub(self.last_counts);
        self.last_counts = counts;
        self.position = counts as f32 * self.inches_per_count;

        let elapsed_ms = now_ms.wrapping_sub(self.last_sample_ms);
        if elapsed_ms != 0 {
            let dt = elapsed_ms as f32 / 1000.0;
            self.last_sample_ms = now_ms;
            self.velocity = self.last_delta as f32 * self.inches_per_count / dt;
            self.velocity_smoothed =
                self.alpha * self.velocity + (1.0 - self.alpha) * self.velocity_smoothed;
        }

        self.position
    }

    /// Forget the count history after the decoder has been zeroed.
    pub fn reset(&mut self) {
        self.last_counts = 0;
        self.last_delta = 0;
        self.position = 0.0;
        self.velocity = 0.0;
        self.velocity_smoothed = 0.0;
    }

    /// Position at the last sample, inches.
    #[inline]
    pub fn position(&self) -> f32 {
        self.position
    }

    /// Unsmoothed velocity at the last sample, in/s.
    #[inline]
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Smoothed velocity, in/s.
    #[inline]
    pub fn velocity_smoothed(&self) -> f32 {
        self.velocity_smoothed
    }

    /// Count at the last sample.
    #[inline]
    pub fn counts(&self) -> i32 {
        self.last_counts
    }

    /// Count change between the last two samples.
    #[inline]
    pub fn last_delta(&self) -> i32 {
        self.last_delta
    }
}
