//! WS2812B bit timings and their calibration to peripheral ticks.

use crate::pulse::PulseItem;

/// 0-bit high time per the WS2812B datasheet.
pub const T0H_SEC: f32 = 0.000_000_400;
/// 0-bit low time.
pub const T0L_SEC: f32 = 0.000_000_850;
/// 1-bit high time.
pub const T1H_SEC: f32 = 0.000_000_800;
/// 1-bit low time.
pub const T1L_SEC: f32 = 0.000_000_450;
/// Low period after which the chain latches the received frame.
pub const TRST_SEC: f32 = 0.000_050_000;

/// Bit and reset durations in peripheral counter ticks.
///
/// Calibrated once when a strip's engine channel comes up and immutable
/// afterwards. All fields are tick counts, never nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingProfile {
    pub zero_high: u16,
    pub zero_low: u16,
    pub one_high: u16,
    pub one_low: u16,
    pub reset_gap: u16,
}

impl TimingProfile {
    /// Convert the nominal durations into ticks of a counter running at
    /// `tick_period` seconds per tick, rounding to the nearest tick.
    ///
    /// `frame_turnaround` is the software latency between queueing two
    /// consecutive frames; it is taken out of the reset gap so the
    /// effective inter-frame gap stays at the nominal 50us no matter how
    /// quickly frames are submitted. A turnaround at or above the nominal
    /// gap leaves the gap unadjusted.
    pub fn calibrate(tick_period: f32, frame_turnaround: f32) -> Self {
        let reset_sec = if TRST_SEC > frame_turnaround {
            TRST_SEC - frame_turnaround
        } else {
            TRST_SEC
        };
        Self {
            zero_high: ticks(T0H_SEC, tick_period),
            zero_low: ticks(T0L_SEC, tick_period),
            one_high: ticks(T1H_SEC, tick_period),
            one_low: ticks(T1L_SEC, tick_period),
            reset_gap: ticks(reset_sec, tick_period),
        }
    }

    /// Pulse pair encoding a 0-bit.
    pub const fn zero(&self) -> PulseItem {
        PulseItem::new(self.zero_high, self.zero_low)
    }

    /// Pulse pair encoding a 1-bit.
    pub const fn one(&self) -> PulseItem {
        PulseItem::new(self.one_high, self.one_low)
    }

    /// Low-only item that ends a frame and latches the chain.
    pub const fn reset(&self) -> PulseItem {
        PulseItem::reset(self.reset_gap)
    }
}

/// Round a duration to the nearest whole tick.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn ticks(duration: f32, tick_period: f32) -> u16 {
    (duration / tick_period + 0.5) as u16
}
