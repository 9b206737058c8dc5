//! ESP32 RMT backend.
//!
//! Wraps a configured RMT transmit channel as a [`PulseEngine`]. Pin
//! routing and the clock divider are settled when the esp-hal channel is
//! built, so the strip only sees the resulting counter rate:
//!
//! ```ignore
//! let rmt = Rmt::new(peripherals.RMT, Rate::from_mhz(80)).unwrap();
//! let config = TxChannelConfig::default()
//!     .with_clk_divider(2)
//!     .with_idle_output_level(Level::Low)
//!     .with_idle_output(true)
//!     .with_carrier_modulation(false);
//! let channel = rmt.channel0.configure(led_pin, config)?;
//!
//! // 80 MHz source / divider 2 = 40 MHz counter
//! let engine: RmtEngine<_, { pulse_buffer_size(LEDS, MODEL) }> =
//!     RmtEngine::new(channel, Rate::from_mhz(40));
//! ```

use embassy_time::Duration;
use esp_hal::gpio::Level;
use esp_hal::rmt::{Error as RmtError, PulseCode, TxChannel};
use esp_hal::time::Rate;
use heapless::Vec;

use crate::PulseEngine;
use crate::pulse::{ChannelId, PulseItem};

/// Transmit channels the RMT block offers on this chip.
#[cfg(feature = "esp32")]
pub const RMT_CHANNELS: u8 = 8;
#[cfg(all(feature = "esp32c3", not(feature = "esp32")))]
pub const RMT_CHANNELS: u8 = 2;

// Latency between two consecutive frame submissions, verified by
// measuring pulse timing with a scope.
#[cfg(feature = "esp32")]
const FRAME_TURNAROUND_SEC: f32 = 0.000_015;
#[cfg(all(feature = "esp32c3", not(feature = "esp32")))]
const FRAME_TURNAROUND_SEC: f32 = 0.000_022;

/// Errors from the RMT backend.
#[derive(Debug)]
pub enum RmtEngineError {
    /// No transmit channel is attached, either because install never ran
    /// or because a failed transmission consumed it.
    NotInstalled,
    /// The pulse sequence does not fit the code buffer.
    BufferSizeExceeded,
    /// The RMT peripheral rejected the transmission.
    Transmission(RmtError),
}

/// [`PulseEngine`] over one esp-hal RMT transmit channel.
///
/// `BUF` is the code-buffer capacity; size it with
/// [`pulse_buffer_size`](crate::strip::pulse_buffer_size).
pub struct RmtEngine<Tx: TxChannel, const BUF: usize> {
    channel: Option<Tx>,
    codes: Vec<u32, BUF>,
    tick_period: f32,
}

impl<Tx: TxChannel, const BUF: usize> RmtEngine<Tx, BUF> {
    /// Wrap a configured transmit channel whose counter runs at
    /// `tick_rate` (the RMT source clock divided by the channel's clock
    /// divider).
    #[allow(clippy::cast_precision_loss)]
    pub fn new(channel: Tx, tick_rate: Rate) -> Self {
        Self {
            channel: Some(channel),
            codes: Vec::new(),
            tick_period: 1.0 / tick_rate.as_hz() as f32,
        }
    }
}

fn rmt_code(item: PulseItem) -> u32 {
    if item.is_reset() {
        // Low-only gap; the zero-length tail doubles as the end marker.
        PulseCode::new(Level::Low, item.low, Level::Low, 0)
    } else {
        PulseCode::new(Level::High, item.high, Level::Low, item.low)
    }
}

impl<Tx: TxChannel, const BUF: usize> PulseEngine for RmtEngine<Tx, BUF> {
    type Error = RmtEngineError;

    fn channel_count(&self) -> u8 {
        RMT_CHANNELS
    }

    fn frame_turnaround(&self) -> f32 {
        FRAME_TURNAROUND_SEC
    }

    fn install(&mut self, _channel: ChannelId) -> Result<(), Self::Error> {
        // Configuration happened when the esp-hal channel was built; only
        // verify we still hold it.
        if self.channel.is_some() {
            Ok(())
        } else {
            Err(RmtEngineError::NotInstalled)
        }
    }

    fn uninstall(&mut self, _channel: ChannelId) {
        // Dropping the channel releases it and leaves the pin at its
        // configured idle level.
        self.channel = None;
    }

    fn tick_period(&self, _channel: ChannelId) -> f32 {
        self.tick_period
    }

    fn write_items(&mut self, _channel: ChannelId, items: &[PulseItem]) -> Result<(), Self::Error> {
        self.codes.clear();
        for &item in items {
            self.codes
                .push(rmt_code(item))
                .map_err(|_| RmtEngineError::BufferSizeExceeded)?;
        }

        let channel = self.channel.take().ok_or(RmtEngineError::NotInstalled)?;
        // The single-shot transaction borrows `codes`, so the frame is
        // drained here rather than in `wait_idle`.
        let transaction = channel
            .transmit(&self.codes)
            .map_err(RmtEngineError::Transmission)?;
        match transaction.wait() {
            Ok(channel) => {
                self.channel = Some(channel);
                Ok(())
            }
            Err((err, channel)) => {
                self.channel = Some(channel);
                Err(RmtEngineError::Transmission(err))
            }
        }
    }

    fn wait_idle(&mut self, _channel: ChannelId, _timeout: Duration) -> Result<(), Self::Error> {
        // write_items completes the transfer before returning, so the
        // line is already idle between frames.
        Ok(())
    }
}
