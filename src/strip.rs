//! The strip driver: owns the pixel store, claims an engine channel and
//! serializes frame transmissions.

use embassy_time::Duration;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::PulseEngine;
use crate::channel::{ChannelPool, ChannelsExhausted};
use crate::color::Rgbw;
use crate::encoder::{encode_frame, pulse_item_count};
use crate::pixel::{ChannelModel, Direction, IndexOutOfRange, PixelBuffer};
use crate::pulse::{ChannelId, PulseItem};
use crate::timing::{TRST_SEC, TimingProfile};

/// Byte capacity needed for `led_count` LEDs of `model`.
pub const fn byte_buffer_size(led_count: usize, model: ChannelModel) -> usize {
    led_count * model.bytes_per_led()
}

/// Pulse-item capacity needed for `led_count` LEDs of `model`.
pub const fn pulse_buffer_size(led_count: usize, model: ChannelModel) -> usize {
    pulse_item_count(byte_buffer_size(led_count, model))
}

/// Low time a freshly claimed line is held for, so the chain latches into
/// reset before the first frame.
const RESET_SETTLE: Duration = Duration::from_micros((TRST_SEC * 1_000_000.0) as u64);

/// Errors surfaced by strip operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripError<E> {
    /// Every engine channel is already claimed by another strip.
    ChannelsExhausted,
    /// The engine rejected installation or a transmission.
    Hardware(E),
    /// A write addressed an LED past the end of the strip.
    IndexOutOfRange { index: usize, led_count: usize },
    /// Initialization failed earlier; the strip is permanently out of
    /// service.
    InitFailed,
}

impl<E> From<IndexOutOfRange> for StripError<E> {
    fn from(err: IndexOutOfRange) -> Self {
        Self::IndexOutOfRange {
            index: err.index,
            led_count: err.led_count,
        }
    }
}

/// Everything claimed and derived by the one-shot initialization. Created
/// only once the channel claim and driver install have succeeded, dropped
/// as a unit at teardown.
struct Active<const BYTES: usize, const ITEMS: usize> {
    channel: ChannelId,
    timing: TimingProfile,
    pixels: PixelBuffer<BYTES>,
    items: [PulseItem; ITEMS],
}

enum State<const BYTES: usize, const ITEMS: usize> {
    /// Constructed but untouched. Claiming hardware is deferred to the
    /// first operation so platform bring-up can finish first.
    Cold,
    Active(Active<BYTES, ITEMS>),
    /// Initialization failed once; the claim was returned and the strip
    /// stays unusable.
    Failed,
}

/// Driver for one WS2812/SK6812 chain.
///
/// `BYTES` and `ITEMS` size the pixel store and the pulse workspace; fill
/// them in with [`byte_buffer_size`] and [`pulse_buffer_size`] for the
/// strip's LED count and channel model.
///
/// Construction is cheap and touches no hardware. The first operation
/// claims a channel from the pool, installs the engine driver on it and
/// calibrates the bit timings against the channel's counter clock; a
/// failure there is final.
///
/// ```ignore
/// static POOL: ChannelPool = ChannelPool::new(8);
///
/// const LEDS: usize = 8;
/// const MODEL: ChannelModel = ChannelModel::Rgb;
///
/// let mut strip: Strip<_, { byte_buffer_size(LEDS, MODEL) }, { pulse_buffer_size(LEDS, MODEL) }> =
///     Strip::new(engine, &POOL, LEDS, MODEL);
/// strip.update(palette::NAVY, 0, true)?;
/// ```
pub struct Strip<'p, E: PulseEngine, const BYTES: usize, const ITEMS: usize> {
    engine: E,
    pool: &'p ChannelPool,
    led_count: usize,
    model: ChannelModel,
    brightness: u8,
    clear_on_drop: bool,
    state: State<BYTES, ITEMS>,
}

impl<'p, E: PulseEngine, const BYTES: usize, const ITEMS: usize> Strip<'p, E, BYTES, ITEMS> {
    /// Create a driver for `led_count` LEDs behind `engine`.
    ///
    /// # Panics
    ///
    /// If `BYTES` or `ITEMS` cannot hold `led_count` LEDs of `model`.
    pub fn new(engine: E, pool: &'p ChannelPool, led_count: usize, model: ChannelModel) -> Self {
        assert!(
            byte_buffer_size(led_count, model) <= BYTES,
            "BYTES capacity too small for LED count"
        );
        assert!(
            pulse_buffer_size(led_count, model) <= ITEMS,
            "ITEMS capacity too small for LED count"
        );
        Self {
            engine,
            pool,
            led_count,
            model,
            brightness: u8::MAX,
            clear_on_drop: true,
            state: State::Cold,
        }
    }

    /// Set one LED and, when `show` is true, transmit the frame.
    ///
    /// `color` accepts [`Rgbw`], the [`palette`](crate::color::palette)
    /// constants, packed `0xRRGGBBWW` values, `(r, g, b[, w])` tuples and
    /// `smart_leds` `RGB8`. The white channel is ignored on three-channel
    /// strips.
    pub fn update(
        &mut self,
        color: impl Into<Rgbw>,
        index: usize,
        show: bool,
    ) -> Result<(), StripError<E::Error>> {
        self.ensure_initialized()?;
        let State::Active(active) = &mut self.state else {
            return Err(StripError::InitFailed);
        };
        active.pixels.set(index, color.into())?;
        if show {
            self.show()?;
        }
        Ok(())
    }

    /// Set every LED to the same color.
    pub fn update_all(
        &mut self,
        color: impl Into<Rgbw>,
        show: bool,
    ) -> Result<(), StripError<E::Error>> {
        self.ensure_initialized()?;
        let State::Active(active) = &mut self.state else {
            return Err(StripError::InitFailed);
        };
        active.pixels.fill(color.into());
        if show {
            self.show()?;
        }
        Ok(())
    }

    /// Rotate the strip contents `steps` LEDs with wraparound.
    ///
    /// Forward moves LED 0 towards LED 1 and wraps the last LED to the
    /// front.
    pub fn rotate(
        &mut self,
        steps: usize,
        direction: Direction,
        show: bool,
    ) -> Result<(), StripError<E::Error>> {
        self.ensure_initialized()?;
        let State::Active(active) = &mut self.state else {
            return Err(StripError::InitFailed);
        };
        active.pixels.rotate(steps, direction);
        if show {
            self.show()?;
        }
        Ok(())
    }

    /// Turn every LED off and transmit immediately.
    pub fn clear(&mut self) -> Result<(), StripError<E::Error>> {
        self.ensure_initialized()?;
        let State::Active(active) = &mut self.state else {
            return Err(StripError::InitFailed);
        };
        active.pixels.clear();
        self.show()
    }

    /// Transmit the current buffer.
    ///
    /// Blocks until any previous transmission has drained, then re-encodes
    /// the whole buffer and queues it; the new frame itself is emitted by
    /// the hardware while this call returns.
    pub fn show(&mut self) -> Result<(), StripError<E::Error>> {
        self.ensure_initialized()?;
        let State::Active(active) = &mut self.state else {
            return Err(StripError::InitFailed);
        };
        transmit(&mut self.engine, active, self.brightness).map_err(StripError::Hardware)
    }

    /// Set the brightness applied at transmit time (255 = full, the
    /// default). The stored colors are never modified.
    pub fn set_brightness(&mut self, brightness: u8) -> Result<(), StripError<E::Error>> {
        self.ensure_initialized()?;
        self.brightness = brightness;
        Ok(())
    }

    /// Keep or clear the LEDs when the strip is dropped (default: clear).
    pub fn set_clear_on_drop(&mut self, clear: bool) {
        self.clear_on_drop = clear;
    }

    /// Wire-order channel bytes currently stored for one LED, or `None`
    /// before initialization and past the end of the strip.
    pub fn led_bytes(&self, index: usize) -> Option<&[u8]> {
        match &self.state {
            State::Active(active) => active.pixels.led(index),
            _ => None,
        }
    }

    /// Channel layout configured at construction.
    pub const fn channel_model(&self) -> ChannelModel {
        self.model
    }

    /// Number of LEDs configured at construction.
    pub const fn led_count(&self) -> usize {
        self.led_count
    }

    /// Number of strips the engine can drive concurrently.
    pub fn max_instances(&self) -> u8 {
        self.engine.channel_count()
    }

    /// One-shot initialization guard run at the top of every operation.
    fn ensure_initialized(&mut self) -> Result<(), StripError<E::Error>> {
        match self.state {
            State::Active(_) => return Ok(()),
            State::Failed => return Err(StripError::InitFailed),
            State::Cold => {}
        }

        let channel = match self.pool.acquire() {
            Ok(channel) => channel,
            Err(ChannelsExhausted) => {
                self.state = State::Failed;
                return Err(StripError::ChannelsExhausted);
            }
        };
        if let Err(err) = self.engine.install(channel) {
            self.pool.release(channel);
            self.state = State::Failed;
            return Err(StripError::Hardware(err));
        }

        let timing = TimingProfile::calibrate(
            self.engine.tick_period(channel),
            self.engine.frame_turnaround(),
        );

        #[cfg(feature = "esp32-log")]
        println!(
            "[Strip.init] channel={} zero={}/{} one={}/{} reset={}",
            channel,
            timing.zero_high,
            timing.zero_low,
            timing.one_high,
            timing.one_low,
            timing.reset_gap
        );

        let pixels = PixelBuffer::new(self.led_count, self.model);

        // Hold the line down long enough for the chain to latch into
        // reset before the first frame.
        embassy_time::block_for(RESET_SETTLE);

        self.state = State::Active(Active {
            channel,
            timing,
            pixels,
            items: [PulseItem::default(); ITEMS],
        });
        Ok(())
    }
}

impl<E: PulseEngine, const BYTES: usize, const ITEMS: usize> Drop for Strip<'_, E, BYTES, ITEMS> {
    fn drop(&mut self) {
        let State::Active(active) = &mut self.state else {
            return;
        };
        if self.clear_on_drop {
            active.pixels.clear();
            // Errors cannot be reported from drop.
            let _ = transmit(&mut self.engine, active, self.brightness);
        }
        // Flush whatever is still in flight before tearing down.
        let _ = self.engine.wait_idle(active.channel, Duration::MAX);
        self.engine.uninstall(active.channel);
        self.pool.release(active.channel);
    }
}

/// Drain the previous transmission, re-encode the whole buffer and queue
/// it. The item workspace is reused across frames, so the drain must come
/// first.
fn transmit<E: PulseEngine, const BYTES: usize, const ITEMS: usize>(
    engine: &mut E,
    active: &mut Active<BYTES, ITEMS>,
    brightness: u8,
) -> Result<(), E::Error> {
    let used = pulse_item_count(active.pixels.as_bytes().len());
    engine.wait_idle(active.channel, Duration::MAX)?;
    encode_frame(
        active.pixels.as_bytes(),
        &active.timing,
        brightness,
        &mut active.items[..used],
    );
    engine.write_items(active.channel, &active.items[..used])
}
