#![no_std]

pub mod channel;
pub mod color;
pub mod encoder;
pub mod pixel;
pub mod pulse;
pub mod strip;
pub mod timing;

#[cfg(any(feature = "esp32", feature = "esp32c3"))]
pub mod esp32;

pub use channel::{ChannelPool, ChannelsExhausted};
pub use color::{Rgb, Rgbw, palette};
pub use encoder::{encode_frame, pulse_item_count};
pub use pixel::{ChannelModel, Direction, PixelBuffer};
pub use pulse::{ChannelId, PulseItem};
pub use strip::{Strip, StripError, byte_buffer_size, pulse_buffer_size};
pub use timing::TimingProfile;

pub use embassy_time::Duration;

/// Abstract pulse-generation engine
///
/// Implement this trait to support different hardware platforms.
/// The strip driver is generic over this trait; exactly one
/// implementation is compiled in per hardware family.
pub trait PulseEngine {
    type Error: core::fmt::Debug;

    /// Number of independent transmit channels the engine offers.
    fn channel_count(&self) -> u8;

    /// Software latency between queueing two consecutive frames, in
    /// seconds. Taken out of the nominal reset gap during calibration.
    fn frame_turnaround(&self) -> f32;

    /// Bring up the transmit driver on `channel`. Called once per claim,
    /// before any other per-channel operation.
    fn install(&mut self, channel: ChannelId) -> Result<(), Self::Error>;

    /// Tear down the transmit driver on `channel` and return its data pin
    /// to an inactive state.
    fn uninstall(&mut self, channel: ChannelId);

    /// Seconds per counter tick on an installed channel.
    fn tick_period(&self, channel: ChannelId) -> f32;

    /// Queue a pulse sequence for emission. Returns once the sequence is
    /// accepted; emission continues in hardware.
    fn write_items(
        &mut self,
        channel: ChannelId,
        items: &[PulseItem],
    ) -> Result<(), Self::Error>;

    /// Block until any in-flight transmission on `channel` has drained,
    /// or until `timeout` passes.
    fn wait_idle(&mut self, channel: ChannelId, timeout: Duration) -> Result<(), Self::Error>;
}
