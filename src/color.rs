use smart_leds::RGB8;

/// RGB color representation re-exported from the `smart-leds` crate.
pub type Rgb = RGB8;

/// A color with an explicit white channel.
///
/// Fields follow the caller-facing argument order. The order the chain
/// expects on the data line is applied by the pixel store, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgbw {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub w: u8,
}

impl Rgbw {
    /// Create a color from the four channel values.
    pub const fn new(r: u8, g: u8, b: u8, w: u8) -> Self {
        Self { r, g, b, w }
    }

    /// Create a color without a white component.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, w: 0 }
    }

    /// Unpack a `0xRRGGBBWW` value.
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_packed(packed: u32) -> Self {
        Self {
            r: (packed >> 24) as u8,
            g: (packed >> 16) as u8,
            b: (packed >> 8) as u8,
            w: packed as u8,
        }
    }
}

impl From<u32> for Rgbw {
    fn from(packed: u32) -> Self {
        Self::from_packed(packed)
    }
}

impl From<(u8, u8, u8)> for Rgbw {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::rgb(r, g, b)
    }
}

impl From<(u8, u8, u8, u8)> for Rgbw {
    fn from((r, g, b, w): (u8, u8, u8, u8)) -> Self {
        Self::new(r, g, b, w)
    }
}

impl From<Rgb> for Rgbw {
    fn from(color: Rgb) -> Self {
        Self::rgb(color.r, color.g, color.b)
    }
}

/// Predefined colors, packed as `0xRRGGBBWW`.
///
/// The `_RGBW` variants light the dedicated white channel of four-channel
/// strips instead of mixing white from the color channels.
pub mod palette {
    use super::Rgbw;

    pub const RED: Rgbw = Rgbw::from_packed(0xff00_0000);
    pub const GREEN: Rgbw = Rgbw::from_packed(0x00ff_0000);
    pub const BLUE: Rgbw = Rgbw::from_packed(0x0000_ff00);
    pub const WHITE: Rgbw = Rgbw::from_packed(0xffff_ff00);
    pub const WHITE_RGBW: Rgbw = Rgbw::from_packed(0x0000_00ff);
    pub const SILVER: Rgbw = Rgbw::from_packed(0xc0c0_c000);
    pub const GRAY: Rgbw = Rgbw::from_packed(0x8080_8000);
    pub const GRAY_RGBW: Rgbw = Rgbw::from_packed(0x0000_0080);
    pub const OLIVE: Rgbw = Rgbw::from_packed(0x8080_0000);
    pub const MAROON: Rgbw = Rgbw::from_packed(0x8000_0000);
    pub const YELLOW: Rgbw = Rgbw::from_packed(0xffff_0000);
    pub const AQUA: Rgbw = Rgbw::from_packed(0x00ff_ff00);
    pub const NAVY: Rgbw = Rgbw::from_packed(0x0000_8000);
    pub const FUCHSIA: Rgbw = Rgbw::from_packed(0xff00_ff00);
    pub const PURPLE: Rgbw = Rgbw::from_packed(0x8000_8000);
    pub const ORANGE: Rgbw = Rgbw::from_packed(0xff8c_0000);
    pub const PINK: Rgbw = Rgbw::from_packed(0xc715_8500);
    pub const SKYBLUE: Rgbw = Rgbw::from_packed(0x5050_f000);
    pub const SKYBLUE2: Rgbw = Rgbw::from_packed(0x007f_7f00);
    pub const TURQUOISE: Rgbw = Rgbw::from_packed(0x30c0_3000);
    pub const BLACK: Rgbw = Rgbw::from_packed(0x0000_0000);
}
