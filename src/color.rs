//! Pixel color for monochrome OLED panels
//!
//! The SH1106 drives one bit per pixel. In the frame buffer a set bit means
//! the pixel is lit ([`Color::On`]); the encoder inverts every byte on the
//! way to the controller.
//!
//! ## Example
//!
//! ```
//! use sh1106::Color;
//!
//! assert_eq!(Color::On.fill_byte(), 0xFF);
//! assert_eq!(Color::Off.fill_byte(), 0x00);
//! assert_eq!(Color::from(true), Color::On);
//! ```

/// Monochrome pixel state
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Color {
    /// Dark pixel
    #[default]
    Off,
    /// Lit pixel
    On,
}

impl Color {
    /// Byte value that sets all eight pixels of a page column to this color
    pub fn fill_byte(self) -> u8 {
        match self {
            Self::Off => 0x00,
            Self::On => 0xFF,
        }
    }

    /// Whether the pixel is lit
    pub fn is_on(self) -> bool {
        self == Self::On
    }
}

impl From<bool> for Color {
    fn from(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}

impl From<Color> for bool {
    fn from(color: Color) -> Self {
        color.is_on()
    }
}

#[cfg(feature = "graphics")]
impl From<embedded_graphics_core::pixelcolor::BinaryColor> for Color {
    fn from(color: embedded_graphics_core::pixelcolor::BinaryColor) -> Self {
        Self::from(color.is_on())
    }
}

#[cfg(feature = "graphics")]
impl From<Color> for embedded_graphics_core::pixelcolor::BinaryColor {
    fn from(color: Color) -> Self {
        if color.is_on() { Self::On } else { Self::Off }
    }
}
