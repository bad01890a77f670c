//! Graphics support via embedded-graphics
//!
//! With the `graphics` feature, [`FrameBuffer`] and [`BufferedDisplay`]
//! implement [`DrawTarget`] for [`BinaryColor`], and [`RgbImage`] implements
//! it for [`Rgb888`]. The latter is the path for text: render glyphs into an
//! RGB canvas, then copy it onto the panel with
//! [`BufferedDisplay::draw_image`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_graphics::{
//!     mono_font::{ascii::FONT_6X10, MonoTextStyle},
//!     pixelcolor::BinaryColor,
//!     prelude::*,
//!     primitives::{Circle, PrimitiveStyle, Rectangle},
//!     text::Text,
//! };
//! use sh1106::{BufferedDisplay, Builder, Dimensions, Display, Interface};
//! # use core::convert::Infallible;
//! # use embedded_hal::digital::OutputPin;
//! # use embedded_hal::spi::SpiBus;
//! # struct MockSpi;
//! # impl embedded_hal::spi::ErrorType for MockSpi { type Error = Infallible; }
//! # impl SpiBus for MockSpi {
//! #     fn read(&mut self, _words: &mut [u8]) -> Result<(), Self::Error> { Ok(()) }
//! #     fn write(&mut self, _words: &[u8]) -> Result<(), Self::Error> { Ok(()) }
//! #     fn transfer(&mut self, _read: &mut [u8], _write: &[u8]) -> Result<(), Self::Error> { Ok(()) }
//! #     fn transfer_in_place(&mut self, _words: &mut [u8]) -> Result<(), Self::Error> { Ok(()) }
//! #     fn flush(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # let interface = Interface::new(MockSpi, MockPin, MockPin, MockPin);
//! # let dims = match Dimensions::new(128, 64) {
//! #     Ok(dims) => dims,
//! #     Err(_) => return,
//! # };
//! # let config = match Builder::new().dimensions(dims).build() {
//! #     Ok(config) => config,
//! #     Err(_) => return,
//! # };
//! let mut display = BufferedDisplay::new(Display::new(interface, config));
//!
//! let _ = Rectangle::new(Point::new(0, 0), Size::new(128, 64))
//!     .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
//!     .draw(&mut display);
//!
//! let _ = Circle::new(Point::new(90, 20), 24)
//!     .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
//!     .draw(&mut display);
//!
//! let _ = Text::new(
//!     "Hello, OLED!",
//!     Point::new(6, 30),
//!     MonoTextStyle::new(&FONT_6X10, BinaryColor::On),
//! )
//! .draw(&mut display);
//!
//! // Push the frame to the panel
//! let _ = display.update();
//! ```

use core::convert::Infallible;
use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point as GfxPoint, Size},
    pixelcolor::BinaryColor,
    prelude::Pixel,
};

use crate::buffered::BufferedDisplay;
use crate::color::Color;
use crate::framebuffer::FrameBuffer;
use crate::interface::DisplayInterface;

impl<B> DrawTarget for FrameBuffer<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<Iter>(&mut self, pixels: Iter) -> Result<(), Self::Error>
    where
        Iter: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(GfxPoint { x, y }, color) in pixels {
            self.set_pixel(x, y, color.is_on());
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        FrameBuffer::clear(self, Color::from(color));
        Ok(())
    }
}

impl<B> OriginDimensions for FrameBuffer<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }
}

impl<I, B> DrawTarget for BufferedDisplay<I, B>
where
    I: DisplayInterface,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<Iter>(&mut self, pixels: Iter) -> Result<(), Self::Error>
    where
        Iter: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.frame_mut().draw_iter(pixels)
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        BufferedDisplay::clear(self, Color::from(color));
        Ok(())
    }
}

impl<I, B> OriginDimensions for BufferedDisplay<I, B>
where
    I: DisplayInterface,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    fn size(&self) -> Size {
        self.frame().size()
    }
}

#[cfg(feature = "alloc")]
mod rgb {
    use super::*;
    use crate::image::RgbImage;
    use embedded_graphics_core::pixelcolor::{Rgb888, RgbColor};

    impl DrawTarget for RgbImage {
        type Color = Rgb888;
        type Error = Infallible;

        fn draw_iter<Iter>(&mut self, pixels: Iter) -> Result<(), Self::Error>
        where
            Iter: IntoIterator<Item = Pixel<Self::Color>>,
        {
            for Pixel(GfxPoint { x, y }, color) in pixels {
                self.set_rgb(x, y, (color.r(), color.g(), color.b()));
            }
            Ok(())
        }
    }

    impl OriginDimensions for RgbImage {
        fn size(&self) -> Size {
            Size::new(self.width(), self.height())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Dimensions, Rotation};
    use crate::display::tests::{MockInterface, test_display};
    use crate::geometry::{Point, Rect};
    use alloc::vec;
    use alloc::vec::Vec;
    use embedded_graphics::{
        mono_font::{MonoTextStyle, ascii::FONT_6X10},
        pixelcolor::Rgb888,
        prelude::*,
        primitives::{Line, PrimitiveStyle, Rectangle},
        text::{Baseline, Text},
    };

    fn frame(rotation: Rotation) -> FrameBuffer<Vec<u8>> {
        FrameBuffer::new(Dimensions::new(128, 64).unwrap(), rotation, vec![0u8; 1024]).unwrap()
    }

    #[test]
    fn test_size_follows_rotation() {
        assert_eq!(frame(Rotation::Rotate0).size(), Size::new(128, 64));
        assert_eq!(frame(Rotation::Rotate90).size(), Size::new(64, 128));
        assert_eq!(frame(Rotation::Rotate270).size(), Size::new(64, 128));
    }

    #[test]
    fn test_filled_rectangle_sets_pixels() {
        let mut fb = frame(Rotation::Rotate0);
        Rectangle::new(GfxPoint::new(2, 2), Size::new(4, 3))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut fb)
            .unwrap();
        let lit: u32 = fb.as_bytes().iter().map(|b| b.count_ones()).sum();
        assert_eq!(lit, 12);
        assert_eq!(fb.pixel(2, 2), Some(true));
        assert_eq!(fb.pixel(5, 4), Some(true));
        assert_eq!(fb.pixel(6, 4), Some(false));
    }

    #[test]
    fn test_offscreen_pixels_are_skipped() {
        let mut fb = frame(Rotation::Rotate0);
        Line::new(GfxPoint::new(-10, 0), GfxPoint::new(200, 0))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(&mut fb)
            .unwrap();
        let lit: u32 = fb.as_bytes().iter().map(|b| b.count_ones()).sum();
        assert_eq!(lit, 128);
    }

    #[test]
    fn test_draw_target_clear() {
        let mut fb = frame(Rotation::Rotate180);
        DrawTarget::clear(&mut fb, BinaryColor::On).unwrap();
        assert!(fb.as_bytes().iter().all(|b| *b == 0xFF));
    }

    #[test]
    fn test_buffered_display_text_lights_pixels() {
        let mut display: BufferedDisplay<MockInterface, Vec<u8>> =
            BufferedDisplay::try_new(test_display(128, 64), vec![0u8; 1024]).unwrap();
        Text::with_baseline(
            "Hi",
            GfxPoint::new(0, 0),
            MonoTextStyle::new(&FONT_6X10, BinaryColor::On),
            Baseline::Top,
        )
        .draw(&mut display)
        .unwrap();

        let lit: u32 = display.frame().as_bytes().iter().map(|b| b.count_ones()).sum();
        assert!(lit > 0);
        // glyphs stay inside the 12 x 10 text box
        for y in 0..64 {
            for x in 0..128 {
                if display.pixel(x, y) == Some(true) {
                    assert!(x < 12 && y < 10);
                }
            }
        }
    }

    #[cfg(feature = "alloc")]
    #[test]
    fn test_text_through_rgb_canvas() {
        use crate::image::RgbImage;

        let mut canvas = RgbImage::new(30, 10, (255, 255, 255));
        Text::with_baseline(
            "OK",
            GfxPoint::new(0, 0),
            MonoTextStyle::new(&FONT_6X10, Rgb888::BLACK),
            Baseline::Top,
        )
        .draw(&mut canvas)
        .unwrap();

        let mut display: BufferedDisplay<MockInterface, Vec<u8>> =
            BufferedDisplay::try_new(test_display(128, 64), vec![0u8; 1024]).unwrap();
        display
            .draw_image(Rect::new(Point::new(40, 20), 30, 10), &canvas, Point::new(0, 0))
            .unwrap();

        let mut dark = 0;
        for y in 0..10 {
            for x in 0..30 {
                let lit = canvas.get_rgb(x, y) == Some((0, 0, 0));
                if lit {
                    dark += 1;
                }
                assert_eq!(display.pixel(40 + x, 20 + y), Some(lit));
            }
        }
        assert!(dark > 0);
    }
}
