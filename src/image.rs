//! RGB pixel sources for [`BufferedDisplay::draw_image`](crate::BufferedDisplay::draw_image)
//!
//! Anything that can report an RGB triple per pixel can be drawn onto the
//! panel. Each pixel is reduced to a single on/off decision by averaging its
//! channels: dark pixels light the OLED, bright pixels leave it dark.
//!
//! ## Example
//!
//! ```
//! use sh1106::image::{is_lit, luminance};
//!
//! assert_eq!(luminance(0, 0, 0), 0);
//! assert!(is_lit(0, 0, 0));
//! assert!(is_lit(127, 127, 127));
//! assert!(!is_lit(128, 128, 128));
//! assert!(!is_lit(255, 255, 255));
//! ```

use crate::geometry::Rect;

/// Averaged luminance below this value lights the pixel
pub const LUMINANCE_THRESHOLD: u8 = 128;

/// Source of RGB pixels
pub trait ImageSource {
    /// Area with valid pixels; may be offset from the origin
    fn bounds(&self) -> Rect;

    /// RGB value at `(x, y)`
    ///
    /// Only called for points inside [`bounds`](Self::bounds).
    fn rgb(&self, x: i32, y: i32) -> (u8, u8, u8);
}

impl<T: ImageSource + ?Sized> ImageSource for &T {
    fn bounds(&self) -> Rect {
        (**self).bounds()
    }

    fn rgb(&self, x: i32, y: i32) -> (u8, u8, u8) {
        (**self).rgb(x, y)
    }
}

/// Mean of the three channels widened to 16 bits, scaled back to 8
///
/// Rounds slightly above a plain 8-bit mean, so `(127, 128, 128)` reaches
/// the threshold.
pub fn luminance(r: u8, g: u8, b: u8) -> u8 {
    let sum = u32::from(r) + u32::from(g) + u32::from(b);
    ((sum * 257 / 3) >> 8) as u8
}

/// Whether an RGB pixel turns into a lit OLED pixel
pub fn is_lit(r: u8, g: u8, b: u8) -> bool {
    luminance(r, g, b) < LUMINANCE_THRESHOLD
}

#[cfg(feature = "alloc")]
pub use canvas::RgbImage;

#[cfg(feature = "alloc")]
mod canvas {
    use alloc::vec;
    use alloc::vec::Vec;

    use super::ImageSource;
    use crate::geometry::{Point, Rect};

    /// Heap-allocated RGB888 canvas
    ///
    /// Typically filled by a text or shape rasterizer, then handed to
    /// [`BufferedDisplay::draw_image`](crate::BufferedDisplay::draw_image).
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct RgbImage {
        width: u32,
        height: u32,
        data: Vec<u8>,
    }

    impl RgbImage {
        /// Create a canvas filled with `background`
        pub fn new(width: u32, height: u32, background: (u8, u8, u8)) -> Self {
            let pixels = width as usize * height as usize;
            let mut data = vec![0u8; pixels * 3];
            for pixel in data.chunks_exact_mut(3) {
                pixel.copy_from_slice(&[background.0, background.1, background.2]);
            }
            Self {
                width,
                height,
                data,
            }
        }

        /// Canvas width in pixels
        pub fn width(&self) -> u32 {
            self.width
        }

        /// Canvas height in pixels
        pub fn height(&self) -> u32 {
            self.height
        }

        /// Overwrite one pixel; points outside the canvas are ignored
        pub fn set_rgb(&mut self, x: i32, y: i32, rgb: (u8, u8, u8)) {
            if let Some(offset) = self.offset(x, y) {
                self.data[offset..offset + 3].copy_from_slice(&[rgb.0, rgb.1, rgb.2]);
            }
        }

        /// Read one pixel, `None` outside the canvas
        pub fn get_rgb(&self, x: i32, y: i32) -> Option<(u8, u8, u8)> {
            let offset = self.offset(x, y)?;
            Some((
                self.data[offset],
                self.data[offset + 1],
                self.data[offset + 2],
            ))
        }

        fn offset(&self, x: i32, y: i32) -> Option<usize> {
            if !self.bounds().contains(Point::new(x, y)) {
                return None;
            }
            Some((y as usize * self.width as usize + x as usize) * 3)
        }
    }

    impl ImageSource for RgbImage {
        fn bounds(&self) -> Rect {
            Rect::with_size(self.width, self.height)
        }

        fn rgb(&self, x: i32, y: i32) -> (u8, u8, u8) {
            self.get_rgb(x, y).unwrap_or((0xFF, 0xFF, 0xFF))
        }
    }
}
