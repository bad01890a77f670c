//! Page-addressed 1-bit frame buffer
//!
//! [`FrameBuffer`] owns the pixel memory that [`Display`](crate::Display)
//! streams to the controller. The layout matches controller RAM: one byte
//! per column per 8-row page, least significant bit at the top.
//!
//! Pixel writes outside the buffer are silently ignored, so callers never
//! have to bounds-check before drawing.
//!
//! ## Example
//!
//! ```
//! use sh1106::{Color, Dimensions, FrameBuffer, Rotation};
//!
//! let dims = match Dimensions::new(128, 64) {
//!     Ok(dims) => dims,
//!     Err(_) => return,
//! };
//! let mut storage = [0u8; 1024];
//! let mut frame = match FrameBuffer::new(dims, Rotation::Rotate0, &mut storage[..]) {
//!     Ok(frame) => frame,
//!     Err(_) => return,
//! };
//!
//! frame.set_pixel(0, 0, true);
//! frame.set_pixel(-1, 500, true); // ignored
//! assert_eq!(frame.pixel(0, 0), Some(true));
//! assert_eq!(frame.page(0).map(|page| page[0]), Some(0x01));
//!
//! frame.clear(Color::Off);
//! assert_eq!(frame.pixel(0, 0), Some(false));
//! ```

use crate::color::Color;
use crate::config::{Dimensions, Rotation};
use crate::error::BuilderError;
use crate::geometry::Rect;
use crate::rotation::apply_rotation;

/// 1-bit frame buffer in controller page layout
///
/// ## Type Parameters
///
/// * `B` - Backing storage, e.g. `[u8; 1024]`, `&mut [u8]` or `Vec<u8>`
pub struct FrameBuffer<B> {
    buffer: B,
    dimensions: Dimensions,
    rotation: Rotation,
}

impl<B> FrameBuffer<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Wrap existing storage as a frame buffer
    ///
    /// Storage contents are used as-is; call [`clear`](Self::clear) for a
    /// known starting state. Bytes past `dimensions.buffer_size()` are
    /// never touched.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::BufferTooSmall`] if the storage is shorter
    /// than `dimensions.buffer_size()`.
    pub fn new(dimensions: Dimensions, rotation: Rotation, buffer: B) -> Result<Self, BuilderError> {
        let required = dimensions.buffer_size();
        let provided = buffer.as_ref().len();
        if provided < required {
            return Err(BuilderError::BufferTooSmall { required, provided });
        }
        Ok(Self {
            buffer,
            dimensions,
            rotation,
        })
    }

    /// Physical panel dimensions
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Rotation applied to pixel coordinates
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Logical width in pixels (after rotation)
    pub fn width(&self) -> u32 {
        if self.rotation.is_transposed() {
            u32::from(self.dimensions.height)
        } else {
            u32::from(self.dimensions.width)
        }
    }

    /// Logical height in pixels (after rotation)
    pub fn height(&self) -> u32 {
        if self.rotation.is_transposed() {
            u32::from(self.dimensions.width)
        } else {
            u32::from(self.dimensions.height)
        }
    }

    /// Logical drawing area, always anchored at (0, 0)
    pub fn bounds(&self) -> Rect {
        Rect::with_size(self.width(), self.height())
    }

    /// Set every pixel to `color`
    pub fn clear(&mut self, color: Color) {
        let size = self.dimensions.buffer_size();
        self.buffer.as_mut()[..size].fill(color.fill_byte());
    }

    /// Turn a single pixel on or off
    ///
    /// Coordinates outside [`bounds`](Self::bounds) are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, on: bool) {
        let Some((index, bit)) = self.locate(x, y) else {
            return;
        };
        let byte = &mut self.buffer.as_mut()[index];
        if on {
            *byte |= bit;
        } else {
            *byte &= !bit;
        }
    }

    /// Read a single pixel back, `None` outside the buffer
    pub fn pixel(&self, x: i32, y: i32) -> Option<bool> {
        let (index, bit) = self.locate(x, y)?;
        Some(self.buffer.as_ref()[index] & bit != 0)
    }

    /// Bytes of one page (`width` bytes), `None` past the last page
    pub fn page(&self, page: usize) -> Option<&[u8]> {
        if page >= self.dimensions.pages() {
            return None;
        }
        let width = self.dimensions.width as usize;
        let start = page * width;
        Some(&self.as_bytes()[start..start + width])
    }

    /// Iterator over all pages, top to bottom
    pub fn pages(&self) -> impl Iterator<Item = &[u8]> {
        self.as_bytes().chunks_exact(self.dimensions.width as usize)
    }

    /// Raw buffer in controller layout, `dimensions.buffer_size()` bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer.as_ref()[..self.dimensions.buffer_size()]
    }

    /// Give back the storage
    pub fn release(self) -> B {
        self.buffer
    }

    fn locate(&self, x: i32, y: i32) -> Option<(usize, u8)> {
        let x = u32::try_from(x).ok()?;
        let y = u32::try_from(y).ok()?;
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(apply_rotation(
            x,
            y,
            u32::from(self.dimensions.width),
            u32::from(self.dimensions.height),
            self.rotation,
        ))
    }
}

#[cfg(feature = "alloc")]
impl FrameBuffer<alloc::vec::Vec<u8>> {
    /// Allocate a zeroed (all off) frame buffer on the heap
    pub fn allocate(dimensions: Dimensions, rotation: Rotation) -> Self {
        Self {
            buffer: alloc::vec![0u8; dimensions.buffer_size()],
            dimensions,
            rotation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn frame(rotation: Rotation) -> FrameBuffer<alloc::vec::Vec<u8>> {
        FrameBuffer::new(Dimensions::new(128, 64).unwrap(), rotation, vec![0u8; 1024]).unwrap()
    }

    #[test]
    fn test_new_rejects_short_storage() {
        let dims = Dimensions::new(128, 64).unwrap();
        let result = FrameBuffer::new(dims, Rotation::Rotate0, vec![0u8; 1023]);
        assert!(matches!(
            result,
            Err(BuilderError::BufferTooSmall {
                required: 1024,
                provided: 1023
            })
        ));
    }

    #[test]
    fn test_set_then_clear_restores_byte() {
        let mut fb = frame(Rotation::Rotate0);
        fb.clear(Color::Off);
        fb.set_pixel(5, 13, true);
        let original = fb.as_bytes().to_vec();

        for (x, y) in [(0, 0), (5, 12), (5, 14), (127, 63), (64, 31)] {
            fb.set_pixel(x, y, true);
            assert_eq!(fb.pixel(x, y), Some(true));
            fb.set_pixel(x, y, false);
            assert_eq!(fb.as_bytes(), &original[..]);
        }
        assert_eq!(fb.pixel(5, 13), Some(true));
    }

    #[test]
    fn test_set_pixel_flips_exactly_one_bit() {
        let mut fb = frame(Rotation::Rotate0);
        fb.set_pixel(7, 10, true);
        let lit: u32 = fb.as_bytes().iter().map(|b| b.count_ones()).sum();
        assert_eq!(lit, 1);
        assert_eq!(fb.as_bytes()[128 + 7], 0b0000_0100);
    }

    #[test]
    fn test_out_of_bounds_is_noop() {
        let mut fb = frame(Rotation::Rotate0);
        fb.clear(Color::Off);
        for (x, y) in [(-1, 0), (0, -1), (128, 0), (0, 64), (i32::MAX, i32::MIN)] {
            fb.set_pixel(x, y, true);
            assert_eq!(fb.pixel(x, y), None);
        }
        assert!(fb.as_bytes().iter().all(|b| *b == 0));
    }

    #[test]
    fn test_clear_on_reads_back_on_everywhere() {
        let mut fb = frame(Rotation::Rotate0);
        fb.clear(Color::On);
        for y in 0..64 {
            for x in 0..128 {
                assert_eq!(fb.pixel(x, y), Some(true));
            }
        }
    }

    #[test]
    fn test_clear_does_not_touch_spare_storage() {
        let dims = Dimensions::new(16, 8).unwrap();
        let mut fb = FrameBuffer::new(dims, Rotation::Rotate0, vec![0xAAu8; 20]).unwrap();
        fb.clear(Color::On);
        let storage = fb.release();
        assert!(storage[..16].iter().all(|b| *b == 0xFF));
        assert!(storage[16..].iter().all(|b| *b == 0xAA));
    }

    #[test]
    fn test_page_views() {
        let mut fb = frame(Rotation::Rotate0);
        fb.set_pixel(3, 63, true);
        assert_eq!(fb.page(7).unwrap()[3], 0x80);
        assert!(fb.page(8).is_none());
        assert_eq!(fb.pages().count(), 8);
    }

    #[test]
    fn test_rotated_bounds() {
        let fb = frame(Rotation::Rotate90);
        assert_eq!(fb.bounds(), Rect::with_size(64, 128));
        assert_eq!(fb.pixel(63, 127), Some(false));
        assert_eq!(fb.pixel(64, 0), None);
    }

    #[test]
    #[cfg(feature = "alloc")]
    fn test_allocate_is_zeroed() {
        let fb = FrameBuffer::allocate(Dimensions::new(128, 32).unwrap(), Rotation::Rotate0);
        assert_eq!(fb.as_bytes().len(), 512);
        assert!(fb.as_bytes().iter().all(|b| *b == 0));
    }
}
