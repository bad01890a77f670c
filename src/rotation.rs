//! Coordinate rotation utilities
//!
//! This module maps logical pixel coordinates to a location in the
//! page-addressed frame buffer, taking the display rotation into account.
//!
//! The SH1106 stores pixels in vertical bytes: byte `page * width + x`
//! holds rows `page * 8 ..= page * 8 + 7` of column `x`, with the least
//! significant bit at the top.
//!
//! ## Rotation Modes
//!
//! - **Rotate0**: Native orientation
//! - **Rotate90**: 90° clockwise, width and height swapped
//! - **Rotate180**: 180° rotation, origin at bottom-right
//! - **Rotate270**: 270° clockwise (or 90° counter-clockwise)
//!
//! ## Example
//!
//! ```
//! use sh1106::{rotation::apply_rotation, Rotation};
//!
//! // On a 128x64 panel, pixel (0,0) is byte 0, bit 0 (LSB)
//! let (idx, bit) = apply_rotation(0, 0, 128, 64, Rotation::Rotate0);
//! assert_eq!(idx, 0);
//! assert_eq!(bit, 0x01);
//!
//! // Pixel (3,9) is in page 1, so byte 128 + 3, bit 1
//! let (idx, bit) = apply_rotation(3, 9, 128, 64, Rotation::Rotate0);
//! assert_eq!(idx, 131);
//! assert_eq!(bit, 0x02);
//! ```

use crate::config::Rotation;

/// Apply rotation transformation to get buffer index and bit mask
///
/// # Arguments
///
/// * `x` - Logical X coordinate
/// * `y` - Logical Y coordinate
/// * `width` - Physical panel width in pixels
/// * `height` - Physical panel height in pixels (multiple of 8)
/// * `rotation` - Rotation mode
///
/// The caller guarantees `(x, y)` is inside the logical (rotated) area.
///
/// # Returns
///
/// `(byte_index, bit_mask)` into a buffer of `width * height / 8` bytes.
pub fn apply_rotation(x: u32, y: u32, width: u32, height: u32, rotation: Rotation) -> (usize, u8) {
    let (px, py) = match rotation {
        Rotation::Rotate0 => (x, y),
        Rotation::Rotate90 => (width - 1 - y, x),
        Rotation::Rotate180 => (width - 1 - x, height - 1 - y),
        Rotation::Rotate270 => (y, height - 1 - x),
    };
    let index = ((py / 8) * width + px) as usize;
    let bit = 0x01 << (py % 8);
    (index, bit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate0_first_and_last_pixel() {
        assert_eq!(apply_rotation(0, 0, 128, 64, Rotation::Rotate0), (0, 0x01));
        assert_eq!(
            apply_rotation(127, 63, 128, 64, Rotation::Rotate0),
            (7 * 128 + 127, 0x80)
        );
    }

    #[test]
    fn test_rotate180_maps_origin_to_last_pixel() {
        assert_eq!(
            apply_rotation(0, 0, 128, 64, Rotation::Rotate180),
            (7 * 128 + 127, 0x80)
        );
    }

    #[test]
    fn test_rotate90_origin_is_top_right() {
        // logical area is 64 wide, 128 tall
        assert_eq!(apply_rotation(0, 0, 128, 64, Rotation::Rotate90), (127, 0x01));
        assert_eq!(
            apply_rotation(63, 127, 128, 64, Rotation::Rotate90),
            (7 * 128, 0x80)
        );
    }

    #[test]
    fn test_rotate270_origin_is_bottom_left() {
        assert_eq!(
            apply_rotation(0, 0, 128, 64, Rotation::Rotate270),
            (7 * 128, 0x80)
        );
    }

    #[test]
    fn test_every_pixel_maps_to_unique_bit() {
        let mut seen = [0u8; 16 * 16 / 8];
        for y in 0..16 {
            for x in 0..16 {
                let (idx, bit) = apply_rotation(x, y, 16, 16, Rotation::Rotate90);
                assert_eq!(seen[idx] & bit, 0);
                seen[idx] |= bit;
            }
        }
        assert!(seen.iter().all(|byte| *byte == 0xFF));
    }
}
