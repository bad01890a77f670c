//! SH1106 command definitions
//!
//! This module defines the command bytes used to control the SH1106
//! OLED controller. Commands are sent over SPI with the DC pin low for
//! commands and high for data.
//!
//! ## Transaction Structure
//!
//! Every byte group is sent as one bus transaction:
//! 1. Set DC (low for command, high for data)
//! 2. Assert CS (low)
//! 3. Send the bytes
//! 4. Deassert CS (high)
//!
//! ## Example
//!
//! ```rust,no_run
//! use sh1106::{command, DisplayInterface, Interface};
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
//! # let mut interface = Interface::new(MockSpi, MockPin, MockPin, MockPin);
//! // Select page 0, then write one column of pixels
//! let _ = interface.send_command(command::SET_PAGE_ADDRESS);
//! let _ = interface.send_data(&[0xFF]);
//! ```

// Panel power

/// Display off (0xAE)
///
/// Puts the panel to sleep. RAM content is kept.
pub const DISPLAY_OFF: u8 = 0xAE;

/// Display on (0xAF)
pub const DISPLAY_ON: u8 = 0xAF;

// Addressing

/// Set lower column address (0x00 - 0x0F)
///
/// OR the low nibble of the column into this opcode.
pub const SET_LOW_COLUMN: u8 = 0x00;

/// Set higher column address (0x10 - 0x1F)
///
/// OR the high nibble of the column into this opcode.
pub const SET_HIGH_COLUMN: u8 = 0x10;

/// Set page address (0xB0 - 0xB7)
///
/// OR the page number (0-7) into this opcode.
pub const SET_PAGE_ADDRESS: u8 = 0xB0;

/// Set display start line (0x40 - 0x7F)
pub const SET_START_LINE: u8 = 0x40;

/// Set memory addressing mode (0x20)
///
/// Followed by one byte; `0x02` selects page addressing.
pub const SET_MEMORY_MODE: u8 = 0x20;

/// Page addressing mode operand for [`SET_MEMORY_MODE`]
pub const PAGE_ADDRESSING: u8 = 0x02;

// Panel configuration

/// Contrast control (0x81)
///
/// Two-byte command: the next byte is the contrast value (0-255).
pub const SET_CONTRAST: u8 = 0x81;

/// Segment remap, column 0 mapped to SEG0 (0xA0)
pub const SEGMENT_REMAP_NORMAL: u8 = 0xA0;

/// Segment remap, column 131 mapped to SEG0 (0xA1)
pub const SEGMENT_REMAP_REVERSED: u8 = 0xA1;

/// COM output scan direction, COM0 to COM\[N-1\] (0xC0)
pub const COM_SCAN_INCREMENT: u8 = 0xC0;

/// COM output scan direction, COM\[N-1\] to COM0 (0xC8)
pub const COM_SCAN_DECREMENT: u8 = 0xC8;

/// Normal display polarity, RAM bit 1 lights the pixel (0xA6)
pub const NORMAL_DISPLAY: u8 = 0xA6;

/// Inverse display polarity (0xA7)
pub const INVERSE_DISPLAY: u8 = 0xA7;

/// Multiplex ratio (0xA8), followed by `rows - 1`
pub const SET_MULTIPLEX_RATIO: u8 = 0xA8;

/// Display offset (0xD3), followed by the vertical shift
pub const SET_DISPLAY_OFFSET: u8 = 0xD3;

/// Display clock divide ratio / oscillator frequency (0xD5)
pub const SET_CLOCK_DIVIDE: u8 = 0xD5;

/// Pre-charge / discharge period (0xD9)
pub const SET_PRECHARGE: u8 = 0xD9;

/// COM pins hardware configuration (0xDA)
pub const SET_COM_PINS: u8 = 0xDA;

/// VCOM deselect level (0xDB)
pub const SET_VCOM_DESELECT: u8 = 0xDB;

/// Resume to RAM content display (0xA4)
pub const ENTIRE_DISPLAY_RESUME: u8 = 0xA4;

/// Force every pixel on regardless of RAM (0xA5)
pub const ENTIRE_DISPLAY_ON: u8 = 0xA5;

/// Controller initialization sequence
///
/// Sent once after the hardware reset pulse, one command transaction per
/// byte, in this exact order. Operand bytes are sent as commands too; the
/// controller consumes them as parameters of the preceding opcode.
pub const INIT_SEQUENCE: [u8; 25] = [
    DISPLAY_OFF,
    SET_LOW_COLUMN | 0x02,
    SET_HIGH_COLUMN,
    SET_START_LINE,
    SET_CONTRAST,
    // 0xA0 is taken as the contrast operand
    SEGMENT_REMAP_NORMAL,
    COM_SCAN_INCREMENT,
    NORMAL_DISPLAY,
    SET_MULTIPLEX_RATIO,
    0x3F, // 1/64 duty
    SET_DISPLAY_OFFSET,
    0x00,
    SET_CLOCK_DIVIDE,
    0x80,
    SET_PRECHARGE,
    0xF1, // pre-charge 15 clocks, discharge 1 clock
    SET_COM_PINS,
    0x12,
    SET_VCOM_DESELECT,
    0x40,
    SET_MEMORY_MODE,
    PAGE_ADDRESSING,
    ENTIRE_DISPLAY_RESUME,
    NORMAL_DISPLAY,
    DISPLAY_ON,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_sequence_bytes() {
        assert_eq!(
            INIT_SEQUENCE,
            [
                0xAE, 0x02, 0x10, 0x40, 0x81, 0xA0, 0xC0, 0xA6, 0xA8, 0x3F, 0xD3, 0x00, 0xD5,
                0x80, 0xD9, 0xF1, 0xDA, 0x12, 0xDB, 0x40, 0x20, 0x02, 0xA4, 0xA6, 0xAF,
            ]
        );
    }

    #[test]
    fn test_init_sequence_starts_off_and_ends_on() {
        assert_eq!(INIT_SEQUENCE.first(), Some(&DISPLAY_OFF));
        assert_eq!(INIT_SEQUENCE.last(), Some(&DISPLAY_ON));
    }
}
