//! Core display operations
//!
//! [`Display`] speaks the SH1106 wire protocol: reset and initialization,
//! panel power, and streaming a page-addressed buffer to controller RAM.
//! It does not own pixel memory; see [`BufferedDisplay`](crate::BufferedDisplay)
//! for the buffered drawing surface.

use embedded_hal::delay::DelayNs;

use crate::command::{
    DISPLAY_OFF, DISPLAY_ON, INIT_SEQUENCE, INVERSE_DISPLAY, NORMAL_DISPLAY, SET_CONTRAST,
    SET_HIGH_COLUMN, SET_LOW_COLUMN, SET_PAGE_ADDRESS,
};
use crate::config::{Config, Dimensions, Rotation};
use crate::error::{Error, MAX_COLUMNS};
use crate::framebuffer::FrameBuffer;
use crate::interface::DisplayInterface;

type DisplayResult<I> = core::result::Result<(), Error<I>>;

/// Core display driver for SH1106
///
/// This struct provides low-level operations for the SH1106 controller.
/// Every operation takes `&mut self`, so bus transactions are serialized
/// by construction.
pub struct Display<I>
where
    I: DisplayInterface,
{
    /// Hardware interface
    interface: I,
    /// Display configuration
    config: Config,
    /// Whether the panel was last switched on
    is_display_on: bool,
}

impl<I> Display<I>
where
    I: DisplayInterface,
{
    /// Create a new Display instance
    ///
    /// No bus traffic is generated until [`init`](Self::init).
    pub fn new(interface: I, config: Config) -> Self {
        Self {
            interface,
            config,
            is_display_on: false,
        }
    }

    /// Perform the hardware reset pulse and send the initialization sequence
    ///
    /// The panel is on when this returns successfully. Display RAM is not
    /// cleared; push a frame with [`write_frame`](Self::write_frame).
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.interface
            .reset(delay, self.config.reset_delay_us)
            .map_err(Error::Interface)?;

        for command in INIT_SEQUENCE {
            self.send_command(command)?;
        }
        self.is_display_on = true;

        log::debug!(
            "sh1106: initialized {}x{}",
            self.config.dimensions.width,
            self.config.dimensions.height
        );
        Ok(())
    }

    /// Switch the panel on
    pub fn power_on(&mut self) -> DisplayResult<I> {
        self.send_command(DISPLAY_ON)?;
        self.is_display_on = true;
        log::debug!("sh1106: panel on");
        Ok(())
    }

    /// Switch the panel off
    ///
    /// Safe to call repeatedly; the command is sent every time.
    pub fn power_off(&mut self) -> DisplayResult<I> {
        self.send_command(DISPLAY_OFF)?;
        self.is_display_on = false;
        log::debug!("sh1106: panel off");
        Ok(())
    }

    /// Whether the panel was last switched on
    pub fn is_display_on(&self) -> bool {
        self.is_display_on
    }

    /// Set panel contrast (0-255)
    pub fn set_contrast(&mut self, contrast: u8) -> DisplayResult<I> {
        self.send_command(SET_CONTRAST)?;
        self.send_command(contrast)
    }

    /// Swap lit and dark pixels in hardware
    pub fn set_inverted(&mut self, inverted: bool) -> DisplayResult<I> {
        self.send_command(if inverted {
            INVERSE_DISPLAY
        } else {
            NORMAL_DISPLAY
        })
    }

    /// Send a frame buffer to the controller
    ///
    /// The frame must have the same physical dimensions as the display;
    /// a mismatch is reported as [`Error::BufferTooSmall`] when the frame is
    /// smaller and truncated to the display otherwise.
    pub fn write_frame<B>(&mut self, frame: &FrameBuffer<B>) -> DisplayResult<I>
    where
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        self.write_buffer(frame.as_bytes())
    }

    /// Send a raw page-layout buffer to the controller
    ///
    /// For each page: page address, column low, column high, then one data
    /// transaction with the page bytes inverted (a set bit in the buffer is
    /// a lit pixel). Stops at the first failing transaction; pages already
    /// sent stay on the panel.
    pub fn write_buffer(&mut self, buffer: &[u8]) -> DisplayResult<I> {
        let dims = self.config.dimensions;
        let required = dims.buffer_size();
        if buffer.len() < required {
            return Err(Error::BufferTooSmall {
                required,
                provided: buffer.len(),
            });
        }

        let width = dims.width as usize;
        let mut inverted = [0u8; MAX_COLUMNS as usize];
        for (page, bytes) in buffer[..required].chunks_exact(width).enumerate() {
            for (out, byte) in inverted.iter_mut().zip(bytes) {
                *out = !*byte;
            }
            self.select_page(page as u8)?;
            self.send_data(&inverted[..width])?;
        }

        log::trace!("sh1106: wrote {} pages", dims.pages());
        Ok(())
    }

    /// Physical dimensions
    pub fn dimensions(&self) -> &Dimensions {
        &self.config.dimensions
    }

    /// Configured rotation
    pub fn rotation(&self) -> Rotation {
        self.config.rotation
    }

    /// Display configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Give back the hardware interface
    pub fn release(self) -> I {
        self.interface
    }

    fn select_page(&mut self, page: u8) -> DisplayResult<I> {
        let column = self.config.column_offset;
        self.send_command(SET_PAGE_ADDRESS | page)?;
        self.send_command(SET_LOW_COLUMN | (column & 0x0F))?;
        self.send_command(SET_HIGH_COLUMN | (column >> 4))
    }

    fn send_command(&mut self, cmd: u8) -> DisplayResult<I> {
        self.interface.send_command(cmd).map_err(Error::Interface)
    }

    fn send_data(&mut self, data: &[u8]) -> DisplayResult<I> {
        self.interface.send_data(data).map_err(Error::Interface)
    }
}
