//! SH1106 OLED Display Driver
//!
//! A driver for SH1106 monochrome OLED controllers (up to 132x64 pixels) over
//! 4-wire SPI, plus a polled joystick input engine for the HATs these panels
//! usually ship on.
//!
//! ## Features
//!
//! - `no_std` compatible display half
//! - `embedded-hal` v1.0 support
//! - `embedded-graphics` integration (with `graphics` feature)
//! - Configurable display dimensions, column offset and rotation
//! - Caller-provided or heap-allocated frame buffers
//! - Click, hold and release events from up to seven input lines (with `std` feature)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use core::convert::Infallible;
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::OutputPin;
//! use embedded_hal::spi::SpiBus;
//! use sh1106::{BufferedDisplay, Builder, Color, Dimensions, Display, Interface, Rotation};
//!
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
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let spi = MockSpi;
//! # let dc = MockPin;
//! # let rst = MockPin;
//! # let cs = MockPin;
//! # let mut delay = MockDelay;
//! let interface = Interface::new(spi, dc, rst, cs);
//! let dims = match Dimensions::new(128, 64) {
//!     Ok(dims) => dims,
//!     Err(_) => return,
//! };
//! let config = match Builder::new().dimensions(dims).rotation(Rotation::Rotate0).build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//!
//! let mut storage = [0u8; 1024];
//! let mut display = match BufferedDisplay::try_new(Display::new(interface, config), &mut storage[..]) {
//!     Ok(display) => display,
//!     Err(_) => return,
//! };
//! let _ = display.init(&mut delay);
//!
//! display.clear(Color::Off);
//! display.set_pixel(10, 10, true);
//! let _ = display.update();
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(any(test, feature = "alloc"))]
extern crate alloc;

/// Buffered drawing surface
pub mod buffered;
/// Monochrome pixel color
pub mod color;
/// SH1106 command definitions
pub mod command;
/// Display configuration types and builder
pub mod config;
/// Core display operations
pub mod display;
/// Error types for the driver
pub mod error;
/// Page-addressed frame buffer
pub mod framebuffer;
/// Points and rectangles
pub mod geometry;
/// RGB pixel sources
pub mod image;
/// Hardware interface abstraction
pub mod interface;
/// Coordinate rotation utilities
pub mod rotation;

/// Graphics support via embedded-graphics (requires `graphics` feature)
#[cfg(feature = "graphics")]
pub mod graphics;

/// Polled joystick input (requires `std` feature)
#[cfg(feature = "std")]
pub mod input;

pub use buffered::BufferedDisplay;
pub use color::Color;
pub use config::{Builder, Config, Dimensions, MAX_COLUMNS, MAX_ROWS, Rotation};
pub use display::Display;
pub use error::{BuilderError, Error};
pub use framebuffer::FrameBuffer;
pub use geometry::{Point, Rect};
pub use image::ImageSource;
pub use interface::InterfaceError;
pub use interface::{DataMode, DisplayInterface, Interface};

#[cfg(feature = "alloc")]
pub use image::RgbImage;
