//! Hardware interface abstraction
//!
//! This module provides the [`DisplayInterface`] trait and the [`Interface`] struct
//! for communicating with the SH1106 controller over a 4-wire SPI bus.
//!
//! ## Hardware Requirements
//!
//! The SH1106 requires:
//! - SPI bus (MOSI + SCK), configured by the caller (mode 0, up to ~2 MHz is safe)
//! - 3 GPIO pins:
//!   - **DC**: Data/Command select (output, low = command)
//!   - **RST**: Reset (output, active low)
//!   - **CS**: Chip select (output, active low)
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_hal::digital::OutputPin;
//! use embedded_hal::spi::SpiBus;
//! use sh1106::{DataMode, DisplayInterface, Interface};
//! # use core::convert::Infallible;
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
//! // Create interface with SPI bus and GPIO pins
//! let mut interface = Interface::new(MockSpi, MockPin, MockPin, MockPin);
//!
//! // Send command
//! let _ = interface.send_command(0xAF); // Display on
//!
//! // Send data
//! let _ = interface.transmit(&[0xFF, 0x00, 0xFF], DataMode::Data);
//! ```

use core::fmt::Debug;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

type InterfaceResult<T, E> = core::result::Result<T, E>;

/// Meaning of the bytes in one bus transaction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataMode {
    /// Opcodes and operands (DC low)
    Command,
    /// Display RAM contents (DC high)
    Data,
}

/// Trait for hardware interface to the SH1106 controller
///
/// This trait abstracts over different hardware implementations,
/// allowing the [`Display`](crate::display::Display) to work with any
/// SPI + GPIO implementation that satisfies embedded-hal traits.
///
/// ## Implementing
///
/// For most cases, use the provided [`Interface`] struct. If you need
/// custom behavior (e.g., a shared bus with its own chip-select handling),
/// implement [`transmit`](Self::transmit) and [`reset`](Self::reset) on
/// your own type.
pub trait DisplayInterface {
    /// Error type for interface operations
    ///
    /// Must implement [`Debug`] for error reporting.
    type Error: Debug;

    /// Send one transaction to the controller
    ///
    /// The implementation must:
    /// 1. Set DC low for [`DataMode::Command`], high for [`DataMode::Data`]
    /// 2. Select the device, send the bytes, deselect the device
    ///
    /// Transactions never overlap.
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication or GPIO fails.
    fn transmit(&mut self, bytes: &[u8], mode: DataMode) -> InterfaceResult<(), Self::Error>;

    /// Perform hardware reset
    ///
    /// The implementation must drive RST high, then low, then high,
    /// waiting `settle_us` microseconds after each transition.
    ///
    /// # Errors
    ///
    /// Returns an error if the reset line cannot be driven.
    fn reset<D: DelayNs>(
        &mut self,
        delay: &mut D,
        settle_us: u32,
    ) -> InterfaceResult<(), Self::Error>;

    /// Send a single command byte
    fn send_command(&mut self, command: u8) -> InterfaceResult<(), Self::Error> {
        self.transmit(&[command], DataMode::Command)
    }

    /// Send data bytes
    fn send_data(&mut self, data: &[u8]) -> InterfaceResult<(), Self::Error> {
        self.transmit(data, DataMode::Data)
    }
}

/// Errors that can occur at the interface level
///
/// Generic over SPI and GPIO error types.
#[derive(Debug)]
pub enum InterfaceError<SpiErr, PinErr> {
    /// SPI communication error
    Spi(SpiErr),
    /// GPIO pin error
    Pin(PinErr),
}

impl<SpiErr: Debug, PinErr: Debug> core::fmt::Display for InterfaceError<SpiErr, PinErr> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Spi(e) => write!(f, "SPI error: {e:?}"),
            Self::Pin(e) => write!(f, "Pin error: {e:?}"),
        }
    }
}

impl<SpiErr: Debug, PinErr: Debug> core::error::Error for InterfaceError<SpiErr, PinErr> {}

/// Hardware interface implementation for SH1106
///
/// Implements [`DisplayInterface`] for embedded-hal v1.0 SPI bus and GPIO traits.
/// Chip select is driven by this struct, so pass a bare [`SpiBus`], not an
/// `SpiDevice` that manages its own CS.
///
/// ## Type Parameters
///
/// * `SPI` - SPI bus implementing [`SpiBus`]
/// * `DC` - Data/Command pin implementing [`OutputPin`]
/// * `RST` - Reset pin implementing [`OutputPin`]
/// * `CS` - Chip select pin implementing [`OutputPin`]
pub struct Interface<SPI, DC, RST, CS> {
    /// SPI bus for communication
    spi: SPI,
    /// Data/Command select pin (low=command, high=data)
    dc: DC,
    /// Reset pin (active low)
    rst: RST,
    /// Chip select pin (active low)
    cs: CS,
}

impl<SPI, DC, RST, CS> Interface<SPI, DC, RST, CS>
where
    SPI: SpiBus,
    DC: OutputPin,
    RST: OutputPin,
    CS: OutputPin,
{
    /// Create a new Interface
    ///
    /// # Arguments
    ///
    /// * `spi` - SPI bus (must implement [`SpiBus`])
    /// * `dc` - Data/Command pin (output, low=command, high=data)
    /// * `rst` - Reset pin (output, active low)
    /// * `cs` - Chip select pin (output, active low)
    pub fn new(spi: SPI, dc: DC, rst: RST, cs: CS) -> Self {
        Self { spi, dc, rst, cs }
    }

    /// Release the bus and pins
    pub fn release(self) -> (SPI, DC, RST, CS) {
        (self.spi, self.dc, self.rst, self.cs)
    }
}

impl<SPI, DC, RST, CS, PinErr> DisplayInterface for Interface<SPI, DC, RST, CS>
where
    SPI: SpiBus,
    SPI::Error: Debug,
    DC: OutputPin<Error = PinErr>,
    RST: OutputPin<Error = PinErr>,
    CS: OutputPin<Error = PinErr>,
    PinErr: Debug,
{
    type Error = InterfaceError<SPI::Error, PinErr>;

    fn transmit(&mut self, bytes: &[u8], mode: DataMode) -> InterfaceResult<(), Self::Error> {
        let selected = match mode {
            DataMode::Command => self.dc.set_low(),
            DataMode::Data => self.dc.set_high(),
        };
        selected.map_err(InterfaceError::Pin)?;

        self.cs.set_low().map_err(InterfaceError::Pin)?;
        let written = self.spi.write(bytes).and_then(|()| self.spi.flush());
        // CS is released even when the write failed
        let deselected = self.cs.set_high();

        written.map_err(InterfaceError::Spi)?;
        deselected.map_err(InterfaceError::Pin)
    }

    fn reset<D: DelayNs>(
        &mut self,
        delay: &mut D,
        settle_us: u32,
    ) -> InterfaceResult<(), Self::Error> {
        // Reset sequence: HIGH -> wait -> LOW -> wait -> HIGH -> wait
        self.rst.set_high().map_err(InterfaceError::Pin)?;
        delay.delay_us(settle_us);
        self.rst.set_low().map_err(InterfaceError::Pin)?;
        delay.delay_us(settle_us);
        self.rst.set_high().map_err(InterfaceError::Pin)?;
        delay.delay_us(settle_us);
        Ok(())
    }
}
