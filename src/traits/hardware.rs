//! Hardware abstraction for the pins a motor driver channel owns.
//!
//! The driver never touches registers directly. Everything goes through
//! [`IoPort`], a pin-id based port modelled on the Arduino primitives the
//! shield was designed around (`pinMode`, `digitalWrite`, `digitalRead`,
//! `analogRead`, `analogWrite`).
//!
//! # Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`IoPort`] | Configure, read and write pins by id |
//! | [`Level`] | Digital line level |
//! | [`PinMode`] | Direction a pin is configured for |
//! | [`PortError`] | Failure reported by the bundled port implementations |
//!
//! # Implementation
//!
//! For testing and desktop development, use [`crate::hal::MockPort`]. For real
//! hardware, wrap embedded-hal 1.0 pins in `hal::EmbeddedHalPort` (requires the
//! `embedded-hal` feature) or implement [`IoPort`] for your board directly.
//!
//! # Example
//!
//! ```rust
//! use vnh_shield::traits::{IoPort, Level};
//! use vnh_shield::hal::MockPort;
//!
//! let mut port = MockPort::new();
//! port.configure_output(7).unwrap();
//! port.write_digital(7, Level::High).unwrap();
//! assert_eq!(port.level(7), Level::High);
//! ```

use core::cell::RefCell;
use core::fmt;

/// Identifier of a physical pin on the board.
///
/// Matches the 8-bit pin numbering used by Arduino-style boards.
pub type PinId = u8;

/// Digital line level.
///
/// # Default
///
/// Defaults to [`Low`](Self::Low).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Level {
    /// Line driven or pulled to ground.
    #[default]
    Low,
    /// Line driven or pulled to the logic supply.
    High,
}

impl Level {
    /// Returns true for [`Level::High`].
    #[inline]
    pub const fn is_high(self) -> bool {
        matches!(self, Level::High)
    }

    /// Returns true for [`Level::Low`].
    #[inline]
    pub const fn is_low(self) -> bool {
        matches!(self, Level::Low)
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Direction a pin is configured for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PinMode {
    /// Pin is read (digital or analog).
    Input,
    /// Pin is driven (digital level or PWM duty).
    Output,
}

/// Pin-level I/O port.
///
/// The only boundary between the driver and the physical world. Each method
/// maps to one Arduino-style primitive and is expected to complete
/// immediately; none of them block or retry.
///
/// # Implementation Notes
///
/// - Reads take `&mut self` because most HALs need exclusive access to
///   sample a pin (embedded-hal 1.0 `InputPin::is_low` does too).
/// - `read_analog` returns the converter's native resolution, unscaled.
/// - `write_analog` takes a duty value in the port's native units. `0` must
///   always mean fully off.
/// - Ports that cannot fail can use [`core::convert::Infallible`] as their
///   error type.
///
/// # Example Implementation
///
/// ```rust,ignore
/// use vnh_shield::traits::{IoPort, Level, PinId};
///
/// struct Board { /* register handles */ }
///
/// impl IoPort for Board {
///     type Error = ();
///
///     fn configure_output(&mut self, pin: PinId) -> Result<(), ()> { Ok(()) }
///     fn configure_input(&mut self, pin: PinId) -> Result<(), ()> { Ok(()) }
///     fn write_digital(&mut self, pin: PinId, level: Level) -> Result<(), ()> { Ok(()) }
///     fn read_digital(&mut self, pin: PinId) -> Result<Level, ()> { Ok(Level::High) }
///     fn read_analog(&mut self, pin: PinId) -> Result<u16, ()> { Ok(0) }
///     fn write_analog(&mut self, pin: PinId, duty: u16) -> Result<(), ()> { Ok(()) }
/// }
/// ```
pub trait IoPort {
    /// Error type for port operations.
    type Error;

    /// Configure `pin` as an output.
    fn configure_output(&mut self, pin: PinId) -> Result<(), Self::Error>;

    /// Configure `pin` as an input.
    fn configure_input(&mut self, pin: PinId) -> Result<(), Self::Error>;

    /// Drive a digital output to `level`.
    fn write_digital(&mut self, pin: PinId, level: Level) -> Result<(), Self::Error>;

    /// Sample the level of a digital input.
    fn read_digital(&mut self, pin: PinId) -> Result<Level, Self::Error>;

    /// Sample an analog input at full converter resolution.
    fn read_analog(&mut self, pin: PinId) -> Result<u16, Self::Error>;

    /// Set the duty of a PWM output.
    fn write_analog(&mut self, pin: PinId, duty: u16) -> Result<(), Self::Error>;
}

impl<P: IoPort + ?Sized> IoPort for &mut P {
    type Error = P::Error;

    fn configure_output(&mut self, pin: PinId) -> Result<(), Self::Error> {
        (**self).configure_output(pin)
    }

    fn configure_input(&mut self, pin: PinId) -> Result<(), Self::Error> {
        (**self).configure_input(pin)
    }

    fn write_digital(&mut self, pin: PinId, level: Level) -> Result<(), Self::Error> {
        (**self).write_digital(pin, level)
    }

    fn read_digital(&mut self, pin: PinId) -> Result<Level, Self::Error> {
        (**self).read_digital(pin)
    }

    fn read_analog(&mut self, pin: PinId) -> Result<u16, Self::Error> {
        (**self).read_analog(pin)
    }

    fn write_analog(&mut self, pin: PinId, duty: u16) -> Result<(), Self::Error> {
        (**self).write_analog(pin, duty)
    }
}

/// Lets both channels of a shield share one board port.
///
/// Each call borrows the cell for the duration of a single primitive, so two
/// drivers holding `&RefCell<P>` can be used alternately from one thread.
impl<P: IoPort> IoPort for &RefCell<P> {
    type Error = P::Error;

    fn configure_output(&mut self, pin: PinId) -> Result<(), Self::Error> {
        self.borrow_mut().configure_output(pin)
    }

    fn configure_input(&mut self, pin: PinId) -> Result<(), Self::Error> {
        self.borrow_mut().configure_input(pin)
    }

    fn write_digital(&mut self, pin: PinId, level: Level) -> Result<(), Self::Error> {
        self.borrow_mut().write_digital(pin, level)
    }

    fn read_digital(&mut self, pin: PinId) -> Result<Level, Self::Error> {
        self.borrow_mut().read_digital(pin)
    }

    fn read_analog(&mut self, pin: PinId) -> Result<u16, Self::Error> {
        self.borrow_mut().read_analog(pin)
    }

    fn write_analog(&mut self, pin: PinId, duty: u16) -> Result<(), Self::Error> {
        self.borrow_mut().write_analog(pin, duty)
    }
}

/// Failure reported by the bundled [`IoPort`] implementations.
///
/// These are port-level errors and are kept apart from the driver's own
/// outcomes (rejected states, skipped mode changes), which are never errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PortError {
    /// Pin was used before being configured.
    NotConfigured(PinId),

    /// Pin is not wired to this port.
    UnknownPin(PinId),

    /// Pin cannot be configured in the requested mode.
    WrongMode {
        /// The offending pin.
        pin: PinId,
        /// The mode that was requested.
        requested: PinMode,
    },

    /// Operation is not supported by the line behind this pin
    /// (e.g. an analog read on a digital-only input).
    Unsupported(PinId),

    /// The underlying hardware reported a failure.
    Hardware(PinId),
}

impl PortError {
    /// Returns the pin the error refers to.
    pub const fn pin(&self) -> PinId {
        match *self {
            PortError::NotConfigured(pin)
            | PortError::UnknownPin(pin)
            | PortError::Unsupported(pin)
            | PortError::Hardware(pin) => pin,
            PortError::WrongMode { pin, .. } => pin,
        }
    }
}

impl fmt::Display for PortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConfigured(pin) => write!(f, "pin {} used before being configured", pin),
            Self::UnknownPin(pin) => write!(f, "pin {} is not wired to this port", pin),
            Self::WrongMode { pin, requested } => {
                write!(f, "pin {} cannot be configured as {:?}", pin, requested)
            }
            Self::Unsupported(pin) => write!(f, "operation not supported on pin {}", pin),
            Self::Hardware(pin) => write!(f, "hardware failure on pin {}", pin),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PortError {}
