//! Mock port for testing without hardware.
//!
//! [`MockPort`] records every write, and its input levels, ADC readings and
//! failures can be injected. Development and testing can therefore run on a
//! desktop without a shield attached.
//!
//! # Example
//!
//! ```rust
//! use vnh_shield::{BridgeMode, MotorDriver, MotorState, Pinout};
//! use vnh_shield::hal::MockPort;
//! use vnh_shield::traits::Level;
//!
//! let pins = Pinout::new(0, 2, 7, 8, 5);
//! let mut driver = MotorDriver::new(MockPort::new(), pins, BridgeMode::FullBridge).unwrap();
//! driver.turn_on(MotorState::Clockwise).unwrap();
//!
//! // Verify via the recorded pin levels
//! let port = driver.release();
//! assert_eq!(port.level(7), Level::High);
//! assert_eq!(port.level(8), Level::Low);
//! ```

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::traits::{IoPort, Level, PinId, PinMode, PortError};

/// A single recorded write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinWrite {
    /// `write_digital(pin, level)`
    Digital(PinId, Level),
    /// `write_analog(pin, duty)`
    Analog(PinId, u16),
}

#[derive(Clone, Debug, Default)]
struct PinSlot {
    mode: Option<PinMode>,
    output: Level,
    duty: u16,
    input: Option<Level>,
    analog: u16,
    failing: bool,
    fail_after: Option<usize>,
}

/// Recording I/O port for testing.
///
/// Behaves like a strict board:
/// - writes need the pin configured as an output;
/// - reads need it configured as an input.
///
/// Anything else returns a [`PortError`]. Inputs without an injected level
/// read HIGH, like a pulled-up line. This means a fresh driver's enable line
/// reports "no fault".
///
/// # Example
///
/// ```rust
/// use vnh_shield::hal::{MockPort, PinWrite};
/// use vnh_shield::traits::{IoPort, Level, PortError};
///
/// let mut port = MockPort::new();
/// port.configure_output(7).unwrap();
/// port.write_digital(7, Level::High).unwrap();
/// assert_eq!(port.writes, vec![PinWrite::Digital(7, Level::High)]);
///
/// // Unconfigured pins are rejected
/// assert_eq!(port.read_analog(2), Err(PortError::NotConfigured(2)));
///
/// // Inject a hardware failure
/// port.fail_pin(7);
/// assert_eq!(port.write_digital(7, Level::Low), Err(PortError::Hardware(7)));
/// ```
#[derive(Debug, Default)]
pub struct MockPort {
    pins: BTreeMap<PinId, PinSlot>,
    /// Every successful write, in order.
    pub writes: Vec<PinWrite>,
    /// Number of successful reads (digital and analog).
    pub read_count: usize,
}

impl MockPort {
    /// Creates a new mock port with no pins configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mode a pin was last configured with.
    pub fn mode(&self, pin: PinId) -> Option<PinMode> {
        self.pins.get(&pin).and_then(|slot| slot.mode)
    }

    /// Level an output pin is currently driving.
    pub fn level(&self, pin: PinId) -> Level {
        self.pins.get(&pin).map(|slot| slot.output).unwrap_or_default()
    }

    /// Duty last written to a pin.
    pub fn duty(&self, pin: PinId) -> u16 {
        self.pins.get(&pin).map(|slot| slot.duty).unwrap_or(0)
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.len()
    }

    /// Forget recorded writes and reads (pin levels are kept).
    pub fn clear_log(&mut self) {
        self.writes.clear();
        self.read_count = 0;
    }

    /// Set the level a digital input will read.
    pub fn set_input(&mut self, pin: PinId, level: Level) {
        self.slot(pin).input = Some(level);
    }

    /// Set the value an analog input will read.
    pub fn set_analog(&mut self, pin: PinId, value: u16) {
        self.slot(pin).analog = value;
    }

    /// Make every operation on `pin` fail with [`PortError::Hardware`].
    pub fn fail_pin(&mut self, pin: PinId) {
        self.slot(pin).failing = true;
    }

    /// Let `pin` succeed `ops` more reads or writes, then fail like
    /// [`fail_pin`](Self::fail_pin).
    pub fn fail_pin_after(&mut self, pin: PinId, ops: usize) {
        self.slot(pin).fail_after = Some(ops);
    }

    /// Undo [`fail_pin`](Self::fail_pin) and [`fail_pin_after`](Self::fail_pin_after).
    pub fn heal_pin(&mut self, pin: PinId) {
        let slot = self.slot(pin);
        slot.failing = false;
        slot.fail_after = None;
    }

    fn slot(&mut self, pin: PinId) -> &mut PinSlot {
        self.pins.entry(pin).or_default()
    }

    fn checked(&mut self, pin: PinId, mode: PinMode) -> Result<&mut PinSlot, PortError> {
        let slot = self.pins.get_mut(&pin).ok_or(PortError::NotConfigured(pin))?;
        match slot.fail_after {
            Some(0) => {
                slot.failing = true;
                slot.fail_after = None;
            }
            Some(left) => slot.fail_after = Some(left - 1),
            None => {}
        }
        if slot.failing {
            return Err(PortError::Hardware(pin));
        }
        match slot.mode {
            None => Err(PortError::NotConfigured(pin)),
            Some(m) if m != mode => Err(PortError::WrongMode {
                pin,
                requested: mode,
            }),
            Some(_) => Ok(slot),
        }
    }

    fn configure(&mut self, pin: PinId, mode: PinMode) -> Result<(), PortError> {
        let slot = self.slot(pin);
        if slot.failing {
            return Err(PortError::Hardware(pin));
        }
        slot.mode = Some(mode);
        Ok(())
    }
}

impl IoPort for MockPort {
    type Error = PortError;

    fn configure_output(&mut self, pin: PinId) -> Result<(), PortError> {
        self.configure(pin, PinMode::Output)
    }

    fn configure_input(&mut self, pin: PinId) -> Result<(), PortError> {
        self.configure(pin, PinMode::Input)
    }

    fn write_digital(&mut self, pin: PinId, level: Level) -> Result<(), PortError> {
        self.checked(pin, PinMode::Output)?.output = level;
        self.writes.push(PinWrite::Digital(pin, level));
        Ok(())
    }

    fn read_digital(&mut self, pin: PinId) -> Result<Level, PortError> {
        let level = self.checked(pin, PinMode::Input)?.input.unwrap_or(Level::High);
        self.read_count += 1;
        Ok(level)
    }

    fn read_analog(&mut self, pin: PinId) -> Result<u16, PortError> {
        let value = self.checked(pin, PinMode::Input)?.analog;
        self.read_count += 1;
        Ok(value)
    }

    fn write_analog(&mut self, pin: PinId, duty: u16) -> Result<(), PortError> {
        self.checked(pin, PinMode::Output)?.duty = duty;
        self.writes.push(PinWrite::Analog(pin, duty));
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
