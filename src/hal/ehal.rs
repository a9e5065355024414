//! [`IoPort`] adapter over embedded-hal 1.0 pins.
//!
//! Any HAL that implements the embedded-hal 1.0 traits (esp-idf-hal,
//! stm32 HALs, rp2040-hal, ...) can drive a shield channel through
//! [`EmbeddedHalPort`]. The typed pins are handed over once, together with the
//! [`Pinout`] ids the driver will address them by.
//!
//! embedded-hal 1.0 has no ADC trait, so the current-sense line is read
//! through the small [`AnalogInput`] trait defined here.
//!
//! # Wiring
//!
//! | Line | Trait |
//! |------|-------|
//! | EN/DIAG | [`InputPin`] |
//! | CS | [`AnalogInput`] |
//! | INA, INB | [`OutputPin`] |
//! | PWM | [`SetDutyCycle`] |
//!
//! # Example
//!
//! ```ignore
//! use vnh_shield::hal::{ChannelLines, EmbeddedHalPort};
//! use vnh_shield::{BridgeMode, MotorDriver, MotorState, Pinout};
//!
//! let lines = ChannelLines {
//!     enable: en_pin,
//!     current_sense: cs_adc,
//!     direction_a: ina_pin,
//!     direction_b: inb_pin,
//!     throttle: pwm_channel,
//! };
//! let port = EmbeddedHalPort::new(Pinout::new(0, 2, 7, 8, 5), lines)?;
//! let mut driver = MotorDriver::new(port, Pinout::new(0, 2, 7, 8, 5), BridgeMode::FullBridge)?;
//! driver.turn_on(MotorState::Clockwise)?;
//! ```

use embedded_hal::digital::{InputPin, OutputPin, PinState};
use embedded_hal::pwm::SetDutyCycle;

use crate::config::{check_pin_conflicts, PinConflict, Pinout};
use crate::traits::{IoPort, Level, PinId, PinMode, PortError};

/// One-shot analog input (the current-sense ADC channel).
pub trait AnalogInput {
    /// Error type for conversions.
    type Error;

    /// Take one reading at the converter's native resolution.
    fn read_raw(&mut self) -> Result<u16, Self::Error>;
}

/// The typed lines of one driver chip.
#[derive(Debug)]
pub struct ChannelLines<EN, CS, A, B, PWM> {
    /// Enable/fault input.
    pub enable: EN,
    /// Current-sense ADC channel.
    pub current_sense: CS,
    /// Direction output A.
    pub direction_a: A,
    /// Direction output B.
    pub direction_b: B,
    /// PWM throttle channel.
    pub throttle: PWM,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Line {
    Enable,
    CurrentSense,
    DirectionA,
    DirectionB,
    Throttle,
}

impl Line {
    const fn mode(self) -> PinMode {
        match self {
            Line::Enable | Line::CurrentSense => PinMode::Input,
            Line::DirectionA | Line::DirectionB | Line::Throttle => PinMode::Output,
        }
    }

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// [`IoPort`] over the embedded-hal pins of one channel.
///
/// Pins are addressed by the ids in the [`Pinout`] given at construction;
/// any other id is [`PortError::UnknownPin`]. Each line only accepts the mode
/// that matches its trait, and must be configured before use, mirroring a
/// real board.
#[derive(Debug)]
pub struct EmbeddedHalPort<EN, CS, A, B, PWM> {
    pins: Pinout,
    lines: ChannelLines<EN, CS, A, B, PWM>,
    configured: u8,
}

impl<EN, CS, A, B, PWM> EmbeddedHalPort<EN, CS, A, B, PWM> {
    /// Wrap the typed lines of one channel.
    ///
    /// Fails if `pins` assigns the same id to two lines.
    pub fn new(pins: Pinout, lines: ChannelLines<EN, CS, A, B, PWM>) -> Result<Self, PinConflict> {
        check_pin_conflicts(&[pins])?;
        Ok(Self {
            pins,
            lines,
            configured: 0,
        })
    }

    /// The pin ids this port answers to.
    pub fn pins(&self) -> &Pinout {
        &self.pins
    }

    /// Shared access to the wrapped lines.
    pub fn lines(&self) -> &ChannelLines<EN, CS, A, B, PWM> {
        &self.lines
    }

    /// Give the wrapped lines back.
    pub fn into_lines(self) -> ChannelLines<EN, CS, A, B, PWM> {
        self.lines
    }

    fn line(&self, pin: PinId) -> Result<Line, PortError> {
        let p = &self.pins;
        if pin == p.enable {
            Ok(Line::Enable)
        } else if pin == p.current_sense {
            Ok(Line::CurrentSense)
        } else if pin == p.direction_a {
            Ok(Line::DirectionA)
        } else if pin == p.direction_b {
            Ok(Line::DirectionB)
        } else if pin == p.throttle {
            Ok(Line::Throttle)
        } else {
            Err(PortError::UnknownPin(pin))
        }
    }

    fn configure(&mut self, pin: PinId, mode: PinMode) -> Result<(), PortError> {
        let line = self.line(pin)?;
        if line.mode() != mode {
            return Err(PortError::WrongMode {
                pin,
                requested: mode,
            });
        }
        self.configured |= line.bit();
        Ok(())
    }

    /// Resolve `pin` for an operation needing `mode`.
    fn ready(&self, pin: PinId, mode: PinMode) -> Result<Line, PortError> {
        let line = self.line(pin)?;
        if self.configured & line.bit() == 0 {
            return Err(PortError::NotConfigured(pin));
        }
        if line.mode() != mode {
            return Err(PortError::WrongMode {
                pin,
                requested: mode,
            });
        }
        Ok(line)
    }
}

impl<EN, CS, A, B, PWM> IoPort for EmbeddedHalPort<EN, CS, A, B, PWM>
where
    EN: InputPin,
    CS: AnalogInput,
    A: OutputPin,
    B: OutputPin,
    PWM: SetDutyCycle,
{
    type Error = PortError;

    fn configure_output(&mut self, pin: PinId) -> Result<(), PortError> {
        self.configure(pin, PinMode::Output)
    }

    fn configure_input(&mut self, pin: PinId) -> Result<(), PortError> {
        self.configure(pin, PinMode::Input)
    }

    fn write_digital(&mut self, pin: PinId, level: Level) -> Result<(), PortError> {
        let state = PinState::from(level.is_high());
        let written = match self.ready(pin, PinMode::Output)? {
            Line::DirectionA => self.lines.direction_a.set_state(state).is_ok(),
            Line::DirectionB => self.lines.direction_b.set_state(state).is_ok(),
            Line::Throttle => match level {
                Level::High => self.lines.throttle.set_duty_cycle_fully_on().is_ok(),
                Level::Low => self.lines.throttle.set_duty_cycle_fully_off().is_ok(),
            },
            Line::Enable | Line::CurrentSense => return Err(PortError::Unsupported(pin)),
        };
        if written {
            Ok(())
        } else {
            Err(PortError::Hardware(pin))
        }
    }

    fn read_digital(&mut self, pin: PinId) -> Result<Level, PortError> {
        match self.ready(pin, PinMode::Input)? {
            Line::Enable => self
                .lines
                .enable
                .is_high()
                .map(Level::from)
                .map_err(|_| PortError::Hardware(pin)),
            _ => Err(PortError::Unsupported(pin)),
        }
    }

    fn read_analog(&mut self, pin: PinId) -> Result<u16, PortError> {
        match self.ready(pin, PinMode::Input)? {
            Line::CurrentSense => self
                .lines
                .current_sense
                .read_raw()
                .map_err(|_| PortError::Hardware(pin)),
            _ => Err(PortError::Unsupported(pin)),
        }
    }

    fn write_analog(&mut self, pin: PinId, duty: u16) -> Result<(), PortError> {
        match self.ready(pin, PinMode::Output)? {
            Line::Throttle => {
                let duty = duty.min(self.lines.throttle.max_duty_cycle());
                self.lines
                    .throttle
                    .set_duty_cycle(duty)
                    .map_err(|_| PortError::Hardware(pin))
            }
            _ => Err(PortError::Unsupported(pin)),
        }
    }
}
