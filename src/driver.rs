//! State-machine driver for one channel of a VNH2SP30-class H-bridge.
//!
//! This module provides [`MotorDriver`], which owns the five lines of one
//! driver chip and keeps the direction outputs in lockstep with a committed
//! [`MotorState`].
//!
//! # Overview
//!
//! The driver:
//! - Commands the motor into one of four electrical states
//! - Restricts the reachable states by [`BridgeMode`]
//! - Passes through the throttle duty, current-sense reading and fault line
//! - Changes bridge wiring by passing through the neutral brake-to-ground state
//!
//! # Truth Table
//!
//! | State | INA | INB | Half-bridge |
//! |-------|-----|-----|-------------|
//! | [`Clockwise`](MotorState::Clockwise) | H | L | yes |
//! | [`CounterClockwise`](MotorState::CounterClockwise) | L | H | no |
//! | [`BrakeToSupply`](MotorState::BrakeToSupply) | H | H | no |
//! | [`BrakeToGround`](MotorState::BrakeToGround) | L | L | yes |
//!
//! In half-bridge mode only INA is driven.
//!
//! # Example
//!
//! ```rust
//! use vnh_shield::{BridgeMode, MotorDriver, MotorState, Pinout, TurnOnOutcome};
//! use vnh_shield::hal::MockPort;
//!
//! let pins = Pinout::new(0, 2, 7, 8, 5);
//! let mut driver = MotorDriver::new(MockPort::new(), pins, BridgeMode::FullBridge).unwrap();
//! assert_eq!(driver.motor_state(), MotorState::BrakeToGround);
//!
//! let outcome = driver.turn_on(MotorState::Clockwise).unwrap();
//! assert_eq!(outcome, TurnOnOutcome::Applied);
//! driver.set_throttle(128).unwrap();
//! assert_eq!(driver.motor_state(), MotorState::Clockwise);
//!
//! driver.turn_off().unwrap();
//! assert!(driver.is_stopped());
//! ```
//!
//! # Bridge Mode Changes
//!
//! ```rust
//! use vnh_shield::{BridgeMode, ModeChange, MotorDriver, MotorState, Pinout};
//! use vnh_shield::hal::MockPort;
//!
//! let pins = Pinout::new(0, 2, 7, 8, 5);
//! let mut driver = MotorDriver::new(MockPort::new(), pins, BridgeMode::FullBridge).unwrap();
//! driver.turn_on(MotorState::CounterClockwise).unwrap();
//!
//! // Counter-clockwise does not exist in half-bridge wiring.
//! let change = driver.change_bridge_mode(BridgeMode::HalfBridge).unwrap();
//! assert!(matches!(change, ModeChange::RestoreFailed { .. }));
//! assert_eq!(driver.motor_state(), MotorState::BrakeToGround);
//! ```

use crate::config::{label, DriverConfig, Label, Pinout, DEFAULT_LABEL};
use crate::traits::{IoPort, Level};

// ============================================================================
// Bridge Mode
// ============================================================================

/// Wiring configuration of the driver chip.
///
/// Full-bridge drives both half-bridges and exposes all four
/// [`MotorState`]s. Half-bridge wiring only uses INA, so only
/// [`Clockwise`](MotorState::Clockwise) and
/// [`BrakeToGround`](MotorState::BrakeToGround) exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BridgeMode {
    /// Motor connected between one output and ground.
    HalfBridge,
    /// Motor connected across both outputs.
    FullBridge,
}

impl BridgeMode {
    /// Returns true if `state` can be driven under this wiring.
    ///
    /// # Examples
    ///
    /// ```
    /// use vnh_shield::{BridgeMode, MotorState};
    ///
    /// assert!(BridgeMode::HalfBridge.supports(MotorState::Clockwise));
    /// assert!(!BridgeMode::HalfBridge.supports(MotorState::BrakeToSupply));
    /// assert!(BridgeMode::FullBridge.supports(MotorState::CounterClockwise));
    /// ```
    #[inline]
    pub const fn supports(self, state: MotorState) -> bool {
        match self {
            BridgeMode::HalfBridge => {
                matches!(state, MotorState::Clockwise | MotorState::BrakeToGround)
            }
            BridgeMode::FullBridge => true,
        }
    }

    /// The states reachable under this wiring.
    pub const fn states(self) -> &'static [MotorState] {
        match self {
            BridgeMode::HalfBridge => &[MotorState::Clockwise, MotorState::BrakeToGround],
            BridgeMode::FullBridge => &MotorState::ALL,
        }
    }

    /// Returns the mode as a kebab-case string.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            BridgeMode::HalfBridge => "half-bridge",
            BridgeMode::FullBridge => "full-bridge",
        }
    }

    /// Parse a bridge mode from text.
    ///
    /// Accepts `"half-bridge"`, `"halfbridge"`, `"half"` and the same forms for
    /// full-bridge. Input is trimmed and case-insensitive.
    ///
    /// # Examples
    ///
    /// ```
    /// use vnh_shield::BridgeMode;
    ///
    /// assert_eq!(BridgeMode::from_text("half"), Some(BridgeMode::HalfBridge));
    /// assert_eq!(BridgeMode::from_text(" FULL-BRIDGE "), Some(BridgeMode::FullBridge));
    /// assert_eq!(BridgeMode::from_text("quarter"), None);
    /// ```
    pub fn from_text(s: &str) -> Option<Self> {
        const NAMES: [(&str, BridgeMode); 6] = [
            ("half-bridge", BridgeMode::HalfBridge),
            ("halfbridge", BridgeMode::HalfBridge),
            ("half", BridgeMode::HalfBridge),
            ("full-bridge", BridgeMode::FullBridge),
            ("fullbridge", BridgeMode::FullBridge),
            ("full", BridgeMode::FullBridge),
        ];
        let s = s.trim();
        NAMES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
            .map(|(_, mode)| *mode)
    }
}

// ============================================================================
// Motor State
// ============================================================================

/// Electrical state of the motor outputs.
///
/// # Default
///
/// Defaults to [`BrakeToGround`](Self::BrakeToGround), the neutral state
/// every driver starts in and returns to on [`MotorDriver::turn_off`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MotorState {
    /// INA high, INB low.
    Clockwise,
    /// INA low, INB high.
    CounterClockwise,
    /// Both inputs high: windings shorted to the supply.
    BrakeToSupply,
    /// Both inputs low: windings shorted to ground.
    #[default]
    BrakeToGround,
}

impl MotorState {
    /// Every state, in declaration order.
    pub const ALL: [MotorState; 4] = [
        MotorState::Clockwise,
        MotorState::CounterClockwise,
        MotorState::BrakeToSupply,
        MotorState::BrakeToGround,
    ];

    /// Levels for `(INA, INB)` in full-bridge wiring.
    ///
    /// # Examples
    ///
    /// ```
    /// use vnh_shield::{traits::Level, MotorState};
    ///
    /// assert_eq!(MotorState::Clockwise.levels(), (Level::High, Level::Low));
    /// assert_eq!(MotorState::BrakeToSupply.levels(), (Level::High, Level::High));
    /// ```
    #[inline]
    pub const fn levels(self) -> (Level, Level) {
        match self {
            MotorState::Clockwise => (Level::High, Level::Low),
            MotorState::CounterClockwise => (Level::Low, Level::High),
            MotorState::BrakeToSupply => (Level::High, Level::High),
            MotorState::BrakeToGround => (Level::Low, Level::Low),
        }
    }

    /// The state encoded by a pair of `(INA, INB)` levels.
    ///
    /// # Examples
    ///
    /// ```
    /// use vnh_shield::{traits::Level, MotorState};
    ///
    /// assert_eq!(MotorState::from_levels(Level::Low, Level::High), MotorState::CounterClockwise);
    /// for state in MotorState::ALL {
    ///     let (a, b) = state.levels();
    ///     assert_eq!(MotorState::from_levels(a, b), state);
    /// }
    /// ```
    #[inline]
    pub const fn from_levels(a: Level, b: Level) -> Self {
        match (a, b) {
            (Level::High, Level::Low) => MotorState::Clockwise,
            (Level::Low, Level::High) => MotorState::CounterClockwise,
            (Level::High, Level::High) => MotorState::BrakeToSupply,
            (Level::Low, Level::Low) => MotorState::BrakeToGround,
        }
    }

    /// Returns true for the two braking states.
    #[inline]
    pub const fn is_braking(self) -> bool {
        matches!(self, MotorState::BrakeToSupply | MotorState::BrakeToGround)
    }

    /// Returns the state as a snake_case string.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            MotorState::Clockwise => "clockwise",
            MotorState::CounterClockwise => "counter_clockwise",
            MotorState::BrakeToSupply => "brake_to_supply",
            MotorState::BrakeToGround => "brake_to_ground",
        }
    }

    /// Parse a motor state from text.
    ///
    /// Supports full names (`"clockwise"`, `"counter_clockwise"`,
    /// `"brake_to_supply"`, `"brake_to_ground"`) and abbreviations
    /// (`"cw"`, `"ccw"`, `"vcc"`, `"gnd"`). Input is trimmed and
    /// case-insensitive.
    ///
    /// # Examples
    ///
    /// ```
    /// use vnh_shield::MotorState;
    ///
    /// assert_eq!(MotorState::from_text("cw"), Some(MotorState::Clockwise));
    /// assert_eq!(MotorState::from_text("CCW"), Some(MotorState::CounterClockwise));
    /// assert_eq!(MotorState::from_text(" gnd "), Some(MotorState::BrakeToGround));
    /// assert_eq!(MotorState::from_text("sideways"), None);
    /// ```
    pub fn from_text(s: &str) -> Option<Self> {
        const NAMES: [(&str, MotorState); 10] = [
            ("clockwise", MotorState::Clockwise),
            ("cw", MotorState::Clockwise),
            ("counter_clockwise", MotorState::CounterClockwise),
            ("counterclockwise", MotorState::CounterClockwise),
            ("ccw", MotorState::CounterClockwise),
            ("brake_to_supply", MotorState::BrakeToSupply),
            ("vcc", MotorState::BrakeToSupply),
            ("brake_to_ground", MotorState::BrakeToGround),
            ("gnd", MotorState::BrakeToGround),
            ("brake", MotorState::BrakeToGround),
        ];
        let s = s.trim();
        NAMES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
            .map(|(_, state)| *state)
    }
}

// ============================================================================
// Outcomes
// ============================================================================

/// Result of [`MotorDriver::turn_on`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TurnOnOutcome {
    /// Pins were written and the state committed.
    Applied,

    /// Request was refused; no pin was written.
    Rejected {
        /// Why the request was refused.
        reason: RejectReason,
    },
}

impl TurnOnOutcome {
    /// Returns true for [`TurnOnOutcome::Applied`].
    #[inline]
    pub const fn is_applied(&self) -> bool {
        matches!(self, TurnOnOutcome::Applied)
    }
}

/// Reason a [`MotorDriver::turn_on`] request was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RejectReason {
    /// The state does not exist under the current wiring.
    StateUnavailable {
        /// The requested state.
        state: MotorState,
        /// The mode in effect when it was requested.
        mode: BridgeMode,
    },
}

/// Result of [`MotorDriver::change_bridge_mode`].
///
/// # Examples
///
/// ```rust
/// use vnh_shield::{ModeChange, UnchangedReason};
///
/// fn describe(change: ModeChange) -> &'static str {
///     match change {
///         ModeChange::Unchanged(UnchangedReason::Faulted) => "blocked by fault",
///         ModeChange::Unchanged(UnchangedReason::SameMode) => "already in that mode",
///         ModeChange::Restored { .. } => "switched, motor resumed",
///         ModeChange::RestoreFailed { .. } => "switched, motor left braked",
///     }
/// }
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ModeChange {
    /// Nothing was written and the mode is unchanged.
    Unchanged(UnchangedReason),

    /// Mode switched and the previous state was driven again.
    Restored {
        /// Mode before the switch.
        previous_mode: BridgeMode,
        /// The state that was restored.
        state: MotorState,
    },

    /// Mode switched but the previous state is not available under the new
    /// wiring. The motor is left in [`MotorState::BrakeToGround`].
    RestoreFailed {
        /// Mode before the switch.
        previous_mode: BridgeMode,
        /// The state that could not be restored.
        lost_state: MotorState,
    },
}

impl ModeChange {
    /// Returns true if the bridge mode was switched.
    #[inline]
    pub const fn mode_changed(&self) -> bool {
        !matches!(self, ModeChange::Unchanged(_))
    }

    /// Returns true if the motor is back in the state it had before the call.
    #[inline]
    pub const fn state_preserved(&self) -> bool {
        !matches!(self, ModeChange::RestoreFailed { .. })
    }
}

/// Reason a mode change did nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum UnchangedReason {
    /// The chip is reporting a fault on its enable line.
    Faulted,
    /// The requested mode is already active.
    SameMode,
}

/// Phases of a bridge mode change.
///
/// Every phase boundary leaves the pins matching the committed state, so an
/// error in any phase never exposes a half-rewired bridge.
enum ModeSwitch {
    /// Drive the outputs to brake-to-ground under the old wiring.
    Neutralize { restore: MotorState },
    /// Commit the new wiring.
    Reconfigure { restore: MotorState },
    /// Drive the captured state under the new wiring.
    Restore {
        restore: MotorState,
        previous_mode: BridgeMode,
    },
}

// ============================================================================
// Motor Driver
// ============================================================================

/// Driver for one motor channel.
///
/// Owns the five pins of its [`Pinout`] through an [`IoPort`]. The committed
/// [`MotorState`] always matches what the direction pins are driving. A
/// transition whose writes all succeed commits the requested state; after a
/// partial failure the state the pins were actually left in is committed.
///
/// # Type Parameter
///
/// - `P`: The port implementation ([`IoPort`] trait). Pass `&RefCell<Port>`
///   to let both channels of a shield share one board port.
///
/// # Thread Safety
///
/// Mutating operations take `&mut self`; there is no internal locking. Use
/// one driver per channel from one thread of control.
#[derive(Debug)]
pub struct MotorDriver<P: IoPort> {
    port: P,
    pins: Pinout,
    mode: BridgeMode,
    state: MotorState,
    label: Label,
}

impl<P: IoPort> MotorDriver<P> {
    /// Create a driver and configure its pins.
    ///
    /// Direction A, direction B and throttle become outputs; current-sense
    /// and enable become inputs. Both direction outputs are driven low, so
    /// the driver starts in [`MotorState::BrakeToGround`].
    ///
    /// The enable line is configured explicitly even though Arduino-style
    /// pins power up as inputs, so ports see a `configure_input` call for it
    /// as well as for current-sense.
    ///
    /// Pin ids are not validated here; an invalid pin surfaces as the port's
    /// error.
    pub fn new(port: P, pins: Pinout, mode: BridgeMode) -> Result<Self, P::Error> {
        let mut driver = Self {
            port,
            pins,
            mode,
            state: MotorState::BrakeToGround,
            label: label(DEFAULT_LABEL),
        };
        driver.configure_pins()?;
        log::debug!(
            "{}: created in {} mode (INA={}, INB={}, PWM={}, CS={}, EN={})",
            driver.label,
            mode.as_str(),
            pins.direction_a,
            pins.direction_b,
            pins.throttle,
            pins.current_sense,
            pins.enable,
        );
        Ok(driver)
    }

    /// Create a driver from a [`DriverConfig`].
    pub fn from_config(port: P, config: &DriverConfig) -> Result<Self, P::Error> {
        let mut driver = Self::new(port, config.pins, config.mode)?;
        driver.label = config.label.clone();
        Ok(driver)
    }

    fn configure_pins(&mut self) -> Result<(), P::Error> {
        self.port.configure_output(self.pins.direction_a)?;
        self.port.configure_output(self.pins.direction_b)?;
        self.port.configure_output(self.pins.throttle)?;
        self.port.configure_input(self.pins.current_sense)?;
        self.port.configure_input(self.pins.enable)?;
        self.port.write_digital(self.pins.direction_a, Level::Low)?;
        self.port.write_digital(self.pins.direction_b, Level::Low)
    }

    /// Drive the motor into `state`.
    ///
    /// In half-bridge mode only [`MotorState::Clockwise`] and
    /// [`MotorState::BrakeToGround`] are accepted; anything else is
    /// [`Rejected`](TurnOnOutcome::Rejected) without touching a pin. The
    /// throttle duty and fault line are left alone.
    pub fn turn_on(&mut self, state: MotorState) -> Result<TurnOnOutcome, P::Error> {
        if !self.mode.supports(state) {
            log::warn!(
                "{}: {} is not available in {} mode",
                self.label,
                state.as_str(),
                self.mode.as_str()
            );
            return Ok(TurnOnOutcome::Rejected {
                reason: RejectReason::StateUnavailable {
                    state,
                    mode: self.mode,
                },
            });
        }

        let (a, b) = state.levels();
        self.write_directions(a, b)?;

        log::debug!(
            "{}: {} -> {}",
            self.label,
            self.state.as_str(),
            state.as_str()
        );
        self.state = state;
        Ok(TurnOnOutcome::Applied)
    }

    /// Write the direction pins for the current mode.
    ///
    /// If INB fails after INA was written, INA is put back to the committed
    /// state's level before the INB error is returned. If that write fails
    /// too, the state the pins are left in is committed instead.
    fn write_directions(&mut self, a: Level, b: Level) -> Result<(), P::Error> {
        self.port.write_digital(self.pins.direction_a, a)?;

        if self.mode == BridgeMode::FullBridge {
            if let Err(err) = self.port.write_digital(self.pins.direction_b, b) {
                let (committed_a, committed_b) = self.state.levels();
                if self
                    .port
                    .write_digital(self.pins.direction_a, committed_a)
                    .is_err()
                {
                    let stuck = MotorState::from_levels(a, committed_b);
                    log::error!(
                        "{}: could not roll back INA, outputs left at {}",
                        self.label,
                        stuck.as_str()
                    );
                    self.state = stuck;
                }
                return Err(err);
            }
        }

        Ok(())
    }

    /// Stop the motor: direction outputs low, throttle duty 0.
    ///
    /// Legal from any state and idempotent. INB is only driven in
    /// full-bridge mode. Every write is attempted even if an earlier one
    /// fails, and the first error is returned.
    ///
    /// The committed state follows the direction pins: a failed direction
    /// write keeps that pin at its previous level, and the state those
    /// levels encode is committed. A failed throttle write alone still
    /// leaves the motor in [`MotorState::BrakeToGround`].
    pub fn turn_off(&mut self) -> Result<(), P::Error> {
        let a = self.port.write_digital(self.pins.direction_a, Level::Low);
        let b = match self.mode {
            BridgeMode::FullBridge => self.port.write_digital(self.pins.direction_b, Level::Low),
            BridgeMode::HalfBridge => Ok(()),
        };
        let throttle = self.port.write_analog(self.pins.throttle, 0);

        let (old_a, old_b) = self.state.levels();
        let reached = MotorState::from_levels(
            if a.is_ok() { Level::Low } else { old_a },
            if b.is_ok() { Level::Low } else { old_b },
        );
        if reached != self.state {
            log::debug!(
                "{}: {} -> {}",
                self.label,
                self.state.as_str(),
                reached.as_str()
            );
        }
        self.state = reached;

        a.and(b).and(throttle)
    }

    /// Switch the bridge wiring.
    ///
    /// Does nothing while the chip reports a fault, or when `new_mode` is
    /// already active. Otherwise the motor is turned off, the mode is
    /// committed, and the previous state is driven again under the new
    /// wiring. If that state does not exist under `new_mode`, the motor stays
    /// in [`MotorState::BrakeToGround`] and
    /// [`ModeChange::RestoreFailed`] is returned.
    ///
    /// A port error during the restore leaves the new mode committed and the
    /// motor off.
    pub fn change_bridge_mode(&mut self, new_mode: BridgeMode) -> Result<ModeChange, P::Error> {
        if self.is_faulty()? {
            log::warn!(
                "{}: fault active, staying in {} mode",
                self.label,
                self.mode.as_str()
            );
            return Ok(ModeChange::Unchanged(UnchangedReason::Faulted));
        }
        if new_mode == self.mode {
            return Ok(ModeChange::Unchanged(UnchangedReason::SameMode));
        }

        let mut phase = ModeSwitch::Neutralize {
            restore: self.state,
        };
        loop {
            phase = match phase {
                ModeSwitch::Neutralize { restore } => {
                    self.turn_off()?;
                    ModeSwitch::Reconfigure { restore }
                }
                ModeSwitch::Reconfigure { restore } => {
                    let previous_mode = core::mem::replace(&mut self.mode, new_mode);
                    log::debug!(
                        "{}: {} -> {} mode",
                        self.label,
                        previous_mode.as_str(),
                        new_mode.as_str()
                    );
                    ModeSwitch::Restore {
                        restore,
                        previous_mode,
                    }
                }
                ModeSwitch::Restore {
                    restore,
                    previous_mode,
                } => {
                    let change = match self.turn_on(restore)? {
                        TurnOnOutcome::Applied => ModeChange::Restored {
                            previous_mode,
                            state: restore,
                        },
                        TurnOnOutcome::Rejected { .. } => {
                            log::warn!(
                                "{}: could not restore {} after switching to {} mode, motor left braked",
                                self.label,
                                restore.as_str(),
                                new_mode.as_str()
                            );
                            ModeChange::RestoreFailed {
                                previous_mode,
                                lost_state: restore,
                            }
                        }
                    };
                    return Ok(change);
                }
            };
        }
    }

    /// Returns true if the chip is holding its enable line low.
    ///
    /// The line is pulled high externally and only pulled low by the chip on
    /// an overcurrent or thermal shutdown. Every call samples the pin.
    pub fn is_faulty(&mut self) -> Result<bool, P::Error> {
        let level = self.port.read_digital(self.pins.enable)?;
        Ok(level.is_low())
    }

    /// Raw current-sense reading at the converter's native resolution.
    ///
    /// Not scaled to amps; that needs the board's sense resistor value.
    pub fn check_motor_current_draw(&mut self) -> Result<u16, P::Error> {
        self.port.read_analog(self.pins.current_sense)
    }

    /// Set the throttle duty in the port's native units.
    ///
    /// Does not change the committed state.
    pub fn set_throttle(&mut self, duty: u16) -> Result<(), P::Error> {
        self.port.write_analog(self.pins.throttle, duty)
    }

    /// The last committed state.
    #[inline]
    pub fn motor_state(&self) -> MotorState {
        self.state
    }

    /// The active bridge mode.
    #[inline]
    pub fn mode(&self) -> BridgeMode {
        self.mode
    }

    /// The pins this driver owns.
    #[inline]
    pub fn pins(&self) -> &Pinout {
        &self.pins
    }

    /// The channel label used in log output.
    #[inline]
    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    /// Returns true if neither direction is being driven (a braking state).
    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.state.is_braking()
    }

    /// Shared access to the underlying port.
    #[inline]
    pub fn port(&self) -> &P {
        &self.port
    }

    /// Give the port back without writing to any pin.
    pub fn release(self) -> P {
        self.port
    }

    /// Turn the motor off, then give the port back.
    pub fn shutdown(mut self) -> Result<P, P::Error> {
        self.turn_off()?;
        Ok(self.port)
    }
}

// ============================================================================
// Tests
// ============================================================================
