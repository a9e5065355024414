//! Pin assignment configuration for motor driver channels.
//!
//! Uses `heapless::String` for labels so configs can be built without an
//! allocator.
//!
//! # Example
//!
//! ```rust
//! use vnh_shield::config::{check_pin_conflicts, DriverConfig, Pinout};
//! use vnh_shield::BridgeMode;
//!
//! let left = DriverConfig::new(Pinout::new(0, 2, 7, 8, 5))
//!     .with_label("left")
//!     .with_mode(BridgeMode::FullBridge);
//! let right = DriverConfig::new(Pinout::new(1, 3, 4, 9, 6)).with_label("right");
//!
//! assert!(check_pin_conflicts(&[left.pins, right.pins]).is_ok());
//! ```

use core::fmt;

use heapless::String as HString;

use crate::driver::BridgeMode;
use crate::traits::PinId;

/// Maximum length for channel labels.
pub const MAX_LABEL: usize = 32;

/// Type alias for channel labels.
pub type Label = HString<MAX_LABEL>;

/// Label used when none is configured.
pub const DEFAULT_LABEL: &str = "motor";

/// Create a Label from a &str, truncating on a UTF-8 boundary if too long
pub fn label(s: &str) -> Label {
    let mut hs = Label::new();
    let take = s.len().min(MAX_LABEL);
    let valid_end = s
        .char_indices()
        .take_while(|(i, c)| i + c.len_utf8() <= take)
        .last()
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let _ = hs.push_str(&s[..valid_end]);
    hs
}

// ============================================================================
// Pinout
// ============================================================================

/// The five lines one driver chip is wired to.
///
/// Field order matches the chip's pin naming: EN/DIAG, CS, INA, INB, PWM.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pinout {
    /// Enable/fault line (EN/DIAG). Pulled high externally, pulled low by the chip on fault.
    pub enable: PinId,
    /// Analog current-sense line (CS).
    pub current_sense: PinId,
    /// Direction input A (INA).
    pub direction_a: PinId,
    /// Direction input B (INB).
    pub direction_b: PinId,
    /// PWM throttle line.
    pub throttle: PinId,
}

impl Pinout {
    /// Create a pinout from the five pin ids.
    pub const fn new(
        enable: PinId,
        current_sense: PinId,
        direction_a: PinId,
        direction_b: PinId,
        throttle: PinId,
    ) -> Self {
        Self {
            enable,
            current_sense,
            direction_a,
            direction_b,
            throttle,
        }
    }

    /// Set the enable/fault pin
    pub fn with_enable(mut self, pin: PinId) -> Self {
        self.enable = pin;
        self
    }

    /// Set the current-sense pin
    pub fn with_current_sense(mut self, pin: PinId) -> Self {
        self.current_sense = pin;
        self
    }

    /// Set direction pin A
    pub fn with_direction_a(mut self, pin: PinId) -> Self {
        self.direction_a = pin;
        self
    }

    /// Set direction pin B
    pub fn with_direction_b(mut self, pin: PinId) -> Self {
        self.direction_b = pin;
        self
    }

    /// Set the throttle pin
    pub fn with_throttle(mut self, pin: PinId) -> Self {
        self.throttle = pin;
        self
    }

    /// All five pins, in field order.
    pub const fn pins(&self) -> [PinId; 5] {
        [
            self.enable,
            self.current_sense,
            self.direction_a,
            self.direction_b,
            self.throttle,
        ]
    }

    /// Returns true if `pin` is one of this pinout's lines.
    pub fn contains(&self, pin: PinId) -> bool {
        self.pins().contains(&pin)
    }

    /// Returns the first pin assigned to more than one line, if any.
    pub fn duplicate_pin(&self) -> Option<PinId> {
        let pins = self.pins();
        pins.iter()
            .enumerate()
            .find(|&(i, pin)| pins[i + 1..].contains(pin))
            .map(|(_, pin)| *pin)
    }
}

// ============================================================================
// Pin conflicts
// ============================================================================

/// A pin claimed by more than one line.
///
/// `first` and `second` index into the slice passed to
/// [`check_pin_conflicts`]; they are equal when a single pinout reuses a pin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PinConflict {
    /// The shared pin.
    pub pin: PinId,
    /// Index of the first pinout using the pin.
    pub first: usize,
    /// Index of the pinout that uses it again.
    pub second: usize,
}

impl fmt::Display for PinConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.first == self.second {
            write!(f, "pin {} is used twice by channel {}", self.pin, self.first)
        } else {
            write!(
                f,
                "pin {} is shared by channels {} and {}",
                self.pin, self.first, self.second
            )
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PinConflict {}

/// Check that no pin is claimed twice across a set of channel pinouts.
///
/// Drivers cannot see their siblings, so whoever allocates pins across the
/// board calls this before creating them.
pub fn check_pin_conflicts(pinouts: &[Pinout]) -> Result<(), PinConflict> {
    let mut owner: [Option<usize>; 256] = [None; 256];

    for (index, pinout) in pinouts.iter().enumerate() {
        for pin in pinout.pins() {
            let slot = &mut owner[pin as usize];
            if let Some(first) = *slot {
                return Err(PinConflict {
                    pin,
                    first,
                    second: index,
                });
            }
            *slot = Some(index);
        }
    }

    Ok(())
}

// ============================================================================
// Driver Config
// ============================================================================

/// Configuration for one driver channel
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DriverConfig {
    /// Human-readable channel name, used in log output
    pub label: Label,
    /// Pin assignment
    pub pins: Pinout,
    /// Bridge wiring at creation
    pub mode: BridgeMode,
}

impl DriverConfig {
    /// Create a full-bridge config with the default label.
    pub fn new(pins: Pinout) -> Self {
        Self {
            label: label(DEFAULT_LABEL),
            pins,
            mode: BridgeMode::FullBridge,
        }
    }

    /// Set the channel label
    pub fn with_label(mut self, name: &str) -> Self {
        self.label = label(name);
        self
    }

    /// Set the pin assignment
    pub fn with_pins(mut self, pins: Pinout) -> Self {
        self.pins = pins;
        self
    }

    /// Set the bridge mode
    pub fn with_mode(mut self, mode: BridgeMode) -> Self {
        self.mode = mode;
        self
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const LEFT: Pinout = Pinout::new(0, 2, 7, 8, 5);
    const RIGHT: Pinout = Pinout::new(1, 3, 4, 9, 6);

    #[test]
    fn pinout_field_order() {
        assert_eq!(LEFT.enable, 0);
        assert_eq!(LEFT.current_sense, 2);
        assert_eq!(LEFT.direction_a, 7);
        assert_eq!(LEFT.direction_b, 8);
        assert_eq!(LEFT.throttle, 5);
        assert_eq!(LEFT.pins(), [0, 2, 7, 8, 5]);
    }

    #[test]
    fn pinout_builder() {
        let pins = LEFT
            .with_enable(14)
            .with_current_sense(15)
            .with_direction_a(10)
            .with_direction_b(11)
            .with_throttle(12);

        assert_eq!(pins, Pinout::new(14, 15, 10, 11, 12));
    }

    #[test]
    fn pinout_contains() {
        assert!(LEFT.contains(7));
        assert!(!LEFT.contains(4));
    }

    #[test]
    fn pinout_duplicate_pin() {
        assert_eq!(LEFT.duplicate_pin(), None);
        assert_eq!(LEFT.with_throttle(7).duplicate_pin(), Some(7));
        assert_eq!(LEFT.with_direction_b(0).duplicate_pin(), Some(0));
    }

    #[test]
    fn no_conflicts_between_distinct_channels() {
        assert_eq!(check_pin_conflicts(&[LEFT, RIGHT]), Ok(()));
        assert_eq!(check_pin_conflicts(&[]), Ok(()));
    }

    #[test]
    fn conflict_between_channels() {
        let right = RIGHT.with_throttle(5);
        let err = check_pin_conflicts(&[LEFT, right]).unwrap_err();
        assert_eq!(
            err,
            PinConflict {
                pin: 5,
                first: 0,
                second: 1
            }
        );
        assert_eq!(err.to_string(), "pin 5 is shared by channels 0 and 1");
    }

    #[test]
    fn conflict_within_one_channel() {
        let err = check_pin_conflicts(&[LEFT.with_direction_b(7)]).unwrap_err();
        assert_eq!(err.first, err.second);
        assert_eq!(err.to_string(), "pin 7 is used twice by channel 0");
    }

    #[test]
    fn driver_config_default() {
        let config = DriverConfig::new(LEFT);
        assert_eq!(config.label.as_str(), "motor");
        assert_eq!(config.mode, BridgeMode::FullBridge);
        assert_eq!(config.pins, LEFT);
    }

    #[test]
    fn driver_config_builder() {
        let config = DriverConfig::new(LEFT)
            .with_label("winch")
            .with_mode(BridgeMode::HalfBridge)
            .with_pins(RIGHT);

        assert_eq!(config.label.as_str(), "winch");
        assert_eq!(config.mode, BridgeMode::HalfBridge);
        assert_eq!(config.pins, RIGHT);
    }

    #[test]
    fn label_truncation() {
        let long_input = "a".repeat(100);
        let s = label(&long_input);
        assert_eq!(s.len(), MAX_LABEL);
    }

    #[test]
    fn label_utf8_boundary() {
        // 4-byte chars: 8 fit exactly in 32 bytes, the 9th must be dropped whole
        let input = "🚂".repeat(9);
        let s = label(&input);
        assert_eq!(s.len(), 32);
        assert!(core::str::from_utf8(s.as_bytes()).is_ok());

        let input = format!("a{}", "🚂".repeat(8));
        let s = label(&input);
        assert_eq!(s.len(), 29);
    }
}
