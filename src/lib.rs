//! # vnh-shield
//!
//! A state-machine driver for VNH2SP30-class dual H-bridge motor shields.
//!
//! ## Features
//!
//! - **Hardware abstraction**: A pin-level [`IoPort`] trait, a recording mock, and an
//!   embedded-hal 1.0 adapter
//! - **Committed state**: The driver's [`MotorState`] always matches what the direction pins drive
//! - **Bridge modes**: Half-bridge wiring only exposes the states it can physically produce
//! - **Safe rewiring**: Mode changes pass through brake-to-ground and are refused while the chip
//!   reports a fault
//!
//! ## Architecture
//!
//! The crate is structured to allow testing on desktop without hardware:
//!
//! - `traits` - Hardware abstraction (pins, levels, port errors)
//! - `driver` - The per-channel state machine
//! - `config` - Pin assignments, labels, and pin conflict checks
//! - `hal` - Concrete ports (mock for testing, embedded-hal for boards)
//!
//! ## Example
//!
//! ```rust
//! use core::cell::RefCell;
//! use vnh_shield::{
//!     check_pin_conflicts, hal::MockPort, BridgeMode, DriverConfig, MotorDriver, MotorState,
//!     Pinout,
//! };
//!
//! // Both channels of the shield live on one board port
//! let board = RefCell::new(MockPort::new());
//! let left = DriverConfig::new(Pinout::new(0, 2, 7, 8, 5)).with_label("left");
//! let right = DriverConfig::new(Pinout::new(1, 3, 4, 9, 6)).with_label("right");
//! check_pin_conflicts(&[left.pins, right.pins]).unwrap();
//!
//! let mut left = MotorDriver::from_config(&board, &left).unwrap();
//! let mut right = MotorDriver::from_config(&board, &right).unwrap();
//!
//! left.turn_on(MotorState::Clockwise).unwrap();
//! right.turn_on(MotorState::CounterClockwise).unwrap();
//! left.set_throttle(200).unwrap();
//!
//! if left.is_faulty().unwrap() {
//!     left.turn_off().unwrap();
//! }
//! assert_eq!(left.motor_state(), MotorState::Clockwise);
//!
//! // Rewiring to half-bridge keeps clockwise running
//! let change = left.change_bridge_mode(BridgeMode::HalfBridge).unwrap();
//! assert!(change.state_preserved());
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

/// Pin assignments, channel labels, and pin conflict checks.
pub mod config;
/// Per-channel H-bridge state machine.
pub mod driver;
/// Hardware abstraction layer with mock and embedded-hal ports.
pub mod hal;
/// Core traits for hardware abstraction.
pub mod traits;

// Re-exports for convenience
pub use config::{check_pin_conflicts, DriverConfig, Label, PinConflict, Pinout};
pub use driver::{
    BridgeMode, ModeChange, MotorDriver, MotorState, RejectReason, TurnOnOutcome, UnchangedReason,
};
pub use traits::{IoPort, Level, PinId, PinMode, PortError};
