//! Trait definitions for hardware abstraction.
//!
//! This module defines the abstraction that lets vnh-shield:
//! - Run on different hardware (any embedded-hal 1.0 board, Arduino-style ports)
//! - Be tested on desktop against a recording mock
//!
//! # Submodules
//!
//! - `hardware`: The pin-level [`IoPort`] trait, line levels, and port errors
//!
//! # Hardware Abstraction
//!
//! The key hardware trait is [`IoPort`]: configure, read and write pins by
//! [`PinId`]. A [`MotorDriver`](crate::MotorDriver) owns (or borrows) one
//! port and only ever talks to the five pins in its pinout.

pub mod hardware;

pub use hardware::*;
