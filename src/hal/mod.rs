//! Hardware Abstraction Layer implementations.
//!
//! This module contains concrete implementations of the [`IoPort`] trait
//! defined in [`crate::traits`].
//!
//! # Available Implementations
//!
//! - `mock`: Recording port for desktop development and tests
//! - `ehal`: Adapter over embedded-hal 1.0 pins (requires `embedded-hal` feature)
//!
//! [`IoPort`]: crate::traits::IoPort

pub mod mock;

#[cfg(feature = "embedded-hal")]
pub mod ehal;

pub use mock::*;

#[cfg(feature = "embedded-hal")]
pub use ehal::*;
