//! Desktop walkthrough of a two-channel shield on a mock board.
//!
//! Both channels share one [`MockPort`] through a `RefCell`, the way two
//! drivers share the GPIO block of a real board. The demo runs each motor,
//! rewires the left channel to half-bridge, injects a fault on the right
//! channel, and shuts everything down.
//!
//! # Usage
//!
//! ```sh
//! cargo run --example shield_demo
//! ```

use std::cell::RefCell;

use anyhow::Context;
use vnh_shield::hal::MockPort;
use vnh_shield::{
    check_pin_conflicts, BridgeMode, DriverConfig, IoPort, Level, ModeChange, MotorDriver,
    MotorState, Pinout, TurnOnOutcome,
};

fn report<P: IoPort>(driver: &mut MotorDriver<P>) -> anyhow::Result<()>
where
    P::Error: std::error::Error + Send + Sync + 'static,
{
    let faulty = driver.is_faulty()?;
    let current = driver.check_motor_current_draw()?;
    println!(
        "  [{}] {} / {}  current={}  fault={}",
        driver.label(),
        driver.mode().as_str(),
        driver.motor_state().as_str(),
        current,
        faulty
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    println!("=================================");
    println!("  vnh-shield Demo");
    println!("=================================");
    println!();

    let left_config = DriverConfig::new(Pinout::new(0, 2, 7, 8, 5)).with_label("left");
    let right_config = DriverConfig::new(Pinout::new(1, 3, 4, 9, 6)).with_label("right");
    check_pin_conflicts(&[left_config.pins, right_config.pins])
        .context("shield pinout is inconsistent")?;

    let board = RefCell::new(MockPort::new());
    let mut left = MotorDriver::from_config(&board, &left_config)?;
    let mut right = MotorDriver::from_config(&board, &right_config)?;

    println!("Running both motors:");
    left.turn_on(MotorState::Clockwise)?;
    left.set_throttle(180)?;
    right.turn_on(MotorState::CounterClockwise)?;
    right.set_throttle(120)?;
    board.borrow_mut().set_analog(left_config.pins.current_sense, 212);
    board.borrow_mut().set_analog(right_config.pins.current_sense, 164);
    report(&mut left)?;
    report(&mut right)?;
    println!();

    println!("Rewiring left channel to half-bridge:");
    match left.change_bridge_mode(BridgeMode::HalfBridge)? {
        ModeChange::Restored { state, .. } => println!("  resumed {}", state.as_str()),
        ModeChange::RestoreFailed { lost_state, .. } => {
            println!("  {} unavailable, motor braked", lost_state.as_str())
        }
        ModeChange::Unchanged(reason) => println!("  unchanged: {:?}", reason),
    }
    if let TurnOnOutcome::Rejected { reason } = left.turn_on(MotorState::BrakeToSupply)? {
        println!("  rejected: {:?}", reason);
    }
    report(&mut left)?;
    println!();

    println!("Overcurrent on right channel:");
    board
        .borrow_mut()
        .set_input(right_config.pins.enable, Level::Low);
    report(&mut right)?;
    if right.is_faulty()? {
        right.turn_off()?;
        let change = right.change_bridge_mode(BridgeMode::HalfBridge)?;
        println!("  mode change while faulted: {:?}", change);
    }
    report(&mut right)?;
    println!();

    println!("Shutting down");
    left.shutdown()?;
    right.shutdown()?;

    let port = board.borrow();
    println!("  {} pin writes recorded", port.write_count());
    for pin in [7, 8, 4, 9] {
        println!("  pin {} -> {:?}", pin, port.level(pin));
    }

    Ok(())
}
