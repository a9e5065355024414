//! Edge case and failure tests for the motor driver

use core::cell::RefCell;

use vnh_shield::{
    check_pin_conflicts,
    hal::MockPort,
    BridgeMode, Level, ModeChange, MotorDriver, MotorState, PinConflict, PinMode, Pinout,
    PortError, RejectReason, TurnOnOutcome, UnchangedReason,
};

const PINS: Pinout = Pinout::new(0, 2, 7, 8, 5);

// ============================================================================
// Rejection Tests
// ============================================================================

#[test]
fn half_bridge_rejection_reports_state_and_mode() {
    let mut driver = MotorDriver::new(MockPort::new(), PINS, BridgeMode::HalfBridge).unwrap();

    let outcome = driver.turn_on(MotorState::BrakeToSupply).unwrap();

    assert_eq!(
        outcome,
        TurnOnOutcome::Rejected {
            reason: RejectReason::StateUnavailable {
                state: MotorState::BrakeToSupply,
                mode: BridgeMode::HalfBridge,
            }
        }
    );
    assert!(!outcome.is_applied());
}

#[test]
fn rejected_request_after_fault_is_still_rejected() {
    let board = RefCell::new(MockPort::new());
    let mut driver = MotorDriver::new(&board, PINS, BridgeMode::HalfBridge).unwrap();
    board.borrow_mut().set_input(PINS.enable, Level::Low);

    // The fault line does not gate turn_on, only mode changes
    assert!(driver.turn_on(MotorState::Clockwise).unwrap().is_applied());
    assert!(!driver
        .turn_on(MotorState::CounterClockwise)
        .unwrap()
        .is_applied());
}

#[test]
fn turn_on_same_state_rewrites_pins() {
    let mut driver = MotorDriver::new(MockPort::new(), PINS, BridgeMode::FullBridge).unwrap();
    driver.turn_on(MotorState::Clockwise).unwrap();
    let writes = driver.port().write_count();

    assert!(driver.turn_on(MotorState::Clockwise).unwrap().is_applied());
    assert_eq!(driver.port().write_count(), writes + 2);
}

#[test]
fn faulted_same_mode_reports_fault() {
    let board = RefCell::new(MockPort::new());
    let mut driver = MotorDriver::new(&board, PINS, BridgeMode::FullBridge).unwrap();
    board.borrow_mut().set_input(PINS.enable, Level::Low);

    assert_eq!(
        driver.change_bridge_mode(BridgeMode::FullBridge).unwrap(),
        ModeChange::Unchanged(UnchangedReason::Faulted)
    );
}

#[test]
fn brake_to_supply_lost_on_half_bridge() {
    let mut driver = MotorDriver::new(MockPort::new(), PINS, BridgeMode::FullBridge).unwrap();
    driver.turn_on(MotorState::BrakeToSupply).unwrap();

    let change = driver.change_bridge_mode(BridgeMode::HalfBridge).unwrap();

    assert_eq!(
        change,
        ModeChange::RestoreFailed {
            previous_mode: BridgeMode::FullBridge,
            lost_state: MotorState::BrakeToSupply,
        }
    );
    assert_eq!(driver.motor_state(), MotorState::BrakeToGround);
}

// ============================================================================
// Port Failure Tests
// ============================================================================

#[test]
fn creation_fails_on_unconfigurable_pin() {
    let mut port = MockPort::new();
    port.fail_pin(PINS.current_sense);

    let err = MotorDriver::new(port, PINS, BridgeMode::FullBridge).unwrap_err();
    assert_eq!(err, PortError::Hardware(PINS.current_sense));
    assert_eq!(err.pin(), PINS.current_sense);
}

#[test]
fn rejected_turn_on_never_touches_a_broken_port() {
    let board = RefCell::new(MockPort::new());
    let mut driver = MotorDriver::new(&board, PINS, BridgeMode::HalfBridge).unwrap();
    board.borrow_mut().fail_pin(PINS.direction_a);

    // Rejection happens before any write, so the broken pin is never hit
    let outcome = driver.turn_on(MotorState::CounterClockwise).unwrap();
    assert!(!outcome.is_applied());
}

#[test]
fn failed_neutralize_leaves_mode_untouched() {
    let board = RefCell::new(MockPort::new());
    let mut driver = MotorDriver::new(&board, PINS, BridgeMode::FullBridge).unwrap();
    driver.turn_on(MotorState::Clockwise).unwrap();
    board.borrow_mut().fail_pin(PINS.throttle);

    let err = driver.change_bridge_mode(BridgeMode::HalfBridge).unwrap_err();

    assert_eq!(err, PortError::Hardware(PINS.throttle));
    assert_eq!(driver.mode(), BridgeMode::FullBridge);
    // Both direction writes landed, so the motor is braked
    assert_eq!(driver.motor_state(), MotorState::BrakeToGround);
}

#[test]
fn partial_turn_off_keeps_state_in_step_with_pins() {
    let cases = [
        (MotorState::Clockwise, PINS.direction_b),
        (MotorState::CounterClockwise, PINS.direction_a),
        (MotorState::BrakeToSupply, PINS.direction_a),
        (MotorState::BrakeToSupply, PINS.direction_b),
    ];

    for (state, broken) in cases {
        let board = RefCell::new(MockPort::new());
        let mut driver = MotorDriver::new(&board, PINS, BridgeMode::FullBridge).unwrap();
        driver.turn_on(state).unwrap();
        board.borrow_mut().fail_pin(broken);

        assert_eq!(driver.turn_off(), Err(PortError::Hardware(broken)));

        let port = board.borrow();
        assert_eq!(
            driver.motor_state().levels(),
            (port.level(PINS.direction_a), port.level(PINS.direction_b)),
            "{:?} with pin {} broken",
            state,
            broken
        );
    }
}

#[test]
fn failed_restore_leaves_new_mode_and_motor_off() {
    let board = RefCell::new(MockPort::new());
    let mut driver = MotorDriver::new(&board, PINS, BridgeMode::HalfBridge).unwrap();
    driver.turn_on(MotorState::Clockwise).unwrap();

    // INB is only written during the restore under full-bridge wiring
    board.borrow_mut().fail_pin(PINS.direction_b);
    let err = driver.change_bridge_mode(BridgeMode::FullBridge).unwrap_err();

    assert_eq!(err, PortError::Hardware(PINS.direction_b));
    assert_eq!(driver.mode(), BridgeMode::FullBridge);
    assert_eq!(driver.motor_state(), MotorState::BrakeToGround);
    assert_eq!(board.borrow().level(PINS.direction_a), Level::Low);
}

#[test]
fn current_read_error_propagates() {
    let board = RefCell::new(MockPort::new());
    let mut driver = MotorDriver::new(&board, PINS, BridgeMode::FullBridge).unwrap();
    board.borrow_mut().fail_pin(PINS.current_sense);

    assert_eq!(
        driver.check_motor_current_draw(),
        Err(PortError::Hardware(PINS.current_sense))
    );
}

#[test]
fn port_errors_display() {
    assert_eq!(
        PortError::NotConfigured(4).to_string(),
        "pin 4 used before being configured"
    );
    assert_eq!(
        PortError::WrongMode {
            pin: 7,
            requested: PinMode::Input
        }
        .to_string(),
        "pin 7 cannot be configured as Input"
    );
}

#[test]
fn port_error_works_with_anyhow() {
    fn run() -> anyhow::Result<()> {
        let mut port = MockPort::new();
        port.fail_pin(PINS.direction_a);
        MotorDriver::new(port, PINS, BridgeMode::FullBridge)?;
        Ok(())
    }

    let err = run().unwrap_err();
    assert_eq!(err.to_string(), "hardware failure on pin 7");
}

// ============================================================================
// Boundary Value Tests
// ============================================================================

#[test]
fn throttle_extremes_pass_through() {
    let mut driver = MotorDriver::new(MockPort::new(), PINS, BridgeMode::FullBridge).unwrap();

    for duty in [0, 1, u16::MAX] {
        driver.set_throttle(duty).unwrap();
        assert_eq!(driver.port().duty(PINS.throttle), duty);
    }
    assert_eq!(driver.motor_state(), MotorState::BrakeToGround);
}

#[test]
fn current_draw_extremes() {
    let board = RefCell::new(MockPort::new());
    let mut driver = MotorDriver::new(&board, PINS, BridgeMode::FullBridge).unwrap();

    for raw in [0, u16::MAX] {
        board.borrow_mut().set_analog(PINS.current_sense, raw);
        assert_eq!(driver.check_motor_current_draw().unwrap(), raw);
    }
}

#[test]
fn highest_pin_ids() {
    let pins = Pinout::new(251, 252, 253, 254, 255);
    let mut driver = MotorDriver::new(MockPort::new(), pins, BridgeMode::FullBridge).unwrap();
    driver.turn_on(MotorState::Clockwise).unwrap();
    assert_eq!(driver.port().level(255), Level::Low);
    assert_eq!(driver.port().level(253), Level::High);
    assert!(check_pin_conflicts(&[pins]).is_ok());
}

// ============================================================================
// Pin Conflict Tests
// ============================================================================

#[test]
fn conflict_reports_first_owner() {
    let a = Pinout::new(0, 1, 2, 3, 4);
    let b = Pinout::new(10, 11, 12, 13, 14);
    let c = Pinout::new(20, 21, 3, 23, 24);

    assert_eq!(
        check_pin_conflicts(&[a, b, c]),
        Err(PinConflict {
            pin: 3,
            first: 0,
            second: 2
        })
    );
}

#[test]
fn enable_shared_between_channels_is_a_conflict() {
    let left = Pinout::new(0, 2, 7, 8, 5);
    let right = Pinout::new(0, 3, 4, 9, 6);
    let err = check_pin_conflicts(&[left, right]).unwrap_err();
    assert_eq!(err.pin, 0);
    assert_eq!(err.to_string(), "pin 0 is shared by channels 0 and 1");
}

// ============================================================================
// Text Parsing Tests
// ============================================================================

#[test]
fn parse_states_and_modes() {
    assert_eq!(MotorState::from_text("Clockwise"), Some(MotorState::Clockwise));
    assert_eq!(
        MotorState::from_text("CounterClockwise"),
        Some(MotorState::CounterClockwise)
    );
    assert_eq!(MotorState::from_text("VCC"), Some(MotorState::BrakeToSupply));
    assert_eq!(MotorState::from_text("forward"), None);

    assert_eq!(BridgeMode::from_text("Half"), Some(BridgeMode::HalfBridge));
    assert_eq!(BridgeMode::from_text("fullbridge"), Some(BridgeMode::FullBridge));
    assert_eq!(BridgeMode::from_text(""), None);
}
