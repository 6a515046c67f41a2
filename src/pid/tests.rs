use super::*;
use proptest::prelude::*;

fn controller(raw_p: &str, raw_i: &str, raw_d: &str, buffer: &str) -> PidController {
    let mut pid = PidController::new(3, 10.0).unwrap();
    pid.parameters_check(raw_p, raw_i, raw_d, "50", "0", "0.5", buffer)
        .unwrap();
    pid
}

#[test]
fn test_gain_transformation() {
    let gains = PidGains::from_raw(4.0, 2.0, 3.0);
    assert_eq!(gains, PidGains { p: 0.25, i: 0.125, d: 0.75 });
    assert_eq!(PidGains::from_raw(2.0, 0.0, 0.0).i, 0.0);
}

#[test]
fn test_parameters_check_rejects_each_field() {
    let cases = [
        (["x", "0", "0", "20", "1", "0.1", "3"], PidField::P),
        (["0", "0", "0", "20", "1", "0.1", "3"], PidField::P),
        (["1", "-1", "0", "20", "1", "0.1", "3"], PidField::I),
        (["1", "0", "-2", "20", "1", "0.1", "3"], PidField::D),
        (["1", "0", "0", "warm", "1", "0.1", "3"], PidField::SetPoint),
        (["1", "0", "0", "20", "-1", "0.1", "3"], PidField::Ramp),
        (["1", "0", "0", "20", "1", "big", "3"], PidField::MaxVoltageStep),
        (["1", "0", "0", "20", "1", "0.1", "2.5"], PidField::BufferLength),
        (["1", "0", "0", "20", "1", "0.1", "1"], PidField::BufferLength),
    ];

    for (args, expected) in cases {
        let result = PidParameters::parse(
            args[0], args[1], args[2], args[3], args[4], args[5], args[6],
        );
        match result {
            Err(PidError::InvalidParameter { field, .. }) => assert_eq!(field, expected),
            other => panic!("{:?} accepted for {:?}: {:?}", args, expected, other),
        }
    }
}

#[test]
fn test_parameters_check_is_atomic() {
    let mut pid = controller("2", "0", "0", "3");
    let before = pid.gains();

    let result = pid.parameters_check("10", "1", "1", "80", "1", "0.2", "oops");
    assert!(result.is_err());
    assert_eq!(pid.gains(), before);
    assert_eq!(pid.set_point(), 50.0);
    assert_eq!(pid.max_voltage_step(), 0.5);
}

#[test]
fn test_decimal_comma_accepted() {
    let params = PidParameters::parse("0,5", "0", "0", "21,5", "0", "0,1", "4").unwrap();
    assert_eq!(params.gains.p, 2.0);
    assert_eq!(params.set_point, 21.5);
}

#[test]
fn test_idle_controller_keeps_voltage() {
    let mut pid = controller("1", "0", "0", "3");
    assert_eq!(pid.state(), PidState::Idle);
    let output = pid.tick(0.0, 20.0, 1.25);
    assert_eq!(output.voltage, 1.25);
}

#[test]
fn test_warm_up_returns_previous_voltage() {
    let mut pid = controller("10", "0", "0", "3");
    pid.reset(20.0);

    assert_eq!(pid.tick(0.0, 20.0, 1.0).voltage, 1.0);
    assert_eq!(pid.tick(10.0, 20.0, 1.0).voltage, 1.0);
    let output = pid.tick(20.0, 20.0, 1.0);
    assert_ne!(output.voltage, 1.0);
}

#[test]
fn test_proportional_response_is_rate_limited() {
    // Set point 50, temperature 20: error 30, P = 0.1 -> 5.3 * 3 = clamped 5.3
    let mut pid = controller("10", "0", "0", "2");
    pid.reset(50.0);
    pid.tick(0.0, 20.0, 0.0);
    let output = pid.tick(10.0, 20.0, 0.0);
    assert!((output.voltage - 0.5).abs() < 1e-12);
    assert_eq!(output.status, "50.0 °C => 50.0 °C");
}

#[test]
fn test_integral_bootstrap_keeps_voltage() {
    let mut pid = controller("10", "100", "0", "2");
    pid.reset(49.0);
    pid.tick(0.0, 48.0, 2.0);
    let output = pid.tick(10.0, 48.5, 2.0);

    assert!((output.voltage - 2.0).abs() < 1e-9);
    assert_ne!(pid.integral(), 0.0);
}

#[test]
fn test_set_point_ramps_from_both_sides() {
    let mut pid = PidController::new(5, 30.0).unwrap();
    // 2 °C/min at 30 s per tick: 1 °C per tick
    pid.parameters_check("1", "0", "0", "22.5", "2", "0.1", "5")
        .unwrap();

    pid.reset(20.0);
    pid.tick(0.0, 20.0, 0.0);
    assert_eq!(pid.actual_set_point(), 21.0);
    pid.tick(30.0, 20.0, 0.0);
    assert_eq!(pid.actual_set_point(), 22.0);
    let output = pid.tick(60.0, 20.0, 0.0);
    assert_eq!(pid.actual_set_point(), 22.5);
    assert_eq!(output.status, "22.5 °C => 22.5 °C");

    pid.reset(25.0);
    pid.tick(90.0, 25.0, 0.0);
    assert_eq!(pid.actual_set_point(), 24.0);
}

#[test]
fn test_non_finite_temperature_is_ignored() {
    let mut pid = controller("10", "100", "0", "2");
    pid.reset(49.0);

    for temperature in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        assert_eq!(pid.tick(0.0, temperature, 2.0).voltage, 2.0);
    }
    assert_eq!(pid.integral(), 0.0);

    pid.tick(0.0, 48.0, 2.0);
    let output = pid.tick(10.0, 48.5, 2.0);
    assert!(output.voltage.is_finite());
    assert!(pid.integral().is_finite());
    assert_ne!(pid.integral(), 0.0);
}

#[test]
fn test_stop_and_restart() {
    let mut pid = controller("1", "0", "0", "2");
    pid.reset(20.0);
    assert_eq!(pid.state(), PidState::Active);
    pid.stop();
    assert_eq!(pid.state(), PidState::Idle);
}

#[test]
fn test_invalid_construction() {
    assert!(matches!(
        PidController::new(1, 10.0),
        Err(PidError::InvalidParameter {
            field: PidField::BufferLength,
            ..
        })
    ));
    assert_eq!(
        PidController::new(3, 0.0).unwrap_err(),
        PidError::InvalidPeriod(0.0)
    );
}

#[test]
fn test_sliding_buffer_evicts_oldest() {
    let mut buffer = SlidingBuffer::new(3);
    for value in 1..=5 {
        buffer.push(value);
    }
    assert!(buffer.is_full());
    assert_eq!(buffer.iter().copied().collect::<Vec<_>>(), vec![3, 4, 5]);

    buffer.resize(2);
    assert_eq!(buffer.iter().copied().collect::<Vec<_>>(), vec![4, 5]);
    buffer.resize(4);
    assert!(!buffer.is_full());
    buffer.push(6);
    buffer.push(7);
    assert!(buffer.is_full());
    assert_eq!(buffer.len(), 4);
}

proptest! {
    #[test]
    fn output_stays_within_bounds(
        raw_p in 1e-6f64..1e3,
        raw_i in 0.0f64..1e3,
        raw_d in 0.0f64..1e3,
        max_step in 0.0f64..10.0,
        temperatures in prop::collection::vec(-500.0f64..1500.0, 1..40),
        start_voltage in 0.0f64..=V_MAX,
    ) {
        let mut pid = PidController::new(3, 5.0).unwrap();
        pid.apply(PidParameters::from_raw(raw_p, raw_i, raw_d, 300.0, 10.0, max_step, 3).unwrap());
        pid.reset(temperatures[0]);

        let mut voltage = start_voltage;
        for (k, temperature) in temperatures.iter().enumerate() {
            let output = pid.tick(k as f64 * 5.0, *temperature, voltage);
            prop_assert!(output.voltage >= 0.0 && output.voltage <= V_MAX);
            prop_assert!((output.voltage - voltage).abs() <= max_step + 1e-12);
            voltage = output.voltage;
        }
    }
}
