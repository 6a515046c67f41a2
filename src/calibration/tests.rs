use super::*;
use crate::data_file::write_columns;
use tempfile::tempdir;

#[test]
fn test_points_pass_through_control_points() {
    let wavelengths = vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
    let temperatures = vec![4.0, 6.0, 5.0, 10.0, 12.0, 10.0];
    let calibration = Calibration::points(wavelengths.clone(), temperatures.clone()).unwrap();

    for (w, t) in wavelengths.iter().zip(&temperatures) {
        let value = calibration.temperature(*w);
        assert!((value - t).abs() < 1e-9, "T({}) = {}, expected {}", w, value, t);
    }
    assert_eq!(calibration.kind(), CalibrationKind::Points);
}

#[test]
fn test_points_are_not_clamped() {
    let calibration = Calibration::points(vec![0.0, 1.0, 2.0], vec![0.0, 10.0, 20.0]).unwrap();
    assert!((calibration.temperature(3.0) - 30.0).abs() < 1e-9);
    assert!((calibration.temperature(-1.0) + 10.0).abs() < 1e-9);
}

#[test]
fn test_unknown_wavelength_gives_unknown_temperature() {
    let calibration = Calibration::polynomial(vec![1.0, 2.0]).unwrap();
    assert_eq!(calibration.apply(None), None);
    assert_eq!(calibration.apply(Some(3.0)), Some(7.0));
}

#[test]
fn test_polynomial_evaluation() {
    // 2 - x + 0.5 x^2
    let calibration = Calibration::polynomial(vec![2.0, -1.0, 0.5]).unwrap();
    assert_eq!(calibration.temperature(4.0), 6.0);
    assert_eq!(calibration.kind(), CalibrationKind::Polynomial);
}

#[test]
fn test_invalid_calibrations() {
    assert!(matches!(
        Calibration::polynomial(Vec::new()),
        Err(CalibrationError::NoCoefficients)
    ));
    assert!(matches!(
        Calibration::points(vec![0.0, 0.0, 1.0], vec![1.0, 2.0, 3.0]),
        Err(CalibrationError::Points(_))
    ));
    assert!(matches!(
        Calibration::points(vec![0.0], vec![1.0]),
        Err(CalibrationError::Points(_))
    ));
    assert!(matches!(
        Calibration::polynomial(vec![1.0, f64::NAN]),
        Err(CalibrationError::NonFinite(1))
    ));
}

#[test]
fn test_sample_range() {
    let calibration = Calibration::polynomial(vec![0.0, 1.0]).unwrap();
    let (xs, ys) = calibration.sample(400.0, 402.0, 0.5).unwrap();
    assert_eq!(xs, vec![400.0, 400.5, 401.0, 401.5, 402.0]);
    assert_eq!(xs, ys);

    let (xs, _) = calibration.sample(10.0, 0.0, 1.0).unwrap();
    assert!(xs.is_empty());
    let (xs, _) = calibration.sample(0.0, 10.0, 0.0).unwrap();
    assert!(xs.is_empty());
}

#[test]
fn test_sample_point_limit() {
    let calibration = Calibration::polynomial(vec![0.0, 1.0]).unwrap();
    assert!(matches!(
        calibration.sample(400.0, 1200.0, 1e-12),
        Err(CalibrationError::TooManySamples { .. })
    ));
    assert!(matches!(
        calibration.sample(0.0, f64::INFINITY, 1.0),
        Err(CalibrationError::TooManySamples { .. })
    ));

    let (xs, _) = calibration.sample(0.0, 499_999.0, 0.5).unwrap();
    assert_eq!(xs.len(), 999_999);
    assert!(calibration.sample(0.0, 500_000.0, 0.5).is_err());
}

#[test]
fn test_load_from_files() {
    let dir = tempdir().unwrap();

    let points = dir.path().join("sample.clb");
    write_columns(&points, &[500.0, 510.0, 520.0], &[20.0, 60.0, 100.0]).unwrap();
    let calibration = Calibration::from_file(&points, CalibrationKind::Points).unwrap();
    assert!((calibration.temperature(510.0) - 60.0).abs() < 1e-9);

    let polynomial = dir.path().join("poly.clb");
    write_columns(&polynomial, &[0.0, 1.0], &[-480.0, 1.0]).unwrap();
    let calibration = Calibration::from_file(&polynomial, CalibrationKind::Polynomial).unwrap();
    assert_eq!(calibration.temperature(500.0), 20.0);

    assert!(matches!(
        Calibration::from_file(dir.path().join("missing.clb"), CalibrationKind::Points),
        Err(CalibrationError::DataFile(_))
    ));
}

#[test]
fn test_calibration_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Calibration>();
}
