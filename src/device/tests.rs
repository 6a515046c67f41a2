use super::*;
use crate::data_file::write_columns;
use tempfile::tempdir;

fn instant_offline(seed: u64) -> OfflineSpectrometer {
    OfflineSpectrometer::new(OfflineSettings {
        noise_amplitude: 1000.0,
        exposure_seconds: 0.0,
        seed: Some(seed),
    })
}

#[test]
fn test_offline_search_and_select() {
    let mut spectrometer = instant_offline(1);
    assert!(spectrometer.is_removed());
    assert!(matches!(spectrometer.open(), Err(DeviceError::NotSelected)));

    assert_eq!(spectrometer.search().unwrap(), 2);
    assert!(matches!(
        spectrometer.select(2),
        Err(DeviceError::InvalidIndex { index: 2, found: 2 })
    ));
    spectrometer.select(1).unwrap();
    assert!(!spectrometer.is_removed());
    assert_eq!(spectrometer.model_name(), "Test spectrometer");
    assert_eq!(spectrometer.serial_number(), "007");
}

#[test]
fn test_offline_reading_adds_bounded_noise() {
    let mut spectrometer = instant_offline(7);
    connect(&mut spectrometer).unwrap();

    assert!(spectrometer.current_reading().unwrap().is_none());
    spectrometer.start_exposure().unwrap();
    let reading = spectrometer.current_reading().unwrap().unwrap();

    assert_eq!(reading.wavelengths, OFFLINE_WAVELENGTHS.to_vec());
    for (noisy, clean) in reading.intensities.iter().zip(OFFLINE_INTENSITIES) {
        assert!(*noisy >= clean && *noisy < clean + 1000.0);
    }
    // Each exposure is delivered once
    assert!(spectrometer.current_reading().unwrap().is_none());
}

#[test]
fn test_offline_seed_is_reproducible() {
    let mut a = instant_offline(42);
    let mut b = instant_offline(42);
    for spectrometer in [&mut a, &mut b] {
        connect(spectrometer).unwrap();
        spectrometer.start_exposure().unwrap();
    }
    let a = a.current_reading().unwrap().unwrap();
    let b = b.current_reading().unwrap().unwrap();
    assert_eq!(a.intensities, b.intensities);
}

#[test]
fn test_exposure_requires_open_device() {
    let mut spectrometer = instant_offline(1);
    assert!(matches!(
        spectrometer.start_exposure(),
        Err(DeviceError::NotOpen)
    ));
    connect(&mut spectrometer).unwrap();
    spectrometer.start_exposure().unwrap();
    spectrometer.cancel_exposure();
    assert!(spectrometer.current_reading().unwrap().is_none());

    spectrometer.close();
    assert!(matches!(
        spectrometer.current_reading(),
        Err(DeviceError::NotOpen)
    ));
}

#[test]
fn test_long_exposure_is_not_ready() {
    let mut spectrometer = OfflineSpectrometer::new(OfflineSettings {
        exposure_seconds: 60.0,
        seed: Some(3),
        ..Default::default()
    });
    connect(&mut spectrometer).unwrap();
    spectrometer.start_exposure().unwrap();
    assert!(spectrometer.current_reading().unwrap().is_none());
}

#[test]
fn test_replay_plays_files_in_order() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("a.txt");
    let second = dir.path().join("b.txt");
    write_columns(&first, &[1.0, 2.0], &[10.0, 20.0]).unwrap();
    write_columns(&second, &[1.0, 2.0], &[30.0, 40.0]).unwrap();

    let mut replay = ReplaySpectrometer::new(ReplaySettings {
        files: vec![first, second],
        repeat: false,
        exposure_seconds: 0.0,
    })
    .unwrap();
    connect(&mut replay).unwrap();

    replay.start_exposure().unwrap();
    let reading = replay.current_reading().unwrap().unwrap();
    assert_eq!(reading.intensities, vec![10.0, 20.0]);
    replay.start_exposure().unwrap();
    let reading = replay.current_reading().unwrap().unwrap();
    assert_eq!(reading.intensities, vec![30.0, 40.0]);

    assert!(replay.is_removed());
    replay.start_exposure().unwrap();
    assert!(replay.current_reading().unwrap().is_none());
    assert_eq!(replay.played(), 2);
}

#[test]
fn test_replay_repeat_wraps_around() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("only.txt");
    write_columns(&path, &[1.0], &[5.0]).unwrap();

    let mut replay = ReplaySpectrometer::new(ReplaySettings {
        files: vec![path],
        repeat: true,
        exposure_seconds: 0.0,
    })
    .unwrap();
    connect(&mut replay).unwrap();
    for _ in 0..3 {
        replay.start_exposure().unwrap();
        assert!(replay.current_reading().unwrap().is_some());
    }
    assert!(!replay.is_removed());
}

#[test]
fn test_replay_errors() {
    assert!(matches!(
        ReplaySpectrometer::new(ReplaySettings::default()),
        Err(DeviceError::NothingToReplay)
    ));

    let mut replay = ReplaySpectrometer::new(ReplaySettings {
        files: vec!["/nonexistent/spectrum.txt".into()],
        repeat: false,
        exposure_seconds: 0.0,
    })
    .unwrap();
    connect(&mut replay).unwrap();
    replay.start_exposure().unwrap();
    assert!(matches!(
        replay.current_reading(),
        Err(DeviceError::DataFile(_))
    ));
}

#[test]
fn test_offline_dac_persist_semantics() {
    let mut dac = OfflineDac::new();
    assert_eq!(dac.channels(), 3);

    dac.set_voltage(1, 0.25, false).unwrap();
    assert_eq!(dac.voltage(1), Some(0.25));
    assert_eq!(dac.last_written_value(), 0.0);

    dac.set_voltage(2, 1.5, true).unwrap();
    assert_eq!(dac.voltage(2), Some(1.5));
    assert_eq!(dac.last_written_value(), 1.5);

    assert_eq!(dac.voltage(0), None);
    assert_eq!(dac.voltage(4), None);
}

#[test]
fn test_offline_dac_rejects_bad_writes() {
    let mut dac = OfflineDac::new();
    assert!(matches!(
        dac.set_voltage(0, 1.0, true),
        Err(DeviceError::InvalidChannel { channel: 0, channels: 3 })
    ));
    assert!(matches!(
        dac.set_voltage(4, 1.0, true),
        Err(DeviceError::InvalidChannel { channel: 4, .. })
    ));
    assert!(matches!(
        dac.set_voltage(1, f64::NAN, true),
        Err(DeviceError::InvalidVoltage(_))
    ));
}

#[test]
fn test_factories() {
    let spectrometer = create_spectrometer(&SpectrometerKind::default()).unwrap();
    assert_eq!(spectrometer.model_name(), "Test spectrometer");

    assert!(create_dac(DacKind::Offline).is_ok());
    assert!(matches!(
        create_dac(DacKind::Lab),
        Err(DeviceError::NotAvailable(_))
    ));

    assert_eq!(DacKind::from_config_value("lab"), DacKind::Lab);
    assert_eq!(DacKind::from_config_value("usb"), DacKind::Offline);
}

#[test]
fn test_spectrometer_kind_from_toml() {
    let kind: SpectrometerKind = toml::from_str(
        r#"
        kind = "replay"
        files = ["a.txt", "b.txt"]
        repeat = true
        "#,
    )
    .unwrap();
    match kind {
        SpectrometerKind::Replay(settings) => {
            assert_eq!(settings.files.len(), 2);
            assert!(settings.repeat);
        }
        other => panic!("unexpected {:?}", other),
    }
}
