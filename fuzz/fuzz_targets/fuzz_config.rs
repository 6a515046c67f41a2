#![no_main]

use libfuzzer_sys::fuzz_target;
use specthermo::config::Config;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // The line format never fails; every line ends up in the report
    let (config, report) = Config::from_legacy_str(text);
    let _ = config.validate();
    let _ = report.to_string();

    if let Ok(config) = Config::from_toml_str(text) {
        let _ = config.validate();
    }
});
