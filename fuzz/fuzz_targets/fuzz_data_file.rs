#![no_main]

use libfuzzer_sys::fuzz_target;
use specthermo::data_file::parse_columns;
use specthermo::edge::{EdgeLocator, EdgeParameters, EdgeSearchState};
use specthermo::spectrum::Spectrum;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Parsing may fail but must never panic
    let Ok(columns) = parse_columns(text) else {
        return;
    };

    // Whatever parses as a valid spectrum must go through the edge search
    // without panicking
    if let Ok(spectrum) = Spectrum::new(columns.first, columns.second) {
        let locator = EdgeLocator::new(EdgeParameters::default());
        let mut state = EdgeSearchState::default();
        let _ = locator.locate(&spectrum, &mut state);
    }
});
