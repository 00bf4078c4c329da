#![no_main]

use chrono::NaiveDate;
use hvtrace::logfile::{parse_close_time, LogLine};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Parsers must reject garbage without panicking
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Some(date) = NaiveDate::from_ymd_opt(2016, 9, 4) else {
        return;
    };

    for line in text.lines() {
        if let Some(parsed) = LogLine::parse(line, date) {
            assert_eq!(parsed.time.date(), date);
            let _ = parsed.has_valid_current();
            let _ = parsed.current_nanoamps();
        }
    }

    let _ = parse_close_time(text);
});
