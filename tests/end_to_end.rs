//! End-to-end tests for hvtrace
//!
//! These tests build a run catalog, a channel table and device log directories
//! on disk and run the full catalog → devices → series pipeline.

use chrono::{NaiveDate, NaiveDateTime};
use hvtrace::catalog::{CatalogError, CatalogTimeFormat, RunCatalog, RunId, RunRange};
use hvtrace::device::{ChannelTable, ResolveError};
use hvtrace::export::{write_series_file, ExportFormat};
use hvtrace::extract::{ExtractionConfig, Sample};
use hvtrace::series::{assemble_runs, AxisRange, SeriesError};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const CATALOG: &str = r#"{
    "100": {
        "begin": "Mon Jan 01 10:00:00 2016",
        "end": "Mon Jan 01 11:00:00 2016",
        "dia1": "D1", "hv1": "HV1-CH0", "bias1": "-500",
        "nevents": 50000
    },
    "101": {
        "begin": "Mon Jan 01 11:10:00 2016",
        "end": "Mon Jan 01 12:00:00 2016",
        "dia1": "D1", "hv1": "HV1-CH0",
        "dia2": "D2", "hv2": "HV7-CH4"
    },
    "102": {
        "begin": "Mon Jan 01 12:10:00 2016",
        "end": "Mon Jan 01 13:00:00 2016",
        "dia1": "D1", "hv1": "HV7-CH2"
    }
}"#;

const CHANNELS: &str = r#"
[HV1]
name = "Keithley1"

[HV7]
name = "ISEG-NHS"
model = "NHS 6220n"
"#;

fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2016, 1, 1)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

fn catalog() -> RunCatalog {
    RunCatalog::from_json_str(CATALOG, &CatalogTimeFormat::default()).unwrap()
}

fn channels() -> ChannelTable {
    ChannelTable::from_toml_str(CHANNELS).unwrap()
}

fn write_log(data: &Path, device_dir: &str, name: &str, body: &str) {
    let dir = data.join(device_dir);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(name), body).unwrap();
}

fn assert_sample(sample: &Sample, time: NaiveDateTime, voltage: f64, current: f64, boundary: bool) {
    assert_eq!(sample.time, time);
    assert!((sample.voltage - voltage).abs() < 1e-9, "voltage {}", sample.voltage);
    assert!((sample.current - current).abs() < 1e-9, "current {}", sample.current);
    assert_eq!(sample.boundary, boundary);
}

/// The single-run scenario: one log file, two lines inside the window
#[test]
fn test_single_run_series() {
    let data = tempdir().unwrap();
    write_log(
        data.path(),
        "Keithley1_CH0",
        "Keithley1_CH0_160101_093000.log",
        "09:59:00 5.0 0.5e-9\n10:05:00 5.0 1.0e-9\n10:50:00 5.0 2.0e-9\n",
    );

    let range = RunRange::single(RunId::from("100"));
    let run = assemble_runs(
        &catalog(),
        &range,
        &channels(),
        data.path(),
        ExtractionConfig::default(),
    )
    .unwrap();

    assert_eq!(run.window.start, at(10, 0));
    assert_eq!(run.window.end, at(11, 0));
    assert_eq!(run.series.len(), 1);

    let series = &run.series[0];
    assert_eq!(series.device.diode, "D1");
    assert_eq!(series.device.name, "Keithley1");
    assert_eq!(series.device.channel, "CH0");

    let samples = &series.samples;
    assert_eq!(samples.len(), 4);
    assert_sample(&samples[0], at(10, 0), 0.0, 0.0, true);
    assert_sample(&samples[1], at(10, 5), 5.0, 1.0, false);
    assert_sample(&samples[2], at(10, 50), 5.0, 2.0, false);
    assert_sample(&samples[3], at(11, 0), 5.0, 2.0, true);

    assert_eq!(series.margins.current.min, -1.0);
    assert!((series.margins.current.max - 2.05).abs() < 1e-9);
    assert_eq!(series.margins.voltage, AxisRange::new(0.0, 200.0));
}

/// Devices without a log directory degrade to the two-zero series
#[test]
fn test_range_with_missing_device_data() {
    let data = tempdir().unwrap();
    write_log(
        data.path(),
        "Keithley1_CH0",
        "Keithley1_CH0_2016_01_01_10_30_00.log",
        "10:20:00 -500.0 -1.0e-9\n",
    );
    write_log(
        data.path(),
        "Keithley1_CH0",
        "Keithley1_CH0_2016_01_01_12_30_00.log",
        "11:20:00 -500.0 -3.0e-9\n11:59:59 -500.0 9.9e37\n12:00:00 -500.0 -4.0e-9\n",
    );

    let range = RunRange::new(RunId::from("100"), Some(RunId::from("101")));
    assert_eq!(range.to_string(), "100 - 101");

    let run = assemble_runs(
        &catalog(),
        &range,
        &channels(),
        data.path(),
        ExtractionConfig::default(),
    )
    .unwrap();
    assert_eq!(run.window.start, at(10, 0));
    assert_eq!(run.window.end, at(12, 0));

    let diodes: Vec<&str> = run.series.iter().map(|s| s.device.diode.as_str()).collect();
    assert_eq!(diodes, vec!["D1", "D2"]);

    let d1 = &run.series[0];
    let currents: Vec<f64> = d1.measured().map(|s| s.current).collect();
    assert_eq!(currents.len(), 2);
    assert!((currents[1] + 3.0).abs() < 1e-9);
    assert_eq!(d1.stats.scan.out_of_range, 1);

    let d2 = &run.series[1];
    assert_eq!(d2.device.full, "HV7-CH4");
    assert_eq!(d2.samples.len(), 2);
    assert_sample(&d2.samples[0], at(10, 0), 0.0, 0.0, true);
    assert_sample(&d2.samples[1], at(12, 0), 0.0, 0.0, true);
}

/// A diode rewired within the range aborts with no output
#[test]
fn test_conflicting_descriptors_abort() {
    let data = tempdir().unwrap();
    let range = RunRange::new(RunId::from("100"), Some(RunId::from("102")));

    let err = assemble_runs(
        &catalog(),
        &range,
        &channels(),
        data.path(),
        ExtractionConfig::default(),
    )
    .unwrap_err();

    match err {
        SeriesError::ResolveError(ResolveError::ConfigurationConflict {
            diode,
            existing,
            conflicting,
            run,
        }) => {
            assert_eq!(diode, "D1");
            assert_eq!(existing, "HV1-CH0");
            assert_eq!(conflicting, "HV7-CH2");
            assert_eq!(run, "102");
        }
        other => panic!("unexpected error: {other}"),
    }
}

/// A missing catalog file degrades to an empty catalog; time lookups then fail
#[test]
fn test_missing_catalog_degrades_to_empty() {
    let dir = tempdir().unwrap();
    let catalog =
        RunCatalog::load_or_empty(dir.path().join("run_log.json"), &CatalogTimeFormat::default())
            .unwrap();
    assert!(catalog.is_empty());

    let err = assemble_runs(
        &catalog,
        &RunRange::single(RunId::from("100")),
        &channels(),
        dir.path(),
        ExtractionConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        SeriesError::CatalogError(CatalogError::UnknownRun(ref run)) if run == "100"
    ));
}

/// Assembled series survive a JSON export
#[test]
fn test_export_json() {
    let data = tempdir().unwrap();
    write_log(
        data.path(),
        "Keithley1_CH0",
        "Keithley1_CH0_160101_120000.log",
        "10:05:00 5.0 1.0e-9\n",
    );

    let run = assemble_runs(
        &catalog(),
        &RunRange::single(RunId::from("100")),
        &channels(),
        data.path(),
        ExtractionConfig::default(),
    )
    .unwrap();

    let out = data.path().join("run100.json");
    let stats = write_series_file(&out, ExportFormat::Json, &run).unwrap();
    assert_eq!(stats.series_written, 1);
    assert_eq!(stats.samples_written, 3);

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["range"]["start"], "100");
    assert_eq!(json["series"][0]["device"]["diode"], "D1");
    assert_eq!(json["series"][0]["samples"].as_array().unwrap().len(), 3);
}
