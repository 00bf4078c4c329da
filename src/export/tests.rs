use super::*;
use crate::catalog::{RunId, RunRange, TimeWindow};
use crate::device::Device;
use crate::series::{compute_margins, Sample, SeriesExtent, SeriesWindow};
use arrow::array::{Array, Float64Array, ListArray, StringArray};
use chrono::{NaiveDate, NaiveDateTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::file::reader::{FileReader, SerializedFileReader};
use std::fs::File;

fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2016, 1, 1)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

fn run_series() -> RunSeries {
    let window = TimeWindow::new(at(10, 0), at(11, 0)).unwrap();
    let samples = vec![
        Sample::boundary(at(10, 0), 0.0, 0.0),
        Sample::new(at(10, 5), 5.0, 1.0),
        Sample::new(at(10, 50), 5.0, 2.0),
        Sample::boundary(at(11, 0), 5.0, 2.0),
    ];
    let margins = compute_margins(&SeriesExtent::from_samples(&samples).unwrap());
    let empty = vec![
        Sample::boundary(at(10, 0), 0.0, 0.0),
        Sample::boundary(at(11, 0), 0.0, 0.0),
    ];
    let empty_margins = compute_margins(&SeriesExtent::from_samples(&empty).unwrap());

    let device = |diode: &str, full: &str| Device {
        full: full.to_string(),
        name: "Keithley1".to_string(),
        channel: "CH0".to_string(),
        diode: diode.to_string(),
    };

    RunSeries {
        range: RunRange::new(RunId::from("100"), Some(RunId::from("105"))),
        window,
        series: vec![
            SeriesWindow {
                device: device("D1", "HV1-CH0"),
                window,
                samples,
                margins,
                stats: Default::default(),
            },
            SeriesWindow {
                device: device("D2", "HV1-CH1"),
                window,
                samples: empty,
                margins: empty_margins,
                stats: Default::default(),
            },
        ],
    }
}

#[test]
fn test_format_from_str() {
    assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
    assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
    assert_eq!("pq".parse::<ExportFormat>().unwrap(), ExportFormat::Parquet);
    assert!(matches!(
        "xml".parse::<ExportFormat>(),
        Err(ExportError::UnknownFormat(_))
    ));
    assert_eq!(
        ExportFormat::from_path(Path::new("out/run100.parquet")),
        Some(ExportFormat::Parquet)
    );
    assert_eq!(ExportFormat::from_path(Path::new("out/run100")), None);
}

#[test]
fn test_json_export_roundtrips_series() {
    let run = run_series();
    let mut buffer = Vec::new();
    let stats = write_series(&mut buffer, ExportFormat::Json, &run).unwrap();
    assert_eq!(stats.series_written, 2);
    assert_eq!(stats.samples_written, 6);

    let parsed: RunSeries = serde_json::from_slice(&buffer).unwrap();
    assert_eq!(parsed.range, run.range);
    assert_eq!(parsed.series[0].samples, run.series[0].samples);
    assert_eq!(parsed.series[1].device.diode, "D2");
}

#[test]
fn test_csv_export_has_one_row_per_sample() {
    let run = run_series();
    let mut buffer = Vec::new();
    write_series(&mut buffer, ExportFormat::Csv, &run).unwrap();

    let text = String::from_utf8(buffer).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next().unwrap(),
        "diode,descriptor,name,channel,time,epoch_seconds,voltage,current,boundary"
    );
    let rows: Vec<&str> = lines.collect();
    assert_eq!(rows.len(), 6);
    assert!(rows[0].starts_with("D1,HV1-CH0,Keithley1,CH0,2016-01-01 10:00:00,"));
    assert!(rows[0].ends_with(",true"));
    assert!(rows[1].ends_with(",false"));
}

#[test]
fn test_parquet_export() {
    let run = run_series();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.parquet");
    let stats = write_series_file(&path, ExportFormat::Parquet, &run).unwrap();
    assert_eq!(stats.to_string(), "Wrote 2 series (6 samples) as parquet");

    let reader = SerializedFileReader::new(File::open(&path).unwrap()).unwrap();
    let kv = reader
        .metadata()
        .file_metadata()
        .key_value_metadata()
        .cloned()
        .unwrap_or_default();
    let range = kv
        .iter()
        .find(|entry| entry.key == wide::keys::RUN_RANGE)
        .and_then(|entry| entry.value.clone());
    assert_eq!(range.as_deref(), Some("100 - 105"));

    let batches: Vec<_> = ParquetRecordBatchReaderBuilder::try_new(File::open(&path).unwrap())
        .unwrap()
        .build()
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(batches.len(), 1);
    let batch = &batches[0];
    assert_eq!(batch.num_rows(), 2);

    let diodes = batch
        .column_by_name(wide::columns::DIODE)
        .unwrap()
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    assert_eq!(diodes.value(0), "D1");

    let currents = batch
        .column_by_name(wide::columns::CURRENT_ARRAY)
        .unwrap()
        .as_any()
        .downcast_ref::<ListArray>()
        .unwrap();
    let first = currents.value(0);
    let first = first.as_any().downcast_ref::<Float64Array>().unwrap();
    assert_eq!(first.len(), 4);
    assert_eq!(first.value(3), 2.0);
    assert_eq!(currents.value(1).len(), 2);

    let float_column = |column: &str| {
        batch
            .column_by_name(column)
            .unwrap()
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap()
            .clone()
    };
    let time_min = float_column(wide::columns::TIME_MIN);
    let time_max = float_column(wide::columns::TIME_MAX);
    for row in 0..run.series.len() {
        assert_eq!(time_min.value(row), run.series[row].margins.time.min);
        assert_eq!(time_max.value(row), run.series[row].margins.time.max);
        assert!(time_min.value(row) < time_max.value(row));
    }
    assert_eq!(float_column(wide::columns::CURRENT_MIN).value(0), -1.0);
}
