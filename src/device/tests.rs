use super::*;
use crate::catalog::{CatalogTimeFormat, RunId};

const CHANNELS: &str = r#"
[HV1]
name = "Keithley1"
model = "2410"

[HV7]
name = "ISEG-NHS"
"#;

fn channels() -> ChannelTable {
    ChannelTable::from_toml_str(CHANNELS).unwrap()
}

fn catalog(json: &str) -> RunCatalog {
    RunCatalog::from_json_str(json, &CatalogTimeFormat::default()).unwrap()
}

const TWO_RUNS: &str = r#"{
  "100": {"begin": "Fri Jan 01 10:00:00 2016", "end": "Fri Jan 01 11:00:00 2016",
          "dia1": "D1", "hv1": "HV1-CH0", "dia2": "D2", "hv2": "HV7-CH4"},
  "101": {"begin": "Fri Jan 01 11:00:00 2016", "end": "Fri Jan 01 12:00:00 2016",
          "dia1": "D1", "hv1": "HV1-CH0", "dia2": "D3", "hv2": "HV7"}
}"#;

#[test]
fn test_parse_channel_table() {
    let table = channels();
    assert_eq!(table.len(), 2);
    assert_eq!(table.get("HV1").unwrap().name, "Keithley1");
    assert_eq!(table.get("HV1").unwrap().model.as_deref(), Some("2410"));
    assert_eq!(table.get("HV7").unwrap().model, None);
    assert!(table.get("HV9").is_none());
}

#[test]
fn test_split_descriptor() {
    assert_eq!(split_descriptor("HV7-CH4"), ("HV7", "CH4"));
    assert_eq!(split_descriptor("HV7"), ("HV7", "CH0"));
}

#[test]
fn test_resolve_single_run() {
    let catalog = catalog(TWO_RUNS);
    let devices = resolve(&catalog, &RunRange::single(RunId::new("100")), &channels()).unwrap();

    assert_eq!(devices.len(), 2);
    let d1 = &devices["D1"];
    assert_eq!(d1.full, "HV1-CH0");
    assert_eq!(d1.name, "Keithley1");
    assert_eq!(d1.channel, "CH0");
    assert_eq!(d1.diode, "D1");

    let d2 = &devices["D2"];
    assert_eq!(d2.name, "ISEG-NHS");
    assert_eq!(d2.channel, "CH4");
}

#[test]
fn test_resolve_range_collects_all_diodes() {
    let catalog = catalog(TWO_RUNS);
    let range = RunRange::new(RunId::new("100"), Some(RunId::new("101")));
    let devices = resolve(&catalog, &range, &channels()).unwrap();

    let diodes: Vec<&str> = devices.keys().map(String::as_str).collect();
    assert_eq!(diodes, vec!["D1", "D2", "D3"]);
    assert_eq!(devices["D3"].channel, "CH0");
}

#[test]
fn test_runs_outside_range_are_ignored() {
    let catalog = catalog(TWO_RUNS);
    let devices = resolve(&catalog, &RunRange::single(RunId::new("101")), &channels()).unwrap();
    assert!(!devices.contains_key("D2"));
}

#[test]
fn test_conflicting_descriptor_is_fatal() {
    let json = r#"{
      "100": {"begin": "Fri Jan 01 10:00:00 2016", "end": "Fri Jan 01 11:00:00 2016",
              "dia1": "D1", "hv1": "HV1-CH0"},
      "101": {"begin": "Fri Jan 01 11:00:00 2016", "end": "Fri Jan 01 12:00:00 2016",
              "dia1": "D1", "hv1": "HV7-CH1"}
    }"#;
    let catalog = catalog(json);
    let range = RunRange::new(RunId::new("100"), Some(RunId::new("101")));

    match resolve(&catalog, &range, &channels()) {
        Err(ResolveError::ConfigurationConflict {
            diode,
            existing,
            conflicting,
            run,
        }) => {
            assert_eq!(diode, "D1");
            assert_eq!(existing, "HV1-CH0");
            assert_eq!(conflicting, "HV7-CH1");
            assert_eq!(run, "101");
        }
        other => panic!("expected conflict, got {:?}", other),
    }

    // Each run on its own is consistent.
    assert!(resolve(&catalog, &RunRange::single(RunId::new("101")), &channels()).is_ok());
}

#[test]
fn test_unknown_unit() {
    let json = r#"{"1": {"begin": "Fri Jan 01 10:00:00 2016", "end": "Fri Jan 01 11:00:00 2016",
                         "dia1": "D1", "hv1": "HV9-CH2"}}"#;
    let err = resolve(&catalog(json), &RunRange::single(RunId::new("1")), &channels()).unwrap_err();
    assert!(matches!(err, ResolveError::UnknownUnit { ref unit, .. } if unit == "HV9"));
}

#[test]
fn test_empty_catalog_resolves_to_nothing() {
    let devices = resolve(&RunCatalog::new(), &RunRange::single(RunId::new("1")), &channels()).unwrap();
    assert!(devices.is_empty());
}

#[test]
fn test_log_dir_layout() {
    let device = Device {
        full: "HV7-CH4".to_string(),
        name: "ISEG-NHS".to_string(),
        channel: "CH4".to_string(),
        diode: "D2".to_string(),
    };
    assert_eq!(
        device.log_dir(Path::new("/data/HV")),
        PathBuf::from("/data/HV/ISEG-NHS_CH4")
    );
}
