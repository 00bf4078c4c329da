//! Wide Parquet layout: one row per device, sample vectors stored as lists.

use std::io::Write;
use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanBuilder, Float64Builder, ListBuilder, StringBuilder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, ZstdLevel};
use parquet::file::properties::{EnabledStatistics, WriterProperties};
use parquet::format::KeyValue;
use parquet::schema::types::ColumnPath;

use super::ExportError;
use crate::series::RunSeries;

/// Column names
pub mod columns {
    /// Diode id
    pub const DIODE: &str = "diode";
    /// Full supply descriptor
    pub const DESCRIPTOR: &str = "descriptor";
    /// Supply display name
    pub const NAME: &str = "name";
    /// Supply channel
    pub const CHANNEL: &str = "channel";
    /// Sample times, epoch seconds
    pub const TIME_ARRAY: &str = "time_array";
    /// Sample voltages, V
    pub const VOLTAGE_ARRAY: &str = "voltage_array";
    /// Sample currents, nA
    pub const CURRENT_ARRAY: &str = "current_array";
    /// Boundary flags
    pub const BOUNDARY_ARRAY: &str = "boundary_array";
    /// Time axis lower end, epoch seconds
    pub const TIME_MIN: &str = "time_min";
    /// Time axis upper end, epoch seconds
    pub const TIME_MAX: &str = "time_max";
    /// Current axis lower end
    pub const CURRENT_MIN: &str = "current_min";
    /// Current axis upper end
    pub const CURRENT_MAX: &str = "current_max";
    /// Voltage axis lower end
    pub const VOLTAGE_MIN: &str = "voltage_min";
    /// Voltage axis upper end
    pub const VOLTAGE_MAX: &str = "voltage_max";
}

/// Key-value metadata keys
pub mod keys {
    /// Run range as displayed, e.g. `100 - 105`
    pub const RUN_RANGE: &str = "hvtrace:run_range";
    /// Window start, ISO 8601
    pub const WINDOW_START: &str = "hvtrace:window_start";
    /// Window end, ISO 8601
    pub const WINDOW_END: &str = "hvtrace:window_end";
    /// Crate version that wrote the file
    pub const WRITER_VERSION: &str = "hvtrace:writer_version";
}

const ZSTD_LEVEL: i32 = 3;

fn list_field() -> Arc<Field> {
    Arc::new(Field::new("item", DataType::Float64, false))
}

/// Arrow schema of the wide series table
pub fn series_schema() -> Arc<Schema> {
    let float_list = DataType::List(list_field());
    let bool_list = DataType::List(Arc::new(Field::new("item", DataType::Boolean, false)));
    Arc::new(Schema::new(vec![
        Field::new(columns::DIODE, DataType::Utf8, false),
        Field::new(columns::DESCRIPTOR, DataType::Utf8, false),
        Field::new(columns::NAME, DataType::Utf8, false),
        Field::new(columns::CHANNEL, DataType::Utf8, false),
        Field::new(columns::TIME_ARRAY, float_list.clone(), false),
        Field::new(columns::VOLTAGE_ARRAY, float_list.clone(), false),
        Field::new(columns::CURRENT_ARRAY, float_list, false),
        Field::new(columns::BOUNDARY_ARRAY, bool_list, false),
        Field::new(columns::TIME_MIN, DataType::Float64, false),
        Field::new(columns::TIME_MAX, DataType::Float64, false),
        Field::new(columns::CURRENT_MIN, DataType::Float64, false),
        Field::new(columns::CURRENT_MAX, DataType::Float64, false),
        Field::new(columns::VOLTAGE_MIN, DataType::Float64, false),
        Field::new(columns::VOLTAGE_MAX, DataType::Float64, false),
    ]))
}

fn writer_properties(run: &RunSeries) -> WriterProperties {
    let compression =
        Compression::ZSTD(ZstdLevel::try_new(ZSTD_LEVEL).unwrap_or_default());

    let metadata = vec![
        (keys::RUN_RANGE, run.range.to_string()),
        (keys::WINDOW_START, run.window.start.to_string()),
        (keys::WINDOW_END, run.window.end.to_string()),
        (keys::WRITER_VERSION, env!("CARGO_PKG_VERSION").to_string()),
    ]
    .into_iter()
    .map(|(key, value)| KeyValue {
        key: key.to_string(),
        value: Some(value),
    })
    .collect();

    let mut builder = WriterProperties::builder()
        .set_compression(compression)
        .set_statistics_enabled(EnabledStatistics::Chunk)
        .set_key_value_metadata(Some(metadata));

    // sample vectors are high-cardinality
    for column in [
        columns::TIME_ARRAY,
        columns::VOLTAGE_ARRAY,
        columns::CURRENT_ARRAY,
    ] {
        builder = builder.set_column_dictionary_enabled(ColumnPath::new(vec![column.to_string()]), false);
    }

    builder.build()
}

/// Write `run` as one record batch; returns the number of row groups
pub fn write_parquet<W: Write + Send>(writer: W, run: &RunSeries) -> Result<usize, ExportError> {
    let schema = series_schema();
    let mut writer = ArrowWriter::try_new(writer, schema.clone(), Some(writer_properties(run)))?;

    let rows = run.series.len();
    let mut diode = StringBuilder::with_capacity(rows, rows * 8);
    let mut descriptor = StringBuilder::with_capacity(rows, rows * 8);
    let mut name = StringBuilder::with_capacity(rows, rows * 8);
    let mut channel = StringBuilder::with_capacity(rows, rows * 4);
    let mut time = ListBuilder::new(Float64Builder::new()).with_field(list_field());
    let mut voltage = ListBuilder::new(Float64Builder::new()).with_field(list_field());
    let mut current = ListBuilder::new(Float64Builder::new()).with_field(list_field());
    let mut boundary = ListBuilder::new(BooleanBuilder::new())
        .with_field(Arc::new(Field::new("item", DataType::Boolean, false)));
    let mut time_min = Float64Builder::with_capacity(rows);
    let mut time_max = Float64Builder::with_capacity(rows);
    let mut current_min = Float64Builder::with_capacity(rows);
    let mut current_max = Float64Builder::with_capacity(rows);
    let mut voltage_min = Float64Builder::with_capacity(rows);
    let mut voltage_max = Float64Builder::with_capacity(rows);

    for series in &run.series {
        diode.append_value(&series.device.diode);
        descriptor.append_value(&series.device.full);
        name.append_value(&series.device.name);
        channel.append_value(&series.device.channel);

        for sample in &series.samples {
            time.values().append_value(sample.epoch_seconds());
            voltage.values().append_value(sample.voltage);
            current.values().append_value(sample.current);
            boundary.values().append_value(sample.boundary);
        }
        time.append(true);
        voltage.append(true);
        current.append(true);
        boundary.append(true);

        time_min.append_value(series.margins.time.min);
        time_max.append_value(series.margins.time.max);
        current_min.append_value(series.margins.current.min);
        current_max.append_value(series.margins.current.max);
        voltage_min.append_value(series.margins.voltage.min);
        voltage_max.append_value(series.margins.voltage.max);
    }

    let arrays: Vec<ArrayRef> = vec![
        Arc::new(diode.finish()),
        Arc::new(descriptor.finish()),
        Arc::new(name.finish()),
        Arc::new(channel.finish()),
        Arc::new(time.finish()),
        Arc::new(voltage.finish()),
        Arc::new(current.finish()),
        Arc::new(boundary.finish()),
        Arc::new(time_min.finish()),
        Arc::new(time_max.finish()),
        Arc::new(current_min.finish()),
        Arc::new(current_max.finish()),
        Arc::new(voltage_min.finish()),
        Arc::new(voltage_max.finish()),
    ];

    let batch = RecordBatch::try_new(schema, arrays)?;
    writer.write(&batch)?;
    let file_metadata = writer.close()?;
    Ok(file_metadata.row_groups.len())
}
