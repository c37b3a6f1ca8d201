use aed_sources::point::SeriesPoint;
use csv::{ReaderBuilder, WriterBuilder};

/// Header of the canonical three-column export shape.
pub const CSV_HEADER: [&str; 3] = ["date", "value", "group"];

/// Render records as UTF-8 CSV in the canonical `date,value,group`
/// shape, one record per line after the header. The header is written
/// even for an empty table.
pub fn write_csv(records: &[SeriesPoint]) -> Result<String, csv::Error> {
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    wtr.write_record(CSV_HEADER)?;
    for record in records {
        wtr.serialize(record)?;
    }
    let bytes = wtr.into_inner().expect("flushing an in-memory writer");
    Ok(String::from_utf8(bytes).expect("csv output is utf-8"))
}

/// Parse canonical three-column CSV back into records.
pub fn read_csv(text: &str) -> Result<Vec<SeriesPoint>, csv::Error> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());
    rdr.deserialize().collect()
}
