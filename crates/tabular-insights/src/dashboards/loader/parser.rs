use super::super::record::{FieldValue, Record};
use super::RowGate;
use std::io::Read;

pub(crate) fn parse_records<R: Read>(
    reader: R,
    delimiter: u8,
    gate: &RowGate,
) -> Result<(Vec<Record>, usize), csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(clean_header)
        .collect();

    let mut records = Vec::new();
    let mut skipped = 0;

    for row in csv_reader.records() {
        let row = row?;
        let record: Record = headers
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let value = row.get(index).map(FieldValue::infer).unwrap_or(FieldValue::Missing);
                (name.clone(), value)
            })
            .collect();

        if gate.admits(&record) {
            records.push(record);
        } else {
            skipped += 1;
        }
    }

    Ok((records, skipped))
}

pub(super) fn clean_header(raw: &str) -> String {
    raw.replace('\u{feff}', "").trim().to_string()
}
