/// CSV ingestion: coerce uploaded rows into [`RawLead`]s.
///
/// Callers may supply a column map (`field name -> header`) to handle
/// exports with non-standard headers; unmapped fields fall back to a
/// case-insensitive match of the expected header. Missing columns or
/// blank cells simply leave the field absent.
use crate::models::RawLead;
use std::collections::HashMap;
use std::io::Read;

/// Expected header per lead field, in field order.
const EXPECTED_COLUMNS: [(&str, &str); 8] = [
    ("name", "Name"),
    ("email", "Email"),
    ("phone", "Phone"),
    ("title", "Title"),
    ("company", "Company"),
    ("country", "Country"),
    ("created_at", "Created At"),
    ("source", "Source"),
];

fn cell(record: &csv::StringRecord, idx: Option<usize>) -> Option<String> {
    let value = record.get(idx?)?;
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Parse CSV data into raw leads.
pub fn parse_leads<R: Read>(
    reader: R,
    column_map: Option<&HashMap<String, String>>,
) -> Result<Vec<RawLead>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let index_of = |wanted: &str, exact: bool| {
        headers.iter().position(|h| {
            if exact {
                h == wanted
            } else {
                h.eq_ignore_ascii_case(wanted)
            }
        })
    };

    // Resolve each lead field to a column index once, up front.
    let mut indices: HashMap<&str, Option<usize>> = HashMap::new();
    for (field, default_header) in EXPECTED_COLUMNS {
        let idx = match column_map.and_then(|m| m.get(field)) {
            Some(mapped) => index_of(mapped, true),
            None => index_of(default_header, false),
        };
        indices.insert(field, idx);
    }

    let mut leads = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        leads.push(RawLead {
            name: cell(&record, indices["name"]),
            email: cell(&record, indices["email"]),
            phone: cell(&record, indices["phone"]),
            title: cell(&record, indices["title"]),
            company: cell(&record, indices["company"]),
            country: cell(&record, indices["country"]),
            created_at: cell(&record, indices["created_at"]),
            source: cell(&record, indices["source"]),
        });
    }

    Ok(leads)
}
