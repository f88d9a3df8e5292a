use serde_json::{Map, Value};
use std::io;

use super::flatten;

/// Write output as CSV to stdout.
///
/// Object results become `field,value` rows with dotted paths; list
/// results become one row per entry with flattened column headers.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let body = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match body {
        Value::Object(_) => {
            let _ = wtr.write_record(["field", "value"]);
            for (key, val) in flatten(body) {
                let _ = wtr.write_record([key.as_str(), &format_csv_value(&val)]);
            }
        }
        Value::Array(arr) => write_array_csv(&mut wtr, arr),
        other => {
            let _ = wtr.write_record([&format_csv_value(other)]);
        }
    }

    let _ = wtr.flush();
}

fn write_array_csv<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    if arr.iter().all(Value::is_object) {
        let rows: Vec<Map<String, Value>> = arr.iter().map(flatten).collect();
        let headers: Vec<&str> = rows
            .first()
            .map(|first| first.keys().map(String::as_str).collect())
            .unwrap_or_default();
        let _ = wtr.write_record(&headers);

        for row in &rows {
            let cells: Vec<String> = headers
                .iter()
                .map(|h| row.get(*h).map(format_csv_value).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&cells);
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_array_rows_use_flattened_headers() {
        let rows = json!([
            {"budget": {"name": "Food"}, "status": {"spent": "8200"}},
            {"budget": {"name": "Commute"}, "status": {"spent": "3150"}}
        ]);
        let mut wtr = csv::Writer::from_writer(Vec::new());
        write_array_csv(&mut wtr, rows.as_array().map(Vec::as_slice).unwrap_or(&[]));
        let bytes = wtr.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text,
            "budget.name,status.spent\nFood,8200\nCommute,3150\n"
        );
    }
}
