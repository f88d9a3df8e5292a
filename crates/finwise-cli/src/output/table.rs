use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::flatten;

/// Field names (last path segment) that hold money amounts.
const MONEY_FIELDS: [&str; 22] = [
    "principal",
    "monthly_payment",
    "total_payment",
    "total_interest",
    "maturity_amount",
    "total_invested",
    "total_returns",
    "remaining_amount",
    "total_withdrawn",
    "opening_balance",
    "growth",
    "withdrawal",
    "closing_balance",
    "amount",
    "total_amount",
    "income",
    "expenses",
    "net",
    "spent",
    "limit",
    "remaining",
    "over_by",
];

/// Suffixes that mark a money field not listed above.
const MONEY_SUFFIXES: [&str; 4] = ["_income", "_expenses", "_spending", "_amount"];

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value, currency: &str) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map, currency);
            } else {
                print_object(map, currency);
            }
        }
        Value::Array(arr) => print_array_table(arr, currency),
        _ => println!("{}", value),
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>, currency: &str) {
    match result {
        Value::Object(res_map) => print_object(res_map, currency),
        Value::Array(arr) => print_array_table(arr, currency),
        other => println!("{}", format_value(other)),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

/// Scalars and nested objects go into one Field/Value table; arrays of
/// objects are printed afterwards as their own tables.
fn print_object(map: &Map<String, Value>, currency: &str) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut sections = Vec::new();

    for (key, val) in map {
        match val {
            Value::Array(items) if items.iter().all(Value::is_object) => {
                sections.push((key, items));
            }
            Value::Object(_) => {
                for (sub_key, sub_val) in flatten(val) {
                    let path = format!("{key}.{sub_key}");
                    let cell = format_cell(&path, &sub_val, currency);
                    builder.push_record([path, cell]);
                }
            }
            _ => builder.push_record([key.clone(), format_cell(key, val, currency)]),
        }
    }

    println!("{}", Table::from(builder));

    for (key, items) in sections {
        println!("\n{}:", key);
        print_array_table(items, currency);
    }
}

fn print_array_table(arr: &[Value], currency: &str) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if arr.iter().all(Value::is_object) {
        let rows: Vec<Map<String, Value>> = arr.iter().map(flatten).collect();
        let headers: Vec<String> = rows
            .first()
            .map(|first| first.keys().cloned().collect())
            .unwrap_or_default();

        let mut builder = Builder::default();
        builder.push_record(headers.clone());
        for row in &rows {
            let cells: Vec<String> = headers
                .iter()
                .map(|h| {
                    row.get(h.as_str())
                        .map(|v| format_cell(h, v, currency))
                        .unwrap_or_default()
                })
                .collect();
            builder.push_record(cells);
        }
        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn is_money_field(path: &str) -> bool {
    let field = path.rsplit('.').next().unwrap_or(path);
    MONEY_FIELDS.contains(&field) || MONEY_SUFFIXES.iter().any(|s| field.ends_with(s))
}

fn format_cell(path: &str, value: &Value, currency: &str) -> String {
    let text = format_value(value);
    let numeric = match value {
        Value::String(s) => s.parse::<f64>().is_ok(),
        Value::Number(_) => true,
        _ => false,
    };
    if numeric && is_money_field(path) {
        format!("{currency}{text}")
    } else {
        text
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
