use serde_json::Value;

/// Headline field for each result type, in priority order.
const PRIORITY_KEYS: [&str; 8] = [
    "monthly_payment",
    "maturity_amount",
    "remaining_amount",
    "months_sustained",
    "savings_rate",
    "month_to_date",
    "percentage_used",
    "percentage",
];

/// Print just the key answer value from the output.
///
/// Looks for well-known result fields in order of priority, then falls
/// back to the first field. List results print one line per entry.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result_obj {
        Value::Object(map) => {
            for key in &PRIORITY_KEYS {
                if let Some(val) = map.get(*key) {
                    if !val.is_null() {
                        println!("{}", format_minimal(val));
                        return;
                    }
                }
            }
            if let Some((key, val)) = map.iter().next() {
                println!("{}: {}", key, format_minimal(val));
            }
        }
        Value::Array(items) => {
            for item in items {
                println!("{}", headline(item));
            }
        }
        other => println!("{}", format_minimal(other)),
    }
}

/// One-line summary of a list entry: its name plus its headline number.
fn headline(item: &Value) -> String {
    let name = ["name", "label"]
        .iter()
        .find_map(|k| item.get(*k))
        .or_else(|| item.pointer("/budget/name"))
        .map(format_minimal);
    let figure = ["percentage_of_total", "net", "total_amount"]
        .iter()
        .find_map(|k| item.get(*k))
        .or_else(|| item.pointer("/status/classification"))
        .map(format_minimal);

    match (name, figure) {
        (Some(n), Some(f)) => format!("{n}: {f}"),
        (Some(n), None) => n,
        (None, Some(f)) => f,
        (None, None) => format_minimal(item),
    }
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
