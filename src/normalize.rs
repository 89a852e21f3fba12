//! Shims for the backend's inconsistent response shapes.
//!
//! Endpoints answer with a bare payload, a `{ data: ... }` envelope, or an
//! envelope around a `{ rows | items | deposits | ... : [...] }` object, and
//! spell the same field several ways. Everything here is total: missing or
//! mistyped fields come back as `None`, never as a panic.

use serde_json::Value;

/// Keys under which list endpoints nest their records.
pub const LIST_KEYS: &[&str] = &[
    "rows",
    "items",
    "deposits",
    "withdrawals",
    "notices",
    "bonuses",
    "topEarners",
    "users",
    "ads",
];

pub const PLACEHOLDER: &str = "—";

/// Returns `value.data` when present and non-null, `value` otherwise.
pub fn unwrap_envelope(value: &Value) -> &Value {
    match value.get("data") {
        Some(inner) if !inner.is_null() => inner,
        _ => value,
    }
}

/// Flattens any list-shaped response into its records, preserving order.
pub fn extract_list(value: &Value) -> Vec<Value> {
    extract_list_with(value, LIST_KEYS)
}

pub fn extract_list_with(value: &Value, keys: &[&str]) -> Vec<Value> {
    let payload = unwrap_envelope(value);
    if let Some(list) = payload.as_array() {
        return list.clone();
    }

    for key in keys {
        if let Some(list) = payload.get(*key).and_then(Value::as_array) {
            return list.clone();
        }
        // `{ data: { data: { rows } } }` shows up on a few paginated routes.
        if let Some(list) = unwrap_envelope(payload).get(*key).and_then(Value::as_array) {
            return list.clone();
        }
    }

    Vec::new()
}

/// First non-empty string among `keys`. Numbers are rendered as strings.
pub fn first_str(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match value.get(*key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// First numeric field among `keys`. Numeric strings (`"12.50"`) are accepted.
pub fn first_f64(value: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|key| match value.get(*key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    })
}

/// Strict variant of [`first_f64`]: only JSON numbers count.
pub fn first_number(value: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .find_map(|key| value.get(*key).and_then(Value::as_f64))
}

pub fn first_u64(value: &Value, keys: &[&str]) -> Option<u64> {
    keys.iter().find_map(|key| match value.get(*key)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|v| *v >= 0.0).map(|v| v as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    })
}

pub fn first_bool(value: &Value, keys: &[&str]) -> Option<bool> {
    keys.iter()
        .find_map(|key| value.get(*key).and_then(Value::as_bool))
}

/// Record ids arrive as numbers or strings; both normalize to a string.
pub fn id_of(value: &Value) -> Option<String> {
    first_str(value, &["id", "_id"])
}

/// Walks a dotted path (`"bonusAwardedAmount.pkr"`).
pub fn path<'a>(value: &'a Value, dotted: &str) -> Option<&'a Value> {
    dotted
        .split('.')
        .try_fold(value, |current, segment| current.get(segment))
}

pub fn path_f64(value: &Value, dotted: &str) -> Option<f64> {
    path(value, dotted).and_then(Value::as_f64)
}

pub fn placeholder(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => PLACEHOLDER,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_shapes_normalize_identically() {
        let records = json!([{ "id": 1 }, { "id": 2 }, { "id": 3 }]);
        let bare = extract_list(&records);
        let enveloped = extract_list(&json!({ "data": records.clone() }));
        let rows = extract_list(&json!({ "data": { "rows": records.clone() } }));

        assert_eq!(bare.len(), 3);
        assert_eq!(bare, enveloped);
        assert_eq!(bare, rows);
        assert_eq!(bare[0]["id"], 1);
        assert_eq!(bare[2]["id"], 3);
    }

    #[test]
    fn unknown_shapes_become_empty() {
        assert!(extract_list(&json!({ "data": { "count": 2 } })).is_empty());
        assert!(extract_list(&json!(null)).is_empty());
        assert!(extract_list(&json!("oops")).is_empty());
    }

    #[test]
    fn explicit_keys_are_honoured() {
        let response = json!({ "data": { "withdrawals": [{ "id": "w1" }] } });
        assert_eq!(extract_list_with(&response, &["withdrawals"]).len(), 1);
        assert!(extract_list_with(&response, &["rows"]).is_empty());
    }

    #[test]
    fn null_data_keeps_outer_value() {
        let response = json!({ "data": null, "rows": [1, 2] });
        assert_eq!(extract_list(&response).len(), 2);
    }

    #[test]
    fn aliases_resolve_first_match() {
        let record = json!({ "amount_usd": 12.5, "amountUSD": 10 });
        assert_eq!(first_f64(&record, &["amount", "amountUSD", "amount_usd"]), Some(10.0));
        assert_eq!(first_f64(&record, &["missing"]), None);
    }

    #[test]
    fn empty_strings_do_not_match() {
        let record = json!({ "imageUrl": "", "image_url": "a.png" });
        assert_eq!(first_str(&record, &["imageUrl", "image_url"]).as_deref(), Some("a.png"));
    }

    #[test]
    fn numeric_ids_become_strings() {
        assert_eq!(id_of(&json!({ "id": 42 })).as_deref(), Some("42"));
        assert_eq!(id_of(&json!({ "id": "abc" })).as_deref(), Some("abc"));
        assert_eq!(id_of(&json!({})), None);
    }

    #[test]
    fn strict_numbers_ignore_strings() {
        let record = json!({ "views": "12", "views_count": 7 });
        assert_eq!(first_number(&record, &["views", "views_count"]), Some(7.0));
        assert_eq!(first_u64(&record, &["views"]), Some(12));
    }

    #[test]
    fn dotted_paths() {
        let record = json!({ "bonusAwardedAmount": { "pkr": 300, "usd": 1.1 } });
        assert_eq!(path_f64(&record, "bonusAwardedAmount.pkr"), Some(300.0));
        assert_eq!(path_f64(&record, "bonusAwardedAmount.eur"), None);
    }

    #[test]
    fn placeholder_for_missing() {
        assert_eq!(placeholder(None), "—");
        assert_eq!(placeholder(Some("")), "—");
        assert_eq!(placeholder(Some("x")), "x");
    }
}
