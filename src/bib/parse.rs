use std::collections::BTreeMap;

use anyhow::{Context, Result, anyhow};
use serde_json::Value;

pub(super) type RawFields = BTreeMap<String, String>;

/// Accepts a bare JSON object or one wrapped in a script assignment such as
/// `const entries = { ... };`.
pub(super) fn parse_entry_map(raw: &str) -> Result<BTreeMap<String, RawFields>> {
    let start = raw
        .find('{')
        .ok_or_else(|| anyhow!("entry data contains no JSON object"))?;
    let end = raw
        .rfind('}')
        .filter(|&end| end > start)
        .ok_or_else(|| anyhow!("entry data has an unterminated JSON object"))?;

    let parsed: Value =
        serde_json::from_str(&raw[start..=end]).context("invalid JSON in entry data")?;
    let object = parsed
        .as_object()
        .ok_or_else(|| anyhow!("unexpected JSON type for entry map"))?;

    let mut entries = BTreeMap::new();
    for (id, value) in object {
        let Some(fields) = value.as_object() else {
            tracing::warn!(entry = %id, "skipping entry that is not a JSON object");
            continue;
        };

        let mut raw_fields = RawFields::new();
        for (field, field_value) in fields {
            let text = match field_value {
                Value::String(text) => text.clone(),
                Value::Number(number) => number.to_string(),
                Value::Bool(flag) => flag.to_string(),
                _ => continue,
            };
            raw_fields.insert(field.to_ascii_lowercase(), text);
        }
        entries.insert(id.clone(), raw_fields);
    }

    Ok(entries)
}

fn dedup_in_order(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values {
        if !value.is_empty() && !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

pub(super) fn split_keywords(raw: &str) -> Vec<String> {
    dedup_in_order(raw.split(',').map(|keyword| keyword.trim().to_owned()))
}

pub(super) fn split_authors(raw: &str) -> Vec<String> {
    dedup_in_order(
        raw.split(" and ")
            .map(|author| author.split_whitespace().collect::<Vec<_>>().join(" ")),
    )
}
