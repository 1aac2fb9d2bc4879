use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};

use super::parse::{parse_entry_map, split_authors, split_keywords};
use super::store::{Entry, EntryStore};

pub fn load_entry_store(path: &Path) -> Result<EntryStore> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read entry data from {}", path.display()))?;
    let store = store_from_json(&raw)
        .with_context(|| format!("failed to parse entry data from {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        entries = store.entry_count(),
        "loaded bibliography"
    );
    Ok(store)
}

pub fn store_from_json(raw: &str) -> Result<EntryStore> {
    let parsed = parse_entry_map(raw)?;

    let mut entries = Vec::with_capacity(parsed.len());
    for (id, fields) in parsed {
        if id.trim().is_empty() {
            continue;
        }

        let keywords = fields
            .get("keywords")
            .map(|raw| split_keywords(raw))
            .unwrap_or_default();
        let authors = fields
            .get("author")
            .map(|raw| split_authors(raw))
            .unwrap_or_default();

        entries.push(Entry {
            id,
            keywords,
            authors,
            fields,
        });
    }

    if entries.is_empty() {
        return Err(anyhow!("entry data contains no bibliography entries"));
    }

    Ok(EntryStore::new(entries))
}
