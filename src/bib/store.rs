use std::collections::{BTreeMap, BTreeSet};

/// Keyword to number of filtered entries carrying it.
pub type KeywordFrequencies = BTreeMap<String, usize>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TagField {
    Keywords,
    Authors,
}

impl TagField {
    pub const ALL: [TagField; 2] = [TagField::Keywords, TagField::Authors];

    /// Field name used by selectors.
    pub fn key(self) -> &'static str {
        match self {
            Self::Keywords => "keywords",
            Self::Authors => "author",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Keywords => "Keywords",
            Self::Authors => "Authors",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
    pub id: String,
    pub keywords: Vec<String>,
    pub authors: Vec<String>,
    pub fields: BTreeMap<String, String>,
}

impl Entry {
    pub fn tags(&self, field: TagField) -> &[String] {
        match field {
            TagField::Keywords => &self.keywords,
            TagField::Authors => &self.authors,
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.fields.get("title").map(String::as_str)
    }

    pub fn year(&self) -> Option<&str> {
        self.fields.get("year").map(String::as_str)
    }
}

/// All loaded entries plus the subset matching the active selectors.
#[derive(Clone, Debug, Default)]
pub struct EntryStore {
    entries: BTreeMap<String, Entry>,
    filtered: BTreeSet<String>,
}

impl EntryStore {
    pub fn new(entries: impl IntoIterator<Item = Entry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|entry| (entry.id.clone(), entry))
            .collect::<BTreeMap<_, _>>();
        let filtered = entries.keys().cloned().collect();
        Self { entries, filtered }
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn filtered_count(&self) -> usize {
        self.filtered.len()
    }

    pub fn get(&self, id: &str) -> Option<&Entry> {
        self.entries.get(id)
    }

    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    pub fn is_filtered(&self, id: &str) -> bool {
        self.filtered.contains(id)
    }

    /// Unknown ids are ignored.
    pub fn set_filtered<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.filtered = ids
            .into_iter()
            .filter_map(|id| self.entries.get_key_value(id.as_ref()).map(|(key, _)| key.clone()))
            .collect();
    }

    pub fn filtered_entries(&self) -> impl Iterator<Item = &Entry> {
        self.filtered.iter().filter_map(|id| self.entries.get(id))
    }

    pub fn filtered_keywords(&self) -> impl Iterator<Item = &[String]> {
        self.filtered_entries().map(|entry| entry.keywords.as_slice())
    }
}
