use crate::bib::{Entry, EntryStore, TagField};

/// Filter service the views write back to.
pub trait SelectorService {
    fn toggle_selector(&mut self, field: &str, value: &str);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    pub field: TagField,
    pub value: String,
    /// Locked selectors keep filtering but are left out of tag agreement.
    pub lock: bool,
}

impl Selector {
    pub fn matches(&self, entry: &Entry) -> bool {
        entry.tags(self.field).iter().any(|tag| tag == &self.value)
    }
}

/// Conjunctive tag selectors over an [`EntryStore`].
#[derive(Clone, Debug, Default)]
pub struct Selectors {
    active: Vec<Selector>,
    revision: u64,
}

impl Selectors {
    pub fn active(&self) -> &[Selector] {
        &self.active
    }

    /// Bumped on every change so callers know when to refilter.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_active(&self, field: TagField, value: &str) -> bool {
        self.active
            .iter()
            .any(|selector| selector.field == field && selector.value == value)
    }

    pub fn set_lock(&mut self, index: usize, lock: bool) {
        if let Some(selector) = self.active.get_mut(index)
            && selector.lock != lock
        {
            selector.lock = lock;
            self.revision = self.revision.wrapping_add(1);
        }
    }

    pub fn clear(&mut self) {
        if !self.active.is_empty() {
            self.active.clear();
            self.revision = self.revision.wrapping_add(1);
        }
    }

    /// One score per active selector, `1.0` when the entry matches.
    pub fn similarities(&self, entry: &Entry) -> Vec<f64> {
        self.active
            .iter()
            .map(|selector| if selector.matches(entry) { 1.0 } else { 0.0 })
            .collect()
    }

    /// Marks the entries matching every selector as filtered.
    pub fn apply(&self, store: &mut EntryStore) {
        let ids = store
            .entries()
            .filter(|entry| self.active.iter().all(|selector| selector.matches(entry)))
            .map(|entry| entry.id.clone())
            .collect::<Vec<_>>();
        tracing::debug!(
            selectors = self.active.len(),
            filtered = ids.len(),
            "applied selectors"
        );
        store.set_filtered(ids);
    }
}

impl SelectorService for Selectors {
    fn toggle_selector(&mut self, field: &str, value: &str) {
        let Some(field) = TagField::from_key(field) else {
            tracing::warn!(field, "ignoring selector for unknown field");
            return;
        };

        if let Some(position) = self
            .active
            .iter()
            .position(|selector| selector.field == field && selector.value == value)
        {
            self.active.remove(position);
        } else {
            self.active.push(Selector {
                field,
                value: value.to_owned(),
                lock: false,
            });
        }
        self.revision = self.revision.wrapping_add(1);
    }
}
