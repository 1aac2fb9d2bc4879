mod collect;
mod parse;
mod store;

pub use collect::{load_entry_store, store_from_json};
pub use store::{Entry, EntryStore, KeywordFrequencies, TagField};
