use std::collections::{BTreeMap, HashMap};

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::bib::{EntryStore, KeywordFrequencies, TagField};
use crate::selectors::Selectors;
use crate::util::{tag_category, tag_label};

/// Group name for keywords without a category prefix.
pub const OTHER_CATEGORY: &str = "other";

#[derive(Clone, Debug, PartialEq)]
pub struct Tag {
    pub id: String,
    pub frequency: usize,
    pub active: bool,
    /// Per active selector: summed similarity of the entries carrying this
    /// tag divided by the tag frequency. Locked selectors stay at zero.
    pub agreement: Vec<f64>,
}

impl Tag {
    pub fn label(&self) -> &str {
        tag_label(&self.id)
    }

    /// Agreement summed over all active selectors.
    pub fn total_agreement(&self) -> f64 {
        self.agreement.iter().sum()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TagCategory {
    /// Empty for fields that are not grouped.
    pub name: String,
    pub tags: Vec<Tag>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TagCloud {
    pub field: TagField,
    pub min_tag_frequency: usize,
    pub categories: Vec<TagCategory>,
}

impl TagCloud {
    pub fn tag_count(&self) -> usize {
        self.categories.iter().map(|category| category.tags.len()).sum()
    }
}

/// Counts how many filtered entries carry each tag of `field`.
pub fn tag_frequencies(store: &EntryStore, field: TagField) -> BTreeMap<String, usize> {
    let mut frequencies = BTreeMap::new();
    for entry in store.filtered_entries() {
        for tag in entry.tags(field) {
            *frequencies.entry(tag.clone()).or_insert(0) += 1;
        }
    }
    frequencies
}

/// The frequency table the keyword network is built from. Categorized
/// keywords holding a `?` are uncertain assignments and stay out of it.
pub fn keyword_frequencies(store: &EntryStore) -> KeywordFrequencies {
    let mut frequencies = tag_frequencies(store, TagField::Keywords);
    frequencies.retain(|keyword, _| tag_category(keyword).is_none() || !keyword.contains('?'));
    frequencies
}

fn selector_agreement(
    store: &EntryStore,
    field: TagField,
    selectors: &Selectors,
    frequencies: &BTreeMap<String, usize>,
) -> HashMap<String, Vec<f64>> {
    let selector_count = selectors.active().len();
    let mut agreement: HashMap<String, Vec<f64>> = HashMap::new();
    if selector_count == 0 {
        return agreement;
    }

    for entry in store.filtered_entries() {
        let similarities = selectors.similarities(entry);
        for tag in entry.tags(field) {
            let frequency = frequencies.get(tag).copied().unwrap_or(1).max(1) as f64;
            let row = agreement
                .entry(tag.clone())
                .or_insert_with(|| vec![0.0; selector_count]);
            for (index, selector) in selectors.active().iter().enumerate() {
                if !selector.lock {
                    row[index] += similarities[index] / frequency;
                }
            }
        }
    }
    agreement
}

fn sort_tags(tags: &mut [Tag]) {
    tags.sort_by(|a, b| {
        b.frequency
            .cmp(&a.frequency)
            .then_with(|| a.label().cmp(b.label()))
    });
}

/// Builds the frequency-ranked cloud of `field` over the filtered entries.
pub fn build_tag_cloud(
    store: &EntryStore,
    field: TagField,
    selectors: &Selectors,
    min_tag_frequency: usize,
) -> TagCloud {
    let frequencies = tag_frequencies(store, field);
    let mut agreement = selector_agreement(store, field, selectors, &frequencies);

    let mut grouped: BTreeMap<String, Vec<Tag>> = BTreeMap::new();
    let mut ungrouped = Vec::new();
    for (id, &frequency) in &frequencies {
        if frequency < min_tag_frequency {
            continue;
        }

        let tag = Tag {
            id: id.clone(),
            frequency,
            active: selectors.is_active(field, id),
            agreement: agreement.remove(id).unwrap_or_default(),
        };

        match (field, tag_category(id)) {
            (TagField::Keywords, Some(category)) => {
                grouped.entry(category.to_owned()).or_default().push(tag)
            }
            _ => ungrouped.push(tag),
        }
    }

    let mut categories = grouped
        .into_iter()
        .map(|(name, tags)| TagCategory { name, tags })
        .collect::<Vec<_>>();
    categories.push(TagCategory {
        name: match field {
            TagField::Keywords => OTHER_CATEGORY.to_owned(),
            TagField::Authors => String::new(),
        },
        tags: ungrouped,
    });
    for category in &mut categories {
        sort_tags(&mut category.tags);
    }

    TagCloud {
        field,
        min_tag_frequency,
        categories,
    }
}

/// Case-insensitive fuzzy match of a tag label against the cloud's filter box.
pub fn matches_filter(matcher: &SkimMatcherV2, label: &str, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }
    matcher.fuzzy_match(label, query).is_some()
        || matcher
            .fuzzy_match(&label.to_lowercase(), &query.to_lowercase())
            .is_some()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::bib::Entry;
    use crate::selectors::SelectorService;

    fn entry(id: &str, keywords: &[&str]) -> Entry {
        Entry {
            id: id.to_owned(),
            keywords: keywords.iter().map(|value| (*value).to_owned()).collect(),
            authors: vec!["Doe".to_owned()],
            fields: BTreeMap::new(),
        }
    }

    fn store() -> EntryStore {
        EntryStore::new([
            entry("one", &["type:Survey", "Graphs", "Layout"]),
            entry("two", &["type:Method", "Graphs", "type:Maybe?"]),
            entry("three", &["type:Method", "Graphs", "Layout"]),
        ])
    }

    #[test]
    fn keyword_table_drops_uncertain_categorized_tags() {
        let table = keyword_frequencies(&store());
        assert_eq!(table.get("Graphs"), Some(&3));
        assert_eq!(table.get("type:Method"), Some(&2));
        assert!(!table.contains_key("type:Maybe?"));
    }

    #[test]
    fn cloud_groups_and_ranks() {
        let cloud = build_tag_cloud(&store(), TagField::Keywords, &Selectors::default(), 1);
        let names = cloud
            .categories
            .iter()
            .map(|category| category.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["type", "other"]);

        let typed = cloud.categories[0]
            .tags
            .iter()
            .map(|tag| tag.label())
            .collect::<Vec<_>>();
        assert_eq!(typed, vec!["Method", "Maybe?", "Survey"]);

        let other = cloud.categories[1]
            .tags
            .iter()
            .map(|tag| (tag.id.as_str(), tag.frequency))
            .collect::<Vec<_>>();
        assert_eq!(other, vec![("Graphs", 3), ("Layout", 2)]);
    }

    #[test]
    fn min_frequency_hides_rare_tags() {
        let cloud = build_tag_cloud(&store(), TagField::Keywords, &Selectors::default(), 2);
        assert_eq!(cloud.tag_count(), 3);
    }

    #[test]
    fn authors_are_not_grouped() {
        let cloud = build_tag_cloud(&store(), TagField::Authors, &Selectors::default(), 1);
        assert_eq!(cloud.categories.len(), 1);
        assert_eq!(cloud.categories[0].name, "");
        assert_eq!(cloud.categories[0].tags[0].frequency, 3);
    }

    #[test]
    fn agreement_averages_selector_similarity() {
        let mut selectors = Selectors::default();
        selectors.toggle_selector("keywords", "Layout");
        let cloud = build_tag_cloud(&store(), TagField::Keywords, &selectors, 1);
        let other = &cloud.categories[1].tags;

        let graphs = other.iter().find(|tag| tag.id == "Graphs").unwrap();
        assert!((graphs.agreement[0] - 2.0 / 3.0).abs() < 1e-12);
        let layout = other.iter().find(|tag| tag.id == "Layout").unwrap();
        assert!(layout.active);
        assert_eq!(layout.agreement, vec![1.0]);
        assert_eq!(layout.total_agreement(), 1.0);

        selectors.set_lock(0, true);
        let locked = build_tag_cloud(&store(), TagField::Keywords, &selectors, 1);
        assert!(locked.categories[1].tags.iter().all(|tag| tag.agreement == vec![0.0]));
    }

    #[test]
    fn filter_is_fuzzy_and_case_insensitive() {
        let matcher = SkimMatcherV2::default();
        assert!(matches_filter(&matcher, "Visual Question Answering", "vqa"));
        assert!(matches_filter(&matcher, "Layout", ""));
        assert!(!matches_filter(&matcher, "Layout", "graph"));
    }
}
