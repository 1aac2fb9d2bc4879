/// Category of a `category:tag` keyword.
pub fn tag_category(tag: &str) -> Option<&str> {
    tag.split_once(':')
        .map(|(category, _)| category)
        .filter(|category| !category.is_empty())
}

/// Display text of a tag, without its category prefix.
pub fn tag_label(tag: &str) -> &str {
    tag.split_once(':').map(|(_, rest)| rest).unwrap_or(tag)
}
