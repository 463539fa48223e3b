//! Identifier generation for sessions, requests and history records
//!
//! All IDs use the format: `{kind}-{slug}-{uuid-v7-simple}`
//! Example: `session-e1-0193c1f4a0b87c3e9d1e4f2a6b7c8d9e`
//!
//! The v7 UUID keeps IDs of one kind roughly time-ordered while staying unique
//! across concurrently created sessions.

/// Generate an ID from a kind and a free-form label
pub fn generate_id(kind: &str, label: &str) -> String {
    let uuid = uuid::Uuid::now_v7();
    let slug = slugify(label);
    if slug.is_empty() {
        format!("{}-{}", kind, uuid.simple())
    } else {
        format!("{}-{}-{}", kind, slug, uuid.simple())
    }
}

/// Slugify a label for use in IDs
fn slugify(label: &str) -> String {
    label
        .to_lowercase()
        .chars()
        .filter_map(|c| {
            if c.is_ascii_alphanumeric() {
                Some(c)
            } else if c == '\'' || c == '\u{2019}' || c == '\u{2018}' {
                None
            } else {
                Some('-')
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
