// src/store/id.rs

//! Task ID generation: a slug derived from the title plus a 4-character
//! random hex suffix, e.g. `deep-work-4f2a`.

/// Maximum slug length before the suffix is appended.
const MAX_SLUG_LEN: usize = 40;

/// Lowercase a title into a hyphen-separated ASCII slug.
///
/// Non-alphanumeric runs collapse into single hyphens; leading/trailing
/// hyphens are trimmed and the result is capped at [`MAX_SLUG_LEN`].
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_was_hyphen = true;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.len() > MAX_SLUG_LEN {
        slug.truncate(MAX_SLUG_LEN);
        while slug.ends_with('-') {
            slug.pop();
        }
    }

    slug
}

/// 4 hex chars of entropy. Collisions across one user's task list are
/// vanishingly unlikely and harmless to retry at a higher level.
fn random_suffix() -> String {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};

    let mut hasher = RandomState::new().build_hasher();
    hasher.write_u64(
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos() as u64),
    );
    format!("{:04x}", hasher.finish() & 0xFFFF)
}

/// Generate a fresh task ID from a title.
pub fn generate_task_id(title: &str) -> String {
    let slug = slugify(title);
    let suffix = random_suffix();

    if slug.is_empty() {
        format!("task-{suffix}")
    } else {
        format!("{slug}-{suffix}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_basic() {
        assert_eq!(slugify("Deep Work"), "deep-work");
        assert_eq!(slugify("Lunch!"), "lunch");
        assert_eq!(slugify("  spaced   out  "), "spaced-out");
    }

    #[test]
    fn slugify_empty_and_symbol_only() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn slugify_caps_length_without_trailing_hyphen() {
        let slug = slugify(&"word ".repeat(20));
        assert!(slug.len() <= MAX_SLUG_LEN);
        assert!(!slug.ends_with('-'));
    }

    #[test]
    fn generated_ids_carry_slug_prefix_and_hex_suffix() {
        let id = generate_task_id("Deep Work");
        assert!(id.starts_with("deep-work-"));
        let suffix = id.rsplit('-').next().unwrap();
        assert_eq!(suffix.len(), 4);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn empty_title_falls_back_to_task_prefix() {
        assert!(generate_task_id("").starts_with("task-"));
    }
}
