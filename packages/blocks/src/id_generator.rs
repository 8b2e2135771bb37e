use uuid::Uuid;

/// Length of the hex suffix in generated ids
const SUFFIX_LEN: usize = 8;

/// Generate a fresh block id of the form `{prefix}_{8 hex chars}`
pub fn generate_id(prefix: &str) -> String {
    let uuid = Uuid::new_v4().simple().to_string();
    format!("{}_{}", prefix, &uuid[..SUFFIX_LEN])
}

/// Check whether `id` has the shape produced by [`generate_id`] for `prefix`
pub fn is_generated_id(id: &str, prefix: &str) -> bool {
    match id.strip_prefix(prefix).and_then(|rest| rest.strip_prefix('_')) {
        Some(suffix) => {
            suffix.len() == SUFFIX_LEN
                && suffix
                    .chars()
                    .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_format() {
        let id = generate_id("button");
        assert!(id.starts_with("button_"));
        assert_eq!(id.len(), "button_".len() + 8);
        assert!(is_generated_id(&id, "button"));
    }

    #[test]
    fn test_ids_are_unique() {
        let a = generate_id("text");
        let b = generate_id("text");
        assert_ne!(a, b);
    }

    #[test]
    fn test_rejects_foreign_ids() {
        assert!(!is_generated_id("text_123", "text"));
        assert!(!is_generated_id("image_abcdef12", "text"));
        assert!(!is_generated_id("text_ABCDEF12", "text"));
    }
}
