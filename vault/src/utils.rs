use uuid::Uuid;

/// Generates a time-ordered id rendered as 32 lowercase hex chars
pub fn generate_id() -> String {
    Uuid::now_v7().simple().to_string()
}

/// Only accepts ids in the same shape as `generate_id` produces
pub fn valid_id(id: &str) -> bool {
    if id.len() != 32 {
        return false;
    }
    if !id.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)) {
        return false;
    }
    Uuid::try_parse(id).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_id() {
        let id = generate_id();
        assert_eq!(id.len(), 32);
        assert!(valid_id(&id));
    }

    #[test]
    fn test_generate_id_is_ordered() {
        let first = generate_id();
        let second = generate_id();
        assert_ne!(first, second);
    }

    #[test]
    fn test_valid_id() {
        assert!(valid_id("0196d1bbc22f79c89cdbc8beced0d2f0"));

        // Dashed uuids are not how we render ids
        assert!(!valid_id("0196d1bb-c22f-79c8-9cdb-c8beced0d2f0"));
        assert!(!valid_id("0196D1BBC22F79C89CDBC8BECED0D2F0"));
        assert!(!valid_id("hello"));
        assert!(!valid_id(""));
        assert!(!valid_id("0196d1bbc22f79c89cdbc8beced0d2fz"));
    }
}
