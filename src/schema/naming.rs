//! Collection naming
//!
//! A record kind is stored in the collection named after it in lowercase
//! (`User` -> `user`). Kinds listed in [`COLLECTION_OVERRIDES`] map to an
//! explicit name instead; there is no general pluralisation rule.

/// Kind name -> collection name, checked before the lowercase fallback
pub const COLLECTION_OVERRIDES: &[(&str, &str)] = &[("BlogPost", "blogs")];

/// Collection a record kind is stored in
pub fn collection_name(kind: &str) -> String {
    match collection_override(kind) {
        Some(name) => name.to_string(),
        None => kind.to_lowercase(),
    }
}

/// Explicit collection name for `kind`, if one is declared
pub fn collection_override(kind: &str) -> Option<&'static str> {
    COLLECTION_OVERRIDES
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, collection)| *collection)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_default() {
        assert_eq!(collection_name("User"), "user");
        assert_eq!(collection_name("Product"), "product");
        assert_eq!(collection_name("Lead"), "lead");
        assert_eq!(collection_name("OrderItem"), "orderitem");
    }

    #[test]
    fn test_override_wins() {
        assert_eq!(collection_override("BlogPost"), Some("blogs"));
        assert_eq!(collection_name("BlogPost"), "blogs");
        // Overrides match the exact kind name only
        assert_eq!(collection_name("blogpost"), "blogpost");
        assert_eq!(collection_override("User"), None);
    }

    #[test]
    fn test_deterministic() {
        for kind in ["User", "BlogPost", "Lead"] {
            assert_eq!(collection_name(kind), collection_name(kind));
        }
    }
}
