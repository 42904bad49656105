//! SQLite requires index names to be unique database-wide, not just per
//! table, so the transformer rewrites every index name when the target is
//! SQLite (spec.md §4.E.6).

use sha2::{Digest, Sha256};

const MAX_LEN: usize = 64;

fn slug(original_name: &str) -> String {
    let lower = original_name.to_ascii_lowercase();
    lower.strip_prefix("idx_").unwrap_or(&lower).to_string()
}

/// Rewrite an index name to `idx_<table>_<slug>`, truncating the tail to an
/// 8-hex-digit hash of the slug if the result would exceed 64 characters.
pub fn sqlite_index_name(table: &str, original_name: &str) -> String {
    let candidate = format!("idx_{table}_{}", slug(original_name));
    if candidate.len() <= MAX_LEN {
        return candidate;
    }
    let hash = Sha256::digest(slug(original_name).as_bytes());
    let short_hash = hex::encode(&hash[..4]);
    let prefix_budget = MAX_LEN - short_hash.len() - 1;
    let prefix: String = candidate.chars().take(prefix_budget).collect();
    format!("{prefix}_{short_hash}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_names_pass_through_with_the_idx_table_prefix() {
        assert_eq!(sqlite_index_name("users", "ix_email"), "idx_users_ix_email");
    }

    #[test]
    fn an_existing_idx_prefix_on_the_source_name_is_not_doubled() {
        assert_eq!(sqlite_index_name("users", "idx_email"), "idx_users_email");
    }

    #[test]
    fn names_over_64_characters_are_hash_truncated_and_stay_under_the_limit() {
        let long_name = "a".repeat(80);
        let rewritten = sqlite_index_name("a_fairly_long_table_name_here", &long_name);
        assert!(rewritten.len() <= MAX_LEN);
        assert!(rewritten.starts_with("idx_a_fairly_long_table_name_here_"));
    }

    #[test]
    fn truncation_is_deterministic_for_the_same_input() {
        let long_name = "x".repeat(100);
        let a = sqlite_index_name("t", &long_name);
        let b = sqlite_index_name("t", &long_name);
        assert_eq!(a, b);
    }
}
