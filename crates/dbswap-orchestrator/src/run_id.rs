//! Run identifiers: `mig-<UTC timestamp>-<random suffix>`, unique enough to
//! tell two runs apart in logs and in the rollback collaborator's own
//! bookkeeping without depending on a real ULID crate the teacher's stack
//! doesn't carry.

use rand::distributions::Alphanumeric;
use rand::Rng;

pub fn generate() -> String {
    let timestamp = chrono::Utc::now().format("%Y%m%dT%H%M%S%.3fZ");
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect::<String>()
        .to_ascii_lowercase();
    format!("mig-{timestamp}-{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_have_the_expected_shape_and_are_distinct() {
        let a = generate();
        let b = generate();
        assert!(a.starts_with("mig-"));
        assert_ne!(a, b);
    }
}
