//! The supported source/target dialect matrix (spec.md §4.H).
//!
//! Six ordered pairs among mysql/postgresql/sqlite are supported; a
//! same-dialect pair is rejected rather than accepted as a no-op copy —
//! spec.md leaves that choice open, and a same-to-same "migration" has no
//! cross-dialect transform work to do, so treating it as unsupported avoids
//! silently running a pointless data copy.

use dbswap_dialect::Dialect;

use crate::error::{Result, ValidateError};

pub fn check_pair(source: Dialect, target: Dialect) -> Result<()> {
    if source == target {
        return Err(ValidateError::unsupported_pair(format!(
            "source and target are both {:?}; same-dialect migration is not supported",
            source
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_dialect_pairs_are_accepted() {
        assert!(check_pair(Dialect::MySql, Dialect::PostgreSql).is_ok());
        assert!(check_pair(Dialect::PostgreSql, Dialect::Sqlite).is_ok());
        assert!(check_pair(Dialect::Sqlite, Dialect::MySql).is_ok());
    }

    #[test]
    fn same_dialect_pairs_are_rejected() {
        let err = check_pair(Dialect::MySql, Dialect::MySql).unwrap_err();
        assert_eq!(err.kind, crate::error::ValidateErrorKind::UnsupportedPair);
    }
}
