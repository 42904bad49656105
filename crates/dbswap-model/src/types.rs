//! The closed logical type tag set shared by every dialect.

use serde::{Deserialize, Serialize};

/// A dialect-neutral logical column type.
///
/// This is the closed tag set from the glossary, plus an `Other` escape
/// hatch for a dialect-specific spelling the model doesn't otherwise know
/// about (e.g. a PostGIS geometry type encountered during extraction).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicalType {
    TinyInt,
    SmallInt,
    MediumInt,
    Int,
    BigInt,
    Decimal,
    Numeric,
    Float,
    Double,
    Real,
    Char,
    VarChar,
    Text,
    TinyText,
    MediumText,
    LongText,
    Binary,
    VarBinary,
    Blob,
    TinyBlob,
    MediumBlob,
    LongBlob,
    Bytea,
    Date,
    DateTime,
    Timestamp,
    Time,
    Year,
    Enum,
    Set,
    Json,
    JsonB,
    Boolean,
    Uuid,
    Serial,
    BigSerial,
    SmallSerial,
    Other(String),
}

impl LogicalType {
    /// Whether this type carries a length (e.g. `varchar(n)`).
    pub const fn takes_length(&self) -> bool {
        matches!(
            self,
            LogicalType::Char
                | LogicalType::VarChar
                | LogicalType::Binary
                | LogicalType::VarBinary
        )
    }

    /// Whether this type carries precision/scale (e.g. `decimal(p, s)`).
    pub const fn takes_precision_scale(&self) -> bool {
        matches!(self, LogicalType::Decimal | LogicalType::Numeric)
    }

    /// Whether this is one of the MySQL "text ladder" variants.
    pub const fn is_mysql_text_ladder(&self) -> bool {
        matches!(
            self,
            LogicalType::TinyText
                | LogicalType::Text
                | LogicalType::MediumText
                | LogicalType::LongText
        )
    }

    /// Whether this is one of the MySQL "blob ladder" variants.
    pub const fn is_mysql_blob_ladder(&self) -> bool {
        matches!(
            self,
            LogicalType::TinyBlob
                | LogicalType::Blob
                | LogicalType::MediumBlob
                | LogicalType::LongBlob
        )
    }

    pub const fn is_integer(&self) -> bool {
        matches!(
            self,
            LogicalType::TinyInt
                | LogicalType::SmallInt
                | LogicalType::MediumInt
                | LogicalType::Int
                | LogicalType::BigInt
                | LogicalType::Serial
                | LogicalType::BigSerial
                | LogicalType::SmallSerial
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_length_only_for_char_like_types() {
        assert!(LogicalType::VarChar.takes_length());
        assert!(LogicalType::Char.takes_length());
        assert!(!LogicalType::Int.takes_length());
        assert!(!LogicalType::Text.takes_length());
    }

    #[test]
    fn takes_precision_scale_only_for_fixed_point() {
        assert!(LogicalType::Decimal.takes_precision_scale());
        assert!(LogicalType::Numeric.takes_precision_scale());
        assert!(!LogicalType::Float.takes_precision_scale());
    }

    #[test]
    fn text_and_blob_ladders_are_disjoint() {
        assert!(LogicalType::LongText.is_mysql_text_ladder());
        assert!(!LogicalType::LongText.is_mysql_blob_ladder());
        assert!(LogicalType::MediumBlob.is_mysql_blob_ladder());
        assert!(!LogicalType::MediumBlob.is_mysql_text_ladder());
    }

    #[test]
    fn other_escape_hatch_round_trips_through_serde() {
        let t = LogicalType::Other("geometry".to_string());
        let json = serde_json::to_string(&t).unwrap();
        let back: LogicalType = serde_json::from_str(&json).unwrap();
        assert_eq!(t, back);
    }
}
