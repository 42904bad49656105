//! Mapping from a dialect-neutral [`LogicalType`] (plus length/precision/
//! scale/unsigned) to a concrete dialect type spelling.

use dbswap_model::LogicalType;

use crate::dialect::Dialect;

/// The inputs a type spelling depends on, bundled so callers don't have to
/// thread four optional parameters through every call site.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeShape {
    pub length: Option<u32>,
    pub precision: Option<u8>,
    pub scale: Option<u8>,
    pub unsigned: bool,
}

pub fn spell(dialect: Dialect, ty: &LogicalType, shape: TypeShape) -> String {
    match dialect {
        Dialect::MySql => spell_mysql(ty, shape),
        Dialect::PostgreSql => spell_postgresql(ty, shape),
        Dialect::Sqlite => spell_sqlite(ty, shape),
    }
}

fn with_length(base: &str, shape: TypeShape) -> String {
    match shape.length {
        Some(n) => format!("{base}({n})"),
        None => base.to_string(),
    }
}

fn with_precision_scale(base: &str, shape: TypeShape) -> String {
    match (shape.precision, shape.scale) {
        (Some(p), Some(s)) => format!("{base}({p},{s})"),
        (Some(p), None) => format!("{base}({p})"),
        _ => base.to_string(),
    }
}

fn spell_mysql(ty: &LogicalType, shape: TypeShape) -> String {
    let unsigned = |s: &str| if shape.unsigned { format!("{s} UNSIGNED") } else { s.to_string() };
    match ty {
        LogicalType::TinyInt => unsigned("TINYINT"),
        LogicalType::SmallInt | LogicalType::SmallSerial => unsigned("SMALLINT"),
        LogicalType::MediumInt => unsigned("MEDIUMINT"),
        LogicalType::Int | LogicalType::Serial => unsigned("INT"),
        LogicalType::BigInt | LogicalType::BigSerial => unsigned("BIGINT"),
        LogicalType::Decimal => with_precision_scale("DECIMAL", shape),
        LogicalType::Numeric => with_precision_scale("NUMERIC", shape),
        LogicalType::Float => "FLOAT".to_string(),
        LogicalType::Double => "DOUBLE".to_string(),
        LogicalType::Real => "FLOAT".to_string(),
        LogicalType::Char => with_length("CHAR", shape),
        LogicalType::VarChar => with_length("VARCHAR", shape),
        LogicalType::Text => "TEXT".to_string(),
        LogicalType::TinyText => "TINYTEXT".to_string(),
        LogicalType::MediumText => "MEDIUMTEXT".to_string(),
        LogicalType::LongText => "LONGTEXT".to_string(),
        LogicalType::Binary => with_length("BINARY", shape),
        LogicalType::VarBinary => with_length("VARBINARY", shape),
        LogicalType::Blob => "BLOB".to_string(),
        LogicalType::TinyBlob => "TINYBLOB".to_string(),
        LogicalType::MediumBlob => "MEDIUMBLOB".to_string(),
        LogicalType::LongBlob | LogicalType::Bytea => "LONGBLOB".to_string(),
        LogicalType::Date => "DATE".to_string(),
        LogicalType::DateTime => "DATETIME".to_string(),
        LogicalType::Timestamp => "TIMESTAMP".to_string(),
        LogicalType::Time => "TIME".to_string(),
        LogicalType::Year => "YEAR".to_string(),
        LogicalType::Enum => "ENUM".to_string(),
        LogicalType::Set => "SET".to_string(),
        LogicalType::Json | LogicalType::JsonB => "JSON".to_string(),
        LogicalType::Boolean => "TINYINT(1)".to_string(),
        LogicalType::Uuid => "CHAR(36)".to_string(),
        LogicalType::Other(s) => s.clone(),
    }
}

fn spell_postgresql(ty: &LogicalType, shape: TypeShape) -> String {
    match ty {
        LogicalType::TinyInt | LogicalType::SmallInt => "SMALLINT".to_string(),
        LogicalType::MediumInt | LogicalType::Int => "INTEGER".to_string(),
        LogicalType::BigInt => "BIGINT".to_string(),
        LogicalType::SmallSerial => "SMALLSERIAL".to_string(),
        LogicalType::Serial => "SERIAL".to_string(),
        LogicalType::BigSerial => "BIGSERIAL".to_string(),
        LogicalType::Decimal | LogicalType::Numeric => with_precision_scale("NUMERIC", shape),
        LogicalType::Float | LogicalType::Real => "REAL".to_string(),
        LogicalType::Double => "DOUBLE PRECISION".to_string(),
        LogicalType::Char => with_length("CHAR", shape),
        LogicalType::VarChar => with_length("VARCHAR", shape),
        LogicalType::Text
        | LogicalType::TinyText
        | LogicalType::MediumText
        | LogicalType::LongText => "TEXT".to_string(),
        LogicalType::Binary | LogicalType::VarBinary => "BYTEA".to_string(),
        LogicalType::Blob
        | LogicalType::TinyBlob
        | LogicalType::MediumBlob
        | LogicalType::LongBlob
        | LogicalType::Bytea => "BYTEA".to_string(),
        LogicalType::Date => "DATE".to_string(),
        LogicalType::DateTime | LogicalType::Timestamp => "TIMESTAMP".to_string(),
        LogicalType::Time => "TIME".to_string(),
        LogicalType::Year => "SMALLINT".to_string(),
        LogicalType::Enum => "TEXT".to_string(),
        LogicalType::Set => "TEXT".to_string(),
        LogicalType::Json => "JSON".to_string(),
        LogicalType::JsonB => "JSONB".to_string(),
        LogicalType::Boolean => "BOOLEAN".to_string(),
        LogicalType::Uuid => "UUID".to_string(),
        LogicalType::Other(s) => s.clone(),
    }
}

fn spell_sqlite(ty: &LogicalType, _shape: TypeShape) -> String {
    // SQLite's type affinity system accepts almost any declared type name,
    // but the splitter/renderer corpus sticks to the five storage classes.
    match ty {
        LogicalType::TinyInt
        | LogicalType::SmallInt
        | LogicalType::MediumInt
        | LogicalType::Int
        | LogicalType::BigInt
        | LogicalType::Serial
        | LogicalType::SmallSerial
        | LogicalType::BigSerial
        | LogicalType::Year
        | LogicalType::Boolean => "INTEGER".to_string(),
        LogicalType::Decimal | LogicalType::Numeric | LogicalType::Float | LogicalType::Double | LogicalType::Real => {
            "REAL".to_string()
        }
        LogicalType::Char
        | LogicalType::VarChar
        | LogicalType::Text
        | LogicalType::TinyText
        | LogicalType::MediumText
        | LogicalType::LongText
        | LogicalType::Enum
        | LogicalType::Set
        | LogicalType::Json
        | LogicalType::JsonB
        | LogicalType::Uuid
        | LogicalType::Date
        | LogicalType::DateTime
        | LogicalType::Timestamp
        | LogicalType::Time => "TEXT".to_string(),
        LogicalType::Binary
        | LogicalType::VarBinary
        | LogicalType::Blob
        | LogicalType::TinyBlob
        | LogicalType::MediumBlob
        | LogicalType::LongBlob
        | LogicalType::Bytea => "BLOB".to_string(),
        LogicalType::Other(s) => s.clone(),
    }
}
