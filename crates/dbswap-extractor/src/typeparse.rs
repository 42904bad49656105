//! Parses a driver's raw type spelling back into the dialect-neutral
//! [`LogicalType`] tag set plus length/precision/scale/unsigned.
//!
//! This is the inverse of `dbswap_dialect::spelling::spell` — extraction
//! reads what the source database reports, this module classifies it.

use dbswap_dialect::TypeShape;
use dbswap_model::LogicalType;

/// Split `"name(args)"` into `("name", Some("args"))`, or `("name", None)`
/// if there are no parens.
fn split_args(raw: &str) -> (&str, Option<&str>) {
    let raw = raw.trim();
    match raw.find('(') {
        Some(open) if raw.ends_with(')') => (&raw[..open], Some(&raw[open + 1..raw.len() - 1])),
        _ => (raw, None),
    }
}

fn parse_u32(s: &str) -> Option<u32> {
    s.trim().parse().ok()
}

fn parse_precision_scale(args: &str) -> (Option<u8>, Option<u8>) {
    let mut parts = args.split(',');
    let precision = parts.next().and_then(|p| p.trim().parse().ok());
    let scale = parts.next().and_then(|s| s.trim().parse().ok());
    (precision, scale)
}

pub struct ParsedType {
    pub logical_type: LogicalType,
    pub shape: TypeShape,
    pub enum_values: Vec<String>,
}

/// Parse a MySQL `COLUMN_TYPE`/`DESCRIBE` spelling, e.g.
/// `"int(11) unsigned"`, `"varchar(255)"`, `"decimal(10,2)"`,
/// `"enum('a','b','c')"`.
pub fn parse_mysql_type(raw: &str) -> ParsedType {
    let lower = raw.to_ascii_lowercase();
    let unsigned = lower.contains("unsigned");
    let (base, args) = split_args(&lower);
    let base = base.trim();

    if base == "enum" || base == "set" {
        let enum_values = args
            .map(|a| {
                a.split(',')
                    .map(|v| v.trim().trim_matches('\'').replace("''", "'"))
                    .collect()
            })
            .unwrap_or_default();
        let logical_type = if base == "enum" { LogicalType::Enum } else { LogicalType::Set };
        return ParsedType { logical_type, shape: TypeShape::default(), enum_values };
    }

    let logical_type = match base {
        "tinyint" if args == Some("1") => LogicalType::Boolean,
        "tinyint" => LogicalType::TinyInt,
        "smallint" => LogicalType::SmallInt,
        "mediumint" => LogicalType::MediumInt,
        "int" | "integer" => LogicalType::Int,
        "bigint" => LogicalType::BigInt,
        "decimal" | "dec" => LogicalType::Decimal,
        "numeric" => LogicalType::Numeric,
        "float" => LogicalType::Float,
        "double" | "double precision" => LogicalType::Double,
        "char" => LogicalType::Char,
        "varchar" => LogicalType::VarChar,
        "tinytext" => LogicalType::TinyText,
        "text" => LogicalType::Text,
        "mediumtext" => LogicalType::MediumText,
        "longtext" => LogicalType::LongText,
        "binary" => LogicalType::Binary,
        "varbinary" => LogicalType::VarBinary,
        "tinyblob" => LogicalType::TinyBlob,
        "blob" => LogicalType::Blob,
        "mediumblob" => LogicalType::MediumBlob,
        "longblob" => LogicalType::LongBlob,
        "date" => LogicalType::Date,
        "datetime" => LogicalType::DateTime,
        "timestamp" => LogicalType::Timestamp,
        "time" => LogicalType::Time,
        "year" => LogicalType::Year,
        "json" => LogicalType::Json,
        _ => LogicalType::Other(raw.to_string()),
    };

    let shape = match logical_type {
        LogicalType::Decimal | LogicalType::Numeric => {
            let (precision, scale) = args.map(parse_precision_scale).unwrap_or((None, None));
            TypeShape { precision, scale, unsigned, ..Default::default() }
        }
        LogicalType::Char | LogicalType::VarChar | LogicalType::Binary | LogicalType::VarBinary => {
            TypeShape { length: args.and_then(parse_u32), unsigned, ..Default::default() }
        }
        _ => TypeShape { unsigned, ..Default::default() },
    };

    ParsedType { logical_type, shape, enum_values: Vec::new() }
}

/// Parse a PostgreSQL `information_schema.columns` row: `data_type` plus
/// the separately-reported `character_maximum_length` /
/// `numeric_precision` / `numeric_scale`.
pub fn parse_postgresql_type(
    data_type: &str,
    char_len: Option<u32>,
    numeric_precision: Option<u8>,
    numeric_scale: Option<u8>,
) -> ParsedType {
    let lower = data_type.to_ascii_lowercase();
    let logical_type = match lower.as_str() {
        "smallint" => LogicalType::SmallInt,
        "integer" => LogicalType::Int,
        "bigint" => LogicalType::BigInt,
        "numeric" | "decimal" => LogicalType::Numeric,
        "real" => LogicalType::Real,
        "double precision" => LogicalType::Double,
        "character" => LogicalType::Char,
        "character varying" => LogicalType::VarChar,
        "text" => LogicalType::Text,
        "bytea" => LogicalType::Bytea,
        "date" => LogicalType::Date,
        "timestamp without time zone" | "timestamp with time zone" => LogicalType::Timestamp,
        "time without time zone" | "time with time zone" => LogicalType::Time,
        "boolean" => LogicalType::Boolean,
        "uuid" => LogicalType::Uuid,
        "json" => LogicalType::Json,
        "jsonb" => LogicalType::JsonB,
        _ => LogicalType::Other(data_type.to_string()),
    };

    let shape = TypeShape {
        length: char_len,
        precision: numeric_precision,
        scale: numeric_scale,
        unsigned: false,
    };

    ParsedType { logical_type, shape, enum_values: Vec::new() }
}

/// Classify a SQLite declared type by its affinity rules (the five
/// storage-class buckets SQLite itself uses for an untyped declaration).
pub fn parse_sqlite_type(raw: &str) -> ParsedType {
    let lower = raw.to_ascii_lowercase();
    let (base, args) = split_args(&lower);

    let logical_type = if base.contains("int") {
        LogicalType::BigInt
    } else if base.contains("char") || base.contains("clob") || base.contains("text") {
        if base.contains("var") { LogicalType::VarChar } else { LogicalType::Text }
    } else if base.contains("blob") || base.is_empty() {
        LogicalType::Blob
    } else if base.contains("real") || base.contains("floa") || base.contains("doub") {
        LogicalType::Double
    } else if base.contains("bool") {
        LogicalType::Boolean
    } else {
        // NUMERIC affinity catch-all, including DECIMAL/NUMERIC/DATE/DATETIME.
        LogicalType::Numeric
    };

    let shape = match args {
        Some(a) if a.contains(',') => {
            let (p, s) = parse_precision_scale(a);
            TypeShape { precision: p, scale: s, ..Default::default() }
        }
        Some(a) => TypeShape { length: parse_u32(a), ..Default::default() },
        None => TypeShape::default(),
    };

    ParsedType { logical_type, shape, enum_values: Vec::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mysql_tinyint_one_is_boolean() {
        let p = parse_mysql_type("tinyint(1)");
        assert_eq!(p.logical_type, LogicalType::Boolean);
    }

    #[test]
    fn mysql_int_unsigned_sets_the_flag() {
        let p = parse_mysql_type("int(11) unsigned");
        assert_eq!(p.logical_type, LogicalType::Int);
        assert!(p.shape.unsigned);
    }

    #[test]
    fn mysql_enum_values_are_unquoted() {
        let p = parse_mysql_type("enum('a','b','c')");
        assert_eq!(p.logical_type, LogicalType::Enum);
        assert_eq!(p.enum_values, vec!["a", "b", "c"]);
    }

    #[test]
    fn mysql_decimal_precision_and_scale() {
        let p = parse_mysql_type("decimal(10,2)");
        assert_eq!(p.shape.precision, Some(10));
        assert_eq!(p.shape.scale, Some(2));
    }

    #[test]
    fn postgresql_character_varying_maps_to_varchar() {
        let p = parse_postgresql_type("character varying", Some(255), None, None);
        assert_eq!(p.logical_type, LogicalType::VarChar);
        assert_eq!(p.shape.length, Some(255));
    }

    #[test]
    fn postgresql_jsonb_is_distinct_from_json() {
        assert_eq!(parse_postgresql_type("jsonb", None, None, None).logical_type, LogicalType::JsonB);
        assert_eq!(parse_postgresql_type("json", None, None, None).logical_type, LogicalType::Json);
    }

    #[test]
    fn sqlite_affinity_buckets_varchar_and_int() {
        assert_eq!(parse_sqlite_type("VARCHAR(255)").logical_type, LogicalType::VarChar);
        assert_eq!(parse_sqlite_type("INTEGER").logical_type, LogicalType::BigInt);
        assert_eq!(parse_sqlite_type("BLOB").logical_type, LogicalType::Blob);
    }

    #[test]
    fn sqlite_numeric_catch_all_for_unrecognized_declarations() {
        assert_eq!(parse_sqlite_type("DATETIME").logical_type, LogicalType::Numeric);
        assert_eq!(parse_sqlite_type("DECIMAL(10,2)").logical_type, LogicalType::Numeric);
    }
}
