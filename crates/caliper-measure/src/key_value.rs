//! The `k=v;k=v` format used by line data (`1=3;2=0`) and distributions
//! (`0=1;5=3;10=0`).

use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use thiserror::Error;

pub const PAIR_SEPARATOR: char = ';';
pub const FIELD_SEPARATOR: char = '=';

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyValueError {
    #[error("Missing '=' in key/value pair '{0}'")]
    MissingSeparator(String),

    #[error("Invalid key '{0}'")]
    InvalidKey(String),

    #[error("Invalid value '{0}'")]
    InvalidValue(String),
}

/// Split `data` into raw pairs, keeping their order. Empty input and empty
/// segments (`a=1;;b=2`, trailing `;`) are tolerated.
pub fn parse_pairs(data: &str) -> Result<Vec<(&str, &str)>, KeyValueError> {
    data.split(PAIR_SEPARATOR)
        .filter(|segment| !segment.trim().is_empty())
        .map(|segment| {
            segment
                .split_once(FIELD_SEPARATOR)
                .map(|(k, v)| (k.trim(), v.trim()))
                .ok_or_else(|| KeyValueError::MissingSeparator(segment.to_string()))
        })
        .collect()
}

/// Parse `data` into a sorted map. A repeated key keeps its last value.
pub fn parse<K, V>(data: &str) -> Result<BTreeMap<K, V>, KeyValueError>
where
    K: FromStr + Ord,
    V: FromStr,
{
    let mut map = BTreeMap::new();
    for (k, v) in parse_pairs(data)? {
        let key = k
            .parse::<K>()
            .map_err(|_| KeyValueError::InvalidKey(k.to_string()))?;
        let value = v
            .parse::<V>()
            .map_err(|_| KeyValueError::InvalidValue(v.to_string()))?;
        map.insert(key, value);
    }
    Ok(map)
}

/// Line number to integer payload, the shape of every per-line data metric.
pub fn parse_line_data(data: &str) -> Result<BTreeMap<u32, i64>, KeyValueError> {
    parse(data)
}

/// Format pairs in iteration order.
pub fn format<'a, K, V, I>(pairs: I) -> String
where
    K: Display + 'a,
    V: Display + 'a,
    I: IntoIterator<Item = (&'a K, &'a V)>,
{
    let mut out = String::new();
    for (k, v) in pairs {
        if !out.is_empty() {
            out.push(PAIR_SEPARATOR);
        }
        out.push_str(&k.to_string());
        out.push(FIELD_SEPARATOR);
        out.push_str(&v.to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_line_hits() {
        let map = parse_line_data("1=3;2=0;10=1").unwrap();
        assert_eq!(map.get(&1), Some(&3));
        assert_eq!(map.get(&2), Some(&0));
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn empty_input_is_an_empty_map() {
        assert!(parse_line_data("").unwrap().is_empty());
        assert!(parse_line_data(" ; ").unwrap().is_empty());
    }

    #[test]
    fn trailing_separator_is_tolerated() {
        assert_eq!(parse_line_data("1=1;").unwrap().len(), 1);
    }

    #[test]
    fn missing_equals_is_an_error() {
        assert_eq!(
            parse_line_data("1=1;2").unwrap_err(),
            KeyValueError::MissingSeparator("2".into())
        );
    }

    #[test]
    fn non_numeric_value_is_an_error() {
        assert_eq!(
            parse_line_data("1=x").unwrap_err(),
            KeyValueError::InvalidValue("x".into())
        );
        assert_eq!(
            parse_line_data("y=1").unwrap_err(),
            KeyValueError::InvalidKey("y".into())
        );
    }

    #[test]
    fn pairs_keep_input_order() {
        let pairs = parse_pairs("10=0;1=2").unwrap();
        assert_eq!(pairs, vec![("10", "0"), ("1", "2")]);
    }

    #[test]
    fn format_joins_pairs() {
        let map: BTreeMap<u32, i64> = [(2, 0), (1, 3)].into_iter().collect();
        assert_eq!(format(&map), "1=3;2=0");
        let empty: BTreeMap<u32, i64> = BTreeMap::new();
        assert_eq!(format(&empty), "");
    }

    #[test]
    fn string_keys_are_supported() {
        let map: BTreeMap<String, i64> = parse("rust=10;java=5").unwrap();
        assert_eq!(format(&map), "java=5;rust=10");
    }
}
