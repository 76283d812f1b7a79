//! Configuration schema definitions.
//!
//! The configuration document is a TOML table with a single recognized key,
//! `frame-limit`. Any other keys an operator adds are carried through
//! untouched when the limit is persisted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the configuration file inside the data directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Key backing [`FrameLimit`] in the configuration document.
pub const FRAME_LIMIT_KEY: &str = "frame-limit";

/// Maximum number of hanging display entities allowed per chunk.
///
/// `-1` means unlimited; any value `>= 0` is an inclusive cap on how many
/// qualifying entities a chunk may hold. Values below `-1` cannot be
/// constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameLimit(i32);

impl FrameLimit {
    /// No limit is enforced.
    pub const UNLIMITED: FrameLimit = FrameLimit(-1);

    /// Validate a raw value. Accepts anything in `-1..=i32::MAX`.
    pub fn new(value: i64) -> Result<Self, InvalidLimit> {
        if value < -1 {
            return Err(InvalidLimit::BelowMinimum(value));
        }
        i32::try_from(value)
            .map(Self)
            .map_err(|_| InvalidLimit::OutOfRange(value))
    }

    /// Raw value as stored in the configuration file.
    pub fn get(self) -> i32 {
        self.0
    }

    pub fn is_unlimited(self) -> bool {
        self.0 == -1
    }

    /// Maximum count of qualifying entities, or `None` when unlimited.
    pub fn max_count(self) -> Option<usize> {
        usize::try_from(self.0).ok()
    }
}

impl Default for FrameLimit {
    fn default() -> Self {
        Self::UNLIMITED
    }
}

impl fmt::Display for FrameLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<FrameLimit> for i32 {
    fn from(limit: FrameLimit) -> Self {
        limit.0
    }
}

impl TryFrom<i64> for FrameLimit {
    type Error = InvalidLimit;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl FromStr for FrameLimit {
    type Err = InvalidLimit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i64 = s
            .trim()
            .parse()
            .map_err(|_| InvalidLimit::NotAnInteger(s.to_string()))?;
        Self::new(value)
    }
}

/// A limit value that was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidLimit {
    #[error("limit {0} is below -1")]
    BelowMinimum(i64),

    #[error("limit {0} does not fit in a 32-bit integer")]
    OutOfRange(i64),

    #[error("'{0}' is not an integer")]
    NotAnInteger(String),
}

/// Document written when the configuration file does not exist yet.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DefaultConfig {
    #[serde(rename = "frame-limit")]
    pub frame_limit: i32,
}

impl Default for DefaultConfig {
    fn default() -> Self {
        Self {
            frame_limit: FrameLimit::UNLIMITED.get(),
        }
    }
}

/// Outcome of looking up `frame-limit` in a parsed document.
#[derive(Debug, Clone, PartialEq)]
pub enum LimitField {
    Present(FrameLimit),
    Absent,
    /// The key exists but does not hold a usable limit.
    Malformed(toml::Value),
}

impl LimitField {
    /// Extract the limit from a parsed document.
    pub fn from_table(table: &toml::Table) -> Self {
        match table.get(FRAME_LIMIT_KEY) {
            None => LimitField::Absent,
            Some(toml::Value::Integer(raw)) => match FrameLimit::new(*raw) {
                Ok(limit) => LimitField::Present(limit),
                Err(_) => LimitField::Malformed(toml::Value::Integer(*raw)),
            },
            // `5.0` is accepted; `5.5` is not
            Some(toml::Value::Float(raw)) if raw.fract() == 0.0 => match FrameLimit::new(*raw as i64) {
                Ok(limit) => LimitField::Present(limit),
                Err(_) => LimitField::Malformed(toml::Value::Float(*raw)),
            },
            Some(other) => LimitField::Malformed(other.clone()),
        }
    }

    /// The effective limit: absent or malformed fields fall back to unlimited.
    pub fn limit(&self) -> FrameLimit {
        match self {
            LimitField::Present(limit) => *limit,
            LimitField::Absent | LimitField::Malformed(_) => FrameLimit::UNLIMITED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_bounds() {
        assert_eq!(FrameLimit::new(-1).unwrap(), FrameLimit::UNLIMITED);
        assert_eq!(FrameLimit::new(0).unwrap().get(), 0);
        assert_eq!(FrameLimit::new(-2), Err(InvalidLimit::BelowMinimum(-2)));
        assert_eq!(
            FrameLimit::new(i64::from(i32::MAX) + 1),
            Err(InvalidLimit::OutOfRange(i64::from(i32::MAX) + 1))
        );
    }

    #[test]
    fn test_parse_from_command_argument() {
        assert_eq!("12".parse::<FrameLimit>().unwrap().get(), 12);
        assert!("-1".parse::<FrameLimit>().unwrap().is_unlimited());
        assert!(matches!("abc".parse::<FrameLimit>(), Err(InvalidLimit::NotAnInteger(_))));
        assert!(matches!("-5".parse::<FrameLimit>(), Err(InvalidLimit::BelowMinimum(-5))));
    }

    #[test]
    fn test_max_count() {
        assert_eq!(FrameLimit::UNLIMITED.max_count(), None);
        assert_eq!(FrameLimit::new(0).unwrap().max_count(), Some(0));
        assert_eq!(FrameLimit::new(7).unwrap().max_count(), Some(7));
    }

    #[test]
    fn test_limit_field_extraction() {
        let table: toml::Table = toml::from_str("frame-limit = 4").unwrap();
        assert_eq!(LimitField::from_table(&table).limit().get(), 4);

        let table: toml::Table = toml::from_str("other = true").unwrap();
        assert_eq!(LimitField::from_table(&table), LimitField::Absent);
        assert!(LimitField::Absent.limit().is_unlimited());

        let table: toml::Table = toml::from_str("frame-limit = \"ten\"").unwrap();
        let field = LimitField::from_table(&table);
        assert!(matches!(field, LimitField::Malformed(_)));
        assert!(field.limit().is_unlimited());

        let table: toml::Table = toml::from_str("frame-limit = -3").unwrap();
        assert!(matches!(LimitField::from_table(&table), LimitField::Malformed(_)));
    }

    #[test]
    fn test_whole_float_limit() {
        let table: toml::Table = toml::from_str("frame-limit = 5.0").unwrap();
        assert_eq!(LimitField::from_table(&table), LimitField::Present(FrameLimit::new(5).unwrap()));

        let table: toml::Table = toml::from_str("frame-limit = -1.0").unwrap();
        assert!(LimitField::from_table(&table).limit().is_unlimited());

        for raw in ["5.5", "-2.0", "1e12", "nan", "inf"] {
            let table: toml::Table = toml::from_str(&format!("frame-limit = {raw}")).unwrap();
            assert!(
                matches!(LimitField::from_table(&table), LimitField::Malformed(_)),
                "{raw} should be malformed"
            );
        }
    }

    #[test]
    fn test_default_document() {
        let rendered = toml::to_string(&DefaultConfig::default()).unwrap();
        assert_eq!(rendered.trim(), "frame-limit = -1");
    }
}
