//! Run configuration forwarded to PHOENIX as command-line flags.
//!
//! A `RunConfig` is an insertion-ordered mapping from flag name (without the
//! leading `--`) to a scalar or a list of values. Order is preserved because
//! PHOENIX parses some flags positionally relative to each other.

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// Value of a single configuration key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FlagValue {
    /// Appended verbatim as one token.
    Scalar(String),
    /// Each element becomes its own token after a single flag.
    List(Vec<String>),
}

impl FlagValue {
    /// Tokens to place after the flag.
    pub fn tokens(&self) -> Vec<&str> {
        match self {
            Self::Scalar(value) => vec![value.as_str()],
            Self::List(values) => values.iter().map(String::as_str).collect(),
        }
    }

    /// Convert a JSON value, stringifying numbers and booleans.
    ///
    /// Returns `None` for objects and nulls, which have no flag representation.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        use serde_json::Value;
        match value {
            Value::Array(items) => items
                .iter()
                .map(json_scalar)
                .collect::<Option<Vec<_>>>()
                .map(Self::List),
            other => json_scalar(other).map(Self::Scalar),
        }
    }
}

fn json_scalar(value: &serde_json::Value) -> Option<String> {
    use serde_json::Value;
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tokens().join(" "))
    }
}

impl From<&str> for FlagValue {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<String> for FlagValue {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

macro_rules! scalar_from_display {
    ($($ty:ty),*) => {
        $(impl From<$ty> for FlagValue {
            fn from(value: $ty) -> Self {
                Self::Scalar(value.to_string())
            }
        })*
    };
}

scalar_from_display!(i32, i64, u32, u64, usize, f32, f64, bool);

impl<T: ToString> From<Vec<T>> for FlagValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.iter().map(ToString::to_string).collect())
    }
}

/// Errors raised while building a `RunConfig` from external input.
#[derive(Debug, thiserror::Error)]
pub enum RunConfigError {
    #[error("run configuration must be a JSON object")]
    NotAnObject,

    #[error("key '{0}' has a value that cannot be passed as a flag")]
    UnsupportedValue(String),

    #[error("invalid assignment '{0}', expected key=value")]
    InvalidAssignment(String),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Ordered configuration mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RunConfig {
    entries: IndexMap<String, FlagValue>,
}

impl RunConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a key. Replacing keeps the original position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<FlagValue>) -> &mut Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Builder-style variant of [`RunConfig::set`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FlagValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&FlagValue> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FlagValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a JSON object, keeping key order as written.
    pub fn from_json_str(input: &str) -> Result<Self, RunConfigError> {
        // Deserialize into an IndexMap directly; serde_json's own map sorts keys.
        let map: IndexMap<String, serde_json::Value> = match serde_json::from_str(input) {
            Ok(map) => map,
            Err(err) => {
                return Err(if serde_json::from_str::<serde_json::Value>(input).is_ok() {
                    RunConfigError::NotAnObject
                } else {
                    RunConfigError::Json(err)
                });
            }
        };

        let mut config = Self::new();
        for (key, value) in &map {
            let flag = FlagValue::from_json(value)
                .ok_or_else(|| RunConfigError::UnsupportedValue(key.clone()))?;
            config.set(key.clone(), flag);
        }
        Ok(config)
    }

    /// Apply a `key=value` assignment. Whitespace inside the value splits it
    /// into a list, mirroring how the flags end up on the command line.
    pub fn apply_assignment(&mut self, assignment: &str) -> Result<(), RunConfigError> {
        let (key, value) = assignment
            .split_once('=')
            .filter(|(k, _)| !k.trim().is_empty())
            .ok_or_else(|| RunConfigError::InvalidAssignment(assignment.to_string()))?;

        let tokens: Vec<&str> = value.split_whitespace().collect();
        let flag = if tokens.len() > 1 {
            FlagValue::from(tokens)
        } else {
            FlagValue::Scalar(value.trim().to_string())
        };
        self.set(key.trim().trim_start_matches('-'), flag);
        Ok(())
    }
}

impl<K: Into<String>, V: Into<FlagValue>> FromIterator<(K, V)> for RunConfig {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut config = Self::new();
        for (key, value) in iter {
            config.set(key, value);
        }
        config
    }
}
