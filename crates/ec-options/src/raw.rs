//! The string-keyed options map, as written in YAML files.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{OptionError, OptionResult};

/// One option value as written by a user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<String>),
}

impl OptionValue {
    pub(crate) fn parse_as<T>(&self, option: &'static str) -> OptionResult<T>
    where
        T: FromStr<Err = OptionError>,
    {
        match self {
            OptionValue::Str(s) => s.parse(),
            other => Err(wrong_kind(option, other, "a string")),
        }
    }

    pub(crate) fn as_flag(&self, option: &'static str) -> OptionResult<bool> {
        match self {
            OptionValue::Bool(b) => Ok(*b),
            OptionValue::Str(s) if s == "true" => Ok(true),
            OptionValue::Str(s) if s == "false" => Ok(false),
            other => Err(wrong_kind(option, other, "true, false")),
        }
    }

    pub(crate) fn as_int(&self, option: &'static str) -> OptionResult<i64> {
        match self {
            OptionValue::Int(i) => Ok(*i),
            OptionValue::Str(s) => s
                .parse()
                .map_err(|_| wrong_kind(option, self, "an integer")),
            other => Err(wrong_kind(option, other, "an integer")),
        }
    }

    /// A list, a single string, or `false`/an empty list for "none".
    pub(crate) fn as_list(&self, option: &'static str) -> OptionResult<Vec<&str>> {
        match self {
            OptionValue::List(items) => Ok(items.iter().map(String::as_str).collect()),
            OptionValue::Str(s) => Ok(vec![s.as_str()]),
            OptionValue::Bool(false) => Ok(Vec::new()),
            other => Err(wrong_kind(option, other, "a list")),
        }
    }
}

fn wrong_kind(option: &'static str, value: &OptionValue, expected: &str) -> OptionError {
    OptionError::InvalidValue {
        option,
        value: value.to_string(),
        expected: expected.to_string(),
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(b) => write!(f, "{b}"),
            OptionValue::Int(i) => write!(f, "{i}"),
            OptionValue::Str(s) => write!(f, "'{s}'"),
            OptionValue::List(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        OptionValue::Int(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Str(value.to_string())
    }
}

impl From<Vec<String>> for OptionValue {
    fn from(value: Vec<String>) -> Self {
        OptionValue::List(value)
    }
}

/// Options exactly as supplied, before defaults and validation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawOptions(BTreeMap<String, OptionValue>);

impl RawOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<OptionValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn from_yaml_str(content: &str) -> OptionResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }
}
