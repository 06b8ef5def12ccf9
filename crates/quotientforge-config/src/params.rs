//! Tagged parameter registry.
//!
//! Planners declare their tunables here with a type tag and a default. Each
//! tag carries its own parse and canonical-format rules, so any parameter can
//! be set from text (a config file, a command line) and read back as text.
//!
//! # Example
//!
//! ```
//! use quotientforge_config::ParamSet;
//!
//! let mut params = ParamSet::new();
//! params.declare("stop_level", 3u64);
//! params.declare("goal_bias", 0.05f64);
//!
//! assert!(params.set_param("stop_level", "1"));
//! assert!(!params.set_param("stop_level", "one"));
//!
//! assert_eq!(params.get::<u64>("stop_level"), Some(1));
//! assert_eq!(params.params()["goal_bias"], "0.05");
//! ```

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;
use tracing::{debug, warn};

/// Failure to set or read a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    #[error("Unknown parameter '{0}'")]
    Unknown(String),

    #[error("Invalid value format specified for parameter '{name}': '{value}' is not a valid {kind}")]
    Parse {
        name: String,
        value: String,
        kind: ParamKind,
    },

    #[error("Parameter '{name}' holds a {expected}, not a {actual}")]
    TypeMismatch {
        name: String,
        expected: ParamKind,
        actual: ParamKind,
    },
}

/// Type tag of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    Bool,
    Int,
    UInt,
    Real,
    Text,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKind::Bool => write!(f, "bool"),
            ParamKind::Int => write!(f, "integer"),
            ParamKind::UInt => write!(f, "unsigned integer"),
            ParamKind::Real => write!(f, "real"),
            ParamKind::Text => write!(f, "text"),
        }
    }
}

/// Current value of a parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Real(f64),
    Text(String),
}

impl ParamValue {
    pub fn kind(&self) -> ParamKind {
        match self {
            ParamValue::Bool(_) => ParamKind::Bool,
            ParamValue::Int(_) => ParamKind::Int,
            ParamValue::UInt(_) => ParamKind::UInt,
            ParamValue::Real(_) => ParamKind::Real,
            ParamValue::Text(_) => ParamKind::Text,
        }
    }

    /// Parses `text` according to `kind`. Returns `None` on malformed input.
    pub fn parse(kind: ParamKind, text: &str) -> Option<ParamValue> {
        let text = text.trim();
        match kind {
            ParamKind::Bool => match text.to_ascii_lowercase().as_str() {
                "true" | "1" => Some(ParamValue::Bool(true)),
                "false" | "0" => Some(ParamValue::Bool(false)),
                _ => None,
            },
            ParamKind::Int => text.parse().ok().map(ParamValue::Int),
            ParamKind::UInt => text.parse().ok().map(ParamValue::UInt),
            ParamKind::Real => text.parse().ok().map(ParamValue::Real),
            ParamKind::Text => Some(ParamValue::Text(text.to_string())),
        }
    }
}

/// Canonical text form; `parse(kind, &value.to_string())` yields the same value.
impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(v) => write!(f, "{v}"),
            ParamValue::Int(v) => write!(f, "{v}"),
            ParamValue::UInt(v) => write!(f, "{v}"),
            ParamValue::Real(v) => write!(f, "{v}"),
            ParamValue::Text(v) => write!(f, "{v}"),
        }
    }
}

/// Rust types that can be stored in a [`ParamSet`].
pub trait ParamValueType: Sized {
    const KIND: ParamKind;

    fn into_value(self) -> ParamValue;

    fn from_value(value: &ParamValue) -> Option<Self>;
}

macro_rules! impl_param_value_type {
    ($ty:ty, $kind:ident, $variant:ident) => {
        impl ParamValueType for $ty {
            const KIND: ParamKind = ParamKind::$kind;

            fn into_value(self) -> ParamValue {
                ParamValue::$variant(self.into())
            }

            fn from_value(value: &ParamValue) -> Option<Self> {
                match value {
                    ParamValue::$variant(v) => Some(v.clone()),
                    _ => None,
                }
            }
        }
    };
}

impl_param_value_type!(bool, Bool, Bool);
impl_param_value_type!(i64, Int, Int);
impl_param_value_type!(u64, UInt, UInt);
impl_param_value_type!(f64, Real, Real);
impl_param_value_type!(String, Text, Text);

impl ParamValueType for usize {
    const KIND: ParamKind = ParamKind::UInt;

    fn into_value(self) -> ParamValue {
        ParamValue::UInt(self as u64)
    }

    fn from_value(value: &ParamValue) -> Option<Self> {
        match value {
            ParamValue::UInt(v) => usize::try_from(*v).ok(),
            _ => None,
        }
    }
}

/// Ordered set of named, typed parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamSet {
    params: BTreeMap<String, ParamValue>,
}

impl ParamSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a parameter with its default value, replacing any previous
    /// declaration under the same name.
    pub fn declare<T: ParamValueType>(&mut self, name: impl Into<String>, default: T) {
        self.params.insert(name.into(), default.into_value());
    }

    /// Sets a parameter from text.
    ///
    /// Returns true if the parameter exists and the value parsed. Failures
    /// are logged and leave the current value untouched.
    pub fn set_param(&mut self, name: &str, value: &str) -> bool {
        match self.try_set_param(name, value) {
            Ok(()) => {
                debug!(
                    event = "param_set",
                    name,
                    value = %self.params[name],
                    "parameter updated"
                );
                true
            }
            Err(err) => {
                warn!(event = "param_rejected", name, value, "{}", err);
                false
            }
        }
    }

    /// Like [`set_param`](Self::set_param) but reports why it failed.
    pub fn try_set_param(&mut self, name: &str, value: &str) -> Result<(), ParamError> {
        let slot = self
            .params
            .get_mut(name)
            .ok_or_else(|| ParamError::Unknown(name.to_string()))?;
        let kind = slot.kind();
        *slot = ParamValue::parse(kind, value).ok_or_else(|| ParamError::Parse {
            name: name.to_string(),
            value: value.to_string(),
            kind,
        })?;
        Ok(())
    }

    /// Sets several parameters. Returns true only if every one was set.
    pub fn set_params<'a>(
        &mut self,
        kv: impl IntoIterator<Item = (&'a String, &'a String)>,
    ) -> bool {
        kv.into_iter()
            .fold(true, |ok, (name, value)| self.set_param(name, value) && ok)
    }

    /// Typed read.
    pub fn get<T: ParamValueType>(&self, name: &str) -> Option<T> {
        self.params.get(name).and_then(T::from_value)
    }

    /// Typed write to an already declared parameter.
    pub fn set<T: ParamValueType>(&mut self, name: &str, value: T) -> Result<(), ParamError> {
        let slot = self
            .params
            .get_mut(name)
            .ok_or_else(|| ParamError::Unknown(name.to_string()))?;
        if slot.kind() != T::KIND {
            return Err(ParamError::TypeMismatch {
                name: name.to_string(),
                expected: slot.kind(),
                actual: T::KIND,
            });
        }
        *slot = value.into_value();
        Ok(())
    }

    /// Current value of one parameter in canonical text form.
    pub fn value(&self, name: &str) -> Option<String> {
        self.params.get(name).map(ToString::to_string)
    }

    pub fn kind(&self, name: &str) -> Option<ParamKind> {
        self.params.get(name).map(ParamValue::kind)
    }

    /// All parameters as name to canonical text.
    pub fn params(&self) -> BTreeMap<String, String> {
        self.params
            .iter()
            .map(|(name, value)| (name.clone(), value.to_string()))
            .collect()
    }

    /// Parameter names in sorted order.
    pub fn param_names(&self) -> Vec<String> {
        self.params.keys().cloned().collect()
    }

    /// Parameter values, in the same order as [`param_names`](Self::param_names).
    pub fn param_values(&self) -> Vec<String> {
        self.params.values().map(ToString::to_string).collect()
    }

    /// Copies every parameter of `other` into this set, prefixing names.
    pub fn include(&mut self, other: &ParamSet, prefix: &str) {
        for (name, value) in &other.params {
            self.params.insert(format!("{prefix}{name}"), value.clone());
        }
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.params.remove(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn clear(&mut self) {
        self.params.clear();
    }
}

impl fmt::Display for ParamSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.params {
            writeln!(f, "{name} = {value}")?;
        }
        Ok(())
    }
}
