//! Validator library.
//!
//! A [`Validator`] maps a candidate value to an optional error message:
//! `None` means the value passed. A field is valid iff every validator in its
//! effective list passes, and error messages are reported in list order.
//!
//! Declarative validators serialize as tagged data so they can live in
//! JSON/YAML schema files:
//!
//! ```
//! use schema_forms_core::Validator;
//!
//! let parsed: Vec<Validator> =
//!     serde_json::from_str(r#"[{"minLength": 3}, "nonEmpty", {"regex": "^[a-z]+$"}]"#).unwrap();
//! assert_eq!(parsed.len(), 3);
//! assert!(parsed[0].check(&"ab".into()).is_some());
//! assert!(parsed[2].check(&"abc".into()).is_none());
//! ```
//!
//! Closure validators ([`Validator::custom`]) are programmatic only and are
//! skipped by serde.

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Signature of a closure validator.
pub type ValidatorFn = dyn Fn(&Value) -> Option<String> + Send + Sync;

/// A named closure validator.
#[derive(Clone)]
pub struct CustomValidator {
    name: String,
    check: Arc<ValidatorFn>,
}

impl CustomValidator {
    /// Name given at construction, used in debug output.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for CustomValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomValidator")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A compiled regular expression that serializes as its source pattern.
#[derive(Debug, Clone)]
pub struct Pattern(Regex);

impl Pattern {
    /// Compiles `pattern`.
    ///
    /// # Errors
    ///
    /// Returns the [`regex::Error`] if the pattern does not compile.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Self)
    }

    /// The source pattern.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns `true` if the pattern matches anywhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.0.is_match(text)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        Pattern::new(&source).map_err(serde::de::Error::custom)
    }
}

/// A single validation rule.
///
/// # Examples
///
/// ```
/// use schema_forms_core::validators;
///
/// let v = validators::max_length(3);
/// assert_eq!(v.check(&"abcd".into()).as_deref(), Some("Error: must be less than 4 characters"));
/// assert_eq!(v.check(&"abc".into()), None);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Validator {
    /// Length must equal the given value.
    LengthEquals(usize),
    /// Length must be at least the given value.
    MinLength(usize),
    /// Length must be at most the given value.
    MaxLength(usize),
    /// String form must match the pattern (unanchored search).
    Regex(Pattern),
    /// Value must be truthy.
    NonEmpty,
    /// Value must parse as a number.
    Number,
    /// Closure validator; not serializable.
    #[serde(skip)]
    Custom(CustomValidator),
}

impl Validator {
    /// Wraps a closure as a validator.
    ///
    /// # Examples
    ///
    /// ```
    /// use schema_forms_core::Validator;
    ///
    /// let even = Validator::custom("even", |v| {
    ///     (v.as_i64().unwrap_or(1) % 2 != 0).then(|| "Error: must be even".to_string())
    /// });
    /// assert!(even.check(&4.into()).is_none());
    /// assert!(even.check(&3.into()).is_some());
    /// ```
    pub fn custom<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Value) -> Option<String> + Send + Sync + 'static,
    {
        Self::Custom(CustomValidator {
            name: name.into(),
            check: Arc::new(check),
        })
    }

    /// Runs the validator, returning an error message on failure.
    pub fn check(&self, value: &Value) -> Option<String> {
        match self {
            Self::LengthEquals(len) => {
                (value_length(value) != *len).then(|| format!("Error: must be of length {len}"))
            }
            Self::MinLength(min) => (value_length(value) < *min)
                .then(|| format!("Error: must be at least {min} characters")),
            Self::MaxLength(max) => (value_length(value) > *max)
                .then(|| format!("Error: must be less than {} characters", max + 1)),
            Self::Regex(pattern) => {
                (!pattern.is_match(&text_of(value))).then(|| "Error: invalid input".to_string())
            }
            Self::NonEmpty => (!is_truthy(value)).then(|| "Error: field is required".to_string()),
            Self::Number => {
                (!parses_as_number(value)).then(|| "Error: value must be numerical".to_string())
            }
            Self::Custom(custom) => (custom.check)(value),
        }
    }
}

/// Fails unless the value's length is exactly `len`.
pub fn length_equals(len: usize) -> Validator {
    Validator::LengthEquals(len)
}

/// Fails when the value is shorter than `min`.
pub fn min_length(min: usize) -> Validator {
    Validator::MinLength(min)
}

/// Fails when the value is longer than `max`.
pub fn max_length(max: usize) -> Validator {
    Validator::MaxLength(max)
}

/// Fails unless the value's string form matches `pattern`.
///
/// # Errors
///
/// Returns the [`regex::Error`] if the pattern does not compile.
pub fn regex(pattern: &str) -> Result<Validator, regex::Error> {
    Pattern::new(pattern).map(Validator::Regex)
}

/// Fails when the value is falsy.
pub fn non_empty() -> Validator {
    Validator::NonEmpty
}

/// Fails when the value cannot be parsed as a finite number. Blank values pass.
pub fn number() -> Validator {
    Validator::Number
}

/// Permissive falsy check: `""`, `0`, `false` and null are falsy; arrays and
/// objects are always truthy.
///
/// # Examples
///
/// ```
/// use schema_forms_core::validators::is_truthy;
/// use serde_json::json;
///
/// assert!(!is_truthy(&json!("")));
/// assert!(!is_truthy(&json!(0)));
/// assert!(!is_truthy(&json!(false)));
/// assert!(!is_truthy(&json!(null)));
/// assert!(is_truthy(&json!([])));
/// assert!(is_truthy(&json!("0")));
/// ```
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// String form used for pattern matching; falsy values read as `""`.
fn text_of(value: &Value) -> String {
    if !is_truthy(value) {
        return String::new();
    }
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Length used by the length validators; falsy values count as 0.
fn value_length(value: &Value) -> usize {
    if !is_truthy(value) {
        return 0;
    }
    match value {
        Value::String(s) => s.chars().count(),
        Value::Array(items) => items.len(),
        Value::Object(map) => map.len(),
        other => other.to_string().chars().count(),
    }
}

/// Blank strings coerce to zero, so only the required check rejects them.
fn parses_as_number(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(_) | Value::Number(_) => true,
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed.is_empty() || trimmed.parse::<f64>().is_ok_and(f64::is_finite)
        }
        Value::Array(_) | Value::Object(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_length_equals() {
        let v = length_equals(3);
        assert!(v.check(&json!("abc")).is_none());
        assert_eq!(
            v.check(&json!("ab")).as_deref(),
            Some("Error: must be of length 3")
        );
        assert!(v.check(&json!(null)).is_some());
        assert!(length_equals(0).check(&json!(null)).is_none());
    }

    #[test]
    fn test_min_and_max_length_treat_null_as_empty() {
        assert!(min_length(1).check(&json!(null)).is_some());
        assert!(max_length(0).check(&json!(null)).is_none());
        assert!(min_length(2).check(&json!("héllo")).is_none());
        assert!(max_length(4).check(&json!("héllo")).is_some());
    }

    #[test]
    fn test_length_counts_array_items() {
        assert!(min_length(2).check(&json!(["a", "b"])).is_none());
        assert!(max_length(1).check(&json!(["a", "b"])).is_some());
    }

    #[test]
    fn test_regex_is_unanchored() {
        let v = regex("[0-9]+").unwrap();
        assert!(v.check(&json!("abc123")).is_none());
        assert_eq!(v.check(&json!("abc")).as_deref(), Some("Error: invalid input"));
        assert!(v.check(&json!(42)).is_none());
    }

    #[test]
    fn test_regex_rejects_bad_pattern() {
        assert!(regex("(").is_err());
    }

    #[test]
    fn test_non_empty_is_permissive_falsy() {
        let v = non_empty();
        for falsy in [json!(""), json!(0), json!(false), json!(null)] {
            assert!(v.check(&falsy).is_some(), "{falsy} should fail");
        }
        for truthy in [json!("x"), json!(1), json!(true), json!([])] {
            assert!(v.check(&truthy).is_none(), "{truthy} should pass");
        }
    }

    #[test]
    fn test_number() {
        let v = number();
        assert!(v.check(&json!("42")).is_none());
        assert!(v.check(&json!(" -3.5e2 ")).is_none());
        assert!(v.check(&json!("")).is_none());
        assert!(v.check(&json!(7)).is_none());
        assert_eq!(
            v.check(&json!("12px")).as_deref(),
            Some("Error: value must be numerical")
        );
        assert!(v.check(&json!("NaN")).is_some());
        assert!(v.check(&json!({"a": 1})).is_some());
    }

    #[test]
    fn test_number_rejects_infinite_spellings() {
        let v = number();
        for text in ["inf", "-inf", "Infinity", "INFINITY", "1e999"] {
            assert_eq!(
                v.check(&json!(text)).as_deref(),
                Some("Error: value must be numerical"),
                "{text} should be rejected"
            );
        }
    }

    #[test]
    fn test_serde_roundtrip_declarative() {
        let validators = vec![min_length(2), regex("^a").unwrap(), number()];
        let json = serde_json::to_value(&validators).unwrap();
        assert_eq!(json, json!([{"minLength": 2}, {"regex": "^a"}, "number"]));

        let back: Vec<Validator> = serde_json::from_value(json).unwrap();
        assert!(back[1].check(&json!("abc")).is_none());
        assert!(back[1].check(&json!("bc")).is_some());
    }

    #[test]
    fn test_deserialize_rejects_bad_regex() {
        let result: Result<Validator, _> = serde_json::from_str(r#"{"regex": "("}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_custom_debug_shows_name() {
        let v = Validator::custom("always-ok", |_| None);
        assert!(format!("{v:?}").contains("always-ok"));
    }
}
