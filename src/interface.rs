use std::{borrow::Cow, collections::BTreeMap};

/// A single argument value.
///
/// Values are only ever used as text: substitution writes their natural
/// textual form into the template, so `true`, `42`, `1.5` and `"name"` become
/// `true`, `42`, `1.5` and `name`.
///
/// Floats use the shortest form that round-trips, switching to exponent form
/// (`1e+21`, `1e-07`) when the exponent is below -4 or at least 21. Infinities
/// render as `+Inf`/`-Inf` and NaN as `NaN`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(Cow<'a, str>),
    Null,
}

impl std::fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{}", value),
            Self::Int(value) => write!(f, "{}", value),
            Self::UInt(value) => write!(f, "{}", value),
            Self::Float(value) => write_float(f, *value),
            Self::Str(value) => write!(f, "{}", value),
            Self::Null => write!(f, "null"),
        }
    }
}

fn write_float(f: &mut std::fmt::Formatter<'_>, value: f64) -> std::fmt::Result {
    if value.is_nan() {
        return write!(f, "NaN");
    }
    if value.is_infinite() {
        return write!(f, "{}", if value > 0.0 { "+Inf" } else { "-Inf" });
    }

    // `{:e}` gives the shortest round-trip mantissa, e.g. "1.5e21" or "1e-7".
    let scientific = format!("{:e}", value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return write!(f, "{}", value);
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return write!(f, "{}", value);
    };

    if value != 0.0 && !(-4..21).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        write!(f, "{}e{}{:02}", mantissa, sign, exponent.unsigned_abs())
    } else {
        write!(f, "{}", value)
    }
}

impl From<bool> for Value<'_> {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

macro_rules! impl_from_int {
    ($variant:ident => $target:ty: $($source:ty),*) => {
        $(
            impl From<$source> for Value<'_> {
                fn from(value: $source) -> Self {
                    Self::$variant(<$target>::from(value))
                }
            }
        )*
    };
}

impl_from_int!(Int => i64: i8, i16, i32, i64);
impl_from_int!(UInt => u64: u8, u16, u32, u64);

impl From<f32> for Value<'_> {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<f64> for Value<'_> {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(value: &'a str) -> Self {
        Self::Str(Cow::Borrowed(value))
    }
}

impl From<String> for Value<'_> {
    fn from(value: String) -> Self {
        Self::Str(Cow::Owned(value))
    }
}

impl<'a> From<Cow<'a, str>> for Value<'a> {
    fn from(value: Cow<'a, str>) -> Self {
        Self::Str(value)
    }
}

impl<'a, T: Into<Value<'a>>> From<Option<T>> for Value<'a> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// The named arguments a template is applied with.
///
/// Names are stored as given; a template refers to the argument `Name` by
/// writing `.Name`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Args<'a> {
    data: BTreeMap<String, Value<'a>>,
}

impl Args<'_> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<'a> Args<'a> {
    pub fn insert<N: AsRef<str>, V: Into<Value<'a>>>(&mut self, name: N, value: V) -> &mut Self {
        self.data.insert(name.as_ref().to_string(), value.into());
        self
    }

    pub fn get<N: AsRef<str>>(&self, name: N) -> Option<&Value<'a>> {
        self.data.get(name.as_ref())
    }

    pub fn contains<N: AsRef<str>>(&self, name: N) -> bool {
        self.data.contains_key(name.as_ref())
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value<'a>)> {
        self.data.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl<'a, N: AsRef<str>, V: Into<Value<'a>>> FromIterator<(N, V)> for Args<'a> {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut args = Self::new();
        for (name, value) in iter {
            args.insert(name, value);
        }
        args
    }
}

#[cfg(feature = "serde")]
impl Args<'static> {
    /// Builds arguments from the fields of a serializable record.
    ///
    /// This is the explicit struct-to-mapping step: every top level field
    /// becomes an argument. Nested arrays and objects are kept as their
    /// compact JSON text.
    ///
    /// # Errors
    /// - `SqlateError::UnsupportedArgsType` if `args` does not serialize to a
    ///   map or struct.
    ///
    /// # Example
    ///
    /// ```
    /// use sqlate::Args;
    ///
    /// #[derive(serde::Serialize)]
    /// struct Filters {
    ///     #[serde(rename = "IncludeReviews")]
    ///     include_reviews: bool,
    /// }
    ///
    /// let args = Args::from_serialize(&Filters { include_reviews: true }).unwrap();
    /// assert_eq!(args.get("IncludeReviews"), Some(&true.into()));
    /// ```
    pub fn from_serialize<T: serde::Serialize + ?Sized>(
        args: &T,
    ) -> crate::SqlateResult<Self> {
        use serde_json::Value as Json;

        let value =
            serde_json::to_value(args).map_err(|e| crate::SqlateError::UnsupportedArgsType {
                found: e.to_string(),
            })?;

        let fields = match value {
            Json::Object(fields) => fields,
            Json::Null => return Err(unsupported("null")),
            Json::Bool(_) => return Err(unsupported("bool")),
            Json::Number(_) => return Err(unsupported("number")),
            Json::String(_) => return Err(unsupported("string")),
            Json::Array(_) => return Err(unsupported("sequence")),
        };

        Ok(fields
            .into_iter()
            .map(|(name, field)| {
                let value = match field {
                    Json::Null => Value::Null,
                    Json::Bool(b) => Value::Bool(b),
                    Json::Number(n) => n
                        .as_i64()
                        .map(Value::Int)
                        .or_else(|| n.as_u64().map(Value::UInt))
                        .or_else(|| n.as_f64().map(Value::Float))
                        .unwrap_or(Value::Null),
                    Json::String(s) => Value::Str(Cow::Owned(s)),
                    nested @ (Json::Array(_) | Json::Object(_)) => {
                        Value::Str(Cow::Owned(nested.to_string()))
                    }
                };
                (name, value)
            })
            .collect())
    }
}

#[cfg(feature = "serde")]
fn unsupported(found: &str) -> crate::SqlateError {
    crate::SqlateError::UnsupportedArgsType {
        found: found.to_string(),
    }
}
