//! Argument values accepted by setters.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Primitive type tag.
///
/// Used on field descriptors as documentation and as a type argument when a
/// caller writes `type: Object`-style values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
    Boolean,
    Integer,
    Number,
    Array,
    Object,
    Any,
}

impl ValueType {
    /// Name of the type as written in documents
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Boolean => "boolean",
            ValueType::Integer => "integer",
            ValueType::Number => "number",
            ValueType::Array => "array",
            ValueType::Object => "object",
            ValueType::Any => "any",
        }
    }
}

/// A single argument handed to a setter.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// Plain value, stored as given
    Literal(Value),
    /// Symbolic name, expanded by hooks or stored as its text
    Symbol(String),
    /// Type argument
    Type(ValueType),
    /// Array-shaped type argument, e.g. "an array of `Company`"
    ArrayOf(Box<Input>),
}

/// Shorthand for [`Input::Symbol`].
pub fn sym(name: impl Into<String>) -> Input {
    Input::Symbol(name.into())
}

impl Input {
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Symbol(name.into())
    }

    pub fn array_of(inner: impl Into<Input>) -> Self {
        Self::ArrayOf(Box::new(inner.into()))
    }

    /// Null literals mean "absent"
    pub fn is_null(&self) -> bool {
        matches!(self, Input::Literal(Value::Null))
    }

    /// Text of a string literal or a symbol
    pub fn text(&self) -> Option<&str> {
        match self {
            Input::Literal(Value::String(s)) | Input::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// Convert into a storable value. Array-shaped type arguments have no
    /// scalar form.
    pub fn into_value(self) -> Option<Value> {
        match self {
            Input::Literal(value) => Some(value),
            Input::Symbol(name) => Some(Value::String(name)),
            Input::Type(ty) => Some(Value::String(ty.as_str().to_string())),
            Input::ArrayOf(_) => None,
        }
    }

    /// Convert into a map key
    pub fn into_key(self) -> Option<String> {
        match self {
            Input::Literal(Value::String(s)) | Input::Symbol(s) => Some(s),
            Input::Literal(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }
}

impl From<Value> for Input {
    fn from(value: Value) -> Self {
        Input::Literal(value)
    }
}

impl From<ValueType> for Input {
    fn from(ty: ValueType) -> Self {
        Input::Type(ty)
    }
}

impl From<&str> for Input {
    fn from(s: &str) -> Self {
        Input::Literal(Value::String(s.to_string()))
    }
}

impl From<String> for Input {
    fn from(s: String) -> Self {
        Input::Literal(Value::String(s))
    }
}

macro_rules! literal_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Input {
                fn from(v: $ty) -> Self {
                    Input::Literal(Value::from(v))
                }
            }
        )*
    };
}

literal_from!(bool, i32, i64, u16, u32, u64, f64);

/// Ordered named arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bundle {
    entries: Vec<(String, Input)>,
}

impl Bundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Input>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace a named argument, keeping the original position on
    /// replacement
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Input>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Insert only when the caller did not supply the name
    pub fn insert_default(&mut self, name: impl Into<String>, value: impl Into<Input>) {
        let name = name.into();
        if !self.contains(&name) {
            self.entries.push((name, value.into()));
        }
    }

    pub fn get(&self, name: &str) -> Option<&Input> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Input> {
        let index = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(index).1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Input)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Merge `defaults` underneath this bundle: default names come first, and
    /// any name the caller supplied wins.
    pub fn merge_under(&mut self, defaults: &Bundle) {
        let mut merged = defaults.clone();
        for (name, value) in std::mem::take(&mut self.entries) {
            merged.insert(name, value);
        }
        *self = merged;
    }

    /// Build a bundle from a decoded object, keeping its key order
    pub fn from_object(map: Map<String, Value>) -> Self {
        map.into_iter()
            .map(|(k, v)| (k, Input::Literal(v)))
            .collect()
    }

    /// Collapse into an object literal
    pub fn into_value(self) -> Option<Value> {
        let mut map = Map::new();
        for (name, input) in self.entries {
            map.insert(name, input.into_value()?);
        }
        Some(Value::Object(map))
    }
}

impl IntoIterator for Bundle {
    type Item = (String, Input);
    type IntoIter = std::vec::IntoIter<(String, Input)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>> FromIterator<(K, Input)> for Bundle {
    fn from_iter<I: IntoIterator<Item = (K, Input)>>(iter: I) -> Self {
        let mut bundle = Bundle::new();
        for (name, value) in iter {
            bundle.insert(name, value);
        }
        bundle
    }
}

/// Build a [`Bundle`] from `name => value` pairs.
///
/// ```
/// use oas_spec::{bundle, sym};
///
/// let named = bundle! { "title" => "Pets", "ref" => sym("Pet") };
/// assert_eq!(named.len(), 2);
/// ```
#[macro_export]
macro_rules! bundle {
    () => {
        $crate::Bundle::new()
    };
    ($($name:expr => $value:expr),+ $(,)?) => {
        $crate::Bundle::new()$(.with($name, $value))+
    };
}
