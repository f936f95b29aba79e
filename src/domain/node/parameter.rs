//! Node parameter metadata and per-item parameter resolution

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::host::ExecuteFunctions;

/// Declared type of a node parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterKind {
    String,
    Boolean,
    Number,
}

/// Extra constraints attached to a parameter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<i64>,

    /// Number of decimals; 0 means integer-only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_precision: Option<u32>,

    /// Secret value, masked by the host
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub password: bool,
}

impl TypeOptions {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Declaration of a single node or credential parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeProperty {
    pub name: String,

    pub display_name: String,

    #[serde(rename = "type")]
    pub kind: ParameterKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "TypeOptions::is_empty")]
    pub type_options: TypeOptions,
}

impl NodeProperty {
    fn new(name: &str, display_name: &str, kind: ParameterKind) -> Self {
        Self {
            name: name.to_string(),
            display_name: display_name.to_string(),
            kind,
            default: None,
            required: false,
            description: String::new(),
            type_options: TypeOptions::default(),
        }
    }

    pub fn string(name: &str, display_name: &str) -> Self {
        Self::new(name, display_name, ParameterKind::String)
    }

    pub fn boolean(name: &str, display_name: &str) -> Self {
        Self::new(name, display_name, ParameterKind::Boolean)
    }

    pub fn number(name: &str, display_name: &str) -> Self {
        Self::new(name, display_name, ParameterKind::Number)
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn password(mut self) -> Self {
        self.type_options.password = true;
        self
    }

    /// Integer-only number limited to `bounds`
    pub fn with_bounds(mut self, bounds: IntegerBounds) -> Self {
        self.type_options.min_value = bounds.min;
        self.type_options.max_value = bounds.max;
        self.type_options.number_precision = Some(0);
        self
    }
}

/// Inclusive bounds for integer parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntegerBounds {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl IntegerBounds {
    pub fn at_least(min: i64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub fn between(min: i64, max: i64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn clamp(&self, value: i64) -> i64 {
        let value = self.min.map_or(value, |min| value.max(min));
        self.max.map_or(value, |max| value.min(max))
    }
}

/// Typed access to the parameters of one item.
///
/// The host may hand over `null` or nothing for omitted parameters, so every
/// accessor takes the default it falls back to.
#[derive(Clone, Copy)]
pub struct ItemParameters<'a> {
    host: &'a dyn ExecuteFunctions,
    item_index: usize,
}

impl<'a> ItemParameters<'a> {
    pub fn new(host: &'a dyn ExecuteFunctions, item_index: usize) -> Self {
        Self { host, item_index }
    }

    pub fn item_index(&self) -> usize {
        self.item_index
    }

    fn raw(&self, name: &str) -> Value {
        self.host.get_parameter(name, self.item_index, Value::Null)
    }

    /// String value as given, without trimming
    pub fn string(&self, name: &str, default: &str) -> String {
        match self.raw(name) {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => default.to_string(),
        }
    }

    /// Trimmed string value
    pub fn trimmed(&self, name: &str, default: &str) -> String {
        self.string(name, default).trim().to_string()
    }

    /// Trimmed string value, `None` when blank
    pub fn optional_string(&self, name: &str) -> Option<String> {
        Some(self.trimmed(name, "")).filter(|s| !s.is_empty())
    }

    pub fn boolean(&self, name: &str, default: bool) -> bool {
        match self.raw(name) {
            Value::Bool(b) => b,
            Value::String(s) => match s.trim() {
                "true" => true,
                "false" => false,
                _ => default,
            },
            _ => default,
        }
    }

    /// Integer value, rounded and clamped to `bounds`
    pub fn integer(&self, name: &str, default: i64, bounds: IntegerBounds) -> i64 {
        let value = match self.raw(name) {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f.round() as i64)),
            Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f.round() as i64),
            _ => None,
        };

        bounds.clamp(value.unwrap_or(default))
    }

    /// Destination key, falling back to `default` when omitted or blank
    pub fn destination_key(&self, name: &str, default: &str) -> String {
        self.optional_string(name)
            .unwrap_or_else(|| default.to_string())
    }
}

impl std::fmt::Debug for ItemParameters<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemParameters")
            .field("node", &self.host.node_name())
            .field("item_index", &self.item_index)
            .finish()
    }
}
