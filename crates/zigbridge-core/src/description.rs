//! Declarative device descriptions.
//!
//! A [`DeviceDescription`] is the adapter's entire knowledge of a
//! device: which properties it exposes, which actions it accepts and
//! which events it can emit. Descriptions come from a static catalog
//! keyed by model identifier, or from capability inference over the raw
//! topology record when the catalog has no entry. Both producers are
//! external collaborators; this module only defines the shape.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;
use crate::transform::Transform;

/// JSON type a property value must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Boolean,
    Integer,
    Number,
    #[default]
    String,
    Object,
}

impl PropertyType {
    fn name(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::String => "string",
            Self::Object => "object",
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Semantic metadata for one device property.
///
/// The optional [`Transform`] converts between host and bus value
/// representations; it defaults to identity and is not serialized.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PropertyDescriptor {
    /// Human-readable label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Semantic capability tag (e.g. "OnOffProperty").
    #[serde(rename = "@type", default, skip_serializing_if = "Option::is_none")]
    pub at_type: Option<String>,
    /// Declared value type.
    #[serde(rename = "type", default)]
    pub property_type: PropertyType,
    /// Unit of measurement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Minimum value (numeric types).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    /// Maximum value (numeric types).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    /// Fixed set of allowed values, empty when unconstrained.
    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<Value>,
    /// Whether host-side writes are rejected.
    #[serde(default)]
    pub read_only: bool,
    /// Initial value the property adapter is seeded with.
    #[serde(default)]
    pub value: Value,
    /// Host/bus value converter, identity unless declared.
    #[serde(skip)]
    pub transform: Transform,
}

impl PropertyDescriptor {
    /// Create a descriptor of the given value type.
    pub fn new(property_type: PropertyType) -> Self {
        Self {
            property_type,
            ..Default::default()
        }
    }

    /// Set the human-readable label.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the semantic capability tag.
    pub fn with_at_type(mut self, at_type: impl Into<String>) -> Self {
        self.at_type = Some(at_type.into());
        self
    }

    /// Set the unit of measurement.
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Set the numeric range.
    pub fn with_range(mut self, minimum: f64, maximum: f64) -> Self {
        self.minimum = Some(minimum);
        self.maximum = Some(maximum);
        self
    }

    /// Restrict values to a fixed set of options.
    pub fn with_enum(mut self, options: Vec<Value>) -> Self {
        self.enum_values = options;
        self
    }

    /// Mark the property read-only.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Set the initial value.
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = value;
        self
    }

    /// Attach a host/bus value transform.
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// The host property base's accept step.
    ///
    /// Validates a host-initiated set request against the declared
    /// type, range and enum constraints. Returns the accepted value on
    /// success; the adapter publishes to the bus only after this
    /// succeeds.
    pub fn accept(&self, value: Value) -> Result<Value, ValidationError> {
        if self.read_only {
            return Err(ValidationError::ReadOnly);
        }

        let matches = match self.property_type {
            PropertyType::Boolean => value.is_boolean(),
            PropertyType::Integer => value.is_i64() || value.is_u64(),
            PropertyType::Number => value.is_number(),
            PropertyType::String => value.is_string(),
            PropertyType::Object => value.is_object(),
        };
        if !matches {
            return Err(ValidationError::TypeMismatch {
                expected: self.property_type.name(),
                actual: json_type_name(&value),
            });
        }

        if let Some(n) = value.as_f64() {
            if let Some(minimum) = self.minimum {
                if n < minimum {
                    return Err(ValidationError::BelowMinimum { value: n, minimum });
                }
            }
            if let Some(maximum) = self.maximum {
                if n > maximum {
                    return Err(ValidationError::AboveMaximum { value: n, maximum });
                }
            }
        }

        if !self.enum_values.is_empty() && !self.enum_values.contains(&value) {
            return Err(ValidationError::NotInEnum(value));
        }

        Ok(value)
    }
}

/// Static shape metadata for a declared action.
///
/// Actions carry no persisted state; invocation is fire-and-forget
/// dispatch of the input payload to the device's command topic.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ActionDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Input schema, pass-through metadata for the host framework.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,
}

impl ActionDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Static shape metadata for a declared event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDescriptor {
    /// Payload field the event value is read from when the bus reports
    /// the matching `action`.
    pub payload_field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl EventDescriptor {
    /// Create an event sourced from the given payload field.
    pub fn new(payload_field: impl Into<String>) -> Self {
        Self {
            payload_field: payload_field.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Full declarative description of one device.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DeviceDescription {
    /// Human-readable device name.
    pub name: String,
    /// Semantic device categories (e.g. "Light", "OnOffSwitch").
    #[serde(rename = "@type", default, skip_serializing_if = "Vec::is_empty")]
    pub at_type: Vec<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub actions: HashMap<String, ActionDescriptor>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub properties: HashMap<String, PropertyDescriptor>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub events: HashMap<String, EventDescriptor>,
}

impl DeviceDescription {
    /// Create an empty description with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a semantic device category.
    pub fn with_at_type(mut self, at_type: impl Into<String>) -> Self {
        self.at_type.push(at_type.into());
        self
    }

    /// Add a property.
    pub fn with_property(
        mut self,
        name: impl Into<String>,
        descriptor: PropertyDescriptor,
    ) -> Self {
        self.properties.insert(name.into(), descriptor);
        self
    }

    /// Add an action.
    pub fn with_action(mut self, name: impl Into<String>, descriptor: ActionDescriptor) -> Self {
        self.actions.insert(name.into(), descriptor);
        self
    }

    /// Add an event.
    pub fn with_event(mut self, name: impl Into<String>, descriptor: EventDescriptor) -> Self {
        self.events.insert(name.into(), descriptor);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accept_type_mismatch() {
        let desc = PropertyDescriptor::new(PropertyType::Boolean);
        let err = desc.accept(json!("ON")).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::TypeMismatch {
                expected: "boolean",
                actual: "string"
            }
        ));
    }

    #[test]
    fn test_accept_range() {
        let desc = PropertyDescriptor::new(PropertyType::Integer).with_range(0.0, 100.0);
        assert_eq!(desc.accept(json!(50)).unwrap(), json!(50));
        assert!(matches!(
            desc.accept(json!(-1)),
            Err(ValidationError::BelowMinimum { .. })
        ));
        assert!(matches!(
            desc.accept(json!(101)),
            Err(ValidationError::AboveMaximum { .. })
        ));
    }

    #[test]
    fn test_accept_enum() {
        let desc = PropertyDescriptor::new(PropertyType::String)
            .with_enum(vec![json!("low"), json!("high")]);
        assert_eq!(desc.accept(json!("low")).unwrap(), json!("low"));
        assert!(matches!(
            desc.accept(json!("medium")),
            Err(ValidationError::NotInEnum(_))
        ));
    }

    #[test]
    fn test_accept_read_only() {
        let desc = PropertyDescriptor::new(PropertyType::Number).read_only();
        assert!(matches!(
            desc.accept(json!(1.0)),
            Err(ValidationError::ReadOnly)
        ));
    }

    #[test]
    fn test_integer_rejects_float() {
        let desc = PropertyDescriptor::new(PropertyType::Integer);
        assert!(matches!(
            desc.accept(json!(1.5)),
            Err(ValidationError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_action_and_event_builders() {
        let action = ActionDescriptor::new()
            .with_title("Identify")
            .with_description("Blink the device to locate it");
        assert_eq!(action.title.as_deref(), Some("Identify"));
        assert_eq!(
            action.description.as_deref(),
            Some("Blink the device to locate it")
        );

        let event = EventDescriptor::new("strength").with_description("Vibration detected");
        assert_eq!(event.payload_field, "strength");
        assert_eq!(event.description.as_deref(), Some("Vibration detected"));
    }

    #[test]
    fn test_description_deserialization() {
        let raw = r#"{
            "name": "Temperature sensor",
            "@type": ["TemperatureSensor"],
            "properties": {
                "temperature": {
                    "type": "number",
                    "unit": "degree celsius",
                    "read_only": true
                }
            },
            "events": {
                "vibration": { "payload_field": "strength" }
            }
        }"#;

        let desc: DeviceDescription = serde_json::from_str(raw).unwrap();
        assert_eq!(desc.name, "Temperature sensor");
        let prop = &desc.properties["temperature"];
        assert_eq!(prop.property_type, PropertyType::Number);
        assert!(prop.read_only);
        assert!(prop.transform.is_identity());
        assert_eq!(desc.events["vibration"].payload_field, "strength");
    }
}
