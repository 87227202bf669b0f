// Persisted display configuration (wire format shared with the backend)
use super::element::{
    floor_at_zero, ConditionalImageConfig, ElementType, GraphConfig, StaticImageConfig, TextConfig,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfigDocument {
    pub resolution_width: u32,
    pub resolution_height: u32,
    #[serde(default)]
    pub elements: Vec<WireElement>,
}

/// One serialized element.
///
/// Deserialization never fails on a single bad field: unknown types become
/// `None` and bad coordinates become 0. Inside a config object only the
/// malformed fields fall back to their defaults; a config that is not an
/// object becomes `None`. Turning that into a valid element is the mapper's job.
/// Serialization always writes all four `*_config` keys, unused ones as null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireElement {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_element_type")]
    pub element_type: Option<ElementType>,
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub x: u32,
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub y: u32,
    #[serde(default, deserialize_with = "lenient_config")]
    pub text_config: Option<TextConfig>,
    #[serde(default, deserialize_with = "lenient_config")]
    pub image_config: Option<StaticImageConfig>,
    #[serde(default, deserialize_with = "lenient_config")]
    pub graph_config: Option<GraphConfig>,
    #[serde(default, deserialize_with = "lenient_config")]
    pub conditional_image_config: Option<ConditionalImageConfig>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

fn lenient_element_type<'de, D>(deserializer: D) -> Result<Option<ElementType>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s.parse().ok(),
        _ => None,
    })
}

fn lenient_coordinate<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(coerce_coordinate(&Value::deserialize(deserializer)?))
}

fn lenient_config<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Object(fields) => Ok(salvage_fields(fields)),
        other => {
            tracing::warn!("Ignoring element config that is not an object: {}", other);
            Ok(None)
        }
    }
}

/// Rebuild a config key by key, dropping the fields that do not parse so
/// they take their defaults. Config structs are `#[serde(default)]`, so the
/// empty object always parses.
fn salvage_fields<T: DeserializeOwned>(fields: Map<String, Value>) -> Option<T> {
    if let Ok(config) = serde_json::from_value(Value::Object(fields.clone())) {
        return Some(config);
    }

    let mut kept = Map::new();
    for (key, value) in fields {
        kept.insert(key.clone(), value);
        if let Err(e) = serde_json::from_value::<T>(Value::Object(kept.clone())) {
            tracing::warn!(field = %key, "Ignoring malformed element config field: {}", e);
            kept.remove(&key);
        }
    }

    match serde_json::from_value(Value::Object(kept)) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!("Ignoring malformed element config: {}", e);
            None
        }
    }
}

/// Integer, float or numeric string, truncated and floored at 0; anything else is 0.
pub fn coerce_coordinate(value: &Value) -> u32 {
    let number = match value {
        Value::Number(n) => n.as_i64().map(|i| i as f64).or_else(|| n.as_f64()),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match number {
        Some(n) if n.is_finite() => floor_at_zero(n.trunc() as i64),
        _ => 0,
    }
}
