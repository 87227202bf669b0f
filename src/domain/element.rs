// Display element domain models
use super::color::Rgba;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementType {
    Text,
    StaticImage,
    Graph,
    ConditionalImage,
}

impl ElementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Text => "text",
            ElementType::StaticImage => "static-image",
            ElementType::Graph => "graph",
            ElementType::ConditionalImage => "conditional-image",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(ElementType::Text),
            "static-image" => Ok(ElementType::StaticImage),
            "graph" => Ok(ElementType::Graph),
            "conditional-image" => Ok(ElementType::ConditionalImage),
            other => Err(format!("unknown element type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GraphKind {
    #[default]
    Line,
    LineFill,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    pub format: String,
    #[serde(alias = "fontFamily")]
    pub font_family: String,
    #[serde(alias = "fontSize")]
    pub font_size: u32,
    #[serde(alias = "fontColor")]
    pub font_color: Rgba,
    pub width: u32,
    pub height: u32,
    #[serde(alias = "textAlign")]
    pub alignment: Alignment,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            format: "{value}".to_string(),
            font_family: "Arial".to_string(),
            font_size: 12,
            font_color: Rgba::WHITE,
            width: 100,
            height: 20,
            alignment: Alignment::Left,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticImageConfig {
    #[serde(alias = "imagePath")]
    pub image_path: String,
    pub width: u32,
    pub height: u32,
}

impl Default for StaticImageConfig {
    fn default() -> Self {
        Self {
            image_path: String::new(),
            width: 100,
            height: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    #[serde(alias = "sensorId")]
    pub sensor_id: String,
    #[serde(alias = "minValue", deserialize_with = "lenient_number")]
    pub min_value: Option<f64>,
    #[serde(alias = "maxValue", deserialize_with = "lenient_number")]
    pub max_value: Option<f64>,
    pub width: u32,
    pub height: u32,
    #[serde(alias = "type")]
    pub graph_type: GraphKind,
    pub color: Rgba,
    #[serde(alias = "strokeWidth")]
    pub stroke_width: u32,
    #[serde(alias = "backgroundColor")]
    pub background_color: Rgba,
    #[serde(alias = "borderColor")]
    pub border_color: Rgba,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            sensor_id: String::new(),
            min_value: None,
            max_value: None,
            width: 200,
            height: 50,
            graph_type: GraphKind::Line,
            color: Rgba::BLACK,
            stroke_width: 1,
            background_color: Rgba::TRANSPARENT,
            border_color: Rgba::TRANSPARENT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConditionalImageConfig {
    #[serde(alias = "sensorId")]
    pub sensor_id: String,
    #[serde(alias = "imagesPath")]
    pub images_path: String,
    #[serde(alias = "minValue", deserialize_with = "lenient_number")]
    pub min_value: Option<f64>,
    #[serde(alias = "maxValue", deserialize_with = "lenient_number")]
    pub max_value: Option<f64>,
    pub width: u32,
    pub height: u32,
}

impl Default for ConditionalImageConfig {
    fn default() -> Self {
        Self {
            sensor_id: String::new(),
            images_path: String::new(),
            min_value: None,
            max_value: None,
            width: 100,
            height: 100,
        }
    }
}

/// Accepts a number, a numeric string, an empty string or null.
pub(crate) fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => Ok(Some(n)),
        Some(NumberOrString::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(NumberOrString::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("not a number: '{}'", s))),
    }
}

/// Typed configuration payload. The variant is the element's type.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementConfig {
    Text(TextConfig),
    StaticImage(StaticImageConfig),
    Graph(GraphConfig),
    ConditionalImage(ConditionalImageConfig),
}

impl ElementConfig {
    pub fn default_for(element_type: ElementType) -> Self {
        match element_type {
            ElementType::Text => ElementConfig::Text(TextConfig::default()),
            ElementType::StaticImage => ElementConfig::StaticImage(StaticImageConfig::default()),
            ElementType::Graph => ElementConfig::Graph(GraphConfig::default()),
            ElementType::ConditionalImage => {
                ElementConfig::ConditionalImage(ConditionalImageConfig::default())
            }
        }
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            ElementConfig::Text(_) => ElementType::Text,
            ElementConfig::StaticImage(_) => ElementType::StaticImage,
            ElementConfig::Graph(_) => ElementType::Graph,
            ElementConfig::ConditionalImage(_) => ElementType::ConditionalImage,
        }
    }

    /// Box occupied by the element on the canvas
    pub fn size(&self) -> (u32, u32) {
        match self {
            ElementConfig::Text(c) => (c.width, c.height),
            ElementConfig::StaticImage(c) => (c.width, c.height),
            ElementConfig::Graph(c) => (c.width, c.height),
            ElementConfig::ConditionalImage(c) => (c.width, c.height),
        }
    }

    /// Raise zero dimensions, font sizes and stroke widths to 1.
    pub fn normalized(mut self) -> Self {
        fn positive(v: &mut u32) {
            *v = (*v).max(1);
        }

        match &mut self {
            ElementConfig::Text(c) => {
                positive(&mut c.width);
                positive(&mut c.height);
                positive(&mut c.font_size);
            }
            ElementConfig::StaticImage(c) => {
                positive(&mut c.width);
                positive(&mut c.height);
            }
            ElementConfig::Graph(c) => {
                positive(&mut c.width);
                positive(&mut c.height);
                positive(&mut c.stroke_width);
            }
            ElementConfig::ConditionalImage(c) => {
                positive(&mut c.width);
                positive(&mut c.height);
            }
        }
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: u32,
    pub y: u32,
}

impl Position {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Offset by a signed delta, flooring each axis at 0.
    pub fn offset(&self, dx: i64, dy: i64) -> Self {
        Self {
            x: floor_at_zero((self.x as i64).saturating_add(dx)),
            y: floor_at_zero((self.y as i64).saturating_add(dy)),
        }
    }
}

pub(crate) fn floor_at_zero(v: i64) -> u32 {
    v.clamp(0, u32::MAX as i64) as u32
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

static LAST_ISSUED_ID: AtomicI64 = AtomicI64::new(0);

impl ElementId {
    /// Millisecond timestamp, bumped past the last issued id so ids stay
    /// strictly increasing within the process.
    pub fn generate() -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        let mut issued = now;
        let _ = LAST_ISSUED_ID.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            issued = now.max(last + 1);
            Some(issued)
        });
        ElementId(issued.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ElementId {
    fn from(value: String) -> Self {
        ElementId(value)
    }
}

impl From<&str> for ElementId {
    fn from(value: &str) -> Self {
        ElementId(value.to_string())
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayElement {
    pub id: ElementId,
    pub name: String,
    pub position: Position,
    pub config: ElementConfig,
}

impl DisplayElement {
    /// New element with a fresh id and the default name.
    pub fn new(config: ElementConfig, position: Position) -> Self {
        let id = ElementId::generate();
        let name = Self::default_name(&id);
        Self {
            id,
            name,
            position,
            config,
        }
    }

    pub fn default_name(id: &ElementId) -> String {
        format!("Element {}", id)
    }

    pub fn element_type(&self) -> ElementType {
        self.config.element_type()
    }

    pub fn size(&self) -> (u32, u32) {
        self.config.size()
    }
}
