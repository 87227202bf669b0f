// Preview renderer - Approximate on-canvas previews of element configs
use crate::application::collaborators::AssetResolver;
use crate::domain::color::Rgba;
use crate::domain::element::{
    Alignment, ConditionalImageConfig, ElementConfig, GraphConfig, GraphKind, StaticImageConfig,
    TextConfig,
};
use serde::Serialize;

/// Sample values substituted into text formats
const SAMPLE_VALUES: [(&str, &str); 5] = [
    ("{value-avg}", "41.2"),
    ("{value-min}", "38.1"),
    ("{value-max}", "45.3"),
    ("{value}", "42.5"),
    ("{unit}", "°C"),
];

const MAX_GRAPH_SAMPLES: u32 = 20;
const PIXELS_PER_GRAPH_SAMPLE: u32 = 4;

const GLYPH_ADVANCE: f64 = 0.6;
const LINE_HEIGHT: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum VisualDescription {
    Text {
        lines: Vec<String>,
        font_family: String,
        font_size: u32,
        color: Rgba,
        alignment: Alignment,
        width: u32,
        height: u32,
        clipped: bool,
    },
    Image {
        source: String,
        width: u32,
        height: u32,
    },
    Placeholder {
        label: String,
        width: u32,
        height: u32,
    },
    Graph {
        width: u32,
        height: u32,
        line: Vec<Point>,
        fill: Option<Vec<Point>>,
        stroke: Rgba,
        stroke_width: u32,
        background: Rgba,
        border: Rgba,
    },
}

pub fn render(config: &ElementConfig, resolver: &dyn AssetResolver) -> VisualDescription {
    match config {
        ElementConfig::Text(c) => render_text(c),
        ElementConfig::StaticImage(c) => render_static_image(c, resolver),
        ElementConfig::Graph(c) => render_graph(c),
        ElementConfig::ConditionalImage(c) => render_conditional_image(c),
    }
}

pub fn substitute_sample_values(format: &str) -> String {
    // Longer tokens first so `{value}` does not eat `{value-avg}`
    SAMPLE_VALUES
        .iter()
        .fold(format.to_string(), |text, (token, sample)| text.replace(token, sample))
}

fn render_text(config: &TextConfig) -> VisualDescription {
    let content = substitute_sample_values(&config.format);
    let font_size = config.font_size.max(1) as f64;

    let max_chars = (config.width as f64 / (font_size * GLYPH_ADVANCE)).floor() as usize;
    let max_lines = (config.height as f64 / (font_size * LINE_HEIGHT)).floor() as usize;

    let mut clipped = false;
    let mut lines = Vec::new();
    for (index, line) in content.lines().enumerate() {
        if index >= max_lines {
            clipped = true;
            break;
        }
        if line.chars().count() > max_chars {
            clipped = true;
            lines.push(line.chars().take(max_chars).collect());
        } else {
            lines.push(line.to_string());
        }
    }

    VisualDescription::Text {
        lines,
        font_family: config.font_family.clone(),
        font_size: config.font_size,
        color: config.font_color,
        alignment: config.alignment,
        width: config.width,
        height: config.height,
        clipped,
    }
}

fn render_static_image(config: &StaticImageConfig, resolver: &dyn AssetResolver) -> VisualDescription {
    let placeholder = |label: &str| VisualDescription::Placeholder {
        label: label.to_string(),
        width: config.width,
        height: config.height,
    };

    if config.image_path.trim().is_empty() {
        return placeholder("No image selected");
    }

    match resolver.resolve(&config.image_path) {
        Ok(source) => VisualDescription::Image {
            source,
            width: config.width,
            height: config.height,
        },
        Err(e) => {
            tracing::debug!("Preview image {} not resolved: {}", config.image_path, e);
            placeholder("Image not found")
        }
    }
}

fn render_conditional_image(config: &ConditionalImageConfig) -> VisualDescription {
    let label = if config.images_path.trim().is_empty() {
        "No directory selected".to_string()
    } else {
        format!("Conditional images: {}", config.images_path)
    };

    VisualDescription::Placeholder {
        label,
        width: config.width,
        height: config.height,
    }
}

/// Deterministic stand-in for sensor history: a sine wave with bounded jitter.
pub fn sample_series(count: usize) -> Vec<f64> {
    (0..count)
        .map(|i| {
            let base = 50.0 + 25.0 * (i as f64 * 0.6).sin();
            let jitter = ((i * 37) % 17) as f64 / 16.0 - 0.5;
            base + jitter * 10.0
        })
        .collect()
}

fn render_graph(config: &GraphConfig) -> VisualDescription {
    let count = (config.width / PIXELS_PER_GRAPH_SAMPLE).min(MAX_GRAPH_SAMPLES) as usize;
    let samples = sample_series(count);
    let line = scale_series(&samples, config);

    let fill = match config.graph_type {
        GraphKind::LineFill if !line.is_empty() => {
            let mut polygon = line.clone();
            polygon.push(Point { x: config.width as f64, y: config.height as f64 });
            polygon.push(Point { x: 0.0, y: config.height as f64 });
            Some(polygon)
        }
        _ => None,
    };

    VisualDescription::Graph {
        width: config.width,
        height: config.height,
        line,
        fill,
        stroke: config.color,
        stroke_width: config.stroke_width,
        background: config.background_color,
        border: config.border_color,
    }
}

/// Map samples into the graph box. Uses the configured range when it is
/// usable, otherwise the samples' own range.
fn scale_series(samples: &[f64], config: &GraphConfig) -> Vec<Point> {
    if samples.len() < 2 {
        return Vec::new();
    }

    let (mut low, mut high) = match (config.min_value, config.max_value) {
        (Some(min), Some(max)) if max > min => (min, max),
        _ => samples
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v))),
    };
    if high <= low {
        low -= 1.0;
        high += 1.0;
    }

    let width = config.width as f64;
    let height = config.height as f64;
    let step = width / (samples.len() - 1) as f64;

    samples
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let ratio = ((v - low) / (high - low)).clamp(0.0, 1.0);
            Point {
                x: i as f64 * step,
                y: height - ratio * height,
            }
        })
        .collect()
}
