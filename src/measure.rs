use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::config::TextConfig;
use crate::ir::NodeTree;
use crate::layout::types::non_negative;

/// Rendered dimensions of a node's label and border stroke.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Measurement {
    pub label_width: f32,
    pub label_height: f32,
    pub border_stroke_width: f32,
}

impl Measurement {
    pub const ZERO: Measurement = Measurement {
        label_width: 0.0,
        label_height: 0.0,
        border_stroke_width: 0.0,
    };

    pub fn sanitized(self) -> Measurement {
        Measurement {
            label_width: non_negative(self.label_width),
            label_height: non_negative(self.label_height),
            border_stroke_width: non_negative(self.border_stroke_width),
        }
    }
}

/// Source of rendered pixel dimensions. Elements that are not mounted yet
/// must report zero.
pub trait MeasurementProvider {
    fn measure(&self, node_id: &str, label_id: Option<&str>) -> Measurement;
}

/// Everything unmounted.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullMeasurements;

impl MeasurementProvider for NullMeasurements {
    fn measure(&self, _node_id: &str, _label_id: Option<&str>) -> Measurement {
        Measurement::ZERO
    }
}

/// Measurements captured from a rendered diagram, keyed by label or node id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FixtureMeasurements {
    entries: BTreeMap<String, Measurement>,
}

impl FixtureMeasurements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, measurement: Measurement) {
        self.entries.insert(id.into(), measurement);
    }

    pub fn with(mut self, id: impl Into<String>, measurement: Measurement) -> Self {
        self.insert(id, measurement);
        self
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl MeasurementProvider for FixtureMeasurements {
    fn measure(&self, node_id: &str, label_id: Option<&str>) -> Measurement {
        let node_entry = self.entries.get(node_id);
        let label_entry = label_id
            .and_then(|id| self.entries.get(id))
            .or(node_entry);
        Measurement {
            label_width: label_entry.map(|m| m.label_width).unwrap_or(0.0),
            label_height: label_entry.map(|m| m.label_height).unwrap_or(0.0),
            border_stroke_width: node_entry.map(|m| m.border_stroke_width).unwrap_or(0.0),
        }
    }
}

/// Label sizes estimated from label text when nothing has been rendered.
#[derive(Debug, Clone, Default)]
pub struct EstimatedMeasurements {
    entries: HashMap<String, Measurement>,
}

impl EstimatedMeasurements {
    pub fn from_tree(tree: &NodeTree, config: &TextConfig) -> Self {
        let entries = tree
            .nodes()
            .map(|node| {
                let (label_width, label_height) = match node.label.as_ref() {
                    Some(label) => estimate_text(&label.text, config),
                    None => (0.0, 0.0),
                };
                let measurement = Measurement {
                    label_width,
                    label_height,
                    border_stroke_width: config.border_stroke_width,
                };
                (node.id.clone(), measurement)
            })
            .collect();
        Self { entries }
    }
}

impl MeasurementProvider for EstimatedMeasurements {
    fn measure(&self, node_id: &str, _label_id: Option<&str>) -> Measurement {
        self.entries.get(node_id).copied().unwrap_or(Measurement::ZERO)
    }
}

pub fn estimate_text(text: &str, config: &TextConfig) -> (f32, f32) {
    if text.trim().is_empty() {
        return (0.0, 0.0);
    }
    let lines = split_lines(text);
    let width = lines
        .iter()
        .map(|line| line.chars().map(char_width_factor).sum::<f32>() * config.font_size)
        .fold(0.0, f32::max);
    let height = lines.len() as f32 * config.font_size * config.line_height;
    (width.ceil(), height.ceil())
}

fn split_lines(text: &str) -> Vec<String> {
    text.replace("<br/>", "\n")
        .replace("<br>", "\n")
        .replace("\\n", "\n")
        .split('\n')
        .map(|line| line.trim().to_string())
        .collect()
}

// Widths relative to the font size for a common sans-serif stack.
fn char_width_factor(ch: char) -> f32 {
    match ch {
        ' ' => 0.306,
        '.' | ',' | ':' | ';' | '|' | '!' | '(' | ')' | '[' | ']' | '{' | '}' => 0.321,
        'i' | 'j' | 'l' | 'I' => 0.25,
        'f' | 'r' | 't' => 0.34,
        'm' | 'w' => 0.84,
        'M' | 'W' => 0.93,
        'A'..='Z' => 0.66,
        'a'..='z' => 0.56,
        '0'..='9' => 0.6,
        '@' | '#' | '%' | '&' => 0.946,
        c if !c.is_ascii() && c.len_utf8() >= 3 => 1.0,
        _ => 0.568,
    }
}
