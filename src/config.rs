use serde::{Deserialize, Serialize};
use std::path::Path;

/// Shape constants and spacing used by the layout handlers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub label_padding: f32,
    pub header_padding: f32,
    pub content_padding: f32,
    pub child_gap: f32,
    pub root_gap: f32,
    pub cuboid_border: f32,
    pub package_header_char_width: f32,
    pub package_header_extra_width: f32,
    pub package_header_max_ratio: f32,
    pub note_corner: f32,
    pub flag_gap: f32,
    pub image_min_height: f32,
    pub border_node_gap: f32,
    pub border_node_offset: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            label_padding: 16.0,
            header_padding: 8.0,
            content_padding: 8.0,
            child_gap: 8.0,
            root_gap: 20.0,
            cuboid_border: 20.0,
            package_header_char_width: 8.0,
            package_header_extra_width: 56.0,
            package_header_max_ratio: 0.45,
            note_corner: 10.0,
            flag_gap: 20.0,
            image_min_height: 10.0,
            border_node_gap: 8.0,
            border_node_offset: 5.0,
        }
    }
}

/// Parameters of the text-based measurement estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextConfig {
    pub font_size: f32,
    pub line_height: f32,
    pub border_stroke_width: f32,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            line_height: 1.25,
            border_stroke_width: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    pub layout: LayoutConfig,
    pub text: TextConfig,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    layout: Option<LayoutConfigFile>,
    text: Option<TextConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    label_padding: Option<f32>,
    header_padding: Option<f32>,
    content_padding: Option<f32>,
    child_gap: Option<f32>,
    root_gap: Option<f32>,
    cuboid_border: Option<f32>,
    package_header_char_width: Option<f32>,
    package_header_extra_width: Option<f32>,
    package_header_max_ratio: Option<f32>,
    note_corner: Option<f32>,
    flag_gap: Option<f32>,
    image_min_height: Option<f32>,
    border_node_gap: Option<f32>,
    border_node_offset: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct TextConfigFile {
    font_size: Option<f32>,
    line_height: Option<f32>,
    border_stroke_width: Option<f32>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = json5::from_str(contents)?;
    let mut config = Config::default();

    if let Some(layout) = parsed.layout {
        let target = &mut config.layout;
        if let Some(v) = layout.label_padding {
            target.label_padding = v;
        }
        if let Some(v) = layout.header_padding {
            target.header_padding = v;
        }
        if let Some(v) = layout.content_padding {
            target.content_padding = v;
        }
        if let Some(v) = layout.child_gap {
            target.child_gap = v;
        }
        if let Some(v) = layout.root_gap {
            target.root_gap = v;
        }
        if let Some(v) = layout.cuboid_border {
            target.cuboid_border = v;
        }
        if let Some(v) = layout.package_header_char_width {
            target.package_header_char_width = v;
        }
        if let Some(v) = layout.package_header_extra_width {
            target.package_header_extra_width = v;
        }
        if let Some(v) = layout.package_header_max_ratio {
            target.package_header_max_ratio = v.clamp(0.0, 1.0);
        }
        if let Some(v) = layout.note_corner {
            target.note_corner = v;
        }
        if let Some(v) = layout.flag_gap {
            target.flag_gap = v;
        }
        if let Some(v) = layout.image_min_height {
            target.image_min_height = v;
        }
        if let Some(v) = layout.border_node_gap {
            target.border_node_gap = v;
        }
        if let Some(v) = layout.border_node_offset {
            target.border_node_offset = v;
        }
    }

    if let Some(text) = parsed.text {
        if let Some(v) = text.font_size {
            config.text.font_size = v;
        }
        if let Some(v) = text.line_height {
            config.text.line_height = v;
        }
        if let Some(v) = text.border_stroke_width {
            config.text.border_stroke_width = v;
        }
    }

    Ok(config)
}
