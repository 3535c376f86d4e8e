use node_layout_rs::{
    FixtureMeasurements, LayoutConfig, LayoutSession, NodeTree, dump_to_string, parse_config,
};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutOptions {
    /// JSON5 config source, same format as the CLI config file.
    config: Option<String>,
    pretty: Option<bool>,
}

fn to_js(error: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn layout_config(options: &LayoutOptions) -> Result<LayoutConfig, String> {
    match options.config.as_deref() {
        Some(source) => parse_config(source)
            .map(|config| config.layout)
            .map_err(|error| format!("{error:#}")),
        None => Ok(LayoutConfig::default()),
    }
}

fn run_layout(
    diagram_id: &str,
    tree_json: &str,
    measurements_json: &str,
    options_json: Option<&str>,
) -> Result<String, String> {
    let options = match options_json {
        Some(raw) => serde_json::from_str::<LayoutOptions>(raw).map_err(|e| e.to_string())?,
        None => LayoutOptions::default(),
    };
    let config = layout_config(&options)?;
    let (tree, reference) = NodeTree::from_json(tree_json).map_err(|e| e.to_string())?;
    let measurements =
        FixtureMeasurements::from_json(measurements_json).map_err(|e| e.to_string())?;
    let layout = LayoutSession::global().relayout(
        diagram_id,
        &tree,
        reference.as_ref(),
        &measurements,
        &config,
    );
    dump_to_string(&layout, &tree, options.pretty.unwrap_or(false)).map_err(|e| e.to_string())
}

/// Lay out one generation of `diagram_id`. The previous generation of the
/// same diagram is remembered between calls.
#[wasm_bindgen]
pub fn layout_diagram(
    diagram_id: &str,
    tree_json: &str,
    measurements_json: &str,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    run_layout(diagram_id, tree_json, measurements_json, options_json.as_deref()).map_err(to_js)
}

#[wasm_bindgen]
pub fn forget_diagram(diagram_id: &str) -> bool {
    LayoutSession::global().forget(diagram_id)
}
