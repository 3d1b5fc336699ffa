use family_tree_layout::{
    FamilyTree, LayoutConfig, RenderConfig, Theme, UnknownFields, compute_layout, layout_to_json,
    render_svg,
};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FamilyLayoutOptions {
    theme: Option<String>,
    font_family: Option<String>,
    box_width: Option<f32>,
    box_height: Option<f32>,
    horizontal_spacing: Option<f32>,
    vertical_spacing: Option<f32>,
    spouse_spacing: Option<f32>,
    strict: Option<bool>,
}

fn parse_options(options_json: Option<String>) -> Result<FamilyLayoutOptions, JsValue> {
    match options_json {
        Some(raw) => serde_json::from_str(&raw).map_err(|error| JsValue::from_str(&error.to_string())),
        None => Ok(FamilyLayoutOptions::default()),
    }
}

fn build_layout_config(options: &FamilyLayoutOptions) -> LayoutConfig {
    let mut config = LayoutConfig::default();
    if let Some(value) = options.box_width {
        config.box_width = value;
    }
    if let Some(value) = options.box_height {
        config.box_height = value;
    }
    if let Some(value) = options.horizontal_spacing {
        config.horizontal_spacing = value;
    }
    if let Some(value) = options.vertical_spacing {
        config.vertical_spacing = value;
    }
    if let Some(value) = options.spouse_spacing {
        config.spouse_spacing = value;
    }
    config.sanitize();
    config
}

fn build_theme(options: &FamilyLayoutOptions) -> Theme {
    let mut theme = if options.theme.as_deref() == Some("modern") {
        Theme::modern()
    } else {
        Theme::classic()
    };
    if let Some(font_family) = &options.font_family {
        theme.font_family = font_family.clone();
    }
    theme
}

fn parse_tree(document: &str, options: &FamilyLayoutOptions) -> Result<FamilyTree, JsValue> {
    let unknown = if options.strict.unwrap_or(false) {
        UnknownFields::Reject
    } else {
        UnknownFields::Ignore
    };
    FamilyTree::from_json(document, unknown).map_err(|error| JsValue::from_str(&error.to_string()))
}

/// Lays out a family document and returns `{ positions, segments }` as JSON.
#[wasm_bindgen]
pub fn layout_family_tree(document: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = parse_options(options_json)?;
    let tree = parse_tree(document, &options)?;
    let layout = compute_layout(&tree, &build_layout_config(&options))
        .map_err(|error| JsValue::from_str(&error.to_string()))?;
    layout_to_json(&layout).map_err(|error| JsValue::from_str(&error.to_string()))
}

#[wasm_bindgen]
pub fn render_family_tree_svg(document: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = parse_options(options_json)?;
    let tree = parse_tree(document, &options)?;
    let layout = compute_layout(&tree, &build_layout_config(&options))
        .map_err(|error| JsValue::from_str(&error.to_string()))?;
    Ok(render_svg(&layout, &tree, &build_theme(&options), &RenderConfig::default()))
}
