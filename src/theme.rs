use serde::{Deserialize, Serialize};

use crate::ir::Gender;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub small_font_size: f32,
    pub male_fill: String,
    pub female_fill: String,
    pub unknown_fill: String,
    pub box_border: String,
    pub text_color: String,
    pub spouse_line_color: String,
    pub line_color: String,
    pub background: String,
    /// Prefix of the death-date line inside a person box.
    pub death_label: String,
}

impl Theme {
    /// Register-office look: blue/pink boxes, black spouse bars, gray descent lines.
    pub fn classic() -> Self {
        Self {
            font_family: "\"Hiragino Sans\", \"Noto Sans CJK JP\", sans-serif".to_string(),
            font_size: 16.0,
            small_font_size: 12.0,
            male_fill: "#87CEEB".to_string(),
            female_fill: "#FFB6C1".to_string(),
            unknown_fill: "#D3D3D3".to_string(),
            box_border: "#000000".to_string(),
            text_color: "#000000".to_string(),
            spouse_line_color: "#000000".to_string(),
            line_color: "#808080".to_string(),
            background: "#FFFFFF".to_string(),
            death_label: "死亡: ".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            small_font_size: 11.0,
            male_fill: "#E3EEFB".to_string(),
            female_fill: "#FBE7EE".to_string(),
            unknown_fill: "#F1F3F6".to_string(),
            box_border: "#C7D2E5".to_string(),
            text_color: "#1C2430".to_string(),
            spouse_line_color: "#1C2430".to_string(),
            line_color: "#7A8AA6".to_string(),
            background: "#FFFFFF".to_string(),
            death_label: "d. ".to_string(),
        }
    }

    pub fn fill_for(&self, gender: Gender) -> &str {
        match gender {
            Gender::Male => &self.male_fill,
            Gender::Female => &self.female_fill,
            Gender::Unknown => &self.unknown_fill,
        }
    }
}
