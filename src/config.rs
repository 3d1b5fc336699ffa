use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SolverKind {
    /// Recursive subtree-width solver.
    #[default]
    Tree,
    /// Layered layout from the dagre backend, de-overlapped afterwards.
    Dagre,
}

impl SolverKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Tree => "tree",
            Self::Dagre => "dagre",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPass {
    /// Run only when the active solver asks for it.
    #[default]
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DropAnchor {
    /// Drop from the midpoint between a parent and its first spouse.
    #[default]
    Couple,
    Parent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DagreLayoutConfig {
    pub margin_x: f32,
    pub margin_y: f32,
}

impl Default for DagreLayoutConfig {
    fn default() -> Self {
        Self {
            margin_x: 8.0,
            margin_y: 8.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub box_width: f32,
    pub box_height: f32,
    pub horizontal_spacing: f32,
    pub vertical_spacing: f32,
    pub spouse_spacing: f32,
    pub solver: SolverKind,
    pub fallback_solver: Option<SolverKind>,
    pub overlap_pass: OverlapPass,
    pub drop_anchor: DropAnchor,
    pub expand_spouses: bool,
    pub sort_children_by_birth: bool,
    /// Widen each bus to reach the drop anchor when it lies outside the
    /// children's span.
    pub bus_spans_anchor: bool,
    pub dagre: DagreLayoutConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            box_width: 160.0,
            box_height: 70.0,
            horizontal_spacing: 50.0,
            vertical_spacing: 80.0,
            spouse_spacing: 20.0,
            solver: SolverKind::Tree,
            fallback_solver: None,
            overlap_pass: OverlapPass::Auto,
            drop_anchor: DropAnchor::Couple,
            expand_spouses: false,
            sort_children_by_birth: false,
            bus_spans_anchor: false,
            dagre: DagreLayoutConfig::default(),
        }
    }
}

impl LayoutConfig {
    /// Distance between the centers of two consecutive generations.
    pub fn level_height(&self) -> f32 {
        self.box_height + self.vertical_spacing
    }

    /// Smallest center-to-center distance between same-level boxes.
    pub fn min_center_gap(&self) -> f32 {
        self.box_width + self.horizontal_spacing
    }

    pub fn level_y(&self, level: usize) -> f32 {
        level as f32 * self.level_height()
    }

    /// Clamps box sizes to at least 1 and spacings to at least 0.
    pub fn sanitize(&mut self) {
        self.box_width = self.box_width.max(1.0);
        self.box_height = self.box_height.max(1.0);
        self.horizontal_spacing = self.horizontal_spacing.max(0.0);
        self.vertical_spacing = self.vertical_spacing.max(0.0);
        self.spouse_spacing = self.spouse_spacing.max(0.0);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub padding: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            padding: 40.0,
            background: "#FFFFFF".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::classic();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            layout: LayoutConfig::default(),
            render,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    small_font_size: Option<f32>,
    male_fill: Option<String>,
    female_fill: Option<String>,
    unknown_fill: Option<String>,
    box_border: Option<String>,
    text_color: Option<String>,
    spouse_line_color: Option<String>,
    line_color: Option<String>,
    background: Option<String>,
    death_label: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DagreConfigFile {
    margin_x: Option<f32>,
    margin_y: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    box_width: Option<f32>,
    box_height: Option<f32>,
    horizontal_spacing: Option<f32>,
    vertical_spacing: Option<f32>,
    spouse_spacing: Option<f32>,
    solver: Option<SolverKind>,
    fallback_solver: Option<SolverKind>,
    overlap_pass: Option<OverlapPass>,
    drop_anchor: Option<DropAnchor>,
    expand_spouses: Option<bool>,
    sort_children_by_birth: Option<bool>,
    bus_spans_anchor: Option<bool>,
    dagre: Option<DagreConfigFile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<f32>,
    height: Option<f32>,
    padding: Option<f32>,
    background: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
    render: Option<RenderConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Overlay a JSON5 config document onto the defaults.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = json5::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        match theme_name {
            "modern" => config.theme = Theme::modern(),
            "classic" | "default" => config.theme = Theme::classic(),
            other => tracing::warn!(theme = other, "unknown theme name, keeping default"),
        }
        config.render.background = config.theme.background.clone();
    }

    if let Some(vars) = parsed.theme_variables {
        let theme = &mut config.theme;
        if let Some(v) = vars.font_family {
            theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            theme.font_size = v;
        }
        if let Some(v) = vars.small_font_size {
            theme.small_font_size = v;
        }
        if let Some(v) = vars.male_fill {
            theme.male_fill = v;
        }
        if let Some(v) = vars.female_fill {
            theme.female_fill = v;
        }
        if let Some(v) = vars.unknown_fill {
            theme.unknown_fill = v;
        }
        if let Some(v) = vars.box_border {
            theme.box_border = v;
        }
        if let Some(v) = vars.text_color {
            theme.text_color = v;
        }
        if let Some(v) = vars.spouse_line_color {
            theme.spouse_line_color = v;
        }
        if let Some(v) = vars.line_color {
            theme.line_color = v;
        }
        if let Some(v) = vars.death_label {
            theme.death_label = v;
        }
        if let Some(v) = vars.background {
            theme.background = v.clone();
            config.render.background = v;
        }
    }

    if let Some(layout) = parsed.layout {
        let target = &mut config.layout;
        if let Some(v) = layout.box_width {
            target.box_width = v;
        }
        if let Some(v) = layout.box_height {
            target.box_height = v;
        }
        if let Some(v) = layout.horizontal_spacing {
            target.horizontal_spacing = v;
        }
        if let Some(v) = layout.vertical_spacing {
            target.vertical_spacing = v;
        }
        if let Some(v) = layout.spouse_spacing {
            target.spouse_spacing = v;
        }
        if let Some(v) = layout.solver {
            target.solver = v;
        }
        if layout.fallback_solver.is_some() {
            target.fallback_solver = layout.fallback_solver;
        }
        if let Some(v) = layout.overlap_pass {
            target.overlap_pass = v;
        }
        if let Some(v) = layout.drop_anchor {
            target.drop_anchor = v;
        }
        if let Some(v) = layout.expand_spouses {
            target.expand_spouses = v;
        }
        if let Some(v) = layout.sort_children_by_birth {
            target.sort_children_by_birth = v;
        }
        if let Some(v) = layout.bus_spans_anchor {
            target.bus_spans_anchor = v;
        }
        if let Some(dagre) = layout.dagre {
            if let Some(v) = dagre.margin_x {
                target.dagre.margin_x = v;
            }
            if let Some(v) = dagre.margin_y {
                target.dagre.margin_y = v;
            }
        }
        target.sanitize();
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v;
        }
        if let Some(v) = render.height {
            config.render.height = v;
        }
        if let Some(v) = render.padding {
            config.render.padding = v.max(0.0);
        }
        if let Some(v) = render.background {
            config.render.background = v;
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_keeps_defaults() {
        let config = parse_config("{}").unwrap();
        assert_eq!(config.layout.box_width, 160.0);
        assert_eq!(config.layout.spouse_spacing, 20.0);
        assert_eq!(config.layout.solver, SolverKind::Tree);
        assert_eq!(config.layout.level_height(), 150.0);
    }

    #[test]
    fn overlays_layout_and_theme() {
        let config = parse_config(
            r##"{
                // JSON5 comments are accepted
                theme: "modern",
                themeVariables: { maleFill: "#0000FF", deathLabel: "Died " },
                layout: {
                    boxWidth: 120,
                    solver: "dagre",
                    fallbackSolver: "tree",
                    overlapPass: "always",
                    dropAnchor: "parent",
                    expandSpouses: true,
                    busSpansAnchor: true,
                },
            }"##,
        )
        .unwrap();
        assert_eq!(config.theme.font_size, Theme::modern().font_size);
        assert_eq!(config.theme.male_fill, "#0000FF");
        assert_eq!(config.theme.death_label, "Died ");
        assert_eq!(config.layout.box_width, 120.0);
        assert_eq!(config.layout.solver, SolverKind::Dagre);
        assert_eq!(config.layout.fallback_solver, Some(SolverKind::Tree));
        assert_eq!(config.layout.overlap_pass, OverlapPass::Always);
        assert_eq!(config.layout.drop_anchor, DropAnchor::Parent);
        assert!(config.layout.expand_spouses);
        assert!(config.layout.bus_spans_anchor);
    }

    #[test]
    fn clamps_degenerate_sizes() {
        let config =
            parse_config(r#"{"layout": {"boxWidth": -4, "horizontalSpacing": -10}}"#).unwrap();
        assert_eq!(config.layout.box_width, 1.0);
        assert_eq!(config.layout.horizontal_spacing, 0.0);
    }

    #[test]
    fn rejects_unknown_solver() {
        assert!(parse_config(r#"{"layout": {"solver": "graphviz"}}"#).is_err());
    }
}
