use crate::error::LoadError;
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Fixed geometry of the family-tree layout. All values share one unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub node_width: f32,
    pub node_height: f32,
    pub generation_spacing: f32,
    pub spouse_gap: f32,
    pub sibling_gap: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 220.0,
            node_height: 100.0,
            generation_spacing: 220.0,
            spouse_gap: 60.0,
            sibling_gap: 400.0,
        }
    }
}

impl LayoutConfig {
    /// Horizontal footprint of a family unit with `members` people (1 or 2).
    pub fn family_width(&self, members: usize) -> f32 {
        if members >= 2 {
            self.node_width * 2.0 + self.spouse_gap
        } else {
            self.node_width
        }
    }

    /// Centre-to-centre distance between spouses.
    pub fn spouse_offset(&self) -> f32 {
        self.node_width + self.spouse_gap
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub padding: f32,
    pub background: String,
    pub highlight: Option<String>,
    pub show_lifespan: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            padding: 40.0,
            background: "#FFFFFF".to_string(),
            highlight: None,
            show_lifespan: true,
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

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    text_color: Option<String>,
    muted_text_color: Option<String>,
    line_color: Option<String>,
    spouse_line_color: Option<String>,
    spouse_marker_fill: Option<String>,
    highlight_color: Option<String>,
    highlight_fill: Option<String>,
    background: Option<String>,
    male_fill: Option<String>,
    male_border: Option<String>,
    female_fill: Option<String>,
    female_border: Option<String>,
    other_fill: Option<String>,
    other_border: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    node_width: Option<f32>,
    node_height: Option<f32>,
    generation_spacing: Option<f32>,
    spouse_gap: Option<f32>,
    sibling_gap: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    padding: Option<f32>,
    background: Option<String>,
    highlight: Option<String>,
    show_lifespan: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
    render: Option<RenderConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> Result<Config, LoadError> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&contents).map_err(|err| match err {
        LoadError::Config { message, .. } => LoadError::Config {
            origin: path.display().to_string(),
            message,
        },
        other => other,
    })
}

/// Applies a JSON5 config document over the defaults.
pub fn parse_config(contents: &str) -> Result<Config, LoadError> {
    let parsed: ConfigFile = json5::from_str(contents).map_err(|err| LoadError::Config {
        origin: "inline".to_string(),
        message: err.to_string(),
    })?;
    let mut config = Config::default();

    if let Some(theme_name) = parsed.theme.as_deref() {
        match theme_name {
            "modern" => config.theme = Theme::modern(),
            "classic" | "default" => config.theme = Theme::classic(),
            other => log::warn!(theme = other; "Unknown theme preset, keeping default"),
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
        if let Some(v) = vars.text_color {
            theme.text_color = v;
        }
        if let Some(v) = vars.muted_text_color {
            theme.muted_text_color = v;
        }
        if let Some(v) = vars.line_color {
            theme.line_color = v;
        }
        if let Some(v) = vars.spouse_line_color {
            theme.spouse_line_color = v;
        }
        if let Some(v) = vars.spouse_marker_fill {
            theme.spouse_marker_fill = v;
        }
        if let Some(v) = vars.highlight_color {
            theme.highlight_color = v;
        }
        if let Some(v) = vars.highlight_fill {
            theme.highlight_fill = v;
        }
        if let Some(v) = vars.background {
            theme.background = v.clone();
            config.render.background = v;
        }
        if let Some(v) = vars.male_fill {
            theme.male.fill = v;
        }
        if let Some(v) = vars.male_border {
            theme.male.border = v;
        }
        if let Some(v) = vars.female_fill {
            theme.female.fill = v;
        }
        if let Some(v) = vars.female_border {
            theme.female.border = v;
        }
        if let Some(v) = vars.other_fill {
            theme.other.fill = v;
        }
        if let Some(v) = vars.other_border {
            theme.other.border = v;
        }
    }

    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.node_width {
            config.layout.node_width = v.max(1.0);
        }
        if let Some(v) = layout.node_height {
            config.layout.node_height = v.max(1.0);
        }
        if let Some(v) = layout.generation_spacing {
            config.layout.generation_spacing = v.max(0.0);
        }
        if let Some(v) = layout.spouse_gap {
            config.layout.spouse_gap = v.max(0.0);
        }
        if let Some(v) = layout.sibling_gap {
            config.layout.sibling_gap = v.max(0.0);
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.padding {
            config.render.padding = v.max(0.0);
        }
        if let Some(v) = render.background {
            config.render.background = v;
        }
        if render.highlight.is_some() {
            config.render.highlight = render.highlight;
        }
        if let Some(v) = render.show_lifespan {
            config.render.show_lifespan = v;
        }
    }

    Ok(config)
}
