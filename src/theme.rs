use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenderPalette {
    pub fill: String,
    pub border: String,
    pub accent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub text_color: String,
    pub muted_text_color: String,
    pub male: GenderPalette,
    pub female: GenderPalette,
    pub other: GenderPalette,
    pub line_color: String,
    pub spouse_line_color: String,
    pub spouse_marker_fill: String,
    pub highlight_color: String,
    pub highlight_fill: String,
    pub background: String,
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            font_family: "\"trebuchet ms\", verdana, arial, sans-serif".to_string(),
            font_size: 15.0,
            text_color: "#1F2937".to_string(),
            muted_text_color: "#6B7280".to_string(),
            male: GenderPalette {
                fill: "#EEF2FF".to_string(),
                border: "#BFDBFE".to_string(),
                accent: "#6366F1".to_string(),
            },
            female: GenderPalette {
                fill: "#FFF1F2".to_string(),
                border: "#FECDD3".to_string(),
                accent: "#EC4899".to_string(),
            },
            other: GenderPalette {
                fill: "#F5F3FF".to_string(),
                border: "#DDD6FE".to_string(),
                accent: "#8B5CF6".to_string(),
            },
            line_color: "#64748B".to_string(),
            spouse_line_color: "#F472B6".to_string(),
            spouse_marker_fill: "#FCE7F3".to_string(),
            highlight_color: "#F59E0B".to_string(),
            highlight_fill: "#FEF3C7".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            text_color: "#1C2430".to_string(),
            muted_text_color: "#7A8AA6".to_string(),
            male: GenderPalette {
                fill: "#F8FAFF".to_string(),
                border: "#C7D2E5".to_string(),
                accent: "#4F6BED".to_string(),
            },
            female: GenderPalette {
                fill: "#FFF8FA".to_string(),
                border: "#E5C7D2".to_string(),
                accent: "#D9467A".to_string(),
            },
            other: GenderPalette {
                fill: "#FAF8FF".to_string(),
                border: "#D7CFF0".to_string(),
                accent: "#8061D9".to_string(),
            },
            line_color: "#7A8AA6".to_string(),
            spouse_line_color: "#D9467A".to_string(),
            spouse_marker_fill: "#FFFFFF".to_string(),
            highlight_color: "#E39B12".to_string(),
            highlight_fill: "#FFF6E0".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn palette(&self, gender: crate::ir::Gender) -> &GenderPalette {
        match gender {
            crate::ir::Gender::Male => &self.male,
            crate::ir::Gender::Female => &self.female,
            crate::ir::Gender::Other => &self.other,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}
