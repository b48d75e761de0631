use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    /// Font stack for SWOT and matrix blocks.
    pub font_family: String,
    /// Font stack for Business Model Canvas blocks.
    pub canvas_font_family: String,
    pub text_color: String,
    pub background: String,
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            font_family: "Arial, Helvetica, sans-serif".to_string(),
            canvas_font_family: "\"Brush Script MT\", cursive".to_string(),
            text_color: "#000000".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }

    /// Same as [`Theme::classic`] but the canvas uses the sans-serif stack.
    pub fn plain() -> Self {
        let classic = Self::classic();
        Self {
            canvas_font_family: classic.font_family.clone(),
            ..classic
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "classic" | "default" => Some(Self::classic()),
            "plain" => Some(Self::plain()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}
