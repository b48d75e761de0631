use serde::Serialize;

use crate::icons::IconKind;
use crate::ir::{DocumentKind, SectionKey};

/// Axis-aligned rectangle assigned to one section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Region {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Region {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// True when the interiors intersect; shared edges do not count.
    pub fn overlaps(&self, other: &Region) -> bool {
        const EPS: f32 = 1e-3;
        self.x + EPS < other.right()
            && other.x + EPS < self.right()
            && self.y + EPS < other.bottom()
            && other.y + EPS < self.bottom()
    }

    pub fn contains(&self, other: &Region) -> bool {
        const EPS: f32 = 1e-3;
        other.x + EPS >= self.x
            && other.y + EPS >= self.y
            && other.right() <= self.right() + EPS
            && other.bottom() <= self.bottom() + EPS
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextBaseline {
    /// `y` is the top of the line box.
    Hanging,
    /// `y` is the vertical centre of the line box.
    Central,
}

#[derive(Debug, Clone, Serialize)]
pub struct TextLabel {
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub font_size: f32,
    pub font_family: String,
    pub bold: bool,
    pub color: String,
    pub anchor: TextAnchor,
    pub baseline: TextBaseline,
    /// Rotation in degrees around `(x, y)`.
    pub rotate: Option<f32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BodyLine {
    /// Top of the line box.
    pub y: f32,
    pub text_x: f32,
    pub text: String,
    /// Bullet glyph position; set on a bullet's first line only.
    pub bullet_x: Option<f32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IconPlacement {
    pub kind: IconKind,
    pub cx: f32,
    pub cy: f32,
    pub size: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct BlockLayout {
    pub key: SectionKey,
    pub region: Region,
    pub corner_radius: f32,
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: f32,
    pub title: TextLabel,
    pub icon: Option<IconPlacement>,
    pub font_family: String,
    pub font_size: f32,
    pub line_height: f32,
    pub text_color: String,
    pub lines: Vec<BodyLine>,
    /// Some text did not fit and was dropped.
    pub truncated: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Decoration {
    Label(TextLabel),
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        stroke: String,
        stroke_width: f32,
    },
    Frame {
        region: Region,
        stroke: String,
        stroke_width: f32,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentLayout {
    pub kind: DocumentKind,
    pub width: f32,
    pub height: f32,
    pub background: String,
    /// Drawn before the blocks.
    pub underlays: Vec<Decoration>,
    pub blocks: Vec<BlockLayout>,
    /// Drawn after the blocks.
    pub overlays: Vec<Decoration>,
}

impl DocumentLayout {
    pub fn block(&self, key: SectionKey) -> Option<&BlockLayout> {
        self.blocks.iter().find(|block| block.key == key)
    }
}
