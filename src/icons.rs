use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::f32::consts::PI;
use std::path::Path;

use crate::error::RenderError;

pub const ICON_STROKE: &str = "#888888";
pub const ICON_STROKE_WIDTH: f32 = 3.0;

/// Concept tags of the Business Model Canvas blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconKind {
    Partners,
    Activities,
    Resources,
    Value,
    Relations,
    Channels,
    Segments,
    Costs,
    Revenues,
}

impl IconKind {
    pub const ALL: [IconKind; 9] = [
        IconKind::Partners,
        IconKind::Activities,
        IconKind::Resources,
        IconKind::Value,
        IconKind::Relations,
        IconKind::Channels,
        IconKind::Segments,
        IconKind::Costs,
        IconKind::Revenues,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Self::Partners => "partners",
            Self::Activities => "activities",
            Self::Resources => "resources",
            Self::Value => "value",
            Self::Relations => "relations",
            Self::Channels => "channels",
            Self::Segments => "segments",
            Self::Costs => "costs",
            Self::Revenues => "revenues",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    /// Line-art primitives of the glyph centred on `(cx, cy)`.
    pub fn primitives(self, cx: f32, cy: f32) -> Vec<IconPrimitive> {
        match self {
            Self::Partners => vec![IconPrimitive::Polyline {
                points: vec![
                    (cx - 35.0, cy + 10.0),
                    (cx - 10.0, cy - 10.0),
                    (cx + 10.0, cy + 10.0),
                    (cx + 35.0, cy - 10.0),
                ],
                closed: false,
            }],
            Self::Activities => vec![IconPrimitive::Circle { cx, cy, r: 20.0 }],
            Self::Resources => vec![IconPrimitive::Rect {
                x: cx - 20.0,
                y: cy - 15.0,
                width: 40.0,
                height: 30.0,
            }],
            Self::Value => vec![IconPrimitive::Polyline {
                points: vec![
                    (cx, cy - 25.0),
                    (cx + 25.0, cy),
                    (cx, cy + 25.0),
                    (cx - 25.0, cy),
                ],
                closed: true,
            }],
            Self::Relations => vec![IconPrimitive::Rect {
                x: cx - 30.0,
                y: cy - 20.0,
                width: 50.0,
                height: 30.0,
            }],
            Self::Channels => vec![IconPrimitive::Polyline {
                points: vec![
                    (cx - 20.0, cy),
                    (cx + 20.0, cy - 10.0),
                    (cx + 20.0, cy + 10.0),
                ],
                closed: true,
            }],
            Self::Segments => vec![IconPrimitive::Circle {
                cx,
                cy: cy - 10.0,
                r: 12.0,
            }],
            Self::Costs => vec![IconPrimitive::Arc {
                cx,
                cy,
                r: 20.0,
                start: PI * 0.2,
                end: PI * 1.25,
            }],
            Self::Revenues => vec![IconPrimitive::Polyline {
                points: vec![
                    (cx, cy - 20.0),
                    (cx - 20.0, cy + 15.0),
                    (cx + 20.0, cy + 15.0),
                ],
                closed: true,
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum IconPrimitive {
    Polyline {
        points: Vec<(f32, f32)>,
        closed: bool,
    },
    Circle { cx: f32, cy: f32, r: f32 },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    /// Clockwise arc (screen coordinates) between two angles in radians.
    Arc {
        cx: f32,
        cy: f32,
        r: f32,
        start: f32,
        end: f32,
    },
}

impl IconPrimitive {
    pub fn to_svg(&self) -> String {
        match self {
            Self::Polyline { points, closed } => {
                let coords = points
                    .iter()
                    .map(|(x, y)| format!("{x:.2},{y:.2}"))
                    .collect::<Vec<_>>()
                    .join(" ");
                let tag = if *closed { "polygon" } else { "polyline" };
                format!("<{tag} points=\"{coords}\"/>")
            }
            Self::Circle { cx, cy, r } => {
                format!("<circle cx=\"{cx:.2}\" cy=\"{cy:.2}\" r=\"{r:.2}\"/>")
            }
            Self::Rect {
                x,
                y,
                width,
                height,
            } => format!(
                "<rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{width:.2}\" height=\"{height:.2}\"/>"
            ),
            Self::Arc {
                cx,
                cy,
                r,
                start,
                end,
            } => {
                let (x0, y0) = (cx + r * start.cos(), cy + r * start.sin());
                let (x1, y1) = (cx + r * end.cos(), cy + r * end.sin());
                let large = if (end - start).abs() > PI { 1 } else { 0 };
                format!(
                    "<path d=\"M {x0:.2} {y0:.2} A {r:.2} {r:.2} 0 {large} 1 {x1:.2} {y1:.2}\"/>"
                )
            }
        }
    }
}

/// Pre-rendered PNG icon.
#[derive(Debug, Clone)]
pub struct IconBitmap {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Bitmap icons keyed by tag. Tags without a bitmap use the vector glyph.
#[derive(Debug, Clone, Default)]
pub struct IconSet {
    bitmaps: BTreeMap<IconKind, IconBitmap>,
}

impl IconSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads `<tag>.png` for each tag found in `dir`. Missing files are
    /// skipped; unreadable or undecodable files are errors.
    pub fn load_dir(dir: &Path) -> Result<Self, RenderError> {
        let mut bitmaps = BTreeMap::new();
        for kind in IconKind::ALL {
            let path = dir.join(format!("{}.png", kind.tag()));
            if !path.exists() {
                continue;
            }
            let png = std::fs::read(&path).map_err(|source| RenderError::Io {
                path: path.clone(),
                source,
            })?;
            let bitmap = decode_icon(&path, png)?;
            bitmaps.insert(kind, bitmap);
        }
        tracing::info!(dir = %dir.display(), loaded = bitmaps.len(), "loaded canvas icons");
        Ok(Self { bitmaps })
    }

    pub fn get(&self, kind: IconKind) -> Option<&IconBitmap> {
        self.bitmaps.get(&kind)
    }

    pub fn len(&self) -> usize {
        self.bitmaps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bitmaps.is_empty()
    }
}

fn decode_icon(path: &Path, png: Vec<u8>) -> Result<IconBitmap, RenderError> {
    let pixmap =
        resvg::tiny_skia::Pixmap::decode_png(&png).map_err(|err| RenderError::Icon {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
    Ok(IconBitmap {
        width: pixmap.width(),
        height: pixmap.height(),
        png,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nine_tags_round_trip() {
        assert_eq!(IconKind::ALL.len(), 9);
        for kind in IconKind::ALL {
            assert_eq!(IconKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(IconKind::from_tag("unknown"), None);
    }

    #[test]
    fn every_glyph_has_primitives_near_its_centre() {
        for kind in IconKind::ALL {
            let primitives = kind.primitives(100.0, 100.0);
            assert!(!primitives.is_empty(), "{kind:?}");
            for primitive in primitives {
                let svg = primitive.to_svg();
                assert!(svg.starts_with('<') && svg.ends_with("/>"), "{svg}");
            }
        }
    }

    #[test]
    fn cost_arc_takes_the_long_way_round() {
        let svg = IconKind::Costs.primitives(0.0, 0.0)[0].to_svg();
        assert!(svg.contains(" 0 1 1 "), "{svg}");
    }

    #[test]
    fn load_dir_skips_missing_and_rejects_corrupt_files() {
        let dir = tempfile::tempdir().unwrap();
        let empty = IconSet::load_dir(dir.path()).unwrap();
        assert!(empty.is_empty());

        std::fs::write(dir.path().join("value.png"), b"not a png").unwrap();
        let err = IconSet::load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, RenderError::Icon { .. }));
    }

    #[test]
    fn load_dir_reads_valid_bitmaps() {
        let dir = tempfile::tempdir().unwrap();
        let pixmap = resvg::tiny_skia::Pixmap::new(4, 3).unwrap();
        std::fs::write(dir.path().join("costs.png"), pixmap.encode_png().unwrap()).unwrap();
        let set = IconSet::load_dir(dir.path()).unwrap();
        assert_eq!(set.len(), 1);
        let bitmap = set.get(IconKind::Costs).unwrap();
        assert_eq!((bitmap.width, bitmap.height), (4, 3));
        assert!(set.get(IconKind::Value).is_none());
    }
}
