use crate::ir::ParsedDocument;
use crate::layout::{Decoration, DocumentLayout};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub kind: String,
    pub width: f32,
    pub height: f32,
    pub background: String,
    pub blocks: Vec<BlockDump>,
    pub labels: Vec<LabelDump>,
    pub lines: usize,
}

#[derive(Debug, Serialize)]
pub struct BlockDump {
    pub key: String,
    pub title: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub icon: Option<String>,
    pub bullets: usize,
    pub body_lines: Vec<String>,
    pub bottom: Option<f32>,
    pub truncated: bool,
}

#[derive(Debug, Serialize)]
pub struct LabelDump {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub rotate: Option<f32>,
}

impl LayoutDump {
    pub fn from_layout(layout: &DocumentLayout, doc: &ParsedDocument) -> Self {
        let blocks = layout
            .blocks
            .iter()
            .map(|block| BlockDump {
                key: block.key.as_str().to_string(),
                title: block.title.text.clone(),
                x: block.region.x,
                y: block.region.y,
                width: block.region.width,
                height: block.region.height,
                icon: block.icon.as_ref().map(|icon| icon.kind.tag().to_string()),
                bullets: doc.bullets(block.key).len(),
                body_lines: block.lines.iter().map(|line| line.text.clone()).collect(),
                bottom: block.lines.last().map(|line| line.y + block.line_height),
                truncated: block.truncated,
            })
            .collect();

        let mut labels = Vec::new();
        let mut lines = 0;
        for decoration in layout.underlays.iter().chain(&layout.overlays) {
            match decoration {
                Decoration::Label(label) => labels.push(LabelDump {
                    text: label.text.clone(),
                    x: label.x,
                    y: label.y,
                    rotate: label.rotate,
                }),
                Decoration::Line { .. } | Decoration::Frame { .. } => lines += 1,
            }
        }

        LayoutDump {
            kind: layout.kind.as_str().to_string(),
            width: layout.width,
            height: layout.height,
            background: layout.background.clone(),
            blocks,
            labels,
            lines,
        }
    }
}

pub fn write_layout_dump(
    path: &Path,
    layout: &DocumentLayout,
    doc: &ParsedDocument,
) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout, doc);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::layout::compute_layout;
    use crate::parser::parse_matrix;
    use crate::theme::Theme;

    #[test]
    fn dump_reports_blocks_and_labels() {
        let config = LayoutConfig {
            fast_text_metrics: true,
            ..LayoutConfig::default()
        };
        let doc = parse_matrix("1. Faire\n- Rappeler Paul\n- Envoyer le devis");
        let layout = compute_layout(&doc, &Theme::classic(), &config);
        let dump = LayoutDump::from_layout(&layout, &doc);
        assert_eq!(dump.kind, "matrix");
        assert_eq!(dump.blocks.len(), 4);
        assert_eq!(dump.blocks[0].key, "faire");
        assert_eq!(dump.blocks[0].bullets, 2);
        assert_eq!(
            dump.blocks[0].body_lines,
            vec!["Rappeler Paul", "Envoyer le devis"]
        );
        assert_eq!(dump.labels.len(), 5);
        assert_eq!(dump.lines, 3);
    }

    #[test]
    fn dump_is_written_as_json() {
        let config = LayoutConfig {
            fast_text_metrics: true,
            ..LayoutConfig::default()
        };
        let doc = parse_matrix("");
        let layout = compute_layout(&doc, &Theme::classic(), &config);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.json");
        write_layout_dump(&path, &layout, &doc).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["width"], 2000.0);
        assert_eq!(value["blocks"].as_array().unwrap().len(), 4);
    }
}
