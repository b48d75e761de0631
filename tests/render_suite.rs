use std::path::{Path, PathBuf};

use infographic_renderer::canvas_input::canvas_from_value;
use infographic_renderer::config::{BlockStyle, LayoutConfig};
use infographic_renderer::icons::IconSet;
use infographic_renderer::{
    Config, DocumentKind, ParsedDocument, Renderer, SectionKey, compute_layout, parse_document,
    render_svg,
};

fn fixture_path(rel: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(rel)
}

fn read_fixture(rel: &str) -> String {
    let path = fixture_path(rel);
    std::fs::read_to_string(&path).unwrap_or_else(|err| panic!("fixture {rel}: {err}"))
}

fn load_document(rel: &str) -> ParsedDocument {
    let kind = match rel.split('/').next() {
        Some("swot") => DocumentKind::Swot,
        Some("matrix") => DocumentKind::PriorityMatrix,
        Some("bmc") => DocumentKind::BusinessModelCanvas,
        other => panic!("unknown fixture family {other:?}"),
    };
    let input = read_fixture(rel);
    if rel.ends_with(".json") {
        let value: serde_json::Value = serde_json::from_str(&input).expect("fixture json");
        return canvas_from_value(value.get("bmc")).expect("canvas fixture");
    }
    parse_document(&input, kind)
}

fn test_config() -> Config {
    let mut config = Config::default();
    config.layout.fast_text_metrics = true;
    config.render.font_files.clear();
    config
}

fn style_for(kind: DocumentKind, config: &LayoutConfig) -> &BlockStyle {
    match kind {
        DocumentKind::Swot => &config.swot.block,
        DocumentKind::BusinessModelCanvas => &config.canvas.block,
        DocumentKind::PriorityMatrix => &config.matrix.block,
    }
}

const FIXTURES: [&str; 6] = [
    "swot/basic.txt",
    "swot/messy.txt",
    "swot/overflow.txt",
    "matrix/basic.txt",
    "bmc/basic.txt",
    "bmc/canvas.json",
];

#[test]
fn render_all_fixtures() {
    let config = test_config();
    for rel in FIXTURES {
        assert!(fixture_path(rel).exists(), "fixture missing: {rel}");
        let doc = load_document(rel);
        let layout = compute_layout(&doc, &config.theme, &config.layout);
        let svg = render_svg(&layout, &IconSet::empty());
        assert!(svg.contains("<svg"), "{rel}: missing <svg tag");
        assert!(svg.contains("</svg>"), "{rel}: missing </svg tag");
        for key in doc.kind().sections() {
            let title = key.title().replace('\'', "&apos;");
            assert!(svg.contains(&title), "{rel}: missing title {title}");
        }
    }
}

#[test]
fn clipped_text_stays_inside_regions() {
    let config = test_config();
    for rel in FIXTURES {
        let doc = load_document(rel);
        let layout = compute_layout(&doc, &config.theme, &config.layout);
        let style = style_for(doc.kind(), &config.layout);
        for block in &layout.blocks {
            let limit = block.region.bottom() - style.bottom_padding;
            for line in &block.lines {
                assert!(
                    line.y + block.line_height <= limit + 1e-3,
                    "{rel}: {:?} line {:?} crosses the bottom padding",
                    block.key,
                    line.text
                );
                assert!(line.text_x >= block.region.x);
            }
        }
    }
}

#[test]
fn messy_swot_is_segmented() {
    let doc = load_document("swot/messy.txt");
    assert_eq!(
        doc.bullets(SectionKey::Forces),
        ["Réseau de partenaires solides", "Équipe   motivée"]
    );
    assert_eq!(
        doc.bullets(SectionKey::Faiblesses),
        ["Trésorerie tendue", ""]
    );
    assert_eq!(doc.bullets(SectionKey::Opportunites), ["Marché export"]);
    assert_eq!(doc.bullets(SectionKey::Menaces), ["Réglementation"]);
}

#[test]
fn overflowing_block_is_truncated_with_ellipsis() {
    let config = test_config();
    let doc = load_document("swot/overflow.txt");
    assert_eq!(doc.bullets(SectionKey::Forces).len(), 60);
    let layout = compute_layout(&doc, &config.theme, &config.layout);
    let forces = layout.block(SectionKey::Forces).unwrap();
    assert!(forces.truncated);
    assert!(forces.lines.last().unwrap().text.ends_with('…'));
    let weaknesses = layout.block(SectionKey::Faiblesses).unwrap();
    assert!(!weaknesses.truncated);
    assert_eq!(weaknesses.lines.len(), 1);
}

#[test]
fn text_and_json_canvases_share_regions() {
    let config = test_config();
    let text = load_document("bmc/basic.txt");
    let json = load_document("bmc/canvas.json");
    for key in DocumentKind::BusinessModelCanvas.sections() {
        assert!(
            !text.bullets(*key).is_empty(),
            "text canvas missing {key:?}"
        );
        assert!(
            !json.bullets(*key).is_empty(),
            "json canvas missing {key:?}"
        );
    }
    assert_eq!(
        json.bullets(SectionKey::RessourcesCles),
        ["Atelier en centre-ville", "Stock de pièces"]
    );
    assert_eq!(json.bullets(SectionKey::Segments), ["Étudiants", "2026"]);
    assert_eq!(json.bullets(SectionKey::Canaux), ["Site web", "Boutique"]);

    let a = compute_layout(&text, &config.theme, &config.layout);
    let b = compute_layout(&json, &config.theme, &config.layout);
    let regions = |layout: &infographic_renderer::DocumentLayout| {
        layout.blocks.iter().map(|b| b.region).collect::<Vec<_>>()
    };
    assert_eq!(regions(&a), regions(&b));
}

#[test]
fn matrix_fixture_renders_to_png() {
    let renderer = Renderer::new(&test_config());
    let doc = load_document("matrix/basic.txt");
    assert_eq!(doc.bullets(SectionKey::Faire).len(), 2);
    assert_eq!(doc.bullets(SectionKey::Planifier).len(), 2);
    assert_eq!(doc.bullets(SectionKey::Deleguer).len(), 1);
    assert_eq!(doc.bullets(SectionKey::Abandonner).len(), 1);

    let rendered = renderer.render(&doc, &IconSet::empty()).unwrap();
    assert_eq!(&rendered.png[..4], b"\x89PNG");
    let pixmap = resvg::tiny_skia::Pixmap::decode_png(&rendered.png).unwrap();
    assert_eq!((pixmap.width(), pixmap.height()), (2000, 2000));
}
