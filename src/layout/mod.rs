mod bmc;
mod block;
pub mod grid;
mod matrix;
mod swot;
pub(crate) mod text;
pub(crate) mod types;
pub use block::layout_block;
pub use types::*;

use crate::config::{BlockStyle, LayoutConfig};
use crate::ir::{DocumentKind, ParsedDocument, SectionKey};
use crate::theme::Theme;
use std::collections::BTreeMap;

/// Canonical canvas size of a document kind.
pub fn canvas_size(kind: DocumentKind, config: &LayoutConfig) -> (f32, f32) {
    match kind {
        DocumentKind::Swot => (config.swot.width, config.swot.height),
        DocumentKind::BusinessModelCanvas => (config.canvas.width, config.canvas.height),
        DocumentKind::PriorityMatrix => (config.matrix.width, config.matrix.height),
    }
}

/// Regions of every section of `kind`. Depends only on the canvas size and
/// configuration, never on content.
pub fn compute_regions(
    kind: DocumentKind,
    width: f32,
    height: f32,
    config: &LayoutConfig,
) -> BTreeMap<SectionKey, Region> {
    let regions = match kind {
        DocumentKind::Swot => swot::regions(width, height, &config.swot),
        DocumentKind::BusinessModelCanvas => bmc::regions(width, height, &config.canvas),
        DocumentKind::PriorityMatrix => matrix::regions(width, height, &config.matrix),
    };
    regions.into_iter().collect()
}

/// Area the regions of `kind` tile, gutters included.
pub fn content_bounds(
    kind: DocumentKind,
    width: f32,
    height: f32,
    config: &LayoutConfig,
) -> Region {
    match kind {
        DocumentKind::Swot => swot::grid(width, height, &config.swot).bounds(),
        DocumentKind::BusinessModelCanvas => bmc::grid(width, height, &config.canvas).bounds(),
        DocumentKind::PriorityMatrix => matrix::grid(width, height, &config.matrix).bounds(),
    }
}

fn block_style(kind: DocumentKind, config: &LayoutConfig) -> &BlockStyle {
    match kind {
        DocumentKind::Swot => &config.swot.block,
        DocumentKind::BusinessModelCanvas => &config.canvas.block,
        DocumentKind::PriorityMatrix => &config.matrix.block,
    }
}

pub fn compute_layout(
    doc: &ParsedDocument,
    theme: &Theme,
    config: &LayoutConfig,
) -> DocumentLayout {
    let kind = doc.kind();
    let (width, height) = canvas_size(kind, config);
    let regions = compute_regions(kind, width, height, config);
    let style = block_style(kind, config);

    let blocks: Vec<BlockLayout> = regions
        .iter()
        .map(|(key, region)| {
            layout_block(*region, *key, doc.bullets(*key), style, theme, config)
        })
        .collect();

    let (background, underlays, overlays) = match kind {
        DocumentKind::PriorityMatrix => (
            config.matrix.background.clone(),
            matrix::underlays(width, height, &config.matrix, theme),
            matrix::overlays(width, height, &config.matrix),
        ),
        _ => (theme.background.clone(), Vec::new(), Vec::new()),
    };

    tracing::debug!(
        kind = kind.as_str(),
        blocks = blocks.len(),
        clipped = blocks.iter().filter(|b| b.truncated).count(),
        "computed layout"
    );

    DocumentLayout {
        kind,
        width,
        height,
        background,
        underlays,
        blocks,
        overlays,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_swot;

    const KINDS: [DocumentKind; 3] = [
        DocumentKind::Swot,
        DocumentKind::BusinessModelCanvas,
        DocumentKind::PriorityMatrix,
    ];

    fn fast_config() -> LayoutConfig {
        LayoutConfig {
            fast_text_metrics: true,
            ..LayoutConfig::default()
        }
    }

    #[test]
    fn regions_cover_every_section_without_overlap() {
        let config = LayoutConfig::default();
        for kind in KINDS {
            let (w, h) = canvas_size(kind, &config);
            let regions = compute_regions(kind, w, h, &config);
            assert_eq!(
                regions.keys().copied().collect::<Vec<_>>(),
                kind.sections().to_vec()
            );
            let bounds = content_bounds(kind, w, h, &config);
            let all: Vec<&Region> = regions.values().collect();
            for (i, a) in all.iter().enumerate() {
                assert!(bounds.contains(a), "{kind:?} {a:?} outside {bounds:?}");
                for b in &all[i + 1..] {
                    assert!(!a.overlaps(b), "{kind:?}: {a:?} overlaps {b:?}");
                }
            }
        }
    }

    #[test]
    fn gutterless_grids_tile_their_bounds() {
        let config = LayoutConfig::default();
        for kind in [
            DocumentKind::BusinessModelCanvas,
            DocumentKind::PriorityMatrix,
        ] {
            let (w, h) = canvas_size(kind, &config);
            let regions = compute_regions(kind, w, h, &config);
            let total: f32 = regions.values().map(Region::area).sum();
            let bounds = content_bounds(kind, w, h, &config);
            assert!(
                (total - bounds.area()).abs() / bounds.area() < 1e-4,
                "{kind:?}: {total} vs {}",
                bounds.area()
            );
        }
    }

    #[test]
    fn regions_do_not_depend_on_content() {
        let config = fast_config();
        let theme = Theme::classic();
        let empty = compute_layout(&parse_swot(""), &theme, &config);
        let full = compute_layout(
            &parse_swot("1. Forces\n- a\n- b\n2. Faiblesses\n- c\n4. Menaces\n- d"),
            &theme,
            &config,
        );
        let regions = |layout: &DocumentLayout| {
            layout.blocks.iter().map(|b| (b.key, b.region)).collect::<Vec<_>>()
        };
        assert_eq!(regions(&empty), regions(&full));
        assert_eq!((full.width, full.height), (2000.0, 2000.0));
    }

    #[test]
    fn matrix_layout_has_decorations_and_background() {
        let doc = ParsedDocument::empty(DocumentKind::PriorityMatrix);
        let layout = compute_layout(&doc, &Theme::classic(), &fast_config());
        assert_eq!(layout.background, "#f3f3f3");
        assert_eq!(layout.underlays.len(), 5);
        assert_eq!(layout.overlays.len(), 3);
        assert_eq!(layout.blocks.len(), 4);

        let swot = compute_layout(
            &ParsedDocument::empty(DocumentKind::Swot),
            &Theme::classic(),
            &fast_config(),
        );
        assert!(swot.underlays.is_empty() && swot.overlays.is_empty());
        assert_eq!(swot.background, "#FFFFFF");
    }

    #[test]
    fn canvas_layout_is_landscape_with_icons() {
        let doc = ParsedDocument::empty(DocumentKind::BusinessModelCanvas);
        let layout = compute_layout(&doc, &Theme::classic(), &fast_config());
        assert_eq!((layout.width, layout.height), (3000.0, 2000.0));
        assert_eq!(layout.blocks.len(), 9);
        assert!(layout.blocks.iter().all(|b| b.icon.is_some()));
        let costs = layout.block(SectionKey::StructureCouts).unwrap();
        assert_eq!(costs.title.text, "Structure de coûts");
    }
}
