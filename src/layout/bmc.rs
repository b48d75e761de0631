use crate::config::CanvasConfig;
use crate::ir::SectionKey;

use super::grid::{GridSpec, Placement};
use super::types::Region;

// Five columns by three rows. The bottom row splits the width in two
// halves of two and a half columns each.
const PLACEMENTS: [(SectionKey, Placement); 9] = [
    (SectionKey::PartenairesCles, Placement::span(0.0, 0.0, 1.0, 2.0)),
    (SectionKey::ActivitesCles, Placement::cell(1.0, 0.0)),
    (SectionKey::RessourcesCles, Placement::cell(1.0, 1.0)),
    (SectionKey::PropositionValeur, Placement::span(2.0, 0.0, 1.0, 2.0)),
    (SectionKey::RelationClient, Placement::cell(3.0, 0.0)),
    (SectionKey::Canaux, Placement::cell(3.0, 1.0)),
    (SectionKey::Segments, Placement::span(4.0, 0.0, 1.0, 2.0)),
    (SectionKey::StructureCouts, Placement::span(0.0, 2.0, 2.5, 1.0)),
    (SectionKey::SourcesRevenus, Placement::span(2.5, 2.0, 2.5, 1.0)),
];

pub(super) fn grid(width: f32, height: f32, config: &CanvasConfig) -> GridSpec {
    GridSpec::fill(
        config.margin_x,
        config.margin_y,
        width - 2.0 * config.margin_x,
        height - 2.0 * config.margin_y,
        5.0,
        3.0,
        0.0,
    )
}

pub(super) fn regions(width: f32, height: f32, config: &CanvasConfig) -> Vec<(SectionKey, Region)> {
    let grid = grid(width, height, config);
    PLACEMENTS
        .iter()
        .map(|(key, placement)| (*key, grid.place(*placement)))
        .collect()
}
