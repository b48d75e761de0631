use crate::config::SwotConfig;
use crate::ir::SectionKey;

use super::grid::{GridSpec, Placement};
use super::types::Region;

const PLACEMENTS: [(SectionKey, Placement); 4] = [
    (SectionKey::Forces, Placement::cell(0.0, 0.0)),
    (SectionKey::Faiblesses, Placement::cell(1.0, 0.0)),
    (SectionKey::Opportunites, Placement::cell(0.0, 1.0)),
    (SectionKey::Menaces, Placement::cell(1.0, 1.0)),
];

/// Two by two boxes; the margin doubles as the gutter between them.
pub(super) fn grid(width: f32, height: f32, config: &SwotConfig) -> GridSpec {
    let m = config.margin;
    GridSpec::fill(m, m, width - 2.0 * m, height - 2.0 * m, 2.0, 2.0, m)
}

pub(super) fn regions(width: f32, height: f32, config: &SwotConfig) -> Vec<(SectionKey, Region)> {
    let grid = grid(width, height, config);
    PLACEMENTS
        .iter()
        .map(|(key, placement)| (*key, grid.place(*placement)))
        .collect()
}
