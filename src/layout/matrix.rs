use crate::config::MatrixConfig;
use crate::ir::SectionKey;
use crate::theme::Theme;

use super::grid::{GridSpec, Placement};
use super::types::{Decoration, Region, TextAnchor, TextBaseline, TextLabel};

const PLACEMENTS: [(SectionKey, Placement); 4] = [
    (SectionKey::Faire, Placement::cell(0.0, 0.0)),
    (SectionKey::Planifier, Placement::cell(1.0, 0.0)),
    (SectionKey::Deleguer, Placement::cell(0.0, 1.0)),
    (SectionKey::Abandonner, Placement::cell(1.0, 1.0)),
];

/// The quadrant grid sits below the title band and right of the row labels.
pub(super) fn grid(width: f32, height: f32, config: &MatrixConfig) -> GridSpec {
    let x = config.margin + config.axis_band;
    let y = config.margin + config.title_band;
    let grid_width = width - 2.0 * config.margin - config.axis_band;
    let grid_height = height - 2.0 * config.margin - config.title_band;
    GridSpec::fill(x, y, grid_width, grid_height, 2.0, 2.0, 0.0)
}

pub(super) fn regions(width: f32, height: f32, config: &MatrixConfig) -> Vec<(SectionKey, Region)> {
    let grid = grid(width, height, config);
    PLACEMENTS
        .iter()
        .map(|(key, placement)| (*key, grid.place(*placement)))
        .collect()
}

/// Title and axis labels, drawn beneath the quadrants.
pub(super) fn underlays(
    width: f32,
    height: f32,
    config: &MatrixConfig,
    theme: &Theme,
) -> Vec<Decoration> {
    let grid = grid(width, height, config);
    let half_w = grid.col_width;
    let half_h = grid.row_height;
    let label = |x: f32, y: f32, text: &str, font_size: f32, rotate: Option<f32>| {
        Decoration::Label(TextLabel {
            x,
            y,
            text: text.to_string(),
            font_size,
            font_family: theme.font_family.clone(),
            bold: true,
            color: config.label_color.clone(),
            anchor: TextAnchor::Middle,
            baseline: TextBaseline::Central,
            rotate,
        })
    };

    let column_y = grid.origin_y - config.axis_offset;
    let row_x = config.margin + config.row_label_offset;
    vec![
        label(
            width / 2.0,
            config.margin + config.title_offset_y,
            &config.title,
            config.title_font_size,
            None,
        ),
        label(
            grid.origin_x + half_w / 2.0,
            column_y,
            &config.column_labels[0],
            config.axis_font_size,
            None,
        ),
        label(
            grid.origin_x + half_w * 1.5,
            column_y,
            &config.column_labels[1],
            config.axis_font_size,
            None,
        ),
        label(
            row_x,
            grid.origin_y + half_h / 2.0,
            &config.row_labels[0],
            config.axis_font_size,
            Some(-90.0),
        ),
        label(
            row_x,
            grid.origin_y + half_h * 1.5,
            &config.row_labels[1],
            config.axis_font_size,
            Some(-90.0),
        ),
    ]
}

/// Grid frame and centre cross, drawn over the quadrants.
pub(super) fn overlays(width: f32, height: f32, config: &MatrixConfig) -> Vec<Decoration> {
    let grid = grid(width, height, config);
    let bounds = grid.bounds();
    let mid_x = bounds.x + grid.col_width;
    let mid_y = bounds.y + grid.row_height;
    let stroke = config.grid_stroke.clone();
    let stroke_width = config.grid_stroke_width;
    vec![
        Decoration::Frame {
            region: bounds,
            stroke: stroke.clone(),
            stroke_width,
        },
        Decoration::Line {
            x1: mid_x,
            y1: bounds.y,
            x2: mid_x,
            y2: bounds.bottom(),
            stroke: stroke.clone(),
            stroke_width,
        },
        Decoration::Line {
            x1: bounds.x,
            y1: mid_y,
            x2: bounds.right(),
            y2: mid_y,
            stroke,
            stroke_width,
        },
    ]
}
