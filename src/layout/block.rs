use crate::config::{BlockStyle, LayoutConfig};
use crate::ir::{DocumentKind, SectionKey};
use crate::theme::Theme;

use super::text::{wrap_line, with_ellipsis};
use super::types::{
    BlockLayout, BodyLine, IconPlacement, Region, TextAnchor, TextBaseline, TextLabel,
};

/// Positions the title, icon and wrapped bullets of one section inside its
/// region. Text that would cross the bottom padding is dropped and the last
/// visible line gets the configured ellipsis.
pub fn layout_block(
    region: Region,
    key: SectionKey,
    bullets: &[String],
    style: &BlockStyle,
    theme: &Theme,
    config: &LayoutConfig,
) -> BlockLayout {
    let kind = key.kind();
    let font_family = match kind {
        DocumentKind::BusinessModelCanvas => theme.canvas_font_family.clone(),
        _ => theme.font_family.clone(),
    };
    let text_color = style
        .text_color
        .clone()
        .unwrap_or_else(|| theme.text_color.clone());
    let fill = match kind {
        DocumentKind::Swot => config.swot.fills.get(&key).cloned(),
        DocumentKind::PriorityMatrix => config.matrix.fills.get(&key).cloned(),
        DocumentKind::BusinessModelCanvas => None,
    };

    let title = TextLabel {
        x: region.x + style.title_inset_x,
        y: region.y + style.title_inset_y,
        text: key.title().to_string(),
        font_size: style.title_font_size,
        font_family: font_family.clone(),
        bold: true,
        color: text_color.clone(),
        anchor: TextAnchor::Start,
        baseline: TextBaseline::Hanging,
        rotate: None,
    };

    let icon = if kind == DocumentKind::BusinessModelCanvas && config.canvas.show_icons {
        key.icon().map(|icon| IconPlacement {
            kind: icon,
            cx: region.right() - style.icon_offset_x,
            cy: region.y + style.icon_offset_y,
            size: style.icon_size,
        })
    } else {
        None
    };

    let fast = config.fast_text_metrics;
    let max_width = (region.width - style.text_inset - style.right_padding).max(0.0);
    let limit = region.bottom() - style.bottom_padding;
    let mut cursor = region.y + style.body_top;
    let mut lines: Vec<BodyLine> = Vec::new();
    let mut truncated = false;

    'bullets: for bullet in bullets {
        let mut wrapped = wrap_line(bullet, max_width, style.body_font_size, &font_family, fast);
        if wrapped.is_empty() {
            wrapped.push(String::new());
        }
        for (idx, text) in wrapped.into_iter().enumerate() {
            if cursor + style.line_height > limit {
                truncated = true;
                break 'bullets;
            }
            lines.push(BodyLine {
                y: cursor,
                text_x: region.x + style.text_inset,
                text,
                bullet_x: (idx == 0).then_some(region.x + style.bullet_inset),
            });
            cursor += style.line_height;
        }
    }

    if truncated {
        tracing::debug!(
            section = key.as_str(),
            drawn = lines.len(),
            "block text clipped"
        );
        if let Some(last) = lines.last_mut() {
            last.text = with_ellipsis(
                &last.text,
                &config.ellipsis,
                max_width,
                style.body_font_size,
                &font_family,
                fast,
            );
        }
    }

    BlockLayout {
        key,
        region,
        corner_radius: style.corner_radius,
        fill,
        stroke: style.stroke.clone(),
        stroke_width: style.stroke_width,
        title,
        icon,
        font_family,
        font_size: style.body_font_size,
        line_height: style.line_height,
        text_color,
        lines,
        truncated,
    }
}
