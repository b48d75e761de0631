use crate::config::{Config, LayoutConfig, RenderConfig};
use crate::error::{RenderError, Result};
use crate::icons::{ICON_STROKE, ICON_STROKE_WIDTH, IconSet};
use crate::ir::ParsedDocument;
use crate::layout::{
    BlockLayout, Decoration, DocumentLayout, IconPlacement, TextAnchor, TextBaseline, TextLabel,
    compute_layout,
};
use crate::text_metrics;
use crate::theme::Theme;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use std::path::Path;
use std::sync::Arc;

const BULLET: &str = "•";

pub fn render_svg(layout: &DocumentLayout, icons: &IconSet) -> String {
    let mut svg = String::new();
    let width = layout.width;
    let height = layout.height;

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        escape_xml(&layout.background)
    ));

    for decoration in &layout.underlays {
        svg.push_str(&decoration_svg(decoration));
    }
    for block in &layout.blocks {
        svg.push_str(&block_svg(block, icons));
    }
    for decoration in &layout.overlays {
        svg.push_str(&decoration_svg(decoration));
    }

    svg.push_str("</svg>");
    svg
}

fn block_svg(block: &BlockLayout, icons: &IconSet) -> String {
    let mut svg = String::new();
    let region = &block.region;
    let r = block.corner_radius;
    let fill = block.fill.as_deref().unwrap_or("none");

    if block.fill.is_some() || block.stroke.is_some() {
        let stroke = match &block.stroke {
            Some(color) => format!(
                " stroke=\"{}\" stroke-width=\"{:.2}\"",
                escape_xml(color),
                block.stroke_width
            ),
            None => String::new(),
        };
        svg.push_str(&format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{r:.2}\" ry=\"{r:.2}\" fill=\"{}\"{stroke}/>",
            region.x,
            region.y,
            region.width,
            region.height,
            escape_xml(fill)
        ));
    }

    svg.push_str(&label_svg(&block.title));

    if let Some(icon) = &block.icon {
        svg.push_str(&icon_svg(icon, icons));
    }

    if !block.lines.is_empty() {
        svg.push_str(&format!(
            "<g font-family=\"{}\" font-size=\"{:.2}\" fill=\"{}\" dominant-baseline=\"hanging\">",
            escape_xml(&block.font_family),
            block.font_size,
            escape_xml(&block.text_color)
        ));
        for line in &block.lines {
            if let Some(bullet_x) = line.bullet_x {
                svg.push_str(&format!(
                    "<text x=\"{bullet_x:.2}\" y=\"{:.2}\">{BULLET}</text>",
                    line.y
                ));
            }
            if !line.text.is_empty() {
                svg.push_str(&format!(
                    "<text x=\"{:.2}\" y=\"{:.2}\" xml:space=\"preserve\">{}</text>",
                    line.text_x,
                    line.y,
                    escape_xml(&line.text)
                ));
            }
        }
        svg.push_str("</g>");
    }

    svg
}

fn icon_svg(icon: &IconPlacement, icons: &IconSet) -> String {
    if let Some(bitmap) = icons.get(icon.kind) {
        let encoded = BASE64.encode(&bitmap.png);
        let half = icon.size / 2.0;
        return format!(
            "<image x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" xlink:href=\"data:image/png;base64,{encoded}\"/>",
            icon.cx - half,
            icon.cy - half,
            icon.size,
            icon.size
        );
    }

    let mut svg = format!(
        "<g fill=\"none\" stroke=\"{ICON_STROKE}\" stroke-width=\"{ICON_STROKE_WIDTH}\" stroke-linecap=\"round\" stroke-linejoin=\"round\">"
    );
    for primitive in icon.kind.primitives(icon.cx, icon.cy) {
        svg.push_str(&primitive.to_svg());
    }
    svg.push_str("</g>");
    svg
}

fn label_svg(label: &TextLabel) -> String {
    let anchor = match label.anchor {
        TextAnchor::Start => "start",
        TextAnchor::Middle => "middle",
    };
    let baseline = match label.baseline {
        TextBaseline::Hanging => "hanging",
        TextBaseline::Central => "central",
    };
    let weight = if label.bold { " font-weight=\"bold\"" } else { "" };
    let transform = match label.rotate {
        Some(angle) => format!(
            " transform=\"rotate({angle:.2} {:.2} {:.2})\"",
            label.x, label.y
        ),
        None => String::new(),
    };
    format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"{anchor}\" dominant-baseline=\"{baseline}\" font-family=\"{}\" font-size=\"{:.2}\"{weight} fill=\"{}\"{transform}>{}</text>",
        label.x,
        label.y,
        escape_xml(&label.font_family),
        label.font_size,
        escape_xml(&label.color),
        escape_xml(&label.text)
    )
}

fn decoration_svg(decoration: &Decoration) -> String {
    match decoration {
        Decoration::Label(label) => label_svg(label),
        Decoration::Line {
            x1,
            y1,
            x2,
            y2,
            stroke,
            stroke_width,
        } => format!(
            "<line x1=\"{x1:.2}\" y1=\"{y1:.2}\" x2=\"{x2:.2}\" y2=\"{y2:.2}\" stroke=\"{}\" stroke-width=\"{stroke_width:.2}\"/>",
            escape_xml(stroke)
        ),
        Decoration::Frame {
            region,
            stroke,
            stroke_width,
        } => format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{stroke_width:.2}\"/>",
            region.x,
            region.y,
            region.width,
            region.height,
            escape_xml(stroke)
        ),
    }
}

/// SVG to PNG conversion over a font database built once.
#[derive(Clone)]
pub struct Rasterizer {
    fontdb: Arc<usvg::fontdb::Database>,
    fallback_family: String,
}

impl Rasterizer {
    /// Loads system fonts plus the configured font files. A font file that
    /// cannot be loaded is logged and skipped.
    pub fn new(config: &RenderConfig) -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        for path in &config.font_files {
            if let Err(err) = db.load_font_file(path) {
                tracing::warn!(path = %path.display(), error = %err, "font not loaded, using fallback family");
                continue;
            }
            match text_metrics::register_font_file(path) {
                Ok(families) => {
                    tracing::info!(path = %path.display(), ?families, "registered font")
                }
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "font not measurable")
                }
            }
        }
        Self {
            fontdb: Arc::new(db),
            fallback_family: config.fallback_font_family.clone(),
        }
    }

    pub fn svg_to_png(&self, svg: &str) -> Result<Vec<u8>> {
        let mut opt = usvg::Options::default();
        opt.font_family = self.fallback_family.clone();
        opt.fontdb = Arc::clone(&self.fontdb);

        let tree =
            usvg::Tree::from_str(svg, &opt).map_err(|err| RenderError::SvgParse(err.to_string()))?;
        let size = tree.size().to_int_size();
        let (width, height) = (size.width(), size.height());
        let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
            .ok_or(RenderError::PixmapAlloc { width, height })?;

        let mut pixmap_mut = pixmap.as_mut();
        let transform = resvg::tiny_skia::Transform::default();
        resvg::render(&tree, transform, &mut pixmap_mut);
        pixmap
            .encode_png()
            .map_err(|err| RenderError::PngEncode(err.to_string()))
    }
}

/// Output of one full render.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub layout: DocumentLayout,
    pub svg: String,
    pub png: Vec<u8>,
}

/// Section map to PNG: layout, SVG emission and rasterisation.
#[derive(Clone)]
pub struct Renderer {
    theme: Theme,
    layout: LayoutConfig,
    rasterizer: Rasterizer,
}

impl Renderer {
    pub fn new(config: &Config) -> Self {
        Self {
            theme: config.theme.clone(),
            layout: config.layout.clone(),
            rasterizer: Rasterizer::new(&config.render),
        }
    }

    pub fn layout(&self, doc: &ParsedDocument) -> DocumentLayout {
        compute_layout(doc, &self.theme, &self.layout)
    }

    pub fn render_svg(&self, doc: &ParsedDocument, icons: &IconSet) -> (DocumentLayout, String) {
        let layout = self.layout(doc);
        let svg = render_svg(&layout, icons);
        (layout, svg)
    }

    pub fn render(&self, doc: &ParsedDocument, icons: &IconSet) -> Result<RenderedDocument> {
        let (layout, svg) = self.render_svg(doc, icons);
        let png = self.rasterizer.svg_to_png(&svg)?;
        tracing::debug!(
            kind = doc.kind().as_str(),
            bullets = doc.total_bullets(),
            bytes = png.len(),
            "rendered document"
        );
        Ok(RenderedDocument { layout, svg, png })
    }

    pub fn render_png_base64(&self, doc: &ParsedDocument, icons: &IconSet) -> Result<String> {
        let rendered = self.render(doc, icons)?;
        Ok(BASE64.encode(rendered.png))
    }
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

pub fn write_output_png(png: &[u8], output: &Path) -> anyhow::Result<()> {
    std::fs::write(output, png)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
