pub mod canvas_input;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod icons;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod render;
#[cfg(feature = "server")]
pub mod server;
pub mod text_metrics;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, load_config};
pub use error::{RenderError, Result};
pub use ir::{DocumentKind, ParsedDocument, SectionKey};
pub use layout::{DocumentLayout, Region, compute_layout, compute_regions};
pub use parser::{parse_bmc_text, parse_document, parse_matrix, parse_swot};
pub use render::{Renderer, render_svg};
