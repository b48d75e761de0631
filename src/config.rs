use crate::error::RenderError;
use crate::ir::SectionKey;
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const SWOT_FILLS: [(SectionKey, &str); 4] = [
    (SectionKey::Forces, "#00e091"),
    (SectionKey::Faiblesses, "#ffd800"),
    (SectionKey::Opportunites, "#a998ee"),
    (SectionKey::Menaces, "#FF5E4D"),
];

const MATRIX_FILLS: [(SectionKey, &str); 4] = [
    (SectionKey::Faire, "#4f9b7a"),
    (SectionKey::Planifier, "#f19a82"),
    (SectionKey::Deleguer, "#4c73c8"),
    (SectionKey::Abandonner, "#f06f6c"),
];

fn palette(entries: &[(SectionKey, &str)]) -> BTreeMap<SectionKey, String> {
    entries
        .iter()
        .map(|(key, color)| (*key, color.to_string()))
        .collect()
}

/// Geometry and typography of one block, relative to its region's top-left
/// corner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockStyle {
    pub corner_radius: f32,
    /// Frame stroke; `None` draws no frame.
    pub stroke: Option<String>,
    pub stroke_width: f32,
    pub title_inset_x: f32,
    pub title_inset_y: f32,
    pub title_font_size: f32,
    /// Overrides the theme text colour for titles and body text.
    pub text_color: Option<String>,
    pub body_font_size: f32,
    pub line_height: f32,
    /// Offset of the first body line from the region top.
    pub body_top: f32,
    pub bullet_inset: f32,
    /// Hanging-indent column for bullet text.
    pub text_inset: f32,
    pub right_padding: f32,
    pub bottom_padding: f32,
    /// Icon centre, measured from the region's top-right corner.
    pub icon_offset_x: f32,
    pub icon_offset_y: f32,
    pub icon_size: f32,
}

impl BlockStyle {
    pub fn swot() -> Self {
        Self {
            corner_radius: 35.0,
            stroke: Some("#000000".to_string()),
            stroke_width: 4.0,
            title_inset_x: 24.0,
            title_inset_y: 24.0,
            title_font_size: 40.0,
            text_color: None,
            body_font_size: 30.0,
            line_height: 42.0,
            // title inset + title size + two blank lines
            body_top: 24.0 + 40.0 + 42.0 * 2.0,
            bullet_inset: 32.0,
            text_inset: 60.0,
            right_padding: 10.0,
            bottom_padding: 24.0,
            icon_offset_x: 60.0,
            icon_offset_y: 45.0,
            icon_size: 60.0,
        }
    }

    pub fn canvas() -> Self {
        Self {
            corner_radius: 18.0,
            stroke: Some("#CCCCCC".to_string()),
            stroke_width: 3.0,
            title_inset_x: 20.0,
            title_inset_y: 20.0,
            title_font_size: 38.0,
            text_color: None,
            body_font_size: 26.0,
            line_height: 34.0,
            body_top: 90.0,
            bullet_inset: 20.0,
            text_inset: 48.0,
            right_padding: 20.0,
            bottom_padding: 20.0,
            icon_offset_x: 60.0,
            icon_offset_y: 45.0,
            icon_size: 60.0,
        }
    }

    pub fn quadrant() -> Self {
        Self {
            corner_radius: 22.0,
            stroke: None,
            stroke_width: 0.0,
            title_inset_x: 48.0,
            title_inset_y: 48.0,
            title_font_size: 48.0,
            text_color: Some("#FFFFFF".to_string()),
            body_font_size: 36.0,
            line_height: 50.0,
            body_top: 48.0 + 70.0,
            bullet_inset: 52.0,
            text_inset: 90.0,
            right_padding: 20.0,
            bottom_padding: 70.0,
            icon_offset_x: 60.0,
            icon_offset_y: 45.0,
            icon_size: 60.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SwotConfig {
    pub width: f32,
    pub height: f32,
    /// Outer margin and gutter between the four boxes.
    pub margin: f32,
    pub block: BlockStyle,
    pub fills: BTreeMap<SectionKey, String>,
}

impl Default for SwotConfig {
    fn default() -> Self {
        Self {
            width: 2000.0,
            height: 2000.0,
            margin: 80.0,
            block: BlockStyle::swot(),
            fills: palette(&SWOT_FILLS),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CanvasConfig {
    pub width: f32,
    pub height: f32,
    pub margin_x: f32,
    pub margin_y: f32,
    pub block: BlockStyle,
    pub show_icons: bool,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 3000.0,
            height: 2000.0,
            margin_x: 80.0,
            margin_y: 80.0,
            block: BlockStyle::canvas(),
            show_icons: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatrixConfig {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    pub title_band: f32,
    pub axis_band: f32,
    pub background: String,
    pub title: String,
    pub title_font_size: f32,
    pub title_offset_y: f32,
    pub axis_font_size: f32,
    /// Gap between the column headers and the grid top.
    pub axis_offset: f32,
    /// Distance of the rotated row headers from the left margin.
    pub row_label_offset: f32,
    pub label_color: String,
    pub column_labels: [String; 2],
    pub row_labels: [String; 2],
    pub grid_stroke: String,
    pub grid_stroke_width: f32,
    pub block: BlockStyle,
    pub fills: BTreeMap<SectionKey, String>,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            width: 2000.0,
            height: 2000.0,
            margin: 120.0,
            title_band: 180.0,
            axis_band: 120.0,
            background: "#f3f3f3".to_string(),
            title: "Matrice Importance / Urgence".to_string(),
            title_font_size: 64.0,
            title_offset_y: 60.0,
            axis_font_size: 44.0,
            axis_offset: 60.0,
            row_label_offset: 50.0,
            label_color: "#111111".to_string(),
            column_labels: ["Urgent".to_string(), "Non urgent".to_string()],
            row_labels: ["Important".to_string(), "Non important".to_string()],
            grid_stroke: "#111111".to_string(),
            grid_stroke_width: 4.0,
            block: BlockStyle::quadrant(),
            fills: palette(&MATRIX_FILLS),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Measure text with the built-in width table instead of font files.
    pub fast_text_metrics: bool,
    /// Suffix of the last visible line when a block's text is clipped.
    pub ellipsis: String,
    pub swot: SwotConfig,
    pub canvas: CanvasConfig,
    pub matrix: MatrixConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            fast_text_metrics: false,
            ellipsis: "…".to_string(),
            swot: SwotConfig::default(),
            canvas: CanvasConfig::default(),
            matrix: MatrixConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderConfig {
    /// Font files registered at startup. Missing files only log a warning.
    pub font_files: Vec<PathBuf>,
    /// Family used by the rasteriser when a requested family is unavailable.
    pub fallback_font_family: String,
    /// Directory of `<tag>.png` canvas icons.
    pub icon_dir: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            font_files: vec![PathBuf::from("fonts").join("BrushScriptMT.ttf")],
            fallback_font_family: "Arial".to_string(),
            icon_dir: Some(PathBuf::from("icons")),
        }
    }
}

/// Listen settings as written in the config file or given on the command
/// line. Unset fields fall through to the next source in
/// [`ServerConfig::resolve`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub body_limit_bytes: Option<u64>,
}

/// Effective listen settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub body_limit_bytes: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            body_limit_bytes: 20 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// Resolves each setting from `flags`, then this file section, then the
    /// `HOST`/`PORT` variables returned by `env`, then the defaults.
    pub fn resolve(
        &self,
        flags: &ServerConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> ServerSettings {
        let defaults = ServerSettings::default();
        let env_host = env("HOST")
            .map(|host| host.trim().to_string())
            .filter(|host| !host.is_empty());
        let env_port = env("PORT").and_then(|raw| match raw.trim().parse::<u16>() {
            Ok(port) => Some(port),
            Err(_) => {
                tracing::warn!(value = %raw, "ignoring invalid PORT");
                None
            }
        });

        ServerSettings {
            host: flags
                .host
                .clone()
                .or_else(|| self.host.clone())
                .or(env_host)
                .unwrap_or(defaults.host),
            port: flags
                .port
                .or(self.port)
                .or(env_port)
                .unwrap_or(defaults.port),
            body_limit_bytes: flags
                .body_limit_bytes
                .or(self.body_limit_bytes)
                .unwrap_or(defaults.body_limit_bytes),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    canvas_font_family: Option<String>,
    text_color: Option<String>,
    background: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    /// Merged over the built-in layout, so any subset of fields may be given.
    layout: Option<Value>,
    render: Option<RenderConfig>,
    server: Option<ServerConfig>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = match serde_json::from_str(&contents) {
        Ok(parsed) => parsed,
        Err(_) => json5::from_str(&contents).map_err(|err| config_error(path, err))?,
    };

    if let Some(theme_name) = parsed.theme.as_deref() {
        match Theme::from_name(theme_name) {
            Some(theme) => config.theme = theme,
            None => tracing::warn!(theme = theme_name, "unknown theme, keeping classic"),
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.canvas_font_family {
            config.theme.canvas_font_family = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
    }

    if let Some(overrides) = parsed.layout {
        let mut merged = serde_json::to_value(&config.layout)
            .map_err(|err| config_error(path, err))?;
        merge_json(&mut merged, overrides);
        config.layout =
            serde_json::from_value(merged).map_err(|err| config_error(path, err))?;
    }
    if let Some(render) = parsed.render {
        config.render = render;
    }
    if let Some(server) = parsed.server {
        config.server = server;
    }

    Ok(config)
}

fn config_error(path: &Path, err: impl std::fmt::Display) -> RenderError {
    RenderError::Config(format!("{}: {err}", path.display()))
}

/// Objects merge key by key; any other value replaces the base.
fn merge_json(base: &mut Value, overrides: Value) {
    match (base, overrides) {
        (Value::Object(base), Value::Object(overrides)) => {
            for (key, value) in overrides {
                match base.get_mut(&key) {
                    Some(slot) => merge_json(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    #[test]
    fn defaults_match_canonical_canvases() {
        let config = LayoutConfig::default();
        assert_eq!((config.swot.width, config.swot.height), (2000.0, 2000.0));
        assert_eq!(
            (config.canvas.width, config.canvas.height),
            (3000.0, 2000.0)
        );
        assert_eq!(
            (config.matrix.width, config.matrix.height),
            (2000.0, 2000.0)
        );
        assert_eq!(config.swot.fills.len(), 4);
        assert_eq!(config.matrix.fills.len(), 4);
        assert_eq!(config.swot.block.body_top, 148.0);
    }

    #[test]
    fn load_config_without_path_is_default() {
        let config = load_config(None).unwrap();
        assert!(config.server.port.is_none());
        assert_eq!(config.theme.font_family, Theme::classic().font_family);
    }

    #[test]
    fn load_config_merges_partial_file() {
        let file = write_config(
            r##"{
                "theme": "plain",
                "themeVariables": { "textColor": "#222222" },
                "layout": { "fastTextMetrics": true, "swot": { "margin": 40 } },
                "server": { "port": 9000 }
            }"##,
        );
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.theme.text_color, "#222222");
        assert_eq!(config.theme.canvas_font_family, config.theme.font_family);
        assert!(config.layout.fast_text_metrics);
        assert_eq!(config.layout.swot.margin, 40.0);
        assert_eq!(config.layout.swot.width, 2000.0);
        assert_eq!(config.layout.canvas.width, 3000.0);
        assert_eq!(config.server.port, Some(9000));
        assert_eq!(config.server.body_limit_bytes, None);
    }

    #[test]
    fn partial_block_style_keeps_the_kind_preset() {
        let file = write_config(
            r#"{ "layout": { "swot": { "block": { "bodyFontSize": 20 } } } }"#,
        );
        let config = load_config(Some(file.path())).unwrap();
        let block = &config.layout.swot.block;
        assert_eq!(block.body_font_size, 20.0);
        assert_eq!(block.corner_radius, 35.0);
        assert_eq!(block.line_height, 42.0);
        assert_eq!(config.layout.canvas.block.body_font_size, 26.0);
    }

    #[test]
    fn partial_fills_keep_the_other_colours() {
        let file = write_config(
            r##"{ "layout": { "swot": { "fills": { "forces": "#000000" } } } }"##,
        );
        let config = load_config(Some(file.path())).unwrap();
        let fills = &config.layout.swot.fills;
        assert_eq!(fills.len(), 4);
        assert_eq!(fills[&SectionKey::Forces], "#000000");
        assert_eq!(fills[&SectionKey::Menaces], "#FF5E4D");
    }

    #[test]
    fn load_config_accepts_json5() {
        let file = write_config(
            "{\n  // local overrides\n  server: { host: '127.0.0.1', },\n}",
        );
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.server.host.as_deref(), Some("127.0.0.1"));
    }

    #[test]
    fn load_config_rejects_garbage() {
        let file = write_config("not a config");
        assert!(load_config(Some(file.path())).is_err());

        let file = write_config(r#"{ "layout": { "swot": { "margin": "wide" } } }"#);
        assert!(load_config(Some(file.path())).is_err());
    }

    fn env(host: Option<&str>, port: Option<&str>) -> impl Fn(&str) -> Option<String> {
        let host = host.map(str::to_string);
        let port = port.map(str::to_string);
        move |name| match name {
            "HOST" => host.clone(),
            "PORT" => port.clone(),
            _ => None,
        }
    }

    #[test]
    fn listen_settings_precedence() {
        let none = ServerConfig::default();
        let settings = none.resolve(&none, env(None, None));
        assert_eq!(settings, ServerSettings::default());

        let settings = none.resolve(&none, env(Some(" 127.0.0.1 "), Some("3000")));
        assert_eq!(settings.host, "127.0.0.1");
        assert_eq!(settings.port, 3000);

        let file = ServerConfig {
            host: None,
            port: Some(9000),
            body_limit_bytes: Some(1024),
        };
        let settings = file.resolve(&none, env(Some("127.0.0.1"), Some("3000")));
        assert_eq!(settings.port, 9000);
        assert_eq!(settings.host, "127.0.0.1");
        assert_eq!(settings.body_limit_bytes, 1024);

        let flags = ServerConfig {
            host: Some("::1".to_string()),
            port: Some(7000),
            body_limit_bytes: None,
        };
        let settings = file.resolve(&flags, env(None, Some("3000")));
        assert_eq!(settings.host, "::1");
        assert_eq!(settings.port, 7000);
    }

    #[test]
    fn invalid_port_variable_is_ignored() {
        let none = ServerConfig::default();
        let settings = none.resolve(&none, env(Some("  "), Some("not-a-port")));
        assert_eq!(settings, ServerSettings::default());
    }
}
