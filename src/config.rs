use serde::Deserialize;
use std::path::PathBuf;

use crate::theme::{apply_overrides, Theme, ThemeOverrides};

pub const DEFAULT_CONTEXT_LINES: u32 = 3;

#[derive(Debug, Clone)]
pub struct LinepickConfig {
    pub theme: Theme,
    pub ignore_whitespace: Option<bool>,
    pub context_lines: Option<u32>,
    /// `tracing` filter directive, e.g. `"linepick=debug"`.
    pub log_level: Option<String>,
    /// Problems found while loading, reported once logging is up.
    pub warnings: Vec<String>,
}

impl Default for LinepickConfig {
    fn default() -> Self {
        Self {
            theme: Theme::from_name("one-dark"),
            ignore_whitespace: None,
            context_lines: None,
            log_level: None,
            warnings: Vec::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    theme: Option<String>,
    #[serde(default)]
    colors: Option<ThemeOverrides>,
    #[serde(default)]
    ignore_whitespace: Option<bool>,
    #[serde(default)]
    context_lines: Option<u32>,
    #[serde(default)]
    log_level: Option<String>,
}

pub fn config_path() -> PathBuf {
    let mut path = dirs_home().unwrap_or_else(|| PathBuf::from("."));
    path.push(".config");
    path.push("linepick");
    path.push("config.toml");
    path
}

pub fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Load config from `~/.config/linepick/config.toml`, falling back to defaults.
///
/// `theme_override` (from the command line) replaces the configured theme
/// name; `[colors]` overrides still apply on top of it.
pub fn load_config(theme_override: Option<&str>) -> LinepickConfig {
    let path = config_path();

    let contents = std::fs::read_to_string(&path).unwrap_or_default();

    match parse_config(&contents, theme_override) {
        Ok(config) => config,
        Err(e) => {
            let mut config = parse_config("", theme_override).unwrap_or_default();
            config.warnings.push(format!("{}: {e}", path.display()));
            config
        }
    }
}

pub fn parse_config(
    contents: &str,
    theme_override: Option<&str>,
) -> Result<LinepickConfig, toml::de::Error> {
    let file: ConfigFile = toml::from_str(contents)?;

    // Load theme by name, apply color overrides
    let theme_name = theme_override
        .or(file.theme.as_deref())
        .unwrap_or("one-dark");
    let mut theme = Theme::from_name(theme_name);
    let warnings = match file.colors {
        Some(ref overrides) => apply_overrides(&mut theme, overrides),
        None => Vec::new(),
    };

    Ok(LinepickConfig {
        theme,
        ignore_whitespace: file.ignore_whitespace,
        context_lines: file.context_lines,
        log_level: file.log_level,
        warnings,
    })
}
