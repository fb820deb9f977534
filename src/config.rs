use anyhow::{Context, Result, bail};
use jotdown_parse::{IdNumbering, RenderOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up in the working directory when `--config` is not given.
pub const CONFIG_FILE: &str = "jotdown.json";

/// Top-level jotdown.json schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JotdownConfig {
    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default)]
    pub id_numbering: IdNumbering,

    /// Extension of source files picked up when a directory is given.
    #[serde(default = "default_source_extension")]
    pub source_extension: String,

    /// Write `notes.html` instead of `notes.jd.html`.
    #[serde(default)]
    pub replace_extension: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<String>,
}

fn default_language() -> String {
    "en".to_string()
}
fn default_title() -> String {
    "index".to_string()
}
fn default_source_extension() -> String {
    "jd".to_string()
}

impl Default for JotdownConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            title: default_title(),
            id_numbering: IdNumbering::default(),
            source_extension: default_source_extension(),
            replace_extension: false,
            out_dir: None,
        }
    }
}

impl JotdownConfig {
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            language: self.language.clone(),
            title: self.title.clone(),
            id_numbering: self.id_numbering,
        }
    }
}

/// Load config from `explicit`, or from `jotdown.json` in `cwd` if present.
///
/// A missing explicit path is an error; a missing default file yields defaults.
pub fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<JotdownConfig> {
    let config_path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = cwd.join(CONFIG_FILE);
            if !path.exists() {
                log::debug!("no {} in {}, using defaults", CONFIG_FILE, cwd.display());
                return Ok(JotdownConfig::default());
            }
            path
        }
    };

    let raw = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;
    let config: JotdownConfig = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse {}", config_path.display()))?;
    log::debug!("loaded config from {}", config_path.display());
    Ok(config)
}

/// Write a default jotdown.json into `dir`, returning its path.
pub fn write_default_config(dir: &Path, force: bool) -> Result<PathBuf> {
    let path = dir.join(CONFIG_FILE);
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    let json = serde_json::to_string_pretty(&JotdownConfig::default())?;
    std::fs::write(&path, json + "\n")
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}
