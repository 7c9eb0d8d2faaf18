//! View configuration.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use jsonschema::Validator;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::RenderError;
use crate::builder::BuildOptions;
use crate::style::{StyleConfig, TargetPlatform, ThemeKind};

const SCHEMA_JSON: &str = include_str!("../../../schemas/v1/config.json");
static CONFIG_SCHEMA: OnceLock<Result<Validator, String>> = OnceLock::new();

/// File name looked up by the CLI.
pub const CONFIG_FILE_NAME: &str = ".markview.json";

/// Configuration for a [`MarkdownView`](crate::MarkdownView).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Default style family.
    #[serde(default)]
    pub theme: ThemeKind,

    /// Platform used to resolve [`ThemeKind::PlatformAppropriate`].
    #[serde(default)]
    pub platform: TargetPlatform,

    /// Wrap the output in a scrollable container.
    #[serde(default)]
    pub scrollable: bool,

    /// Padding of the scrollable container.
    #[serde(default = "default_padding")]
    pub padding: f32,

    /// Mark text blocks as selectable.
    #[serde(default)]
    pub selectable: bool,

    /// Size the root to its content instead of stretching to the available width.
    #[serde(default)]
    pub fit_content: bool,

    /// Render soft line breaks as hard breaks.
    #[serde(default)]
    pub soft_line_break: bool,

    /// Escape HTML special characters in text at parse time.
    #[serde(default)]
    pub encode_html: bool,

    /// Base URL for relative image paths.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Directory for relative image paths.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_directory: Option<PathBuf>,

    /// Style override merged onto the theme defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<StyleConfig>,

    /// Directory containing the configuration file, if loaded from one.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

fn default_padding() -> f32 {
    16.0
}

impl ViewConfig {
    /// Creates a configuration with default settings.
    pub fn new() -> Self {
        Self {
            theme: ThemeKind::default(),
            platform: TargetPlatform::default(),
            scrollable: false,
            padding: default_padding(),
            selectable: false,
            fit_content: false,
            soft_line_break: false,
            encode_html: false,
            base_url: None,
            image_directory: None,
            style: None,
            base_dir: None,
        }
    }

    /// Loads configuration from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RenderError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| RenderError::config(format!("Failed to read config '{}': {}", path.display(), e)))?;

        let mut config = Self::from_json(&content)?;
        if let Some(parent) = path.parent() {
            config.base_dir = Some(parent.to_path_buf());
        }

        tracing::debug!(path = %path.display(), "loaded view config");
        Ok(config)
    }

    /// Parses configuration from a JSON string with schema validation.
    pub fn from_json(json: &str) -> Result<Self, RenderError> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| RenderError::config(format!("Invalid JSON: {}", e)))?;

        let schema = CONFIG_SCHEMA
            .get_or_init(|| {
                let schema_json: serde_json::Value =
                    serde_json::from_str(SCHEMA_JSON).map_err(|e| format!("Invalid embedded config schema: {}", e))?;
                Validator::new(&schema_json).map_err(|e| format!("Invalid config schema compilation: {}", e))
            })
            .as_ref()
            .map_err(|e| RenderError::config(e.clone()))?;

        if let Err(e) = schema.validate(&value) {
            return Err(RenderError::config(format!(
                "Config validation failed: {} at {}",
                e,
                e.instance_path()
            )));
        }

        serde_json::from_value(value).map_err(|e| RenderError::config(format!("Invalid config: {}", e)))
    }

    /// Settings handed to the tree builder.
    ///
    /// A relative `image_directory` is resolved against `base_dir`.
    pub fn build_options(&self) -> Result<BuildOptions, RenderError> {
        let base_url = self
            .base_url
            .as_deref()
            .map(|raw| Url::parse(raw).map_err(|e| RenderError::config(format!("Invalid base_url '{}': {}", raw, e))))
            .transpose()?;

        let image_directory = self.image_directory.as_ref().map(|dir| match &self.base_dir {
            Some(base) if dir.is_relative() => base.join(dir),
            _ => dir.clone(),
        });

        Ok(BuildOptions {
            base_url,
            image_directory,
            soft_line_break: self.soft_line_break,
            selectable: self.selectable,
            fit_content: self.fit_content,
        })
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self::new()
    }
}
