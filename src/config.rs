use std::{collections::HashMap, env, path::PathBuf};

use color_eyre::{Result, eyre::Context};
use config::{Environment, File, FileFormat};
use directories::ProjectDirs;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::{component::style::StyleSpec, watermark::DEFAULT_CLASS};

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub data_dir: PathBuf,
}

/// One input of the form.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct FieldConfig {
    pub label: String,
    /// Placeholder shown while the field has no content
    #[serde(default)]
    pub watermark: Option<String>,
    /// Read-only fields show `initial` and cannot be edited
    #[serde(default)]
    pub read_only: bool,
    /// Disabled fields are skipped by focus navigation
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub initial: Option<String>,
}

impl FieldConfig {
    fn watermarked<T: Into<String>>(label: T, watermark: T) -> Self {
        Self {
            label: label.into(),
            watermark: Some(watermark.into()),
            read_only: false,
            disabled: false,
            initial: None,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct FormConfig {
    #[serde(default = "default_title")]
    pub title: String,
    /// Style class that marks a field showing its watermark
    #[serde(default = "default_class")]
    pub watermark_class: String,
    #[serde(default = "default_fields")]
    pub fields: Vec<FieldConfig>,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            watermark_class: default_class(),
            fields: default_fields(),
        }
    }
}

fn default_title() -> String {
    "Add mail provider".to_string()
}

fn default_class() -> String {
    DEFAULT_CLASS.to_string()
}

fn default_fields() -> Vec<FieldConfig> {
    vec![
        FieldConfig::watermarked("Domain", "example.com"),
        FieldConfig::watermarked("Display name", "Example Mail"),
        FieldConfig::watermarked("Incoming server", "imap.example.com"),
        FieldConfig::watermarked("Outgoing server", "smtp.example.com"),
    ]
}

fn default_styles() -> HashMap<String, StyleSpec> {
    let mut styles = HashMap::new();
    styles.insert(
        DEFAULT_CLASS.to_string(),
        StyleSpec {
            fg: Some("dark gray".to_string()),
            bg: None,
            modifiers: vec!["italic".to_string()],
        },
    );
    styles
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default, flatten)]
    pub config: AppConfig,
    #[serde(default)]
    pub form: FormConfig,
    /// Styles of the style classes, by class name
    #[serde(default = "default_styles")]
    pub styles: HashMap<String, StyleSpec>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config: AppConfig {
                data_dir: get_data_dir(),
            },
            form: FormConfig::default(),
            styles: default_styles(),
        }
    }
}

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase().to_string();
}

impl Config {
    /// Load the configuration, in increasing priority: defaults, config file,
    /// `WATERMARK_FORM__*` environment variables, command line.
    pub fn new(cli_source: Option<crate::cli::ClapSource>) -> Result<Self> {
        let data_dir = get_data_dir();
        let mut builder = config::Config::builder()
            .set_default("data_dir", data_dir.to_string_lossy().to_string())?;

        let config_file = cli_source
            .as_ref()
            .and_then(|c| c.config_file.clone())
            .map(|path| (path, true))
            .unwrap_or_else(|| (get_config_dir().join("config.yaml"), false));
        builder = builder.add_source(
            File::from(config_file.0.as_path())
                .format(FileFormat::Yaml)
                .required(config_file.1),
        );

        builder = builder.add_source(
            Environment::with_prefix(PROJECT_NAME.as_str())
                .prefix_separator("__")
                .separator("__"),
        );

        // Add CLI source last (highest priority)
        if let Some(cli_source) = cli_source {
            builder = builder.add_source(cli_source);
        }

        let cfg: Self = builder
            .build()
            .context("Error building config")?
            .try_deserialize()
            .context("Error deserialize config")?;

        Ok(cfg)
    }
}

pub fn get_data_dir() -> PathBuf {
    if let Some(s) = env::var(format!("{}_DATA", PROJECT_NAME.clone()))
        .ok()
        .map(PathBuf::from)
    {
        s
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.data_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".data")
    }
}

pub fn get_config_dir() -> PathBuf {
    if let Some(s) = env::var(format!("{}_CONFIG", PROJECT_NAME.clone()))
        .ok()
        .map(PathBuf::from)
    {
        s
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.config_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".config")
    }
}

fn project_directory() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "yyang", env!("CARGO_PKG_NAME"))
}
