use std::{
    collections::{BTreeMap, HashSet},
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::file_scanner::expand_braces;

pub const CONFIG_FILE_NAME: &str = ".sayablerc.json";

/// Placeholders substituted in catalogue output templates.
pub const LOCALE_PLACEHOLDER: &str = "{locale}";
pub const EXTENSION_PLACEHOLDER: &str = "{extension}";

/// Catalogue file codec.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    #[default]
    Po,
    Json,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogueConfig {
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    pub output: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compiled_output: Option<String>,
    #[serde(default)]
    pub format: FormatKind,
}

impl CatalogueConfig {
    /// Template for the compiled runtime files. Without an explicit
    /// `compiledOutput`, `messages.{extension}` becomes
    /// `messages.compiled.{extension}` next to the catalogue.
    pub fn compiled_output_template(&self) -> String {
        match &self.compiled_output {
            Some(template) => template.clone(),
            None if self.output.contains(EXTENSION_PLACEHOLDER) => self.output.replacen(
                EXTENSION_PLACEHOLDER,
                &format!("compiled.{EXTENSION_PLACEHOLDER}"),
                1,
            ),
            None => format!("{}.compiled.{EXTENSION_PLACEHOLDER}", self.output),
        }
    }

    /// Short label for log lines.
    pub fn label(&self) -> String {
        self.include.join(", ")
    }
}

impl Default for CatalogueConfig {
    fn default() -> Self {
        Self {
            include: vec!["src/**/*.{ts,tsx,js,jsx}".to_string()],
            exclude: vec!["**/node_modules/**".to_string()],
            output: "src/locales/{locale}/messages.{extension}".to_string(),
            compiled_output: None,
            format: FormatKind::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_source_locale")]
    pub source_locale: String,
    #[serde(default = "default_locales")]
    pub locales: Vec<String>,
    #[serde(default)]
    pub fallback_locales: BTreeMap<String, Vec<String>>,
    /// Drop catalogue entries no longer found in the sources.
    #[serde(default)]
    pub prune: bool,
    #[serde(default = "default_catalogues")]
    pub catalogues: Vec<CatalogueConfig>,
}

fn default_source_locale() -> String {
    "en".to_string()
}

fn default_locales() -> Vec<String> {
    vec![default_source_locale()]
}

fn default_catalogues() -> Vec<CatalogueConfig> {
    vec![CatalogueConfig::default()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_locale: default_source_locale(),
            locales: default_locales(),
            fallback_locales: BTreeMap::new(),
            prune: false,
            catalogues: default_catalogues(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        let Some(first) = self.locales.first() else {
            bail!("'locales' must list at least one locale");
        };
        if *first != self.source_locale {
            bail!(
                "'sourceLocale' (\"{}\") must be the first entry of 'locales'",
                self.source_locale
            );
        }

        let locales: HashSet<&str> = self.locales.iter().map(String::as_str).collect();
        for (locale, fallbacks) in &self.fallback_locales {
            if !locales.contains(locale.as_str()) {
                bail!("Unknown locale in 'fallbackLocales': \"{}\"", locale);
            }
            for fallback in fallbacks {
                if !locales.contains(fallback.as_str()) {
                    bail!(
                        "Unknown fallback locale \"{}\" for \"{}\" in 'fallbackLocales'",
                        fallback,
                        locale
                    );
                }
            }
        }

        if self.catalogues.is_empty() {
            bail!("'catalogues' must contain at least one catalogue");
        }

        for (index, catalogue) in self.catalogues.iter().enumerate() {
            if catalogue.include.is_empty() {
                bail!("catalogues[{}]: 'include' must not be empty", index);
            }
            for (field, patterns) in [("include", &catalogue.include), ("exclude", &catalogue.exclude)] {
                for pattern in patterns {
                    for expanded in expand_braces(pattern) {
                        Pattern::new(&expanded).with_context(|| {
                            format!("catalogues[{}]: Invalid glob pattern in '{}': \"{}\"", index, field, pattern)
                        })?;
                    }
                }
            }
            if !catalogue.output.contains(LOCALE_PLACEHOLDER) {
                bail!(
                    "catalogues[{}]: 'output' must contain {}: \"{}\"",
                    index,
                    LOCALE_PLACEHOLDER,
                    catalogue.output
                );
            }
            let compiled = catalogue.compiled_output_template();
            if !compiled.contains(LOCALE_PLACEHOLDER) {
                bail!(
                    "catalogues[{}]: 'compiledOutput' must contain {}: \"{}\"",
                    index,
                    LOCALE_PLACEHOLDER,
                    compiled
                );
            }
            if compiled == catalogue.output {
                bail!(
                    "catalogues[{}]: 'compiledOutput' must differ from 'output'",
                    index
                );
            }
        }

        Ok(())
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// Directory catalogue paths are resolved against: the directory of the
    /// config file, or the start directory when using defaults.
    pub root: PathBuf,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config
                .validate()
                .with_context(|| format!("Invalid config file: {:?}", path))?;
            let root = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| start_dir.to_path_buf());
            Ok(ConfigLoadResult {
                config,
                root,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            root: start_dir.to_path_buf(),
            from_file: false,
        }),
    }
}
