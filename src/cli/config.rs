use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use yangbind_reactor::ReactorOptions;

use crate::cli::args::CliArgs;

/// Looked up in the working directory when `--config` is absent.
pub const CONFIG_FILE_NAME: &str = "yangbind.json";

/// Custom deserializer for boolean options that accepts both bool and string values.
/// This handles files containing `"documentation": "false"`.
fn deserialize_bool_or_string<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match Option::<BoolOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(BoolOrString::Bool(b)) => Ok(Some(b)),
        Some(BoolOrString::String(s)) => {
            let normalized = s.trim().to_lowercase();
            match normalized.as_str() {
                "true" | "1" | "yes" | "on" => Ok(Some(true)),
                "false" | "0" | "no" | "off" => Ok(Some(false)),
                _ => Err(Error::custom(format!(
                    "invalid boolean value: '{s}'. Expected true, false, 'true', or 'false'"
                ))),
            }
        }
    }
}

/// What the report lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Module map plus one entry per generated class name.
    #[default]
    Names,
    /// Module map plus every generated type with methods and constants.
    Types,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct YangbindConfig {
    /// Schema document, relative to the config file.
    #[serde(default)]
    pub schema: Option<String>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub documentation: Option<bool>,
    #[serde(default)]
    pub max_fixpoint_passes: Option<usize>,
    #[serde(default)]
    pub output: Option<OutputFormat>,
}

/// Settings for one run, after merging the config file and CLI flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub schema: PathBuf,
    pub options: ReactorOptions,
    pub output: OutputFormat,
}

pub fn parse_config(source: &str) -> Result<YangbindConfig> {
    let config = serde_json::from_str(source).context("failed to parse yangbind JSON")?;
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<YangbindConfig> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    parse_config(&source).with_context(|| format!("failed to parse config: {}", path.display()))
}

/// Merge the config file (explicit or found in `cwd`) with CLI flags.
/// Flags take precedence over file values.
pub fn resolve_config(args: &CliArgs, cwd: &Path) -> Result<ResolvedConfig> {
    let config_path = match &args.config {
        Some(path) => Some(cwd.join(path)),
        None => Some(cwd.join(CONFIG_FILE_NAME)).filter(|p| p.is_file()),
    };
    let (file, base_dir) = match config_path {
        Some(path) => {
            let config = load_config(&path)?;
            let base = path.parent().map_or_else(|| cwd.to_path_buf(), Path::to_path_buf);
            (config, base)
        }
        None => (YangbindConfig::default(), cwd.to_path_buf()),
    };

    let schema = match (&args.schema, &file.schema) {
        (Some(path), _) => cwd.join(path),
        (None, Some(path)) => base_dir.join(path),
        (None, None) => {
            bail!("no schema document given: pass --schema or set \"schema\" in {CONFIG_FILE_NAME}")
        }
    };

    let mut options = ReactorOptions::default();
    if let Some(documentation) = file.documentation {
        options.documentation = documentation;
    }
    if args.runtime {
        options.documentation = false;
    }
    if let Some(passes) = args.max_passes.or(file.max_fixpoint_passes) {
        if passes == 0 {
            bail!("maxFixpointPasses must be at least 1");
        }
        options.max_fixpoint_passes = passes;
    }

    Ok(ResolvedConfig {
        schema,
        options,
        output: args.format.or(file.output).unwrap_or_default(),
    })
}
