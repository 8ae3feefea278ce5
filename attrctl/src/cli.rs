//! Command-line interface definitions for `attrctl`.

use std::str::FromStr;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand, ValueEnum};
use cookbook_attrs::AttrPath;
use cookbook_attrs::layers::tier;
use serde_json::Value;
use thiserror::Error;

/// Precedence given to `--set` values unless `--set-precedence` says otherwise.
pub const DEFAULT_SET_PRECEDENCE: i32 = tier::OVERRIDE + 100;

/// Output formats supported by `attrctl`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per attribute.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Parsed CLI arguments for `attrctl`.
#[derive(Debug, Parser)]
#[command(name = "attrctl")]
#[command(about = "Resolve cookbook attributes across override layers")]
#[command(version)]
pub struct Args {
    /// Manifest declaring the attributes (TOML, JSON or YAML).
    #[arg(long, short = 'm', value_name = "path")]
    pub manifest: Utf8PathBuf,
    /// Layer file to stack (repeatable).
    #[arg(long = "layer", value_name = "name:precedence:path")]
    pub layers: Vec<LayerArg>,
    /// Read a layer from environment variables with this prefix.
    #[arg(long, value_name = "PREFIX")]
    pub env_prefix: Option<String>,
    /// Precedence of the environment layer.
    #[arg(long, default_value_t = tier::ENVIRONMENT, allow_negative_numbers = true)]
    pub env_precedence: i32,
    /// Set an attribute directly (repeatable); `[...]` and `{...}` values are JSON.
    #[arg(long = "set", value_name = "path=value")]
    pub overrides: Vec<SetArg>,
    /// Precedence of the `--set` layer.
    #[arg(long, default_value_t = DEFAULT_SET_PRECEDENCE, allow_negative_numbers = true)]
    pub set_precedence: i32,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Log debug output to stderr.
    #[arg(long, short = 'v')]
    pub verbose: bool,
    /// What to do once everything is loaded.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Resolve the given attributes.
    Resolve {
        /// Attribute paths such as `rvm/default_ruby`.
        #[arg(required = true)]
        paths: Vec<AttrPath>,
    },
    /// Resolve every declared attribute.
    List,
    /// Print the package metadata.
    Metadata,
    /// Load and resolve everything, reporting only success or failure.
    Check,
}

/// Errors from parsing `--layer` and `--set` values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgError {
    /// A `--layer` value without three non-empty parts.
    #[error("expected name:precedence:path, got '{0}'")]
    LayerShape(String),
    /// A `--layer` precedence that is not an integer.
    #[error("layer precedence '{0}' is not an integer")]
    LayerPrecedence(String),
    /// A `--set` value without `=`.
    #[error("expected path=value, got '{0}'")]
    SetShape(String),
    /// A `--set` value whose path does not parse.
    #[error("invalid attribute path in '{0}'")]
    SetPath(String),
    /// A `--set` value that looks like JSON but is not.
    #[error("invalid JSON value in '{0}'")]
    SetJson(String),
}

/// A `--layer name:precedence:path` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerArg {
    /// Layer name.
    pub name: String,
    /// Layer precedence.
    pub precedence: i32,
    /// File holding the layer's values.
    pub path: Utf8PathBuf,
}

impl FromStr for LayerArg {
    type Err = ArgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let (Some(name), Some(precedence), Some(path)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(ArgError::LayerShape(s.to_owned()));
        };
        if name.is_empty() || path.is_empty() {
            return Err(ArgError::LayerShape(s.to_owned()));
        }
        let rank = precedence
            .trim()
            .parse()
            .map_err(|_| ArgError::LayerPrecedence(precedence.to_owned()))?;
        Ok(Self {
            name: name.to_owned(),
            precedence: rank,
            path: Utf8PathBuf::from(path),
        })
    }
}

/// A `--set path=value` argument.
#[derive(Debug, Clone, PartialEq)]
pub struct SetArg {
    /// Attribute to set.
    pub path: AttrPath,
    /// Raw value.
    pub value: Value,
}

impl FromStr for SetArg {
    type Err = ArgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (raw_path, raw_value) = s
            .split_once('=')
            .ok_or_else(|| ArgError::SetShape(s.to_owned()))?;
        let path = AttrPath::parse(raw_path).map_err(|_| ArgError::SetPath(s.to_owned()))?;
        let value = if raw_value.trim_start().starts_with(['[', '{']) {
            serde_json::from_str(raw_value).map_err(|_| ArgError::SetJson(s.to_owned()))?
        } else {
            Value::String(raw_value.to_owned())
        };
        Ok(Self { path, value })
    }
}
