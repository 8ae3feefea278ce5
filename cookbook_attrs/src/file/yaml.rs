//! YAML provider support backed by `serde-saphyr`.

use std::path::PathBuf;

use figment::{
    Metadata, Profile, Provider,
    error::Kind,
    value::{Dict, Value as FigmentValue},
};
use serde_saphyr::Options;

/// Figment provider that reads in-memory YAML with YAML 1.2 booleans, so
/// `yes` and `on` stay strings.
#[derive(Debug, Clone)]
pub struct SaphyrYaml {
    path: PathBuf,
    contents: String,
}

impl SaphyrYaml {
    /// Construct a provider over `contents`, labelled with `path` in errors.
    #[must_use]
    pub fn string<P, S>(path: P, contents: S) -> Self
    where
        P: Into<PathBuf>,
        S: Into<String>,
    {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }

    fn parse_value(contents: &str) -> Result<FigmentValue, serde_saphyr::Error> {
        serde_saphyr::from_str_with_options(
            contents,
            Options {
                strict_booleans: true,
                ..Options::default()
            },
        )
    }
}

impl Provider for SaphyrYaml {
    fn metadata(&self) -> Metadata {
        Metadata::from("Saphyr YAML", self.path.as_path())
    }

    fn data(&self) -> Result<std::collections::BTreeMap<Profile, Dict>, figment::Error> {
        let value = Self::parse_value(&self.contents).map_err(|err| {
            figment::Error::from(Kind::Message(format!(
                "failed to parse {}: {err}",
                self.path.display()
            )))
        })?;
        let actual = value.to_actual();
        let dict = value
            .into_dict()
            .ok_or_else(|| figment::Error::from(Kind::InvalidType(actual, "map".into())))?;
        Ok(Profile::Default.collect(dict))
    }
}
