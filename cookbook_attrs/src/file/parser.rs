//! Format-specific parsing of manifest and layer files.

use camino::Utf8Path;
use figment::Figment;
use figment::providers::{Format, Json};
#[cfg(feature = "toml")]
use figment::providers::Toml;
use serde_json::Value;

use super::error::{file_error, invalid_data};
#[cfg(feature = "yaml")]
use super::yaml::SaphyrYaml;
use crate::AttrResult;

/// Parse file contents into a JSON document according to the extension.
///
/// `.json` is read as JSON, `.yaml`/`.yml` as YAML and anything else as TOML.
/// YAML and TOML need their features enabled.
///
/// # Errors
///
/// Returns an [`crate::AttrError::File`] when the contents fail to parse, the
/// format's feature is disabled, or the document is not a table.
pub(super) fn parse_document(path: &Utf8Path, data: &str) -> AttrResult<Value> {
    let figment = figment_for(path, data)?;
    let document: Value = figment
        .extract()
        .map_err(|err| file_error(path, err))?;
    if document.is_object() {
        Ok(document)
    } else {
        Err(invalid_data(path, "expected a table at the top level"))
    }
}

fn figment_for(path: &Utf8Path, data: &str) -> AttrResult<Figment> {
    let ext = path.extension().map(str::to_ascii_lowercase);
    let figment = match ext.as_deref() {
        Some("json") => Figment::from(Json::string(data)),
        Some("yaml" | "yml") => {
            #[cfg(feature = "yaml")]
            {
                Figment::from(SaphyrYaml::string(path.as_std_path(), data))
            }
            #[cfg(not(feature = "yaml"))]
            {
                return Err(file_error(
                    path,
                    std::io::Error::other(
                        "yaml feature disabled: enable the 'yaml' feature to support this file format",
                    ),
                ));
            }
        }
        _ => {
            #[cfg(feature = "toml")]
            {
                // Validate first so syntax errors carry this file's context.
                toml::from_str::<toml::Value>(data).map_err(|e| file_error(path, e))?;
                Figment::from(Toml::string(data))
            }
            #[cfg(not(feature = "toml"))]
            {
                return Err(file_error(
                    path,
                    std::io::Error::other(
                        "toml feature disabled: enable the 'toml' feature to support this file format",
                    ),
                ));
            }
        }
    };
    Ok(figment)
}
