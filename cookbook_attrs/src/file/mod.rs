//! Reading manifests and layer files through figment.

mod error;
mod loader;
mod parser;
#[cfg(feature = "yaml")]
mod yaml;

pub use loader::{load_layer_file, load_manifest, parse_layer, parse_manifest};
#[cfg(feature = "yaml")]
pub use yaml::SaphyrYaml;
