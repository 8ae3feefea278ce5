//! Environment provider producing override-layer entry trees.
//!
//! Wraps `figment::providers::Env`, nesting keys on `__` so that
//! `ATTRS_RVM__DEFAULT_RUBY=ruby-2.0.0` sets `rvm/default_ruby`. Values
//! starting with `[` or `{` are read as JSON
//! (`ATTRS_RVM__RUBIES='["ruby-2.0.0","jruby"]'`); everything else stays a
//! string, commas included. Typed coercion happens later against the
//! declared kind.

use figment::providers::Env;
use figment::{
    Metadata, Profile, Provider,
    error::Error,
    util::nest,
    value::{Dict, Map, Value},
};
use std::ops::Deref;

/// Separator between path segments in environment variable names.
pub const ENV_SEGMENT_SEPARATOR: &str = "__";

/// Environment provider with JSON collections and string-only scalars.
#[derive(Clone)]
pub struct AttrEnv {
    inner: Env,
}

impl AttrEnv {
    /// Create a provider reading variables that start with `prefix`.
    ///
    /// The prefix is stripped, keys are lowercased and split on `__`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cookbook_attrs::layers::AttrEnv;
    /// use figment::{Figment, Jail};
    /// use serde_json::{Value, json};
    ///
    /// Jail::expect_with(|jail| {
    ///     jail.set_env("ATTRS_RVM__INSTALLER_URL", "http://x/install?a=1,b=2");
    ///     jail.set_env("ATTRS_RVM__RUBIES", r#"["ruby-2.0.0", "jruby"]"#);
    ///     let tree: Value = Figment::from(AttrEnv::prefixed("ATTRS_")).extract()?;
    ///     assert_eq!(tree["rvm"]["installer_url"], json!("http://x/install?a=1,b=2"));
    ///     assert_eq!(tree["rvm"]["rubies"], json!(["ruby-2.0.0", "jruby"]));
    ///     Ok(())
    /// });
    /// ```
    #[must_use]
    pub fn prefixed(prefix: &str) -> Self {
        Env::prefixed(prefix).split(ENV_SEGMENT_SEPARATOR).into()
    }

    fn parse_value(key: &str, raw: &str) -> Result<Value, Error> {
        if !raw.trim_start().starts_with(['[', '{']) {
            return Ok(Value::from(raw.to_owned()));
        }
        let structured: serde_json::Value = serde_json::from_str(raw).map_err(|err| {
            Error::from(format!("environment key `{key}` holds invalid JSON: {err}"))
        })?;
        Value::serialize(structured)
    }
}

impl Provider for AttrEnv {
    fn metadata(&self) -> Metadata {
        self.inner.metadata()
    }

    fn profile(&self) -> Option<Profile> {
        Some(self.inner.profile.clone())
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let mut dict = Dict::new();
        for (k, v) in self.inner.iter() {
            let value = Self::parse_value(k.as_str(), &v)?;
            let Some(nested) = nest(k.as_str(), value).into_dict() else {
                return Err(Error::from(format!(
                    "environment key `{k}` produced a non-object value"
                )));
            };
            merge_dict(&mut dict, nested);
        }
        Ok(self.inner.profile.collect(dict))
    }
}

/// Deep-merge `incoming` into `target` so sibling keys under a shared
/// prefix (`RVM__BRANCH`, `RVM__UPGRADE`) both survive.
fn merge_dict(target: &mut Dict, incoming: Dict) {
    for (key, value) in incoming {
        if let (Some(Value::Dict(_, existing)), Value::Dict(_, nested)) =
            (target.get_mut(&key), &value)
        {
            merge_dict(existing, nested.clone());
            continue;
        }
        target.insert(key, value);
    }
}

impl From<Env> for AttrEnv {
    fn from(inner: Env) -> Self {
        Self { inner }
    }
}

impl Deref for AttrEnv {
    type Target = Env;

    fn deref(&self) -> &Env {
        &self.inner
    }
}
