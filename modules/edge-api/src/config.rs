//! Configuration for the edge API module.

use std::fmt;

use secrecy::SecretString;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Configuration for the edge API module.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EdgeApiConfig {
    /// Value of the `source` field on calculation responses.
    /// `null` omits the field entirely.
    #[serde(default = "default_source_tag", deserialize_with = "deserialize_text")]
    pub source_tag: Option<String>,

    /// Where the current value is kept.
    #[serde(default)]
    pub store: StoreConfig,
}

impl Default for EdgeApiConfig {
    fn default() -> Self {
        Self {
            source_tag: default_source_tag(),
            store: StoreConfig::default(),
        }
    }
}

/// Which [`StateStore`](crate::domain::store::StateStore) implementation to wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// Process-local, lost on restart.
    #[default]
    Memory,
    /// Remote key-value REST service.
    Remote,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default)]
    pub remote: RemoteStoreConfig,
}

/// Connection settings for the remote key-value service.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemoteStoreConfig {
    /// Base URL, e.g. `https://kv.example.com`. Required for the remote backend.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Bearer token sent on every request.
    #[serde(
        default,
        serialize_with = "serialize_redacted",
        deserialize_with = "deserialize_secret"
    )]
    pub token: Option<SecretString>,

    /// Per-call timeout covering connect, request and body.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for RemoteStoreConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            token: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

#[allow(clippy::unnecessary_wraps)] // serde default for an Option field
fn default_source_tag() -> Option<String> {
    Some("serverless".to_owned())
}

fn default_timeout_ms() -> u64 {
    10_000
}

#[allow(clippy::ref_option)] // serde serialize_with signature
fn serialize_redacted<S>(token: &Option<SecretString>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match token {
        Some(_) => serializer.serialize_some("[REDACTED]"),
        None => serializer.serialize_none(),
    }
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = deserialize_text(deserializer)?;
    Ok(raw.filter(|t| !t.is_empty()).map(SecretString::from))
}

/// Optional string that also accepts numbers and booleans.
///
/// The environment provider types `APP__...=12345` as an integer before serde
/// sees it, so scalar values are turned back into their text.
fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_option(OptionalTextVisitor)
}

struct OptionalTextVisitor;

impl<'de> Visitor<'de> for OptionalTextVisitor {
    type Value = Option<String>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string, number, boolean or null")
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(TextVisitor).map(Some)
    }
}

struct TextVisitor;

impl Visitor<'_> for TextVisitor {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string, number or boolean")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(v.to_owned())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(v.to_string())
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(v.to_string())
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<Self::Value, E> {
        Ok(v.to_string())
    }

    fn visit_i128<E: de::Error>(self, v: i128) -> Result<Self::Value, E> {
        Ok(v.to_string())
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(v.to_string())
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(v.to_string())
    }
}
