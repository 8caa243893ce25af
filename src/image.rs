use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use std::fmt;

fn null_to_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let actual: Option<T> = Option::deserialize(de)?;
    Ok(actual.unwrap_or_default())
}

/// One mirror of an image as listed by the index
///
/// Fields missing or `null` in the response are read as empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    /// original reference, e.g. `nginx:1.25`
    #[serde(default, deserialize_with = "null_to_default")]
    pub source: String,
    /// address to pull the mirror from
    #[serde(default, deserialize_with = "null_to_default")]
    pub mirror: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub platform: String,
    /// human readable size, as sent by the index
    #[serde(default, deserialize_with = "null_to_default")]
    pub size: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub created_at: String,
}

impl ImageRecord {
    /// Tag part of the source reference (everything after the first `:`).
    pub fn tag(&self) -> Option<&str> {
        self.source.split_once(':').map(|(_, tag)| tag)
    }
}

impl fmt::Display for ImageRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.source, self.platform)
    }
}

/// Body of `GET <endpoint>?search=<term>`
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub count: i64,
    #[serde(default)]
    pub error: bool,
    #[serde(deserialize_with = "null_to_default", default = "Vec::default")]
    pub results: Vec<ImageRecord>,
}

/// Equality constraints applied to search results
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterCriteria {
    pub platform: Option<String>,
    pub tag: Option<String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn platform<S: Into<String>>(&mut self, platform: S) -> &mut Self {
        self.platform = Some(platform.into());
        self
    }

    pub fn tag<S: Into<String>>(&mut self, tag: S) -> &mut Self {
        self.tag = Some(tag.into());
        self
    }

    /// An empty string constrains nothing, same as `None`.
    fn active(value: &Option<String>) -> Option<&str> {
        value.as_deref().filter(|v| !v.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        Self::active(&self.platform).is_none() && Self::active(&self.tag).is_none()
    }

    pub fn matches(&self, record: &ImageRecord) -> bool {
        if let Some(platform) = Self::active(&self.platform) {
            if record.platform != platform {
                return false;
            }
        }
        if let Some(tag) = Self::active(&self.tag) {
            if record.tag() != Some(tag) {
                return false;
            }
        }
        true
    }
}

/// Keep the records satisfying every criterion, in their original order.
pub fn filter_images(records: Vec<ImageRecord>, criteria: &FilterCriteria) -> Vec<ImageRecord> {
    if criteria.is_empty() {
        return records;
    }
    records
        .into_iter()
        .filter(|record| criteria.matches(record))
        .collect()
}

/// Creation date shortened for display: its first 10 characters.
pub fn display_date(created_at: &str) -> &str {
    match created_at.char_indices().nth(10) {
        Some((end, _)) => &created_at[..end],
        None => created_at,
    }
}
