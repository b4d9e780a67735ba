use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Result token the server returns for an accepted move.
pub const MOVE_OK: &str = "OK";

/// Base64-encoded PNG bytes as delivered by the server.
///
/// The server may send `null` or omit the field entirely for places and things
/// that have not been illustrated yet; both decode to an empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ImageData(String);

impl ImageData {
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// The encoded text, unchanged.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Inline image source suitable for an `<img src=..>` or a terminal image protocol.
    pub fn data_uri(&self) -> String {
        format!("data:image/png;base64,{}", self.0)
    }

    /// Approximate size of the decoded image in bytes (0 when absent).
    pub fn approx_decoded_len(&self) -> usize {
        let trimmed = self.0.trim().trim_end_matches('=');
        trimmed.len() * 3 / 4
    }
}

impl<'de> Deserialize<'de> for ImageData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(Self(raw.unwrap_or_default()))
    }
}

/// The place the player currently occupies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationEntry {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub image: ImageData,
}

/// Body of `GET /location`: the entry itself plus an optional gate update.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LocationResponse {
    #[serde(flatten)]
    pub entry: LocationEntry,
    #[serde(default, deserialize_with = "present_gate")]
    pub allowed_buttons: Option<GatePayload>,
}

/// One record from `/location/items`, `/inventory` or `/enemies`.
///
/// Enemies carry no `item_type` and items may lack a description, so both default to empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionEntry {
    pub name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub description: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub item_type: String,
    #[serde(default)]
    pub image: ImageData,
}

/// Body of `POST /move`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MoveResponse {
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default, deserialize_with = "present_gate")]
    pub allowed_buttons: Option<GatePayload>,
}

impl MoveResponse {
    /// Only the exact token `"OK"` counts as success; anything else, including absence, is a failure.
    pub fn is_ok(&self) -> bool {
        self.result.as_deref() == Some(MOVE_OK)
    }
}

/// Body of `POST /take`, `/drop` and `/attack`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ActionResponse {
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default, deserialize_with = "present_gate")]
    pub allowed_buttons: Option<GatePayload>,
}

/// The `allowed_buttons` mapping as sent by the server.
///
/// Decoding never fails: anything that is not an object grants nothing, and any
/// key whose value is not literally `true` is recorded as forbidden.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GatePayload(BTreeMap<String, bool>);

impl GatePayload {
    pub fn from_value(value: &Value) -> Self {
        let Value::Object(map) = value else {
            return Self::default();
        };
        Self(
            map.iter()
                .map(|(key, allowed)| (key.clone(), allowed.as_bool().unwrap_or(false)))
                .collect(),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(key, allowed)| (key.as_str(), *allowed))
    }

    pub fn into_inner(self) -> BTreeMap<String, bool> {
        self.0
    }
}

impl<K: Into<String>> FromIterator<(K, bool)> for GatePayload {
    fn from_iter<T: IntoIterator<Item = (K, bool)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(key, allowed)| (key.into(), allowed)).collect())
    }
}

impl<'de> Deserialize<'de> for GatePayload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&raw))
    }
}

/// A present `allowed_buttons` key always yields `Some`, even when it holds `null` or junk.
fn present_gate<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<GatePayload>, D::Error> {
    let raw = Value::deserialize(deserializer)?;
    Ok(Some(GatePayload::from_value(&raw)))
}

fn nullable_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.unwrap_or_default())
}
