use serde_json::Value as JsonValue;
use std::borrow::Cow;
use std::collections::BTreeMap;

crate::api_struct!(
    /// Options that customize a single file load. Passing any options at all
    /// (even the defaults) marks the load as customized, which bypasses the
    /// transport cache for remote sources.
    pub struct LoadOptions {
        /// Decode the file content as JSON before returning it.
        pub json: bool,

        /// Additional headers to send with remote requests.
        /// Ignored for local sources.
        pub headers: BTreeMap<String, String>,
    }
);

impl LoadOptions {
    pub fn json() -> LoadOptions {
        LoadOptions {
            json: true,
            ..LoadOptions::default()
        }
    }

    pub fn with_header<K: AsRef<str>, V: AsRef<str>>(mut self, key: K, value: V) -> Self {
        self.headers
            .insert(key.as_ref().to_owned(), value.as_ref().to_owned());
        self
    }
}

/// Content of a loaded file, either the raw bytes or a decoded JSON document.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FileContent {
    Bytes(Vec<u8>),
    Json(JsonValue),
}

impl FileContent {
    /// Wrap the raw bytes, decoding them as JSON when requested.
    pub fn decode(bytes: Vec<u8>, json: bool) -> Result<FileContent, serde_json::Error> {
        if json {
            Ok(FileContent::Json(serde_json::from_slice(&bytes)?))
        } else {
            Ok(FileContent::Bytes(bytes))
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            FileContent::Bytes(bytes) => Some(bytes),
            FileContent::Json(_) => None,
        }
    }

    pub fn as_json(&self) -> Option<&JsonValue> {
        match self {
            FileContent::Bytes(_) => None,
            FileContent::Json(json) => Some(json),
        }
    }

    pub fn into_json(self) -> Option<JsonValue> {
        match self {
            FileContent::Bytes(_) => None,
            FileContent::Json(json) => Some(json),
        }
    }

    /// The `name` field of a manifest. Raw content is decoded on the fly,
    /// and anything that isn't a JSON object with a string name yields `None`.
    pub fn declared_name(&self) -> Option<String> {
        let extract = |json: &JsonValue| {
            json.get("name")
                .and_then(|name| name.as_str())
                .map(|name| name.to_owned())
        };

        match self {
            FileContent::Bytes(bytes) => serde_json::from_slice::<JsonValue>(bytes)
                .ok()
                .and_then(|json| extract(&json)),
            FileContent::Json(json) => extract(json),
        }
    }

    /// Lossy text form, JSON is pretty printed.
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            FileContent::Bytes(bytes) => String::from_utf8_lossy(bytes),
            FileContent::Json(json) => {
                Cow::Owned(serde_json::to_string_pretty(json).unwrap_or_default())
            }
        }
    }
}

impl From<Vec<u8>> for FileContent {
    fn from(bytes: Vec<u8>) -> Self {
        FileContent::Bytes(bytes)
    }
}

impl From<JsonValue> for FileContent {
    fn from(json: JsonValue) -> Self {
        FileContent::Json(json)
    }
}
