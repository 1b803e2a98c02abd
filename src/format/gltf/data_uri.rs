// Adapted from https://github.com/bevyengine/bevy/blob/c6fec1f0c256597af9746050dd1a4dcd3b80fe24/crates/bevy_gltf/src/loader.rs#L742

/// An inline `data:` URI, e.g. `data:application/octet-stream;base64,AAAA`.
#[derive(Debug, PartialEq)]
pub struct DataUri<'a> {
    /// The media type, without the `;base64` marker. May be empty.
    pub mime_type: &'a str,
    /// Whether the payload is base64 encoded.
    pub base64: bool,
    /// The payload, everything after the first comma.
    pub data: &'a str,
    prefix: &'a str,
}

impl<'a> DataUri<'a> {
    /// Parses `uri`. Returns `None` when it isn't a data URI, which makes it a file reference.
    pub fn parse(uri: &'a str) -> Option<DataUri<'a>> {
        let header = uri.strip_prefix("data:")?;
        let comma = memchr::memchr(b',', header.as_bytes())?;
        let (mime_type, data) = (&header[..comma], &header[comma + 1..]);

        let (mime_type, base64) = match mime_type.strip_suffix(";base64") {
            Some(mime_type) => (mime_type, true),
            None => (mime_type, false),
        };

        Some(DataUri {
            mime_type,
            base64,
            data,
            prefix: &uri[..uri.len() - data.len()],
        })
    }

    /// The scheme prefix of the URI, up to and including the first comma.
    pub fn prefix(&self) -> &'a str {
        self.prefix
    }

    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        if self.base64 {
            base64::decode(self.data)
        } else {
            Ok(self.data.as_bytes().to_owned())
        }
    }
}

/// Builds a data URI from a scheme prefix (as returned by [`DataUri::prefix`]) and a payload.
/// The payload is base64 encoded unless the prefix says otherwise.
pub fn encode(prefix: &str, bytes: &[u8]) -> String {
    if prefix.ends_with(";base64,") {
        format!("{}{}", prefix, base64::encode(bytes))
    } else {
        format!("{}{}", prefix, String::from_utf8_lossy(bytes))
    }
}
