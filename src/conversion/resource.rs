use std::{borrow::Cow, fmt, fs, path::PathBuf};

use crate::{
    error::{Error, Result},
    format::gltf::data_uri::DataUri,
};

use super::{document::string_field, Document, Options};

/// The kind of record a resource belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Buffer,
    Image,
}

impl Kind {
    /// The file name given to an embedded resource once it is written out.
    ///
    /// Images are always named `.png`, whatever their actual format.
    pub fn file_name(self, index: usize) -> String {
        match self {
            Kind::Buffer => format!("buffer_{}.bin", index),
            Kind::Image => format!("image_{}.png", index),
        }
    }
}

impl Kind {
    /// The name of the record list in the document root.
    pub fn key(self) -> &'static str {
        match self {
            Kind::Buffer => "buffers",
            Kind::Image => "images",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Buffer => write!(f, "buffer"),
            Kind::Image => write!(f, "image"),
        }
    }
}

/// Where the bytes of a record live in the source document.
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    /// An inline data URI. `prefix` is the URI up to and including the first comma.
    Embedded { prefix: String },
    /// A file referenced relative to the document. `uri` is the reference as written.
    External { uri: String },
    /// The binary chunk of a GLB container.
    Binary,
}

/// The resolved payload of a buffer or image record.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub kind: Kind,
    /// Index of the record in the document's buffer or image list.
    pub index: usize,
    pub location: Location,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Loads the bytes of every buffer of the document.
///
/// The payload of an embedded buffer is dropped when `flatten` is set and the buffer stays
/// inline. Likewise, the GLB chunk is only copied when it is going to be written out. Buffers
/// without any data to move are skipped.
pub fn resolve_buffers(document: &Document, options: &Options) -> Result<Vec<Resource>> {
    const VALID_MIME_TYPES: &[&str] = &["application/octet-stream", "application/gltf-buffer"];

    let mut resources = Vec::new();
    for (index, buffer) in document.buffers().iter().enumerate() {
        let (location, mime_type, bytes) = match string_field(buffer, "uri") {
            Some(uri) => match DataUri::parse(uri) {
                Some(data_uri) if VALID_MIME_TYPES.contains(&data_uri.mime_type) => {
                    let bytes = if !options.expose && options.flatten {
                        Vec::new()
                    } else {
                        decode(&data_uri, Kind::Buffer, index)?
                    };
                    (
                        Location::Embedded {
                            prefix: data_uri.prefix().to_owned(),
                        },
                        Some(data_uri.mime_type.to_owned()),
                        bytes,
                    )
                }
                Some(data_uri) => {
                    return Err(Error::UnsupportedBuffer {
                        index,
                        mime_type: data_uri.mime_type.to_owned(),
                    })
                }
                None => (
                    Location::External {
                        uri: uri.to_owned(),
                    },
                    None,
                    read_external(document, uri)?,
                ),
            },
            // Only the first buffer may refer to the GLB binary chunk.
            None => match document.blob.as_deref() {
                Some(blob) if index == 0 && options.expose => {
                    (Location::Binary, None, blob.to_vec())
                }
                Some(_) if index == 0 => (Location::Binary, None, Vec::new()),
                _ => {
                    log::warn!("Skipped buffer {}: it has no URI", index);
                    continue;
                }
            },
        };

        resources.push(Resource {
            kind: Kind::Buffer,
            index,
            location,
            mime_type,
            bytes,
        });
    }

    Ok(resources)
}

/// Loads the bytes of every image of the document. Images stored in buffer views are left
/// untouched and don't produce a resource.
pub fn resolve_images(document: &Document, options: &Options) -> Result<Vec<Resource>> {
    if options.scale > 0. {
        log::warn!(
            "Texture scaling is not supported, the scale factor {} is ignored",
            options.scale
        );
    }

    let mut resources = Vec::new();
    for (index, image) in document.images().iter().enumerate() {
        if image.get("bufferView").map_or(false, |view| !view.is_null()) {
            log::debug!("Skipped image {}: stored in a buffer view", index);
            continue;
        }
        let uri = match string_field(image, "uri") {
            Some(uri) => uri,
            None => {
                log::warn!("Skipped image {}: it has neither a URI nor a buffer view", index);
                continue;
            }
        };

        let mime_type = string_field(image, "mimeType").map(str::to_owned);
        let resource = match DataUri::parse(uri) {
            Some(data_uri) => Resource {
                kind: Kind::Image,
                index,
                location: Location::Embedded {
                    prefix: data_uri.prefix().to_owned(),
                },
                mime_type: mime_type.or_else(|| {
                    Some(data_uri.mime_type)
                        .filter(|mime_type| !mime_type.is_empty())
                        .map(str::to_owned)
                }),
                bytes: decode(&data_uri, Kind::Image, index)?,
            },
            None => Resource {
                kind: Kind::Image,
                index,
                location: Location::External {
                    uri: uri.to_owned(),
                },
                mime_type,
                bytes: read_external(document, uri)?,
            },
        };
        resources.push(resource);
    }

    Ok(resources)
}

/// The reference a copied file gets in the output directory: `uri` without the empty, `.` and
/// `..` segments, so that the copy always lands below the output directory.
/// `../shared/wood.png` becomes `shared/wood.png`.
pub fn relocated_uri(uri: &str) -> String {
    uri.split(|c: char| c == '/' || c == '\\')
        .filter(|segment| !matches!(*segment, "" | "." | ".."))
        .collect::<Vec<_>>()
        .join("/")
}

/// The file a relative reference names. References are percent-encoded; a reference that
/// doesn't decode to UTF-8 is used as written.
pub fn uri_to_path(uri: &str) -> PathBuf {
    PathBuf::from(
        urlencoding::decode(uri)
            .unwrap_or(Cow::Borrowed(uri))
            .into_owned(),
    )
}

fn read_external(document: &Document, uri: &str) -> Result<Vec<u8>> {
    let path = document.base_dir().join(uri_to_path(uri));
    fs::read(&path).map_err(|source| Error::Read { path, source })
}

fn decode(data_uri: &DataUri, kind: Kind, index: usize) -> Result<Vec<u8>> {
    data_uri
        .decode()
        .map_err(|err| Error::DataUri(format!("{} {}", kind, index), err))
}
