use std::{io, path::PathBuf};

/// Errors produced while minifying a glTF document.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("an input file is required")]
    MissingInput,

    #[error("unsupported file extension \"{0}\"")]
    UnsupportedFormat(String),

    #[error("failed to read \"{path}\"")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write \"{path}\"")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create the directory \"{path}\"")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse \"{path}\"")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid GLB container")]
    Container(#[source] gltf::Error),

    #[error("truncated GLB container: {0} bytes, header length {1}")]
    TruncatedContainer(usize, u32),

    #[error("malformed data URI in {0}")]
    DataUri(String, #[source] base64::DecodeError),

    #[error("buffer {index} has the unsupported MIME type \"{mime_type}\"")]
    UnsupportedBuffer { index: usize, mime_type: String },

    #[error("\"{0}\" does not name a file")]
    InvalidFileName(PathBuf),

    #[error("failed to serialize the document")]
    Serialize(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
