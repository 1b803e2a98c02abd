use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};

use serde_json::Value;

use super::Kind;

/// How the document is stored on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    /// A `.gltf` JSON file.
    Json,
    /// A `.glb` binary container.
    Binary,
}

/// A glTF document, kept as the JSON tree it was read from. Only the `uri` of buffer and image
/// records is ever modified; everything else, including extensions the tool doesn't know
/// about, is written back as it was read.
#[derive(Debug)]
pub struct Document {
    pub root: Value,
    /// The binary chunk of a GLB container.
    pub blob: Option<Vec<u8>>,
    pub container: Container,
    path: PathBuf,
}

impl Document {
    pub fn new(
        root: Value,
        blob: Option<Vec<u8>>,
        container: Container,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            root,
            blob,
            container,
            path: path.into(),
        }
    }

    /// The path the document was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The directory relative references are resolved against.
    pub fn base_dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }

    /// The file name of the document, `None` if the path ends in `..`.
    pub fn file_name(&self) -> Option<&OsStr> {
        self.path.file_name()
    }

    pub fn buffers(&self) -> &[Value] {
        self.records(Kind::Buffer)
    }

    pub fn images(&self) -> &[Value] {
        self.records(Kind::Image)
    }

    fn records(&self, kind: Kind) -> &[Value] {
        self.root
            .get(kind.key())
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Points the record at `uri`. Missing or malformed records are left alone.
    pub fn set_uri(&mut self, kind: Kind, index: usize, uri: String) {
        let record = self
            .root
            .get_mut(kind.key())
            .and_then(|records| records.get_mut(index))
            .and_then(Value::as_object_mut);
        if let Some(record) = record {
            record.insert(String::from("uri"), Value::String(uri));
        }
    }
}

/// Reads a string field of a buffer or image record.
pub(crate) fn string_field<'a>(record: &'a Value, field: &str) -> Option<&'a str> {
    record.get(field).and_then(Value::as_str)
}
