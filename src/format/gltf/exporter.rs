use std::path::PathBuf;

use gltf::Glb;

use crate::{
    conversion::{Asset, Container, Document, Exporter},
    error::{Error, Result},
};

/// Writes a document back in the container it was read from, under its original file name.
#[derive(Default)]
pub struct GltfExporter {
    /// Indent the JSON output.
    pub pretty: bool,
}

// https://www.khronos.org/registry/glTF/specs/2.0/glTF-2.0.html#binary-gltf-layout
impl Exporter for GltfExporter {
    fn export(&self, document: &Document) -> Result<Asset> {
        let file_name = document
            .file_name()
            .ok_or_else(|| Error::InvalidFileName(document.path().to_owned()))?;

        let json_string = if self.pretty {
            serde_json::to_string_pretty(&document.root)
        } else {
            serde_json::to_string(&document.root)
        }
        .map_err(Error::Serialize)?;

        let bytes = match document.container {
            Container::Json => json_string.into_bytes(),
            Container::Binary => Glb {
                header: gltf::binary::Header {
                    magic: *b"glTF",
                    version: 2,
                    // Computed by `to_vec`, along with the chunk padding.
                    length: 0,
                },
                json: json_string.into_bytes().into(),
                bin: document.blob.as_deref().map(Into::into),
            }
            .to_vec()
            .map_err(Error::Container)?,
        };

        Ok(Asset::new(bytes, PathBuf::from(file_name)))
    }
}
