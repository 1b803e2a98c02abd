use std::borrow::Cow;

use gltf::Glb;
use serde_json::Value;

use crate::{
    conversion::{Asset, Container, Document, Importer},
    error::{Error, Result},
};

const GLB_HEADER_SIZE: usize = 12;

/// Loads `.gltf` and `.glb` files. The document is kept as a JSON tree and is not validated.
#[derive(Default)]
pub struct GltfImporter {}

impl Importer for GltfImporter {
    fn import(&self, asset: &Asset) -> Result<Document> {
        let parse = |bytes: &[u8]| {
            serde_json::from_slice::<Value>(bytes).map_err(|source| Error::Parse {
                path: asset.path().to_owned(),
                source,
            })
        };

        if asset.bytes.starts_with(b"glTF") {
            check_header(&asset.bytes)?;
            let glb = Glb::from_slice(&asset.bytes).map_err(Error::Container)?;
            let root = parse(glb.json.as_ref())?;
            let blob = glb.bin.map(Cow::into_owned);
            Ok(Document::new(root, blob, Container::Binary, asset.path()))
        } else {
            let root = parse(&asset.bytes)?;
            Ok(Document::new(root, None, Container::Json, asset.path()))
        }
    }

    fn extensions(&self) -> &[&str] {
        &["gltf", "glb"]
    }
}

/// `Glb::from_slice` assumes the length in the header covers at least the header itself.
fn check_header(bytes: &[u8]) -> Result<()> {
    if bytes.len() < GLB_HEADER_SIZE {
        return Err(Error::TruncatedContainer(bytes.len(), 0));
    }
    let length = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
    if (length as usize) < GLB_HEADER_SIZE || length as usize > bytes.len() {
        return Err(Error::TruncatedContainer(bytes.len(), length));
    }
    Ok(())
}
