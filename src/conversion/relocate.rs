use crate::format::gltf::data_uri;

use super::{
    resource::{relocated_uri, uri_to_path, Kind, Location, Resource},
    Asset, Document, Options,
};

/// Rewrites the reference of every resolved record so that it matches where its bytes end up,
/// and returns the resource files that have to be written next to the output document.
///
/// External resources are always copied, below the output directory even when the reference
/// climbs out of the source directory. Embedded resources and the GLB chunk are written out
/// when `expose` is set; otherwise embedded resources are re-encoded inline with their original
/// scheme prefix and the GLB chunk stays in the container.
pub fn relocate(
    document: &mut Document,
    resources: Vec<Resource>,
    options: &Options,
) -> Vec<Asset> {
    let mut assets = Vec::new();
    for resource in resources {
        let Resource {
            kind,
            index,
            location,
            mime_type,
            bytes,
        } = resource;

        let from_container = location == Location::Binary;
        let uri = match location {
            Location::External { uri } => {
                let target = relocated_uri(&uri);
                assets.push(Asset::new(bytes, uri_to_path(&target)));
                if target == uri {
                    continue;
                }
                log::debug!("Moved {} {} from \"{}\" to \"{}\"", kind, index, uri, target);
                target
            }
            Location::Embedded { prefix } if !options.expose => data_uri::encode(&prefix, &bytes),
            Location::Binary if !options.expose => continue,
            Location::Embedded { .. } | Location::Binary => {
                let file_name = kind.file_name(index);
                if let Some(mime_type) = mime_type.filter(|_| kind == Kind::Image) {
                    if mime_type != "image/png" {
                        log::warn!(
                            "Image {} is \"{}\" but is written as \"{}\"",
                            index,
                            mime_type,
                            file_name
                        );
                    }
                }
                if from_container {
                    document.blob = None;
                }
                assets.push(Asset::new(bytes, &file_name));
                file_name
            }
        };

        document.set_uri(kind, index, uri);
    }

    assets
}
