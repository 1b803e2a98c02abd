pub use {exporter::GltfExporter, importer::GltfImporter};

pub mod data_uri;
mod exporter;
mod importer;
