use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::error::{Error, Result};

pub use self::{
    asset::Asset,
    document::{Container, Document},
    relocate::relocate,
    resource::{resolve_buffers, resolve_images, Kind, Location, Resource},
};

mod asset;
mod document;
mod relocate;
mod resource;

/// Controls what happens to the resources of a document.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Write embedded resources to standalone files. When unset, they are kept inline.
    pub expose: bool,
    /// Texture scale factor. Accepted but not applied.
    pub scale: f32,
    /// Drop the payload of embedded buffers that are kept inline instead of re-encoding it.
    pub flatten: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            expose: true,
            scale: 0.,
            flatten: false,
        }
    }
}

/// Defines a type that can load a document from an asset file.
pub trait Importer {
    /// Parses the asset into a document.
    fn import(&self, asset: &Asset) -> Result<Document>;
    /// Returns the file extensions supported by the importer.
    ///
    /// The extension should not include the period (e.g "zip", not ".zip").
    fn extensions(&self) -> &[&str];
}

/// Defines a type that can serialize a document into an asset file.
pub trait Exporter {
    /// Exports the document into a file whose path is relative to the output directory.
    fn export(&self, document: &Document) -> Result<Asset>;
}

/// Reads a document, moves its resources and writes the result to an output directory.
pub struct Converter {
    pub options: Options,
    importer: Box<dyn Importer>,
    exporter: Box<dyn Exporter>,
}

impl Converter {
    pub fn new(
        importer: impl Importer + 'static,
        exporter: impl Exporter + 'static,
        options: Options,
    ) -> Self {
        Self {
            options,
            importer: Box::new(importer),
            exporter: Box::new(exporter),
        }
    }

    /// Converts `infile` and writes the result to `outdir`, which defaults to a `minified`
    /// directory next to the input. Returns the path of the written document.
    ///
    /// Nothing is written until every resource has been resolved and the document has been
    /// serialized. Files that were written before a failure are left in place.
    pub fn convert(&self, infile: &Path, outdir: Option<&Path>) -> Result<PathBuf> {
        if infile.as_os_str().is_empty() {
            return Err(Error::MissingInput);
        }
        let extension = infile
            .extension()
            .and_then(|extension| extension.to_str())
            .unwrap_or_default()
            .to_lowercase();
        if !self.importer.extensions().contains(&extension.as_str()) {
            return Err(Error::UnsupportedFormat(extension));
        }

        let asset = Asset::from_path(infile)?;
        let outdir = match outdir {
            Some(outdir) => outdir.to_owned(),
            None => asset.parent_dir().join("minified"),
        };

        log::info!("Importing \"{}\"...", infile.display());
        let mut document = self.importer.import(&asset)?;

        let mut resources = resolve_buffers(&document, &self.options)?;
        resources.append(&mut resolve_images(&document, &self.options)?);
        let mut assets = relocate(&mut document, resources, &self.options);
        assets.push(self.exporter.export(&document)?);

        fs::create_dir_all(&outdir).map_err(|source| Error::CreateDir {
            path: outdir.clone(),
            source,
        })?;

        let mut output = outdir.clone();
        for asset in &assets {
            output = asset.write_to(&outdir)?;
            log::info!("Exported \"{}\"", output.display());
        }

        Ok(output)
    }
}
