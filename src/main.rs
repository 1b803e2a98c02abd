use std::{path::PathBuf, process};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use gltfmin::{
    conversion::{Converter, Options},
    format::gltf::{GltfExporter, GltfImporter},
};

/// Extracts or re-embeds the buffers and images of a glTF document.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Input .gltf or .glb file.
    #[arg(long)]
    infile: PathBuf,
    /// Output directory. Defaults to a "minified" directory next to the input.
    #[arg(long)]
    outdir: Option<PathBuf>,
    /// Scale factor for texture resources. Currently ignored.
    #[arg(long, default_value_t = 0.)]
    scale: f32,
    /// Expose embedded resources as standalone files.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    expose: bool,
    /// Drop the data of embedded buffers when they are not exposed.
    #[arg(long)]
    flatten: bool,
    /// Indent the JSON of the output document.
    #[arg(long)]
    pretty: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run(Args::parse()) {
        log::error!("{:#}", err);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let converter = Converter::new(
        GltfImporter::default(),
        GltfExporter {
            pretty: args.pretty,
        },
        Options {
            expose: args.expose,
            scale: args.scale,
            flatten: args.flatten,
        },
    );

    let output = converter
        .convert(&args.infile, args.outdir.as_deref())
        .with_context(|| format!("Failed to convert \"{}\"", args.infile.display()))?;
    log::info!("Wrote \"{}\"", output.display());

    Ok(())
}
