use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
};

use gltfmin::{
    conversion::{Container, Converter, Document, Exporter, Options},
    format::gltf::{GltfExporter, GltfImporter},
    Error,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

const MESH: &[u8] = &[0, 0, 128, 63, 0, 0, 0, 64, 0, 0, 64, 64];
const TEXTURE: &[u8] = &[0x89, b'P', b'N', b'G', 13, 10, 26, 10];

fn converter(options: Options) -> Converter {
    Converter::new(GltfImporter::default(), GltfExporter::default(), options)
}

fn internalizing() -> Options {
    Options {
        expose: false,
        ..Default::default()
    }
}

fn write_scene(dir: &Path, name: &str, json: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, json).unwrap();
    path
}

fn read_root(path: &Path) -> Value {
    serde_json::from_slice(&fs::read(path).unwrap()).unwrap()
}

fn embedded_scene() -> String {
    format!(
        r#"{{
            "asset": {{"version": "2.0"}},
            "buffers": [{{"byteLength": {}, "uri": "data:application/octet-stream;base64,{}"}}],
            "images": [{{"uri": "data:image/png;base64,{}"}}]
        }}"#,
        MESH.len(),
        base64::encode(MESH),
        base64::encode(TEXTURE)
    )
}

#[test]
fn external_resources_are_copied_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("mesh.bin"), MESH).unwrap();
    fs::create_dir(dir.path().join("textures")).unwrap();
    fs::write(dir.path().join("textures/wood.png"), TEXTURE).unwrap();
    let infile = write_scene(
        dir.path(),
        "scene.gltf",
        r#"{
            "asset": {"version": "2.0"},
            "buffers": [{"byteLength": 12, "uri": "mesh.bin"}],
            "images": [{"uri": "textures/wood.png"}]
        }"#,
    );
    let outdir = dir.path().join("out");

    let output = converter(internalizing())
        .convert(&infile, Some(&outdir))
        .unwrap();

    assert_eq!(outdir.join("scene.gltf"), output);
    assert_eq!(MESH, fs::read(outdir.join("mesh.bin")).unwrap());
    assert_eq!(TEXTURE, fs::read(outdir.join("textures/wood.png")).unwrap());

    let root = read_root(&output);
    assert_eq!(Some("mesh.bin"), root["buffers"][0]["uri"].as_str());
    assert_eq!(Some("textures/wood.png"), root["images"][0]["uri"].as_str());
}

#[test]
fn embedded_resources_are_exposed() {
    let dir = tempfile::tempdir().unwrap();
    let infile = write_scene(dir.path(), "scene.gltf", &embedded_scene());
    let outdir = dir.path().join("out");

    let output = converter(Options::default())
        .convert(&infile, Some(&outdir))
        .unwrap();

    assert_eq!(MESH, fs::read(outdir.join("buffer_0.bin")).unwrap());
    assert_eq!(TEXTURE, fs::read(outdir.join("image_0.png")).unwrap());

    let root = read_root(&output);
    assert_eq!(Some("buffer_0.bin"), root["buffers"][0]["uri"].as_str());
    assert_eq!(Some("image_0.png"), root["images"][0]["uri"].as_str());
}

#[test]
fn embedded_resources_are_internalized() {
    let dir = tempfile::tempdir().unwrap();
    let infile = write_scene(dir.path(), "scene.gltf", &embedded_scene());
    let outdir = dir.path().join("out");

    let output = converter(internalizing())
        .convert(&infile, Some(&outdir))
        .unwrap();

    let root = read_root(&output);
    let image_uri = root["images"][0]["uri"].as_str().unwrap();
    let payload = image_uri.strip_prefix("data:image/png;base64,").unwrap();
    assert_eq!(TEXTURE, base64::decode(payload).unwrap());

    let buffer_uri = root["buffers"][0]["uri"].as_str().unwrap();
    let payload = buffer_uri
        .strip_prefix("data:application/octet-stream;base64,")
        .unwrap();
    assert_eq!(MESH, base64::decode(payload).unwrap());

    // Only the document itself is written.
    assert_eq!(1, fs::read_dir(&outdir).unwrap().count());
}

#[test]
fn embedded_buffers_are_flattened() {
    let dir = tempfile::tempdir().unwrap();
    let infile = write_scene(dir.path(), "scene.gltf", &embedded_scene());
    let options = Options {
        expose: false,
        flatten: true,
        ..Default::default()
    };

    let output = converter(options).convert(&infile, None).unwrap();

    let root = read_root(&output);
    assert_eq!(
        Some("data:application/octet-stream;base64,"),
        root["buffers"][0]["uri"].as_str()
    );
    assert!(root["images"][0]["uri"].as_str().unwrap().len() > "data:image/png;base64,".len());
}

#[test]
fn converting_the_output_again_is_stable() {
    let dir = tempfile::tempdir().unwrap();
    let infile = write_scene(dir.path(), "scene.gltf", &embedded_scene());

    let first = converter(Options::default()).convert(&infile, None).unwrap();
    let second = converter(Options::default()).convert(&first, None).unwrap();

    let first_dir = dir.path().join("minified");
    let second_dir = first_dir.join("minified");
    assert_eq!(second_dir.join("scene.gltf"), second);
    for name in ["buffer_0.bin", "image_0.png"] {
        assert_eq!(
            fs::read(first_dir.join(name)).unwrap(),
            fs::read(second_dir.join(name)).unwrap()
        );
    }
    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[test]
fn missing_output_parents_are_created() {
    let dir = tempfile::tempdir().unwrap();
    let infile = write_scene(dir.path(), "scene.gltf", &embedded_scene());
    let outdir = dir.path().join("a/b/c");

    converter(Options::default())
        .convert(&infile, Some(&outdir))
        .unwrap();

    assert!(outdir.join("scene.gltf").is_file());
    assert!(outdir.join("buffer_0.bin").is_file());
}

#[test]
fn glb_chunk_is_exposed() {
    let dir = tempfile::tempdir().unwrap();
    let root = json!({"asset": {"version": "2.0"}, "buffers": [{"byteLength": MESH.len()}]});
    let glb = GltfExporter::default()
        .export(&Document::new(
            root,
            Some(MESH.to_vec()),
            Container::Binary,
            "scene.glb",
        ))
        .unwrap();
    glb.write_to(dir.path()).unwrap();

    let output = converter(Options::default())
        .convert(&dir.path().join("scene.glb"), None)
        .unwrap();

    assert_eq!(MESH, fs::read(dir.path().join("minified/buffer_0.bin")).unwrap());
    let bytes = fs::read(&output).unwrap();
    let glb = gltf::Glb::from_slice(&bytes).unwrap();
    assert!(glb.bin.is_none());
    let root: Value = serde_json::from_slice(&glb.json).unwrap();
    assert_eq!(Some("buffer_0.bin"), root["buffers"][0]["uri"].as_str());
}

#[test]
fn unknown_scene_data_passes_through() {
    let dir = tempfile::tempdir().unwrap();
    let infile = write_scene(
        dir.path(),
        "scene.gltf",
        &format!(
            r#"{{
                "asset": {{"version": "2.0", "generator": "hand"}},
                "extensionsUsed": ["KHR_materials_clearcoat", "EXT_vendor_thing"],
                "materials": [{{
                    "name": "paint",
                    "extensions": {{"KHR_materials_clearcoat": {{"clearcoatFactor": 1.0}}}}
                }}],
                "buffers": [{{
                    "byteLength": {},
                    "uri": "data:application/octet-stream;base64,{}",
                    "extensions": {{"EXT_vendor_thing": {{"level": 3}}}}
                }}],
                "extras": {{"author": "someone"}}
            }}"#,
            MESH.len(),
            base64::encode(MESH)
        ),
    );

    let output = converter(Options::default()).convert(&infile, None).unwrap();

    let mut expected: Value = serde_json::from_slice(&fs::read(&infile).unwrap()).unwrap();
    expected["buffers"][0]["uri"] = json!("buffer_0.bin");
    assert_eq!(expected, read_root(&output));
}

#[test]
fn shared_textures_are_copied_below_the_output() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("models")).unwrap();
    fs::create_dir_all(dir.path().join("shared")).unwrap();
    fs::write(dir.path().join("shared/old wood.png"), TEXTURE).unwrap();
    let infile = write_scene(
        &dir.path().join("models"),
        "scene.gltf",
        r#"{"asset": {"version": "2.0"}, "images": [{"uri": "../shared/old%20wood.png"}]}"#,
    );

    let output = converter(internalizing()).convert(&infile, None).unwrap();

    let outdir = dir.path().join("models/minified");
    assert_eq!(
        TEXTURE,
        fs::read(outdir.join("shared/old wood.png")).unwrap()
    );
    assert_eq!(
        Some("shared/old%20wood.png"),
        read_root(&output)["images"][0]["uri"].as_str()
    );
}

#[test]
fn buffers_without_data_are_kept() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.bin"), MESH).unwrap();
    let infile = write_scene(
        dir.path(),
        "scene.gltf",
        r#"{"asset": {"version": "2.0"}, "buffers": [{"uri": "a.bin", "byteLength": 12}, {"byteLength": 16}]}"#,
    );

    let output = converter(Options::default()).convert(&infile, None).unwrap();

    let root = read_root(&output);
    assert_eq!(json!({"byteLength": 16}), root["buffers"][1]);
    assert_eq!(MESH, fs::read(dir.path().join("minified/a.bin")).unwrap());
}

#[test]
fn missing_resource_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let infile = write_scene(
        dir.path(),
        "scene.gltf",
        r#"{"asset": {"version": "2.0"}, "images": [{"uri": "missing.png"}]}"#,
    );

    let result = converter(Options::default()).convert(&infile, None);

    assert!(matches!(result, Err(Error::Read { .. })));
    assert!(!dir.path().join("minified").exists());
}

#[test]
fn invalid_inputs() {
    let dir = tempfile::tempdir().unwrap();
    let converter = converter(Options::default());

    assert!(matches!(
        converter.convert(Path::new(""), Some(&dir.path().join("out"))),
        Err(Error::MissingInput)
    ));
    assert!(matches!(
        converter.convert(&dir.path().join("scene.obj"), None),
        Err(Error::UnsupportedFormat(_))
    ));
    assert!(matches!(
        converter.convert(&dir.path().join("missing.gltf"), None),
        Err(Error::Read { .. })
    ));
    assert!(!dir.path().join("out").exists());
    assert!(!dir.path().join("minified").exists());
}

#[test]
fn cli_exit_status() {
    let dir = tempfile::tempdir().unwrap();
    let outdir = dir.path().join("out");

    let status = Command::new(env!("CARGO_BIN_EXE_gltfmin"))
        .args(["--infile", ""])
        .arg("--outdir")
        .arg(&outdir)
        .status()
        .unwrap();
    assert!(!status.success());
    assert!(!outdir.exists());

    let infile = write_scene(dir.path(), "scene.gltf", &embedded_scene());
    let status = Command::new(env!("CARGO_BIN_EXE_gltfmin"))
        .arg("--infile")
        .arg(&infile)
        .arg("--outdir")
        .arg(&outdir)
        .args(["--expose", "false"])
        .status()
        .unwrap();
    assert!(status.success());
    assert!(outdir.join("scene.gltf").is_file());
    assert!(!outdir.join("buffer_0.bin").exists());
}
