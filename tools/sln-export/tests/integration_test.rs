//! Integration tests for sln-export
//!
//! Tests the full pipeline: generate test assets -> convert -> verify output

mod generate_test_assets;

use sln_common::{
    SimgHeader, SmHeader, StHeader, SwHeader, WorldFormat, read_heightmap,
    read_mesh, read_texture, read_world,
};
use std::ffi::OsStr;
use std::process::{Command, Output};
use tempfile::tempdir;

fn run<I, S>(bin: &str, args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    Command::new(bin)
        .args(args)
        .output()
        .expect("Failed to run converter")
}

/// Test PLY -> SM conversion
#[test]
fn test_ply2sm_cube() {
    let dir = tempdir().expect("Failed to create temp dir");
    let ply_path = dir.path().join("cube.ply");
    let sm_path = dir.path().join("cube.sm");

    generate_test_assets::generate_cube_ply(&ply_path).expect("Failed to generate PLY");
    let out = run(env!("CARGO_BIN_EXE_ply2sm"), [&ply_path, &sm_path]);
    assert!(out.status.success(), "ply2sm failed: {}", String::from_utf8_lossy(&out.stderr));

    // One line on stdout naming the output
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(stdout.lines().count(), 1);
    assert!(stdout.contains("cube.sm"));

    let data = std::fs::read(&sm_path).expect("Failed to read mesh file");
    assert_eq!(data.len(), 412);
    let header = SmHeader::from_bytes(&data).expect("Failed to parse mesh header");
    assert_eq!(header.vertex_count, 8);
    assert_eq!(header.index_count, 36);

    // PLY is written as given, no axis conversion
    let mesh = read_mesh(&data).expect("Failed to decode mesh");
    assert_eq!(mesh.vertices[6].position, [-1.0, 1.0, 1.0]);
    assert_eq!(mesh.triangles[0], [0, 2, 1]);
}

/// A quad anywhere in the file fails the whole conversion
#[test]
fn test_ply2sm_rejects_quad() {
    let dir = tempdir().expect("Failed to create temp dir");
    let ply_path = dir.path().join("quad.ply");
    let sm_path = dir.path().join("quad.sm");

    generate_test_assets::generate_quad_ply(&ply_path).expect("Failed to generate PLY");
    let out = run(env!("CARGO_BIN_EXE_ply2sm"), [&ply_path, &sm_path]);
    assert!(!out.status.success());
    assert!(out.stdout.is_empty());
    assert!(!sm_path.exists(), "No partial output on failure");
}

/// Wrong argument count is a usage error
#[test]
fn test_converter_usage_error() {
    let dir = tempdir().expect("Failed to create temp dir");
    let only_input = dir.path().join("cube.ply");
    let out = run(env!("CARGO_BIN_EXE_ply2sm"), [&only_input]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Usage"));
}

/// Test BMP -> SIMG conversion
#[test]
fn test_bmp2simg_checkerboard() {
    let dir = tempdir().expect("Failed to create temp dir");
    let bmp_path = dir.path().join("checker.bmp");
    let simg_path = dir.path().join("checker.simg");

    generate_test_assets::generate_checkerboard_bmp(&bmp_path).expect("Failed to generate BMP");
    let out = run(env!("CARGO_BIN_EXE_bmp2simg"), [&bmp_path, &simg_path]);
    assert!(out.status.success(), "bmp2simg failed: {}", String::from_utf8_lossy(&out.stderr));

    let data = std::fs::read(&simg_path).expect("Failed to read texture file");
    let header = SimgHeader::from_bytes(&data).expect("Failed to parse texture header");
    assert_eq!((header.width, header.height), (4, 4));
    assert_eq!(data.len(), SimgHeader::SIZE + header.rgba8_size());

    let texture = read_texture(&data).expect("Failed to decode texture");
    assert_eq!(texture.pixel(0, 0), Some([255, 0, 0, 255]));
    assert_eq!(texture.pixel(1, 0), Some([0, 0, 255, 255]));
    assert_eq!(texture.pixel(0, 3), Some([0, 0, 255, 255]));
}

/// Test greyscale PNG -> ST conversion
#[test]
fn test_terrain2st_ramp() {
    let dir = tempdir().expect("Failed to create temp dir");
    let png_path = dir.path().join("terrain.png");
    let st_path = dir.path().join("terrain.st");

    generate_test_assets::generate_heightmap_png(&png_path, 5, 3)
        .expect("Failed to generate PNG");
    let out = run(env!("CARGO_BIN_EXE_terrain2st"), [&png_path, &st_path]);
    assert!(out.status.success(), "terrain2st failed: {}", String::from_utf8_lossy(&out.stderr));

    let data = std::fs::read(&st_path).expect("Failed to read heightmap file");
    let header = StHeader::from_bytes(&data).expect("Failed to parse heightmap header");
    assert_eq!((header.width, header.height), (5, 3));
    assert_eq!(data.len(), StHeader::SIZE + 5 * 3 * 4);

    let map = read_heightmap(&data).expect("Failed to decode heightmap");
    assert_eq!(map.sample(4, 2), Some(66.0));
    // File order is x outer, y inner
    assert_eq!(map.samples()[1], 1.0);
    assert_eq!(map.samples()[3], 16.0);
}

/// Test JSON scene -> SW conversion
#[test]
fn test_scene2sw() {
    let dir = tempdir().expect("Failed to create temp dir");
    let json_path = dir.path().join("scene.json");
    let sw_path = dir.path().join("world.sw");

    generate_test_assets::generate_scene_json(&json_path).expect("Failed to write scene");
    let out = run(env!("CARGO_BIN_EXE_scene2sw"), [&json_path, &sw_path]);
    assert!(out.status.success(), "scene2sw failed: {}", String::from_utf8_lossy(&out.stderr));

    let data = std::fs::read(&sw_path).expect("Failed to read world file");
    let header = SwHeader::from_bytes(&data).expect("Failed to parse world header");
    assert_eq!(header.model_count, 2);
    assert_eq!(header.texture_count, 1);
    assert_eq!(header.object_count, 3);
    assert_eq!(header.point_cuboid_count, 1);
    assert_eq!(data.len(), 20 + 2 * 20 + 20 + 3 * 44 + 24);

    let world = read_world(&data, WorldFormat::Current).expect("Failed to decode world");
    assert_eq!(world.models, vec!["crate.sm", "rock.sm"]);
    assert_eq!(world.objects[1].position.x, 2.0);
    assert_eq!(world.objects[1].rotation.y, 1.5);
    assert_eq!(world.objects[2].model_index, 1);
}

/// Build a whole project from assets.toml
#[test]
fn test_build_manifest() {
    let dir = tempdir().expect("Failed to create temp dir");
    generate_test_assets::generate_project(dir.path()).expect("Failed to generate project");

    let status = Command::new(env!("CARGO_BIN_EXE_sln-export"))
        .arg("build")
        .arg(dir.path().join("assets.toml"))
        .status()
        .expect("Failed to run sln-export");
    assert!(status.success(), "sln-export build failed");

    let build = dir.path().join("build");
    for name in ["crate.sm", "rock.sm", "wood.simg", "terrain.st", "world.sw"] {
        assert!(build.join(name).exists(), "{} should exist", name);
    }

    // The default policy of the current layout converts axes
    let data = std::fs::read(build.join("world.sw")).expect("Failed to read world file");
    let world = read_world(&data, WorldFormat::Current).expect("Failed to decode world");
    assert_eq!(world.textures, vec!["wood.simg"]);
    assert_eq!(world.point_cuboids[0].centre.to_array(), [0.0, 0.0, 1.0]);
    assert_eq!(world.point_cuboids[0].dimension.to_array(), [1.0, 1.0, 2.0]);
}

/// check fails on a scene that references an undeclared mesh
#[test]
fn test_check_manifest_reports_missing_mesh() {
    let dir = tempdir().expect("Failed to create temp dir");
    generate_test_assets::generate_project(dir.path()).expect("Failed to generate project");

    let manifest = dir.path().join("assets.toml");
    let text = std::fs::read_to_string(&manifest).expect("Failed to read manifest");
    let text = text.replace("id = \"rock\"", "id = \"boulder\"");
    std::fs::write(&manifest, text).expect("Failed to write manifest");

    let out = Command::new(env!("CARGO_BIN_EXE_sln-export"))
        .arg("check")
        .arg(&manifest)
        .output()
        .expect("Failed to run sln-export");
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("rock.sm"));
    assert!(!dir.path().join("build").exists());
}

/// Legacy layout through the umbrella tool
#[test]
fn test_world_legacy_layout() {
    let dir = tempdir().expect("Failed to create temp dir");
    let json_path = dir.path().join("scene.json");
    let sw_path = dir.path().join("old.sw");
    std::fs::write(
        &json_path,
        r#"{ "models": [{ "name": "cube" }], "objects": [{ "model": "cube" }] }"#,
    )
    .expect("Failed to write scene");

    let status = Command::new(env!("CARGO_BIN_EXE_sln-export"))
        .arg("world")
        .arg(&json_path)
        .arg("-o")
        .arg(&sw_path)
        .args(["--layout", "legacy", "--name-width", "10"])
        .status()
        .expect("Failed to run sln-export");
    assert!(status.success());

    let data = std::fs::read(&sw_path).expect("Failed to read world file");
    assert_eq!(data.len(), 16 + 10 + 44);
    let format = WorldFormat::Legacy(sln_common::NameWidth::Short);
    let world = read_world(&data, format).expect("Failed to decode world");
    assert_eq!(world.models, vec!["cube.sm"]);
    assert_eq!(world.objects[0].texture_index, 0);
}
