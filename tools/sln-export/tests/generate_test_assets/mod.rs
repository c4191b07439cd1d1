//! Input fixtures for the integration tests

#![allow(dead_code)]

use image::{GrayImage, Luma, Rgb, RgbImage};
use std::io::Write;
use std::path::Path;

const PLY_HEADER_START: &str = "ply
format ascii 1.0
comment generated by sln-export tests
";

const PLY_VERTEX_PROPERTIES: &str = "property float x
property float y
property float z
property float nx
property float ny
property float nz
property float s
property float t
";

fn write_ply(path: &Path, vertices: &[[f32; 8]], faces: &[Vec<i32>]) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write!(file, "{PLY_HEADER_START}")?;
    writeln!(file, "element vertex {}", vertices.len())?;
    write!(file, "{PLY_VERTEX_PROPERTIES}")?;
    writeln!(file, "element face {}", faces.len())?;
    writeln!(file, "property list uchar int vertex_indices")?;
    writeln!(file, "end_header")?;
    for v in vertices {
        let line: Vec<String> = v.iter().map(|f| f.to_string()).collect();
        writeln!(file, "{}", line.join(" "))?;
    }
    for face in faces {
        let line: Vec<String> = face.iter().map(|i| i.to_string()).collect();
        writeln!(file, "{} {}", face.len(), line.join(" "))?;
    }
    Ok(())
}

fn cube_vertices() -> Vec<[f32; 8]> {
    let mut vertices = Vec::new();
    for i in 0..8 {
        let x = if i & 1 == 0 { -1.0 } else { 1.0 };
        let y = if i & 2 == 0 { -1.0 } else { 1.0 };
        let z = if i & 4 == 0 { -1.0 } else { 1.0 };
        let n = 1.0 / 3f32.sqrt();
        vertices.push([x, y, z, x * n, y * n, z * n, (x + 1.0) / 2.0, (y + 1.0) / 2.0]);
    }
    vertices
}

/// Unit cube: 8 shared vertices, 12 triangles
pub fn generate_cube_ply(path: &Path) -> std::io::Result<()> {
    let faces: Vec<Vec<i32>> = [
        [0, 2, 1], [1, 2, 3], // -z
        [4, 5, 6], [5, 7, 6], // +z
        [0, 1, 4], [1, 5, 4], // -y
        [2, 6, 3], [3, 6, 7], // +y
        [0, 4, 2], [2, 4, 6], // -x
        [1, 3, 5], [3, 7, 5], // +x
    ]
    .iter()
    .map(|f| f.to_vec())
    .collect();
    write_ply(path, &cube_vertices(), &faces)
}

/// Cube whose first face is still a quad
pub fn generate_quad_ply(path: &Path) -> std::io::Result<()> {
    let faces = vec![vec![0, 1, 3, 2], vec![4, 5, 6]];
    write_ply(path, &cube_vertices(), &faces)
}

/// 4x4 red/blue checkerboard, 24-bit BMP
pub fn generate_checkerboard_bmp(path: &Path) -> image::ImageResult<()> {
    let img = RgbImage::from_fn(4, 4, |x, y| {
        if (x + y) % 2 == 0 {
            Rgb([255, 0, 0])
        } else {
            Rgb([0, 0, 255])
        }
    });
    img.save(path)
}

/// Greyscale ramp: sample (x, y) = 16 * x + y
pub fn generate_heightmap_png(path: &Path, width: u32, height: u32) -> image::ImageResult<()> {
    let img = GrayImage::from_fn(width, height, |x, y| Luma([(16 * x + y) as u8]));
    img.save(path)
}

/// Two crates and a rock, one trigger volume
pub const SCENE_JSON: &str = r#"{
    "models": [{ "name": "crate" }, { "name": "rock" }],
    "textures": [{ "name": "wood" }],
    "objects": [
        { "model": "crate", "texture": "wood", "position": [0, 0, 0] },
        { "model": "crate", "texture": "wood", "position": [2, 0, 0], "rotation": [0, 1.5, 0] },
        { "model": "rock", "texture": "wood", "scale": [3, 3, 3] }
    ],
    "point_cuboids": [{ "centre": [0, 1, 0], "dimension": [1, 2, 1] }]
}"#;

pub fn generate_scene_json(path: &Path) -> std::io::Result<()> {
    std::fs::write(path, SCENE_JSON)
}

/// Complete project: meshes, a texture, a heightmap, a scene and assets.toml
pub fn generate_project(dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dir.join("models"))?;
    generate_cube_ply(&dir.join("models/crate.ply"))?;
    generate_cube_ply(&dir.join("models/rock.ply"))?;
    generate_checkerboard_bmp(&dir.join("wood.bmp")).map_err(std::io::Error::other)?;
    generate_heightmap_png(&dir.join("terrain.png"), 8, 8).map_err(std::io::Error::other)?;
    generate_scene_json(&dir.join("scene.json"))?;
    std::fs::write(
        dir.join("assets.toml"),
        r#"
[settings]
output = "build"

[[meshes]]
id = "crate"
path = "models/crate.ply"

[[meshes]]
id = "rock"
path = "models/rock.ply"

[[textures]]
id = "wood"
path = "wood.bmp"

[[heightmaps]]
id = "terrain"
path = "terrain.png"

[world]
scene = "scene.json"
"#,
    )
}
