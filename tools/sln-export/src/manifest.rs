//! assets.toml manifest parsing and batch export
//!
//! Meshes, textures and heightmaps are independent and export in parallel.
//! The world only needs the names of the files they produce, so it is
//! assembled alongside them; any failure aborts the whole build.

use anyhow::{Context, Result, bail};
use hashbrown::HashSet;
use rayon::prelude::*;
use serde::Deserialize;
use sln_common::{
    HEIGHTMAP_EXT, MESH_EXT, NameWidth, TEXTURE_EXT, TransformPolicy, WORLD_EXT, World,
    WorldFormat, encode_heightmap, encode_mesh, encode_texture, encode_world,
};
use std::path::{Path, PathBuf};

use crate::heightmap::load_heightmap;
use crate::output::write_atomic;
use crate::scene::{PolicySetting, load_scene};
use crate::source::{FileSource, ImageSource, MeshSource};

/// assets.toml structure
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub meshes: Vec<AssetEntry>,
    #[serde(default)]
    pub textures: Vec<AssetEntry>,
    #[serde(default)]
    pub heightmaps: Vec<AssetEntry>,
    #[serde(default)]
    pub world: Option<WorldSection>,

    /// Directory the manifest was loaded from; inputs and output resolve
    /// against it
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default)]
    pub format: FormatSetting,
    /// Defaults to the world format's own policy
    #[serde(default)]
    pub policy: Option<PolicySetting>,
    /// Legacy layout only: 10 or 20
    #[serde(default)]
    pub name_width: Option<usize>,
}

fn default_output() -> PathBuf {
    PathBuf::from("build")
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output: default_output(),
            format: FormatSetting::default(),
            policy: None,
            name_width: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatSetting {
    #[default]
    Current,
    Legacy,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssetEntry {
    pub id: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorldSection {
    pub scene: PathBuf,
    #[serde(default = "default_world_output")]
    pub output: PathBuf,
}

fn default_world_output() -> PathBuf {
    PathBuf::from(format!("world.{}", WORLD_EXT))
}

/// Files written by [`build_all`]
#[derive(Debug, Default)]
pub struct BuildReport {
    pub files: Vec<PathBuf>,
}

impl Settings {
    pub fn world_format(&self) -> Result<WorldFormat> {
        match (self.format, self.name_width) {
            (FormatSetting::Current, None) => Ok(WorldFormat::Current),
            (FormatSetting::Current, Some(width)) if width == NameWidth::Long.bytes() => {
                Ok(WorldFormat::Current)
            }
            (FormatSetting::Current, Some(width)) => {
                bail!("name_width {} is not available in the current layout", width)
            }
            (FormatSetting::Legacy, width) => {
                let width = width.unwrap_or(NameWidth::Long.bytes());
                match NameWidth::from_bytes(width) {
                    Some(width) => Ok(WorldFormat::Legacy(width)),
                    None => bail!("name_width must be 10 or 20, got {}", width),
                }
            }
        }
    }
}

impl Manifest {
    pub fn from_toml(text: &str, base_dir: impl Into<PathBuf>) -> Result<Self> {
        let mut manifest: Manifest = toml::from_str(text)?;
        manifest.base_dir = base_dir.into();
        Ok(manifest)
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.base_dir.join(path)
    }

    /// Output directory, optionally overridden on the command line
    pub fn output_dir(&self, override_dir: Option<&Path>) -> PathBuf {
        match override_dir {
            Some(dir) => dir.to_path_buf(),
            None => self.resolve(&self.settings.output),
        }
    }

    fn mesh_source(&self) -> FileSource {
        self.meshes
            .iter()
            .map(|e| (e.id.clone(), self.resolve(&e.path)))
            .collect()
    }

    fn image_source(&self) -> FileSource {
        self.textures
            .iter()
            .map(|e| (e.id.clone(), self.resolve(&e.path)))
            .collect()
    }

    /// Assemble the world from the scene; no files are touched
    pub fn assemble_world(&self) -> Result<Option<World>> {
        let Some(section) = &self.world else {
            return Ok(None);
        };
        let format = self.settings.world_format()?;
        let scene_path = self.resolve(&section.scene);
        let scene = load_scene(&scene_path)?;

        let policy = self
            .settings
            .policy
            .or(scene.policy)
            .map(TransformPolicy::from)
            .unwrap_or(format.default_policy());

        let world = scene
            .build_world(format, Some(policy))
            .with_context(|| format!("Failed to assemble world: {}", scene_path.display()))?;
        Ok(Some(world))
    }
}

/// Load manifest from file
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
    let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    Manifest::from_toml(&text, base_dir)
        .with_context(|| format!("Failed to parse manifest: {}", path.display()))
}

fn check_entries(kind: &str, entries: &[AssetEntry], manifest: &Manifest, problems: &mut Vec<String>) {
    let mut seen = HashSet::new();
    for entry in entries {
        if !seen.insert(entry.id.as_str()) {
            problems.push(format!("duplicate {} id '{}'", kind, entry.id));
        }
        let path = manifest.resolve(&entry.path);
        if !path.is_file() {
            problems.push(format!("{} '{}': missing input {}", kind, entry.id, path.display()));
        }
    }
}

/// Validate a manifest without writing anything
///
/// Reports every problem found, not just the first.
pub fn validate(manifest: &Manifest) -> Result<()> {
    let mut problems = Vec::new();

    let format = match manifest.settings.world_format() {
        Ok(format) => Some(format),
        Err(e) => {
            problems.push(e.to_string());
            None
        }
    };

    check_entries("mesh", &manifest.meshes, manifest, &mut problems);
    check_entries("texture", &manifest.textures, manifest, &mut problems);
    check_entries("heightmap", &manifest.heightmaps, manifest, &mut problems);

    if let Some(format) = format {
        let width = format.name_width();
        for entry in &manifest.meshes {
            let name = format!("{}.{}", entry.id, MESH_EXT);
            if name.len() > width {
                problems.push(format!("mesh file name '{}' exceeds {} bytes", name, width));
            }
        }
        if format == WorldFormat::Current {
            for entry in &manifest.textures {
                let name = format!("{}.{}", entry.id, TEXTURE_EXT);
                if name.len() > width {
                    problems.push(format!("texture file name '{}' exceeds {} bytes", name, width));
                }
            }
        }

        match manifest.assemble_world() {
            Ok(Some(world)) => check_world_references(manifest, &world, &mut problems),
            Ok(None) => {}
            Err(e) => problems.push(format!("{:#}", e)),
        }
    }

    if !problems.is_empty() {
        bail!("Manifest has {} problem(s):\n  {}", problems.len(), problems.join("\n  "));
    }
    Ok(())
}

/// Every table entry must be a file this manifest produces
fn check_world_references(manifest: &Manifest, world: &World, problems: &mut Vec<String>) {
    let meshes: HashSet<String> = manifest
        .meshes
        .iter()
        .map(|e| format!("{}.{}", e.id, MESH_EXT))
        .collect();
    let textures: HashSet<String> = manifest
        .textures
        .iter()
        .map(|e| format!("{}.{}", e.id, TEXTURE_EXT))
        .collect();

    for model in &world.models {
        if !meshes.contains(model) {
            problems.push(format!("world references model '{}', not produced by any mesh", model));
        }
    }
    for texture in &world.textures {
        if !textures.contains(texture) {
            problems.push(format!(
                "world references texture '{}', not produced by any texture",
                texture
            ));
        }
    }
}

/// Build every asset declared in the manifest
pub fn build_all(manifest: &Manifest, output_override: Option<&Path>) -> Result<BuildReport> {
    validate(manifest)?;

    let out_dir = manifest.output_dir(output_override);
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;

    let (assets, world) = rayon::join(
        || export_assets(manifest, &out_dir),
        || manifest.assemble_world(),
    );
    let mut files = assets?;

    if let (Some(world), Some(section)) = (world?, &manifest.world) {
        let bytes = encode_world(&world)?;
        let path = out_dir.join(&section.output);
        write_atomic(&path, &bytes)?;
        tracing::info!(
            "  World: {} models, {} textures, {} objects -> {}",
            world.models.len(),
            world.textures.len(),
            world.objects.len(),
            path.display()
        );
        files.push(path);
    }

    tracing::info!("Built {} files into {}", files.len(), out_dir.display());
    Ok(BuildReport { files })
}

fn export_assets(manifest: &Manifest, out_dir: &Path) -> Result<Vec<PathBuf>> {
    let meshes = manifest.mesh_source();
    let images = manifest.image_source();

    let mut files = manifest
        .meshes
        .par_iter()
        .map(|entry| -> Result<PathBuf> {
            let mesh = meshes.triangulated_mesh(&entry.id)?;
            let bytes = encode_mesh(&mesh, TransformPolicy::Passthrough)
                .with_context(|| format!("Failed to encode mesh '{}'", entry.id))?;
            let path = out_dir.join(format!("{}.{}", entry.id, MESH_EXT));
            write_atomic(&path, &bytes)?;
            tracing::info!("  Mesh {}: {} vertices", entry.id, mesh.vertices.len());
            Ok(path)
        })
        .collect::<Result<Vec<_>>>()?;

    let textures = manifest
        .textures
        .par_iter()
        .map(|entry| -> Result<PathBuf> {
            let texture = images.load_image(&entry.id)?;
            let bytes = encode_texture(&texture)
                .with_context(|| format!("Failed to encode texture '{}'", entry.id))?;
            let path = out_dir.join(format!("{}.{}", entry.id, TEXTURE_EXT));
            write_atomic(&path, &bytes)?;
            tracing::info!("  Texture {}: {}x{}", entry.id, texture.width, texture.height);
            Ok(path)
        })
        .collect::<Result<Vec<_>>>()?;

    let heightmaps = manifest
        .heightmaps
        .par_iter()
        .map(|entry| -> Result<PathBuf> {
            let heightmap = load_heightmap(&manifest.resolve(&entry.path))?;
            let bytes = encode_heightmap(&heightmap)
                .with_context(|| format!("Failed to encode heightmap '{}'", entry.id))?;
            let path = out_dir.join(format!("{}.{}", entry.id, HEIGHTMAP_EXT));
            write_atomic(&path, &bytes)?;
            tracing::info!("  Heightmap {}: {}x{}", entry.id, heightmap.width, heightmap.height);
            Ok(path)
        })
        .collect::<Result<Vec<_>>>()?;

    files.extend(textures);
    files.extend(heightmaps);
    Ok(files)
}
