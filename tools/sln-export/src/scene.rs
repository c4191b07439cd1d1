//! JSON scene descriptions
//!
//! A scene file lists models, textures, object placements and marker
//! volumes by name, or carries a raw entity dump from the authoring tool
//! (each entity tagged `"model"` or `"point-cuboid"`). Both forms may be
//! mixed; everything is fed through one [`WorldBuilder`].
//!
//! ```json
//! {
//!   "policy": "current",
//!   "models":   [{ "name": "crate" }],
//!   "textures": [{ "name": "wood", "path": "wood_01.simg" }],
//!   "objects":  [{ "model": "crate", "texture": "wood", "position": [0, 0, 1] }],
//!   "point_cuboids": [{ "centre": [0, 0, 0], "dimension": [2, 2, 2] }],
//!   "entities": [{ "name": "Rock.001", "type": "model", "mesh": "Rock",
//!                  "textures": ["stone"], "rotation": [0, 0, 90] }]
//! }
//! ```

use anyhow::{Context, Result};
use glam::DVec3;
use serde::Deserialize;
use sln_common::scene::{model_path, texture_path};
use sln_common::{
    EntityKind, FormatError, Placement, SceneEntity, TextureRef, TransformPolicy, World,
    WorldBuilder, WorldFormat, encode_world,
};
use std::path::Path;

use crate::output::write_atomic;

/// Transform policy as written in scene and manifest files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicySetting {
    Passthrough,
    Legacy,
    Current,
}

impl From<PolicySetting> for TransformPolicy {
    fn from(setting: PolicySetting) -> Self {
        match setting {
            PolicySetting::Passthrough => TransformPolicy::Passthrough,
            PolicySetting::Legacy => TransformPolicy::Legacy,
            PolicySetting::Current => TransformPolicy::Current,
        }
    }
}

/// Whole scene file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneDescription {
    /// Transform applied to every placement; passthrough when absent
    #[serde(default)]
    pub policy: Option<PolicySetting>,
    #[serde(default)]
    pub models: Vec<NamedFile>,
    #[serde(default)]
    pub textures: Vec<NamedFile>,
    #[serde(default)]
    pub objects: Vec<ObjectDesc>,
    #[serde(default)]
    pub point_cuboids: Vec<PointCuboidDesc>,
    #[serde(default)]
    pub entities: Vec<EntityDesc>,
}

/// Model or texture table entry; the path defaults to the exporter's
/// naming (`<name>.sm` lower-cased, `<name>.simg`)
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamedFile {
    pub name: String,
    #[serde(default, alias = "file")]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectDesc {
    pub model: String,
    #[serde(default)]
    pub texture: Option<String>,
    #[serde(default)]
    pub position: [f64; 3],
    #[serde(default)]
    pub rotation: [f64; 3],
    #[serde(default = "default_scale")]
    pub scale: [f64; 3],
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PointCuboidDesc {
    pub centre: [f64; 3],
    pub dimension: [f64; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityType {
    Model,
    PointCuboid,
}

/// Authoring-tool entity dump
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntityDesc {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntityType,
    #[serde(default)]
    pub mesh: String,
    /// Image identities across all materials, in material order
    #[serde(default)]
    pub textures: Vec<String>,
    #[serde(default)]
    pub position: [f64; 3],
    #[serde(default)]
    pub rotation: [f64; 3],
    #[serde(default = "default_scale")]
    pub scale: [f64; 3],
}

fn default_scale() -> [f64; 3] {
    [1.0, 1.0, 1.0]
}

impl From<&EntityDesc> for SceneEntity {
    fn from(desc: &EntityDesc) -> Self {
        SceneEntity {
            name: desc.name.clone(),
            kind: match desc.kind {
                EntityType::Model => EntityKind::Model,
                EntityType::PointCuboid => EntityKind::PointCuboid,
            },
            mesh: desc.mesh.clone(),
            textures: desc.textures.iter().map(TextureRef::new).collect(),
            position: DVec3::from_array(desc.position),
            rotation: DVec3::from_array(desc.rotation),
            scale: DVec3::from_array(desc.scale),
        }
    }
}

impl SceneDescription {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Policy named in the file, or passthrough
    pub fn transform_policy(&self) -> TransformPolicy {
        self.policy
            .map(TransformPolicy::from)
            .unwrap_or(TransformPolicy::Passthrough)
    }

    /// Fill a builder; tables are seeded from the explicit lists first
    pub fn builder(&self, format: WorldFormat, policy: TransformPolicy) -> WorldBuilder {
        let mut builder = WorldBuilder::with_policy(format, policy);

        for model in &self.models {
            let path = model.path.clone().unwrap_or_else(|| model_path(&model.name));
            builder.add_model(model.name.clone(), path);
        }
        for texture in &self.textures {
            let path = texture
                .path
                .clone()
                .unwrap_or_else(|| texture_path(&texture.name));
            builder.add_texture(texture.name.clone(), path);
        }
        for object in &self.objects {
            let mut placement = Placement::new(object.model.clone())
                .at(DVec3::from_array(object.position))
                .rotated(DVec3::from_array(object.rotation))
                .scaled(DVec3::from_array(object.scale));
            placement.texture = object.texture.clone();
            builder.add_object(placement);
        }
        for cuboid in &self.point_cuboids {
            builder.add_point_cuboid(
                DVec3::from_array(cuboid.centre),
                DVec3::from_array(cuboid.dimension),
            );
        }
        for entity in &self.entities {
            builder.add_entity(&SceneEntity::from(entity));
        }

        builder
    }

    /// Resolve into an engine-space world
    pub fn build_world(
        &self,
        format: WorldFormat,
        policy: Option<TransformPolicy>,
    ) -> Result<World, FormatError> {
        let policy = policy.unwrap_or_else(|| self.transform_policy());
        self.builder(format, policy).build()
    }
}

/// Read and parse a scene file
pub fn load_scene(input: &Path) -> Result<SceneDescription> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read scene: {}", input.display()))?;
    SceneDescription::from_json(&text)
        .with_context(|| format!("Failed to parse scene: {}", input.display()))
}

/// Convert a scene file to SW bytes in memory
///
/// `policy` overrides the one named in the scene file.
pub fn convert_scene_to_memory(
    input: &Path,
    format: WorldFormat,
    policy: Option<TransformPolicy>,
) -> Result<Vec<u8>> {
    let scene = load_scene(input)?;
    let world = scene.build_world(format, policy).map_err(|e| {
        let hint = match e {
            FormatError::MissingTexture { .. } if format == WorldFormat::Current => {
                " (scenes without textures need `sln-export world --layout legacy`)"
            }
            _ => "",
        };
        anyhow::Error::new(e).context(format!(
            "Failed to assemble world: {}{}",
            input.display(),
            hint
        ))
    })?;
    let bytes = encode_world(&world)
        .with_context(|| format!("Failed to encode world: {}", input.display()))?;

    tracing::info!(
        "Converted scene: {} models, {} textures, {} objects, {} point cuboids",
        world.models.len(),
        world.textures.len(),
        world.objects.len(),
        world.point_cuboids.len()
    );
    Ok(bytes)
}

/// Convert a scene file to a current-layout SW file
pub fn convert_scene(input: &Path, output: &Path) -> Result<()> {
    let bytes = convert_scene_to_memory(input, WorldFormat::Current, None)?;
    write_atomic(output, &bytes)
}
