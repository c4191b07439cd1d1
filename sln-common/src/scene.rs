//! World assembly
//!
//! [`WorldBuilder`] collects authoring-space placements, builds the
//! deduplicated model and texture tables, resolves every reference to a table
//! index and applies the coordinate transform. Nothing here is global: each
//! export creates its own builder.

use glam::DVec3;

use crate::formats::{MESH_EXT, NameTable, PointCuboid, TEXTURE_EXT, World, WorldFormat, WorldObject};
use crate::{FormatError, ReferenceKind, TransformPolicy};

/// Scene entity type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntityKind {
    /// Rendered object placed in the world
    #[default]
    Model,
    /// Axis-aligned marker volume; its bounds come from position and scale
    PointCuboid,
}

/// Texture reference carried by an entity's materials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureRef {
    /// Resolved image identity; textures are deduplicated on this key
    pub identity: String,
}

impl TextureRef {
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
        }
    }
}

/// One mesh-bearing entity from the authoring scene graph
#[derive(Debug, Clone, PartialEq)]
pub struct SceneEntity {
    pub name: String,
    pub kind: EntityKind,
    /// Name of the mesh data block this entity instances
    pub mesh: String,
    /// Textures across all of the entity's materials, in material order
    pub textures: Vec<TextureRef>,
    pub position: DVec3,
    pub rotation: DVec3,
    pub scale: DVec3,
}

impl SceneEntity {
    pub fn new(name: impl Into<String>, mesh: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntityKind::Model,
            mesh: mesh.into(),
            textures: Vec::new(),
            position: DVec3::ZERO,
            rotation: DVec3::ZERO,
            scale: DVec3::ONE,
        }
    }
}

/// Object placement in authoring space, referring to tables by name
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub model: String,
    pub texture: Option<String>,
    pub position: DVec3,
    pub rotation: DVec3,
    pub scale: DVec3,
}

impl Placement {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            texture: None,
            position: DVec3::ZERO,
            rotation: DVec3::ZERO,
            scale: DVec3::ONE,
        }
    }

    pub fn with_texture(mut self, texture: impl Into<String>) -> Self {
        self.texture = Some(texture.into());
        self
    }

    pub fn at(mut self, position: DVec3) -> Self {
        self.position = position;
        self
    }

    pub fn rotated(mut self, rotation: DVec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn scaled(mut self, scale: DVec3) -> Self {
        self.scale = scale;
        self
    }
}

/// File name the exporter gives a mesh: lower-cased `<mesh>.sm`
pub fn model_path(mesh: &str) -> String {
    format!("{}.{}", mesh.to_lowercase(), MESH_EXT)
}

/// File name the exporter gives a texture: `<identity>.simg`
pub fn texture_path(identity: &str) -> String {
    format!("{}.{}", identity, TEXTURE_EXT)
}

/// Scoped accumulator for one world export
#[derive(Debug, Clone)]
pub struct WorldBuilder {
    format: WorldFormat,
    policy: TransformPolicy,
    models: NameTable,
    textures: NameTable,
    placements: Vec<Placement>,
    /// Centre and dimension, authoring space
    cuboids: Vec<(DVec3, DVec3)>,
}

impl WorldBuilder {
    /// Builder using the format's own transform policy
    pub fn new(format: WorldFormat) -> Self {
        Self::with_policy(format, format.default_policy())
    }

    pub fn with_policy(format: WorldFormat, policy: TransformPolicy) -> Self {
        Self {
            format,
            policy,
            models: NameTable::new(),
            textures: NameTable::new(),
            placements: Vec::new(),
            cuboids: Vec::new(),
        }
    }

    pub fn format(&self) -> WorldFormat {
        self.format
    }

    pub fn policy(&self) -> TransformPolicy {
        self.policy
    }

    pub fn models(&self) -> &NameTable {
        &self.models
    }

    pub fn textures(&self) -> &NameTable {
        &self.textures
    }

    /// Register a model; returns its table index
    pub fn add_model(&mut self, name: impl Into<String>, path: impl Into<String>) -> usize {
        self.models.insert(name, path)
    }

    /// Register a texture; returns its table index
    pub fn add_texture(&mut self, name: impl Into<String>, path: impl Into<String>) -> usize {
        self.textures.insert(name, path)
    }

    /// Queue an object; references are resolved in [`build`](Self::build)
    pub fn add_object(&mut self, placement: Placement) {
        self.placements.push(placement);
    }

    /// Queue a marker volume (authoring-space centre and dimension)
    pub fn add_point_cuboid(&mut self, centre: DVec3, dimension: DVec3) {
        self.cuboids.push((centre, dimension));
    }

    /// Add a scene-graph entity, routing it by its type tag
    ///
    /// Models register their mesh in the model table and every material
    /// texture in the texture table; the object takes the first texture.
    /// Point cuboids use position as centre and scale as dimension.
    pub fn add_entity(&mut self, entity: &SceneEntity) {
        match entity.kind {
            EntityKind::Model => {
                // Keyed like the file name, so meshes differing only in case share one entry
                let model = entity.mesh.to_lowercase();
                self.add_model(model.clone(), model_path(&entity.mesh));
                for texture in &entity.textures {
                    self.add_texture(texture.identity.clone(), texture_path(&texture.identity));
                }
                self.add_object(Placement {
                    model,
                    texture: entity.textures.first().map(|t| t.identity.clone()),
                    position: entity.position,
                    rotation: entity.rotation,
                    scale: entity.scale,
                });
            }
            EntityKind::PointCuboid => self.add_point_cuboid(entity.position, entity.scale),
        }
    }

    /// Resolve references, transform into engine space and validate
    pub fn build(&self) -> Result<World, FormatError> {
        let width = self.format.name_width();
        self.models.validate(width)?;
        if self.format == WorldFormat::Current {
            self.textures.validate(width)?;
        }

        let objects = self
            .placements
            .iter()
            .enumerate()
            .map(|(i, p)| self.resolve(i, p))
            .collect::<Result<Vec<_>, _>>()?;

        let point_cuboids = self
            .cuboids
            .iter()
            .map(|&(centre, dimension)| PointCuboid {
                centre: self.policy.position(centre).as_vec3(),
                dimension: self.policy.scale(dimension).as_vec3(),
            })
            .collect();

        let world = World {
            format: self.format,
            models: self.models.paths().map(str::to_string).collect(),
            textures: self.textures.paths().map(str::to_string).collect(),
            objects,
            point_cuboids,
        };
        world.validate()?;
        Ok(world)
    }

    fn resolve(&self, object: usize, placement: &Placement) -> Result<WorldObject, FormatError> {
        let model_index =
            self.models
                .index_of(&placement.model)
                .ok_or_else(|| FormatError::ReferenceNotFound {
                    kind: ReferenceKind::Model,
                    name: placement.model.clone(),
                })?;

        let texture_index = match (&placement.texture, self.format) {
            (Some(texture), _) => {
                self.textures
                    .index_of(texture)
                    .ok_or_else(|| FormatError::ReferenceNotFound {
                        kind: ReferenceKind::Texture,
                        name: texture.clone(),
                    })?
            }
            (None, WorldFormat::Legacy(_)) => 0,
            (None, WorldFormat::Current) => {
                return Err(FormatError::MissingTexture {
                    object,
                    model: placement.model.clone(),
                });
            }
        };

        Ok(WorldObject {
            model_index: index_i32(model_index),
            texture_index: index_i32(texture_index),
            position: self.policy.position(placement.position).as_vec3(),
            rotation: self.policy.rotation(placement.rotation).as_vec3(),
            scale: self.policy.scale(placement.scale).as_vec3(),
        })
    }
}

/// Table indices are bounded by the table's count, which is checked to fit
/// an i32 when the header is written
fn index_i32(index: usize) -> i32 {
    i32::try_from(index).unwrap_or(i32::MAX)
}

/// Partition and assemble a whole scene graph in one call
pub fn assemble_world<'a, I>(
    entities: I,
    format: WorldFormat,
    policy: TransformPolicy,
) -> Result<World, FormatError>
where
    I: IntoIterator<Item = &'a SceneEntity>,
{
    let mut builder = WorldBuilder::with_policy(format, policy);
    for entity in entities {
        builder.add_entity(entity);
    }
    builder.build()
}
