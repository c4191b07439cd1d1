//! Authoring space to engine space conversion
//!
//! The authoring tool is right-handed with Z up; the engine is Y down the
//! screen with Z into it. Positions become `(x, -z, y)`. How rotations and
//! scales follow depends on which exporter generation produced the data, so
//! each generation is a named [`TransformPolicy`].
//!
//! None of these functions are idempotent: apply them exactly once.

use glam::DVec3;

/// Axis conversion applied when authoring data is written into a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransformPolicy {
    /// Input is already in engine space; everything is written as given.
    /// Used for PLY meshes and hand-written scene files.
    Passthrough,

    /// First exporter generation: positions and rotations remapped to
    /// `(x, -z, y)`, rotations kept in the units they were authored in,
    /// scale untouched.
    Legacy,

    /// Current exporter: positions `(x, -z, y)`, rotations converted from
    /// degrees to radians and remapped to `(x, -z, y)`, scales `(x, z, y)`.
    #[default]
    Current,
}

impl TransformPolicy {
    /// Convert a position (or marker-volume centre)
    pub fn position(self, v: DVec3) -> DVec3 {
        match self {
            TransformPolicy::Passthrough => v,
            TransformPolicy::Legacy | TransformPolicy::Current => remap_axes(v),
        }
    }

    /// Convert an Euler rotation
    ///
    /// `Current` expects degrees; the other policies leave units alone.
    pub fn rotation(self, v: DVec3) -> DVec3 {
        match self {
            TransformPolicy::Passthrough => v,
            TransformPolicy::Legacy => remap_axes(v),
            TransformPolicy::Current => remap_axes(degrees_to_radians(v)),
        }
    }

    /// Convert a scale (or marker-volume dimension)
    pub fn scale(self, v: DVec3) -> DVec3 {
        match self {
            TransformPolicy::Passthrough | TransformPolicy::Legacy => v,
            TransformPolicy::Current => swap_yz(v),
        }
    }
}

/// `(x, y, z) -> (x, -z, y)`
pub fn remap_axes(v: DVec3) -> DVec3 {
    DVec3::new(v.x, -v.z, v.y)
}

/// `(x, y, z) -> (x, z, y)`
pub fn swap_yz(v: DVec3) -> DVec3 {
    DVec3::new(v.x, v.z, v.y)
}

/// Component-wise degrees to radians
pub fn degrees_to_radians(v: DVec3) -> DVec3 {
    DVec3::new(v.x.to_radians(), v.y.to_radians(), v.z.to_radians())
}
