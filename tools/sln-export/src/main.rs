//! sln-export - sln asset export tool
//!
//! Converts authoring assets (PLY, BMP/PNG, JSON scenes) to the engine's
//! binary formats (.sm, .simg, .st, .sw)

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use sln_common::{
    HEIGHTMAP_EXT, MESH_EXT, NameWidth, TEXTURE_EXT, TransformPolicy, WORLD_EXT, WorldFormat,
};
use std::path::PathBuf;

use sln_export::{cli, heightmap, manifest, mesh, output, scene, texture};

#[derive(Parser)]
#[command(name = "sln-export")]
#[command(about = "sln asset export tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build assets from a manifest file
    Build {
        /// Path to assets.toml manifest
        #[arg(default_value = "assets.toml")]
        manifest: PathBuf,

        /// Output directory (overrides manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate manifest without building
    Check {
        /// Path to assets.toml manifest
        #[arg(default_value = "assets.toml")]
        manifest: PathBuf,
    },

    /// Export a single mesh file
    Mesh {
        /// Input mesh file (PLY)
        input: PathBuf,

        /// Output .sm file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export a single texture file
    Texture {
        /// Input BMP/PNG file
        input: PathBuf,

        /// Output .simg file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export a greyscale image as a heightmap
    Heightmap {
        /// Input greyscale image
        input: PathBuf,

        /// Output .st file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export a world from a JSON scene description
    World {
        /// Input scene JSON
        input: PathBuf,

        /// Output .sw file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// World layout
        #[arg(long, value_enum, default_value_t = LayoutArg::Current)]
        layout: LayoutArg,

        /// Model name width for the legacy layout (10 or 20)
        #[arg(long, default_value_t = 20)]
        name_width: usize,

        /// Coordinate transform (defaults to the scene file's, else passthrough)
        #[arg(long, value_enum)]
        policy: Option<PolicyArg>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LayoutArg {
    Current,
    Legacy,
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    Passthrough,
    Legacy,
    Current,
}

impl From<PolicyArg> for TransformPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Passthrough => TransformPolicy::Passthrough,
            PolicyArg::Legacy => TransformPolicy::Legacy,
            PolicyArg::Current => TransformPolicy::Current,
        }
    }
}

fn main() -> Result<()> {
    cli::init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build { manifest, output } => {
            tracing::info!("Building assets from {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            let report = manifest::build_all(&config, output.as_deref())?;
            tracing::info!("Build complete! ({} files)", report.files.len());
        }

        Commands::Check { manifest } => {
            tracing::info!("Checking manifest {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            manifest::validate(&config)?;
            tracing::info!("Manifest is valid!");
        }

        Commands::Mesh { input, output } => {
            let output = output.unwrap_or_else(|| input.with_extension(MESH_EXT));
            tracing::info!("Converting {:?} -> {:?}", input, output);
            mesh::convert_mesh(&input, &output)?;
            tracing::info!("Done!");
        }

        Commands::Texture { input, output } => {
            let output = output.unwrap_or_else(|| input.with_extension(TEXTURE_EXT));
            tracing::info!("Converting {:?} -> {:?}", input, output);
            texture::convert_image(&input, &output)?;
            tracing::info!("Done!");
        }

        Commands::Heightmap { input, output } => {
            let output = output.unwrap_or_else(|| input.with_extension(HEIGHTMAP_EXT));
            tracing::info!("Converting {:?} -> {:?}", input, output);
            heightmap::convert_heightmap(&input, &output)?;
            tracing::info!("Done!");
        }

        Commands::World {
            input,
            output,
            layout,
            name_width,
            policy,
        } => {
            let output = output.unwrap_or_else(|| input.with_extension(WORLD_EXT));
            let format = match layout {
                LayoutArg::Current => WorldFormat::Current,
                LayoutArg::Legacy => match NameWidth::from_bytes(name_width) {
                    Some(width) => WorldFormat::Legacy(width),
                    None => anyhow::bail!("--name-width must be 10 or 20, got {}", name_width),
                },
            };
            tracing::info!("Converting {:?} -> {:?}", input, output);
            let bytes = scene::convert_scene_to_memory(&input, format, policy.map(Into::into))?;
            output::write_atomic(&output, &bytes)?;
            tracing::info!("Done!");
        }
    }

    Ok(())
}
