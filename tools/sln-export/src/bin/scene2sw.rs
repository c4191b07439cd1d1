//! scene2sw - convert a JSON scene description to SW

use anyhow::Result;

fn main() -> Result<()> {
    sln_export::cli::run_converter(
        "scene2sw",
        "Convert a JSON scene description to SW",
        sln_export::convert_scene,
    )
}
