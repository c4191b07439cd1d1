//! terrain2st - convert a greyscale heightmap image to ST

use anyhow::Result;

fn main() -> Result<()> {
    sln_export::cli::run_converter(
        "terrain2st",
        "Convert a greyscale heightmap image to ST",
        sln_export::convert_heightmap,
    )
}
