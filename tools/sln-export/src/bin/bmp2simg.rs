//! bmp2simg - convert a BMP or PNG image to SIMG

use anyhow::Result;

fn main() -> Result<()> {
    sln_export::cli::run_converter(
        "bmp2simg",
        "Convert a BMP or PNG image to SIMG",
        sln_export::convert_image,
    )
}
