//! ply2sm - convert an ASCII PLY mesh to SM

use anyhow::Result;

fn main() -> Result<()> {
    sln_export::cli::run_converter(
        "ply2sm",
        "Convert an ASCII PLY mesh to SM",
        sln_export::convert_ply,
    )
}
