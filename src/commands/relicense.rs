use std::path::Path;

use crate::services::relicense::rewrite_header;

pub fn handle_relicense(path: &Path) -> anyhow::Result<()> {
    println!("Relicensing {}", path.display());
    rewrite_header(path)
}
