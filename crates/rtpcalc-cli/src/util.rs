use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use rtpcalc_optimizer::solution::OUTPUT_FILE_NAME;

/// Name of the output directory created next to the executable.
pub const STORAGE_DIR_NAME: &str = "storage";

/// Returns the `storage` directory next to the running executable.
pub fn default_storage_dir() -> anyhow::Result<PathBuf> {
    let exe = env::current_exe().context("Failed to locate the running executable")?;
    let dir = exe
        .parent()
        .with_context(|| format!("Executable path has no parent: {}", exe.display()))?;
    Ok(dir.join(STORAGE_DIR_NAME))
}

/// Resolves the output file path and creates its directory.
///
/// An explicit `output` wins; otherwise the file goes into `storage_dir`, or
/// into [`default_storage_dir`] when that is not given either. Creating the
/// directory is idempotent.
///
/// # Errors
///
/// Returns error if the executable location cannot be determined or the
/// directory cannot be created
pub fn prepare_output_path(
    output: Option<PathBuf>,
    storage_dir: Option<PathBuf>,
) -> anyhow::Result<PathBuf> {
    let path = match (output, storage_dir) {
        (Some(path), _) => path,
        (None, Some(dir)) => dir.join(OUTPUT_FILE_NAME),
        (None, None) => default_storage_dir()?.join(OUTPUT_FILE_NAME),
    };
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        create_dir(dir)?;
    }
    Ok(path)
}

fn create_dir(dir: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))
}
