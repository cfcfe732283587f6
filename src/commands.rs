//! Filesystem side of the `pack`, `unpack` and `list` commands.
//!
//! These helpers check inputs, pick default output locations, ask the injected
//! [`Confirm`] strategy before replacing anything, and write the results. All
//! image work is delegated to [`ArchiveDriver`].

use crate::confirm::Confirm;
use crate::driver::{ArchiveDriver, EntrySummary};
use crate::error::{PathKind, TgaPakError};
use crate::naming;
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

fn require_input(path: &Path, expected: PathKind) -> Result<()> {
    if !path.exists() {
        return Err(TgaPakError::InputNotFound(path.to_path_buf()).into());
    }
    let matches = match expected {
        PathKind::File => path.is_file(),
        PathKind::Directory => path.is_dir(),
    };
    if !matches {
        return Err(TgaPakError::WrongKind {
            path: path.to_path_buf(),
            expected,
        }
        .into());
    }
    Ok(())
}

/// Fails when `output` exists as the wrong kind or the user refuses to replace it.
fn ensure_replaceable(output: &Path, expected: PathKind, confirm: &dyn Confirm) -> Result<()> {
    if !output.exists() {
        return Ok(());
    }
    require_input(output, expected)?;

    let question = format!("{} already exists. Overwrite?", output.display());
    if !confirm.confirm(&question)? {
        return Err(TgaPakError::OverwriteDeclined(output.to_path_buf()).into());
    }
    Ok(())
}

// Writes `bytes` to a temporary file in `dir`; it is removed if dropped unpersisted.
fn stage(dir: &Path, bytes: &[u8]) -> Result<NamedTempFile> {
    let mut staged = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    staged
        .write_all(bytes)
        .with_context(|| format!("Failed to write temporary file in {}", dir.display()))?;
    Ok(staged)
}

fn persist(staged: NamedTempFile, path: &Path) -> Result<()> {
    staged
        .persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    persist(stage(dir, bytes)?, path)
}

/// Packs `source_dir` into `output`, or `<DIRNAME>.ZIP` next to it.
pub fn pack_directory(
    driver: &ArchiveDriver,
    source_dir: &Path,
    output: Option<&Path>,
    confirm: &dyn Confirm,
) -> Result<PathBuf> {
    require_input(source_dir, PathKind::Directory)?;

    let output = match output {
        Some(path) => path.to_path_buf(),
        None => {
            let named = naming::default_archive_path(source_dir);
            let named = match named {
                Some(path) => Some(path),
                None => naming::default_archive_path(&fs::canonicalize(source_dir)?),
            };
            named.ok_or_else(|| {
                anyhow!(
                    "Cannot derive an archive name from {}; pass --out",
                    source_dir.display()
                )
            })?
        }
    };
    log::debug!("Archive output: {}", output.display());

    ensure_replaceable(&output, PathKind::File, confirm)?;

    let bytes = driver.pack(source_dir)?;
    write_atomically(&output, &bytes)?;
    Ok(output)
}

/// Restores `archive` into `output`, or a directory named after the archive.
///
/// Files already in an existing output directory are kept unless an extracted
/// image has the same name. Nothing is replaced unless every image can be staged.
pub fn unpack_archive(
    driver: &ArchiveDriver,
    archive: &Path,
    output: Option<&Path>,
    confirm: &dyn Confirm,
) -> Result<PathBuf> {
    require_input(archive, PathKind::File)?;

    let output = match output {
        Some(path) => path.to_path_buf(),
        None => naming::default_extract_dir(archive).ok_or_else(|| {
            anyhow!(
                "Cannot derive an output directory from {}; pass --out",
                archive.display()
            )
        })?,
    };
    log::debug!("Extraction output: {}", output.display());

    ensure_replaceable(&output, PathKind::Directory, confirm)?;

    let bytes =
        fs::read(archive).with_context(|| format!("Failed to read {}", archive.display()))?;
    let files = driver.unpack(&bytes)?;

    fs::create_dir_all(&output)
        .with_context(|| format!("Failed to create {}", output.display()))?;

    // Everything is staged before the first rename, so a failure leaves existing files alone.
    let mut staged = Vec::with_capacity(files.len());
    for file in &files {
        let target = output.join(&file.name);
        if target.is_dir() {
            return Err(TgaPakError::WrongKind {
                path: target,
                expected: PathKind::File,
            }
            .into());
        }
        staged.push((stage(&output, &file.bytes)?, target));
    }
    for (file, target) in staged {
        persist(file, &target)?;
    }

    Ok(output)
}

pub fn list_archive(driver: &ArchiveDriver, archive: &Path) -> Result<Vec<EntrySummary>> {
    require_input(archive, PathKind::File)?;
    let bytes =
        fs::read(archive).with_context(|| format!("Failed to read {}", archive.display()))?;
    Ok(driver.list(&bytes)?)
}
