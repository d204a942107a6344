// SPDX-FileCopyrightText: 2026 BrokerVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Crash-safe file replacement.
//!
//! New contents go to a synced temp file in the destination directory and
//! are renamed over the target, so a crash leaves either the old file or the
//! new one, never a partial write.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use brokervault_core::VaultError;
use tempfile::NamedTempFile;

/// A fully written, synced temp file waiting to replace its target.
///
/// Dropping it without [`StagedFile::commit`] removes the temp file and
/// leaves the target untouched.
#[derive(Debug)]
pub struct StagedFile {
    temp: NamedTempFile,
    target: PathBuf,
}

impl StagedFile {
    /// Write `bytes` next to `target` without touching `target` itself.
    pub fn stage(target: &Path, bytes: &[u8]) -> Result<Self, VaultError> {
        let dir = parent_dir(target);
        std::fs::create_dir_all(dir).map_err(|e| VaultError::io(dir, e))?;

        // tempfile creates the file with 0600 permissions on Unix.
        let mut temp = NamedTempFile::new_in(dir).map_err(|e| VaultError::io(dir, e))?;
        temp.write_all(bytes)
            .map_err(|e| VaultError::io(temp.path(), e))?;
        temp.as_file()
            .sync_all()
            .map_err(|e| VaultError::io(temp.path(), e))?;

        Ok(Self {
            temp,
            target: target.to_path_buf(),
        })
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Atomically rename the staged file over its target.
    pub fn commit(self) -> Result<(), VaultError> {
        let Self { temp, target } = self;
        temp.persist(&target)
            .map_err(|e| VaultError::io(&target, e.error))?;
        sync_dir(parent_dir(&target));
        Ok(())
    }
}

/// Replace `target` with `bytes` in one step.
pub fn write_atomic(target: &Path, bytes: &[u8]) -> Result<(), VaultError> {
    StagedFile::stage(target, bytes)?.commit()
}

fn parent_dir(path: &Path) -> &Path {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

/// Best-effort fsync of the directory so the rename itself is durable.
fn sync_dir(dir: &Path) {
    if let Ok(handle) = File::open(dir) {
        let _ = handle.sync_all();
    }
}
