//! Copy of the user's everyday profile into the dedicated debugging profile.
//!
//! Chromium refuses remote debugging on its default user-data directory, so
//! recovery relaunches against a separate directory seeded from the real one.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Directories that are large, rebuildable and never needed for a session.
const SKIPPED_DIRS: &[&str] = &["Cache", "Code Cache", "GPUCache", "ShaderCache", "Crashpad"];

/// Outcome of a profile copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProfileSync {
    pub copied: u64,
    pub failed: u64,
}

/// Single-instance locks and sockets of a running browser.
fn is_lock_file(name: &OsStr) -> bool {
    let name = name.to_string_lossy();
    name.starts_with("Singleton") || name == "lockfile" || name == "RunningChromeVersion"
}

fn is_copied(entry: &DirEntry) -> bool {
    let name = entry.file_name();
    if entry.depth() == 0 {
        return true;
    }
    if entry.file_type().is_dir() {
        return !SKIPPED_DIRS.iter().any(|d| name == OsStr::new(d));
    }
    !is_lock_file(name)
}

/// Replace `dest` with a copy of `source`.
///
/// Files that cannot be read (held open by another process, permissions)
/// are counted and skipped rather than failing the copy.
pub fn sync_profile(source: &Path, dest: &Path) -> io::Result<ProfileSync> {
    if !source.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("profile directory not found: {}", source.display()),
        ));
    }
    if dest.exists() {
        fs::remove_dir_all(dest)?;
    }
    fs::create_dir_all(dest)?;

    let mut stats = ProfileSync::default();
    for entry in WalkDir::new(source).follow_links(false).into_iter().filter_entry(is_copied) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!(error = %e, "Skipping unreadable profile entry");
                stats.failed += 1;
                continue;
            }
        };
        let Ok(relative) = entry.path().strip_prefix(source) else {
            continue;
        };
        if relative.as_os_str().is_empty() {
            continue;
        }
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else if entry.file_type().is_file() {
            match fs::copy(entry.path(), &target) {
                Ok(_) => stats.copied += 1,
                Err(e) => {
                    debug!(path = %entry.path().display(), error = %e, "Failed to copy profile file");
                    stats.failed += 1;
                }
            }
        }
    }

    if stats.failed > 0 {
        warn!(copied = stats.copied, failed = stats.failed, "Profile copied with failures");
    }
    Ok(stats)
}
