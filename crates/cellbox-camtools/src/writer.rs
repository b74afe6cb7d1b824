//! Writing finished programs to disk
//!
//! Every artifact is rendered into a hidden temporary sibling first. Only
//! when all of them were opened and written are they renamed into place, so
//! a failure never leaves a complete-looking program behind.

use crate::error::{CamToolError, CamToolResult};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

const DEFAULT_EXTENSION: &str = "ngc";

/// Output paths for one run.
///
/// Without covers `output` is used as is. With covers it is a prefix:
/// `box.ngc` becomes `box_main.ngc` and `box_cover.ngc`.
pub fn artifact_paths(output: &Path, covers: bool) -> CamToolResult<Vec<PathBuf>> {
    let stem = output
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| {
            CamToolError::InvalidParameters(format!(
                "output path {} has no file name",
                output.display()
            ))
        })?;

    if !covers {
        return Ok(vec![output.to_path_buf()]);
    }

    let extension = output
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or(DEFAULT_EXTENSION);
    Ok(["main", "cover"]
        .iter()
        .map(|part| output.with_file_name(format!("{}_{}.{}", stem, part, extension)))
        .collect())
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", name))
}

fn discard(temps: &[PathBuf]) {
    for temp in temps {
        if let Err(e) = fs::remove_file(temp) {
            tracing::warn!("Failed to remove {}: {}", temp.display(), e);
        }
    }
}

/// Write `(path, content)` pairs, all or nothing.
pub fn write_artifacts(artifacts: &[(PathBuf, String)]) -> CamToolResult<()> {
    let mut opened = Vec::with_capacity(artifacts.len());
    let mut temps = Vec::with_capacity(artifacts.len());

    for (path, _) in artifacts {
        let temp = temp_path(path);
        match File::create(&temp) {
            Ok(file) => {
                opened.push(file);
                temps.push(temp);
            }
            Err(source) => {
                discard(&temps);
                return Err(CamToolError::Artifact {
                    path: path.clone(),
                    source,
                });
            }
        }
    }

    for ((path, content), file) in artifacts.iter().zip(opened.iter_mut()) {
        if let Err(source) = file.write_all(content.as_bytes()).and_then(|_| file.sync_all()) {
            discard(&temps);
            return Err(CamToolError::Artifact {
                path: path.clone(),
                source,
            });
        }
    }
    drop(opened);

    for (index, ((path, _), temp)) in artifacts.iter().zip(&temps).enumerate() {
        if let Err(source) = fs::rename(temp, path) {
            discard(&temps[index..]);
            return Err(CamToolError::Artifact {
                path: path.clone(),
                source,
            });
        }
        tracing::info!("Wrote {}", path.display());
    }

    Ok(())
}
