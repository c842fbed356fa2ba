//! Artifact format and source detection

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Serialization format of a model artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFormat {
    Json,
    Yaml,
}

impl ArtifactFormat {
    pub fn name(&self) -> &'static str {
        match self {
            ArtifactFormat::Json => "JSON",
            ArtifactFormat::Yaml => "YAML",
        }
    }
}

/// Detected artifact source
#[derive(Debug, Clone)]
pub struct ArtifactSource {
    /// Path to the artifact file
    pub path: PathBuf,
    /// Detected format
    pub format: ArtifactFormat,
}

/// Detect artifact format and location from a path
///
/// The path can be:
/// - A direct path to a `.json`, `.yaml` or `.yml` file
/// - A directory containing `model.json`, `model.yaml` or a single `*.json`
pub fn detect_artifact_source<P: AsRef<Path>>(path: P) -> Result<ArtifactSource> {
    let path = path.as_ref();

    if path.is_file() {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let format = format_for_extension(ext).ok_or_else(|| Error::ArtifactInvalid {
            path: path.to_path_buf(),
            reason: format!("unsupported artifact format: .{}", ext),
        })?;
        Ok(ArtifactSource {
            path: path.to_path_buf(),
            format,
        })
    } else if path.is_dir() {
        detect_artifact_in_directory(path)
    } else {
        Err(Error::ArtifactNotFound(path.to_path_buf()))
    }
}

fn format_for_extension(ext: &str) -> Option<ArtifactFormat> {
    match ext {
        "json" => Some(ArtifactFormat::Json),
        "yaml" | "yml" => Some(ArtifactFormat::Yaml),
        _ => None,
    }
}

/// Detect an artifact file inside a directory
fn detect_artifact_in_directory(dir: &Path) -> Result<ArtifactSource> {
    for name in ["model.json", "model.yaml", "model.yml"] {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return detect_artifact_source(candidate);
        }
    }

    if let Some(json) = find_json_in_dir(dir) {
        return Ok(ArtifactSource {
            path: json,
            format: ArtifactFormat::Json,
        });
    }

    Err(Error::ArtifactNotFound(dir.to_path_buf()))
}

/// Find the first JSON file in a directory
fn find_json_in_dir(dir: &Path) -> Option<PathBuf> {
    let pattern = dir.join("*.json");
    glob::glob(pattern.to_str()?)
        .ok()?
        .filter_map(|r| r.ok())
        .next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_path_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = detect_artifact_source(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, Error::ArtifactNotFound(_)));
    }

    #[test]
    fn test_format_from_extension() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("clf.yml");
        std::fs::write(&yaml, "").unwrap();
        assert_eq!(detect_artifact_source(&yaml).unwrap().format, ArtifactFormat::Yaml);

        let bin = dir.path().join("model.joblib");
        std::fs::write(&bin, "").unwrap();
        assert!(matches!(
            detect_artifact_source(&bin),
            Err(Error::ArtifactInvalid { .. })
        ));
    }

    #[test]
    fn test_directory_lookup() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            detect_artifact_source(dir.path()),
            Err(Error::ArtifactNotFound(_))
        ));

        std::fs::write(dir.path().join("best.json"), "{}").unwrap();
        let source = detect_artifact_source(dir.path()).unwrap();
        assert_eq!(source.format, ArtifactFormat::Json);
        assert!(source.path.ends_with("best.json"));

        std::fs::write(dir.path().join("model.yaml"), "").unwrap();
        let source = detect_artifact_source(dir.path()).unwrap();
        assert!(source.path.ends_with("model.yaml"));
    }
}
