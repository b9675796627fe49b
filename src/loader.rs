//! Model Loading
//!
//! Decodes models from JSON strings, files and directory trees, and encodes
//! them back. A decode failure is a [`TwinError`], never a validation defect.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::{LoaderConfig, OutputFormat};
use crate::error::{Result, TwinError};
use crate::model::Model;

/// Outcome of loading one file from a directory
#[derive(Debug)]
pub struct LoadedModel {
    /// Path relative to the scanned directory
    pub path: PathBuf,
    pub outcome: Result<Model>,
}

/// Decode a model from JSON text
pub fn from_json_str(content: &str) -> Result<Model> {
    Ok(serde_json::from_str(content)?)
}

/// Decode a model from a JSON file
pub fn from_file(path: impl AsRef<Path>) -> Result<Model> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(TwinError::NotFound(path.display().to_string()));
    }

    let content = fs::read_to_string(path)?;
    let model = from_json_str(&content)?;
    debug!(path = %path.display(), id = %model.id, "loaded model");
    Ok(model)
}

/// Decode every model file under a directory.
///
/// Each file gets its own outcome so a broken file does not hide the rest.
/// Results are sorted by path.
pub fn load_directory(dir: &Path, config: &LoaderConfig) -> Result<Vec<LoadedModel>> {
    if !dir.is_dir() {
        return Err(TwinError::NotFound(dir.display().to_string()));
    }

    let mut loaded = Vec::new();

    for entry in WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| {
            entry
                .map_err(|e| warn!(dir = %dir.display(), error = %e, "skipping unreadable entry"))
                .ok()
        })
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if path
            .extension()
            .map(|e| e != config.extension.as_str())
            .unwrap_or(true)
        {
            continue;
        }

        let relative = path.strip_prefix(dir).unwrap_or(path).to_path_buf();
        let relative_str = relative.to_string_lossy().replace('\\', "/");
        if config
            .skip_prefixes
            .iter()
            .any(|p| relative_str.starts_with(p.as_str()))
        {
            continue;
        }

        let outcome = from_file(path);
        if let Err(e) = &outcome {
            warn!(path = %relative_str, error = %e, "failed to decode model");
        }
        loaded.push(LoadedModel {
            path: relative,
            outcome,
        });
    }

    info!(dir = %dir.display(), files = loaded.len(), "scanned model directory");
    Ok(loaded)
}

/// Encode a model as JSON
pub fn to_json_string(model: &Model, format: OutputFormat) -> Result<String> {
    let json = match format {
        OutputFormat::Pretty => serde_json::to_string_pretty(model)?,
        OutputFormat::Compact => serde_json::to_string(model)?,
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Property, CONTEXT};

    fn sample_json(id: &str) -> String {
        format!(
            r#"{{
                "@context": "{}",
                "@id": "{}",
                "@type": "Interface",
                "displayName": "Sample",
                "description": "Sample device"
            }}"#,
            CONTEXT, id
        )
    }

    #[test]
    fn test_from_json_str() {
        let model = from_json_str(&sample_json("dtmi:com:example:Sample;1")).unwrap();
        assert_eq!(model.display_name, "Sample");
    }

    #[test]
    fn test_decode_failure_is_an_error() {
        let err = from_json_str(r#"{ "@id": "dtmi:a;1" }"#).unwrap_err();
        assert!(matches!(err, TwinError::Json(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = from_file("does/not/exist.json").unwrap_err();
        assert!(matches!(err, TwinError::NotFound(_)));
    }

    #[test]
    fn test_encode_decode_preserves_model() {
        let model = Model::new("dtmi:com:example:Sample;1", "Sample", "Sample device")
            .with_properties(vec![Property::new("level", "double")]);

        for format in [OutputFormat::Pretty, OutputFormat::Compact] {
            let json = to_json_string(&model, format).unwrap();
            assert_eq!(from_json_str(&json).unwrap(), model);
        }
    }

    #[test]
    fn test_load_directory_reports_each_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("devices")).unwrap();
        fs::create_dir_all(dir.path().join("target")).unwrap();

        fs::write(dir.path().join("devices/a.json"), sample_json("dtmi:com:example:A;1")).unwrap();
        fs::write(dir.path().join("devices/b.json"), "{ not json").unwrap();
        fs::write(dir.path().join("devices/notes.txt"), "ignored").unwrap();
        fs::write(dir.path().join("target/c.json"), sample_json("dtmi:com:example:C;1")).unwrap();

        let loaded = load_directory(dir.path(), &LoaderConfig::default()).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].path, PathBuf::from("devices/a.json"));
        assert!(loaded[0].outcome.is_ok());
        assert!(loaded[1].outcome.is_err());
    }
}
