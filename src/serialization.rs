//! Parameter serialization and artifact persistence.
//!
//! Fitted components expose plain-data parameter structs; this module
//! turns those into bytes and moves them to and from disk. Artifacts are
//! opaque bincode blobs at caller-chosen paths, written with
//! create-or-overwrite semantics.

use crate::error::PipelineError;
use std::fs;
use std::path::Path;

/// A parameter representation that can be serialized to and from bytes.
///
/// Implementors should contain only plain data (`Vec<f64>`, strings,
/// scalars), never live transformer state.
pub trait SerializableParams: Sized {
    /// The error type returned during (de)serialization.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Serialize the parameters into a byte buffer.
    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error>;

    /// Deserialize the parameters from a byte buffer.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error>;
}

impl<T> SerializableParams for T
where
    T: serde::Serialize + for<'de> serde::Deserialize<'de>,
{
    type Error = bincode::Error;

    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error> {
        bincode::serialize(self)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error> {
        bincode::deserialize(bytes)
    }
}

/// Persist an object's parameters to `path`, creating parent directories
/// as needed. An existing file is overwritten.
pub fn save_object<T, P>(path: P, object: &T) -> Result<(), PipelineError>
where
    T: SerializableParams,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| PipelineError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    let bytes = object.to_bytes().map_err(|e| PipelineError::Artifact {
        op: "encode",
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;
    fs::write(path, bytes).map_err(|e| PipelineError::Artifact {
        op: "write",
        path: path.to_path_buf(),
        source: Box::new(e),
    })
}

/// Load an object's parameters back from `path`.
pub fn load_object<T, P>(path: P) -> Result<T, PipelineError>
where
    T: SerializableParams,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| PipelineError::Artifact {
        op: "read",
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;
    T::from_bytes(&bytes).map_err(|e| PipelineError::Artifact {
        op: "decode",
        path: path.to_path_buf(),
        source: Box::new(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct DemoParams {
        values: Vec<f64>,
        label: String,
    }

    #[test]
    fn test_save_load_round_trip() {
        let params = DemoParams {
            values: vec![1.5, -2.0],
            label: "demo".to_string(),
        };
        let path = std::env::temp_dir().join("freightcast_test_artifact.bin");

        save_object(&path, &params).unwrap();
        let restored: DemoParams = load_object(&path).unwrap();
        assert_eq!(restored, params);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = std::env::temp_dir().join("freightcast_test_nested");
        let path = dir.join("deep").join("artifact.bin");
        std::fs::remove_dir_all(&dir).ok();

        let params = DemoParams {
            values: vec![0.0],
            label: "nested".to_string(),
        };
        save_object(&path, &params).unwrap();
        assert!(path.exists());

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_load_missing_file_names_the_path() {
        let path = std::env::temp_dir().join("freightcast_test_absent.bin");
        std::fs::remove_file(&path).ok();

        let result: Result<DemoParams, _> = load_object(&path);
        match result {
            Err(PipelineError::Artifact { op: "read", .. }) => {}
            other => panic!("expected artifact read error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_corrupt_bytes_is_decode_error() {
        let path = std::env::temp_dir().join("freightcast_test_corrupt.bin");
        std::fs::write(&path, [0xff, 0xff, 0xff]).unwrap();

        let result: Result<DemoParams, _> = load_object(&path);
        assert!(matches!(
            result,
            Err(PipelineError::Artifact { op: "decode", .. })
        ));

        std::fs::remove_file(path).ok();
    }
}
