use std::path::Path;

use serde_json::Value;

use crate::error::CodecError;
use crate::reader::{Decoded, WorldReader};

/// A document parsed once and decoded any number of times, e.g. a prefab
/// spawned repeatedly. Every instance gets fresh entity ids.
#[derive(Debug, Clone)]
pub struct SceneTemplate {
    document: Value,
}

impl SceneTemplate {
    pub fn from_value(document: Value) -> Self {
        Self { document }
    }

    pub fn parse(text: &str) -> Result<Self, CodecError> {
        Ok(Self::from_value(serde_json::from_str(text)?))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CodecError> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(CodecError::EmptyPath);
        }
        let file = std::fs::File::open(path).map_err(|source| CodecError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let document = serde_json::from_reader(std::io::BufReader::new(file))?;
        tracing::debug!(path = %path.display(), "template loaded");
        Ok(Self::from_value(document))
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn instantiate(&self, reader: &WorldReader) -> Result<Decoded, CodecError> {
        reader.read_value(&self.document)
    }
}
