//! Artifact contents
//!
//! Generated artifacts are either raw bytes (PNG, ICO) or text (manifests,
//! browserconfig XML). Both are handed to the host untouched.

use crate::hash::ContentHash;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// Raw contents of a generated artifact
///
/// On the generator wire format text contents are plain JSON strings and
/// binary contents are `{ "base64": "..." }` objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireContents", into = "WireContents")]
pub enum ArtifactContents {
    /// Binary payload, e.g. a PNG image
    Binary(Vec<u8>),
    /// Text payload, e.g. a web manifest
    Text(String),
}

impl ArtifactContents {
    /// Borrow the raw bytes
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Binary(data) => data,
            Self::Text(text) => text.as_bytes(),
        }
    }

    /// Convert to bytes (consumes self)
    #[inline]
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Binary(data) => data,
            Self::Text(text) => text.into_bytes(),
        }
    }

    /// Content length in bytes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Check if empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the payload was produced as text
    #[inline]
    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// Blake3 digest of the raw bytes
    #[inline]
    #[must_use]
    pub fn hash(&self) -> ContentHash {
        ContentHash::compute(self.as_bytes())
    }
}

impl Default for ArtifactContents {
    fn default() -> Self {
        Self::Binary(Vec::new())
    }
}

impl From<Vec<u8>> for ArtifactContents {
    fn from(data: Vec<u8>) -> Self {
        Self::Binary(data)
    }
}

impl From<&[u8]> for ArtifactContents {
    fn from(data: &[u8]) -> Self {
        Self::Binary(data.to_vec())
    }
}

impl From<String> for ArtifactContents {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for ArtifactContents {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum WireContents {
    Text(String),
    Binary { base64: String },
}

impl TryFrom<WireContents> for ArtifactContents {
    type Error = base64::DecodeError;

    fn try_from(wire: WireContents) -> Result<Self, Self::Error> {
        match wire {
            WireContents::Text(text) => Ok(Self::Text(text)),
            WireContents::Binary { base64 } => STANDARD.decode(base64).map(Self::Binary),
        }
    }
}

impl From<ArtifactContents> for WireContents {
    fn from(contents: ArtifactContents) -> Self {
        match contents {
            ArtifactContents::Text(text) => Self::Text(text),
            ArtifactContents::Binary(data) => Self::Binary {
                base64: STANDARD.encode(data),
            },
        }
    }
}
