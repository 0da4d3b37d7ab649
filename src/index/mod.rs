// Vector index module
// Collection management, point upserts and nearest-neighbor search


pub mod memory;
pub mod qdrant;

pub use memory::MemoryIndex;
pub use qdrant::QdrantIndex;

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{FaqError, Result};

/// Similarity metric a collection is created with
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Distance {
    #[default]
    Cosine,
    Dot,
    Euclid,
}

impl Distance {
    /// Name used by the Qdrant API
    #[inline]
    pub fn qdrant_name(self) -> &'static str {
        match self {
            Self::Cosine => "Cosine",
            Self::Dot => "Dot",
            Self::Euclid => "Euclid",
        }
    }
}

impl fmt::Display for Distance {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cosine => f.write_str("cosine"),
            Self::Dot => f.write_str("dot"),
            Self::Euclid => f.write_str("euclid"),
        }
    }
}

/// Point identifier, serialized as a bare number or UUID string
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(untagged)]
pub enum PointId {
    Num(u64),
    Uuid(Uuid),
}

impl fmt::Display for PointId {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(id) => write!(f, "{}", id),
            Self::Uuid(id) => write!(f, "{}", id),
        }
    }
}

/// Payload stored with every FAQ point
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FaqPayload {
    pub question: String,
    pub answer: String,
}

/// Payload as read back from the index; fields written by other tools may be absent
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredPayload {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
}

impl From<FaqPayload> for StoredPayload {
    #[inline]
    fn from(payload: FaqPayload) -> Self {
        Self {
            question: Some(payload.question),
            answer: Some(payload.answer),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct IndexedPoint {
    pub id: PointId,
    pub vector: Vec<f32>,
    pub payload: FaqPayload,
}

/// A search hit; higher scores are more similar
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPoint {
    pub id: PointId,
    pub score: f32,
    pub payload: StoredPayload,
}

/// Outcome of a collection lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionStatus {
    Missing,
    Exists { dimension: usize },
}

/// A vector store that can hold FAQ points.
///
/// `collection_status` must only report [`CollectionStatus::Missing`] when the backend
/// definitively says the collection does not exist; transport and server failures are
/// returned as errors so they are never mistaken for an absent collection.
pub trait VectorIndex: Send + Sync {
    fn collection_status(&self, collection: &str) -> Result<CollectionStatus>;

    fn create_collection(&self, collection: &str, dimension: usize, distance: Distance)
    -> Result<()>;

    /// Insert points, overwriting any existing point with the same id
    fn upsert(&self, collection: &str, points: Vec<IndexedPoint>) -> Result<()>;

    /// Return up to `top_k` points ordered by descending score
    fn search(&self, collection: &str, vector: &[f32], top_k: usize) -> Result<Vec<ScoredPoint>>;

    fn count(&self, collection: &str) -> Result<usize>;

    /// Create the collection unless it already exists. Returns whether it was created.
    #[inline]
    fn ensure_collection(
        &self,
        collection: &str,
        dimension: usize,
        distance: Distance,
    ) -> Result<bool> {
        match self.collection_status(collection)? {
            CollectionStatus::Exists {
                dimension: existing,
            } if existing == dimension => {
                debug!("Collection {} already exists", collection);
                Ok(false)
            }
            CollectionStatus::Exists {
                dimension: existing,
            } => Err(FaqError::DimensionMismatch {
                collection: collection.to_string(),
                expected: dimension,
                actual: existing,
            }),
            CollectionStatus::Missing => {
                info!(
                    "Creating collection {} ({} dimensions, {})",
                    collection, dimension, distance
                );
                self.create_collection(collection, dimension, distance)?;
                Ok(true)
            }
        }
    }
}
