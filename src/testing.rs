//! Test doubles shared by unit tests

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::embeddings::Embedder;
use crate::index::{CollectionStatus, Distance, IndexedPoint, MemoryIndex, ScoredPoint, VectorIndex};
use crate::{FaqError, Result};

/// Deterministic embedder hashing character trigrams into buckets.
/// Identical texts get identical vectors; unrelated texts score lower.
pub struct TrigramEmbedder {
    pub dimension: usize,
    pub calls: AtomicUsize,
}

impl TrigramEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            calls: AtomicUsize::new(0),
        }
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0xcbf2_9ce4_8422_2325, |hash, &byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
    })
}

impl Embedder for TrigramEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let chars: Vec<char> = format!("  {}  ", text.to_lowercase()).chars().collect();
        let mut vector = vec![0.0; self.dimension];
        for window in chars.windows(3) {
            let trigram: String = window.iter().collect();
            let bucket = (fnv1a(trigram.as_bytes()) % self.dimension as u64) as usize;
            vector[bucket] += 1.0;
        }
        Ok(vector)
    }
}

/// Embedder whose every call fails
pub struct FailingEmbedder;

impl Embedder for FailingEmbedder {
    fn dimension(&self) -> usize {
        8
    }

    fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(FaqError::Embedding("embedding service unavailable".to_string()))
    }
}

/// Memory index that starts failing upserts after `allowed_upserts` calls
pub struct FlakyIndex {
    pub inner: MemoryIndex,
    pub allowed_upserts: usize,
    pub upserts: AtomicUsize,
}

impl FlakyIndex {
    pub fn new(allowed_upserts: usize) -> Self {
        Self {
            inner: MemoryIndex::new(),
            allowed_upserts,
            upserts: AtomicUsize::new(0),
        }
    }
}

impl VectorIndex for FlakyIndex {
    fn collection_status(&self, collection: &str) -> Result<CollectionStatus> {
        self.inner.collection_status(collection)
    }

    fn create_collection(
        &self,
        collection: &str,
        dimension: usize,
        distance: Distance,
    ) -> Result<()> {
        self.inner.create_collection(collection, dimension, distance)
    }

    fn upsert(&self, collection: &str, points: Vec<IndexedPoint>) -> Result<()> {
        if self.upserts.fetch_add(1, Ordering::SeqCst) >= self.allowed_upserts {
            return Err(FaqError::VectorIndex("connection reset".to_string()));
        }
        self.inner.upsert(collection, points)
    }

    fn search(&self, collection: &str, vector: &[f32], top_k: usize) -> Result<Vec<ScoredPoint>> {
        self.inner.search(collection, vector, top_k)
    }

    fn count(&self, collection: &str) -> Result<usize> {
        self.inner.count(collection)
    }
}
