
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;
use tracing::debug;

use super::{
    CollectionStatus, Distance, FaqPayload, IndexedPoint, PointId, ScoredPoint, VectorIndex,
};
use crate::{FaqError, Result};

/// In-process vector index with exact (brute force) search
#[derive(Debug, Default)]
pub struct MemoryIndex {
    collections: RwLock<HashMap<String, MemoryCollection>>,
}

#[derive(Debug)]
struct MemoryCollection {
    dimension: usize,
    distance: Distance,
    points: BTreeMap<PointId, StoredPoint>,
}

#[derive(Debug)]
struct StoredPoint {
    vector: Vec<f32>,
    payload: FaqPayload,
}

impl MemoryIndex {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> FaqError {
    FaqError::VectorIndex("Memory index lock poisoned".to_string())
}

fn missing_collection(collection: &str) -> FaqError {
    FaqError::VectorIndex(format!("Collection {} not found", collection))
}

impl VectorIndex for MemoryIndex {
    #[inline]
    fn collection_status(&self, collection: &str) -> Result<CollectionStatus> {
        let collections = self.collections.read().map_err(poisoned)?;
        Ok(collections
            .get(collection)
            .map_or(CollectionStatus::Missing, |c| CollectionStatus::Exists {
                dimension: c.dimension,
            }))
    }

    #[inline]
    fn create_collection(
        &self,
        collection: &str,
        dimension: usize,
        distance: Distance,
    ) -> Result<()> {
        if dimension == 0 {
            return Err(FaqError::VectorIndex(
                "Vector dimension must be greater than zero".to_string(),
            ));
        }

        let mut collections = self.collections.write().map_err(poisoned)?;
        if collections.contains_key(collection) {
            return Err(FaqError::VectorIndex(format!(
                "Collection {} already exists",
                collection
            )));
        }

        collections.insert(
            collection.to_string(),
            MemoryCollection {
                dimension,
                distance,
                points: BTreeMap::new(),
            },
        );
        Ok(())
    }

    #[inline]
    fn upsert(&self, collection: &str, points: Vec<IndexedPoint>) -> Result<()> {
        let mut collections = self.collections.write().map_err(poisoned)?;
        let target = collections
            .get_mut(collection)
            .ok_or_else(|| missing_collection(collection))?;

        if let Some(bad) = points.iter().find(|p| p.vector.len() != target.dimension) {
            return Err(FaqError::VectorIndex(format!(
                "Point {} has {} dimensions, collection {} expects {}",
                bad.id,
                bad.vector.len(),
                collection,
                target.dimension
            )));
        }

        debug!("Upserting {} points into {}", points.len(), collection);
        for point in points {
            target.points.insert(
                point.id,
                StoredPoint {
                    vector: point.vector,
                    payload: point.payload,
                },
            );
        }
        Ok(())
    }

    #[inline]
    fn search(&self, collection: &str, vector: &[f32], top_k: usize) -> Result<Vec<ScoredPoint>> {
        let collections = self.collections.read().map_err(poisoned)?;
        let target = collections
            .get(collection)
            .ok_or_else(|| missing_collection(collection))?;

        if vector.len() != target.dimension {
            return Err(FaqError::VectorIndex(format!(
                "Query has {} dimensions, collection {} expects {}",
                vector.len(),
                collection,
                target.dimension
            )));
        }

        let mut hits: Vec<ScoredPoint> = target
            .points
            .iter()
            .map(|(id, point)| ScoredPoint {
                id: *id,
                score: score(target.distance, vector, &point.vector),
                payload: point.payload.clone().into(),
            })
            .collect();

        // Stable sort keeps id order among equal scores
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(top_k);
        Ok(hits)
    }

    #[inline]
    fn count(&self, collection: &str) -> Result<usize> {
        let collections = self.collections.read().map_err(poisoned)?;
        collections
            .get(collection)
            .map(|c| c.points.len())
            .ok_or_else(|| missing_collection(collection))
    }
}

/// Similarity under `distance`, oriented so that higher means closer
#[inline]
pub fn score(distance: Distance, a: &[f32], b: &[f32]) -> f32 {
    match distance {
        Distance::Cosine => cosine_similarity(a, b),
        Distance::Dot => dot(a, b) as f32,
        Distance::Euclid => -euclidean_distance(a, b),
    }
}

fn dot(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| f64::from(x) * f64::from(y))
        .sum()
}

/// Cosine similarity; zero-length vectors score 0
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b) {
        let x64 = f64::from(x);
        let y64 = f64::from(y);
        dot += x64 * y64;
        norm_a += x64 * x64;
        norm_b += y64 * y64;
    }
    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom <= f64::EPSILON {
        return 0.0;
    }
    (dot / denom) as f32
}

fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| {
            let diff = f64::from(x) - f64::from(y);
            diff * diff
        })
        .sum::<f64>()
        .sqrt() as f32
}
