// Query service module
// Answers a question with the closest stored FAQ entry


use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::Result;
use crate::embeddings::Embedder;
use crate::index::VectorIndex;

/// Answer returned when the index has nothing to offer
pub const NOT_FOUND_ANSWER: &str = "Cevap bulunamadı.";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryRequest {
    pub question: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryResponse {
    pub answer: String,
    pub score: f32,
}

impl QueryResponse {
    #[inline]
    pub fn not_found() -> Self {
        Self {
            answer: NOT_FOUND_ANSWER.to_string(),
            score: 0.0,
        }
    }
}

/// Embeds questions and looks up the nearest FAQ point
#[derive(Clone)]
pub struct QueryService {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    collection: String,
    min_score: Option<f32>,
}

impl QueryService {
    #[inline]
    pub fn new(
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            embedder,
            index,
            collection: collection.into(),
            min_score: None,
        }
    }

    /// Report best matches scoring below `min_score` as not found
    #[inline]
    pub fn with_min_score(mut self, min_score: Option<f32>) -> Self {
        self.min_score = min_score;
        self
    }

    #[inline]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Number of points currently stored in the collection
    #[inline]
    pub fn point_count(&self) -> Result<usize> {
        self.index.count(&self.collection)
    }

    /// Answer `question` with the single nearest FAQ entry
    #[inline]
    pub fn answer(&self, question: &str) -> Result<QueryResponse> {
        let vector = self.embedder.embed(question)?;
        let hits = self.index.search(&self.collection, &vector, 1)?;

        let Some(best) = hits.into_iter().next() else {
            debug!("No points in {} for question", self.collection);
            return Ok(QueryResponse::not_found());
        };

        if let Some(min_score) = self.min_score {
            if best.score < min_score {
                debug!(
                    "Best match {} scored {} below threshold {}",
                    best.id, best.score, min_score
                );
                return Ok(QueryResponse::not_found());
            }
        }

        debug!("Best match {} with score {}", best.id, best.score);
        Ok(QueryResponse {
            answer: best
                .payload
                .answer
                .unwrap_or_else(|| NOT_FOUND_ANSWER.to_string()),
            score: best.score,
        })
    }
}
