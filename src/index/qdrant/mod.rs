
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use super::{
    CollectionStatus, Distance, IndexedPoint, PointId, ScoredPoint, StoredPayload, VectorIndex,
};
use crate::config::IndexConfig;
use crate::{FaqError, Result};

/// Vector index backed by a Qdrant server's REST API
#[derive(Debug, Clone)]
pub struct QdrantIndex {
    base_url: Url,
    api_key: Option<String>,
    agent: ureq::Agent,
}

/// Envelope wrapping every Qdrant response
#[derive(Debug, Deserialize)]
struct QdrantResponse<T> {
    result: T,
}

#[derive(Debug, Deserialize)]
struct CollectionInfo {
    config: CollectionConfig,
}

#[derive(Debug, Deserialize)]
struct CollectionConfig {
    params: CollectionParams,
}

#[derive(Debug, Deserialize)]
struct CollectionParams {
    vectors: VectorParams,
}

#[derive(Debug, Serialize, Deserialize)]
struct VectorParams {
    /// Absent when the collection uses named vectors
    #[serde(default)]
    size: Option<usize>,
    #[serde(default)]
    distance: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateCollectionRequest {
    vectors: VectorParams,
}

#[derive(Debug, Serialize)]
struct UpsertRequest<'a> {
    points: &'a [IndexedPoint],
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    vector: &'a [f32],
    limit: usize,
    with_payload: bool,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    id: PointId,
    score: f32,
    #[serde(default)]
    payload: Option<StoredPayload>,
}

#[derive(Debug, Deserialize)]
struct CountResult {
    count: usize,
}

#[derive(Debug, Clone, Copy)]
enum BodyMethod {
    Put,
    Post,
}

impl QdrantIndex {
    #[inline]
    pub fn new(config: &IndexConfig) -> Result<Self> {
        let base_url = config
            .qdrant_url()
            .map_err(|e| FaqError::Config(format!("Failed to generate Qdrant URL: {}", e)))?;

        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_seconds)))
            .build()
            .into();

        Ok(Self {
            base_url,
            api_key: config.api_key.clone().filter(|key| !key.trim().is_empty()),
            agent,
        })
    }

    fn collection_url(&self, collection: &str, suffix: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| FaqError::Config(format!("Invalid Qdrant base URL: {}", self.base_url)))?
            .pop_if_empty()
            .push("collections")
            .push(collection)
            .extend(suffix);
        Ok(url)
    }

    fn get(&self, url: &Url) -> std::result::Result<String, ureq::Error> {
        let mut request = self.agent.get(url.as_str());
        if let Some(api_key) = &self.api_key {
            request = request.header("api-key", api_key.as_str());
        }
        request
            .call()
            .and_then(|mut resp| resp.body_mut().read_to_string())
    }

    fn send_json(
        &self,
        method: BodyMethod,
        url: &Url,
        body: &str,
    ) -> std::result::Result<String, ureq::Error> {
        let mut request = match method {
            BodyMethod::Put => self.agent.put(url.as_str()),
            BodyMethod::Post => self.agent.post(url.as_str()),
        };
        if let Some(api_key) = &self.api_key {
            request = request.header("api-key", api_key.as_str());
        }
        request
            .header("Content-Type", "application/json")
            .send(body)
            .and_then(|mut resp| resp.body_mut().read_to_string())
    }
}

fn parse<T: for<'de> Deserialize<'de>>(body: &str, what: &str) -> Result<T> {
    serde_json::from_str::<QdrantResponse<T>>(body)
        .map(|response| response.result)
        .map_err(|e| FaqError::VectorIndex(format!("Failed to parse {} response: {}", what, e)))
}

fn to_json<T: Serialize>(value: &T, what: &str) -> Result<String> {
    serde_json::to_string(value)
        .map_err(|e| FaqError::VectorIndex(format!("Failed to serialize {} request: {}", what, e)))
}

impl VectorIndex for QdrantIndex {
    #[inline]
    fn collection_status(&self, collection: &str) -> Result<CollectionStatus> {
        let url = self.collection_url(collection, &[])?;
        debug!("Looking up collection at {}", url);

        let body = match self.get(&url) {
            Ok(body) => body,
            Err(ureq::Error::StatusCode(404)) => {
                debug!("Collection {} does not exist", collection);
                return Ok(CollectionStatus::Missing);
            }
            Err(e) => {
                return Err(FaqError::VectorIndex(format!(
                    "Failed to look up collection {}: {}",
                    collection, e
                )));
            }
        };

        let info: CollectionInfo = parse(&body, "collection info")?;
        let dimension = info.config.params.vectors.size.ok_or_else(|| {
            FaqError::VectorIndex(format!(
                "Collection {} uses named vectors, which are not supported",
                collection
            ))
        })?;

        debug!(
            "Collection {} exists with {} dimensions ({:?})",
            collection, dimension, info.config.params.vectors.distance
        );
        Ok(CollectionStatus::Exists { dimension })
    }

    #[inline]
    fn create_collection(
        &self,
        collection: &str,
        dimension: usize,
        distance: Distance,
    ) -> Result<()> {
        let url = self.collection_url(collection, &[])?;
        let request = CreateCollectionRequest {
            vectors: VectorParams {
                size: Some(dimension),
                distance: Some(distance.qdrant_name().to_string()),
            },
        };

        self.send_json(BodyMethod::Put, &url, &to_json(&request, "create collection")?)
            .map_err(|e| {
                FaqError::VectorIndex(format!(
                    "Failed to create collection {}: {}",
                    collection, e
                ))
            })?;

        info!(
            "Created collection {} with {} dimensions",
            collection, dimension
        );
        Ok(())
    }

    #[inline]
    fn upsert(&self, collection: &str, points: Vec<IndexedPoint>) -> Result<()> {
        if points.is_empty() {
            debug!("No points to upsert");
            return Ok(());
        }

        let mut url = self.collection_url(collection, &["points"])?;
        url.query_pairs_mut().append_pair("wait", "true");

        let body = to_json(&UpsertRequest { points: &points }, "upsert")?;
        self.send_json(BodyMethod::Put, &url, &body).map_err(|e| {
            FaqError::VectorIndex(format!(
                "Failed to upsert {} points into {}: {}",
                points.len(),
                collection,
                e
            ))
        })?;

        debug!("Upserted {} points into {}", points.len(), collection);
        Ok(())
    }

    #[inline]
    fn search(&self, collection: &str, vector: &[f32], top_k: usize) -> Result<Vec<ScoredPoint>> {
        let url = self.collection_url(collection, &["points", "search"])?;
        let request = SearchRequest {
            vector,
            limit: top_k,
            with_payload: true,
        };

        let body = self
            .send_json(BodyMethod::Post, &url, &to_json(&request, "search")?)
            .map_err(|e| {
                FaqError::VectorIndex(format!("Failed to search {}: {}", collection, e))
            })?;

        let hits: Vec<SearchHit> = parse(&body, "search")?;
        debug!("Search in {} returned {} hits", collection, hits.len());

        Ok(hits
            .into_iter()
            .map(|hit| ScoredPoint {
                id: hit.id,
                score: hit.score,
                payload: hit.payload.unwrap_or_default(),
            })
            .collect())
    }

    #[inline]
    fn count(&self, collection: &str) -> Result<usize> {
        let url = self.collection_url(collection, &["points", "count"])?;
        let body = self
            .send_json(BodyMethod::Post, &url, &json!({ "exact": true }).to_string())
            .map_err(|e| {
                FaqError::VectorIndex(format!("Failed to count points in {}: {}", collection, e))
            })?;

        let result: CountResult = parse(&body, "count")?;
        Ok(result.count)
    }
}
