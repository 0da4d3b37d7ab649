// Ingestion module
// Embeds every FAQ question and upserts it into the vector index


use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::{FaqError, Result};
use crate::embeddings::Embedder;
use crate::faq::FaqEntry;
use crate::index::{Distance, FaqPayload, IndexedPoint, PointId, VectorIndex};

/// How point ids are derived from FAQ entries
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    /// Position in the loaded sequence. Reordering or shrinking the source
    /// overwrites unrelated points or leaves stale ones behind.
    #[default]
    Sequential,
    /// UUID v5 of the question and answer text, stable across reorderings
    ContentHash,
}

impl IdStrategy {
    #[inline]
    pub fn point_id(self, entry: &FaqEntry) -> PointId {
        match self {
            Self::Sequential => PointId::Num(entry.id),
            Self::ContentHash => {
                let name = format!("{}\u{1f}{}", entry.question, entry.answer);
                PointId::Uuid(Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes()))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IngestSettings {
    pub collection: String,
    pub distance: Distance,
    pub id_strategy: IdStrategy,
    /// Entries embedded and upserted per round trip
    pub batch_size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    pub collection: String,
    pub created_collection: bool,
    pub points_upserted: usize,
}

/// Make sure the collection exists, then embed and upsert every entry in order.
///
/// Fails on the first embedding or upsert error; points written before the
/// failure stay in the index.
#[inline]
pub fn ingest(
    embedder: &dyn Embedder,
    index: &dyn VectorIndex,
    settings: &IngestSettings,
    entries: &[FaqEntry],
) -> Result<IngestReport> {
    let created_collection = index.ensure_collection(
        &settings.collection,
        embedder.dimension(),
        settings.distance,
    )?;

    info!(
        "Ingesting {} FAQ entries into {}",
        entries.len(),
        settings.collection
    );

    let bar = if console::user_attended_stderr() {
        ProgressBar::new(entries.len() as u64).with_style(
            ProgressStyle::with_template("{spinner} [{pos}/{len}] Embedding {msg}")
                .expect("style template is valid"),
        )
    } else {
        ProgressBar::hidden()
    };

    let mut points_upserted = 0;
    for batch in entries.chunks(settings.batch_size.max(1)) {
        let questions: Vec<String> = batch.iter().map(|e| e.question.clone()).collect();
        bar.set_message(questions.first().cloned().unwrap_or_default());

        let vectors = embedder.embed_batch(&questions).inspect_err(|e| {
            error!("Failed to embed FAQ batch: {}", e);
        })?;

        if vectors.len() != batch.len() {
            error!(
                "Embedder returned {} vectors for {} questions",
                vectors.len(),
                batch.len()
            );
            return Err(FaqError::Embedding(format!(
                "Expected {} embeddings, got {}",
                batch.len(),
                vectors.len()
            )));
        }

        let points: Vec<IndexedPoint> = batch
            .iter()
            .zip(vectors)
            .map(|(entry, vector)| IndexedPoint {
                id: settings.id_strategy.point_id(entry),
                vector,
                payload: FaqPayload {
                    question: entry.question.clone(),
                    answer: entry.answer.clone(),
                },
            })
            .collect();

        let count = points.len();
        index
            .upsert(&settings.collection, points)
            .inspect_err(|e| error!("Failed to upsert FAQ batch: {}", e))?;

        points_upserted += count;
        bar.inc(count as u64);
        debug!("Upserted {}/{} entries", points_upserted, entries.len());
    }
    bar.finish_and_clear();

    info!(
        "Ingestion finished: {} points upserted into {}",
        points_upserted, settings.collection
    );

    Ok(IngestReport {
        collection: settings.collection.clone(),
        created_collection,
        points_upserted,
    })
}
