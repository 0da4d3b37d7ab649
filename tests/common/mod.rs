// Shared helpers for integration tests

use faq_search::Result;
use faq_search::embeddings::Embedder;

/// Deterministic embedder hashing character trigrams into buckets, so
/// identical questions map to identical vectors.
pub struct TrigramEmbedder {
    pub dimension: usize,
}

impl Embedder for TrigramEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(trigram_vector(text, self.dimension))
    }
}

pub fn trigram_vector(text: &str, dimension: usize) -> Vec<f32> {
    let chars: Vec<char> = format!("  {}  ", text.to_lowercase()).chars().collect();
    let mut vector = vec![0.0; dimension];
    for window in chars.windows(3) {
        let trigram: String = window.iter().collect();
        let hash = trigram.bytes().fold(0xcbf2_9ce4_8422_2325_u64, |hash, byte| {
            (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
        });
        vector[(hash % dimension as u64) as usize] += 1.0;
    }
    vector
}
