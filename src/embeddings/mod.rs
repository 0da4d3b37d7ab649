// Embeddings module
// Turns question text into fixed-length vectors

pub mod ollama;

pub use ollama::OllamaClient;

use crate::Result;

/// A source of text embeddings with a fixed output dimension.
///
/// Implementations must return vectors of exactly [`Embedder::dimension`] elements.
pub trait Embedder: Send + Sync {
    /// Length of every vector produced by this embedder
    fn dimension(&self) -> usize;

    /// Embed a single piece of text
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed several texts, preserving input order
    #[inline]
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|text| self.embed(text)).collect()
    }
}
