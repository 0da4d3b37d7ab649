// FAQ data module
// Supplies the question/answer pairs that get indexed

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A question/answer pair with its position in the loaded sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaqEntry {
    pub id: u64,
    pub question: String,
    pub answer: String,
}

/// Where FAQ pairs come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaqSource {
    Inline(Vec<(String, String)>),
    File(PathBuf),
}

/// On-disk layout: `{"faqs": [{"question": ..., "answer": ...}]}`
#[derive(Debug, Serialize, Deserialize)]
pub struct FaqDocument {
    pub faqs: Vec<FaqRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqRecord {
    pub question: String,
    pub answer: String,
}

/// Built-in FAQ set used when no file is configured
#[inline]
pub fn default_faqs() -> Vec<(String, String)> {
    [
        ("Siparişim nerede?", "Siparişiniz kargoya verildi."),
        (
            "Ürünüm hasar gördü.",
            "Hasar için lütfen destekle iletişime geçin.",
        ),
        (
            "İade süreci nasıl işliyor?",
            "İade için form doldurmanız gerekiyor.",
        ),
    ]
    .into_iter()
    .map(|(q, a)| (q.to_string(), a.to_string()))
    .collect()
}

impl FaqSource {
    /// Load entries with ids assigned by position, starting at 0.
    ///
    /// A missing or unparsable file is logged and yields no entries.
    #[inline]
    pub fn load(&self) -> Vec<FaqEntry> {
        let pairs = match self {
            Self::Inline(pairs) => pairs.clone(),
            Self::File(path) => read_faq_file(path),
        };

        debug!("Loaded {} FAQ pairs", pairs.len());
        pairs
            .into_iter()
            .zip(0_u64..)
            .map(|((question, answer), id)| FaqEntry {
                id,
                question,
                answer,
            })
            .collect()
    }
}

fn read_faq_file(path: &Path) -> Vec<(String, String)> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("FAQ file {} not found, no entries loaded", path.display());
            return Vec::new();
        }
        Err(e) => {
            warn!("Failed to read FAQ file {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    match serde_json::from_str::<FaqDocument>(&content) {
        Ok(document) => {
            info!(
                "Read {} FAQ entries from {}",
                document.faqs.len(),
                path.display()
            );
            document
                .faqs
                .into_iter()
                .map(|record| (record.question, record.answer))
                .collect()
        }
        Err(e) => {
            warn!("FAQ file {} is not valid: {}", path.display(), e);
            Vec::new()
        }
    }
}
