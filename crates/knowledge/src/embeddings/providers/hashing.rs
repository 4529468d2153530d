//! Feature-hashing embedding provider.

use crate::embeddings::provider::EmbeddingProvider;
use folio_core::AppResult;
use std::collections::{HashMap, HashSet};

const STOP_WORDS: &[&str] = &[
    "the", "is", "at", "which", "on", "a", "an", "as", "are", "was", "were", "for", "to", "of",
    "in", "and", "or", "but", "with", "by", "from", "this", "that", "be", "have", "has", "had",
    "it", "its", "their", "they", "them", "what", "about", "tell", "me",
];

/// Deterministic embedding provider for local, offline operation.
///
/// Hashes words and their character trigrams into a fixed number of
/// buckets and normalizes the result to unit length. Texts sharing words
/// land close together under cosine similarity. Text with no usable words
/// produces the zero vector.
#[derive(Debug)]
pub struct HashingProvider {
    dimensions: usize,
    stop_words: HashSet<&'static str>,
}

impl HashingProvider {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            stop_words: STOP_WORDS.iter().copied().collect(),
        }
    }

    fn bucket(&self, token: &str, seed: u64) -> usize {
        let hash = token
            .bytes()
            .fold(seed, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
        (hash % self.dimensions as u64) as usize
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0f32; self.dimensions];
        if self.dimensions == 0 {
            return embedding;
        }

        let lower = text.to_lowercase();
        let mut word_freq: HashMap<&str, u32> = HashMap::new();
        for word in lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.len() > 1 && !self.stop_words.contains(w))
        {
            *word_freq.entry(word).or_insert(0) += 1;
        }

        for (word, freq) in &word_freq {
            embedding[self.bucket(word, 7)] += *freq as f32;

            let chars: Vec<char> = word.chars().collect();
            for window in chars.windows(3) {
                let trigram: String = window.iter().collect();
                embedding[self.bucket(&trigram, 13)] += (*freq as f32).sqrt() * 0.5;
            }
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut embedding {
                *v /= norm;
            }
        }

        embedding
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for HashingProvider {
    fn provider_name(&self) -> &str {
        "hashing"
    }

    fn model_name(&self) -> &str {
        "hashing-v1"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed_text(text)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cosine(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[tokio::test]
    async fn test_embedding_is_unit_length() {
        let provider = HashingProvider::new(256);
        let embedding = provider.embed("hello world").await.unwrap();

        assert_eq!(embedding.len(), 256);
        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 0.001);
    }

    #[tokio::test]
    async fn test_embedding_is_deterministic() {
        let provider = HashingProvider::new(128);
        let a = provider.embed("Project: Alpha").await.unwrap();
        let b = provider.embed("Project: Alpha").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_shared_words_score_higher() {
        let provider = HashingProvider::new(512);
        let query = provider.embed("Tell me about Alpha").await.unwrap();
        let alpha = provider
            .embed("Project: Alpha\nDescription: A test project")
            .await
            .unwrap();
        let beta = provider
            .embed("Project: Beta\nDescription: Weather dashboard")
            .await
            .unwrap();

        assert!(cosine(&query, &alpha) > cosine(&query, &beta));
    }

    #[tokio::test]
    async fn test_empty_text_is_zero_vector() {
        let provider = HashingProvider::new(32);
        let embedding = provider.embed("").await.unwrap();
        assert_eq!(embedding.len(), 32);
        assert!(embedding.iter().all(|v| *v == 0.0));
    }

    #[tokio::test]
    async fn test_batch_preserves_order() {
        let provider = HashingProvider::new(64);
        let texts = vec!["rust server".to_string(), "weather app".to_string()];
        let batch = provider.embed_batch(&texts).await.unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0], provider.embed("rust server").await.unwrap());
        assert_eq!(batch[1], provider.embed("weather app").await.unwrap());
    }
}
