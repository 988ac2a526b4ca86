//! Embedding capability used by the semantic scorer

use crate::error::{AtsScorerError, Result};
use model2vec_rs::model::StaticModel;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

/// Turns texts into fixed-length vectors, one per input, in input order
pub trait SimilarityProvider: Send + Sync {
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    fn name(&self) -> &str;
}

/// Static Model2Vec embeddings loaded from a HuggingFace repo id or a local folder
pub struct Model2VecProvider {
    model: StaticModel,
    model_name: String,
}

impl Model2VecProvider {
    pub fn load(model_name: &str) -> Result<Self> {
        let start_time = Instant::now();
        log::info!("Loading Model2Vec embedding model: {}", model_name);

        let loaded = panic::catch_unwind(|| {
            StaticModel::from_pretrained(
                model_name,
                None, // token
                None, // normalize
                None, // subfolder
            )
        })
        .map_err(|_| AtsScorerError::ModelLoading(format!("Loading {} panicked", model_name)))?;

        let model = loaded
            .map_err(|e| AtsScorerError::ModelLoading(format!("Failed to load {}: {}", model_name, e)))?;

        log::info!("Model loaded in {:.2?}", start_time.elapsed());

        Ok(Self {
            model,
            model_name: model_name.to_string(),
        })
    }
}

impl SimilarityProvider for Model2VecProvider {
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        // the backend panics on tokenizer failures instead of returning errors
        let embeddings = panic::catch_unwind(AssertUnwindSafe(|| self.model.encode(texts)))
            .map_err(|_| AtsScorerError::Embedding("embedding backend panicked".to_string()))?;

        validate_embeddings(texts.len(), &embeddings)?;
        Ok(embeddings)
    }

    fn name(&self) -> &str {
        &self.model_name
    }
}

/// One non-empty vector per input, all of the same dimension
pub fn validate_embeddings(expected: usize, embeddings: &[Vec<f32>]) -> Result<()> {
    if embeddings.len() != expected {
        return Err(AtsScorerError::Embedding(format!(
            "expected {} embeddings, got {}",
            expected,
            embeddings.len()
        )));
    }

    if let Some(first) = embeddings.first() {
        let dim = first.len();
        if dim == 0 {
            return Err(AtsScorerError::Embedding("empty embedding vector".to_string()));
        }
        if embeddings.iter().any(|e| e.len() != dim) {
            return Err(AtsScorerError::Embedding(
                "embedding dimensions differ within a batch".to_string(),
            ));
        }
    }

    Ok(())
}

/// Cosine similarity of two embeddings; zero-norm vectors score 0.0
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(AtsScorerError::Embedding(format!(
            "Embedding dimensions don't match: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok(dot_product / (norm_a * norm_b))
}
