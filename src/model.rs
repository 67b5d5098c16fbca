use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};

/// Word embeddings loaded from a GloVe-style plain-text file: one word per
/// line followed by its whitespace-separated vector components.
#[derive(Debug)]
pub struct EmbeddingModel {
    vectors: HashMap<String, Vec<f32>>,
}

impl EmbeddingModel {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open model file at {}", path.display()))?;
        let reader = BufReader::new(file);

        let mut vectors = HashMap::new();
        let mut dimensions = 0;
        let mut skipped = 0usize;

        for (line_number, line) in reader.lines().enumerate() {
            let line = line.context("failed to read model file")?;
            let mut parts = line.split_whitespace();
            let Some(word) = parts.next() else {
                continue;
            };

            let components: Option<Vec<f32>> = parts.map(|p| p.parse().ok()).collect();
            let Some(components) = components else {
                tracing::warn!("skipping malformed vector on line {}", line_number + 1);
                skipped += 1;
                continue;
            };

            if dimensions == 0 {
                dimensions = components.len();
            }
            if components.is_empty() || components.len() != dimensions {
                tracing::warn!(
                    "skipping vector with {} components on line {}, expected {}",
                    components.len(),
                    line_number + 1,
                    dimensions
                );
                skipped += 1;
                continue;
            }

            // Zero-norm vectors would make cosine distance undefined.
            if components.iter().all(|c| *c == 0.0) {
                skipped += 1;
                continue;
            }

            vectors.insert(word.to_lowercase(), components);
        }

        if vectors.is_empty() {
            anyhow::bail!("model file {} contains no usable vectors", path.display());
        }

        tracing::info!(
            "loaded {} vectors of dimension {} ({} lines skipped)",
            vectors.len(),
            dimensions,
            skipped
        );

        Ok(Self { vectors })
    }

    /// Whether the model has a vector for this (case-folded) word.
    pub fn contains(&self, word: &str) -> bool {
        self.vectors.contains_key(&word.to_lowercase())
    }

    /// Cosine distance (`1 - cosine similarity`) between two in-vocabulary
    /// words. Returns `None` if either word is missing from the model.
    pub fn distance(&self, first: &str, second: &str) -> Option<f64> {
        let a = self.vectors.get(&first.to_lowercase())?;
        let b = self.vectors.get(&second.to_lowercase())?;

        let mut dot = 0.0f64;
        let mut norm_a = 0.0f64;
        let mut norm_b = 0.0f64;
        for (x, y) in a.iter().zip(b.iter()) {
            dot += f64::from(*x) * f64::from(*y);
            norm_a += f64::from(*x) * f64::from(*x);
            norm_b += f64::from(*y) * f64::from(*y);
        }

        Some(1.0 - dot / (norm_a.sqrt() * norm_b.sqrt()))
    }
}
