use crate::model::EmbeddingModel;

/// Standard number of word slots used when computing a DAT score.
pub const DEFAULT_MINIMUM_WORDS: usize = 7;

/// Pairwise distances and aggregate score for one word list.
///
/// `distances` holds one entry per unordered pair of word slots, in
/// `(i, j), i < j` order, so its length is always `C(minimum_words, 2)`.
#[derive(Debug, Clone, PartialEq)]
pub struct DatResult {
    pub distances: Vec<f64>,
    pub score: f64,
}

/// Compute the DAT result for a single word list.
///
/// Words are trimmed and case-folded; empty cells and words missing from the
/// model are dropped. The first `minimum_words` remaining words are scored.
/// Returns `None` when fewer than `minimum_words` usable words are available.
pub fn score_word_list(
    words: &[String],
    minimum_words: usize,
    model: &EmbeddingModel,
) -> Option<DatResult> {
    let usable: Vec<String> = words
        .iter()
        .map(|word| word.trim().to_lowercase())
        .filter(|word| !word.is_empty() && model.contains(word))
        .take(minimum_words)
        .collect();

    if usable.len() < minimum_words {
        tracing::debug!(
            "only {} of the required {} words are usable",
            usable.len(),
            minimum_words
        );
        return None;
    }

    let mut distances = Vec::with_capacity(minimum_words * (minimum_words - 1) / 2);
    for i in 0..usable.len() {
        for j in (i + 1)..usable.len() {
            // Both words are in vocabulary, checked above.
            let distance = model.distance(&usable[i], &usable[j])?;
            distances.push(distance);
        }
    }

    let score = distances.iter().sum::<f64>() / distances.len() as f64 * 100.0;

    Some(DatResult { distances, score })
}
