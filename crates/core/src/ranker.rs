//! TF-IDF cosine similarity between each candidate text and the job
//! description.
//!
//! The vocabulary and document frequencies are fitted over the candidates
//! plus the reference, with smoothed idf: `ln((1 + n) / (1 + df)) + 1`.

use crate::models::RankedEntry;
use crate::tokenizer::{tokenize, StopWords};
use std::collections::HashMap;
use tracing::debug;

type Vector = HashMap<usize, f64>;

struct Vocabulary {
    index: HashMap<String, usize>,
    df: Vec<usize>,
}

impl Vocabulary {
    fn fit(docs: &[Vec<String>]) -> Self {
        let mut index = HashMap::new();
        let mut df = Vec::new();
        for doc in docs {
            let mut seen = vec![false; df.len()];
            for term in doc {
                let next = index.len();
                let id = *index.entry(term.clone()).or_insert(next);
                if id == df.len() {
                    df.push(0);
                    seen.push(false);
                }
                if !seen[id] {
                    seen[id] = true;
                    df[id] += 1;
                }
            }
        }
        Self { index, df }
    }

    fn idf(&self, n: usize) -> Vec<f64> {
        self.df
            .iter()
            .map(|&df| ((1 + n) as f64 / (1 + df) as f64).ln() + 1.0)
            .collect()
    }

    fn vectorize(&self, doc: &[String], idf: &[f64]) -> Vector {
        let mut counts: Vector = HashMap::new();
        for term in doc {
            if let Some(&id) = self.index.get(term) {
                *counts.entry(id).or_insert(0.0) += 1.0;
            }
        }
        for (id, w) in counts.iter_mut() {
            *w *= idf[*id];
        }
        let norm = counts.values().map(|w| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for w in counts.values_mut() {
                *w /= norm;
            }
        }
        counts
    }
}

fn cosine(a: &Vector, b: &Vector) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small
        .iter()
        .filter_map(|(id, w)| large.get(id).map(|v| w * v))
        .sum()
}

/// Score every `(id, text)` in `corpus` against `reference` and return the
/// best `top_n`, highest first. Equal scores keep corpus order.
pub fn rank(
    corpus: &[(String, String)],
    reference: &str,
    top_n: usize,
    stop_words: &StopWords,
) -> Vec<RankedEntry> {
    if corpus.is_empty() || top_n == 0 {
        return Vec::new();
    }

    let mut docs: Vec<Vec<String>> = corpus
        .iter()
        .map(|(_, text)| tokenize(text, stop_words))
        .collect();
    docs.push(tokenize(reference, stop_words));

    let vocab = Vocabulary::fit(&docs);
    let idf = vocab.idf(docs.len());
    let vectors: Vec<Vector> = docs.iter().map(|d| vocab.vectorize(d, &idf)).collect();
    let Some((reference_vec, candidates)) = vectors.split_last() else {
        return Vec::new();
    };
    debug!(terms = vocab.df.len(), documents = docs.len(), "fitted tf-idf vocabulary");

    let mut ranked: Vec<RankedEntry> = corpus
        .iter()
        .zip(candidates)
        .map(|((id, text), vec)| RankedEntry {
            id: id.clone(),
            score: cosine(vec, reference_vec).clamp(0.0, 1.0) as f32,
            text: text.clone(),
        })
        .collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(top_n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(id, text)| (id.to_string(), text.to_string()))
            .collect()
    }

    #[test]
    fn relevant_resumes_outrank_unrelated_ones() {
        let docs = corpus(&[
            ("a.pdf", "cooking baking pastry"),
            ("b.pdf", "python developer django"),
            ("c.pdf", "python data science"),
        ]);
        let ranked = rank(&docs, "seeking python developer", 3, &StopWords::english());
        let ids: Vec<&str> = ranked.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b.pdf", "c.pdf", "a.pdf"]);
        assert!(ranked[0].score > ranked[1].score);
        assert!(ranked[1].score > 0.0);
        assert_eq!(ranked[2].score, 0.0);
    }

    #[test]
    fn top_n_truncates() {
        let docs = corpus(&[
            ("a.pdf", "cooking baking pastry"),
            ("b.pdf", "python developer django"),
            ("c.pdf", "python data science"),
        ]);
        let ranked = rank(&docs, "seeking python developer", 1, &StopWords::english());
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].id, "b.pdf");
    }

    #[test]
    fn empty_corpus_ranks_nothing() {
        assert!(rank(&[], "python", 5, &StopWords::english()).is_empty());
    }

    #[test]
    fn empty_texts_score_zero_in_corpus_order() {
        let docs = corpus(&[("x.pdf", ""), ("y.docx", ""), ("z.pdf", "")]);
        let ranked = rank(&docs, "python developer", 10, &StopWords::english());
        let ids: Vec<&str> = ranked.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["x.pdf", "y.docx", "z.pdf"]);
        assert!(ranked.iter().all(|r| r.score == 0.0));
    }

    #[test]
    fn identical_text_ranks_first_with_full_score() {
        let jd = "rust engineer tokio async networking";
        let docs = corpus(&[
            ("other.pdf", "java spring networking"),
            ("same.pdf", jd),
        ]);
        let ranked = rank(&docs, jd, 2, &StopWords::english());
        assert_eq!(ranked[0].id, "same.pdf");
        assert!((ranked[0].score - 1.0).abs() < 1e-5);
        assert!(ranked[0].score <= 1.0);
    }

    #[test]
    fn text_equal_after_stop_words_scores_highest() {
        let docs = corpus(&[
            ("partial.pdf", "python"),
            ("padded.pdf", "the python developer"),
            ("other.pdf", "developer relations and python outreach"),
        ]);
        let ranked = rank(&docs, "python developer", 3, &StopWords::english());
        assert_eq!(ranked[0].id, "padded.pdf");
        assert!((ranked[0].score - 1.0).abs() < 1e-5);
        assert!(ranked[1..].iter().all(|r| r.score <= ranked[0].score));
    }

    #[test]
    fn scores_are_bounded_and_non_increasing() {
        let docs = corpus(&[
            ("1", "rust rust rust"),
            ("2", "go kubernetes"),
            ("3", "rust go"),
            ("4", "embedded rust firmware"),
            ("5", ""),
        ]);
        let ranked = rank(&docs, "rust firmware engineer", 4, &StopWords::english());
        assert_eq!(ranked.len(), 4);
        for pair in ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        assert!(ranked.iter().all(|r| (0.0..=1.0).contains(&r.score)));
    }
}
