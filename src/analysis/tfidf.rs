// Term weighting over tokenized documents.
//
// Classic TF-IDF with add-one smoothing: a token occurring `c` times in one
// document out of `N` gets weight `c * (ln((1+N)/(1+df)) + 1)`. The smoothing
// keeps every idf strictly positive, so a token present in all documents
// still carries weight instead of vanishing, and a single-document collection
// produces well-defined weights.

use std::collections::{HashMap, HashSet};

/// Sparse term-weight vector. Ordered so that iteration, and therefore every
/// float summation downstream, is reproducible across runs.
pub type WeightVector = std::collections::BTreeMap<String, f64>;

/// Number of documents each token appears in at least once.
pub fn document_frequencies(documents: &[Vec<String>]) -> HashMap<String, usize> {
    let mut df: HashMap<String, usize> = HashMap::new();
    for doc in documents {
        let mut seen: HashSet<&str> = HashSet::new();
        for token in doc {
            if seen.insert(token) {
                *df.entry(token.clone()).or_insert(0) += 1;
            }
        }
    }
    df
}

/// Smoothed inverse document frequency for every token in the collection.
pub fn idf_map(documents: &[Vec<String>]) -> HashMap<String, f64> {
    let n = documents.len() as f64;
    document_frequencies(documents)
        .into_iter()
        .map(|(token, df)| (token, ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0))
        .collect()
}

/// TF-IDF weight vectors, one per document, aligned with the input order.
pub fn weigh(documents: &[Vec<String>]) -> Vec<WeightVector> {
    let idf = idf_map(documents);

    documents
        .iter()
        .map(|doc| {
            let mut counts: HashMap<&str, f64> = HashMap::new();
            for token in doc {
                *counts.entry(token).or_insert(0.0) += 1.0;
            }
            counts
                .into_iter()
                .map(|(token, count)| {
                    let weight = count * idf.get(token).copied().unwrap_or(1.0);
                    (token.to_string(), weight)
                })
                .collect()
        })
        .collect()
}
