// Sparse k-means over cosine similarity.
//
// Weight vectors are sparse and their magnitude tracks message length, which
// is semantically meaningless here. Cosine similarity compares direction
// only, so a two-line question and a ten-line rant about the same topic land
// together.

use super::tfidf::WeightVector;

pub struct KMeansParams {
    /// Fixed number of refinement rounds; there is no convergence check.
    pub iterations: usize,
}

impl Default for KMeansParams {
    fn default() -> Self {
        Self { iterations: 20 }
    }
}

/// Cosine similarity between two sparse weight vectors.
///
/// A zero vector has no direction; similarity involving one is 0.
pub fn cosine_similarity(a: &WeightVector, b: &WeightVector) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };

    let dot: f64 = small
        .iter()
        .filter_map(|(token, wa)| large.get(token).map(|wb| wa * wb))
        .sum();
    if dot == 0.0 {
        return 0.0;
    }

    let norm_a: f64 = a.values().map(|w| w * w).sum::<f64>().sqrt();
    let norm_b: f64 = b.values().map(|w| w * w).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

/// Assigns every vector a group index in `[0, k)`.
///
/// The first `k` vectors seed the centers, so identical input order yields
/// identical clusters across runs. Each round reassigns every vector to its
/// most similar center (ties go to the lowest index) and rebuilds each center
/// as the unnormalized sum of its members' vectors. `k` is clamped to
/// `[1, vectors.len()]`.
pub fn cluster(vectors: &[WeightVector], k: usize, params: &KMeansParams) -> Vec<usize> {
    if vectors.is_empty() {
        return Vec::new();
    }
    let k = k.clamp(1, vectors.len());

    let mut centers: Vec<WeightVector> = vectors[..k].to_vec();
    let mut assignments = vec![0usize; vectors.len()];

    for _ in 0..params.iterations {
        for (i, vector) in vectors.iter().enumerate() {
            let mut best = 0usize;
            let mut best_similarity = f64::NEG_INFINITY;
            for (j, center) in centers.iter().enumerate() {
                let similarity = cosine_similarity(vector, center);
                if similarity > best_similarity {
                    best_similarity = similarity;
                    best = j;
                }
            }
            assignments[i] = best;
        }

        let mut next: Vec<WeightVector> = vec![WeightVector::new(); k];
        for (i, vector) in vectors.iter().enumerate() {
            let center = &mut next[assignments[i]];
            for (token, weight) in vector {
                *center.entry(token.clone()).or_insert(0.0) += weight;
            }
        }
        centers = next;
    }

    assignments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::tfidf::weigh;

    fn vectors_for(texts: &[&str]) -> Vec<WeightVector> {
        let documents: Vec<Vec<String>> = texts
            .iter()
            .map(|t| t.split_whitespace().map(|w| w.to_string()).collect())
            .collect();
        weigh(&documents)
    }

    #[test]
    fn test_cosine_identical_vectors() {
        let vectors = vectors_for(&["alpha beta gamma"]);
        let similarity = cosine_similarity(&vectors[0], &vectors[0]);
        assert!((similarity - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_disjoint_vectors() {
        let vectors = vectors_for(&["alpha beta", "gamma delta"]);
        assert_eq!(cosine_similarity(&vectors[0], &vectors[1]), 0.0);
    }

    #[test]
    fn test_cosine_zero_vector() {
        let empty = WeightVector::new();
        let vectors = vectors_for(&["alpha beta"]);
        assert_eq!(cosine_similarity(&empty, &vectors[0]), 0.0);
    }

    #[test]
    fn test_cluster_total_coverage() {
        let vectors = vectors_for(&[
            "postgres migration schema",
            "postgres backup schema",
            "oauth redirect token",
            "oauth login token",
            "deploy docker image",
        ]);
        for k in 1..=vectors.len() {
            let assignments = cluster(&vectors, k, &KMeansParams::default());
            assert_eq!(assignments.len(), vectors.len());
            assert!(assignments.iter().all(|&g| g < k));
        }
    }

    #[test]
    fn test_cluster_clamps_k() {
        let vectors = vectors_for(&["alpha beta", "gamma delta"]);
        let assignments = cluster(&vectors, 10, &KMeansParams::default());
        assert!(assignments.iter().all(|&g| g < 2));

        let assignments = cluster(&vectors, 0, &KMeansParams::default());
        assert!(assignments.iter().all(|&g| g == 0));
    }

    #[test]
    fn test_cluster_groups_similar_documents() {
        let vectors = vectors_for(&[
            "postgres migration schema database",
            "oauth redirect token login",
            "postgres schema database backup",
            "oauth token login session",
        ]);
        let assignments = cluster(&vectors, 2, &KMeansParams::default());

        assert_eq!(assignments[0], assignments[2], "postgres messages split");
        assert_eq!(assignments[1], assignments[3], "oauth messages split");
        assert_ne!(assignments[0], assignments[1], "topics merged");
    }

    #[test]
    fn test_cluster_deterministic() {
        let vectors = vectors_for(&[
            "postgres migration schema",
            "oauth redirect token",
            "deploy docker image",
            "postgres backup restore",
            "oauth login session",
        ]);
        let first = cluster(&vectors, 3, &KMeansParams::default());
        let second = cluster(&vectors, 3, &KMeansParams::default());
        assert_eq!(first, second);
    }

    #[test]
    fn test_cluster_empty_input() {
        assert!(cluster(&[], 4, &KMeansParams::default()).is_empty());
    }
}
