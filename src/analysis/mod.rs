// Topic analysis — tokenizing, TF-IDF weighting, clustering, and retrieval.

pub mod cluster;
pub mod index;
pub mod label;
pub mod questions;
pub mod retrieve;
pub mod tfidf;
pub mod tokenize;
