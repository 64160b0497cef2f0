// Prospect ranking — deterministic heuristics with an optional LLM pass.

pub mod heuristic;
pub mod llm;
pub mod traits;
