// Prospector: community topic analysis and stargazer prospect ranking
//
// This is the library root. Each module corresponds to a major subsystem:
// pure text analysis, prospect scoring, data providers, the SQLite cache,
// and output rendering.

pub mod analysis;
pub mod config;
pub mod db;
pub mod output;
pub mod pipeline;
pub mod scoring;
pub mod sources;
pub mod stats;
pub mod status;
