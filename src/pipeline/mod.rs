// Pipelines — the multi-step flows behind the CLI subcommands.

pub mod prospects;
pub mod topics;
