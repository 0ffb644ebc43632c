//! Per-query orchestration: guard, cache, retrieve, authorize, generate.

pub mod config;
pub mod context;
pub mod error;
pub mod query;


pub use config::PipelineConfig;
pub use context::{build_context, collect_sources, normalize_question};
pub use error::{PipelineError, PipelineResult};
pub use query::{Answer, QueryPipeline};
