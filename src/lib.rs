//! # llm-orchestrator
//!
//! Provider-agnostic LLM orchestration core: a model registry, policy-based
//! model selection, a response cache, and a retrying dispatch layer over a
//! uniform provider abstraction.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use llm_orchestrator::orchestrator::{Orchestrator, RequestContext};
//! use llm_orchestrator::provider::LocalProvider;
//! use llm_orchestrator::registry::{seed_default_catalog, ModelRegistry};
//! use llm_orchestrator::types::{ChatMessage, LlmOptions};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = ModelRegistry::new();
//!     for model in seed_default_catalog() {
//!         registry.register(model)?;
//!     }
//!
//!     let orchestrator = Orchestrator::builder()
//!         .with_registry(registry)
//!         .with_provider(Arc::new(LocalProvider::new()))
//!         .build();
//!
//!     let response = orchestrator
//!         .chat_completion(
//!             vec![ChatMessage::user("hello")],
//!             LlmOptions::default(),
//!             RequestContext::default(),
//!         )
//!         .await?;
//!
//!     println!("{}", response.content);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod provider;
pub mod registry;
pub mod selection;
pub mod types;

pub use config::OrchestratorConfig;
pub use error::{OrchestratorError, Result};
pub use orchestrator::{Orchestrator, OrchestratorBuilder, RequestContext};

/// Current version of the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate.
pub const NAME: &str = env!("CARGO_PKG_NAME");
