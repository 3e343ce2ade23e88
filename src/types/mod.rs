//! Core value types: messages, options, requirements, model metadata, and
//! request/response shapes (spec §3, component C1).

pub mod message;
pub mod model;
pub mod options;
pub mod request;
pub mod requirements;
pub mod response;

pub use message::{ChatMessage, ContentPart, MessageContent, Role};
pub use model::{Availability, Limits, ModelMetadata, ModelStatus, Performance, Pricing};
pub use options::LlmOptions;
pub use request::{ProviderChatRequest, ProviderEmbeddingRequest};
pub use requirements::{Capability, LatencyClass, ModelRequirements, PrivacyLevel, TaskComplexity, TaskType};
pub use response::{
    ChatChunk, ChatResponse, EmbeddingResponse, FinishReason, RequestValidation, ResponseMetadata,
    ToolCall, Usage,
};
