//! # AlterEgo Core
//!
//! Domain types, traits, and error definitions for the AlterEgo persona
//! assistant. This crate has no HTTP or runtime dependencies; it defines the
//! model that the provider, notifier, tool and agent crates implement against.
//!
//! - [`Message`] is a single conversation turn (system, user, assistant, tool).
//! - [`Provider`] is the seam to the language model.
//! - [`Notifier`] is the seam to the operator alerting channel.
//! - [`PersonaContext`] is the immutable system instruction for one persona.

pub mod error;
pub mod message;
pub mod notify;
pub mod persona;
pub mod provider;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{AgentError, Error, NotifyError, PersonaError, ProviderError, Result, ToolError};
pub use message::{Message, MessageToolCall, Role};
pub use notify::Notifier;
pub use persona::{DocumentSource, Persona, PersonaContext, PersonaSources, TextFileSource};
pub use provider::{Provider, ProviderRequest, ProviderResponse, StopReason, ToolDefinition, Usage};
pub use tool::{ToolCall, ToolResult};
