//! LLM Provider implementations for AlterEgo.
//!
//! All providers implement the `alterego_core::Provider` trait.
//! [`build_from_config`] selects and constructs the configured backend.

pub mod factory;
pub mod openai_compat;

pub use factory::build_from_config;
pub use openai_compat::OpenAiCompatProvider;
