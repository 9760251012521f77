//! Persona system: who the assistant speaks as, and the system prompt.
//!
//! A [`Persona`] is assembled from three inputs:
//!
//! 1. **Name**: the individual being represented (from config)
//! 2. **Summary**: free-text biography, read from a text file
//! 3. **Resume**: document transcript, read through a [`DocumentSource`]
//!
//! [`PersonaContext::build`] turns a persona into the system instruction
//! that opens every conversation. The context is built once per assistant
//! instance and shared read-only by all conversations.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PersonaError;
use crate::message::Message;
use crate::tool::{RECORD_UNKNOWN_QUESTION, RECORD_USER_DETAILS};

/// Resolves a document path to its text transcript.
///
/// Extraction from rich formats happens behind this trait; the persona only
/// ever sees the resulting string.
pub trait DocumentSource: Send + Sync {
    fn read(&self, path: &Path) -> Result<String, PersonaError>;
}

/// Reads UTF-8 text or markdown files as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextFileSource;

impl DocumentSource for TextFileSource {
    fn read(&self, path: &Path) -> Result<String, PersonaError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| PersonaError::DocumentUnreadable {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        let content = content.trim_start_matches('\u{feff}');
        if content.trim().is_empty() {
            return Err(PersonaError::DocumentEmpty {
                path: path.display().to_string(),
            });
        }

        debug!(file = %path.display(), bytes = content.len(), "Loaded persona document");
        Ok(content.to_string())
    }
}

/// The individual the assistant role-plays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    /// Display name, used throughout the prompt
    pub name: String,

    /// Free-text biography
    pub summary: String,

    /// Resume transcript
    pub resume: String,
}

impl Persona {
    pub fn new(
        name: impl Into<String>,
        summary: impl Into<String>,
        resume: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            summary: summary.into(),
            resume: resume.into(),
        }
    }
}

/// Where a persona's documents live on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaSources {
    pub name: String,
    pub summary_path: PathBuf,
    pub resume_path: PathBuf,
}

impl PersonaSources {
    /// Load both documents as plain text.
    pub fn load(&self) -> Result<Persona, PersonaError> {
        self.load_with(&TextFileSource)
    }

    /// Load the summary as plain text and the resume through `source`.
    pub fn load_with(&self, source: &dyn DocumentSource) -> Result<Persona, PersonaError> {
        let summary = TextFileSource.read(&self.summary_path)?;
        let resume = source.read(&self.resume_path)?;
        Ok(Persona::new(self.name.clone(), summary, resume))
    }
}

/// The immutable system instruction for one persona.
///
/// Cloning is cheap (reference counted), so a single context can be shared
/// across concurrent conversations.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PersonaContext(Arc<str>);

impl PersonaContext {
    /// Build the context for a persona.
    ///
    /// Layout, in order: role framing, `## Summary:`, `## Resume:`, and a
    /// closing reminder to stay in character. Output depends only on the
    /// persona, so equal inputs give byte-identical contexts.
    pub fn build(persona: &Persona) -> Self {
        let name = persona.name.trim();
        let mut prompt = String::with_capacity(
            1024 + persona.summary.len() + persona.resume.len(),
        );

        prompt.push_str(&format!(
            "You are acting as {name}. You are answering questions on {name}'s website, \
             particularly questions related to {name}'s career, background, skills and experience. \
             Your responsibility is to represent {name} for interactions on the website as faithfully as possible. \
             You are given a summary of {name}'s background and Resume which you can use to answer questions. \
             Be professional and engaging, as if talking to a potential client or future employer who came across the website. \
             If you don't know the answer to any question, use your {RECORD_UNKNOWN_QUESTION} tool to record the question that you couldn't answer, \
             even if it's about something trivial or unrelated to career. \
             If the user is engaging in discussion, try to steer them towards getting in touch via email; \
             ask for their email and record it using your {RECORD_USER_DETAILS} tool."
        ));

        prompt.push_str("\n\n## Summary:\n");
        prompt.push_str(persona.summary.trim());
        prompt.push_str("\n\n## Resume:\n");
        prompt.push_str(persona.resume.trim());
        prompt.push_str("\n\n");
        prompt.push_str(&format!(
            "With this context, please chat with the user, always staying in character as {name}."
        ));

        Self(Arc::from(prompt))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The system turn that opens every conversation.
    pub fn to_message(&self) -> Message {
        Message::system(self.as_str())
    }

    /// Rough token estimate (4 chars ≈ 1 token).
    pub fn estimated_tokens(&self) -> usize {
        self.0.len() / 4
    }
}

impl fmt::Display for PersonaContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for PersonaContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersonaContext")
            .field("len", &self.0.len())
            .finish()
    }
}
