//! Persona tools for AlterEgo.
//!
//! Two side-effecting tools are offered to the model:
//! - `record_user_details`: a visitor left contact details
//! - `record_unknown_question`: the persona could not answer something
//!
//! Both alert the operator through a `Notifier` and acknowledge with
//! `{"recorded": "ok"}`.

pub mod record_unknown_question;
pub mod record_user_details;
pub mod registry;

pub use record_unknown_question::RecordUnknownQuestion;
pub use record_user_details::RecordUserDetails;
pub use registry::{Invocation, PersonaTool, PreparedCall, ToolRegistry};
