//! The conversation driver: answers visitors in the persona's voice.
//!
//! Each turn follows an **Ask → Act → Observe** cycle:
//!
//! 1. **Build** the sequence: persona context + prior history + user message
//! 2. **Ask** the model, with the persona tools attached
//! 3. **If tool calls**: resolve the whole batch, run it, append results, loop
//! 4. **If text**: that is the answer
//!
//! The loop ends on a text answer or when the iteration guard trips, in
//! which case the turn is reported as inconclusive.

pub mod driver;
pub mod report;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use driver::ConversationDriver;
pub use report::{TurnOutcome, TurnReport};
