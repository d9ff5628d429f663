//! The I/O side of a Frajola conversation.
//!
//! `frajola-core` decides every turn. This crate carries out the one thing a
//! turn may have to wait on: asking an external text-completion service to
//! answer small talk and off-topic questions.
//!
//! - `llm` - the [`llm::CompletionClient`] seam plus an HTTP implementation
//! - `runtime` - [`runtime::ConversationSession`], one conversation end to end
//! - `render` - the contract of whatever displays the conversation
//!
//! The completion service never sees prices, orders or stages as decisions;
//! it only receives the user's message and a few recent lines of context.

pub mod llm;
pub mod render;
pub mod runtime;

pub use llm::{CompletionClient, DisabledCompletionClient, HttpCompletionClient};
pub use render::{ConversationView, RenderSink};
pub use runtime::{ConversationSession, TECHNICAL_DIFFICULTY_REPLY};
