use frajola_core::flows::replies::money;
use frajola_core::{ChatMessage, Sender, Stage};
use serde::Serialize;

use super::{current_thread_runtime, Assistant, CommandResult};

const COMMAND: &str = "replay";

#[derive(Debug, Serialize)]
pub struct ReplayReport {
    pub command: &'static str,
    pub status: &'static str,
    pub stage: Stage,
    pub total: String,
    pub awaiting_human: bool,
    pub transcript: Vec<TranscriptLine>,
}

#[derive(Debug, Serialize)]
pub struct TranscriptLine {
    pub id: u64,
    pub sender: Sender,
    pub text: String,
}

impl From<&ChatMessage> for TranscriptLine {
    fn from(message: &ChatMessage) -> Self {
        Self { id: message.id.0, sender: message.sender, text: message.text.clone() }
    }
}

/// Plays `messages` against a fresh conversation, one turn each.
pub fn run(messages: &[String]) -> CommandResult {
    let assistant = match Assistant::load(COMMAND) {
        Ok(assistant) => assistant,
        Err(result) => return result,
    };
    let mut session = match assistant.session(COMMAND) {
        Ok(session) => session,
        Err(result) => return result,
    };
    let runtime = match current_thread_runtime(COMMAND) {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    runtime.block_on(async {
        for message in messages {
            session.handle_message(message, &assistant.catalog).await;
        }
    });

    let state = session.state();
    let report = ReplayReport {
        command: COMMAND,
        status: "ok",
        stage: state.stage,
        total: money(state.order.total()),
        awaiting_human: state.awaiting_human,
        transcript: state.messages.iter().map(TranscriptLine::from).collect(),
    };
    CommandResult::payload(0, &report)
}
