use anyhow::Result;
use frajola_core::{ChatMessage, Stage};

/// What a display layer needs to draw one conversation.
#[derive(Clone, Copy, Debug)]
pub struct ConversationView<'a> {
    pub messages: &'a [ChatMessage],
    pub stage: Stage,
    pub awaiting_human: bool,
    /// A completion call is in flight; input should be disabled meanwhile.
    pub awaiting_completion: bool,
}

pub trait RenderSink {
    fn render(&mut self, view: &ConversationView<'_>) -> Result<()>;
}
