use std::time::Duration;

use anyhow::Result;
use frajola_core::{
    normalize, ChatMessage, ConversationContext, DelegationRequest, DialogueEngine, DialogueState,
    MenuCatalog, Sender,
};
use tracing::{info, warn};

use crate::llm::CompletionClient;
use crate::render::{ConversationView, RenderSink};

/// Substituted for any completion failure, timeout or self-reported trouble.
pub const TECHNICAL_DIFFICULTY_REPLY: &str = "Desculpe, estou com problemas técnicos no momento. \
     Posso te ajudar com informações sobre nossa pizzaria!";

/// Normalized marker of a completion reply that admits it could not answer.
const TECHNICAL_DIFFICULTY_MARKER: &str = "problemas tecnicos";

const DEFAULT_COMPLETION_TIMEOUT: Duration = Duration::from_secs(30);

/// One conversation: its state, its context and the collaborator that
/// answers off-topic messages.
///
/// Turns take `&mut self`, so a second message cannot be processed while a
/// completion call is still pending.
pub struct ConversationSession<C> {
    engine: DialogueEngine,
    client: C,
    state: DialogueState,
    context: ConversationContext,
    completion_timeout: Duration,
    awaiting_completion: bool,
}

impl<C> ConversationSession<C>
where
    C: CompletionClient,
{
    pub fn new(engine: DialogueEngine, client: C) -> Self {
        let state = engine.initial_state();
        Self {
            engine,
            client,
            state,
            context: ConversationContext::default(),
            completion_timeout: DEFAULT_COMPLETION_TIMEOUT,
            awaiting_completion: false,
        }
    }

    pub fn with_completion_timeout(mut self, timeout: Duration) -> Self {
        self.completion_timeout = timeout;
        self
    }

    pub fn state(&self) -> &DialogueState {
        &self.state
    }

    pub fn context(&self) -> &ConversationContext {
        &self.context
    }

    pub fn awaiting_completion(&self) -> bool {
        self.awaiting_completion
    }

    pub fn view(&self) -> ConversationView<'_> {
        ConversationView {
            messages: &self.state.messages,
            stage: self.state.stage,
            awaiting_human: self.state.awaiting_human,
            awaiting_completion: self.awaiting_completion,
        }
    }

    /// Runs one turn and returns the bot messages it produced.
    pub async fn handle_message(&mut self, text: &str, catalog: &MenuCatalog) -> Vec<ChatMessage> {
        self.run_turn(text, catalog, None).await.unwrap_or_default()
    }

    /// Like [`Self::handle_message`], rendering once after the rules ran and
    /// again once a pending completion resolved.
    pub async fn handle_message_with_sink(
        &mut self,
        text: &str,
        catalog: &MenuCatalog,
        sink: &mut dyn RenderSink,
    ) -> Result<Vec<ChatMessage>> {
        self.run_turn(text, catalog, Some(sink)).await
    }

    async fn run_turn(
        &mut self,
        text: &str,
        catalog: &MenuCatalog,
        mut sink: Option<&mut dyn RenderSink>,
    ) -> Result<Vec<ChatMessage>> {
        let first_new = self.state.messages.len();
        let outcome = self.engine.process_turn(&self.state, &self.context, catalog, text);
        self.state = outcome.state;
        self.context = outcome.context;

        // Render errors surface only after the turn is complete.
        let mut pending_render = Ok(());
        if let Some(request) = outcome.delegation {
            self.awaiting_completion = true;
            if let Some(sink) = sink.as_deref_mut() {
                pending_render = sink.render(&self.view());
            }
            let reply = self.delegate(&request).await;
            self.state.push_message(reply, Sender::Bot);
            self.awaiting_completion = false;
        }

        info!(
            event_name = "conversation.turn.completed",
            conversation_id = %self.state.conversation_id,
            stage = %self.state.stage,
            rule = outcome.rule.as_str(),
            awaiting_human = self.state.awaiting_human,
            "conversation turn completed"
        );

        if let Some(sink) = sink {
            sink.render(&self.view())?;
        }
        pending_render?;

        Ok(self.state.messages[first_new..]
            .iter()
            .filter(|message| message.is_bot())
            .cloned()
            .collect())
    }

    async fn delegate(&self, request: &DelegationRequest) -> String {
        let call = self.client.complete(&request.message, &request.context);
        match tokio::time::timeout(self.completion_timeout, call).await {
            Ok(Ok(reply)) if is_usable(&reply) => reply,
            Ok(Ok(_)) => {
                warn!(
                    event_name = "conversation.completion.unusable",
                    conversation_id = %self.state.conversation_id,
                    "completion reply reported trouble, using fallback reply"
                );
                TECHNICAL_DIFFICULTY_REPLY.to_string()
            }
            Ok(Err(error)) => {
                warn!(
                    event_name = "conversation.completion.failed",
                    conversation_id = %self.state.conversation_id,
                    error = %error,
                    "completion failed, using fallback reply"
                );
                TECHNICAL_DIFFICULTY_REPLY.to_string()
            }
            Err(_) => {
                warn!(
                    event_name = "conversation.completion.timed_out",
                    conversation_id = %self.state.conversation_id,
                    timeout_ms = self.completion_timeout.as_millis() as u64,
                    "completion timed out, using fallback reply"
                );
                TECHNICAL_DIFFICULTY_REPLY.to_string()
            }
        }
    }
}

fn is_usable(reply: &str) -> bool {
    !reply.trim().is_empty() && !normalize(reply).contains(TECHNICAL_DIFFICULTY_MARKER)
}
