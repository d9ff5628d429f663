use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use frajola_agent::{
    CompletionClient, ConversationSession, ConversationView, DisabledCompletionClient,
    RenderSink, TECHNICAL_DIFFICULTY_REPLY,
};
use frajola_core::{
    AddressField, DialogueConfig, DialogueEngine, MenuCatalog, MenuCategory, MenuItem, MenuItemId,
    Stage,
};
use rust_decimal::Decimal;

#[derive(Clone)]
enum Script {
    Reply(&'static str),
    Fail,
    Hang,
}

#[derive(Clone)]
struct ScriptedClient {
    script: Script,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl ScriptedClient {
    fn new(script: Script) -> Self {
        Self { script, calls: Arc::new(Mutex::new(Vec::new())) }
    }

    fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().expect("calls lock").clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, message: &str, context: &str) -> Result<String> {
        self.calls.lock().expect("calls lock").push((message.to_string(), context.to_string()));
        match self.script {
            Script::Reply(text) => Ok(text.to_string()),
            Script::Fail => Err(anyhow!("connection refused")),
            Script::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok("tarde demais".to_string())
            }
        }
    }
}

#[derive(Default)]
struct RecordingSink {
    frames: Vec<(usize, bool)>,
}

impl RenderSink for RecordingSink {
    fn render(&mut self, view: &ConversationView<'_>) -> Result<()> {
        self.frames.push((view.messages.len(), view.awaiting_completion));
        Ok(())
    }
}

struct FailingSink;

impl RenderSink for FailingSink {
    fn render(&mut self, _view: &ConversationView<'_>) -> Result<()> {
        Err(anyhow!("display went away"))
    }
}

fn menu() -> MenuCatalog {
    MenuCatalog::new(vec![
        MenuItem::new("1", "Pizza Margherita", Decimal::new(3590, 2), MenuCategory::Pizza)
            .with_ingredients(["mussarela", "manjericão", "tomate"]),
        MenuItem::new("2", "Pizza Calabresa", Decimal::new(5500, 2), MenuCategory::Pizza)
            .with_ingredients(["calabresa", "mussarela", "cebola"]),
        MenuItem::new("3", "Pizza Portuguesa", Decimal::new(6000, 2), MenuCategory::Pizza)
            .unavailable(),
        MenuItem::new("10", "Borda Catupiry", Decimal::new(800, 2), MenuCategory::Side),
        MenuItem::new("20", "Coca Cola 350ml", Decimal::new(550, 2), MenuCategory::Beverage),
        MenuItem::new("30", "Borda Chocolate", Decimal::new(1000, 2), MenuCategory::Dessert),
    ])
}

fn new_session<C: CompletionClient>(client: C) -> ConversationSession<C> {
    ConversationSession::new(DialogueEngine::new(DialogueConfig::default()), client)
}

#[tokio::test]
async fn menu_request_lists_available_items_by_category_without_advancing() {
    let mut session = new_session(DisabledCompletionClient);
    let replies = session.handle_message("cardápio", &menu()).await;

    assert_eq!(replies.len(), 1);
    let text = &replies[0].text;
    for item in ["Pizza Margherita", "Pizza Calabresa", "Borda Catupiry", "Coca Cola 350ml"] {
        assert!(text.contains(item), "menu should list {item}");
    }
    assert!(!text.contains("Portuguesa"));
    let pizzas = text.find("PIZZAS").expect("pizza section");
    let drinks = text.find("BEBIDAS").expect("beverage section");
    assert!(pizzas < drinks);
    assert!(text.contains("SOBREMESAS"));
    assert_eq!(session.state().stage, Stage::Greeting);
}

#[tokio::test]
async fn price_question_names_item_and_remembers_it() {
    let mut session = new_session(DisabledCompletionClient);
    let replies = session.handle_message("quanto custa a margherita", &menu()).await;

    assert_eq!(replies.len(), 1);
    assert!(replies[0].text.contains("35.90"));
    assert!(replies[0].text.contains("Pizza Margherita"));
    assert_eq!(session.context().last_item, Some(MenuItemId::new("1")));
}

#[tokio::test]
async fn follow_up_want_adds_context_item_and_offers_extras() {
    let mut session = new_session(DisabledCompletionClient);
    let catalog = menu();
    session.handle_message("margherita", &catalog).await;
    assert_eq!(session.context().last_item, Some(MenuItemId::new("1")));

    let replies = session.handle_message("quero", &catalog).await;
    assert_eq!(session.state().order.lines().len(), 1);
    assert_eq!(session.state().order.total(), Decimal::new(3590, 2));
    assert!(session.context().awaiting_extras);
    assert_eq!(session.state().stage, Stage::Ordering);
    assert!(replies[0].text.contains("Borda Recheada de Catupiry"));
}

#[tokio::test]
async fn finalize_with_empty_order_apologizes_and_stays() {
    let mut session = new_session(DisabledCompletionClient);
    let replies = session.handle_message("finalizar", &menu()).await;

    assert!(replies[0].text.contains("pedido ainda está vazio"));
    assert_eq!(session.state().stage, Stage::Greeting);
    assert!(session.context().pending_address_field.is_none());
}

#[tokio::test]
async fn address_flow_collects_fields_in_order_and_confirms() {
    let mut session = new_session(DisabledCompletionClient);
    let catalog = menu();
    for message in ["margherita", "quero", "não, obrigado", "finalizar"] {
        session.handle_message(message, &catalog).await;
    }
    assert_eq!(session.state().stage, Stage::Address);
    assert_eq!(session.context().pending_address_field, Some(AddressField::Name));

    session.handle_message("Maria Souza", &catalog).await;
    session.handle_message("Rua das Flores", &catalog).await;
    session.handle_message("42", &catalog).await;
    let replies = session.handle_message("Centro", &catalog).await;

    let state = session.state();
    assert_eq!(state.stage, Stage::Confirmation);
    assert_eq!(state.order.customer.name, "Maria Souza");
    assert_eq!(state.order.customer.street, "Rua das Flores");
    assert_eq!(state.order.customer.number, "42");
    assert_eq!(state.order.customer.neighborhood, "Centro");
    assert!(session.context().pending_address_field.is_none());

    let summary = &replies[0].text;
    assert!(summary.contains("Pizza Margherita"));
    assert!(summary.contains("R$ 35.90"));
    assert!(summary.contains("45 minutos"));
}

#[tokio::test]
async fn off_topic_message_is_delegated_with_recent_context() {
    let client = ScriptedClient::new(Script::Reply("Tudo ótimo! E com você?"));
    let mut session = new_session(client.clone());
    let replies = session.handle_message("oi, como vai", &menu()).await;

    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].text, "Tudo ótimo! E com você?");
    let calls = client.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "oi, como vai");
    assert!(calls[0].1.starts_with("Conversa recente: "));
    assert!(calls[0].1.ends_with(" | oi, como vai"));
    assert!(!session.awaiting_completion());
}

#[tokio::test]
async fn failing_completion_yields_canned_apology() {
    let client = ScriptedClient::new(Script::Fail);
    let mut session = new_session(client.clone());
    let replies = session.handle_message("oi, como vai", &menu()).await;

    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].text, TECHNICAL_DIFFICULTY_REPLY);
    assert_eq!(client.calls().len(), 1, "failures are not retried");
    assert_eq!(session.state().stage, Stage::Greeting);
}

#[tokio::test]
async fn trouble_reply_and_timeout_are_replaced() {
    let client = ScriptedClient::new(Script::Reply("Estou com problemas técnicos, tente mais tarde"));
    let mut session = new_session(client);
    let replies = session.handle_message("me conta uma piada", &menu()).await;
    assert_eq!(replies[0].text, TECHNICAL_DIFFICULTY_REPLY);

    let client = ScriptedClient::new(Script::Hang);
    let mut session = new_session(client).with_completion_timeout(Duration::from_millis(50));
    let replies = session.handle_message("me conta uma piada", &menu()).await;
    assert_eq!(replies[0].text, TECHNICAL_DIFFICULTY_REPLY);
    assert!(!session.awaiting_completion());
}

#[tokio::test]
async fn sink_sees_pending_completion_before_reply() {
    let client = ScriptedClient::new(Script::Reply("Olá!"));
    let mut session = new_session(client);
    let mut sink = RecordingSink::default();

    session
        .handle_message_with_sink("bom dia", &menu(), &mut sink)
        .await
        .expect("render succeeds");

    // greeting + user message while pending, then the reply
    assert_eq!(sink.frames, vec![(2, true), (3, false)]);
}

#[tokio::test]
async fn failed_render_still_completes_the_turn() {
    let client = ScriptedClient::new(Script::Reply("Bom dia! Em que posso ajudar?"));
    let mut session = new_session(client.clone());

    let result = session.handle_message_with_sink("bom dia", &menu(), &mut FailingSink).await;
    assert!(result.is_err(), "render failure is still reported");

    assert!(!session.awaiting_completion());
    assert_eq!(client.calls().len(), 1);
    let last = session.state().messages.last().expect("reply appended");
    assert!(last.is_bot());
    assert_eq!(last.text, "Bom dia! Em que posso ajudar?");
}

#[tokio::test]
async fn human_handoff_is_sticky_and_never_delegates() {
    let client = ScriptedClient::new(Script::Reply("não deveria ser chamado"));
    let mut session = new_session(client.clone());
    let catalog = menu();

    session.handle_message("quero falar com um atendente", &catalog).await;
    assert!(session.view().awaiting_human);
    assert_eq!(session.state().stage, Stage::HumanHandoff);

    session.handle_message("oi, tudo bem?", &catalog).await;
    assert_eq!(session.state().stage, Stage::HumanHandoff);
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn malformed_menu_degrades_to_empty_catalog() {
    let mut session = new_session(DisabledCompletionClient);
    let empty = MenuCatalog::default();

    let replies = session.handle_message("quanto custa a margherita", &empty).await;
    assert!(replies[0].text.contains("Não encontrei"));

    let replies = session.handle_message("cardápio", &empty).await;
    assert!(replies[0].text.contains("indisponível"));
}
