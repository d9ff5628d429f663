use tracing::{debug, warn};

use crate::catalog::MenuCatalog;
use crate::context::{ConversationContext, LastAction};
use crate::domain::conversation::Sender;
use crate::domain::order::AddressField;
use crate::errors::DomainError;
use crate::flows::intents::{
    ADD, CONTINUE, DELIVERY_TIME, FINALIZE, HUMAN, INGREDIENTS, MENU, ORDER_START, PRICE, REMOVE,
};
use crate::flows::replies;
use crate::flows::states::{DelegationRequest, DialogueState, Stage, TurnOutcome, TurnRule};
use crate::flows::upsell::{accepted_offers, default_offers, UpsellOffer};
use crate::resolver::{MenuResolver, ResolverSettings};
use crate::router::IntentRouter;
use crate::text::{contains_phrase, normalize};

pub const DEFAULT_ASSISTANT_NAME: &str = "Frajola";
pub const DEFAULT_MENU_PIZZA_LIMIT: usize = 10;
pub const DEFAULT_CONTEXT_WINDOW: usize = 3;

#[derive(Clone, Debug, PartialEq)]
pub struct DialogueConfig {
    pub assistant_name: String,
    pub resolver: ResolverSettings,
    pub menu_pizza_limit: usize,
    /// Number of recent messages handed to the completion collaborator.
    pub context_window: usize,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            assistant_name: DEFAULT_ASSISTANT_NAME.to_string(),
            resolver: ResolverSettings::default(),
            menu_pizza_limit: DEFAULT_MENU_PIZZA_LIMIT,
            context_window: DEFAULT_CONTEXT_WINDOW,
        }
    }
}

/// Working copy of one turn. Rules mutate it; the caller's snapshot is
/// never touched.
struct Turn<'a> {
    state: DialogueState,
    context: ConversationContext,
    catalog: &'a MenuCatalog,
    message: &'a str,
    text: String,
    replies: Vec<String>,
    delegation: Option<DelegationRequest>,
}

impl Turn<'_> {
    fn reply(&mut self, text: String) {
        self.state.push_message(text.clone(), Sender::Bot);
        self.replies.push(text);
    }
}

type Rule = fn(&DialogueEngine, &mut Turn<'_>) -> Option<TurnRule>;

/// Evaluated top to bottom; the first rule that answers ends the turn.
const RULES: [Rule; 15] = [
    DialogueEngine::human_request,
    DialogueEngine::absorbing_stage,
    DialogueEngine::upsell_response,
    DialogueEngine::address_collection,
    DialogueEngine::finalize,
    DialogueEngine::continue_order,
    DialogueEngine::ingredient_removal,
    DialogueEngine::ingredient_query,
    DialogueEngine::price_query,
    DialogueEngine::item_mention,
    DialogueEngine::add_to_order,
    DialogueEngine::delivery_time,
    DialogueEngine::show_menu,
    DialogueEngine::order_start,
    DialogueEngine::delegation,
];

/// Rule-based dialogue stage machine.
///
/// [`DialogueEngine::process_turn`] is a pure function of
/// `(state, context, catalog, message)`: the same inputs always produce the
/// same next state, context and reply texts (message timestamps aside).
#[derive(Clone, Debug)]
pub struct DialogueEngine {
    config: DialogueConfig,
    resolver: MenuResolver,
    router: IntentRouter,
    offers: Vec<UpsellOffer>,
}

impl Default for DialogueEngine {
    fn default() -> Self {
        Self::new(DialogueConfig::default())
    }
}

impl DialogueEngine {
    pub fn new(config: DialogueConfig) -> Self {
        Self {
            resolver: MenuResolver::new(config.resolver.clone()),
            router: IntentRouter::default(),
            offers: default_offers(),
            config,
        }
    }

    pub fn with_offers(mut self, offers: Vec<UpsellOffer>) -> Self {
        self.offers = offers;
        self
    }

    pub fn with_resolver(mut self, resolver: MenuResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn config(&self) -> &DialogueConfig {
        &self.config
    }

    pub fn resolver(&self) -> &MenuResolver {
        &self.resolver
    }

    pub fn router(&self) -> &IntentRouter {
        &self.router
    }

    /// A fresh conversation holding the greeting.
    pub fn initial_state(&self) -> DialogueState {
        DialogueState::new(replies::greeting(&self.config.assistant_name))
    }

    pub fn process_turn(
        &self,
        state: &DialogueState,
        context: &ConversationContext,
        catalog: &MenuCatalog,
        message: &str,
    ) -> TurnOutcome {
        let mut turn = Turn {
            state: state.clone(),
            context: context.clone(),
            catalog,
            message,
            text: normalize(message),
            replies: Vec::new(),
            delegation: None,
        };
        turn.state.push_message(message, Sender::User);

        let rule = RULES.iter().find_map(|rule| rule(self, &mut turn)).unwrap_or_else(|| {
            turn.reply(replies::fallback());
            TurnRule::Fallback
        });

        debug!(
            event_name = "dialogue.turn.processed",
            conversation_id = %turn.state.conversation_id,
            stage = %turn.state.stage,
            rule = rule.as_str(),
            replies = turn.replies.len(),
            delegated = turn.delegation.is_some(),
            "dialogue turn processed"
        );

        TurnOutcome {
            state: turn.state,
            context: turn.context,
            replies: turn.replies,
            rule,
            delegation: turn.delegation,
        }
    }

    fn human_request(&self, turn: &mut Turn<'_>) -> Option<TurnRule> {
        if !HUMAN.matches(&turn.text) {
            return None;
        }
        turn.state.stage = Stage::HumanHandoff;
        turn.state.awaiting_human = true;
        turn.reply(replies::human_handoff());
        Some(TurnRule::HumanRequest)
    }

    fn absorbing_stage(&self, turn: &mut Turn<'_>) -> Option<TurnRule> {
        match turn.state.stage {
            Stage::HumanHandoff => {
                turn.reply(replies::awaiting_human());
                Some(TurnRule::AwaitingHuman)
            }
            Stage::Confirmation => {
                turn.reply(replies::order_confirmed(turn.catalog.estimated_delivery_minutes()));
                Some(TurnRule::OrderConfirmed)
            }
            _ => None,
        }
    }

    fn upsell_response(&self, turn: &mut Turn<'_>) -> Option<TurnRule> {
        if !turn.context.awaiting_extras {
            return None;
        }
        turn.context.awaiting_extras = false;
        turn.context.last_action = None;

        let accepted = accepted_offers(&turn.text, &self.offers);
        let mut order = turn.state.order.clone();
        for offer in &accepted {
            if let Err(error) = order.add_line(&offer.item, None) {
                return Some(domain_failure(turn, TurnRule::UpsellResponse, error));
            }
        }
        turn.state.order = order;

        let total = turn.state.order.total();
        if accepted.is_empty() {
            turn.reply(replies::upsell_declined(total));
        } else {
            let added: Vec<_> = accepted.iter().map(|offer| &offer.item).collect();
            turn.reply(replies::upsell_accepted(&added, total));
        }
        Some(TurnRule::UpsellResponse)
    }

    fn address_collection(&self, turn: &mut Turn<'_>) -> Option<TurnRule> {
        if turn.state.stage != Stage::Address {
            return None;
        }
        let field = turn.context.pending_address_field.unwrap_or(AddressField::Name);
        let value = turn.message.trim();
        if value.is_empty() {
            turn.reply(replies::ask_address_field(field));
            return Some(TurnRule::AddressCollection);
        }
        if let Err(error) = turn.state.order.set_customer_field(field, value) {
            return Some(domain_failure(turn, TurnRule::AddressCollection, error));
        }

        match field.next() {
            Some(next) => {
                turn.context.pending_address_field = Some(next);
                turn.reply(replies::ask_address_field(next));
            }
            None => {
                turn.context.pending_address_field = None;
                turn.state.order.close();
                turn.state.stage = Stage::Confirmation;
                let minutes = turn.catalog.estimated_delivery_minutes();
                let summary = replies::order_summary(&turn.state.order, minutes);
                turn.reply(summary);
            }
        }
        Some(TurnRule::AddressCollection)
    }

    fn finalize(&self, turn: &mut Turn<'_>) -> Option<TurnRule> {
        if !FINALIZE.matches(&turn.text) {
            return None;
        }
        if turn.state.order.is_empty() {
            turn.reply(replies::finalize_empty_order());
        } else {
            turn.state.stage = Stage::Address;
            turn.context.pending_address_field = Some(AddressField::Name);
            turn.reply(replies::ask_address_field(AddressField::Name));
        }
        Some(TurnRule::Finalize)
    }

    fn continue_order(&self, turn: &mut Turn<'_>) -> Option<TurnRule> {
        if !CONTINUE.matches(&turn.text) {
            return None;
        }
        turn.state.stage = Stage::Ordering;
        turn.reply(replies::continue_order());
        Some(TurnRule::ContinueOrder)
    }

    fn ingredient_removal(&self, turn: &mut Turn<'_>) -> Option<TurnRule> {
        if !REMOVE.matches(&turn.text) {
            return None;
        }
        let line = turn.state.order.last_line()?;
        let ingredient = line
            .ingredients
            .iter()
            .find(|ingredient| contains_phrase(&turn.text, &normalize(ingredient)))?
            .clone();
        let item_name = line.name.clone();

        match turn.state.order.remove_ingredient_from_last(&ingredient) {
            Ok(true) => turn.reply(replies::ingredient_removed(&item_name, &ingredient)),
            Ok(false) => turn.reply(replies::ingredient_already_removed(&item_name, &ingredient)),
            Err(error) => return Some(domain_failure(turn, TurnRule::IngredientRemoval, error)),
        }
        Some(TurnRule::IngredientRemoval)
    }

    fn ingredient_query(&self, turn: &mut Turn<'_>) -> Option<TurnRule> {
        if !INGREDIENTS.matches(&turn.text) {
            return None;
        }
        let catalog = turn.catalog;
        match self.resolver.resolve_in_context(turn.message, catalog, &turn.context) {
            Some(resolution) => {
                turn.context.remember(resolution.item, Some(LastAction::Ingredients));
                turn.reply(replies::ingredients(resolution.item));
            }
            None => turn.reply(replies::item_not_found()),
        }
        Some(TurnRule::IngredientQuery)
    }

    fn price_query(&self, turn: &mut Turn<'_>) -> Option<TurnRule> {
        if !PRICE.matches(&turn.text) {
            return None;
        }
        let catalog = turn.catalog;
        match self.resolver.resolve_in_context(turn.message, catalog, &turn.context) {
            Some(resolution) => {
                turn.context.remember(resolution.item, Some(LastAction::Price));
                turn.reply(replies::price(resolution.item));
            }
            None => turn.reply(replies::item_not_found()),
        }
        Some(TurnRule::PriceQuery)
    }

    fn item_mention(&self, turn: &mut Turn<'_>) -> Option<TurnRule> {
        if MENU.matches(&turn.text) {
            return None;
        }
        let catalog = turn.catalog;
        let item = self.resolver.resolve(turn.message, catalog.items())?;
        // "quero a margherita" right after discussing it is an add, not a lookup
        if ADD.matches(&turn.text) && turn.context.last_item.as_ref() == Some(&item.id) {
            return None;
        }
        turn.context.remember(item, None);
        turn.reply(replies::item_card(item));
        Some(TurnRule::ItemMention)
    }

    fn add_to_order(&self, turn: &mut Turn<'_>) -> Option<TurnRule> {
        if !ADD.matches(&turn.text) {
            return None;
        }
        let catalog = turn.catalog;
        let item = turn.context.recalled_item(catalog)?;
        if let Some(direct) = self.resolver.resolve(turn.message, catalog.items()) {
            if direct.id != item.id {
                return None;
            }
        }

        let total = match turn.state.order.add_line(item, None) {
            Ok(total) => total,
            Err(error) => return Some(domain_failure(turn, TurnRule::AddToOrder, error)),
        };
        turn.state.stage = Stage::Ordering;

        if item.is_pizza() && !self.offers.is_empty() {
            turn.context.awaiting_extras = true;
            turn.context.last_action = Some(LastAction::OfferExtras);
            turn.reply(replies::upsell_offer(item, total, &self.offers));
        } else {
            turn.reply(replies::added_to_order(item, total));
        }
        Some(TurnRule::AddToOrder)
    }

    fn delivery_time(&self, turn: &mut Turn<'_>) -> Option<TurnRule> {
        if !DELIVERY_TIME.matches(&turn.text) {
            return None;
        }
        turn.reply(replies::delivery_time(turn.catalog.estimated_delivery_minutes()));
        Some(TurnRule::DeliveryTime)
    }

    fn show_menu(&self, turn: &mut Turn<'_>) -> Option<TurnRule> {
        if !MENU.matches(&turn.text) {
            return None;
        }
        turn.context.forget_item();
        turn.context.last_action = Some(LastAction::Menu);
        turn.reply(replies::menu(turn.catalog, self.config.menu_pizza_limit));
        Some(TurnRule::ShowMenu)
    }

    fn order_start(&self, turn: &mut Turn<'_>) -> Option<TurnRule> {
        if !ORDER_START.matches(&turn.text) {
            return None;
        }
        turn.state.stage = Stage::Ordering;
        turn.reply(replies::order_start());
        Some(TurnRule::OrderStart)
    }

    fn delegation(&self, turn: &mut Turn<'_>) -> Option<TurnRule> {
        if !self.router.should_delegate(turn.message) {
            return None;
        }
        let recent = turn.state.recent_texts(self.config.context_window);
        let context = replies::delegation_context(&recent);
        turn.delegation = Some(DelegationRequest { message: turn.message.to_string(), context });
        Some(TurnRule::Delegation)
    }
}

fn domain_failure(turn: &mut Turn<'_>, rule: TurnRule, error: DomainError) -> TurnRule {
    warn!(
        event_name = "dialogue.turn.domain_error",
        conversation_id = %turn.state.conversation_id,
        rule = rule.as_str(),
        error = %error,
        "turn rule rejected by the domain"
    );
    turn.reply(replies::turn_failed());
    rule
}
