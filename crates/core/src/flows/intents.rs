//! Trigger phrase tables, matched as whole words over normalized text.

use crate::text::contains_phrase;

#[derive(Clone, Copy, Debug)]
pub struct TriggerSet(pub &'static [&'static str]);

impl TriggerSet {
    pub fn matches(&self, normalized: &str) -> bool {
        self.0.iter().any(|phrase| contains_phrase(normalized, phrase))
    }
}

pub const HUMAN: TriggerSet = TriggerSet(&[
    "humano",
    "atendente",
    "pessoa",
    "ajuda especializada",
    "falar com alguem",
]);

pub const FINALIZE: TriggerSet =
    TriggerSet(&["finalizar", "finaliza", "fechar pedido", "fechar o pedido", "so isso"]);

pub const CONTINUE: TriggerSet =
    TriggerSet(&["continuar", "continua", "adicionar mais", "mais itens"]);

pub const REMOVE: TriggerSet = TriggerSet(&["sem", "tirar", "tira", "remover", "retirar"]);

pub const INGREDIENTS: TriggerSet = TriggerSet(&[
    "ingrediente",
    "ingredientes",
    "tem o que",
    "feita com",
    "feito com",
]);

pub const PRICE: TriggerSet =
    TriggerSet(&["preco", "quanto custa", "quanto e", "quanto sai", "valor", "custa"]);

pub const ADD: TriggerSet = TriggerSet(&[
    "quero",
    "vou querer",
    "adicionar",
    "adiciona",
    "pode ser",
    "manda",
    "vou levar",
]);

pub const DELIVERY_TIME: TriggerSet =
    TriggerSet(&["quanto tempo", "demora", "tempo de entrega", "prazo"]);

pub const MENU: TriggerSet = TriggerSet(&["cardapio", "menu", "opcoes", "sabores"]);

pub const ORDER_START: TriggerSet = TriggerSet(&["pedido", "pedir", "quero", "fazer pedido"]);

pub const UPSELL_ACCEPT: TriggerSet =
    TriggerSet(&["sim", "quero", "os dois", "ambos", "tudo", "pode ser", "claro"]);

pub const UPSELL_DECLINE: TriggerSet = TriggerSet(&["nao", "nada", "dispenso", "so a pizza"]);

/// Words that negate an add-on mentioned right after them.
pub const NEGATIONS: TriggerSet = TriggerSet(&["nao", "sem"]);

#[cfg(test)]
mod tests {
    use super::{ADD, FINALIZE, HUMAN, PRICE};
    use crate::text::normalize;

    #[test]
    fn triggers_match_normalized_whole_words() {
        assert!(HUMAN.matches(&normalize("Quero falar com um ATENDENTE")));
        assert!(PRICE.matches(&normalize("Qual o preço?")));
        assert!(FINALIZE.matches(&normalize("pode finalizar")));
        assert!(!ADD.matches(&normalize("queromancia")));
        assert!(!HUMAN.matches(&normalize("pessoal, boa noite")));
    }
}
