//! Coarse in-domain / off-topic classification.
//!
//! Both checks are plain keyword membership over normalized text. The result
//! is advisory: the dialogue engine tries every pizzeria rule first and only
//! consults [`IntentRouter::should_delegate`] when none of them fired.

use crate::text::{contains_phrase, normalize};

/// Substring keywords that mark a message as being about the pizzeria.
pub const DOMAIN_KEYWORDS: &[&str] = &[
    "cardapio", "menu", "pizza", "preco", "valor", "custa", "ingrediente", "pedido", "pedir",
    "quero", "finalizar", "endereco", "entrega", "calabresa", "margherita", "portuguesa",
    "frango", "catupiry", "coca", "refrigerante", "bebida", "guarana", "suco", "borda", "grande",
    "broto", "tamanho", "promocao", "tempo", "minutos", "quanto tempo", "demora",
];

/// Whole-word phrases that mark small talk.
pub const CASUAL_KEYWORDS: &[&str] = &[
    "oi", "ola", "bom dia", "boa tarde", "boa noite", "obrigado", "obrigada", "valeu", "tchau",
    "ate logo", "como vai", "tudo bem", "e ai", "eai", "beleza",
];

#[derive(Clone, Debug)]
pub struct IntentRouter {
    domain_keywords: Vec<String>,
    casual_keywords: Vec<String>,
}

impl Default for IntentRouter {
    fn default() -> Self {
        Self::new(DOMAIN_KEYWORDS, CASUAL_KEYWORDS)
    }
}

impl IntentRouter {
    pub fn new(domain_keywords: &[&str], casual_keywords: &[&str]) -> Self {
        Self {
            domain_keywords: domain_keywords.iter().map(|keyword| normalize(keyword)).collect(),
            casual_keywords: casual_keywords.iter().map(|keyword| normalize(keyword)).collect(),
        }
    }

    pub fn is_in_domain(&self, text: &str) -> bool {
        let text = normalize(text);
        self.domain_keywords.iter().any(|keyword| text.contains(keyword.as_str()))
    }

    pub fn is_casual(&self, text: &str) -> bool {
        let text = normalize(text);
        self.casual_keywords.iter().any(|keyword| contains_phrase(&text, keyword))
    }

    pub fn should_delegate(&self, text: &str) -> bool {
        self.is_casual(text) || !self.is_in_domain(text)
    }
}
