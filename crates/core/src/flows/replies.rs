//! Bot reply texts.

use std::fmt::Write as _;

use rust_decimal::Decimal;

use crate::catalog::MenuCatalog;
use crate::domain::menu::{MenuCategory, MenuItem};
use crate::domain::order::{AddressField, Order};
use crate::flows::upsell::UpsellOffer;

pub fn money(amount: Decimal) -> String {
    format!("R$ {amount:.2}")
}

pub fn greeting(assistant_name: &str) -> String {
    format!(
        "🍕 Olá! Eu sou a {assistant_name}, sua assistente virtual da pizzaria! 😊 \
         Estou aqui para ajudar você a fazer o melhor pedido! Como posso te ajudar hoje?"
    )
}

pub fn human_handoff() -> String {
    "🤝 Entendo! Vou conectar você com um de nossos atendentes humanos. \
     Por favor, aguarde um momento..."
        .to_string()
}

pub fn awaiting_human() -> String {
    "⏳ Um atendente humano já foi chamado e vai responder em instantes. Obrigado pela paciência!"
        .to_string()
}

pub fn order_confirmed(minutes: u32) -> String {
    format!(
        "✅ Seu pedido já está confirmado e chega em cerca de {minutes} minutos! \
         Para um novo pedido, inicie uma nova conversa."
    )
}

pub fn ask_address_field(field: AddressField) -> String {
    match field {
        AddressField::Name => "📝 Ótimo! Para finalizar, qual é o seu nome?".to_string(),
        AddressField::Street => "🏠 Qual é a rua para entrega?".to_string(),
        AddressField::Number => "🔢 Qual é o número?".to_string(),
        AddressField::Neighborhood => "📍 E qual é o bairro?".to_string(),
    }
}

pub fn finalize_empty_order() -> String {
    "🤔 Seu pedido ainda está vazio! Escolha algo do cardápio primeiro. \
     Digite \"cardápio\" para ver as opções."
        .to_string()
}

pub fn continue_order() -> String {
    "😋 Claro! O que mais você gostaria de adicionar ao pedido?".to_string()
}

pub fn ingredient_removed(item_name: &str, ingredient: &str) -> String {
    format!("👌 Anotado! A {item_name} vai sem {ingredient}.")
}

pub fn ingredient_already_removed(item_name: &str, ingredient: &str) -> String {
    format!("👌 Já anotei: a {item_name} vai sem {ingredient}.")
}

pub fn ingredients(item: &MenuItem) -> String {
    if item.ingredients.is_empty() {
        format!("A {} está pronta para você! 🥤", item.name)
    } else {
        format!(
            "🍅 A {} é feita com: {}. Fica uma delícia! 😍",
            item.name,
            item.ingredients.join(", ")
        )
    }
}

pub fn item_not_found() -> String {
    "🤔 Não encontrei esse item no nosso cardápio. Que tal dar uma olhada em nossas opções? \
     Digite \"cardápio\" para ver tudo!"
        .to_string()
}

fn price_line(item: &MenuItem) -> String {
    match item.price_small {
        Some(small) => format!(
            "{} (tamanho grande) ou {} (broto)",
            money(item.price),
            money(small)
        ),
        None => money(item.price),
    }
}

pub fn price(item: &MenuItem) -> String {
    format!(
        "💰 A {} custa {}! Se quiser, é só dizer \"quero\" que eu adiciono ao pedido. 😋",
        item.name,
        price_line(item)
    )
}

pub fn item_card(item: &MenuItem) -> String {
    let mut card = format!("🍕 {}\n", item.name);
    if !item.ingredients.is_empty() {
        let _ = writeln!(card, "Ingredientes: {}", item.ingredients.join(", "));
    }
    let _ = writeln!(card, "Preço: {}", price_line(item));
    card.push_str("Gostaria de pedir? É só dizer \"quero\"! 😊");
    card
}

pub fn added_to_order(item: &MenuItem, total: Decimal) -> String {
    format!(
        "🎉 Perfeito! Adicionei a {} ao seu pedido. Total até agora: {}.\n\n\
         Digite \"continuar pedido\" para adicionar mais itens ou \"finalizar\" para \
         informar o endereço! 😊",
        item.name,
        money(total)
    )
}

pub fn upsell_offer(item: &MenuItem, total: Decimal, offers: &[UpsellOffer]) -> String {
    let mut text = format!(
        "🎉 Perfeito! Adicionei a {} ao seu pedido. Total até agora: {}.\n\n\
         Que tal completar com:\n",
        item.name,
        money(total)
    );
    for offer in offers {
        let _ = writeln!(text, "• {} - {}", offer.item.name, money(offer.item.price));
    }
    text.push_str("Responda \"sim\" para os dois, diga qual deseja ou \"não\" para seguir só com a pizza.");
    text
}

pub fn upsell_accepted(added: &[&MenuItem], total: Decimal) -> String {
    let names: Vec<&str> = added.iter().map(|item| item.name.as_str()).collect();
    format!(
        "😍 Adicionei {} ao seu pedido! Total: {}.\n\n\
         Digite \"continuar pedido\" para mais itens ou \"finalizar\" para informar o endereço.",
        names.join(" e "),
        money(total)
    )
}

pub fn upsell_declined(total: Decimal) -> String {
    format!(
        "👍 Sem problemas! Total do pedido: {}.\n\n\
         Digite \"continuar pedido\" para mais itens ou \"finalizar\" para informar o endereço.",
        money(total)
    )
}

pub fn delivery_time(minutes: u32) -> String {
    format!("🛵 Nosso tempo estimado de entrega é de {minutes} minutos!")
}

fn section_title(category: MenuCategory) -> &'static str {
    match category {
        MenuCategory::Pizza => "🍕 PIZZAS CLÁSSICAS & ESPECIAIS:",
        MenuCategory::Side => "🥖 BORDAS RECHEADAS:",
        MenuCategory::Beverage => "🥤 BEBIDAS:",
        MenuCategory::Dessert => "🍫 SOBREMESAS:",
    }
}

/// Available items grouped by category. Only the first `pizza_limit` pizzas
/// are listed, followed by a count of the rest.
pub fn menu(catalog: &MenuCatalog, pizza_limit: usize) -> String {
    if catalog.available_count() == 0 {
        return "😕 Nosso cardápio está indisponível no momento. \
                Tente novamente em instantes ou peça para falar com um atendente."
            .to_string();
    }

    let mut text = String::from("📋 Aqui está nosso delicioso cardápio! 🍕\n");
    for category in MenuCategory::ALL {
        let items: Vec<&MenuItem> = catalog.available_in(category).collect();
        if items.is_empty() {
            continue;
        }
        let limit = if category == MenuCategory::Pizza { pizza_limit } else { items.len() };
        let _ = writeln!(text, "\n{}", section_title(category));
        for item in items.iter().take(limit) {
            let _ = writeln!(text, "• {} - {}", item.name, money(item.price));
        }
        if items.len() > limit {
            let _ = writeln!(text, "…e mais {} sabores!", items.len() - limit);
        }
    }
    text.push_str("\n💡 Dica: pergunte sobre ingredientes ou preços de qualquer item! 😊");
    text
}

pub fn order_start() -> String {
    "🎉 Que ótimo! Vamos fazer seu pedido! Me diga qual pizza e bebidas você gostaria. \
     Posso também personalizar removendo ingredientes! 😋"
        .to_string()
}

pub fn fallback() -> String {
    "😊 Desculpe, não entendi muito bem! Posso te ajudar com:\n\n\
     • Ver o cardápio completo\n\
     • Consultar preços e ingredientes\n\
     • Fazer um pedido\n\
     • Falar com um atendente humano\n\
     • Informações sobre delivery\n\n\
     O que você gostaria de fazer? 🍕"
        .to_string()
}

pub fn turn_failed() -> String {
    "😕 Desculpe, não consegui concluir essa etapa. Pode tentar de novo?".to_string()
}

/// Final summary sent when the address is complete.
pub fn order_summary(order: &Order, minutes: u32) -> String {
    let mut text = String::from("✅ Pedido confirmado!\n\n🧾 Itens:\n");
    for line in order.lines() {
        let _ = write!(text, "• {} - {}", line.name, money(line.unit_price));
        if !line.removed_ingredients.is_empty() {
            let _ = write!(text, " (sem {})", line.removed_ingredients.join(", "));
        }
        text.push('\n');
    }
    let customer = &order.customer;
    let _ = write!(
        text,
        "\n💰 Total: {}\n\n👤 Nome: {}\n🏠 Endereço: {}, {} - {}\n\n\
         🛵 Tempo estimado de entrega: {} minutos. Obrigado pela preferência!",
        money(order.total()),
        customer.name,
        customer.street,
        customer.number,
        customer.neighborhood,
        minutes
    );
    text
}

/// Rolling context handed to the completion collaborator.
pub fn delegation_context(recent: &[&str]) -> String {
    format!("Conversa recente: {}", recent.join(" | "))
}
