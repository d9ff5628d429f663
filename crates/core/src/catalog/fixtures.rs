use rust_decimal::Decimal;

use crate::catalog::MenuCatalog;
use crate::domain::menu::{MenuCategory, MenuItem};

fn price(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// Built-in demo menu used when no menu file is configured.
pub fn demo_menu() -> MenuCatalog {
    use MenuCategory::{Beverage, Dessert, Pizza, Side};

    MenuCatalog::new(vec![
        MenuItem::new("1", "Pizza Margherita", price(5000), Pizza)
            .with_small_price(price(3200))
            .with_ingredients(["mussarela", "manjericão", "tomate"]),
        MenuItem::new("2", "Pizza Presunto e Queijo", price(5500), Pizza)
            .with_ingredients(["presunto", "mussarela", "tomate"]),
        MenuItem::new("3", "Pizza Frango com Catupiry", price(5500), Pizza)
            .with_small_price(price(3500))
            .with_ingredients(["frango", "mussarela", "catupiry"]),
        MenuItem::new("4", "Pizza Portuguesa", price(6000), Pizza).with_ingredients([
            "mussarela",
            "presunto",
            "ervilha",
            "palmito",
            "ovos",
            "cebola",
        ]),
        MenuItem::new("6", "Pizza Mussarela", price(5000), Pizza)
            .with_small_price(price(3200))
            .with_ingredients(["mussarela", "tomate", "orégano", "azeitona"]),
        MenuItem::new("8", "Pizza 3 Queijos", price(5700), Pizza).with_ingredients([
            "mussarela",
            "catupiry",
            "provolone",
            "tomate",
            "orégano",
        ]),
        MenuItem::new("9", "Pizza 4 Queijos", price(6000), Pizza).with_ingredients([
            "mussarela",
            "catupiry",
            "provolone",
            "gorgonzola",
            "tomate",
            "orégano",
        ]),
        MenuItem::new("10", "Pizza Filé Mignon", price(7800), Pizza).with_ingredients([
            "filé mignon",
            "cebola",
            "mussarela",
            "catupiry",
            "orégano",
        ]),
        MenuItem::new("11", "Pizza Calabresa", price(5500), Pizza)
            .with_small_price(price(3500))
            .with_ingredients(["calabresa", "mussarela", "cebola", "azeitona"]),
        MenuItem::new("12", "Pizza 4 Carnes", price(7000), Pizza).with_ingredients([
            "presunto",
            "calabresa",
            "bacon",
            "mussarela",
            "lombo canadense",
        ]),
        MenuItem::new("15", "Pizza Frango Especial", price(6300), Pizza).with_ingredients([
            "mussarela",
            "frango",
            "catupiry",
            "milho",
            "bacon",
        ]),
        MenuItem::new("16", "Pizza Strogonoff", price(5600), Pizza)
            .with_ingredients(["mussarela", "frango ao molho", "batata palha"]),
        MenuItem::new("20", "Pizza Brócolis", price(6000), Pizza)
            .with_ingredients(["mussarela", "brócolis", "catupiry", "bacon", "tomate"]),
        MenuItem::new("21", "Pizza Rúcula", price(5500), Pizza)
            .with_ingredients(["mussarela", "rúcula", "palmito", "tomate seco"]),
        MenuItem::new("22", "Borda Catupiry", price(800), Side).with_ingredients(["catupiry"]),
        MenuItem::new("23", "Borda Cheddar", price(800), Side).with_ingredients(["cheddar"]),
        MenuItem::new("26", "Borda Catupiry com Bacon", price(1200), Side)
            .with_ingredients(["catupiry", "bacon"]),
        MenuItem::new("29", "Coca Cola 350ml", price(550), Beverage),
        MenuItem::new("30", "Guaraná 350ml", price(550), Beverage),
        MenuItem::new("31", "Suco de Laranja 300ml", price(890), Beverage)
            .with_ingredients(["laranja natural"]),
        MenuItem::new("24", "Borda Chocolate", price(1000), Dessert)
            .with_ingredients(["chocolate"]),
    ])
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::demo_menu;
    use crate::domain::menu::MenuCategory;

    #[test]
    fn demo_menu_is_valid_and_unique() {
        let catalog = demo_menu();
        let mut ids = BTreeSet::new();
        for item in catalog.items() {
            assert!(item.validate().is_ok(), "{} should be valid", item.name);
            assert!(ids.insert(item.id.clone()), "duplicate id {:?}", item.id);
        }
        for category in MenuCategory::ALL {
            assert!(catalog.available_in(category).count() > 0, "{category:?} section is empty");
        }
    }
}
