use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::catalog::{MenuCatalog, DEFAULT_ESTIMATED_DELIVERY_MINUTES};
use crate::domain::menu::MenuItem;
use crate::errors::ApplicationError;

/// Source of the menu list refreshed by the admin collaborator.
pub trait MenuProvider: Send + Sync {
    fn load(&self) -> Result<MenuCatalog, ApplicationError>;

    /// Missing or malformed menu data means "nothing available".
    fn load_or_empty(&self) -> MenuCatalog {
        match self.load() {
            Ok(catalog) => catalog,
            Err(error) => {
                warn!(
                    event_name = "menu.load_failed",
                    error_class = error.error_class(),
                    error = %error,
                    "menu source unavailable, continuing with an empty catalog"
                );
                MenuCatalog::default()
            }
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct StaticMenuProvider {
    catalog: MenuCatalog,
}

impl StaticMenuProvider {
    pub fn new(catalog: MenuCatalog) -> Self {
        Self { catalog }
    }
}

impl MenuProvider for StaticMenuProvider {
    fn load(&self) -> Result<MenuCatalog, ApplicationError> {
        Ok(self.catalog.clone())
    }
}

/// Reads `{ "estimated_delivery_minutes": 45, "items": [...] }` from disk.
///
/// Individual items that fail to parse or carry negative prices are skipped
/// with a warning; the rest of the menu still loads.
#[derive(Clone, Debug)]
pub struct JsonFileMenuProvider {
    path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct MenuFile {
    estimated_delivery_minutes: Option<u32>,
    #[serde(default)]
    items: Vec<Value>,
}

impl JsonFileMenuProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MenuProvider for JsonFileMenuProvider {
    fn load(&self) -> Result<MenuCatalog, ApplicationError> {
        let raw = fs::read_to_string(&self.path).map_err(|error| {
            ApplicationError::MenuSource(format!(
                "could not read menu file `{}`: {error}",
                self.path.display()
            ))
        })?;
        parse_menu(&raw).map_err(|message| {
            ApplicationError::MenuSource(format!(
                "could not parse menu file `{}`: {message}",
                self.path.display()
            ))
        })
    }
}

fn parse_menu(raw: &str) -> Result<MenuCatalog, String> {
    let file: MenuFile = serde_json::from_str(raw).map_err(|error| error.to_string())?;

    let mut catalog = MenuCatalog::default().with_estimated_delivery_minutes(
        file.estimated_delivery_minutes
            .filter(|minutes| *minutes > 0)
            .unwrap_or(DEFAULT_ESTIMATED_DELIVERY_MINUTES),
    );

    for (index, value) in file.items.into_iter().enumerate() {
        let item = match serde_json::from_value::<MenuItem>(value) {
            Ok(item) => item,
            Err(error) => {
                warn!(
                    event_name = "menu.item_skipped",
                    index,
                    error = %error,
                    "malformed menu item"
                );
                continue;
            }
        };
        if let Err(error) = catalog.add_item(item) {
            warn!(event_name = "menu.item_skipped", index, error = %error, "invalid menu item");
        }
    }

    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use rust_decimal::Decimal;
    use tempfile::TempDir;

    use super::{JsonFileMenuProvider, MenuProvider, StaticMenuProvider};
    use crate::catalog::{MenuCatalog, DEFAULT_ESTIMATED_DELIVERY_MINUTES};
    use crate::domain::menu::{MenuCategory, MenuItem};
    use crate::errors::ApplicationError;

    #[test]
    fn json_file_loads_items_and_skips_bad_entries() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("menu.json");
        fs::write(
            &path,
            r#"{
                "estimated_delivery_minutes": 30,
                "items": [
                    {"id": "1", "name": "Pizza Margherita", "price": "35.90",
                     "ingredients": ["mussarela", "tomate"], "category": "pizza"},
                    {"id": "2", "name": "No Price", "category": "pizza"},
                    {"id": "3", "name": "Negative", "price": "-2.00", "category": "side"},
                    {"id": "1", "name": "Duplicate", "price": "1.00", "category": "side"},
                    {"id": "4", "name": "Guaraná 350ml", "price": "5.50", "category": "bebida"}
                ]
            }"#,
        )
        .expect("write menu");

        let catalog = JsonFileMenuProvider::new(&path).load().expect("menu should load");
        assert_eq!(catalog.estimated_delivery_minutes(), 30);
        let names: Vec<&str> = catalog.items().iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, vec!["Pizza Margherita", "Guaraná 350ml"]);
        assert_eq!(catalog.items()[0].price, Decimal::new(3590, 2));
    }

    #[test]
    fn missing_file_is_a_menu_source_error_and_degrades_to_empty() {
        let dir = TempDir::new().expect("temp dir");
        let provider = JsonFileMenuProvider::new(dir.path().join("absent.json"));

        assert!(matches!(provider.load(), Err(ApplicationError::MenuSource(_))));
        let catalog = provider.load_or_empty();
        assert!(catalog.is_empty());
        assert_eq!(catalog.estimated_delivery_minutes(), DEFAULT_ESTIMATED_DELIVERY_MINUTES);
    }

    #[test]
    fn malformed_json_degrades_to_empty_catalog() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("menu.json");
        fs::write(&path, "{ not json").expect("write menu");

        let provider = JsonFileMenuProvider::new(&path);
        assert!(provider.load().is_err());
        assert_eq!(provider.load_or_empty().available_count(), 0);
    }

    #[test]
    fn static_provider_returns_its_catalog() {
        let catalog = MenuCatalog::new(vec![MenuItem::new(
            "1",
            "Pizza Margherita",
            Decimal::new(3590, 2),
            MenuCategory::Pizza,
        )]);
        let provider = StaticMenuProvider::new(catalog.clone());
        assert_eq!(provider.load(), Ok(catalog));
    }
}
