use frajola_core::MenuItem;
use serde::Serialize;

use super::{Assistant, CommandResult};

const COMMAND: &str = "menu";

#[derive(Debug, Serialize)]
struct MenuReport<'a> {
    command: &'static str,
    status: &'static str,
    estimated_delivery_minutes: u32,
    items: Vec<&'a MenuItem>,
}

pub fn run(include_unavailable: bool) -> CommandResult {
    let catalog = match Assistant::load(COMMAND) {
        Ok(assistant) => assistant.catalog,
        Err(result) => return result,
    };

    let items = catalog
        .items()
        .iter()
        .filter(|item| include_unavailable || item.available)
        .collect();
    let report = MenuReport {
        command: COMMAND,
        status: "ok",
        estimated_delivery_minutes: catalog.estimated_delivery_minutes(),
        items,
    };
    CommandResult::payload(0, &report)
}
