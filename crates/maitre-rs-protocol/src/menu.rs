//! Restaurant menu structure and prompt-text rendering.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Details for one menu item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuItem {
    /// Price in the restaurant currency.
    pub price: f64,
    /// Short human-readable description.
    #[serde(default)]
    pub description: String,
    /// Available options or add-ons.
    #[serde(default)]
    pub options: Vec<String>,
}

/// Menu mapping category names to items; immutable per workflow invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Menu {
    categories: BTreeMap<String, BTreeMap<String, MenuItem>>,
}

impl Menu {
    /// Build an empty menu.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a menu from its JSON representation.
    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(contents)
    }

    /// Insert or replace an item under a category.
    pub fn insert_item(&mut self, category: &str, name: &str, item: MenuItem) {
        self.categories
            .entry(category.to_string())
            .or_default()
            .insert(name.to_string(), item);
    }

    /// Whether the menu has no items.
    pub fn is_empty(&self) -> bool {
        self.categories.values().all(BTreeMap::is_empty)
    }

    /// Total number of items across categories.
    pub fn item_count(&self) -> usize {
        self.categories.values().map(BTreeMap::len).sum()
    }

    /// Number of categories.
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Render the menu as plain text for prompt inclusion.
    pub fn to_prompt_text(&self) -> String {
        let mut sections = Vec::with_capacity(self.categories.len());
        for (category, items) in &self.categories {
            let mut lines = Vec::with_capacity(items.len() + 1);
            lines.push(format!("{category}:"));
            for (name, item) in items {
                let mut line = format!("- {name} (${:.2})", item.price);
                if !item.description.is_empty() {
                    line.push_str(": ");
                    line.push_str(&item.description);
                }
                if !item.options.is_empty() {
                    line.push_str(" Options: ");
                    line.push_str(&item.options.join(", "));
                    line.push('.');
                }
                lines.push(line);
            }
            sections.push(lines.join("\n"));
        }
        sections.join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::{Menu, MenuItem};
    use pretty_assertions::assert_eq;

    fn burger() -> MenuItem {
        MenuItem {
            price: 8.99,
            description: "Beef patty with lettuce and tomato.".to_string(),
            options: vec!["extra cheese".to_string(), "bacon".to_string()],
        }
    }

    #[test]
    fn renders_categories_and_options() {
        let mut menu = Menu::new();
        menu.insert_item("Burgers", "Classic Burger", burger());
        menu.insert_item(
            "Drinks",
            "Lemonade",
            MenuItem {
                price: 3.5,
                description: String::new(),
                options: Vec::new(),
            },
        );

        let text = menu.to_prompt_text();
        let expected = "Burgers:\n\
- Classic Burger ($8.99): Beef patty with lettuce and tomato. Options: extra cheese, bacon.\n\
\n\
Drinks:\n\
- Lemonade ($3.50)";
        assert_eq!(text, expected);
    }

    #[test]
    fn parses_from_json() {
        let menu = Menu::from_json(
            r#"{"Sides": {"Fries": {"price": 2.99, "description": "Crispy.", "options": []}}}"#,
        )
        .expect("parse menu");
        assert_eq!(menu.item_count(), 1);
        assert_eq!(menu.category_count(), 1);
        assert!(!menu.is_empty());
        assert!(menu.to_prompt_text().contains("Fries ($2.99): Crispy."));
    }

    #[test]
    fn empty_menu_renders_empty() {
        assert_eq!(Menu::new().to_prompt_text(), "");
        assert!(Menu::new().is_empty());
    }
}
