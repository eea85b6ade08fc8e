use maitre_rs_protocol::{Menu, MenuItem};

/// Small fixture menu used across workflow tests.
pub fn sample_menu() -> Menu {
    let mut menu = Menu::new();
    menu.insert_item(
        "Burgers",
        "Classic Burger",
        MenuItem {
            price: 8.99,
            description: "Beef patty with lettuce, tomato, and house sauce.".to_string(),
            options: vec!["extra cheese".to_string(), "bacon".to_string()],
        },
    );
    menu.insert_item(
        "Burgers",
        "Veggie Burger",
        MenuItem {
            price: 9.49,
            description: "Grilled plant-based patty with avocado.".to_string(),
            options: vec!["extra cheese".to_string()],
        },
    );
    menu.insert_item(
        "Sides",
        "Fries",
        MenuItem {
            price: 2.99,
            description: "Crispy golden fries.".to_string(),
            options: vec!["large".to_string()],
        },
    );
    menu.insert_item(
        "Drinks",
        "Lemonade",
        MenuItem {
            price: 3.50,
            description: "Fresh-squeezed lemonade.".to_string(),
            options: Vec::new(),
        },
    );
    menu
}
