use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::order::CustomerInfo;

// ============================================================================
// Catalog & Customer Lookups
// ============================================================================
//
// Pure data providers consulted while building orders. The order lifecycle
// never calls back into them once an order exists.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
}

impl MenuItem {
    pub fn new(
        id: u32,
        name: impl Into<String>,
        description: impl Into<String>,
        price: Decimal,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            price,
            category: category.into(),
        }
    }

    /// "Margherita - $12.99 (Pizza)"
    pub fn info(&self) -> String {
        format!("{} - ${:.2} ({})", self.name, self.price, self.category)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuCategory {
    pub name: String,
    pub items: Vec<MenuItem>,
}

/// Lookup of menu items while an order is being assembled
pub trait MenuCatalog {
    /// `index` is 1-based, `category` matches case-insensitively
    fn find_item(&self, category: &str, index: usize) -> Option<MenuItem>;

    fn find_by_id(&self, id: u32) -> Option<MenuItem>;
}

/// Lookup of known customers
pub trait CustomerDirectory {
    fn find_customer(&self, name: &str) -> Option<CustomerInfo>;
}

#[derive(Debug, Clone, Default)]
pub struct Menu {
    categories: Vec<MenuCategory>,
}

impl Menu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pizza, burgers and drinks
    pub fn house_menu() -> Self {
        let mut menu = Self::new();
        let entries = [
            (1, "Margherita", "Classic tomato and mozzarella", 1299, "Pizza"),
            (2, "Pepperoni", "Pepperoni with cheese", 1499, "Pizza"),
            (3, "Quattro Stagioni", "Four seasons pizza", 1699, "Pizza"),
            (4, "Cheeseburger", "Beef with cheese", 999, "Burgers"),
            (5, "Chicken Burger", "Grilled chicken", 899, "Burgers"),
            (6, "Veggie Burger", "Plant-based patty", 1099, "Burgers"),
            (7, "Coca Cola", "Refreshing cola", 299, "Beverages"),
            (8, "Water", "Bottled water", 199, "Beverages"),
            (9, "Orange Juice", "Fresh squeezed", 499, "Beverages"),
        ];

        for (id, name, description, cents, category) in entries {
            menu.add_item(MenuItem::new(id, name, description, Decimal::new(cents, 2), category));
        }

        menu
    }

    /// Adds the item, creating its category on first use
    pub fn add_item(&mut self, item: MenuItem) {
        match self
            .categories
            .iter_mut()
            .find(|c| c.name.eq_ignore_ascii_case(&item.category))
        {
            Some(category) => category.items.push(item),
            None => self.categories.push(MenuCategory {
                name: item.category.clone(),
                items: vec![item],
            }),
        }
    }

    pub fn categories(&self) -> &[MenuCategory] {
        &self.categories
    }

    pub fn items_in(&self, category: &str) -> &[MenuItem] {
        self.categories
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(category))
            .map(|c| c.items.as_slice())
            .unwrap_or(&[])
    }
}

impl MenuCatalog for Menu {
    fn find_item(&self, category: &str, index: usize) -> Option<MenuItem> {
        if index == 0 {
            return None;
        }
        self.items_in(category).get(index - 1).cloned()
    }

    fn find_by_id(&self, id: u32) -> Option<MenuItem> {
        self.categories
            .iter()
            .flat_map(|c| c.items.iter())
            .find(|item| item.id == id)
            .cloned()
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryCustomerDirectory {
    customers: HashMap<String, CustomerInfo>,
}

impl InMemoryCustomerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, customer: CustomerInfo) {
        self.customers.insert(customer.name.to_lowercase(), customer);
    }
}

impl CustomerDirectory for InMemoryCustomerDirectory {
    fn find_customer(&self, name: &str) -> Option<CustomerInfo> {
        self.customers.get(&name.to_lowercase()).cloned()
    }
}
