use crate::domain::catalog::MenuItem;

use super::aggregate::Order;
use super::errors::ValidationError;
use super::value_objects::{CustomerInfo, OrderItem};

/// Collects order contents and validates them in `build`
#[derive(Debug, Clone)]
pub struct OrderBuilder {
    customer: CustomerInfo,
    items: Vec<OrderItem>,
    delivery_address: Option<String>,
    special_instructions: Option<String>,
}

impl OrderBuilder {
    pub fn new(customer_name: impl Into<String>, customer_phone: impl Into<String>) -> Self {
        Self::for_customer(CustomerInfo::new(customer_name, customer_phone))
    }

    /// Start from a record returned by a `CustomerDirectory`
    pub fn for_customer(customer: CustomerInfo) -> Self {
        Self {
            customer,
            items: Vec::new(),
            delivery_address: None,
            special_instructions: None,
        }
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.customer.email = Some(email.into());
        self
    }

    pub fn delivery_address(mut self, address: impl Into<String>) -> Self {
        self.delivery_address = Some(address.into());
        self
    }

    pub fn special_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.special_instructions = Some(instructions.into());
        self
    }

    pub fn add_item(self, item: MenuItem, quantity: u32) -> Self {
        self.add_customized_item(item, quantity, Vec::<String>::new())
    }

    pub fn add_customized_item<S: Into<String>>(
        mut self,
        item: MenuItem,
        quantity: u32,
        customizations: impl IntoIterator<Item = S>,
    ) -> Self {
        let customizations = customizations.into_iter().map(Into::into).collect();
        self.items.push(OrderItem::new(item, quantity, customizations));
        self
    }

    pub fn build(self) -> Result<Order, ValidationError> {
        validate_contents(&self.customer, &self.items)?;

        Ok(Order::from_validated(
            self.customer,
            self.items,
            self.delivery_address,
            self.special_instructions,
        ))
    }
}

/// Rules every order satisfies, however it was constructed
pub(super) fn validate_contents(
    customer: &CustomerInfo,
    items: &[OrderItem],
) -> Result<(), ValidationError> {
    if items.is_empty() {
        return Err(ValidationError::EmptyItems);
    }

    if customer.name.trim().is_empty() {
        return Err(ValidationError::BlankCustomerName);
    }

    if let Some(item) = items.iter().find(|item| item.quantity == 0) {
        return Err(ValidationError::InvalidQuantity {
            item: item.menu_item.name.clone(),
            quantity: item.quantity,
        });
    }

    Ok(())
}
