use std::collections::HashMap;

use super::aggregate::Order;
use super::value_objects::OrderId;

/// Live orders keyed by id. One registry per restaurant; never global.
#[derive(Debug, Default)]
pub struct OrderRegistry {
    orders: HashMap<OrderId, Order>,
}

impl OrderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the order previously stored under the same id, if any
    pub fn insert(&mut self, order: Order) -> Option<Order> {
        self.orders.insert(order.id(), order)
    }

    /// Idempotent: removing an absent id is a no-op
    pub fn remove(&mut self, id: &OrderId) -> Option<Order> {
        self.orders.remove(id)
    }

    pub fn get(&self, id: &OrderId) -> Option<&Order> {
        self.orders.get(id)
    }

    pub fn get_mut(&mut self, id: &OrderId) -> Option<&mut Order> {
        self.orders.get_mut(id)
    }

    pub fn contains(&self, id: &OrderId) -> bool {
        self.orders.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn orders(&self) -> impl Iterator<Item = &Order> {
        self.orders.values()
    }
}
