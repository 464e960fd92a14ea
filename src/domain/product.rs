use super::money::Price;
use super::person::PersonId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A line item on the invoice.
///
/// `price` is the cost of the whole item, shared evenly among `payers`.
/// An empty payer set means nobody is currently assigned to the item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub payers: BTreeSet<PersonId>,
}

impl Product {
    /// Creates an unassigned product.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Price) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            payers: BTreeSet::new(),
        }
    }

    pub fn with_payers<I, P>(mut self, payers: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PersonId>,
    {
        self.payers = payers.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_unassigned(&self) -> bool {
        self.payers.is_empty()
    }

    pub fn is_paid_by(&self, person: &PersonId) -> bool {
        self.payers.contains(person)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_product_is_unassigned() {
        let product = Product::new("p1", "Pizza", Price::new(dec!(12)).unwrap());
        assert!(product.is_unassigned());
    }

    #[test]
    fn test_payers_are_a_set() {
        let product =
            Product::new("p1", "Pizza", Price::new(dec!(12)).unwrap()).with_payers(["a", "b", "a"]);
        assert_eq!(product.payers.len(), 2);
        assert!(product.is_paid_by(&PersonId::from("a")));
        assert!(!product.is_paid_by(&PersonId::from("c")));
    }
}
