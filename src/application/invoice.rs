use crate::application::allocation::{self, Breakdown};
use crate::application::roster;
use crate::domain::currency::Currency;
use crate::domain::money::{Amount, Price};
use crate::domain::person::{Person, PersonId};
use crate::domain::product::{Product, ProductId};
use crate::domain::terms::TaxTipTerm;
use crate::error::{Result, SplitError};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// The caller-side state of one invoice: roster, products and tax/tip terms.
///
/// Each mutating method validates its input and builds the next state before
/// committing it, so a failed call leaves the invoice exactly as it was.
/// Totals are never stored; they are recomputed from the current state.
#[derive(Debug, Clone, Default)]
pub struct Invoice {
    people: Vec<Person>,
    products: Vec<Product>,
    tax: TaxTipTerm,
    tip: TaxTipTerm,
    currency: Currency,
}

impl Invoice {
    /// Creates an empty invoice in the given currency.
    pub fn new(currency: Currency) -> Self {
        Self {
            currency,
            ..Self::default()
        }
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn tax(&self) -> TaxTipTerm {
        self.tax
    }

    pub fn tip(&self) -> TaxTipTerm {
        self.tip
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn person(&self, id: &PersonId) -> Option<&Person> {
        self.people.iter().find(|p| &p.id == id)
    }

    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Adds a person with a fresh id and returns that id.
    pub fn add_person(&mut self, name: &str) -> Result<PersonId> {
        let name = non_blank(name, "person name")?;
        let id = PersonId::generate();
        self.insert_person(Person::new(id.clone(), name))?;
        Ok(id)
    }

    /// Adds a person whose id was assigned elsewhere (e.g. read from a file).
    pub fn insert_person(&mut self, person: Person) -> Result<()> {
        if self.person(&person.id).is_some() {
            return Err(SplitError::InvalidInput(format!(
                "person {} already exists",
                person.id
            )));
        }
        info!(person = %person.id, name = %person.name, "person added");
        self.people.push(person);
        Ok(())
    }

    /// Removes a person and strips them from every product's payers.
    pub fn remove_person(&mut self, id: &PersonId) -> Result<()> {
        let (people, products) = roster::remove_person(id, &self.people, &self.products)?;
        self.people = people;
        self.products = products;
        info!(person = %id, "person removed");
        Ok(())
    }

    /// Adds an unassigned product with a fresh id and returns that id.
    pub fn add_product(&mut self, name: &str, price: &str) -> Result<ProductId> {
        let name = non_blank(name, "product name")?;
        let price: Price = price.parse()?;
        let id = ProductId::generate();
        self.insert_product(Product::new(id.clone(), name, price))?;
        Ok(id)
    }

    /// Adds a fully built product. Its payers are kept as given.
    pub fn insert_product(&mut self, product: Product) -> Result<()> {
        if self.product(&product.id).is_some() {
            return Err(SplitError::InvalidInput(format!(
                "product {} already exists",
                product.id
            )));
        }
        info!(product = %product.id, name = %product.name, price = %product.price.value(), "product added");
        self.products.push(product);
        Ok(())
    }

    pub fn remove_product(&mut self, id: &ProductId) -> Result<()> {
        self.products = roster::remove_product(id, &self.products)?;
        info!(product = %id, "product removed");
        Ok(())
    }

    pub fn set_product_payers(&mut self, id: &ProductId, payers: BTreeSet<PersonId>) -> Result<()> {
        self.products = roster::set_product_payers(id, payers, &self.products)?;
        debug!(product = %id, "payers replaced");
        Ok(())
    }

    /// Selects or deselects `person` as a payer of `product`.
    pub fn toggle_payer(&mut self, product: &ProductId, person: &PersonId, selected: bool) -> Result<()> {
        self.products = roster::toggle_payer(product, person, selected, &self.products)?;
        debug!(product = %product, person = %person, selected, "payer toggled");
        Ok(())
    }

    pub fn set_tax(&mut self, term: TaxTipTerm) {
        self.tax = term;
    }

    pub fn set_tip(&mut self, term: TaxTipTerm) {
        self.tip = term;
    }

    pub fn set_currency(&mut self, currency: Currency) {
        self.currency = currency;
    }

    /// Clears people, products and tax/tip. The currency is kept.
    pub fn reset(&mut self) {
        *self = Self::new(self.currency);
        info!("invoice reset");
    }

    pub fn subtotal(&self) -> Result<Amount> {
        allocation::compute_subtotal(&self.products)
    }

    pub fn tax_amount(&self) -> Result<Amount> {
        allocation::compute_tax(self.subtotal()?, &self.tax)
    }

    pub fn tip_amount(&self) -> Result<Amount> {
        allocation::compute_tip(self.subtotal()?, &self.tip)
    }

    pub fn total(&self) -> Result<Amount> {
        allocation::compute_total(self.subtotal()?, self.tax_amount()?, self.tip_amount()?)
    }

    /// What `person` owes. Fails for ids that are not on the roster.
    pub fn person_share(&self, person: &PersonId) -> Result<Amount> {
        if self.person(person).is_none() {
            return Err(SplitError::UnknownEntity(format!("person {person}")));
        }
        let subtotal = self.subtotal()?;
        allocation::person_share(
            person,
            &self.products,
            subtotal,
            allocation::compute_tax(subtotal, &self.tax)?,
            allocation::compute_tip(subtotal, &self.tip)?,
        )
    }

    pub fn breakdown(&self) -> Result<Breakdown> {
        allocation::compute_breakdown(&self.people, &self.products, &self.tax, &self.tip)
    }
}

fn non_blank<'a>(text: &'a str, what: &str) -> Result<&'a str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Err(SplitError::InvalidInput(format!("{what} must not be blank")))
    } else {
        Ok(trimmed)
    }
}
