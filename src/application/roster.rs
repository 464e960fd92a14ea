//! Updates over the people and product collections.
//!
//! Every function takes the current snapshot and returns the next one, so a
//! caller either commits the whole result or keeps its previous state.

use crate::domain::person::{Person, PersonId};
use crate::domain::product::{Product, ProductId};
use crate::error::{Result, SplitError};
use std::collections::BTreeSet;

/// Removes `person` from the roster and from the payers of every product.
pub fn remove_person(
    person: &PersonId,
    people: &[Person],
    products: &[Product],
) -> Result<(Vec<Person>, Vec<Product>)> {
    if !people.iter().any(|p| &p.id == person) {
        return Err(SplitError::UnknownEntity(format!("person {person}")));
    }

    let people = people.iter().filter(|p| &p.id != person).cloned().collect();
    let products = products
        .iter()
        .cloned()
        .map(|mut product| {
            product.payers.remove(person);
            product
        })
        .collect();

    Ok((people, products))
}

pub fn remove_product(product: &ProductId, products: &[Product]) -> Result<Vec<Product>> {
    if !products.iter().any(|p| &p.id == product) {
        return Err(SplitError::UnknownEntity(format!("product {product}")));
    }
    Ok(products.iter().filter(|p| &p.id != product).cloned().collect())
}

/// Replaces the payer set of `product` wholesale.
///
/// Ids in `payers` are not checked against the roster.
pub fn set_product_payers(
    product: &ProductId,
    payers: BTreeSet<PersonId>,
    products: &[Product],
) -> Result<Vec<Product>> {
    update_product(product, products, move |p| p.payers = payers)
}

/// Adds or removes a single payer, as the per-person checkbox does.
pub fn toggle_payer(
    product: &ProductId,
    person: &PersonId,
    selected: bool,
    products: &[Product],
) -> Result<Vec<Product>> {
    update_product(product, products, |p| {
        if selected {
            p.payers.insert(person.clone());
        } else {
            p.payers.remove(person);
        }
    })
}

/// Lists every `(product, payer)` pair whose payer is not on the roster.
pub fn dangling_payers(people: &[Person], products: &[Product]) -> Vec<(ProductId, PersonId)> {
    let live: BTreeSet<&PersonId> = people.iter().map(|p| &p.id).collect();
    products
        .iter()
        .flat_map(|product| {
            product
                .payers
                .iter()
                .filter(|payer| !live.contains(payer))
                .map(|payer| (product.id.clone(), payer.clone()))
        })
        .collect()
}

fn update_product<F>(product: &ProductId, products: &[Product], f: F) -> Result<Vec<Product>>
where
    F: FnOnce(&mut Product),
{
    let index = products
        .iter()
        .position(|p| &p.id == product)
        .ok_or_else(|| SplitError::UnknownEntity(format!("product {product}")))?;

    let mut updated = products.to_vec();
    f(&mut updated[index]);
    Ok(updated)
}
