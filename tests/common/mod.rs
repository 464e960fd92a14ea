#![allow(dead_code)]

use rand::Rng;
use rand::rngs::StdRng;
use rust_decimal::Decimal;
use std::fs::File;
use std::io::Error;
use std::path::Path;
use tabsplit::domain::money::Price;
use tabsplit::domain::person::Person;
use tabsplit::domain::product::Product;

/// A roster of `count` people with ids `p0..`.
pub fn people(count: usize) -> Vec<Person> {
    (0..count)
        .map(|i| Person::new(format!("p{i}"), format!("Person {i}")))
        .collect()
}

/// Random products, each with a random subset of `people` as payers.
///
/// With `allow_unassigned` false every product gets at least one payer.
pub fn random_products(
    rng: &mut StdRng,
    people: &[Person],
    count: usize,
    allow_unassigned: bool,
) -> Vec<Product> {
    (0..count)
        .map(|i| {
            let price = Price::new(Decimal::new(rng.gen_range(0..50_000), 2)).unwrap();
            let mut payers: Vec<_> = people
                .iter()
                .filter(|_| rng.gen_bool(0.4))
                .map(|p| p.id.clone())
                .collect();
            if payers.is_empty() && !allow_unassigned {
                payers.push(people[rng.gen_range(0..people.len())].id.clone());
            }
            Product::new(format!("item{i}"), format!("Item {i}"), price).with_payers(payers)
        })
        .collect()
}

/// Writes people and products as an invoice CSV.
pub fn write_invoice_csv(path: &Path, people: &[Person], products: &[Product]) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(file);

    wtr.write_record(["type", "id", "name", "price", "payers"])?;
    for person in people {
        wtr.write_record(["person", person.id.as_str(), &person.name, "", ""])?;
    }
    for product in products {
        let payers: Vec<&str> = product.payers.iter().map(|p| p.as_str()).collect();
        wtr.write_record([
            "product",
            product.id.as_str(),
            &product.name,
            &product.price.value().to_string(),
            &payers.join(";"),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
