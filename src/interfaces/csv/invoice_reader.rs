use crate::domain::money::Price;
use crate::domain::person::{Person, PersonId};
use crate::domain::product::Product;
use crate::error::{Result, SplitError};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
enum RecordType {
    Person,
    Product,
}

/// One raw CSV row: `type, id, name, price, payers`.
///
/// `price` and `payers` only apply to products; `payers` is a `;`-separated
/// list of person ids and may be empty.
#[derive(Debug, Deserialize)]
struct InvoiceRecord {
    r#type: RecordType,
    id: String,
    name: String,
    #[serde(default)]
    price: Option<String>,
    #[serde(default)]
    payers: Option<String>,
}

/// A validated row.
#[derive(Debug, Clone, PartialEq)]
pub enum InvoiceEntry {
    Person(Person),
    Product(Product),
}

impl InvoiceRecord {
    fn into_entry(self) -> Result<InvoiceEntry> {
        let id = self.id.trim();
        let name = self.name.trim();
        if id.is_empty() {
            return Err(SplitError::InvalidInput("row without id".to_string()));
        }
        if name.is_empty() {
            return Err(SplitError::InvalidInput(format!("{id}: name must not be blank")));
        }

        match self.r#type {
            RecordType::Person => Ok(InvoiceEntry::Person(Person::new(id, name))),
            RecordType::Product => {
                let price: Price = self.price.as_deref().unwrap_or_default().parse()?;
                let payers: BTreeSet<PersonId> = self
                    .payers
                    .as_deref()
                    .unwrap_or_default()
                    .split(';')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(PersonId::from)
                    .collect();
                let mut product = Product::new(id, name, price);
                product.payers = payers;
                Ok(InvoiceEntry::Product(product))
            }
        }
    }
}

/// Reads people and products from a CSV source.
///
/// Wraps `csv::Reader` and yields one `Result<InvoiceEntry>` per row, so a bad
/// row can be reported and skipped without losing the rest of the file.
pub struct InvoiceReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> InvoiceReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    pub fn entries(self) -> impl Iterator<Item = Result<InvoiceEntry>> {
        self.reader.into_deserialize::<InvoiceRecord>().map(|result| {
            result
                .map_err(SplitError::from)
                .and_then(InvoiceRecord::into_entry)
        })
    }
}
