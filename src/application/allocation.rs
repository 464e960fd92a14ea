use crate::domain::money::Amount;
use crate::domain::person::{Person, PersonId};
use crate::domain::product::Product;
use crate::domain::terms::TaxTipTerm;
use crate::error::{Result, SplitError};
use rust_decimal::Decimal;
use serde::Serialize;

/// Sum of every product price, assigned or not.
pub fn compute_subtotal(products: &[Product]) -> Result<Amount> {
    Amount::checked_sum(products.iter().map(|p| Amount::from(p.price)))
}

/// Tax owed on `subtotal` under `term`.
pub fn compute_tax(subtotal: Amount, term: &TaxTipTerm) -> Result<Amount> {
    term.apply(subtotal)
}

/// Tip owed on `subtotal` under `term`.
pub fn compute_tip(subtotal: Amount, term: &TaxTipTerm) -> Result<Amount> {
    term.apply(subtotal)
}

pub fn compute_total(subtotal: Amount, tax: Amount, tip: Amount) -> Result<Amount> {
    subtotal.checked_add(tax)?.checked_add(tip)
}

/// What `person` owes before tax and tip: each product they pay for is split
/// evenly among all of its payers.
pub fn person_base(person: &PersonId, products: &[Product]) -> Result<Amount> {
    products
        .iter()
        .filter(|p| p.is_paid_by(person))
        .try_fold(Amount::ZERO, |acc, p| {
            let split = Amount::from(p.price).checked_scale(Decimal::ONE, Decimal::from(p.payers.len()))?;
            acc.checked_add(split)
        })
}

/// Tax and tip charged to someone whose base is `base`.
///
/// Tax and tip are distributed pro rata to the base's share of the subtotal.
/// A zero subtotal yields zero, even when a fixed tax or tip is configured.
pub fn tax_and_tip_share(base: Amount, subtotal: Amount, tax: Amount, tip: Amount) -> Result<Amount> {
    if subtotal.value() <= Decimal::ZERO {
        return Ok(Amount::ZERO);
    }
    let proportion = base
        .value()
        .checked_div(subtotal.value())
        .ok_or_else(|| SplitError::InvalidInput("amount out of range".to_string()))?;
    tax.checked_add(tip)?.checked_scale(proportion, Decimal::ONE)
}

/// Total amount `person` owes, tax and tip included.
pub fn person_share(
    person: &PersonId,
    products: &[Product],
    subtotal: Amount,
    tax: Amount,
    tip: Amount,
) -> Result<Amount> {
    let base = person_base(person, products)?;
    base.checked_add(tax_and_tip_share(base, subtotal, tax, tip)?)
}

/// One row of the per-person breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonShare {
    pub person_id: PersonId,
    pub name: String,
    pub base: Amount,
    pub tax_and_tip: Amount,
    pub share: Amount,
}

/// The whole invoice, priced and split.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Breakdown {
    pub subtotal: Amount,
    pub tax: Amount,
    pub tip: Amount,
    pub total: Amount,
    pub shares: Vec<PersonShare>,
    /// Cost of products nobody is assigned to.
    pub unassigned: Amount,
    /// `total` minus the sum of every share. Non-zero when products are
    /// unassigned, or when a fixed tax/tip meets a zero subtotal.
    pub unallocated: Amount,
}

impl Breakdown {
    /// Whether a remainder is left once rounded to cents.
    pub fn has_unallocated(&self) -> bool {
        !self.unallocated.to_cents().is_zero()
    }
}

/// Prices the invoice and computes one share per person, in roster order.
///
/// Fails with `InvalidInput` when an amount leaves the representable range.
pub fn compute_breakdown(
    people: &[Person],
    products: &[Product],
    tax_term: &TaxTipTerm,
    tip_term: &TaxTipTerm,
) -> Result<Breakdown> {
    let subtotal = compute_subtotal(products)?;
    let tax = compute_tax(subtotal, tax_term)?;
    let tip = compute_tip(subtotal, tip_term)?;
    let total = compute_total(subtotal, tax, tip)?;

    let shares = people
        .iter()
        .map(|person| {
            let base = person_base(&person.id, products)?;
            let tax_and_tip = tax_and_tip_share(base, subtotal, tax, tip)?;
            Ok(PersonShare {
                person_id: person.id.clone(),
                name: person.name.clone(),
                base,
                tax_and_tip,
                share: base.checked_add(tax_and_tip)?,
            })
        })
        .collect::<Result<Vec<PersonShare>>>()?;

    let unassigned = Amount::checked_sum(
        products
            .iter()
            .filter(|p| p.is_unassigned())
            .map(|p| Amount::from(p.price)),
    )?;
    let allocated = Amount::checked_sum(shares.iter().map(|s| s.share))?;

    Ok(Breakdown {
        subtotal,
        tax,
        tip,
        total,
        shares,
        unassigned,
        unallocated: total.checked_sub(allocated)?,
    })
}
