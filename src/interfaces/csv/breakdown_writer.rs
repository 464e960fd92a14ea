use crate::application::allocation::Breakdown;
use crate::domain::currency::Currency;
use crate::domain::money::Amount;
use crate::domain::rate::RateState;
use crate::error::Result;
use std::io::Write;

/// Writes a `Breakdown` as CSV.
///
/// Two tables are written back to back: one row per person
/// (`person,name,base,tax_tip,share`) followed by the invoice lines
/// (`line,amount`). When the rate state converts the invoice currency, every
/// table gains a trailing `ves` column; otherwise amounts are written as-is.
pub struct BreakdownWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> BreakdownWriter<W> {
    pub fn new(sink: W) -> Self {
        let writer = csv::WriterBuilder::new().flexible(true).from_writer(sink);
        Self { writer }
    }

    pub fn write_breakdown(
        &mut self,
        breakdown: &Breakdown,
        currency: Currency,
        rate: &RateState,
    ) -> Result<()> {
        let convert = |amount: Amount| rate.convert(amount, currency);
        let with_ves = convert(Amount::ZERO).is_some();

        let mut header = vec!["person", "name", "base", "tax_tip", "share"];
        if with_ves {
            header.push("ves");
        }
        self.writer.write_record(&header)?;

        for share in &breakdown.shares {
            let mut row = vec![
                share.person_id.to_string(),
                share.name.clone(),
                share.base.to_string(),
                share.tax_and_tip.to_string(),
                share.share.to_string(),
            ];
            if let Some(ves) = convert(share.share) {
                row.push(ves.to_string());
            }
            self.writer.write_record(&row)?;
        }

        let mut header = vec!["line", "amount"];
        if with_ves {
            header.push("ves");
        }
        self.writer.write_record(&header)?;

        let lines = [
            ("subtotal", breakdown.subtotal),
            ("tax", breakdown.tax),
            ("tip", breakdown.tip),
            ("total", breakdown.total),
            ("unassigned", breakdown.unassigned),
            ("unallocated", breakdown.unallocated),
        ];
        for (label, amount) in lines {
            let mut row = vec![label.to_string(), amount.to_string()];
            if let Some(ves) = convert(amount) {
                row.push(ves.to_string());
            }
            self.writer.write_record(&row)?;
        }

        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::allocation::compute_breakdown;
    use crate::domain::money::Price;
    use crate::domain::person::Person;
    use crate::domain::product::Product;
    use crate::domain::rate::ExchangeRate;
    use crate::domain::terms::TaxTipTerm;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn breakdown() -> Breakdown {
        let products = vec![
            Product::new("p1", "Pizza", Price::new(dec!(30)).unwrap()).with_payers(["a", "b"]),
            Product::new("p2", "Pasta", Price::new(dec!(20)).unwrap()).with_payers(["a"]),
        ];
        compute_breakdown(
            &[Person::new("a", "Ana"), Person::new("b", "Bo")],
            &products,
            &TaxTipTerm::percentage(dec!(10)).unwrap(),
            &TaxTipTerm::NONE,
        )
        .unwrap()
    }

    fn render(currency: Currency, rate: &RateState) -> String {
        let mut out = Vec::new();
        BreakdownWriter::new(&mut out)
            .write_breakdown(&breakdown(), currency, rate)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_writes_plain_amounts_without_rate() {
        let out = render(Currency::Usd, &RateState::Unavailable("down".to_string()));

        assert!(out.starts_with("person,name,base,tax_tip,share\n"));
        assert!(out.contains("a,Ana,35.00,3.50,38.50\n"));
        assert!(out.contains("b,Bo,15.00,1.50,16.50\n"));
        assert!(out.contains("line,amount\n"));
        assert!(out.contains("total,55.00\n"));
        assert!(out.contains("unallocated,0.00\n"));
        assert!(!out.contains("ves"));
    }

    #[test]
    fn test_writes_ves_column_with_rate() {
        let rate = RateState::Available(ExchangeRate {
            usd: dec!(10),
            eur: dec!(11),
            as_of: Utc::now(),
        });
        let out = render(Currency::Usd, &rate);

        assert!(out.starts_with("person,name,base,tax_tip,share,ves\n"));
        assert!(out.contains("a,Ana,35.00,3.50,38.50,385.00\n"));
        assert!(out.contains("total,55.00,550.00\n"));
    }

    #[test]
    fn test_no_ves_column_for_uncovered_currency() {
        let rate = RateState::Available(ExchangeRate {
            usd: dec!(10),
            eur: dec!(11),
            as_of: Utc::now(),
        });
        let out = render(Currency::Cny, &rate);
        assert!(!out.contains("ves"));
    }
}
