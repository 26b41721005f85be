//! Progressive slab tax.
//!
//! This module applies an organization's ordered tax slabs to annualized
//! income. Every slab the income reaches contributes the tax on its own band;
//! surcharge is a percentage of the band's tax and cess a percentage of the
//! band's tax plus surcharge.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{AuditStep, AuditWarning, TaxRegime, TaxSlab};

use super::round_money;

/// Months used to annualize monthly earnings.
pub const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// The tax contributed by one slab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlabTax {
    /// Lower bound of the band.
    pub min_income: Decimal,
    /// Upper bound of the band, `None` when open-ended.
    pub max_income: Option<Decimal>,
    /// Income taxed inside the band.
    pub taxable: Decimal,
    /// `taxable * tax_rate / 100`.
    pub slab_tax: Decimal,
    /// `slab_tax * surcharge / 100`.
    pub surcharge: Decimal,
    /// `(slab_tax + surcharge) * cess / 100`.
    pub cess: Decimal,
}

impl SlabTax {
    /// Total contributed by the slab.
    pub fn total(&self) -> Decimal {
        self.slab_tax + self.surcharge + self.cess
    }
}

/// The result of the tax computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxComputation {
    /// The regime the slabs were drawn from.
    pub regime: TaxRegime,
    /// Annualized gross earnings.
    pub annual_income: Decimal,
    /// Unrounded annual tax across all slabs.
    pub annual_tax: Decimal,
    /// `round(annual_tax / 12, 2)`.
    pub monthly_tax: Decimal,
    /// Per-slab contributions, ascending.
    pub slabs: Vec<SlabTax>,
    /// Set when no slabs were configured.
    pub warning: Option<AuditWarning>,
    /// The audit step recording this computation.
    pub audit_step: AuditStep,
}

/// Annualizes a month's gross earnings.
pub fn annualize(monthly_earnings: Decimal) -> Decimal {
    monthly_earnings * MONTHS_PER_YEAR
}

/// Computes the monthly tax liability for an annualized income.
///
/// Slabs are applied in ascending `min_income` order regardless of input
/// order. A slab contributes when `annual_income > min_income`; its taxable
/// band is `min(annual_income, max_income) - min_income`. With no slabs the
/// tax is zero and a warning is attached.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_monthly_tax;
/// use payroll_engine::models::{TaxRegime, TaxSlab};
/// use rust_decimal::Decimal;
///
/// let slabs = vec![TaxSlab {
///     organization_id: 1,
///     regime: TaxRegime::New,
///     min_income: Decimal::ZERO,
///     max_income: None,
///     tax_rate: Decimal::from(10),
///     surcharge: None,
///     cess: None,
/// }];
///
/// // 10% of 120,000 spread over 12 months
/// let result = calculate_monthly_tax(Decimal::from(120000), &slabs, TaxRegime::New, 1);
/// assert_eq!(result.monthly_tax, Decimal::from(1000));
/// ```
pub fn calculate_monthly_tax(
    annual_income: Decimal,
    slabs: &[TaxSlab],
    regime: TaxRegime,
    step_number: u32,
) -> TaxComputation {
    let mut ordered: Vec<&TaxSlab> = slabs.iter().collect();
    ordered.sort_by(|a, b| a.min_income.cmp(&b.min_income));

    let hundred = Decimal::ONE_HUNDRED;
    let mut contributions = Vec::new();

    for slab in ordered {
        if annual_income <= slab.min_income {
            continue;
        }
        let upper = slab.max_income.unwrap_or(annual_income);
        let taxable = annual_income.min(upper) - slab.min_income;
        let slab_tax = taxable * slab.tax_rate / hundred;
        let surcharge = slab_tax * slab.surcharge.unwrap_or_default() / hundred;
        let cess = (slab_tax + surcharge) * slab.cess.unwrap_or_default() / hundred;

        contributions.push(SlabTax {
            min_income: slab.min_income,
            max_income: slab.max_income,
            taxable,
            slab_tax,
            surcharge,
            cess,
        });
    }

    let annual_tax: Decimal = contributions.iter().map(SlabTax::total).sum();
    let monthly_tax = round_money(annual_tax / MONTHS_PER_YEAR);

    let warning = if slabs.is_empty() {
        Some(AuditWarning::new(
            "NO_TAX_SLABS",
            format!("No tax slabs configured for regime '{}'; tax is zero", regime),
            "medium",
        ))
    } else {
        None
    };

    let reasoning = if slabs.is_empty() {
        format!("No slabs configured for regime '{}', tax is zero", regime)
    } else {
        format!(
            "Annual income {} reaches {} of {} slabs: annual tax {}, monthly {}",
            annual_income.normalize(),
            contributions.len(),
            slabs.len(),
            annual_tax.normalize(),
            monthly_tax
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "progressive_tax".to_string(),
        rule_name: "Progressive Slab Tax".to_string(),
        input: serde_json::json!({
            "annual_income": annual_income.normalize().to_string(),
            "regime": regime,
            "slabs": slabs.len()
        }),
        output: serde_json::json!({
            "annual_tax": annual_tax.normalize().to_string(),
            "monthly_tax": monthly_tax.to_string(),
            "contributing_slabs": contributions.len()
        }),
        reasoning,
    };

    TaxComputation {
        regime,
        annual_income,
        annual_tax,
        monthly_tax,
        slabs: contributions,
        warning,
        audit_step,
    }
}


#[cfg(test)]
mod proptests {
    use proptest::prelude::*;

    use super::*;

    fn slabs() -> Vec<TaxSlab> {
        let slab = |min: i64, max: Option<i64>, rate: i64, surcharge: i64, cess: i64| TaxSlab {
            organization_id: 1,
            regime: TaxRegime::New,
            min_income: Decimal::from(min),
            max_income: max.map(Decimal::from),
            tax_rate: Decimal::from(rate),
            surcharge: Some(Decimal::from(surcharge)),
            cess: Some(Decimal::from(cess)),
        };
        vec![
            slab(0, Some(250_000), 0, 0, 0),
            slab(250_000, Some(500_000), 5, 0, 4),
            slab(500_000, Some(1_000_000), 20, 10, 4),
            slab(1_000_000, None, 30, 15, 4),
        ]
    }

    proptest! {
        #[test]
        fn tax_is_monotonic_in_income(a in 0i64..5_000_000, b in 0i64..5_000_000) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            let slabs = slabs();

            let low_tax = calculate_monthly_tax(Decimal::from(low), &slabs, TaxRegime::New, 1);
            let high_tax = calculate_monthly_tax(Decimal::from(high), &slabs, TaxRegime::New, 1);

            prop_assert!(low_tax.annual_tax <= high_tax.annual_tax);
            prop_assert!(low_tax.monthly_tax <= high_tax.monthly_tax);
        }

        #[test]
        fn tax_never_exceeds_income(income in 0i64..5_000_000) {
            let result = calculate_monthly_tax(Decimal::from(income), &slabs(), TaxRegime::New, 1);

            prop_assert!(result.annual_tax >= Decimal::ZERO);
            prop_assert!(result.annual_tax <= Decimal::from(income));
        }
    }
}
