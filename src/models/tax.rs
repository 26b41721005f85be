//! Tax slab models.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The tax regime an organization's slabs belong to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxRegime {
    /// The default regime.
    #[default]
    New,
    /// The legacy regime.
    Old,
}

impl fmt::Display for TaxRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaxRegime::New => f.write_str("new"),
            TaxRegime::Old => f.write_str("old"),
        }
    }
}

/// One progressive income band with its rate, surcharge and cess.
///
/// Slabs for a single (organization, regime) partition annual income into
/// ascending, non-overlapping ranges. `max_income` of `None` is open-ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSlab {
    /// The organization the slab belongs to.
    pub organization_id: u64,
    /// The regime the slab belongs to.
    #[serde(default)]
    pub regime: TaxRegime,
    /// Lower bound of the band (annual income).
    pub min_income: Decimal,
    /// Upper bound of the band, or `None` for the top band.
    #[serde(default)]
    pub max_income: Option<Decimal>,
    /// Rate in percent applied to income inside the band.
    pub tax_rate: Decimal,
    /// Surcharge in percent of the band's tax.
    #[serde(default)]
    pub surcharge: Option<Decimal>,
    /// Cess in percent of the band's tax plus surcharge.
    #[serde(default)]
    pub cess: Option<Decimal>,
}
