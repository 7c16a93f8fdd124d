use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Countries the catalog sells into. Each one carries exactly one VAT rate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Country {
    Sweden,
    Germany,
    France,
}

/// VAT percent per supported country
const VAT_TABLE: [(Country, f64); 3] = [
    (Country::Sweden, 25.0),
    (Country::Germany, 19.0),
    (Country::France, 20.0),
];

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum VatError {
    #[error("Unsupported country: {0}")]
    UnsupportedCountry(String),
}

impl Country {
    pub const ALL: [Country; 3] = [Country::Sweden, Country::Germany, Country::France];

    /// Canonical name, as stored in the `products.country` column.
    pub fn name(&self) -> &'static str {
        match self {
            Country::Sweden => "Sweden",
            Country::Germany => "Germany",
            Country::France => "France",
        }
    }

    pub fn vat_percent(&self) -> f64 {
        VAT_TABLE
            .iter()
            .find(|(country, _)| country == self)
            .map(|(_, vat)| *vat)
            .unwrap_or_default()
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Country {
    type Err = VatError;

    /// Case-insensitive exact match, surrounding whitespace is not accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Country::ALL
            .into_iter()
            .find(|country| country.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| VatError::UnsupportedCountry(s.to_string()))
    }
}

/// Look up the VAT percent for a country name.
pub fn vat_for(country: &str) -> Result<f64, VatError> {
    country.parse::<Country>().map(|c| c.vat_percent())
}
