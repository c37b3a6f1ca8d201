use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Embedded catalog of all configured sources (gas and energy).
pub static CATALOG_OBJECT: &str = include_str!("../fixtures/sources.json");

/// Sampling granularity of a series.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Monthly,
    Yearly,
}

/// Field separator for delimited text feeds.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Delimiter {
    Comma,
    Whitespace,
}

/// How to parse one source's raw payload into (date, value) pairs.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceSchema {
    /// Tabular text with `#` comment lines and named positional columns.
    /// The date is built from the `year` and `month` columns with the
    /// day fixed to mid-month.
    Delimited {
        delimiter: Delimiter,
        columns: Vec<String>,
        value_column: String,
    },
    /// World Bank API v2 payload: a two-element JSON array whose second
    /// element is a list of rows with a year-valued `date` and a
    /// nullable `value`.
    WorldBankJson,
}

/// Parameters for the deterministic synthetic substitute series used
/// when a source cannot be fetched.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct FallbackSpec {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_value: f64,
    pub end_value: f64,
    /// Amplitude of the bounded uniform noise added on top of the
    /// linear ramp between start_value and end_value.
    pub noise: f64,
}

/// Static descriptor of one external series: where it lives, how to
/// parse it, and how to fake it when it is unreachable.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct SourceSpec {
    /// Stable identity, used as the cache key and the synthetic RNG seed.
    pub key: String,
    pub url: String,
    /// Canonical group label attached to every point of this series.
    pub group: String,
    pub granularity: Granularity,
    pub schema: SourceSchema,
    pub fallback: FallbackSpec,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct SourceCatalog {
    pub gas: Vec<SourceSpec>,
    pub energy: Vec<SourceSpec>,
}

impl SourceCatalog {
    /// Parse a catalog from a JSON string.
    pub fn parse(json: &str) -> Result<SourceCatalog, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The built-in catalog from the embedded fixture.
    pub fn builtin() -> SourceCatalog {
        if let Ok(c) = SourceCatalog::parse(CATALOG_OBJECT) {
            c
        } else {
            panic!("failed to parse embedded source catalog")
        }
    }
}

/// Gas source specs (CO₂, O₂, CH₄, N₂O) from the built-in catalog.
pub fn gas_sources() -> Vec<SourceSpec> {
    SourceCatalog::builtin().gas
}

/// Energy source specs (World, Korea) from the built-in catalog.
pub fn energy_sources() -> Vec<SourceSpec> {
    SourceCatalog::builtin().energy
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let catalog = SourceCatalog::builtin();
        assert_eq!(catalog.gas.len(), 4);
        assert_eq!(catalog.energy.len(), 2);
    }

    #[test]
    fn test_gas_sources_shape() {
        for spec in gas_sources() {
            assert_eq!(spec.granularity, Granularity::Monthly);
            match &spec.schema {
                SourceSchema::Delimited {
                    columns,
                    value_column,
                    ..
                } => {
                    assert!(columns.contains(&"year".to_string()));
                    assert!(columns.contains(&"month".to_string()));
                    assert!(columns.contains(value_column));
                }
                other => panic!("unexpected gas schema: {other:?}"),
            }
        }
    }

    #[test]
    fn test_energy_sources_shape() {
        for spec in energy_sources() {
            assert_eq!(spec.granularity, Granularity::Yearly);
            assert_eq!(spec.schema, SourceSchema::WorldBankJson);
        }
    }
}
