use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{NexusError, Result};

/// Monthly cost assumptions from pricing.toml. All values in USD; lookups
/// are case-insensitive and a miss prices at `fallback_usd`.
#[derive(Debug, Clone, Deserialize)]
pub struct PriceTable {
    pub fallback_usd: f64,
    tool: BTreeMap<String, f64>,
    provider: BTreeMap<String, f64>,
}

impl PriceTable {
    pub fn tool_usd(&self, tool: &str) -> f64 {
        lookup(&self.tool, tool).unwrap_or(self.fallback_usd)
    }

    pub fn provider_usd(&self, provider: &str) -> f64 {
        lookup(&self.provider, provider).unwrap_or(self.fallback_usd)
    }

    pub fn tool_count(&self) -> usize {
        self.tool.len()
    }
}

fn lookup(map: &BTreeMap<String, f64>, key: &str) -> Option<f64> {
    map.iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| *v)
}

/// Parse a price table from TOML. Costs must be non-negative.
pub fn parse_pricing(toml_str: &str) -> Result<PriceTable> {
    let table: PriceTable =
        toml::from_str(toml_str).map_err(|e| NexusError::Pricing(e.to_string()))?;

    if table.fallback_usd < 0.0 {
        return Err(NexusError::Pricing("fallback_usd is negative".into()));
    }
    for (key, usd) in table.tool.iter().chain(table.provider.iter()) {
        if *usd < 0.0 {
            return Err(NexusError::Pricing(format!("{key}: cost is negative")));
        }
    }
    Ok(table)
}

/// Load the bundled pricing.toml from the data/ directory.
pub fn load_bundled_pricing() -> Result<PriceTable> {
    parse_pricing(include_str!("../../../data/pricing.toml"))
}
