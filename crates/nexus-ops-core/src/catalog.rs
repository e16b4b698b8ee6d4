use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{NexusError, Result};

/// A cloud platform entry from catalog.toml.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudProvider {
    pub name: String,
    /// Selectable regions, first entry is the default.
    pub regions: Vec<String>,
}

/// A stack pillar: one infrastructure concern with selectable tooling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pillar {
    pub id: String,
    pub name: String,
    /// Tool options, first entry is the default. Canonical casing lives here.
    pub tools: Vec<String>,
}

impl Pillar {
    /// Resolve a tool argument case-insensitively to its canonical spelling.
    pub fn resolve_tool(&self, tool: &str) -> Option<&str> {
        self.tools
            .iter()
            .find(|t| t.eq_ignore_ascii_case(tool))
            .map(String::as_str)
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    cloud: BTreeMap<String, CloudProvider>,
    pillar: Vec<Pillar>,
}

/// The compiled-in console configuration: cloud providers keyed by their
/// short id, plus the ordered pillar list.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub cloud: Vec<(String, CloudProvider)>,
    pub pillars: Vec<Pillar>,
}

impl Catalog {
    pub fn provider(&self, key: &str) -> Option<&CloudProvider> {
        self.cloud
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, p)| p)
    }

    /// Canonical key for a provider id given in any casing.
    pub fn provider_key(&self, key: &str) -> Option<&str> {
        self.cloud
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(k, _)| k.as_str())
    }

    pub fn pillar(&self, id: &str) -> Option<&Pillar> {
        self.pillars.iter().find(|p| p.id.eq_ignore_ascii_case(id))
    }
}

/// Parse a catalog from TOML, validating the invariants the console relies
/// on: at least one provider and pillar, non-empty region and tool lists,
/// unique pillar ids.
pub fn parse_catalog(toml_str: &str) -> Result<Catalog> {
    let cf: CatalogFile =
        toml::from_str(toml_str).map_err(|e| NexusError::Catalog(e.to_string()))?;

    if cf.cloud.is_empty() {
        return Err(NexusError::Catalog("no cloud providers".into()));
    }
    if cf.pillar.is_empty() {
        return Err(NexusError::Catalog("no pillars".into()));
    }
    for (key, prov) in &cf.cloud {
        if prov.regions.is_empty() {
            return Err(NexusError::Catalog(format!("{key}: region list is empty")));
        }
    }
    let mut seen: Vec<&str> = Vec::new();
    for p in &cf.pillar {
        if p.tools.is_empty() {
            return Err(NexusError::Catalog(format!("{}: tool list is empty", p.id)));
        }
        if seen.contains(&p.id.as_str()) {
            return Err(NexusError::Catalog(format!("{}: duplicate pillar id", p.id)));
        }
        seen.push(&p.id);
    }

    tracing::debug!(
        providers = cf.cloud.len(),
        pillars = cf.pillar.len(),
        "catalog loaded"
    );
    Ok(Catalog {
        cloud: cf.cloud.into_iter().collect(),
        pillars: cf.pillar,
    })
}

/// Load the bundled catalog.toml from the data/ directory.
pub fn load_bundled_catalog() -> Result<Catalog> {
    parse_catalog(include_str!("../../../data/catalog.toml"))
}
