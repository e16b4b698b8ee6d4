use serde::Serialize;

use crate::catalog::Catalog;
use crate::command::OutputLine;
use crate::deploy::DeployRun;
use crate::history::ShellHistory;
use crate::pricing::PriceTable;

/// One pillar's current tool selection. `tool` always holds the canonical
/// catalog spelling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PillarSelection {
    pub pillar_id: String,
    pub tool: String,
}

/// How long the lockdown alarm stays raised: three seconds at the
/// console's 250ms tick.
pub const ALARM_TICKS: u8 = 12;

/// The whole console in one value: selections, active cloud target,
/// transcript, recall history, any running deploy, and the alarm countdown.
///
/// All transitions go through `command::dispatch`, which takes a state and
/// returns its successor; nothing else writes here.
#[derive(Debug, Clone, Serialize)]
pub struct ConsoleState {
    pub selections: Vec<PillarSelection>,
    /// Canonical provider key into the catalog.
    pub provider: String,
    pub region: String,
    pub transcript: Vec<OutputLine>,
    pub history: ShellHistory,
    pub deploy: Option<DeployRun>,
    /// Ticks left on the lockdown alarm; `None` when the console is calm.
    pub alarm: Option<u8>,
}

impl ConsoleState {
    /// Seed from the catalog: first tool per pillar, first provider and its
    /// first region. The catalog's parse-time invariants make the defaults
    /// well-defined.
    pub fn new(catalog: &Catalog) -> Self {
        let selections = catalog
            .pillars
            .iter()
            .map(|p| PillarSelection {
                pillar_id: p.id.clone(),
                tool: p.tools.first().cloned().unwrap_or_default(),
            })
            .collect();
        let (provider, region) = match catalog.cloud.first() {
            Some((key, prov)) => (
                key.clone(),
                prov.regions.first().cloned().unwrap_or_default(),
            ),
            None => (String::new(), String::new()),
        };
        Self {
            selections,
            provider,
            region,
            transcript: Vec::new(),
            history: ShellHistory::default(),
            deploy: None,
            alarm: None,
        }
    }

    pub fn tool_for(&self, pillar_id: &str) -> Option<&str> {
        self.selections
            .iter()
            .find(|s| s.pillar_id.eq_ignore_ascii_case(pillar_id))
            .map(|s| s.tool.as_str())
    }

    /// Monthly estimate: provider base cost plus the cost of every selected
    /// tool, with the price table's fallback covering unknown names.
    pub fn monthly_usd(&self, catalog: &Catalog, prices: &PriceTable) -> f64 {
        let base = catalog
            .provider(&self.provider)
            .map(|p| prices.provider_usd(&p.name))
            .unwrap_or(prices.fallback_usd);
        base + self
            .selections
            .iter()
            .map(|s| prices.tool_usd(&s.tool))
            .sum::<f64>()
    }
}
