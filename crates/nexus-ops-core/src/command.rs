use serde::Serialize;

use crate::catalog::Catalog;
use crate::deploy::DeployRun;
use crate::pricing::PriceTable;
use crate::state::{ConsoleState, ALARM_TICKS};

/// Fixed operator identity shown in the prompt and by `whoami`.
pub const OPERATOR: &str = "admin@nexus";

/// Visual class of a transcript line, mirrored by the CLI palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    Output,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputLine {
    pub kind: OutputKind,
    pub text: String,
}

impl OutputLine {
    pub fn output(text: impl Into<String>) -> Self {
        Self { kind: OutputKind::Output, text: text.into() }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self { kind: OutputKind::Success, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { kind: OutputKind::Error, text: text.into() }
    }
}

/// A parsed console line. `Unknown` keeps the offending token for the
/// not-found message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Status,
    Ls,
    Whoami,
    Cost,
    Cloud { provider: String },
    Set { pillar: String, tool: String },
    Deploy,
    Halt,
    Panic,
    Clear,
    Unknown(String),
}

impl Command {
    /// Split on whitespace and match the first token case-insensitively.
    /// Returns `None` only for blank input; anything else parses, with
    /// unmatched heads becoming `Unknown`.
    pub fn parse(raw: &str) -> Option<Command> {
        let mut words = raw.split_whitespace();
        let head = words.next()?;
        let cmd = match head.to_ascii_lowercase().as_str() {
            "help" => Command::Help,
            "status" => Command::Status,
            "ls" => Command::Ls,
            "whoami" => Command::Whoami,
            "cost" => Command::Cost,
            "cloud" => Command::Cloud {
                provider: words.next().unwrap_or("").to_string(),
            },
            // Tool names may contain spaces ("Docker Swarm"), so the tool
            // argument is the rest of the line.
            "set" => Command::Set {
                pillar: words.next().unwrap_or("").to_string(),
                tool: words.collect::<Vec<_>>().join(" "),
            },
            "deploy" => Command::Deploy,
            "halt" => Command::Halt,
            "panic" => Command::Panic,
            "clear" => Command::Clear,
            _ => Command::Unknown(head.to_string()),
        };
        Some(cmd)
    }
}

/// Result of one dispatched line: the successor state, the lines the
/// command produced, and engine-log notices for the event feed.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub state: ConsoleState,
    pub lines: Vec<OutputLine>,
    pub events: Vec<String>,
}

const HELP_LINE: &str = "Commands: help, status, ls, whoami, cost, \
cloud <provider>, set <pillar> <tool>, deploy, halt, panic, clear";

/// Execute one console line against `state` and return the successor.
///
/// Every recognized command yields exactly one line (`clear` yields none);
/// failures are rendered as error lines, never raised. The successor's
/// transcript carries the echoed prompt plus the produced lines, and the
/// entered line lands in history.
pub fn dispatch(
    catalog: &Catalog,
    prices: &PriceTable,
    state: &ConsoleState,
    raw: &str,
) -> Outcome {
    let mut next = state.clone();
    let mut lines = Vec::new();
    let mut events = Vec::new();

    let Some(cmd) = Command::parse(raw) else {
        return Outcome { state: next, lines, events };
    };
    next.history.push(raw.trim());
    tracing::debug!(?cmd, "dispatch");

    match cmd {
        Command::Help => lines.push(OutputLine::output(HELP_LINE)),

        Command::Status => {
            let cloud = catalog
                .provider(&next.provider)
                .map(|p| p.name.as_str())
                .unwrap_or(&next.provider);
            lines.push(OutputLine::success(format!(
                "Nodes: 24 | Pods: 112 | Cloud: {cloud}/{} | Status: OPTIMAL",
                next.region
            )));
        }

        Command::Ls => {
            let listing = next
                .selections
                .iter()
                .map(|s| format!("{}={}", s.pillar_id, s.tool))
                .collect::<Vec<_>>()
                .join("  ");
            lines.push(OutputLine::output(listing));
        }

        Command::Whoami => lines.push(OutputLine::output(OPERATOR)),

        Command::Cost => {
            let cloud = catalog
                .provider(&next.provider)
                .map(|p| p.name.as_str())
                .unwrap_or(&next.provider);
            lines.push(OutputLine::output(format!(
                "COST: estimated ${:.0}/mo across {} pillars on {cloud}",
                next.monthly_usd(catalog, prices),
                next.selections.len()
            )));
        }

        Command::Cloud { provider } => match catalog.provider_key(&provider) {
            Some(key) => {
                let key = key.to_string();
                let (name, region) = catalog
                    .provider(&key)
                    .map(|p| {
                        (p.name.clone(), p.regions.first().cloned().unwrap_or_default())
                    })
                    .unwrap_or_default();
                next.provider = key;
                next.region = region;
                lines.push(OutputLine::success(format!(
                    "REGION: primary cloud set to {name} ({})",
                    next.region
                )));
                events.push(format!("REGION: primary cloud set to {name}"));
            }
            None => lines.push(OutputLine::error(format!(
                "ERR: provider '{provider}' not recognized"
            ))),
        },

        Command::Set { pillar, tool } => match catalog.pillar(&pillar) {
            Some(p) => match p.resolve_tool(&tool) {
                Some(canonical) => {
                    let canonical = canonical.to_string();
                    if let Some(sel) = next
                        .selections
                        .iter_mut()
                        .find(|s| s.pillar_id == p.id)
                    {
                        sel.tool = canonical.clone();
                    }
                    lines.push(OutputLine::success(format!(
                        "SYNC: {} updated to {canonical}",
                        p.id.to_uppercase()
                    )));
                    events.push(format!(
                        "{}_ENG: switched to {canonical}",
                        p.id.to_uppercase()
                    ));
                }
                None => lines.push(OutputLine::error(format!(
                    "ERR: tool '{tool}' not found for {}",
                    p.id
                ))),
            },
            None => lines.push(OutputLine::error(format!(
                "ERR: pillar '{pillar}' not recognized"
            ))),
        },

        Command::Deploy => {
            if next.deploy.is_some() {
                lines.push(OutputLine::error("ERR: rollout already in progress"));
            } else {
                next.deploy = Some(DeployRun::new());
                lines.push(OutputLine::success("DEPLOY: rollout started"));
                events.push("DEPLOY: rollout started".to_string());
            }
        }

        Command::Halt => {
            if next.deploy.take().is_some() {
                lines.push(OutputLine::success("HALT: rollout cancelled"));
                events.push("HALT: rollout cancelled".to_string());
            } else {
                lines.push(OutputLine::output("HALT: no rollout in progress"));
            }
        }

        Command::Panic => {
            // Re-issuing `panic` restarts the countdown.
            next.alarm = Some(ALARM_TICKS);
            lines.push(OutputLine::error("ALARM: Emergency lockdown!"));
            events.push("ALARM: Emergency lockdown!".to_string());
        }

        Command::Clear => {
            next.transcript.clear();
            return Outcome { state: next, lines, events };
        }

        Command::Unknown(head) => {
            lines.push(OutputLine::error(format!("Command not found: {head}")));
        }
    }

    next.transcript
        .push(OutputLine::output(format!("{OPERATOR}:~$ {}", raw.trim())));
    next.transcript.extend(lines.iter().cloned());
    Outcome { state: next, lines, events }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive_on_the_head() {
        assert_eq!(Command::parse("HELP"), Some(Command::Help));
        assert_eq!(Command::parse("  Status  "), Some(Command::Status));
    }

    #[test]
    fn parse_blank_is_none() {
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("   "), None);
    }

    #[test]
    fn parse_set_keeps_spaced_tool_names() {
        assert_eq!(
            Command::parse("set orch docker swarm"),
            Some(Command::Set {
                pillar: "orch".into(),
                tool: "docker swarm".into()
            })
        );
    }

    #[test]
    fn parse_unknown_keeps_head_token() {
        assert_eq!(
            Command::parse("frobnicate now"),
            Some(Command::Unknown("frobnicate".into()))
        );
    }
}
