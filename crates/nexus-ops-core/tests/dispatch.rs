use nexus_ops_core::catalog::{load_bundled_catalog, Catalog};
use nexus_ops_core::command::{dispatch, OutputKind, OPERATOR};
use nexus_ops_core::pricing::{load_bundled_pricing, parse_pricing, PriceTable};
use nexus_ops_core::state::{ConsoleState, ALARM_TICKS};

fn fixture() -> (Catalog, PriceTable, ConsoleState) {
    let catalog = load_bundled_catalog().expect("bundled catalog");
    let prices = load_bundled_pricing().expect("bundled pricing");
    let state = ConsoleState::new(&catalog);
    (catalog, prices, state)
}

#[test]
fn every_recognized_command_produces_exactly_one_line() {
    let (catalog, prices, state) = fixture();
    for line in [
        "help", "status", "ls", "whoami", "cost", "cloud gcp", "set sec snyk", "deploy", "halt",
        "panic",
    ] {
        let out = dispatch(&catalog, &prices, &state, line);
        assert_eq!(out.lines.len(), 1, "`{line}` should produce one line");
    }
}

#[test]
fn help_lists_the_command_set() {
    let (catalog, prices, state) = fixture();
    let out = dispatch(&catalog, &prices, &state, "help");
    assert!(out.lines[0].text.contains("Commands:"));
    for cmd in ["status", "set <pillar> <tool>", "deploy", "halt", "panic", "clear"] {
        assert!(out.lines[0].text.contains(cmd), "help should mention {cmd}");
    }
}

#[test]
fn unknown_command_renders_not_found_and_mutates_nothing() {
    let (catalog, prices, state) = fixture();
    let out = dispatch(&catalog, &prices, &state, "reboot --now");
    assert_eq!(out.lines.len(), 1);
    assert_eq!(out.lines[0].kind, OutputKind::Error);
    assert_eq!(out.lines[0].text, "Command not found: reboot");
    assert_eq!(out.state.selections, state.selections);
    assert_eq!(out.state.provider, state.provider);
    assert_eq!(out.state.region, state.region);
    assert!(out.state.deploy.is_none());
    assert!(out.events.is_empty());
}

#[test]
fn set_resolves_tool_case_insensitively_to_canonical_spelling() {
    let (catalog, prices, state) = fixture();
    let out = dispatch(&catalog, &prices, &state, "set sec vault");
    assert_eq!(out.lines[0].kind, OutputKind::Success);
    assert_eq!(out.state.tool_for("sec"), Some("Vault"));
    assert_eq!(out.events, vec!["SEC_ENG: switched to Vault".to_string()]);
}

#[test]
fn set_accepts_spaced_tool_names() {
    let (catalog, prices, state) = fixture();
    let out = dispatch(&catalog, &prices, &state, "set orch DOCKER SWARM");
    assert_eq!(out.state.tool_for("orch"), Some("Docker Swarm"));
}

#[test]
fn set_unknown_tool_is_a_distinct_error_without_mutation() {
    let (catalog, prices, state) = fixture();
    let out = dispatch(&catalog, &prices, &state, "set sec nope");
    assert_eq!(out.lines[0].kind, OutputKind::Error);
    assert_eq!(out.lines[0].text, "ERR: tool 'nope' not found for sec");
    assert_eq!(out.state.tool_for("sec"), state.tool_for("sec"));
    assert!(out.events.is_empty());
}

#[test]
fn set_unknown_pillar_is_a_distinct_error() {
    let (catalog, prices, state) = fixture();
    let out = dispatch(&catalog, &prices, &state, "set db postgres");
    assert_eq!(out.lines[0].kind, OutputKind::Error);
    assert_eq!(out.lines[0].text, "ERR: pillar 'db' not recognized");
    assert_eq!(out.state.selections, state.selections);
}

#[test]
fn cloud_switch_resets_region_to_first() {
    let (catalog, prices, state) = fixture();
    let out = dispatch(&catalog, &prices, &state, "cloud AZURE");
    assert_eq!(out.state.provider, "azure");
    assert_eq!(out.state.region, "East US");
    assert_eq!(out.lines[0].kind, OutputKind::Success);

    let bad = dispatch(&catalog, &prices, &state, "cloud ibm");
    assert_eq!(bad.lines[0].kind, OutputKind::Error);
    assert_eq!(bad.state.provider, state.provider);
}

#[test]
fn status_interpolates_live_cloud_target() {
    let (catalog, prices, state) = fixture();
    let moved = dispatch(&catalog, &prices, &state, "cloud gcp").state;
    let out = dispatch(&catalog, &prices, &moved, "status");
    assert!(out.lines[0].text.contains("GCP/us-central1"));
    assert!(out.lines[0].text.contains("OPTIMAL"));
}

#[test]
fn cost_reflects_the_price_table() {
    let catalog = load_bundled_catalog().unwrap();
    let prices = parse_pricing(
        r#"
fallback_usd = 1.0

[provider]
AWS = 100.0

[tool]
Terraform = 10.0
Kubernetes = 20.0
"GitHub Actions" = 30.0
Vault = 40.0
"#,
    )
    .unwrap();
    let state = ConsoleState::new(&catalog);
    let out = dispatch(&catalog, &prices, &state, "cost");
    assert_eq!(
        out.lines[0].text,
        "COST: estimated $200/mo across 4 pillars on AWS"
    );
}

#[test]
fn whoami_is_the_fixed_operator() {
    let (catalog, prices, state) = fixture();
    let out = dispatch(&catalog, &prices, &state, "whoami");
    assert_eq!(out.lines[0].text, OPERATOR);
}

#[test]
fn ls_lists_current_selections_in_catalog_order() {
    let (catalog, prices, state) = fixture();
    let out = dispatch(&catalog, &prices, &state, "ls");
    assert_eq!(
        out.lines[0].text,
        "iac=Terraform  orch=Kubernetes  cicd=GitHub Actions  sec=Vault"
    );
}

#[test]
fn deploy_then_halt_round_trip() {
    let (catalog, prices, state) = fixture();
    let started = dispatch(&catalog, &prices, &state, "deploy");
    assert!(started.state.deploy.is_some());
    assert_eq!(started.lines[0].kind, OutputKind::Success);

    let again = dispatch(&catalog, &prices, &started.state, "deploy");
    assert_eq!(again.lines[0].kind, OutputKind::Error);
    assert!(again.state.deploy.is_some());

    let halted = dispatch(&catalog, &prices, &started.state, "halt");
    assert!(halted.state.deploy.is_none());
    assert_eq!(halted.lines[0].kind, OutputKind::Success);

    let idle = dispatch(&catalog, &prices, &halted.state, "halt");
    assert_eq!(idle.lines[0].kind, OutputKind::Output);
}

#[test]
fn panic_raises_the_lockdown_alarm() {
    let (catalog, prices, state) = fixture();
    assert!(state.alarm.is_none());
    let out = dispatch(&catalog, &prices, &state, "panic");
    assert_eq!(out.lines[0].kind, OutputKind::Error);
    assert_eq!(out.lines[0].text, "ALARM: Emergency lockdown!");
    assert_eq!(out.state.alarm, Some(ALARM_TICKS));
    assert_eq!(out.events, vec!["ALARM: Emergency lockdown!".to_string()]);
    // Selections and cloud target are untouched; the alarm is display-only.
    assert_eq!(out.state.selections, state.selections);
    assert_eq!(out.state.provider, state.provider);

    // Raising it again restarts the countdown from the top.
    let mut ticking = out.state.clone();
    ticking.alarm = Some(3);
    let again = dispatch(&catalog, &prices, &ticking, "panic");
    assert_eq!(again.state.alarm, Some(ALARM_TICKS));
}

#[test]
fn clear_empties_the_transcript_and_prints_nothing() {
    let (catalog, prices, state) = fixture();
    let busy = dispatch(&catalog, &prices, &state, "help").state;
    assert!(!busy.transcript.is_empty());
    let out = dispatch(&catalog, &prices, &busy, "clear");
    assert!(out.lines.is_empty());
    assert!(out.state.transcript.is_empty());
}

#[test]
fn transcript_echoes_the_prompt_before_the_response() {
    let (catalog, prices, state) = fixture();
    let out = dispatch(&catalog, &prices, &state, "  whoami  ");
    assert_eq!(out.state.transcript.len(), 2);
    assert_eq!(out.state.transcript[0].text, format!("{OPERATOR}:~$ whoami"));
    assert_eq!(out.state.transcript[1].text, OPERATOR);
}

#[test]
fn blank_input_is_a_no_op() {
    let (catalog, prices, state) = fixture();
    let out = dispatch(&catalog, &prices, &state, "   ");
    assert!(out.lines.is_empty());
    assert!(out.state.transcript.is_empty());
    assert!(out.state.history.is_empty());
}
