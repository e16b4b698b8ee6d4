use std::time::Duration;

use clap::{Parser, Subcommand};
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::{Key, Style, Term};
use nexus_ops_core::{
    catalog::{load_bundled_catalog, Catalog},
    command::{dispatch, OutputKind, OPERATOR},
    deploy::Progress,
    pricing::{load_bundled_pricing, PriceTable},
    state::ConsoleState,
    telemetry::{self, Reading, Severity, GAUGES},
};
use rand::{rngs::SmallRng, SeedableRng};

// ── Palette ──────────────────────────────────────────────────────────

fn s_header() -> Style { Style::new().color256(252).bold() }  // bright gray, bold
fn s_dim() -> Style    { Style::new().color256(248) }         // light gray
fn s_hint() -> Style   { Style::new().color256(243) }         // soft gray
fn s_ok() -> Style     { Style::new().color256(114) }         // green
fn s_warn() -> Style   { Style::new().color256(214) }         // amber
fn s_err() -> Style    { Style::new().color256(167) }         // red
fn s_accent() -> Style { Style::new().color256(109) }         // teal
fn s_label() -> Style  { Style::new().color256(146) }         // muted lavender
fn s_bold() -> Style   { Style::new().bold() }

fn sep(width: usize) -> String {
    s_hint().apply_to("\u{2500}".repeat(width)).to_string()
}

fn line_style(kind: OutputKind) -> Style {
    match kind {
        OutputKind::Output => s_dim(),
        OutputKind::Success => s_ok(),
        OutputKind::Error => s_err(),
    }
}

fn now_stamp() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

// ── CLI Args ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "nexus-ops",
    about = "Mock DevOps control console: pillar sync, a canned shell, simulated telemetry",
    version,
    after_help = "examples:\n  \
        nexus-ops                                (interactive console)\n  \
        nexus-ops exec set sec vault             (one-shot command)\n  \
        nexus-ops exec help\n  \
        nexus-ops status --watch 2\n  \
        nexus-ops status --json\n  \
        nexus-ops pillars\n  \
        nexus-ops providers aws"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one console line against a fresh state and print its output.
    Exec {
        #[arg(required = true)]
        line: Vec<String>,
    },
    /// Cluster status panel with simulated telemetry.
    Status {
        #[arg(long, short)]
        watch: Option<u64>,
        #[arg(long, short)]
        json: bool,
    },
    /// Stack pillar catalog with tool options and prices.
    Pillars,
    /// List cloud providers, or one provider's regions.
    Providers { name: Option<String> },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let catalog = load_bundled_catalog()?;
    let prices = load_bundled_pricing()?;

    match cli.command {
        Some(Commands::Exec { line }) => cmd_exec(&catalog, &prices, &line.join(" ")),
        Some(Commands::Status { watch, json }) => {
            cmd_status(&catalog, &prices, watch, json).await?;
        }
        Some(Commands::Pillars) => cmd_pillars(&catalog, &prices),
        Some(Commands::Providers { name }) => cmd_providers(&catalog, &prices, name.as_deref()),
        None => interactive_console(&catalog, &prices).await?,
    }
    Ok(())
}

// ── Exec ─────────────────────────────────────────────────────────────

fn cmd_exec(catalog: &Catalog, prices: &PriceTable, line: &str) {
    let state = ConsoleState::new(catalog);
    let out = dispatch(catalog, prices, &state, line);
    for l in &out.lines {
        println!("{}", line_style(l.kind).apply_to(&l.text));
    }
}

// ── Status ───────────────────────────────────────────────────────────

fn gauge_bar(r: &Reading, gauge_id: &str) -> String {
    let width = 20usize;
    let filled = ((r.fraction() * width as f64).round() as usize).min(width);
    let bar = format!(
        "{}{}",
        "\u{2588}".repeat(filled),
        "\u{2591}".repeat(width - filled)
    );
    let sty = match r.severity() {
        Severity::Critical => s_err(),
        Severity::Nominal if gauge_id == "cpu" => s_accent(),
        Severity::Nominal => s_ok(),
    };
    format!(
        "{}  {}",
        sty.apply_to(bar),
        s_bold().apply_to(format!("{:>3}%", r.value))
    )
}

fn print_gauges(readings: &[(&'static str, Reading)]) {
    for (id, r) in readings {
        let id = *id;
        let label = GAUGES
            .iter()
            .find(|g| g.id == id)
            .map(|g| g.label)
            .unwrap_or(id);
        println!("  {:<10} {}", s_label().apply_to(label), gauge_bar(r, id));
    }
}

async fn cmd_status(
    catalog: &Catalog,
    prices: &PriceTable,
    watch: Option<u64>,
    json: bool,
) -> anyhow::Result<()> {
    let state = ConsoleState::new(catalog);
    let mut rng = SmallRng::from_entropy();
    let pulse = ['\u{2731}', '\u{2726}', '\u{00b7}', '\u{2726}'];
    let mut frame: usize = 0;

    loop {
        let readings = telemetry::sample_all(&mut rng);

        if json {
            let cloud = catalog.provider(&state.provider);
            let v = serde_json::json!({
                "cloud": {
                    "provider": cloud.map(|p| p.name.as_str()).unwrap_or(state.provider.as_str()),
                    "region": state.region,
                },
                "pillars": state.selections,
                "monthly_usd": state.monthly_usd(catalog, prices),
                "telemetry": readings
                    .iter()
                    .map(|(id, r)| serde_json::json!({
                        "id": id,
                        "value": r.value,
                        "offset": r.offset,
                    }))
                    .collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&v)?);
        } else {
            let term = Term::stderr();
            if watch.is_some() {
                term.clear_screen()?;
            }

            let refresh = if watch.is_some() {
                format!(
                    "  {}",
                    s_warn().apply_to(format!("{} refreshing...", pulse[frame % pulse.len()]))
                )
            } else {
                String::new()
            };

            let cloud = catalog
                .provider(&state.provider)
                .map(|p| p.name.as_str())
                .unwrap_or(&state.provider);

            println!();
            println!(
                "{}  {}{}",
                s_bold().apply_to("nexus cluster"),
                s_dim().apply_to(now_stamp()),
                refresh
            );
            println!("{}", sep(56));
            print_gauges(&readings);
            println!("{}", sep(56));

            for sel in &state.selections {
                println!(
                    "  {:<6} {}",
                    s_accent().apply_to(&sel.pillar_id),
                    s_dim().apply_to(&sel.tool)
                );
            }

            println!("{}", sep(56));
            println!(
                "{}",
                s_hint().apply_to(format!(
                    "  cloud: {cloud} ({})   est. ${:.0}/mo",
                    state.region,
                    state.monthly_usd(catalog, prices)
                ))
            );
        }

        match watch {
            Some(secs) => {
                frame += 1;
                tokio::time::sleep(Duration::from_secs(secs)).await;
            }
            None => {
                if !json {
                    println!();
                }
                break;
            }
        }
    }
    Ok(())
}

// ── Pillars ──────────────────────────────────────────────────────────

fn cmd_pillars(catalog: &Catalog, prices: &PriceTable) {
    println!();
    println!("{}", s_header().apply_to("stack pillars"));
    println!("{}", sep(64));

    let mut table = Table::new();
    table.load_preset(presets::NOTHING);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("  Pillar").fg(Color::AnsiValue(243)),
        Cell::new("Name").fg(Color::AnsiValue(243)),
        Cell::new("Default").fg(Color::AnsiValue(243)),
        Cell::new("$/mo").fg(Color::AnsiValue(243)),
        Cell::new("Options").fg(Color::AnsiValue(243)),
    ]);

    for p in &catalog.pillars {
        let default = p.tools.first().map(String::as_str).unwrap_or("");
        table.add_row(vec![
            Cell::new(format!("  {}", p.id)).fg(Color::AnsiValue(109)),
            Cell::new(&p.name).fg(Color::AnsiValue(252)),
            Cell::new(default).fg(Color::AnsiValue(248)),
            Cell::new(format!("${:.0}", prices.tool_usd(default))).fg(Color::AnsiValue(109)),
            Cell::new(p.tools.join(", ")).fg(Color::AnsiValue(245)),
        ]);
    }

    println!("{table}");
    println!("{}", sep(64));
    println!(
        "{}",
        s_hint().apply_to(format!(
            "  {} pillars   nexus-ops exec set <pillar> <tool> to sync",
            catalog.pillars.len()
        ))
    );
    println!();
}

// ── Providers ────────────────────────────────────────────────────────

fn cmd_providers(catalog: &Catalog, prices: &PriceTable, name: Option<&str>) {
    match name {
        Some(key) => {
            let Some(prov) = catalog.provider(key) else {
                eprintln!(
                    "{}",
                    s_err().apply_to(format!("error: no provider matching '{key}'"))
                );
                return;
            };
            println!();
            println!(
                "{}  {}",
                s_bold().apply_to(&prov.name),
                s_dim().apply_to(format!("base ${:.0}/mo", prices.provider_usd(&prov.name)))
            );
            println!("{}", sep(48));
            for region in &prov.regions {
                println!("  {}", s_dim().apply_to(region));
            }
            println!("{}", sep(48));
            println!(
                "{}",
                s_hint().apply_to(format!("  {} regions", prov.regions.len()))
            );
            println!();
        }
        None => {
            println!();
            println!("{}", s_header().apply_to("cloud providers"));
            println!("{}", sep(48));
            for (key, prov) in &catalog.cloud {
                println!(
                    "  {:<8} {:<10} {:<12} {}",
                    s_bold().apply_to(key),
                    s_dim().apply_to(&prov.name),
                    s_accent().apply_to(format!("${:.0}/mo", prices.provider_usd(&prov.name))),
                    s_hint().apply_to(format!("{} regions", prov.regions.len()))
                );
            }
            println!("{}", sep(48));
            println!(
                "{}",
                s_hint().apply_to(format!(
                    "  {} providers   nexus-ops providers <name> for regions",
                    catalog.cloud.len()
                ))
            );
            println!();
        }
    }
}

// ── Interactive console ──────────────────────────────────────────────

fn read_key_task() -> tokio::task::JoinHandle<std::io::Result<Key>> {
    tokio::task::spawn_blocking(|| Term::stderr().read_key())
}

/// What one keypress does to the console session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyAction {
    Submit,
    RecallBack,
    RecallForward,
    Erase,
    Insert(char),
    Exit,
    Ignore,
}

fn key_action(key: &Key) -> KeyAction {
    match key {
        Key::Enter => KeyAction::Submit,
        Key::ArrowUp => KeyAction::RecallBack,
        Key::ArrowDown => KeyAction::RecallForward,
        Key::Backspace => KeyAction::Erase,
        Key::Escape | Key::Char('\u{3}') => KeyAction::Exit,
        Key::Char(c) if !c.is_control() => KeyAction::Insert(*c),
        _ => KeyAction::Ignore,
    }
}

fn push_event(events: &mut Vec<String>, msg: String) {
    events.push(format!("[{}] {msg}", now_stamp()));
    // The event feed keeps the latest 30 entries.
    if events.len() > 30 {
        events.remove(0);
    }
}

fn render_frame(
    catalog: &Catalog,
    prices: &PriceTable,
    state: &ConsoleState,
    shown: &[(&'static str, u8)],
    events: &[String],
    input: &str,
) -> Vec<String> {
    let mut out = Vec::new();

    let cloud = catalog
        .provider(&state.provider)
        .map(|p| p.name.as_str())
        .unwrap_or(&state.provider);

    if state.alarm.is_some() {
        out.push(format!(
            "{}  {}",
            s_err().apply_to("NEXUS OS  \u{26a0} EMERGENCY LOCKDOWN"),
            s_dim().apply_to(now_stamp())
        ));
    } else {
        out.push(format!(
            "{}  {}",
            s_header().apply_to("NEXUS OS"),
            s_dim().apply_to(now_stamp())
        ));
    }
    out.push(sep(64));

    for (id, value) in shown {
        let id = *id;
        let r = Reading::from_value(*value);
        let label = GAUGES
            .iter()
            .find(|g| g.id == id)
            .map(|g| g.label)
            .unwrap_or(id);
        out.push(format!(
            "  {:<10} {}",
            s_label().apply_to(label),
            gauge_bar(&r, id)
        ));
    }

    let pillars = state
        .selections
        .iter()
        .map(|s| format!("{}: {}", s.pillar_id, s.tool))
        .collect::<Vec<_>>()
        .join("   ");
    out.push(format!("  {}", s_accent().apply_to(pillars)));
    out.push(format!(
        "  {}",
        s_hint().apply_to(format!(
            "cloud: {cloud} ({})   est. ${:.0}/mo",
            state.region,
            state.monthly_usd(catalog, prices)
        ))
    ));

    if let Some(run) = &state.deploy {
        let width = 24usize;
        let filled = (usize::from(run.percent) * width / 100).min(width);
        out.push(format!(
            "  {:<10} {}{}  {}",
            s_label().apply_to("Rollout"),
            s_warn().apply_to("\u{2588}".repeat(filled)),
            s_hint().apply_to("\u{2591}".repeat(width - filled)),
            s_bold().apply_to(format!("{:>3}%", run.percent))
        ));
    }

    out.push(sep(64));

    let tail = state.transcript.len().saturating_sub(10);
    for line in &state.transcript[tail..] {
        out.push(format!("  {}", line_style(line.kind).apply_to(&line.text)));
    }

    let ev_tail = events.len().saturating_sub(3);
    for ev in &events[ev_tail..] {
        out.push(format!("  {}", s_hint().apply_to(ev)));
    }

    out.push(format!(
        "  {} {}{}",
        s_ok().apply_to(format!("{OPERATOR}:~$")),
        input,
        s_dim().apply_to("\u{258e}")
    ));
    out
}

async fn interactive_console(catalog: &Catalog, prices: &PriceTable) -> anyhow::Result<()> {
    let term = Term::stderr();
    if !term.is_term() {
        eprintln!(
            "{}",
            s_err().apply_to("interactive console needs a TTY; try `nexus-ops exec <line>`")
        );
        return Ok(());
    }

    let mut state = ConsoleState::new(catalog);
    let mut rng = SmallRng::from_entropy();
    let mut targets = telemetry::sample_all(&mut rng);
    let mut shown: Vec<(&'static str, u8)> =
        targets.iter().map(|(id, r)| (*id, r.value)).collect();
    let mut input = String::new();
    let mut events: Vec<String> = Vec::new();
    push_event(&mut events, "NEXUS_OS: systems initialized".to_string());

    let mut drawn: usize = 0;
    let mut ticks: u64 = 0;
    let mut key_task = read_key_task();
    let mut timer = tokio::time::interval(Duration::from_millis(250));
    timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        let frame = render_frame(catalog, prices, &state, &shown, &events, &input);
        if drawn > 0 {
            term.clear_last_lines(drawn)?;
        }
        for line in &frame {
            term.write_line(line)?;
        }
        drawn = frame.len();

        tokio::select! {
            res = &mut key_task => {
                let key = res??;
                match key_action(&key) {
                    KeyAction::Exit => break,
                    KeyAction::Submit => {
                        if !input.trim().is_empty() {
                            let out = dispatch(catalog, prices, &state, &input);
                            state = out.state;
                            for ev in out.events {
                                push_event(&mut events, ev);
                            }
                        }
                        input.clear();
                    }
                    KeyAction::RecallBack => {
                        if let Some(prev) = state.history.previous() {
                            input = prev.to_string();
                        }
                    }
                    KeyAction::RecallForward => {
                        input = state.history.next().map(str::to_string).unwrap_or_default();
                    }
                    KeyAction::Erase => {
                        input.pop();
                    }
                    KeyAction::Insert(c) => input.push(c),
                    KeyAction::Ignore => {}
                }
                // Respawn only while the session continues; a read left in
                // flight at exit holds runtime shutdown until one more
                // keypress arrives.
                key_task = read_key_task();
            }
            _ = timer.tick() => {
                ticks += 1;
                if ticks % 4 == 0 {
                    targets = telemetry::sample_all(&mut rng);
                }
                for (entry, target) in shown.iter_mut().zip(targets.iter()) {
                    entry.1 = telemetry::lerp(entry.1, target.1.value, 0.5);
                }
                if let Some(run) = state.deploy.as_mut() {
                    if run.advance() == Progress::Complete {
                        state.deploy = None;
                        push_event(&mut events, "DEPLOY: rollout complete".to_string());
                    }
                }
                if let Some(left) = state.alarm.as_mut() {
                    *left = left.saturating_sub(1);
                    if *left == 0 {
                        state.alarm = None;
                        push_event(&mut events, "ALARM: lockdown cleared".to_string());
                    }
                }
            }
        }
    }

    term.clear_last_lines(drawn)?;
    Ok(())
}
