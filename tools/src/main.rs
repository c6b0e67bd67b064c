//! risk-dashboard: text and IPC front end for the utility risk dashboard.
//!
//! Usage:
//!   risk-dashboard --data-dir ./data --threshold 250
//!   risk-dashboard --data-dir ./data --export scored.csv
//!   risk-dashboard --data-dir ./data --ipc-mode

mod render;

use anyhow::Result;
use std::env;
use std::io::{self, BufRead, Write};
use std::path::Path;
use utility_risk_core::{
    config::DashboardConfig,
    dashboard::Dashboard,
    record::ScoredRecord,
};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    SetThreshold { value: f64 },
    Visuals,
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let data_dir = string_arg(&args, "--data-dir").unwrap_or("./data");
    let export = string_arg(&args, "--export");
    let threshold = args
        .windows(2)
        .find(|w| w[0] == "--threshold")
        .map(|w| w[1].parse::<f64>())
        .transpose()
        .map_err(|e| anyhow::anyhow!("--threshold: {e}"))?;

    let config = if Path::new(data_dir).join("config").join("dashboard.json").exists() {
        DashboardConfig::load(data_dir)?
    } else {
        log::warn!("No config/dashboard.json under {data_dir}; using defaults");
        DashboardConfig::with_data_dir(data_dir)
    };

    let mut dashboard = Dashboard::open(config)?;
    if let Some(t) = threshold {
        dashboard.set_threshold(t)?;
    }

    if ipc_mode {
        return run_ipc_loop(&mut dashboard);
    }

    print_report(&dashboard);
    if let Some(path) = export {
        export_csv(&dashboard.report().records, path)?;
        println!("Scored records written to {path}");
    }
    Ok(())
}

fn run_ipc_loop(dashboard: &mut Dashboard) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                reply_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };

        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => {
                writeln!(stdout, "{}", serde_json::to_string(&dashboard.state())?)?;
            }
            IpcCommand::SetThreshold { value } => match dashboard.set_threshold(value) {
                Ok(_) => writeln!(stdout, "{}", serde_json::to_string(&dashboard.state())?)?,
                Err(e) => {
                    reply_error(&mut stdout, &e.to_string())?;
                    continue;
                }
            },
            IpcCommand::Visuals => {
                writeln!(stdout, "{}", serde_json::to_string(dashboard.visuals())?)?;
            }
        }
        stdout.flush()?;
    }
    Ok(())
}

fn reply_error(stdout: &mut io::Stdout, message: &str) -> Result<()> {
    let err_json = serde_json::json!({ "error": message });
    writeln!(stdout, "{}", err_json)?;
    stdout.flush()?;
    Ok(())
}

fn print_report(dashboard: &Dashboard) {
    let state = dashboard.state();
    let visuals = dashboard.visuals();

    println!("{}", state.title);
    println!();
    println!("Data loaded and processed successfully");
    for sheet in &state.sheets {
        println!("  {:<13} kept {:>6}  dropped {:>6}", sheet.sheet, sheet.kept, sheet.dropped);
    }
    println!("  merged records: {}", state.record_count);
    println!();

    println!("=== DEBT DISTRIBUTION ===");
    print!("{}", render::histogram(&visuals.debt_histogram, 40));
    println!();
    println!("=== RESOURCE USAGE BY TYPE ===");
    print!("{}", render::box_plots(&visuals.usage_box_plots));
    println!();
    println!("=== CORRELATION ===");
    print!("{}", render::correlation(&visuals.correlation_matrix));
    println!();

    println!("=== RISK SUMMARY ===");
    println!(
        "  threshold:      {:.2} somoni (slider {}..={})",
        state.threshold, state.threshold_min, state.threshold_max
    );
    println!("  overdue:        {}", state.overdue_count);
    println!("  usage anomaly:  {}", state.anomalous_count);
    println!("  at risk:        {}", state.risk_count);
    if state.degenerate_statistics {
        println!("  (usage has no spread; no usage anomalies flagged)");
    }
    println!("  Total losses: {:.2} somoni", state.total_loss);
    println!();

    println!("=== PROCESSED DATA (first {} rows) ===", state.preview.len());
    print!("{}", render::preview(&state.preview));
}

fn export_csv(records: &[ScoredRecord], path: &str) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "customer_id",
        "transaction_id",
        "resource_type",
        "total_debt",
        "transaction_amount",
        "usage_volume",
        "usage_z_score",
        "is_overdue",
        "is_usage_anomalous",
        "is_risk",
        "estimated_loss",
    ])?;

    for s in records {
        let r = &s.record;
        wtr.write_record([
            r.customer_id.clone(),
            r.transaction_id.clone(),
            r.resource_type.clone(),
            r.total_debt.to_string(),
            r.transaction_amount.to_string(),
            r.usage_volume.to_string(),
            s.usage_z_score.to_string(),
            s.is_overdue.to_string(),
            s.is_usage_anomalous.to_string(),
            s.is_risk.to_string(),
            s.estimated_loss.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
