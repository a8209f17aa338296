use log::info;
use std::env;

use snake_autopilot::bot::{Bot, SessionOutcome};
use snake_autopilot::config::Config;

fn main() {
    // We default to 'info' level logging. But if the `RUST_LOG` environment variable is set,
    // we keep that value instead.
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }

    env_logger::init();

    info!("Starting Snake autopilot...");

    // Load configuration once at startup; an optional first argument overrides the path
    let config = match env::args().nth(1) {
        Some(path) => Config::from_file(&path).unwrap_or_else(|e| {
            eprintln!("Error: could not load config from '{}': {}", path, e);
            std::process::exit(1);
        }),
        None => Config::load_or_default(),
    };

    let bot = Bot::new(config);
    let mut reports = bot.play_many();
    reports.sort_by_key(|r| r.seed);

    println!("\n═══════════════════════════════════════════════════════════");
    println!("                    SESSION SUMMARY");
    println!("═══════════════════════════════════════════════════════════");
    for report in &reports {
        println!(
            "Seed {:>8}: score {:>4}, length {:>4}, ticks {:>7}, {:?}",
            report.seed, report.score, report.length, report.ticks, report.outcome
        );
    }

    if !reports.is_empty() {
        let total: u64 = reports.iter().map(|r| r.score as u64).sum();
        let cleared = reports
            .iter()
            .filter(|r| r.outcome == SessionOutcome::Cleared)
            .count();
        println!("───────────────────────────────────────────────────────────");
        println!(
            "Games: {}   Average score: {:.2}   Cleared: {}",
            reports.len(),
            total as f64 / reports.len() as f64,
            cleared
        );
    }
    println!("═══════════════════════════════════════════════════════════\n");
}
