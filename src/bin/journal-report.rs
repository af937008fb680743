use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

use trade_journal::analytics::date_bucketer::DateRange;
use trade_journal::analytics::performance::day_stats;
use trade_journal::analytics::PerformanceReport;
use trade_journal::config::Config;
use trade_journal::storage::JsonJournalStore;

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .init();

    // Optional first arg: trailing days for the per-day table
    let args: Vec<String> = std::env::args().collect();
    let days_back: usize = args
        .get(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(7);

    let store = JsonJournalStore::from_config(&cfg);
    let trades = store.load_trades().await?;

    println!("╔══════════════════════════════════════════════════════════╗");
    println!("║                 TRADING JOURNAL REPORT                   ║");
    println!("╚══════════════════════════════════════════════════════════╝");
    println!("  Journal:  {}", store.data_dir().display());
    println!("  Today:    {}", cfg.today());

    if trades.is_empty() {
        println!();
        println!("No trades recorded yet.");
        return Ok(());
    }

    let report = PerformanceReport::from_trades(&trades);
    report.print_summary();

    let range = DateRange::trailing(cfg.today(), days_back);
    println!();
    println!("  LAST {} DAYS", days_back);
    println!("  ───────────────────────────────────");
    for day in day_stats(&trades, range) {
        if day.stats.trades == 0 {
            println!("  {} {}: -", day.label, day.date);
        } else {
            println!(
                "  {} {}: {} trades | WR {:.0}% | R {:+.2}",
                day.label,
                day.date,
                day.stats.trades,
                day.stats.win_rate * 100.0,
                day.stats.total_r
            );
        }
    }

    Ok(())
}
