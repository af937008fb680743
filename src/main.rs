use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use trade_journal::analytics::{
    achievement_totals, month_view, parse_month_key, DateRange, PerformanceReport, SessionReport,
};
use trade_journal::config::Config;
use trade_journal::storage::{DashboardService, JournalSource, JsonJournalStore};

const USAGE: &str =
    "usage: trade-journal [dashboard | analytics | calendar YYYY-MM | session <id> | achievements]";

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let store = JsonJournalStore::from_config(&cfg);
    info!(
        "Journal at {} (today {}{})",
        store.data_dir().display(),
        cfg.today(),
        if cfg.is_simulated() { ", simulated" } else { "" }
    );

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or("dashboard");

    let json = match command {
        "dashboard" => {
            let service = DashboardService::new(store, cfg);
            serde_json::to_string_pretty(&service.summary().await)?
        }
        "analytics" => {
            let trades = store.load_trades().await?;
            serde_json::to_string_pretty(&PerformanceReport::from_trades(&trades))?
        }
        "calendar" => {
            let key = match args.get(1) {
                Some(key) => key.clone(),
                None => cfg.today().format("%Y-%m").to_string(),
            };
            let (year, month) =
                parse_month_key(&key).with_context(|| format!("invalid month '{}'", key))?;
            let range = DateRange::month(year, month)
                .with_context(|| format!("invalid month '{}'", key))?;

            let trades = store.trades_for_month(year, month).await?;
            let morning = store.load_morning_bias(range).await?;
            let eods = store.eod_for_month(year, month).await?;
            let view = month_view(&trades, &morning, &eods, year, month)
                .with_context(|| format!("invalid month '{}'", key))?;
            serde_json::to_string_pretty(&view)?
        }
        "session" => {
            let Some(id) = args.get(1) else {
                bail!("{}", USAGE);
            };
            let session = store.session(id).await?;
            let trades = store.backtests_for_session(id).await?;
            serde_json::to_string_pretty(&SessionReport::from_trades(&session, &trades))?
        }
        "achievements" => {
            let list = store.load_achievements().await?;
            let totals = achievement_totals(&list);
            serde_json::to_string_pretty(&serde_json::json!({
                "totals": totals,
                "achievements": list,
            }))?
        }
        other => bail!("unknown command '{}'\n{}", other, USAGE),
    };

    println!("{}", json);
    Ok(())
}
