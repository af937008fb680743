#![allow(dead_code)]

use chrono::NaiveDate;
use serde_json::{json, Value};
use std::path::Path;

use trade_journal::config::Config;

pub fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Config pointed at `dir` with "today" pinned.
pub fn test_config(dir: &Path, today: &str) -> Config {
    Config {
        data_dir: dir.to_string_lossy().to_string(),
        sim_date: Some(d(today)),
        ..Config::default()
    }
}

/// Write a raw JSON document into the journal directory.
pub fn write_file(dir: &Path, name: &str, value: &Value) {
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(dir.join(name), serde_json::to_string_pretty(value).unwrap()).unwrap();
}

/// A trade as the desktop app writes it.
pub fn trade_json(id: &str, date: &str, symbol: &str, result_r: f64) -> Value {
    json!({
        "id": id,
        "date": date,
        "symbol": symbol,
        "dir": "Long",
        "resultR": result_r,
        "time": "09:45",
        "status": "reviewed"
    })
}

pub fn morning_json(date: &str, bias: &str) -> Value {
    json!({ "date": date, "mainBias": bias })
}

/// A week of trades around Wednesday 2025-01-08, plus bias records.
pub fn seed_week(dir: &Path) {
    write_file(
        dir,
        "trades.json",
        &json!([
            trade_json("t1", "2025-01-06", "EURUSD", 2.0),
            trade_json("t2", "2025-01-06T14:30:00.000Z", "eurusd", -1.0),
            trade_json("t3", "2025-01-07", "NQ", 1.5),
            trade_json("t4", "2024-12-31", "XAUUSD", -0.5),
            { "id": "broken", "date": "soon", "resultR": "lots" }
        ]),
    );
    write_file(
        dir,
        "morning_bias.json",
        &json!([
            morning_json("2025-01-06", "Long"),
            morning_json("2025-01-07", "Short"),
            morning_json("2025-01-08", "Neutral")
        ]),
    );
    write_file(
        dir,
        "eod_reviews.json",
        &json!({
            "2025-01-06": { "dayDirection": "UP" },
            "2025-01-07": { "dayDirection": "UP", "diary": "stopped out twice" }
        }),
    );
}
