//! Ledger inspection command

use anyhow::Result;

use crate::config::PetalConfig;
use crate::ledger::{Ledger, NO_PREDICTION};
use crate::model::class_name;

/// Print the most recent ledger entries
pub async fn ledger(config: PetalConfig, limit: u32, json: bool) -> Result<()> {
    let path = config.ledger_path();
    let ledger = Ledger::open(&path).await?;

    let total = ledger.count().await?;
    let entries = ledger.recent(limit).await?;
    ledger.close().await;

    if json {
        for entry in &entries {
            println!("{}", serde_json::to_string(entry)?);
        }
        return Ok(());
    }

    if entries.is_empty() {
        println!("No predictions recorded in {}", path.display());
        return Ok(());
    }

    println!(
        "{:<8} {:<28} {:>6} {:>6} {:>6} {:>6}  {:<12} {:>10}",
        "ID", "TIMESTAMP", "SL", "SW", "PL", "PW", "PREDICTION", "LATENCY"
    );
    println!("{}", "-".repeat(92));

    for entry in &entries {
        let r = &entry.record;
        let label = if r.prediction == NO_PREDICTION {
            "(failed)".to_string()
        } else {
            class_name(r.prediction)
        };
        println!(
            "{:<8} {:<28} {:>6.2} {:>6.2} {:>6.2} {:>6.2}  {:<12} {:>8.2}ms",
            entry.id,
            r.ts,
            r.features.sepal_length,
            r.features.sepal_width,
            r.features.petal_length,
            r.features.petal_width,
            label,
            r.latency_ms
        );
    }

    println!("\nShowing {} of {} records", entries.len(), total);

    Ok(())
}
