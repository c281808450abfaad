use anyhow::Result;
use clap::ValueEnum;
use mrt_topology::{Snapshot, SnapshotDelta, Validity};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

/// Print the narrated delta from `older` to `newer`
pub fn print_changes(format: Format, older: &Snapshot, newer: &Snapshot, delta: &SnapshotDelta) -> Result<()> {
    match format {
        Format::Text => println!("{}", changes_text(older, newer, delta)),
        Format::Json => {
            let changes = delta.summary(older, newer);
            let value = serde_json::json!({
                "from": older.effective_date,
                "to": newer.effective_date,
                "label": newer.label,
                "delta": delta,
                "changes": changes.iter().map(ToString::to_string).collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }

    Ok(())
}

pub fn print_snapshot(format: Format, snapshot: &Snapshot, validity: Option<Validity>) -> Result<()> {
    match format {
        Format::Text => println!("{}", snapshot_text(snapshot, validity)?),
        Format::Json => println!("{}", serde_json::to_string_pretty(&snapshot.render_view())?),
    }

    Ok(())
}

fn changes_text(older: &Snapshot, newer: &Snapshot, delta: &SnapshotDelta) -> String {
    let changes = delta.summary(older, newer);

    let mut lines = vec![format!("{} -> {}: {}", older.effective_date, newer.effective_date, newer.label)];
    if changes.is_empty() {
        lines.push("  (no topological changes)".to_string());
    }
    lines.extend(changes.iter().map(|change| format!("  {change}")));
    lines.join("\n")
}

fn snapshot_text(snapshot: &Snapshot, validity: Option<Validity>) -> Result<String> {
    let mut lines = vec![format!("{} {}", snapshot.effective_date, snapshot.label)];
    if let Some(until) = validity.and_then(|v| v.until) {
        lines.push(format!("  in effect until {until}"));
    }

    for line in snapshot.lines.values() {
        let codes: Vec<String> = snapshot
            .codes_in_order(&line.id)?
            .into_iter()
            .map(|(code, _)| code.to_string())
            .collect();
        lines.push(format!("  {} ({}): {}", line.name, line.id, codes.join(" ")));
    }

    let interchanges: Vec<&str> = snapshot.interchanges().map(|s| &*s.name).collect();
    if !interchanges.is_empty() {
        lines.push(format!("  interchanges: {}", interchanges.join(", ")));
    }

    Ok(lines.join("\n"))
}
