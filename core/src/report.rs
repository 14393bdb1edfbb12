use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::aggregate::{Summary, SummaryRow};
use crate::workload::Profile;

pub fn csv_header(summary: &Summary) -> String {
    let mut header = String::from("tasks");
    for kind in &summary.kinds {
        header.push(',');
        header.push_str(kind.label());
    }
    header
}

fn csv_row(row: &SummaryRow) -> String {
    let mut buf = ryu::Buffer::new();
    let mut line = row.tasks.to_string();
    for result in &row.results {
        line.push(',');
        line.push_str(buf.format(result.throughput));
    }
    line
}

pub fn render_csv(summary: &Summary) -> String {
    let mut out = csv_header(summary);
    out.push('\n');
    for row in &summary.rows {
        out.push_str(&csv_row(row));
        out.push('\n');
    }
    out
}

pub fn write_csv(path: &Path, summary: &Summary) -> Result<()> {
    ensure_parent(path)?;
    let mut writer = BufWriter::new(File::create(path).with_context(|| format!("create {}", path.display()))?);
    writer
        .write_all(render_csv(summary).as_bytes())
        .with_context(|| format!("write {}", path.display()))?;
    writer.flush().with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    profile: Profile,
    rows: &'a [SummaryRow],
}

pub fn write_json(path: &Path, summary: &Summary, generated_at: DateTime<Utc>) -> Result<()> {
    ensure_parent(path)?;
    let report = JsonReport {
        generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        profile: summary.profile,
        rows: &summary.rows,
    };
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &report).with_context(|| format!("write {}", path.display()))?;
    writer.flush().with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    }
    Ok(())
}
