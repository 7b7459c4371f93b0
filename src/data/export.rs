use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};

use super::model::{BoundColumn, DerivedColumn};

/// Write columns side by side under a header row. Shorter columns leave
/// their trailing cells empty.
pub fn write_csv(path: &Path, columns: &[BoundColumn<'_>]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    writer
        .write_record(columns.iter().map(|c| c.name()))
        .context("writing CSV header")?;

    let rows = columns.iter().map(|c| c.values().len()).max().unwrap_or(0);
    for row in 0..rows {
        let record = columns.iter().map(|c| {
            c.values()
                .get(row)
                .map(|v| v.to_string())
                .unwrap_or_default()
        });
        writer
            .write_record(record)
            .with_context(|| format!("writing CSV row {row}"))?;
    }
    writer.flush().context("flushing CSV")?;

    log::info!("wrote {} columns, {rows} rows to {}", columns.len(), path.display());
    Ok(())
}

/// Write derived columns with their scripts as a JSON array of
/// `{ "name", "data", "sourceScript" }` objects.
pub fn write_json(path: &Path, columns: &[DerivedColumn]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), columns).context("serializing columns")?;
    log::info!("wrote {} derived columns to {}", columns.len(), path.display());
    Ok(())
}
