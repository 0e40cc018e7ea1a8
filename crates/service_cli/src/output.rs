//! Report formatting.

use std::io::Write;

use serde::Serialize;

use crate::config::OutputFormat;
use crate::Result;

/// A record that can be printed as one line of a plain-text table.
pub trait TableRow {
    /// Column headings, aligned with [`row`](Self::row).
    fn header() -> String;

    /// This record as one table line.
    fn row(&self) -> String;
}

/// Write `records` to `out` in the requested format.
pub fn write_records<T, W>(mut out: W, format: OutputFormat, records: &[T]) -> Result<()>
where
    T: Serialize + TableRow,
    W: Write,
{
    match format {
        OutputFormat::Table => {
            writeln!(out, "{}", T::header())?;
            for record in records {
                writeln!(out, "{}", record.row())?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, records)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(out);
            for record in records {
                writer.serialize(record)?;
            }
            writer.flush()?;
        }
    }
    Ok(())
}

/// Decimal spread to basis points.
pub fn to_bp(spread: f64) -> f64 {
    spread * 1e4
}
