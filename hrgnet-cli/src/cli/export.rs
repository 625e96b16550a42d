//! Plain-text writers for attack records and edge lists.

use std::io::{self, Write};

use hrgnet_core::{AttackRecord, Edge};

/// CSV header of the attack dataset.
pub const RECORD_HEADER: &str = "p,mean,std";

/// Writes `records` as CSV with the [`RECORD_HEADER`] columns.
///
/// # Errors
/// Returns [`io::Error`] if the writer fails.
///
/// # Examples
/// ```
/// # use hrgnet_cli::cli::write_records;
/// # use hrgnet_core::AttackRecord;
/// let mut buffer = Vec::new();
/// write_records(&[AttackRecord::new(0.5, 0.25, 0.0)], &mut buffer)?;
/// assert_eq!(String::from_utf8_lossy(&buffer), "p,mean,std\n0.5,0.25,0\n");
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn write_records(records: &[AttackRecord], mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "{RECORD_HEADER}")?;
    for record in records {
        writeln!(
            writer,
            "{},{},{}",
            record.fraction(),
            record.mean(),
            record.std_dev()
        )?;
    }
    Ok(())
}

/// Writes one `source<TAB>target` line per edge.
///
/// # Errors
/// Returns [`io::Error`] if the writer fails.
pub fn write_edges(edges: &[Edge], mut writer: impl Write) -> io::Result<()> {
    for edge in edges {
        writeln!(writer, "{}\t{}", edge.source(), edge.target())?;
    }
    Ok(())
}
