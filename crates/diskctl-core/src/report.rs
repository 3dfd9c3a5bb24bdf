//! Fixed-width report of the current throttle limits of one device.

use std::fmt;

use diskctl_common::constants::{REPORT_COLUMN_WIDTH, REPORT_HEADER};
use diskctl_common::types::{Limit, Operation};

/// Limits in effect for one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportRow {
    /// Direction this row describes.
    pub op: Operation,
    /// IOPS ceiling.
    pub iops: Limit,
    /// Bandwidth ceiling in bytes per second.
    pub bps: Limit,
}

/// Report produced by the `show` action: one read row, one write row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThrottleReport {
    /// Device name as shown in the first column.
    pub device: String,
    /// Rows in read, write order.
    pub rows: [ReportRow; 2],
}

impl ThrottleReport {
    /// Returns the row for a direction.
    #[must_use]
    pub fn row(&self, op: Operation) -> &ReportRow {
        match op {
            Operation::Read => &self.rows[0],
            Operation::Write => &self.rows[1],
        }
    }
}

fn write_line(f: &mut fmt::Formatter<'_>, cells: [&dyn fmt::Display; 4]) -> fmt::Result {
    let w = REPORT_COLUMN_WIDTH;
    writeln!(
        f,
        "{:<w$} {:<w$} {:<w$} {:<w$}",
        cells[0].to_string(),
        cells[1].to_string(),
        cells[2].to_string(),
        cells[3].to_string(),
    )
}

impl fmt::Display for ThrottleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [device, op, iops, bps] = REPORT_HEADER;
        write_line(f, [&device, &op, &iops, &bps])?;
        for row in &self.rows {
            write_line(f, [&self.device, &row.op, &row.iops, &row.bps])?;
        }
        Ok(())
    }
}
