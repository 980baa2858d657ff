//! Output module for reporting defects
//!
//! This module handles:
//! - Formatting defects, one `<source>: <message>` line each
//! - Deriving the process exit code from a run's result

mod report;

pub use report::{Defect, DefectKind};

use std::io::Write;

/// No defects, run completed
pub const EXIT_CLEAN: i32 = 0;

/// At least one defect found
pub const EXIT_DEFECTS: i32 = 1;

/// Invalid configuration; nothing was crawled
pub const EXIT_CONFIG: i32 = 2;

/// Run interrupted; the report is partial
pub const EXIT_CANCELLED: i32 = 3;

/// Writes every defect on its own line
///
/// Nothing is written when there are no defects.
///
/// # Example
///
/// ```
/// use linkcheck::output::{write_report, Defect, DefectKind};
///
/// let defects = vec![Defect::new("http://a/", DefectKind::MissingFragment("http://a/#x".into()))];
/// let mut out = Vec::new();
/// write_report(&defects, &mut out).unwrap();
/// assert_eq!(String::from_utf8(out).unwrap(), "http://a/: missing fragment: http://a/#x\n");
/// ```
pub fn write_report<W: Write>(defects: &[Defect], output: &mut W) -> std::io::Result<()> {
    for defect in defects {
        writeln!(output, "{}", defect)?;
    }
    output.flush()
}

/// Derives the exit code; cancellation wins over defects
pub fn exit_code(defects: &[Defect], cancelled: bool) -> i32 {
    if cancelled {
        EXIT_CANCELLED
    } else if defects.is_empty() {
        EXIT_CLEAN
    } else {
        EXIT_DEFECTS
    }
}
