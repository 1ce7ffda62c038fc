use super::JobMetricsReport;
use crate::Result;
use clap::ValueEnum;
use core::fmt::Write;

/// Layout of the JSON document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum JsonStyle {
    /// The whole document on a single line
    #[default]
    Compact,

    /// Indented, one field per line
    Pretty,
}

/// Render `report` as one JSON document followed by a newline.
pub fn generate<W: Write>(report: &JobMetricsReport, style: JsonStyle, writer: &mut W) -> Result<()> {
    let text = match style {
        JsonStyle::Compact => serde_json::to_string(report)?,
        JsonStyle::Pretty => serde_json::to_string_pretty(report)?,
    };

    writeln!(writer, "{text}")?;
    Ok(())
}
