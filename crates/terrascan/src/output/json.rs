//! Result emission. stdout carries exactly one JSON document per invocation;
//! all diagnostics go to stderr.

use terrascan_types::SegmentationReport;

pub fn emit(report: &SegmentationReport, pretty: bool) -> serde_json::Result<()> {
    let encoded = if pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };
    println!("{encoded}");
    Ok(())
}
