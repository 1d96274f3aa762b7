use std::process::ExitCode;

use clap::Parser;
use terrascan::cli::CliArgs;
use terrascan::output;
use terrascan::params::RequestParams;
use terrascan::pipeline;
use terrascan_types::SegmentationReport;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    let report = match run(&args).await {
        Ok(report) => report,
        Err(message) => SegmentationReport::failure(message),
    };

    let failed = report.error.is_some();
    if let Err(err) = output::json::emit(&report, args.pretty) {
        eprintln!("could not serialize result: {err}");
        return ExitCode::FAILURE;
    }
    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

async fn run(args: &CliArgs) -> Result<SegmentationReport, String> {
    let params = RequestParams::load(&args.params).map_err(|err| err.to_string())?;
    pipeline::run_segmentation(&params)
        .await
        .map_err(|err| err.to_string())
}
