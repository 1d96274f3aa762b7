use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "terrascan",
    about = "Segment environmental phenomena in an aerial raster",
    disable_help_subcommand = true
)]
pub struct CliArgs {
    /// Request parameters as inline JSON, or @path to a JSON file:
    /// {"imagePath": "...", "outputDir": "...", "modelType": "general"}
    pub params: String,

    /// Pretty-print the result JSON on stdout
    #[arg(long = "pretty")]
    pub pretty: bool,
}
