use anyhow::Result;
use clap::Parser;
use std::path::Path;

#[derive(Parser, Debug)]
#[command(
    name = "aadhaar-ocr-server",
    version,
    about = "Extract structured Aadhaar card fields from document images over HTTP"
)]
struct Cli {
    /// Address to bind the HTTP server to
    #[arg(short = 'a', long = "addr", default_value = "127.0.0.1:3000")]
    addr: String,

    /// Read extra settings from a local TOML file
    #[arg(short = 'r', long = "read-settings")]
    read_settings: Option<String>,

    /// Enable verbose logging
    #[arg(long = "verbose")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    aadhaar_ocr_server::logging::init(cli.verbose)?;

    let settings_path = cli.read_settings.as_deref().map(Path::new);
    let settings = aadhaar_ocr_server::settings::load_settings(settings_path)?;

    aadhaar_ocr_server::server::run_server(settings, cli.addr).await
}
