mod config;
mod error;
mod fence;
mod normalize;
mod session;
mod sniff;
mod upload;

use session::UploadSession;
use std::path::PathBuf;
use tracing::{info, warn};

const CONFIG_PATH: &str = "invoice-extract.toml";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // init tracing
    tracing_subscriber::fmt()
        .with_target(true)
        .with_level(true)
        .with_env_filter("info")
        .init();

    let cfg = config::Config::load(CONFIG_PATH)?;

    // One file per operation: take the first argument, silently skip the
    // rest (logged for the curious).
    let mut args = std::env::args().skip(1);
    let Some(file) = args.next().map(PathBuf::from) else {
        eprintln!("usage: invoice_extract <invoice.{{pdf,png,jpg,tiff}}>");
        return Err(error::ExtractError::NoFileProvided.into());
    };
    let ignored = args.count();
    if ignored > 0 {
        warn!(ignored, "Multiple files given; using the first");
    }

    let client = reqwest::Client::new();
    let mut session = UploadSession::new();
    let generation = session.begin();

    let (bytes, mime) = match upload::read_and_validate(&file) {
        Ok(validated) => validated,
        Err(e) => {
            session.fail(generation, e.to_string());
            tracing::error!(file = %file.display(), error = %e, "Upload rejected before submission");
            return Err(e.into());
        }
    };

    session.uploading(generation);
    match upload::submit(&client, &cfg, bytes, mime, &file).await {
        Ok(data) => {
            let (filled, total) = data.coverage();
            info!(
                filled,
                total,
                invoice_no = %data.invoice_details.invoice_no,
                seller = %data.seller_details.name,
                total_amount = data.summary.total,
                "Extraction result"
            );
            println!("{}", serde_json::to_string_pretty(&data)?);
            session.complete(generation, data, file);
            Ok(())
        }
        Err(e) => {
            session.fail(generation, e.to_string());
            tracing::error!(error = %e, "Extraction failed");
            Err(e.into())
        }
    }
}
