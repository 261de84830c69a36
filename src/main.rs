//! Engine entrypoint: loads the fitted artifacts once, then serves intake
//! records strictly sequentially — one JSON record per input line, one JSON
//! prediction per output line.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use vitascore::logging::StructuredLogger;
use vitascore::{Artifacts, EngineConfig, RawInput, RiskPipeline};

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config_path = std::env::var("VITASCORE_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.json"));
    let config = EngineConfig::load(&config_path);

    StructuredLogger::init(config.log.json, &config.log.level);

    info!(config = %config_path.display(), "risk engine starting");

    // Fatal on any artifact problem: never serve with partial state.
    let artifacts = Arc::new(Artifacts::load(&config.artifacts)?);
    let pipeline = RiskPipeline::new(artifacts);

    let reader: Box<dyn BufRead> = match std::env::args().nth(1) {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(BufReader::new(io::stdin())),
    };
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let input: RawInput = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "malformed intake record, skipped");
                continue;
            }
        };
        match pipeline.predict(&input) {
            Ok(prediction) => {
                serde_json::to_writer(&mut out, &prediction)?;
                out.write_all(b"\n")?;
            }
            // Per-request failure: report the kind, keep serving.
            Err(e) => warn!(error = %e, "prediction failed"),
        }
    }

    info!("risk engine stopping");
    Ok(())
}
