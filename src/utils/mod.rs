pub mod rate_limiter;
pub mod retry;

use anyhow::{Context, Result};
use config::{Environment, File};
use std::path::Path;
use tracing::info;

use crate::models::common::Config;

/// Loads the worker config from an optional YAML file, overridden by `WORKER_*` variables.
///
/// Nested keys use a double underscore, e.g. `WORKER_SERVER__PORT=8098`.
pub fn load_config<P: AsRef<Path>>(file_name: P) -> Result<Config> {
    let path = file_name.as_ref();
    info!("Config path: {}", path.to_string_lossy());

    let settings = config::Config::builder()
        .set_default("requests_per_second", 10)?
        .set_default("request_timeout_secs", 10)?
        .set_default("big_page", 1000)?
        .set_default("maximum_heights_to_get", 10_000)?
        .set_default("block_cache_capacity", 400)?
        .set_default("workers_per_stream", 20)?
        .set_default("task_timeout_secs", 300)?
        .set_default("server.address", "0.0.0.0")?
        .set_default("server.port", 8098)?
        .set_default("metrics.enabled", true)?
        .set_default("metrics.address", "0.0.0.0")?
        .set_default("metrics.port", 8099)?
        .add_source(File::from(path).required(false))
        .add_source(
            Environment::with_prefix("WORKER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("failed to build config")?;

    let mut config: Config = settings
        .try_deserialize()
        .context("failed to parse config")?;

    config.chain_name = config.chain_name.replace('-', "_");

    Ok(config)
}

pub fn strip_html(error: &str) -> String {
    // If the error contains HTML tags, keep the first line of plain text
    if error.contains("<!doctype html>") || error.contains("<html>") {
        error
            .lines()
            .map(|line| line.trim())
            .find(|line| {
                !line.starts_with('<')
                    && !line.ends_with('>')
                    && !line.is_empty()
                    && *line != "html"
                    && *line != "body"
            })
            .unwrap_or(error)
            .to_string()
    } else {
        error.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_strip_html() {
        let page = "<!doctype html>\n<html>\n<body>\n<h1>502</h1>\nBad Gateway\n</body>\n</html>";
        assert_eq!(strip_html(page), "Bad Gateway");
        assert_eq!(strip_html("connection refused"), "connection refused");
    }

    #[test]
    fn test_load_config_from_yaml() {
        let path = std::env::temp_dir().join(format!("worker-config-{}.yml", fastrand::u64(..)));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "chain_name: kava-mainnet\nchain_id: kava-4\nrpc_url: http://localhost:26657\nlcd_url: http://localhost:1317\nbig_page: 500"
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.chain_name, "kava_mainnet");
        assert_eq!(config.big_page, 500);
        assert_eq!(config.workers_per_stream, 20);
        assert_eq!(config.server.port, 8098);
        assert!(config.datahub_key.is_none());

        std::fs::remove_file(path).unwrap();
    }
}
