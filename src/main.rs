mod config;
mod errors;
mod loader;
mod logging;
mod mime;
mod security;
mod server;
mod uri;

use crate::config::Config;
use crate::loader::LocalFileReader;
use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().collect();
    let mut config_path = PathBuf::from("wicket.toml");
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("--config requires a path");
                    std::process::exit(2);
                }
                config_path = PathBuf::from(&args[i]);
            }
            _ => {}
        }
        i += 1;
    }

    let cfg = Config::load(&config_path).context("loading config")?;
    cfg.validate().context("validating config")?;

    let addr = format!("{}:{}", cfg.server.bind_addr, cfg.server.port);
    info!(
        addr = %addr,
        base_path = %cfg.server.base_path,
        roots = ?cfg.roots.dirs,
        "wicket ready"
    );

    server::serve(cfg, Arc::new(LocalFileReader)).await
}
