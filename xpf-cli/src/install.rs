use anyhow::Result;
use std::path::PathBuf;
use tracing::info;
use xpf_common::{ensure_privileged, fetch_all, DeployConfig, HttpSource, Installer, Systemd};

/// Non-interactive end-to-end install: privilege check, fetch both
/// artifacts, then run the install state machine.
pub async fn handle_install(config_path: Option<PathBuf>, skip_helper: bool) -> Result<()> {
    ensure_privileged()?;

    let mut config = match config_path {
        Some(path) => DeployConfig::load(path)?,
        None => DeployConfig::default(),
    };
    if skip_helper {
        config.with_helper = false;
    }

    info!("Fetching {} artifacts", config.service_name);
    let artifacts = fetch_all(&HttpSource::new(), &config).await?;

    let systemd = Systemd::new(&config.unit_dir);
    Installer::new(&config, &systemd).run(&artifacts)?;

    println!(
        "Installed {} to {}; service enabled and started",
        config.service_name,
        config.install_dir.display()
    );
    if config.with_helper {
        println!(
            "Run '{}' for the operations menu",
            config.helper_path().display()
        );
    }
    Ok(())
}
