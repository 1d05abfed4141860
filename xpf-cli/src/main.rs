mod install;
mod menu;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use xpf_common::{ensure_privileged, ServiceManager, Systemd};

#[derive(Parser)]
#[command(name = "xpfctl")]
#[command(about = "Deployment and lifecycle management for the xpf SNI proxy")]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install or upgrade the proxy and register its service
    Install {
        /// TOML file overriding the built-in deployment defaults
        #[arg(long)]
        config: Option<PathBuf>,
        /// Do not generate the operational helper command
        #[arg(long)]
        skip_helper: bool,
    },
    /// Launch the interactive operations menu
    Menu {
        /// Service to operate on
        #[arg(long, default_value = "xpf")]
        service: String,
    },
    /// Manage the proxy service directly
    Service {
        #[command(subcommand)]
        action: ServiceAction,
    },
}

#[derive(Subcommand)]
enum ServiceAction {
    /// Start the proxy service
    Start,
    /// Stop the proxy service
    Stop,
    /// Restart the proxy service
    Restart,
    /// Show the proxy service status
    Status,
    /// View proxy service logs
    Logs {
        /// Follow log output
        #[arg(short, long)]
        follow: bool,
        /// Number of lines to show
        #[arg(short, long, default_value = "50")]
        lines: u32,
    },
}

fn handle_service_command(action: ServiceAction) -> Result<()> {
    let systemd = Systemd::new_default();
    match action {
        ServiceAction::Start => systemd.start("xpf"),
        ServiceAction::Stop => systemd.stop("xpf"),
        ServiceAction::Restart => systemd.restart("xpf"),
        ServiceAction::Status => systemd.status("xpf"),
        ServiceAction::Logs { follow, lines } => systemd.logs("xpf", lines, follow),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    match args.command {
        Commands::Install {
            config,
            skip_helper,
        } => install::handle_install(config, skip_helper).await?,
        Commands::Menu { service } => {
            ensure_privileged()?;
            let systemd = Systemd::new_default();
            let stdin = std::io::stdin();
            menu::run_menu(&service, &systemd, stdin.lock(), std::io::stdout())?;
        }
        Commands::Service { action } => handle_service_command(action)?,
    }

    Ok(())
}
