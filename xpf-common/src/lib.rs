pub mod config;
pub mod error;
pub mod fetch;
pub mod helper;
pub mod install;
pub mod privilege;
pub mod systemd;
pub mod unit;

pub use config::DeployConfig;
pub use error::{DeployError, InstallStage};
pub use fetch::{fetch_all, ArtifactSource, FetchedArtifacts, HttpSource};
pub use helper::render_helper_script;
pub use install::Installer;
pub use privilege::ensure_privileged;
pub use systemd::{LogTail, ServiceManager, Systemd};
pub use unit::{render_unit, ServiceDefinition};
