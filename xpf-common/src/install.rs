use crate::config::DeployConfig;
use crate::error::{DeployError, InstallStage};
use crate::fetch::FetchedArtifacts;
use crate::helper::render_helper_script;
use crate::systemd::ServiceManager;
use crate::unit::{render_unit, ServiceDefinition};
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tracing::{info, warn};

/// Install state machine. Linear, guarded, terminal on first failure; no
/// rollback of already-placed files. Rerunning with the same inputs
/// converges to the same installed state.
pub struct Installer<'a, M: ServiceManager> {
    config: &'a DeployConfig,
    manager: &'a M,
}

impl<'a, M: ServiceManager> Installer<'a, M> {
    pub fn new(config: &'a DeployConfig, manager: &'a M) -> Self {
        Self { config, manager }
    }

    /// Run the machine over fully fetched artifacts:
    /// stop-previous, ensure-directory, place files, set modes, write unit,
    /// write helper, enable and start.
    pub fn run(&self, artifacts: &FetchedArtifacts) -> Result<(), DeployError> {
        self.stop_previous();
        self.ensure_directory()?;
        self.place(
            &self.config.executable_path(),
            &artifacts.executable,
            InstallStage::PlaceArtifact,
        )?;
        self.place(
            &self.config.config_path(),
            &artifacts.configuration,
            InstallStage::PlaceConfiguration,
        )?;
        self.set_mode(
            &self.config.executable_path(),
            0o755,
            InstallStage::SetExecutableMode,
        )?;
        self.set_mode(
            &self.config.config_path(),
            0o644,
            InstallStage::SetConfigurationMode,
        )?;
        self.write_unit()?;
        if self.config.with_helper {
            self.write_helper()?;
        }
        self.enable_and_start()?;
        Ok(())
    }

    /// Best effort: a failed stop is a warning, not a failure. The fresh
    /// files land either way and the restart below supersedes the old
    /// process.
    fn stop_previous(&self) {
        let service = &self.config.service_name;
        if !self.manager.is_active(service) {
            return;
        }
        info!("Stopping running instance of {}", service);
        if let Err(e) = self.manager.stop(service) {
            warn!("Failed to stop previous instance of {}: {:#}", service, e);
        }
    }

    fn ensure_directory(&self) -> Result<(), DeployError> {
        std::fs::create_dir_all(&self.config.install_dir)
            .map_err(|e| DeployError::stage(InstallStage::EnsureDirectory, e))
    }

    fn place(&self, path: &Path, bytes: &[u8], stage: InstallStage) -> Result<(), DeployError> {
        std::fs::write(path, bytes).map_err(|e| DeployError::stage(stage, e))
    }

    fn set_mode(&self, path: &Path, mode: u32, stage: InstallStage) -> Result<(), DeployError> {
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
            .map_err(|e| DeployError::stage(stage, e))
    }

    fn write_unit(&self) -> Result<(), DeployError> {
        let unit_text = render_unit(&ServiceDefinition::from_config(self.config));
        self.manager
            .install_unit(&self.config.service_name, &unit_text)
            .map_err(|e| DeployError::stage(InstallStage::WriteUnit, e))?;
        self.manager
            .reload()
            .map_err(|e| DeployError::stage(InstallStage::WriteUnit, e))
    }

    fn write_helper(&self) -> Result<(), DeployError> {
        let script = render_helper_script(&self.config.service_name, &self.config.ctl_path);
        let helper_path = self.config.helper_path();
        std::fs::write(&helper_path, script)
            .map_err(|e| DeployError::stage(InstallStage::WriteHelper, e))?;
        std::fs::set_permissions(&helper_path, std::fs::Permissions::from_mode(0o755))
            .map_err(|e| DeployError::stage(InstallStage::WriteHelper, e))?;
        info!("Installed helper command {}", helper_path.display());
        Ok(())
    }

    /// The install is incomplete without an enabled, running service, so
    /// failures here are fatal, unlike the stop above.
    fn enable_and_start(&self) -> Result<(), DeployError> {
        let service = &self.config.service_name;
        self.manager
            .enable(service)
            .map_err(|e| DeployError::stage(InstallStage::Enable, e))?;
        self.manager
            .start(service)
            .map_err(|e| DeployError::stage(InstallStage::Enable, e))?;
        // Surface the resulting state to the operator.
        if let Err(e) = self.manager.status(service) {
            warn!("Could not query status of {}: {:#}", service, e);
        }
        Ok(())
    }
}
