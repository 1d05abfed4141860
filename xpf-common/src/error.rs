use std::fmt;
use thiserror::Error;

/// Steps of the install state machine, in execution order. Carried by
/// [`DeployError::Stage`] so a failed install names where it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStage {
    StopPrevious,
    EnsureDirectory,
    PlaceArtifact,
    PlaceConfiguration,
    SetExecutableMode,
    SetConfigurationMode,
    WriteUnit,
    WriteHelper,
    Enable,
}

impl fmt::Display for InstallStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InstallStage::StopPrevious => "stop-previous",
            InstallStage::EnsureDirectory => "directory-creation",
            InstallStage::PlaceArtifact => "artifact-placement",
            InstallStage::PlaceConfiguration => "configuration-placement",
            InstallStage::SetExecutableMode => "executable-permissions",
            InstallStage::SetConfigurationMode => "configuration-permissions",
            InstallStage::WriteUnit => "unit-write",
            InstallStage::WriteHelper => "helper-write",
            InstallStage::Enable => "enable",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum DeployError {
    #[error("this operation must run as root")]
    Privilege,

    #[error("failed to fetch {what}: {reason}")]
    Fetch { what: String, reason: String },

    #[error("checksum mismatch for {what}: expected {expected}, got {actual}")]
    Checksum {
        what: String,
        expected: String,
        actual: String,
    },

    #[error("install failed at {stage}: {source}")]
    Stage {
        stage: InstallStage,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl DeployError {
    pub fn stage(
        stage: InstallStage,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        DeployError::Stage {
            stage,
            source: source.into(),
        }
    }

    /// The step at which an install failed, when the error carries one.
    pub fn failed_stage(&self) -> Option<InstallStage> {
        match self {
            DeployError::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
