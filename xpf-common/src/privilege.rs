use crate::error::DeployError;

/// Fail unless the caller's effective identity is root. Must run before any
/// filesystem or service-manager mutation.
pub fn ensure_privileged() -> Result<(), DeployError> {
    ensure_uid(unsafe { libc::geteuid() })
}

fn ensure_uid(uid: libc::uid_t) -> Result<(), DeployError> {
    if uid == 0 {
        Ok(())
    } else {
        Err(DeployError::Privilege)
    }
}
