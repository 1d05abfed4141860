use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Child, Command};

/// Host service-manager capability. The install orchestrator and the menu
/// dispatcher only see this trait, so both are testable against a recording
/// fake instead of a real systemd.
pub trait ServiceManager {
    fn install_unit(&self, service: &str, unit_text: &str) -> Result<()>;
    fn reload(&self) -> Result<()>;
    fn enable(&self, service: &str) -> Result<()>;
    fn start(&self, service: &str) -> Result<()>;
    fn stop(&self, service: &str) -> Result<()>;
    fn restart(&self, service: &str) -> Result<()>;
    fn status(&self, service: &str) -> Result<()>;
    fn is_active(&self, service: &str) -> bool;
    fn tail_logs(&self, service: &str) -> Result<LogTail>;
}

/// Handle on a spawned log-follow subprocess.
pub struct LogTail {
    child: Child,
}

impl LogTail {
    pub fn new(child: Child) -> Self {
        Self { child }
    }

    /// Block until the tail ends. The expected ending is an operator
    /// interrupt, which stops the child and is a normal return; SIGINT is
    /// ignored in this process while waiting so the menu survives it.
    pub fn wait(mut self) -> Result<()> {
        let previous = unsafe { libc::signal(libc::SIGINT, libc::SIG_IGN) };
        let waited = self.child.wait();
        unsafe { libc::signal(libc::SIGINT, previous) };
        waited.context("failed waiting on log tail")?;
        Ok(())
    }

    /// Terminate the tail without operator involvement.
    pub fn stop(mut self) -> Result<()> {
        let _ = self.child.kill();
        self.child.wait().context("failed reaping log tail")?;
        Ok(())
    }
}

/// Real implementation shelling out to systemctl and journalctl.
pub struct Systemd {
    unit_dir: PathBuf,
}

impl Systemd {
    pub fn new<P: AsRef<Path>>(unit_dir: P) -> Self {
        Self {
            unit_dir: unit_dir.as_ref().to_path_buf(),
        }
    }

    pub fn new_default() -> Self {
        Self::new("/etc/systemd/system")
    }

    fn systemctl(&self, args: &[&str]) -> Result<()> {
        let status = Command::new("systemctl")
            .args(args)
            .status()
            .context("failed to run systemctl")?;
        if !status.success() {
            bail!("systemctl {} exited with {}", args.join(" "), status);
        }
        Ok(())
    }

    pub fn logs(&self, service: &str, lines: u32, follow: bool) -> Result<()> {
        let mut cmd = Command::new("journalctl");
        cmd.args(["-u", service, "-n", &lines.to_string()]);
        if follow {
            cmd.arg("-f");
        }
        cmd.status().context("failed to run journalctl")?;
        Ok(())
    }
}

impl ServiceManager for Systemd {
    fn install_unit(&self, service: &str, unit_text: &str) -> Result<()> {
        let unit_path = self.unit_dir.join(format!("{}.service", service));
        std::fs::write(&unit_path, unit_text)
            .with_context(|| format!("failed to write unit {}", unit_path.display()))?;
        Ok(())
    }

    fn reload(&self) -> Result<()> {
        self.systemctl(&["daemon-reload"])
    }

    fn enable(&self, service: &str) -> Result<()> {
        self.systemctl(&["enable", service])
    }

    fn start(&self, service: &str) -> Result<()> {
        self.systemctl(&["start", service])
    }

    fn stop(&self, service: &str) -> Result<()> {
        self.systemctl(&["stop", service])
    }

    fn restart(&self, service: &str) -> Result<()> {
        self.systemctl(&["restart", service])
    }

    fn status(&self, service: &str) -> Result<()> {
        // systemctl status exits non-zero for an inactive unit; that is an
        // answer, not a failure.
        Command::new("systemctl")
            .args(["status", service])
            .status()
            .context("failed to run systemctl")?;
        Ok(())
    }

    fn is_active(&self, service: &str) -> bool {
        Command::new("systemctl")
            .args(["is-active", "--quiet", service])
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    fn tail_logs(&self, service: &str) -> Result<LogTail> {
        let child = Command::new("journalctl")
            .args(["-u", service, "-n", "50", "-f"])
            .spawn()
            .context("failed to run journalctl")?;
        Ok(LogTail::new(child))
    }
}
