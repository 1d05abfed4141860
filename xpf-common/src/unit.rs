use crate::config::DeployConfig;
use std::path::PathBuf;

/// Inputs of the rendered unit. Rendering is a pure function of these
/// fields: identical definitions produce byte-identical unit text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDefinition {
    pub service_name: String,
    pub executable_path: PathBuf,
    pub config_path: PathBuf,
    pub working_dir: PathBuf,
    pub restart_sec: u32,
    pub limit_nofile: u32,
}

impl ServiceDefinition {
    pub fn from_config(config: &DeployConfig) -> Self {
        Self {
            service_name: config.service_name.clone(),
            executable_path: config.executable_path(),
            config_path: config.config_path(),
            working_dir: config.install_dir.clone(),
            restart_sec: 5,
            limit_nofile: 65535,
        }
    }
}

/// Render the systemd unit text. The unit runs as root out of the install
/// directory and, once written, is referenced only after a daemon-reload.
pub fn render_unit(def: &ServiceDefinition) -> String {
    format!(
        r#"[Unit]
Description={} proxy service
After=network.target

[Service]
Type=simple
User=root
WorkingDirectory={}
ExecStart={} {}
Restart=on-failure
RestartSec={}
LimitNOFILE={}

[Install]
WantedBy=multi-user.target
"#,
        def.service_name,
        def.working_dir.display(),
        def.executable_path.display(),
        def.config_path.display(),
        def.restart_sec,
        def.limit_nofile,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xpf_definition() -> ServiceDefinition {
        ServiceDefinition::from_config(&DeployConfig::default())
    }

    #[test]
    fn renders_expected_unit_for_defaults() {
        let expected = "\
[Unit]
Description=xpf proxy service
After=network.target

[Service]
Type=simple
User=root
WorkingDirectory=/etc/xpf
ExecStart=/etc/xpf/sni-proxy-server /etc/xpf/config.json
Restart=on-failure
RestartSec=5
LimitNOFILE=65535

[Install]
WantedBy=multi-user.target
";
        assert_eq!(render_unit(&xpf_definition()), expected);
    }

    #[test]
    fn rendering_is_deterministic() {
        let def = xpf_definition();
        assert_eq!(render_unit(&def), render_unit(&def));
    }
}
