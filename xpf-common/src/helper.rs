use std::path::Path;

/// Render the operational helper installed on the command search path under
/// the service name. The service name is baked in at generation time; the
/// script reads nothing at dispatch time.
pub fn render_helper_script(service_name: &str, ctl_path: &Path) -> String {
    format!(
        r#"#!/bin/sh
# Operations menu for the {service_name} service.
exec {ctl} menu --service {service_name}
"#,
        service_name = service_name,
        ctl = ctl_path.display(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn script_is_a_shell_wrapper_with_baked_in_name() {
        let script = render_helper_script("xpf", &PathBuf::from("/usr/local/bin/xpfctl"));
        assert!(script.starts_with("#!/bin/sh\n"));
        assert!(script.contains("exec /usr/local/bin/xpfctl menu --service xpf"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let ctl = PathBuf::from("/usr/local/bin/xpfctl");
        assert_eq!(
            render_helper_script("xpf", &ctl),
            render_helper_script("xpf", &ctl)
        );
    }
}
