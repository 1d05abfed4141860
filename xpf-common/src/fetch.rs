use crate::config::DeployConfig;
use crate::error::DeployError;

/// Remote source of deployment artifacts. Returns the full payload or fails;
/// no retries, no partial results.
#[allow(async_fn_in_trait)]
pub trait ArtifactSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, DeployError>;
}

pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ArtifactSource for HttpSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, DeployError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DeployError::Fetch {
                what: url.to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(DeployError::Fetch {
                what: url.to_string(),
                reason: format!("server returned {}", response.status()),
            });
        }

        let bytes = response.bytes().await.map_err(|e| DeployError::Fetch {
            what: url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(bytes.to_vec())
    }
}

/// Both payloads of one install, fetched completely before the install
/// directory is touched.
#[derive(Debug)]
pub struct FetchedArtifacts {
    pub executable: Vec<u8>,
    pub configuration: Vec<u8>,
}

/// Fetch the executable and the configuration. Either failure aborts before
/// any target-directory mutation, leaving a prior installation untouched.
pub async fn fetch_all(
    source: &impl ArtifactSource,
    config: &DeployConfig,
) -> Result<FetchedArtifacts, DeployError> {
    let executable = source.fetch(&config.artifact_url).await?;
    verify_checksum("executable", &executable, config.artifact_sha256.as_deref())?;

    let configuration = source.fetch(&config.config_url).await?;
    verify_checksum(
        "configuration",
        &configuration,
        config.config_sha256.as_deref(),
    )?;

    Ok(FetchedArtifacts {
        executable,
        configuration,
    })
}

fn verify_checksum(what: &str, bytes: &[u8], expected: Option<&str>) -> Result<(), DeployError> {
    let Some(expected) = expected else {
        return Ok(());
    };
    let actual = sha256::digest(bytes);
    if actual != expected {
        return Err(DeployError::Checksum {
            what: what.to_string(),
            expected: expected.to_string(),
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticSource {
        executable: Result<Vec<u8>, String>,
        configuration: Result<Vec<u8>, String>,
    }

    impl ArtifactSource for StaticSource {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>, DeployError> {
            let result = if url.contains("config") {
                &self.configuration
            } else {
                &self.executable
            };
            result.clone().map_err(|reason| DeployError::Fetch {
                what: url.to_string(),
                reason,
            })
        }
    }

    fn test_config() -> DeployConfig {
        DeployConfig {
            artifact_url: "https://example.com/sni-proxy-server".to_string(),
            config_url: "https://example.com/config.json".to_string(),
            ..DeployConfig::default()
        }
    }

    #[tokio::test]
    async fn fetches_both_artifacts() {
        let source = StaticSource {
            executable: Ok(b"binary".to_vec()),
            configuration: Ok(b"{}".to_vec()),
        };
        let artifacts = fetch_all(&source, &test_config()).await.unwrap();
        assert_eq!(artifacts.executable, b"binary");
        assert_eq!(artifacts.configuration, b"{}");
    }

    #[tokio::test]
    async fn either_fetch_failure_is_fatal() {
        let source = StaticSource {
            executable: Ok(b"binary".to_vec()),
            configuration: Err("connection refused".to_string()),
        };
        let err = fetch_all(&source, &test_config()).await.unwrap_err();
        assert!(matches!(err, DeployError::Fetch { .. }));
        assert!(err.to_string().contains("config.json"));
    }

    #[tokio::test]
    async fn checksum_mismatch_is_fatal() {
        let source = StaticSource {
            executable: Ok(b"binary".to_vec()),
            configuration: Ok(b"{}".to_vec()),
        };
        let mut config = test_config();
        config.artifact_sha256 = Some("0".repeat(64));
        let err = fetch_all(&source, &config).await.unwrap_err();
        assert!(matches!(err, DeployError::Checksum { .. }));
    }

    #[tokio::test]
    async fn matching_checksum_passes() {
        let source = StaticSource {
            executable: Ok(b"binary".to_vec()),
            configuration: Ok(b"{}".to_vec()),
        };
        let mut config = test_config();
        config.artifact_sha256 = Some(sha256::digest(b"binary".as_slice()));
        assert!(fetch_all(&source, &config).await.is_ok());
    }
}
