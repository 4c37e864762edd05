#![deny(missing_docs)]

//! # Metadata API Configuration
//!
//! Connection settings for the platform's metadata API. Every value can be
//! given as a flag or through the environment (a `.env` file is loaded at
//! startup).

use crate::error::{CliError, CliResult};

/// Connection settings shared by commands that talk to the metadata API.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ApiConfig {
    /// Instance base URL, e.g. `https://x8ki-letl-twmt.n7.xano.io`.
    #[clap(long, env = "XANO_BASE_URL")]
    pub base_url: Option<String>,

    /// Metadata API access token.
    #[clap(long, env = "XANO_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Workspace id.
    #[clap(long, env = "XANO_WORKSPACE")]
    pub workspace: Option<String>,
}

/// Fully specified connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedApiConfig {
    /// Base URL without a trailing slash.
    pub base_url: String,
    /// Bearer token.
    pub token: String,
    /// Workspace id.
    pub workspace: String,
}

impl ApiConfig {
    /// Checks that every setting is present.
    pub fn resolve(&self) -> CliResult<ResolvedApiConfig> {
        let require = |value: &Option<String>, name: &str| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .ok_or_else(|| CliError::General(format!("missing {} (flag or environment)", name)))
        };

        Ok(ResolvedApiConfig {
            base_url: require(&self.base_url, "XANO_BASE_URL")?
                .trim_end_matches('/')
                .to_string(),
            token: require(&self.token, "XANO_TOKEN")?,
            workspace: require(&self.workspace, "XANO_WORKSPACE")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_trims_base_url() {
        let config = ApiConfig {
            base_url: Some("https://example.xano.io/".into()),
            token: Some("t".into()),
            workspace: Some("1".into()),
        };
        let resolved = config.resolve().unwrap();
        assert_eq!(resolved.base_url, "https://example.xano.io");
    }

    #[test]
    fn test_resolve_reports_missing_setting() {
        let config = ApiConfig {
            base_url: Some("https://example.xano.io".into()),
            token: Some("  ".into()),
            workspace: None,
        };
        let err = config.resolve().unwrap_err();
        assert!(err.to_string().contains("XANO_TOKEN"));
    }
}
