//! Client configuration: API server address, security context, and the
//! execution-scope identifiers read from the environment at startup.

use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::env;

use crate::http::RequestError;

/// Location of the API server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiServer {
    pub protocol: String,
    pub host: String,
    pub port: Option<u16>,
}

impl Default for ApiServer {
    fn default() -> Self {
        Self {
            protocol: "http".to_string(),
            host: "localhost".to_string(),
            port: Some(8124),
        }
    }
}

impl ApiServer {
    /// Base URL that server-relative routes are resolved against.
    pub fn base_url(&self) -> String {
        match self.port {
            Some(port) => format!("{}://{}:{}", self.protocol, self.host, port),
            None => format!("{}://{}", self.protocol, self.host),
        }
    }
}

/// Bearer-token credential data used to authenticate every request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SecurityContext {
    pub auth_token_type: String,
    pub auth_token: String,
}

impl SecurityContext {
    /// Value for the `Authorization` header.
    ///
    /// Only bearer tokens are supported; any other token type is a
    /// configuration error and is never retried.
    pub fn authorization_header(&self) -> Result<String> {
        if !self.auth_token_type.eq_ignore_ascii_case("bearer") {
            return Err(RequestError::UnsupportedTokenType(self.auth_token_type.clone()).into());
        }
        Ok(format!("{} {}", self.auth_token_type, self.auth_token))
    }
}

/// Resolved client configuration.
///
/// Read once at process start and handed to the client; nothing here is
/// rewritten mid-flight.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub server: ApiServer,
    pub security: Option<SecurityContext>,
    pub job_id: Option<String>,
    pub workspace_id: Option<String>,
    pub project_context_id: Option<String>,
}

impl Config {
    /// Builds the configuration from the `STRATUS_*` environment
    /// variables, falling back to defaults for anything unset.
    ///
    /// When running inside a job (`STRATUS_JOB_ID` is set) the default
    /// workspace comes from `STRATUS_WORKSPACE_ID`; otherwise it falls
    /// back to `STRATUS_PROJECT_CONTEXT_ID`.
    pub fn from_env() -> Result<Self> {
        let mut server = ApiServer::default();
        if let Ok(host) = env::var("STRATUS_APISERVER_HOST") {
            server.host = host;
        }
        if let Ok(port) = env::var("STRATUS_APISERVER_PORT") {
            server.port = Some(
                port.parse()
                    .with_context(|| format!("Invalid STRATUS_APISERVER_PORT: {}", port))?,
            );
        }
        if let Ok(protocol) = env::var("STRATUS_APISERVER_PROTOCOL") {
            server.protocol = protocol;
        }

        let security = match env::var("STRATUS_SECURITY_CONTEXT") {
            Ok(raw) => Some(
                serde_json::from_str(&raw).context("Failed to parse STRATUS_SECURITY_CONTEXT")?,
            ),
            Err(_) => {
                warn!("No security context found in environment variables");
                None
            }
        };

        let job_id = env::var("STRATUS_JOB_ID").ok();
        let project_context_id = env::var("STRATUS_PROJECT_CONTEXT_ID").ok();
        let workspace_id = if job_id.is_some() {
            env::var("STRATUS_WORKSPACE_ID").ok()
        } else {
            project_context_id.clone()
        };

        Ok(Self {
            server,
            security,
            job_id,
            workspace_id,
            project_context_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_default() {
        assert_eq!(ApiServer::default().base_url(), "http://localhost:8124");
    }

    #[test]
    fn test_base_url_without_port() {
        let server = ApiServer {
            protocol: "https".to_string(),
            host: "api.example.com".to_string(),
            port: None,
        };
        assert_eq!(server.base_url(), "https://api.example.com");
    }

    #[test]
    fn test_base_url_with_port() {
        let server = ApiServer {
            protocol: "https".to_string(),
            host: "api.example.com".to_string(),
            port: Some(443),
        };
        assert_eq!(server.base_url(), "https://api.example.com:443");
    }

    #[test]
    fn test_security_context_from_json() {
        let ctx: SecurityContext =
            serde_json::from_str(r#"{"auth_token_type": "Bearer", "auth_token": "outside"}"#)
                .unwrap();
        assert_eq!(ctx.auth_token_type, "Bearer");
        assert_eq!(ctx.auth_token, "outside");
    }

    #[test]
    fn test_authorization_header_bearer() {
        let ctx = SecurityContext {
            auth_token_type: "Bearer".to_string(),
            auth_token: "outside".to_string(),
        };
        assert_eq!(ctx.authorization_header().unwrap(), "Bearer outside");

        // Token type comparison is case-insensitive
        let ctx = SecurityContext {
            auth_token_type: "bearer".to_string(),
            auth_token: "outside".to_string(),
        };
        assert_eq!(ctx.authorization_header().unwrap(), "bearer outside");
    }

    #[test]
    fn test_authorization_header_rejects_other_token_types() {
        let ctx = SecurityContext {
            auth_token_type: "Basic".to_string(),
            auth_token: "outside".to_string(),
        };
        let err = ctx.authorization_header().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RequestError>(),
            Some(RequestError::UnsupportedTokenType(_))
        ));
    }

    // Environment manipulation is process-wide, so everything that
    // touches STRATUS_* variables lives in this single test.
    #[test]
    fn test_from_env() {
        unsafe {
            env::set_var("STRATUS_APISERVER_HOST", "api.example.com");
            env::set_var("STRATUS_APISERVER_PORT", "8443");
            env::set_var("STRATUS_APISERVER_PROTOCOL", "https");
            env::set_var(
                "STRATUS_SECURITY_CONTEXT",
                r#"{"auth_token_type": "Bearer", "auth_token": "outside"}"#,
            );
            env::set_var("STRATUS_PROJECT_CONTEXT_ID", "project-1");
            env::remove_var("STRATUS_JOB_ID");
            env::remove_var("STRATUS_WORKSPACE_ID");
        }

        let config = Config::from_env().unwrap();
        assert_eq!(config.server.base_url(), "https://api.example.com:8443");
        assert_eq!(config.security.unwrap().auth_token, "outside");
        // Without a job id the workspace falls back to the project context
        assert_eq!(config.workspace_id.as_deref(), Some("project-1"));
        assert_eq!(config.project_context_id.as_deref(), Some("project-1"));
        assert_eq!(config.job_id, None);

        unsafe {
            env::set_var("STRATUS_JOB_ID", "job-1");
            env::set_var("STRATUS_WORKSPACE_ID", "container-1");
        }
        let config = Config::from_env().unwrap();
        assert_eq!(config.job_id.as_deref(), Some("job-1"));
        assert_eq!(config.workspace_id.as_deref(), Some("container-1"));

        unsafe {
            env::set_var("STRATUS_APISERVER_PORT", "not-a-port");
        }
        assert!(Config::from_env().is_err());

        unsafe {
            env::remove_var("STRATUS_APISERVER_HOST");
            env::remove_var("STRATUS_APISERVER_PORT");
            env::remove_var("STRATUS_APISERVER_PROTOCOL");
            env::remove_var("STRATUS_SECURITY_CONTEXT");
            env::remove_var("STRATUS_PROJECT_CONTEXT_ID");
            env::remove_var("STRATUS_JOB_ID");
            env::remove_var("STRATUS_WORKSPACE_ID");
        }
    }
}
