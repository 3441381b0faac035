use serde::{Deserialize, Serialize};

/// API ingress configuration (`modules.api_ingress`).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiIngressConfig {
    pub bind_addr: String,
    #[serde(default)]
    pub cors_enabled: bool,
    /// Per-request deadline; the handler future is dropped when it elapses.
    #[serde(default = "default_timeout_sec")]
    pub timeout_sec: u64,
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

fn default_timeout_sec() -> u64 {
    30
}

fn default_body_limit() -> usize {
    16 * 1024 * 1024
}

impl Default for ApiIngressConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8087".to_string(),
            cors_enabled: false,
            timeout_sec: default_timeout_sec(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_section_fills_defaults() {
        let cfg: ApiIngressConfig =
            serde_json::from_value(serde_json::json!({"bind_addr": "0.0.0.0:9000"})).unwrap();
        assert_eq!(cfg.bind_addr, "0.0.0.0:9000");
        assert_eq!(cfg.timeout_sec, 30);
        assert!(!cfg.cors_enabled);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let res: Result<ApiIngressConfig, _> = serde_json::from_value(
            serde_json::json!({"bind_addr": "0.0.0.0:9000", "enable_docs": true}),
        );
        assert!(res.is_err());
    }
}
