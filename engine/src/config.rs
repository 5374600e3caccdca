//! Engine configuration with TOML file support.

use serde::{Deserialize, Serialize};

use agora_auth::AuthorizationGuard;
use agora_governance::GovernanceParams;
use agora_lending::LendingParams;
use agora_types::Identity;

use crate::logging::LogFormat;
use crate::EngineError;

/// Configuration for an agora engine.
///
/// Can be loaded from a TOML file via [`EngineConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Fixed authorized addresses (admins) for proposal moderation.
    #[serde(default)]
    pub authorized_set: Vec<String>,

    /// Co-signer count that satisfies the multisig predicate.
    #[serde(default = "default_multisig_min_signatures")]
    pub multisig_min_signatures: u32,

    /// Account holding posted collateral; liquidations pay out of it.
    #[serde(default = "default_collateral_escrow")]
    pub collateral_escrow: String,

    /// Whether to keep Prometheus metrics.
    #[serde(default)]
    pub enable_metrics: bool,

    #[serde(default)]
    pub governance: GovernanceParams,

    #[serde(default)]
    pub lending: LendingParams,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_multisig_min_signatures() -> u32 {
    AuthorizationGuard::DEFAULT_MIN_SIGNATURES
}

fn default_collateral_escrow() -> String {
    "agr_escrow".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, EngineError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| EngineError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, EngineError> {
        let config: Self = toml::from_str(s).map_err(|e| EngineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, EngineError> {
        toml::to_string_pretty(self).map_err(|e| EngineError::Config(e.to_string()))
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<(), EngineError> {
        self.log_format()?;
        self.governance
            .validate()
            .map_err(|e| EngineError::Config(format!("governance: {e}")))?;
        self.lending
            .validate()
            .map_err(|e| EngineError::Config(format!("lending: {e}")))?;
        self.authorized_identities()?;
        self.escrow()?;
        Ok(())
    }

    pub fn log_format(&self) -> Result<LogFormat, EngineError> {
        self.log_format.parse()
    }

    /// Install the global subscriber described by `log_format` and `log_level`.
    pub fn init_logging(&self) -> Result<(), EngineError> {
        crate::logging::init_logging(self.log_format()?, &self.log_level)
    }

    pub fn authorized_identities(&self) -> Result<Vec<Identity>, EngineError> {
        self.authorized_set
            .iter()
            .map(|raw| {
                Identity::parse(raw).map_err(|e| EngineError::Config(format!("authorized_set: {e}")))
            })
            .collect()
    }

    pub fn escrow(&self) -> Result<Identity, EngineError> {
        Identity::parse(&self.collateral_escrow)
            .map_err(|e| EngineError::Config(format!("collateral_escrow: {e}")))
    }

    pub fn guard(&self) -> Result<AuthorizationGuard, EngineError> {
        Ok(AuthorizationGuard::new(
            self.authorized_identities()?,
            self.multisig_min_signatures,
        ))
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_format: default_log_format(),
            log_level: default_log_level(),
            authorized_set: Vec::new(),
            multisig_min_signatures: default_multisig_min_signatures(),
            collateral_escrow: default_collateral_escrow(),
            enable_metrics: false,
            governance: GovernanceParams::default(),
            lending: LendingParams::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = EngineConfig::default();
        let toml_str = config.to_toml_string().expect("serializable");
        let parsed = EngineConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = EngineConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.multisig_min_signatures, 2);
        assert_eq!(config.collateral_escrow, "agr_escrow");
        assert_eq!(config.log_format, "human");
        assert_eq!(config.governance.default_veto_threshold_pct, 33);
        assert_eq!(config.lending.max_ltv_pct, 70);
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            authorized_set = ["agr_admin"]
            multisig_min_signatures = 3

            [governance]
            start_as_draft = true

            [lending]
            max_interest_rate_pct = 100
        "#;
        let config = EngineConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.multisig_min_signatures, 3);
        assert!(config.governance.start_as_draft);
        assert_eq!(config.governance.default_majority_threshold_pct, 51);
        assert_eq!(config.lending.max_interest_rate_pct, 100);
        assert_eq!(config.lending.grace_period_days, 3);
        let guard = config.guard().unwrap();
        assert!(guard.is_authorized(&Identity::new("agr_admin")));
        assert_eq!(guard.min_signatures(), 3);
    }

    #[test]
    fn invalid_values_rejected() {
        for toml in [
            r#"log_format = "xml""#,
            r#"authorized_set = ["admin"]"#,
            r#"collateral_escrow = "escrow""#,
            "[governance]\ndefault_veto_threshold_pct = 120",
            "[lending]\nmax_ltv_pct = 0",
        ] {
            let err = EngineConfig::from_toml_str(toml).unwrap_err();
            assert!(matches!(err, EngineError::Config(_)), "{toml}");
        }
    }

    #[test]
    fn unknown_log_format_is_rejected_before_installing() {
        let config = EngineConfig {
            log_format: "pretty".into(),
            ..EngineConfig::default()
        };
        assert!(matches!(config.init_logging(), Err(EngineError::Config(_))));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "enable_metrics = true").unwrap();
        let config = EngineConfig::from_toml_file(file.path().to_str().unwrap()).unwrap();
        assert!(config.enable_metrics);
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = EngineConfig::from_toml_file("/nonexistent/agora.toml");
        assert!(matches!(result, Err(EngineError::Config(_))));
    }
}
