//! TOML configuration for the manager, router, and provider profiles.
//!
//! Every section is optional; missing values fall back to the built-in
//! defaults.
//!
//! ```rust
//! use iris::{IrisConfig, ProviderId, RoutingStrategy};
//!
//! let config = IrisConfig::from_toml_str(
//!     r#"
//!     [router]
//!     strategy = "quality_first"
//!
//!     [context]
//!     recent_turns = 8
//!
//!     [providers.openai_cloud]
//!     enabled = false
//!     "#,
//! )
//! .expect("valid config");
//!
//! assert_eq!(config.router.strategy, RoutingStrategy::QualityFirst);
//! assert_eq!(config.context.recent_turns, 8);
//! let profiles = config.provider_profiles().expect("valid profiles");
//! assert!(!profiles.contains_key(&ProviderId::OpenAiCloud));
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use iprovider::{ProviderId, ProviderProfile, RateLimit};
use irouter::RouterConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::IrisError;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IrisConfig {
    pub router: RouterConfig,
    pub context: ContextConfig,
    /// Keyed by provider wire name, e.g. `ollama_local`.
    pub providers: BTreeMap<String, ProviderOverride>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Prior turns handed to the provider with each request.
    pub recent_turns: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self { recent_turns: 5 }
    }
}

/// Partial profile; unset fields keep the provider's default.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<RateLimit>,
}

impl ProviderOverride {
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    pub fn apply(&self, base: ProviderProfile) -> ProviderProfile {
        ProviderProfile {
            priority: self.priority.unwrap_or(base.priority),
            cost: self.cost.unwrap_or(base.cost),
            latency: self.latency.unwrap_or(base.latency),
            quality: self.quality.unwrap_or(base.quality),
            rate_limit: self.rate_limit.or(base.rate_limit),
        }
    }
}

impl IrisConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, IrisError> {
        let config: IrisConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, IrisError> {
        let content = std::fs::read_to_string(path).map_err(|error| {
            IrisError::config(format!("cannot read {}: {error}", path.display()))
        })?;
        let config = Self::from_toml_str(&content)?;
        info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Falls back to defaults when the file is missing or invalid.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(error) => {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "failed to load configuration; using defaults"
                );
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), IrisError> {
        self.router
            .validate()
            .map_err(|error| IrisError::config(error.message))?;

        if self.context.recent_turns == 0 {
            return Err(IrisError::config(
                "context.recent_turns must be greater than zero",
            ));
        }

        let profiles = self.provider_profiles()?;
        let last_resort = self.router.last_resort;
        if !profiles.contains_key(&last_resort) {
            return Err(IrisError::config(format!(
                "router.last_resort '{last_resort}' must not be disabled"
            )));
        }

        Ok(())
    }

    /// Default profiles with overrides applied and disabled providers removed.
    pub fn provider_profiles(&self) -> Result<BTreeMap<ProviderId, ProviderProfile>, IrisError> {
        let mut overrides = BTreeMap::new();
        for (name, provider_override) in &self.providers {
            let id = name.parse::<ProviderId>().map_err(|error| {
                IrisError::config(format!("providers.{name}: {}", error.message))
            })?;
            overrides.insert(id, *provider_override);
        }

        let mut profiles = BTreeMap::new();
        for id in ProviderId::all() {
            let provider_override = overrides.get(&id).copied().unwrap_or_default();
            if !provider_override.is_enabled() {
                continue;
            }

            let profile = provider_override.apply(ProviderProfile::defaults_for(id));
            profile
                .validate()
                .map_err(|error| IrisError::config(format!("providers.{id}: {}", error.message)))?;
            profiles.insert(id, profile);
        }

        Ok(profiles)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use iprovider::RateWindow;
    use irouter::RoutingStrategy;

    use super::*;
    use crate::IrisErrorKind;

    #[test]
    fn empty_document_yields_defaults() {
        let config = IrisConfig::from_toml_str("").expect("empty config is valid");

        assert_eq!(config, IrisConfig::default());
        assert_eq!(config.context.recent_turns, 5);
        assert_eq!(config.router.dispatch_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.provider_profiles().expect("profiles").len(), 5);
    }

    #[test]
    fn router_section_overrides_defaults() {
        let config = IrisConfig::from_toml_str(
            r#"
            [router]
            strategy = "cost_first"
            fallback_enabled = false
            error_threshold = 5
            dispatch_timeout_ms = 0
            "#,
        )
        .expect("valid config");

        assert_eq!(config.router.strategy, RoutingStrategy::CostFirst);
        assert!(!config.router.fallback_enabled);
        assert_eq!(config.router.error_threshold, 5);
        assert_eq!(config.router.dispatch_timeout(), None);
        assert_eq!(config.router.last_resort, ProviderId::FallbackLocal);
    }

    #[test]
    fn unknown_strategy_is_rejected_at_load() {
        let error = IrisConfig::from_toml_str("[router]\nstrategy = \"fastest\"\n")
            .expect_err("fastest is not a strategy");

        assert_eq!(error.kind, IrisErrorKind::Config);
        assert!(error.message.contains("fastest"));
    }

    #[test]
    fn provider_overrides_merge_onto_defaults() {
        let config = IrisConfig::from_toml_str(
            r#"
            [providers.openai_cloud]
            priority = 1
            rate_limit = { max_requests = 10, window = "per_hour" }

            [providers.huggingface-cloud]
            enabled = false
            "#,
        )
        .expect("valid config");

        let profiles = config.provider_profiles().expect("profiles");
        let openai = profiles[&ProviderId::OpenAiCloud];
        assert_eq!(openai.priority, 1);
        assert_eq!(openai.cost, 0.002);
        assert_eq!(openai.rate_limit, Some(RateLimit::per_hour(10)));
        assert_eq!(
            openai.rate_limit.map(|limit| limit.window),
            Some(RateWindow::PerHour)
        );
        assert!(!profiles.contains_key(&ProviderId::HuggingFaceCloud));
    }

    #[test]
    fn invalid_overrides_and_names_are_config_errors() {
        let cases = [
            "[providers.gemini_cloud]\npriority = 2\n",
            "[providers.ollama_local]\nquality = 1.5\n",
            "[providers.fallback_local]\nenabled = false\n",
            "[context]\nrecent_turns = 0\n",
            "[router]\nerror_threshold = 0\n",
            "[providers.ollama_local]\nspeed = 3\n",
        ];

        for case in cases {
            let error = IrisConfig::from_toml_str(case).expect_err(case);
            assert_eq!(error.kind, IrisErrorKind::Config, "{case}");
        }
    }

    #[test]
    fn load_or_default_tolerates_missing_file() {
        let config = IrisConfig::load_or_default(Path::new("/definitely/not/here/iris.toml"));
        assert_eq!(config, IrisConfig::default());
    }
}
