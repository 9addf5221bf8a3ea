//! Provider URL targets and query encoding.

use std::collections::HashMap;

use pagesend_core::Provider;
use serde::Serialize;
use tracing::warn;

/// Base endpoint of a provider. The encoded payload is appended directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderTarget {
    pub provider: Provider,
    pub base_url: String,
}

impl ProviderTarget {
    pub fn new(provider: Provider, base_url: impl Into<String>) -> Self {
        Self {
            provider,
            base_url: base_url.into(),
        }
    }

    /// Built-in endpoint for `provider`.
    pub fn builtin(provider: Provider) -> Self {
        let base_url = match provider {
            Provider::ChatGPT => "https://chatgpt.com/?q=",
            Provider::Claude => "https://claude.ai/new?q=",
            Provider::Perplexity => "https://www.perplexity.ai/search?q=",
            Provider::Grok => "https://grok.com/?q=",
        };
        Self::new(provider, base_url)
    }

    pub fn url_for(&self, payload: &str) -> String {
        format!("{}{}", self.base_url, urlencoding::encode(payload))
    }
}

/// Registered provider targets with a default used for unregistered lookups.
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    targets: HashMap<Provider, ProviderTarget>,
    default_target: ProviderTarget,
}

impl ProviderRegistry {
    /// Registry holding only `default_target`.
    pub fn new(default_target: ProviderTarget) -> Self {
        let mut targets = HashMap::new();
        targets.insert(default_target.provider, default_target.clone());
        Self {
            targets,
            default_target,
        }
    }

    /// Every built-in provider, defaulting to `Provider::default()`.
    pub fn builtin() -> Self {
        let mut registry = Self::new(ProviderTarget::builtin(Provider::default()));
        for provider in Provider::all() {
            registry.register(ProviderTarget::builtin(*provider));
        }
        registry
    }

    pub fn register(&mut self, target: ProviderTarget) {
        if target.provider == self.default_target.provider {
            self.default_target = target.clone();
        }
        self.targets.insert(target.provider, target);
    }

    pub fn get(&self, provider: Provider) -> Option<&ProviderTarget> {
        self.targets.get(&provider)
    }

    pub fn default_target(&self) -> &ProviderTarget {
        &self.default_target
    }

    /// Registered targets in `Provider::all()` order.
    pub fn targets(&self) -> Vec<&ProviderTarget> {
        Provider::all()
            .iter()
            .filter_map(|p| self.targets.get(p))
            .collect()
    }

    /// Percent-encode `payload` as the query value of `provider`'s endpoint.
    /// Length is not capped here.
    pub fn build_provider_url(&self, provider: Provider, payload: &str) -> String {
        let target = match self.targets.get(&provider) {
            Some(target) => target,
            None => {
                warn!(
                    "Provider {} is not registered, using {}",
                    provider, self.default_target.provider
                );
                &self.default_target
            }
        };
        target.url_for(payload)
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
