//! Health, quota, and profile state for every known provider.
//!
//! Each provider sits behind its own lock so concurrent requests only contend
//! when they touch the same provider. Nothing here is held across an await.
//!
//! ```rust
//! use std::collections::HashSet;
//!
//! use iprovider::ProviderId;
//! use irouter::ProviderRegistry;
//!
//! let registry = ProviderRegistry::with_defaults();
//! let eligible = registry.list_eligible(&HashSet::new()).expect("all available");
//! assert_eq!(eligible.len(), 5);
//!
//! for _ in 0..3 {
//!     registry.record_outcome(ProviderId::OllamaLocal, false);
//! }
//! let eligible = registry.list_eligible(&HashSet::new()).expect("others remain");
//! assert!(eligible.iter().all(|snapshot| snapshot.id != ProviderId::OllamaLocal));
//! ```

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use icommon::{Clock, SystemClock};
use iprovider::{ProviderId, ProviderProfile, ProviderStatus};

use crate::{
    CircuitBreaker, ProviderSnapshot, ProviderState, ProviderStatusEntry, RouterError,
    StatusTransition,
};

pub struct ProviderRegistry {
    entries: BTreeMap<ProviderId, Mutex<ProviderState>>,
    breaker: CircuitBreaker,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.ids())
            .field("breaker", &self.breaker)
            .finish_non_exhaustive()
    }
}

impl ProviderRegistry {
    pub fn builder() -> ProviderRegistryBuilder {
        ProviderRegistryBuilder::default()
    }

    /// Every provider with its default profile, threshold 3, and the system clock.
    pub fn with_defaults() -> Self {
        let entries = ProviderId::all()
            .map(|id| {
                let state = ProviderState::new(id, ProviderProfile::defaults_for(id));
                (id, Mutex::new(state))
            })
            .collect();

        Self {
            entries,
            breaker: CircuitBreaker::default(),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn ids(&self) -> Vec<ProviderId> {
        self.entries.keys().copied().collect()
    }

    pub fn contains(&self, provider: ProviderId) -> bool {
        self.entries.contains_key(&provider)
    }

    pub fn breaker(&self) -> CircuitBreaker {
        self.breaker
    }

    pub fn get(&self, provider: ProviderId) -> Option<ProviderSnapshot> {
        let now = self.clock.now();
        self.entries
            .get(&provider)
            .map(|entry| lock(entry).snapshot(now))
    }

    pub fn allow(&self, provider: ProviderId) -> bool {
        let now = self.clock.now();
        self.entries
            .get(&provider)
            .is_some_and(|entry| lock(entry).rate_allows(now))
    }

    /// Available providers with remaining quota, minus `excluding`.
    pub fn list_eligible(
        &self,
        excluding: &HashSet<ProviderId>,
    ) -> Result<Vec<ProviderSnapshot>, RouterError> {
        let now = self.clock.now();
        let eligible: Vec<ProviderSnapshot> = self
            .entries
            .iter()
            .filter(|(id, _)| !excluding.contains(id))
            .filter_map(|(_, entry)| {
                let mut state = lock(entry);
                state.is_eligible(now).then(|| state.snapshot(now))
            })
            .collect();

        if eligible.is_empty() {
            return Err(RouterError::empty_pool(
                "no provider is available with remaining rate quota",
            ));
        }

        Ok(eligible)
    }

    /// Reserves one unit of rate quota for an attempt about to start.
    ///
    /// The check and the reservation happen under the provider's lock, so
    /// concurrent attempts can never overdraw the window. `Ok(false)` means
    /// the quota is exhausted and nothing was reserved.
    pub fn try_acquire(&self, provider: ProviderId) -> Result<bool, RouterError> {
        let now = self.clock.now();
        let entry = self
            .entries
            .get(&provider)
            .ok_or_else(|| RouterError::unknown_provider(provider))?;
        let mut state = lock(entry);

        let Some(limiter) = state.rate_limiter.as_mut() else {
            return Ok(true);
        };

        if !limiter.allow(now) {
            return Ok(false);
        }

        limiter.consume(now);
        Ok(true)
    }

    /// Applies one finished attempt: usage time and circuit breaker. Quota was
    /// already taken by [`ProviderRegistry::try_acquire`].
    pub fn record_outcome(&self, provider: ProviderId, success: bool) -> Option<StatusTransition> {
        let now = self.clock.now();
        let entry = self.entries.get(&provider)?;
        let mut state = lock(entry);

        state.last_used_at = Some(now);

        if success {
            self.breaker.record_success(&mut state)
        } else {
            self.breaker.record_failure(&mut state)
        }
    }

    /// Operator override. Returning to `available` also clears the error count.
    pub fn set_status(
        &self,
        provider: ProviderId,
        status: ProviderStatus,
    ) -> Result<Option<StatusTransition>, RouterError> {
        let entry = self
            .entries
            .get(&provider)
            .ok_or_else(|| RouterError::unknown_provider(provider))?;
        let mut state = lock(entry);

        if status == ProviderStatus::Available {
            state.error_count = 0;
        }

        if state.status == status {
            return Ok(None);
        }

        let from = state.status;
        state.status = status;
        Ok(Some(StatusTransition {
            provider,
            from,
            to: status,
        }))
    }

    /// All providers ordered by priority, then identity.
    pub fn snapshot_all(&self) -> Vec<ProviderSnapshot> {
        let now = self.clock.now();
        let mut snapshots: Vec<ProviderSnapshot> = self
            .entries
            .values()
            .map(|entry| lock(entry).snapshot(now))
            .collect();
        snapshots.sort_by(|a, b| a.priority().cmp(&b.priority()).then(a.id.cmp(&b.id)));
        snapshots
    }

    pub fn status_report(&self) -> BTreeMap<ProviderId, ProviderStatusEntry> {
        self.snapshot_all()
            .into_iter()
            .map(|snapshot| (snapshot.id, snapshot.status_entry()))
            .collect()
    }
}

pub struct ProviderRegistryBuilder {
    profiles: BTreeMap<ProviderId, ProviderProfile>,
    error_threshold: u32,
    clock: Arc<dyn Clock>,
}

impl Default for ProviderRegistryBuilder {
    fn default() -> Self {
        Self {
            profiles: BTreeMap::new(),
            error_threshold: CircuitBreaker::DEFAULT_THRESHOLD,
            clock: Arc::new(SystemClock),
        }
    }
}

impl ProviderRegistryBuilder {
    pub fn default_profiles(mut self) -> Self {
        for id in ProviderId::all() {
            self.profiles.insert(id, ProviderProfile::defaults_for(id));
        }
        self
    }

    pub fn profile(mut self, provider: ProviderId, profile: ProviderProfile) -> Self {
        self.profiles.insert(provider, profile);
        self
    }

    pub fn without(mut self, provider: ProviderId) -> Self {
        self.profiles.remove(&provider);
        self
    }

    pub fn error_threshold(mut self, threshold: u32) -> Self {
        self.error_threshold = threshold;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn build(self) -> Result<ProviderRegistry, RouterError> {
        if self.profiles.is_empty() {
            return Err(RouterError::invalid_config(
                "provider registry needs at least one provider",
            ));
        }

        if self.error_threshold == 0 {
            return Err(RouterError::invalid_config(
                "error_threshold must be greater than zero",
            ));
        }

        let mut entries = BTreeMap::new();
        for (id, profile) in self.profiles {
            profile.validate().map_err(|error| {
                RouterError::invalid_config(format!("profile for '{id}': {}", error.message))
            })?;
            entries.insert(id, Mutex::new(ProviderState::new(id, profile)));
        }

        Ok(ProviderRegistry {
            entries,
            breaker: CircuitBreaker::new(self.error_threshold),
            clock: self.clock,
        })
    }
}

fn lock(entry: &Mutex<ProviderState>) -> MutexGuard<'_, ProviderState> {
    entry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use icommon::ManualClock;
    use iprovider::RateLimit;

    use super::*;
    use crate::RouterErrorKind;

    fn limited_registry(clock: Arc<ManualClock>) -> ProviderRegistry {
        ProviderRegistry::builder()
            .profile(
                ProviderId::OpenAiCloud,
                ProviderProfile::new(1, 0.002, 1.2, 0.95).with_rate_limit(RateLimit::per_minute(2)),
            )
            .profile(ProviderId::FallbackLocal, ProviderProfile::new(5, 0.0, 0.1, 0.5))
            .clock(clock)
            .build()
            .expect("valid registry")
    }

    #[test]
    fn try_acquire_reserves_quota_until_the_window_rolls() {
        let clock = Arc::new(ManualClock::new());
        let registry = limited_registry(clock.clone());

        assert_eq!(registry.try_acquire(ProviderId::OpenAiCloud), Ok(true));
        assert!(registry.allow(ProviderId::OpenAiCloud));
        assert_eq!(registry.try_acquire(ProviderId::OpenAiCloud), Ok(true));
        assert!(!registry.allow(ProviderId::OpenAiCloud));
        assert_eq!(registry.try_acquire(ProviderId::OpenAiCloud), Ok(false));

        let eligible = registry
            .list_eligible(&HashSet::new())
            .expect("fallback still eligible");
        assert_eq!(eligible.len(), 1);
        assert_eq!(eligible[0].id, ProviderId::FallbackLocal);

        clock.advance(Duration::from_secs(60));
        assert_eq!(registry.try_acquire(ProviderId::OpenAiCloud), Ok(true));
    }

    #[test]
    fn try_acquire_is_unlimited_without_a_rate_limit_and_rejects_unknown_ids() {
        let registry = limited_registry(Arc::new(ManualClock::new()));

        for _ in 0..100 {
            assert_eq!(registry.try_acquire(ProviderId::FallbackLocal), Ok(true));
        }

        let error = registry
            .try_acquire(ProviderId::OllamaLocal)
            .expect_err("not registered");
        assert_eq!(error.kind, RouterErrorKind::UnknownProvider);
    }

    #[test]
    fn record_outcome_leaves_quota_alone() {
        let registry = limited_registry(Arc::new(ManualClock::new()));

        registry.record_outcome(ProviderId::OpenAiCloud, true);
        registry.record_outcome(ProviderId::OpenAiCloud, false);

        assert_eq!(
            registry
                .get(ProviderId::OpenAiCloud)
                .and_then(|s| s.requests_remaining),
            Some(2)
        );
    }

    #[test]
    fn status_report_shows_rate_limited_while_quota_is_exhausted() {
        let clock = Arc::new(ManualClock::new());
        let registry = limited_registry(clock.clone());
        assert_eq!(registry.try_acquire(ProviderId::OpenAiCloud), Ok(true));
        assert_eq!(registry.try_acquire(ProviderId::OpenAiCloud), Ok(true));

        let report = registry.status_report();
        assert_eq!(
            report[&ProviderId::OpenAiCloud].status,
            ProviderStatus::RateLimited
        );
        assert_eq!(
            registry.get(ProviderId::OpenAiCloud).map(|s| s.status),
            Some(ProviderStatus::Available)
        );

        clock.advance(Duration::from_secs(61));
        assert_eq!(
            registry.status_report()[&ProviderId::OpenAiCloud].status,
            ProviderStatus::Available
        );
    }

    #[test]
    fn record_outcome_updates_last_used_at() {
        let clock = Arc::new(ManualClock::new());
        let registry = limited_registry(clock.clone());
        assert_eq!(
            registry.get(ProviderId::FallbackLocal).and_then(|s| s.last_used_at),
            None
        );

        clock.advance(Duration::from_secs(3));
        registry.record_outcome(ProviderId::FallbackLocal, false);

        assert_eq!(
            registry.get(ProviderId::FallbackLocal).and_then(|s| s.last_used_at),
            Some(clock.now())
        );
    }

    #[test]
    fn excluding_every_provider_is_an_empty_pool() {
        let registry = ProviderRegistry::with_defaults();
        let everything: HashSet<ProviderId> = ProviderId::all().collect();

        let error = registry
            .list_eligible(&everything)
            .expect_err("nothing left");
        assert_eq!(error.kind, RouterErrorKind::EmptyPool);
    }

    #[test]
    fn set_status_reports_transition_and_resets_errors_on_recovery() {
        let registry = ProviderRegistry::with_defaults();
        for _ in 0..3 {
            registry.record_outcome(ProviderId::HuggingFaceLocal, false);
        }

        let transition = registry
            .set_status(ProviderId::HuggingFaceLocal, ProviderStatus::Available)
            .expect("known provider")
            .expect("status changed");
        assert_eq!(transition.from, ProviderStatus::Error);
        assert_eq!(
            registry.get(ProviderId::HuggingFaceLocal).map(|s| s.error_count),
            Some(0)
        );

        let unchanged = registry
            .set_status(ProviderId::HuggingFaceLocal, ProviderStatus::Available)
            .expect("known provider");
        assert!(unchanged.is_none());
    }

    #[test]
    fn set_status_rejects_unregistered_provider() {
        let registry = limited_registry(Arc::new(ManualClock::new()));
        let error = registry
            .set_status(ProviderId::OllamaLocal, ProviderStatus::Unavailable)
            .expect_err("not registered");

        assert_eq!(error.kind, RouterErrorKind::UnknownProvider);
    }

    #[test]
    fn snapshot_all_is_priority_ordered() {
        let registry = ProviderRegistry::with_defaults();
        let order: Vec<ProviderId> = registry.snapshot_all().iter().map(|s| s.id).collect();

        assert_eq!(
            order,
            vec![
                ProviderId::OllamaLocal,
                ProviderId::HuggingFaceLocal,
                ProviderId::HuggingFaceCloud,
                ProviderId::OpenAiCloud,
                ProviderId::FallbackLocal,
            ]
        );
    }

    #[test]
    fn builder_rejects_invalid_profiles_and_threshold() {
        let error = ProviderRegistry::builder()
            .profile(ProviderId::OllamaLocal, ProviderProfile::new(0, 0.0, 1.0, 0.5))
            .build()
            .expect_err("priority zero");
        assert_eq!(error.kind, RouterErrorKind::InvalidConfig);
        assert!(error.message.contains("ollama_local"));

        let error = ProviderRegistry::builder()
            .default_profiles()
            .error_threshold(0)
            .build()
            .expect_err("zero threshold");
        assert_eq!(error.kind, RouterErrorKind::InvalidConfig);

        assert!(ProviderRegistry::builder().build().is_err());
    }
}
