//! Invokes one provider once and records what happened.
//!
//! A dispatch never retries. Capability errors, missing capabilities, timeouts,
//! and panics raised by the capability all surface as [`DispatchError`].
//! Rate quota is reserved before the capability runs; an attempt that finds
//! the quota gone fails as `RateLimited` without touching the circuit breaker.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_timer::Delay;
use futures_util::FutureExt;
use futures_util::future::{Either, lazy, select};
use iprovider::{CapabilityRegistry, ProviderError, ProviderId, ProviderReply, ProviderRequest};

use crate::{DispatchError, ProviderRegistry, RoutingHooks};

#[derive(Debug, Clone, PartialEq)]
pub struct DispatchSuccess {
    pub provider: ProviderId,
    pub reply: ProviderReply,
    pub elapsed: Duration,
}

#[derive(Clone)]
pub struct Dispatcher {
    capabilities: Arc<CapabilityRegistry>,
    registry: Arc<ProviderRegistry>,
    hooks: Arc<dyn RoutingHooks>,
    timeout: Option<Duration>,
}

impl Dispatcher {
    pub fn new(
        capabilities: Arc<CapabilityRegistry>,
        registry: Arc<ProviderRegistry>,
        hooks: Arc<dyn RoutingHooks>,
    ) -> Self {
        Self {
            capabilities,
            registry,
            hooks,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub async fn dispatch(
        &self,
        provider: ProviderId,
        request: &ProviderRequest,
    ) -> Result<DispatchSuccess, DispatchError> {
        self.hooks.on_dispatch_start(provider, &request.user_id);

        if let Err(cause) = self.reserve(provider) {
            self.hooks.on_dispatch_failure(provider, &cause, Duration::ZERO);
            return Err(DispatchError::new(provider, cause));
        }

        let started = Instant::now();
        let result = self.invoke(provider, request).await;
        let elapsed = started.elapsed();

        if let Some(transition) = self.registry.record_outcome(provider, result.is_ok()) {
            self.hooks.on_status_change(&transition);
        }

        match result {
            Ok(reply) => {
                self.hooks.on_dispatch_success(provider, elapsed);
                Ok(DispatchSuccess {
                    provider,
                    reply,
                    elapsed,
                })
            }
            Err(cause) => {
                self.hooks.on_dispatch_failure(provider, &cause, elapsed);
                Err(DispatchError::new(provider, cause))
            }
        }
    }

    fn reserve(&self, provider: ProviderId) -> Result<(), ProviderError> {
        match self.registry.try_acquire(provider) {
            Ok(true) => Ok(()),
            Ok(false) => Err(ProviderError::rate_limited(format!(
                "'{provider}' has no rate quota left in the current window"
            ))),
            Err(error) => Err(ProviderError::unavailable(error.message)),
        }
    }

    async fn invoke(
        &self,
        provider: ProviderId,
        request: &ProviderRequest,
    ) -> Result<ProviderReply, ProviderError> {
        let capability = self.capabilities.get(provider).ok_or_else(|| {
            ProviderError::unavailable(format!("no capability registered for '{provider}'"))
        })?;

        // `invoke` itself may panic before handing back a future.
        let call = AssertUnwindSafe(lazy(|_| capability.invoke(request)).flatten())
            .catch_unwind();
        let caught = match self.timeout {
            Some(limit) => match select(Box::pin(call), Box::pin(Delay::new(limit))).await {
                Either::Left((caught, _)) => caught,
                Either::Right(_) => {
                    return Err(ProviderError::timeout(format!(
                        "'{provider}' did not answer within {} ms",
                        limit.as_millis()
                    )));
                }
            },
            None => call.await,
        };

        caught.unwrap_or_else(|_| {
            Err(ProviderError::other(format!(
                "'{provider}' panicked while handling the request"
            )))
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use icommon::ManualClock;
    use iprovider::{
        ProviderCapability, ProviderErrorKind, ProviderFuture, ProviderProfile, ProviderStatus,
        RateLimit, TemplateResponder,
    };

    use super::*;
    use crate::{NoopRoutingHooks, StatusTransition};

    struct Panicking;

    impl ProviderCapability for Panicking {
        fn id(&self) -> ProviderId {
            ProviderId::HuggingFaceLocal
        }

        fn invoke<'a>(
            &'a self,
            _request: &'a ProviderRequest,
        ) -> ProviderFuture<'a, Result<ProviderReply, ProviderError>> {
            Box::pin(async move { explode() })
        }
    }

    fn explode() -> Result<ProviderReply, ProviderError> {
        panic!("backend exploded")
    }

    /// Fails while building its future, before any `.await`.
    struct EagerPanic;

    impl ProviderCapability for EagerPanic {
        fn id(&self) -> ProviderId {
            ProviderId::OllamaLocal
        }

        fn invoke<'a>(
            &'a self,
            _request: &'a ProviderRequest,
        ) -> ProviderFuture<'a, Result<ProviderReply, ProviderError>> {
            panic!("adapter failed to build its request")
        }
    }

    struct Stalled;

    impl ProviderCapability for Stalled {
        fn id(&self) -> ProviderId {
            ProviderId::OpenAiCloud
        }

        fn invoke<'a>(
            &'a self,
            _request: &'a ProviderRequest,
        ) -> ProviderFuture<'a, Result<ProviderReply, ProviderError>> {
            Box::pin(async move {
                Delay::new(Duration::from_secs(5)).await;
                Ok(ProviderReply::new("too late", 0.9))
            })
        }
    }

    #[derive(Default)]
    struct RecordingHooks {
        events: Mutex<Vec<String>>,
    }

    impl RoutingHooks for RecordingHooks {
        fn on_dispatch_start(&self, provider: ProviderId, user_id: &icommon::UserId) {
            self.events
                .lock()
                .expect("events lock")
                .push(format!("start:{provider}:{user_id}"));
        }

        fn on_dispatch_success(&self, provider: ProviderId, _elapsed: Duration) {
            self.events
                .lock()
                .expect("events lock")
                .push(format!("success:{provider}"));
        }

        fn on_dispatch_failure(
            &self,
            provider: ProviderId,
            error: &ProviderError,
            _elapsed: Duration,
        ) {
            self.events
                .lock()
                .expect("events lock")
                .push(format!("failure:{provider}:{:?}", error.kind));
        }

        fn on_status_change(&self, transition: &StatusTransition) {
            self.events
                .lock()
                .expect("events lock")
                .push(format!("status:{}:{}", transition.provider, transition.to));
        }
    }

    fn dispatcher(capabilities: CapabilityRegistry, hooks: Arc<dyn RoutingHooks>) -> Dispatcher {
        Dispatcher::new(
            Arc::new(capabilities),
            Arc::new(ProviderRegistry::with_defaults()),
            hooks,
        )
    }

    #[tokio::test]
    async fn success_reports_hooks_and_keeps_provider_healthy() {
        let mut capabilities = CapabilityRegistry::new();
        capabilities.register(TemplateResponder::new());
        let hooks = Arc::new(RecordingHooks::default());
        let dispatcher = dispatcher(capabilities, hooks.clone());

        let success = dispatcher
            .dispatch(ProviderId::FallbackLocal, &ProviderRequest::new("ping", "u1"))
            .await
            .expect("template never fails");

        assert_eq!(success.provider, ProviderId::FallbackLocal);
        assert_eq!(
            hooks.events.lock().expect("events lock").clone(),
            vec!["start:fallback_local:u1", "success:fallback_local"]
        );
    }

    #[tokio::test]
    async fn missing_capability_counts_as_a_failed_attempt() {
        let dispatcher = dispatcher(CapabilityRegistry::new(), Arc::new(NoopRoutingHooks));

        let error = dispatcher
            .dispatch(ProviderId::OllamaLocal, &ProviderRequest::new("hi", "u1"))
            .await
            .expect_err("nothing registered");

        assert_eq!(error.provider, ProviderId::OllamaLocal);
        assert_eq!(error.cause.kind, ProviderErrorKind::Unavailable);
        assert_eq!(
            dispatcher.registry.get(ProviderId::OllamaLocal).map(|s| s.error_count),
            Some(1)
        );
    }

    #[tokio::test]
    async fn panic_inside_capability_is_contained() {
        let mut capabilities = CapabilityRegistry::new();
        capabilities.register(Panicking);
        let hooks = Arc::new(RecordingHooks::default());
        let dispatcher = dispatcher(capabilities, hooks.clone());

        for _ in 0..3 {
            let error = dispatcher
                .dispatch(ProviderId::HuggingFaceLocal, &ProviderRequest::new("hi", "u1"))
                .await
                .expect_err("panics become errors");
            assert_eq!(error.cause.kind, ProviderErrorKind::Other);
        }

        let events = hooks.events.lock().expect("events lock").clone();
        assert!(events.contains(&"status:huggingface_local:error".to_string()));
        assert_eq!(
            dispatcher.registry.get(ProviderId::HuggingFaceLocal).map(|s| s.status),
            Some(ProviderStatus::Error)
        );
    }

    #[tokio::test]
    async fn panic_while_building_the_future_is_contained() {
        let mut capabilities = CapabilityRegistry::new();
        capabilities.register(EagerPanic);
        let hooks = Arc::new(RecordingHooks::default());
        let dispatcher = dispatcher(capabilities, hooks.clone());

        let error = dispatcher
            .dispatch(ProviderId::OllamaLocal, &ProviderRequest::new("hi", "u1"))
            .await
            .expect_err("eager panic becomes an error");

        assert_eq!(error.cause.kind, ProviderErrorKind::Other);
        assert_eq!(
            hooks.events.lock().expect("events lock").clone(),
            vec!["start:ollama_local:u1", "failure:ollama_local:Other"]
        );
        assert_eq!(
            dispatcher.registry.get(ProviderId::OllamaLocal).map(|s| s.error_count),
            Some(1)
        );
    }

    #[tokio::test]
    async fn exhausted_quota_fails_without_invoking_or_tripping_the_breaker() {
        let registry = ProviderRegistry::builder()
            .profile(
                ProviderId::OpenAiCloud,
                ProviderProfile::defaults_for(ProviderId::OpenAiCloud)
                    .with_rate_limit(RateLimit::per_minute(1)),
            )
            .clock(Arc::new(ManualClock::new()))
            .build()
            .expect("valid registry");
        let mut capabilities = CapabilityRegistry::new();
        capabilities.register(TemplateResponder::new().with_id(ProviderId::OpenAiCloud));
        let hooks = Arc::new(RecordingHooks::default());
        let dispatcher =
            Dispatcher::new(Arc::new(capabilities), Arc::new(registry), hooks.clone());
        let request = ProviderRequest::new("hi", "u1");

        dispatcher
            .dispatch(ProviderId::OpenAiCloud, &request)
            .await
            .expect("first call fits the quota");
        let error = dispatcher
            .dispatch(ProviderId::OpenAiCloud, &request)
            .await
            .expect_err("second call is over quota");

        assert_eq!(error.cause.kind, ProviderErrorKind::RateLimited);
        let snapshot = dispatcher
            .registry
            .get(ProviderId::OpenAiCloud)
            .expect("registered");
        assert_eq!(snapshot.error_count, 0);
        assert_eq!(snapshot.requests_remaining, Some(0));
        assert_eq!(
            hooks.events.lock().expect("events lock").clone(),
            vec![
                "start:openai_cloud:u1",
                "success:openai_cloud",
                "start:openai_cloud:u1",
                "failure:openai_cloud:RateLimited",
            ]
        );
    }

    #[tokio::test]
    async fn slow_capability_times_out() {
        let mut capabilities = CapabilityRegistry::new();
        capabilities.register(Stalled);
        let dispatcher = dispatcher(capabilities, Arc::new(NoopRoutingHooks))
            .with_timeout(Some(Duration::from_millis(20)));

        let error = dispatcher
            .dispatch(ProviderId::OpenAiCloud, &ProviderRequest::new("hi", "u1"))
            .await
            .expect_err("stalled call must time out");

        assert_eq!(error.cause.kind, ProviderErrorKind::Timeout);
        assert!(error.cause.retryable);
        assert_eq!(
            dispatcher
                .registry
                .get(ProviderId::OpenAiCloud)
                .and_then(|s| s.requests_remaining),
            Some(59)
        );
    }
}
