//! Production-friendly observability hooks for routing and dispatch.
//!
//! ```rust
//! use iobserve::{FanoutRoutingHooks, MetricsRoutingHooks, SafeRoutingHooks, TracingRoutingHooks};
//! use irouter::RoutingHooks;
//!
//! fn accepts_routing_hooks(_hooks: &dyn RoutingHooks) {}
//!
//! let hooks = SafeRoutingHooks::new(FanoutRoutingHooks::new(
//!     TracingRoutingHooks,
//!     MetricsRoutingHooks,
//! ));
//! accepts_routing_hooks(&hooks);
//! ```

mod fanout;
mod metrics_hooks;
mod safe_hooks;
mod tracing_hooks;

pub use fanout::FanoutRoutingHooks;
pub use metrics_hooks::MetricsRoutingHooks;
pub use safe_hooks::SafeRoutingHooks;
pub use tracing_hooks::TracingRoutingHooks;

pub mod prelude {
    pub use crate::{FanoutRoutingHooks, MetricsRoutingHooks, SafeRoutingHooks, TracingRoutingHooks};
}
