mod template;

#[cfg(feature = "simulated")]
mod simulated;

pub use template::TemplateResponder;

#[cfg(feature = "simulated")]
pub use simulated::{SimulatedProvider, contextual_response};
