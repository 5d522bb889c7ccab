//! Routing strategy names and the shared, runtime-switchable handle.
//!
//! ```rust
//! use irouter::{RoutingStrategy, StrategyHandle};
//!
//! let handle = StrategyHandle::default();
//! assert_eq!(handle.get(), RoutingStrategy::Smart);
//!
//! handle.set_named("cost_first").expect("known strategy");
//! assert_eq!(handle.get(), RoutingStrategy::CostFirst);
//!
//! assert!(handle.set_named("fastest").is_err());
//! assert_eq!(handle.get(), RoutingStrategy::CostFirst);
//! ```

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::RouterError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingStrategy {
    #[default]
    Smart,
    CostFirst,
    SpeedFirst,
    QualityFirst,
    PriorityFirst,
}

impl RoutingStrategy {
    pub const ALL: [RoutingStrategy; 5] = [
        Self::Smart,
        Self::CostFirst,
        Self::SpeedFirst,
        Self::QualityFirst,
        Self::PriorityFirst,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Smart => "smart",
            Self::CostFirst => "cost_first",
            Self::SpeedFirst => "speed_first",
            Self::QualityFirst => "quality_first",
            Self::PriorityFirst => "priority_first",
        }
    }
}

impl Display for RoutingStrategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoutingStrategy {
    type Err = RouterError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");

        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == normalized)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|strategy| strategy.as_str()).collect();
                RouterError::invalid_strategy(format!(
                    "unknown routing strategy '{value}'; expected one of: {}",
                    known.join(", ")
                ))
            })
    }
}

/// Process-wide strategy shared between the coordinator and admin callers.
#[derive(Debug, Default)]
pub struct StrategyHandle {
    current: RwLock<RoutingStrategy>,
}

impl StrategyHandle {
    pub fn new(strategy: RoutingStrategy) -> Self {
        Self {
            current: RwLock::new(strategy),
        }
    }

    pub fn get(&self) -> RoutingStrategy {
        *self
            .current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns the strategy that was replaced.
    pub fn set(&self, strategy: RoutingStrategy) -> RoutingStrategy {
        let mut current = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::replace(&mut *current, strategy)
    }

    /// Parses before taking the lock, so a bad name leaves the strategy untouched.
    pub fn set_named(&self, name: &str) -> Result<RoutingStrategy, RouterError> {
        let strategy = name.parse::<RoutingStrategy>()?;
        Ok(self.set(strategy))
    }
}
