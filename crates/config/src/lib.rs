//! Configuration for the metadata resolution engine.
//!
//! The host application surfaces these knobs through its own settings UI
//! and hands the engine a populated [`Settings`]; [`Settings::load`] exists
//! for hosts (and tests) that prefer environment-driven configuration.
//! Nothing here persists state: settings are read at construction time and
//! baked into the resolver and fetcher.

pub mod error;

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Serialized};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Environment variable prefix recognized by [`Settings::load`].
pub const ENV_PREFIX: &str = "DOUBAN_MD_";

/// Engine tunables, with the design defaults baked into [`Default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Minimum top-candidate score at which a search query's best hit is
    /// accepted without trying the fallback queries. Range [0, 1].
    pub acceptance_threshold: f32,
    /// Minimum score for the best-across-all-queries candidate to be used
    /// at all; below this the resolution reports no match. Range [0, 1].
    pub min_viability_floor: f32,
    /// Maximum age of a cached response before re-fetching.
    pub cache_ttl_seconds: u64,
    /// Maximum number of cached responses held in memory.
    pub cache_capacity: usize,
    /// Minimum spacing between outgoing requests to the site.
    pub min_request_interval_millis: u64,
    /// Deadline for a single fetch exchange.
    pub fetch_timeout_millis: u64,
    /// Redirect hop budget per fetch.
    pub max_redirects: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            acceptance_threshold: 0.4,
            min_viability_floor: 0.2,
            cache_ttl_seconds: 600,
            cache_capacity: 500,
            min_request_interval_millis: 1000,
            fetch_timeout_millis: 30_000,
            max_redirects: 5,
        }
    }
}

impl Settings {
    /// The figment backing [`load`](Self::load): defaults, overridden by
    /// `DOUBAN_MD_*` environment variables.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Settings::default())).merge(Env::prefixed(ENV_PREFIX))
    }

    /// Load and validate settings from defaults + environment.
    #[instrument]
    pub fn load() -> Result<Self> {
        let settings: Settings = Self::figment().extract().or_raise(|| ErrorKind::Load)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Range-check the settings; called by [`load`](Self::load), and worth
    /// calling on host-assembled values too.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.acceptance_threshold) {
            exn::bail!(ErrorKind::Invalid {
                field: "acceptance_threshold",
                reason: format!("{} is outside [0, 1]", self.acceptance_threshold),
            });
        }
        if !(0.0..=1.0).contains(&self.min_viability_floor) {
            exn::bail!(ErrorKind::Invalid {
                field: "min_viability_floor",
                reason: format!("{} is outside [0, 1]", self.min_viability_floor),
            });
        }
        if self.min_viability_floor > self.acceptance_threshold {
            exn::bail!(ErrorKind::Invalid {
                field: "min_viability_floor",
                reason: format!(
                    "floor {} exceeds acceptance threshold {}",
                    self.min_viability_floor, self.acceptance_threshold
                ),
            });
        }
        if self.fetch_timeout_millis == 0 {
            exn::bail!(ErrorKind::Invalid {
                field: "fetch_timeout_millis",
                reason: "must be nonzero".to_string(),
            });
        }
        Ok(())
    }
}
