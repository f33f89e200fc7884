//! Configuration types and path resolution for shopkeep.
//!
//! Shopkeep stores its settings as TOML at the platform's XDG config path
//! (e.g. `~/.config/shopkeep/config.toml` on Linux). A `shopkeep.toml` in the
//! project tree overrides it, and a few environment variables override both.
//! The loaded [`Config`] is read-only for the rest of the process.

mod loader;
mod paths;
mod resolve;
mod types;

pub use types::Config;

use anyhow::Result;

impl Config {
    /// Load config with precedence: environment > project > global > defaults.
    /// Creates default config file if none exists.
    pub fn load() -> Result<Self> {
        let global = Self::load_global()?;
        let project = Self::load_project()?;

        let mut config = global;
        if let Some(proj) = project {
            config = Self::merge(config, proj);
        }

        config.resolve_substitutions();
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }
}
