//! Console settings: defaults embedded from `yamls/console.yaml`, overlaid by
//! `<store>/config.yaml`, overlaid by environment variables.
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::agents::AgentCatalog;

pub mod constants;

use constants::{CONFIG_FILE, ENV_BASE_URL};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub base_url: String,
    /// Raw catalog data: agent type -> agent names, backend order.
    pub agents: HashMap<String, Vec<String>>,
    pub servers: ServerCommands,
    pub gallery: GallerySettings,
}

/// Commands passed to `/start_server` by the launcher shortcuts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerCommands {
    pub ngrok: String,
    pub midjourney: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GallerySettings {
    pub dir: String,
    pub patterns: Vec<String>,
    pub interval_ms: u64,
}

// ============================================================================
// Overrides (every key optional)
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SettingsOverride {
    base_url: Option<String>,
    agents: Option<HashMap<String, Vec<String>>>,
    servers: ServerOverride,
    gallery: GalleryOverride,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ServerOverride {
    ngrok: Option<String>,
    midjourney: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GalleryOverride {
    dir: Option<String>,
    patterns: Option<Vec<String>>,
    interval_ms: Option<u64>,
}

fn parse_yaml<T: for<'de> Deserialize<'de>>(name: &str, content: &str) -> T {
    serde_yaml::from_str(content).unwrap_or_else(|e| panic!("Failed to parse {}: {}", name, e))
}

/// Embedded at compile time.
pub static DEFAULTS: LazyLock<Settings> =
    LazyLock::new(|| parse_yaml("console.yaml", include_str!("../../../../yamls/console.yaml")));

impl Default for Settings {
    fn default() -> Self {
        DEFAULTS.clone()
    }
}

impl Settings {
    /// Defaults plus `<store_dir>/config.yaml` if present. A malformed file
    /// is reported and ignored.
    pub fn load(store_dir: &Path) -> Self {
        let mut settings = Self::default();
        let path = store_dir.join(CONFIG_FILE);
        match std::fs::read_to_string(&path) {
            Ok(content) => match settings.apply_yaml(&content) {
                Ok(()) => tracing::debug!(path = %path.display(), "loaded config overrides"),
                Err(e) => tracing::warn!(path = %path.display(), "ignoring malformed config: {}", e),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = %path.display(), "cannot read config: {}", e),
        }
        settings
    }

    /// Overlay keys present in `content` onto these settings.
    pub fn apply_yaml(&mut self, content: &str) -> Result<(), serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(());
        }
        let over: SettingsOverride = serde_yaml::from_str(content)?;
        if let Some(base_url) = over.base_url {
            self.base_url = base_url;
        }
        if let Some(agents) = over.agents {
            self.agents = agents;
        }
        if let Some(ngrok) = over.servers.ngrok {
            self.servers.ngrok = ngrok;
        }
        if let Some(midjourney) = over.servers.midjourney {
            self.servers.midjourney = midjourney;
        }
        if let Some(dir) = over.gallery.dir {
            self.gallery.dir = dir;
        }
        if let Some(patterns) = over.gallery.patterns {
            self.gallery.patterns = patterns;
        }
        if let Some(interval_ms) = over.gallery.interval_ms {
            self.gallery.interval_ms = interval_ms;
        }
        Ok(())
    }

    /// Apply environment overrides. `lookup` is `std::env::var` in practice.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_BASE_URL).filter(|u| !u.trim().is_empty()) {
            self.base_url = url.trim().to_string();
        }
    }

    pub fn catalog(&self) -> AgentCatalog {
        AgentCatalog::from_raw(&self.agents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::{AgentCategory, AgentName};

    #[test]
    fn embedded_defaults_parse() {
        let s = Settings::default();
        assert_eq!(s.base_url, "http://127.0.0.1:9229");
        assert_eq!(s.servers.ngrok, "ngrok http 9119");
        assert_eq!(s.gallery.interval_ms, 3000);
        assert_eq!(s.catalog(), AgentCatalog::default());
    }

    #[test]
    fn overlay_only_touches_given_keys() {
        let mut s = Settings::default();
        s.apply_yaml("base_url: http://admin:8000\ngallery:\n  interval_ms: 5000\n").unwrap();
        assert_eq!(s.base_url, "http://admin:8000");
        assert_eq!(s.gallery.interval_ms, 5000);
        assert_eq!(s.gallery.dir, DEFAULTS.gallery.dir);
        assert_eq!(s.servers, DEFAULTS.servers);
    }

    #[test]
    fn overlay_can_replace_catalog() {
        let mut s = Settings::default();
        s.apply_yaml("agents:\n  blog_artist_ai_agent: [prompt_artist]\n").unwrap();
        let catalog = s.catalog();
        assert_eq!(catalog.names(AgentCategory::Artist), &[AgentName::PromptArtist]);
        assert!(catalog.names(AgentCategory::Researcher).is_empty());
    }

    #[test]
    fn malformed_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "base_url: [unterminated").unwrap();
        assert_eq!(Settings::load(dir.path()), Settings::default());
    }

    #[test]
    fn missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Settings::load(dir.path()), Settings::default());
    }

    #[test]
    fn env_overrides_base_url() {
        let mut s = Settings::default();
        s.apply_env(|k| (k == ENV_BASE_URL).then(|| " http://remote:9229 ".to_string()));
        assert_eq!(s.base_url, "http://remote:9229");

        s.apply_env(|_| Some("   ".to_string()));
        assert_eq!(s.base_url, "http://remote:9229");
    }
}
