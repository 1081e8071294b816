//! YAML seed files for the in-memory store.
//!
//! ```yaml
//! rules:
//!   - campaign_id: spotify
//!     rules:
//!       - dimension: app
//!         include: [com.spotify]
//!       - dimension: country
//!         include: [us, in]
//! campaigns:
//!   - campaign_id: spotify
//!     name: Spotify
//!     image: https://example.com/images/spotify.png
//!     cta: Download
//!     status: ACTIVE
//! ```

use std::path::Path;

use delivery_core::{Campaign, Dimension, Rule, TargetingRule};
use serde::{Deserialize, Serialize};

use crate::error::SeedError;

/// Rules and campaigns loaded from a seed file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub rules: Vec<TargetingRule>,
    #[serde(default)]
    pub campaigns: Vec<Campaign>,
}

impl SeedData {
    /// Reads and parses a seed file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_yaml_str(&content)
    }

    /// Parses seed YAML.
    ///
    /// Every targeting document ends up with a rule per dimension: missing
    /// dimensions get an unconstrained rule.
    pub fn from_yaml_str(content: &str) -> Result<Self, SeedError> {
        let mut seed: SeedData = serde_yaml::from_str(content)?;
        for rule in &mut seed.rules {
            fill_missing_dimensions(rule);
        }
        Ok(seed)
    }
}

fn fill_missing_dimensions(rule: &mut TargetingRule) {
    for dimension in Dimension::ALL {
        if rule.rules_for(dimension.as_str()).next().is_none() {
            rule.rules.push(Rule::unconstrained(dimension.as_str()));
        }
    }
}
