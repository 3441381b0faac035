use serde::{Deserialize, Serialize};

/// Configuration for the lots module (`modules.lots`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LotsConfig {
    /// Upper bound on filter atoms per listing request.
    #[serde(default = "default_max_filter_atoms")]
    pub max_filter_atoms: usize,
}

impl Default for LotsConfig {
    fn default() -> Self {
        Self {
            max_filter_atoms: default_max_filter_atoms(),
        }
    }
}

fn default_max_filter_atoms() -> usize {
    64
}
