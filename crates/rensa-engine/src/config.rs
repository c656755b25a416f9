//! Engine configuration, adjustable at runtime through `setoption`.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use rensa_core::TableStore;

/// How moves that leave the opponent without a reply are ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyReplyPolicy {
    /// Rank them with a neutral policy of 500.
    #[default]
    Neutral,
    /// Leave them out of the tiers.
    Exclude,
}

impl EmptyReplyPolicy {
    /// Policy given to moves without replies under [`EmptyReplyPolicy::Neutral`].
    pub const NEUTRAL_POLICY: u16 = 500;

    /// Option value in USI `setoption` text.
    pub const fn name(self) -> &'static str {
        match self {
            EmptyReplyPolicy::Neutral => "neutral",
            EmptyReplyPolicy::Exclude => "exclude",
        }
    }
}

impl fmt::Display for EmptyReplyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for an unrecognized [`EmptyReplyPolicy`] name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown empty-reply policy \"{0}\" (expected neutral or exclude)")]
pub struct ParsePolicyError(pub String);

impl FromStr for EmptyReplyPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "neutral" => Ok(EmptyReplyPolicy::Neutral),
            "exclude" => Ok(EmptyReplyPolicy::Exclude),
            _ => Err(ParsePolicyError(s.to_string())),
        }
    }
}

/// Configuration knobs adjustable via `setoption`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Engine id embedded in table file names.
    pub engine_id: String,
    /// Directory holding the table files.
    pub data_dir: PathBuf,
    /// Number of tiers moves are bucketed into.
    pub ranking_resolution: usize,
    /// Ply cap for a single playout.
    pub max_playout_depth: usize,
    /// How far back from the end of a game learning walks.
    pub max_learn_plies: usize,
    /// Learning steps between saves of dirty tables (0 = only at the end).
    pub save_interval: usize,
    pub empty_reply: EmptyReplyPolicy,
    /// RNG seed, 0 for a seed from system entropy.
    pub seed: u64,
}

impl EngineConfig {
    pub const MIN_RESOLUTION: usize = 1;
    pub const MAX_RESOLUTION: usize = 1000;

    /// Where this configuration keeps its tables.
    pub fn table_store(&self) -> TableStore {
        TableStore::new(self.data_dir.clone(), self.engine_id.clone())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            engine_id: "rensa".to_string(),
            data_dir: PathBuf::from("."),
            ranking_resolution: 10,
            max_playout_depth: 256,
            max_learn_plies: 64,
            save_interval: 8,
            empty_reply: EmptyReplyPolicy::Neutral,
            seed: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EmptyReplyPolicy, EngineConfig};

    #[test]
    fn policy_names_roundtrip() {
        for policy in [EmptyReplyPolicy::Neutral, EmptyReplyPolicy::Exclude] {
            assert_eq!(policy.name().parse::<EmptyReplyPolicy>(), Ok(policy));
        }
        assert_eq!("Exclude".parse(), Ok(EmptyReplyPolicy::Exclude));
        assert!("skip".parse::<EmptyReplyPolicy>().is_err());
    }

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.ranking_resolution, 10);
        assert_eq!(config.empty_reply, EmptyReplyPolicy::Neutral);
        assert_eq!(config.table_store().engine_id(), "rensa");
    }
}
