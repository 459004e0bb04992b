// Bundled fallback data.
// Shown by callers when the upstream is down and nothing was ever cached.

use crate::github::{AggregateStats, Contributor};

/// Static contributor list and stats compiled into the binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackDataset {
    pub contributors: Vec<Contributor>,
    pub stats: AggregateStats,
}

impl FallbackDataset {
    /// The dataset shipped with this build.
    pub fn bundled() -> Self {
        Self {
            contributors: vec![Contributor {
                id: 0,
                login: "maintainers".to_string(),
                avatar_url: "https://github.com/identicons/maintainers.png".to_string(),
                html_url: "https://github.com".to_string(),
                contributions: 1,
            }],
            stats: AggregateStats {
                stars: 0,
                forks: 0,
                contributors: 1,
                commits: 1,
                issues: 0,
            },
        }
    }
}

impl Default for FallbackDataset {
    fn default() -> Self {
        Self::bundled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_stats_match_contributors() {
        let dataset = FallbackDataset::bundled();
        assert_eq!(dataset.contributors.len(), 1);
        assert_eq!(dataset.stats.contributors, dataset.contributors.len() as u64);
        assert_eq!(
            dataset.stats.commits,
            dataset.contributors.iter().map(|c| c.contributions).sum::<u64>()
        );
    }
}
