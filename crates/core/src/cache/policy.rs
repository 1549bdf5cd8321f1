//! Per-cache expiry and sizing policies.
//!
//! The table is built once at startup and never changes afterwards.

use std::collections::HashMap;
use std::time::Duration;

/// Single-date record lookups.
pub const RECORD_BY_DATE: &str = "wellcaData";
/// Date-range record listings.
pub const RECORD_RANGE: &str = "wellcaRangeData";
/// Service-type listings and monthly service revenue.
pub const SERVICE_DETAILS: &str = "serviceDetails";
/// Monthly, quarterly and weekly chart payloads.
pub const CHART_DATA: &str = "chartData";
pub const USER_PRODUCTIVITY: &str = "userProductivity";
pub const ALL_USER_PRODUCTIVITY: &str = "allUserProductivity";
pub const OVERALL_PRODUCTIVITY: &str = "overallProductivity";

/// Caches whose values are computed from daily records. Every record write
/// or delete clears all of them.
pub const DERIVED_CACHES: [&str; 4] = [RECORD_BY_DATE, RECORD_RANGE, SERVICE_DETAILS, CHART_DATA];

const DEFAULT_TTL_MINUTES: u64 = 30;
const DEFAULT_MAX_ENTRIES: usize = 100;
const DEFAULT_INITIAL_CAPACITY: usize = 10;

/// When an entry's time-to-live starts counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryMode {
    /// Measured from insertion; reads do not extend it.
    AfterWrite,
    /// Measured from the last read.
    AfterAccess,
}

/// Expiry and sizing for one named cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub expiry: ExpiryMode,
    pub ttl: Duration,
    /// Entries beyond this count are evicted least-recently-used first.
    pub max_entries: usize,
    pub initial_capacity: usize,
}

impl CachePolicy {
    /// Write-based expiry after `minutes`, holding at most `max_entries`.
    pub const fn expire_after_write(minutes: u64, max_entries: usize) -> Self {
        Self {
            expiry: ExpiryMode::AfterWrite,
            ttl: Duration::from_secs(minutes * 60),
            max_entries,
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
        }
    }

    /// Access-based expiry after `minutes`, holding at most `max_entries`.
    pub const fn expire_after_access(minutes: u64, max_entries: usize) -> Self {
        Self {
            expiry: ExpiryMode::AfterAccess,
            ttl: Duration::from_secs(minutes * 60),
            max_entries,
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
        }
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::expire_after_write(DEFAULT_TTL_MINUTES, DEFAULT_MAX_ENTRIES)
    }
}

/// Maps cache names to their policies. Unknown names get the default policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyTable {
    policies: HashMap<String, CachePolicy>,
    fallback: CachePolicy,
}

impl PolicyTable {
    /// Creates a table with the given fallback and no named entries.
    pub fn new(fallback: CachePolicy) -> Self {
        Self {
            policies: HashMap::new(),
            fallback,
        }
    }

    /// The production table.
    pub fn standard() -> Self {
        Self::new(CachePolicy::default())
            .with(RECORD_RANGE, CachePolicy::expire_after_write(15, 50))
            .with(SERVICE_DETAILS, CachePolicy::expire_after_write(60, 200))
            .with(USER_PRODUCTIVITY, CachePolicy::expire_after_access(20, 100))
            .with(RECORD_BY_DATE, CachePolicy::default())
            .with(ALL_USER_PRODUCTIVITY, CachePolicy::default())
            .with(OVERALL_PRODUCTIVITY, CachePolicy::default())
            .with(CHART_DATA, CachePolicy::default())
    }

    /// Adds or replaces the policy for a cache name.
    pub fn with(mut self, name: impl Into<String>, policy: CachePolicy) -> Self {
        self.policies.insert(name.into(), policy);
        self
    }

    /// Returns the policy for a cache name, falling back to the default.
    pub fn policy_for(&self, name: &str) -> CachePolicy {
        self.policies.get(name).copied().unwrap_or(self.fallback)
    }

    /// Iterates over the explicitly configured caches.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CachePolicy)> {
        self.policies.iter().map(|(name, policy)| (name.as_str(), policy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINUTE: u64 = 60;

    #[test]
    fn test_standard_table_values() {
        let table = PolicyTable::standard();

        let range = table.policy_for(RECORD_RANGE);
        assert_eq!(range.expiry, ExpiryMode::AfterWrite);
        assert_eq!(range.ttl, Duration::from_secs(15 * MINUTE));
        assert_eq!(range.max_entries, 50);

        let services = table.policy_for(SERVICE_DETAILS);
        assert_eq!(services.expiry, ExpiryMode::AfterWrite);
        assert_eq!(services.ttl, Duration::from_secs(60 * MINUTE));
        assert_eq!(services.max_entries, 200);

        let productivity = table.policy_for(USER_PRODUCTIVITY);
        assert_eq!(productivity.expiry, ExpiryMode::AfterAccess);
        assert_eq!(productivity.ttl, Duration::from_secs(20 * MINUTE));
        assert_eq!(productivity.max_entries, 100);

        for name in [
            RECORD_BY_DATE,
            ALL_USER_PRODUCTIVITY,
            OVERALL_PRODUCTIVITY,
            CHART_DATA,
        ] {
            let policy = table.policy_for(name);
            assert_eq!(policy.expiry, ExpiryMode::AfterWrite, "{name}");
            assert_eq!(policy.ttl, Duration::from_secs(30 * MINUTE), "{name}");
            assert_eq!(policy.max_entries, 100, "{name}");
            assert_eq!(policy.initial_capacity, 10, "{name}");
        }

        assert_eq!(table.iter().count(), 7);
    }

    #[test]
    fn test_unknown_name_falls_back_to_default() {
        let table = PolicyTable::standard();
        let policy = table.policy_for("somethingElse");

        assert_eq!(policy, CachePolicy::default());
        assert_eq!(policy.ttl, Duration::from_secs(30 * MINUTE));
        assert_eq!(policy.max_entries, 100);
        assert_eq!(policy.initial_capacity, 10);
    }

    #[test]
    fn test_derived_caches() {
        for name in [RECORD_BY_DATE, RECORD_RANGE, SERVICE_DETAILS, CHART_DATA] {
            assert!(DERIVED_CACHES.contains(&name), "{name}");
        }
        for name in [USER_PRODUCTIVITY, ALL_USER_PRODUCTIVITY, OVERALL_PRODUCTIVITY] {
            assert!(!DERIVED_CACHES.contains(&name), "{name}");
        }
    }
}
