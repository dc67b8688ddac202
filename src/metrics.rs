//! Metric name <-> id mapping.
//!
//! Archived report rows store metrics under small integer ids while API callers ask
//! for them by name. The [`MetricRegistry`] translates between the two and names the
//! metric to fall back on when a requested column is unavailable. It is immutable
//! once built and is handed to the sort engine explicitly.

use crate::core::{ColumnKey, MetricId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

pub const NB_UNIQ_VISITORS: MetricId = 1;
pub const NB_VISITS: MetricId = 2;
pub const NB_ACTIONS: MetricId = 3;
pub const MAX_ACTIONS: MetricId = 4;
pub const SUM_VISIT_LENGTH: MetricId = 5;
pub const BOUNCE_COUNT: MetricId = 6;
pub const NB_VISITS_CONVERTED: MetricId = 7;
pub const NB_CONVERSIONS: MetricId = 8;
pub const REVENUE: MetricId = 9;
pub const GOALS: MetricId = 10;
pub const SUM_DAILY_NB_UNIQ_VISITORS: MetricId = 11;
pub const NB_HITS: MetricId = 12;
pub const SUM_TIME_SPENT: MetricId = 13;

const STANDARD_METRICS: &[(&str, MetricId)] = &[
    ("nb_uniq_visitors", NB_UNIQ_VISITORS),
    ("nb_visits", NB_VISITS),
    ("nb_actions", NB_ACTIONS),
    ("max_actions", MAX_ACTIONS),
    ("sum_visit_length", SUM_VISIT_LENGTH),
    ("bounce_count", BOUNCE_COUNT),
    ("nb_visits_converted", NB_VISITS_CONVERTED),
    ("nb_conversions", NB_CONVERSIONS),
    ("revenue", REVENUE),
    ("goals", GOALS),
    ("sum_daily_nb_uniq_visitors", SUM_DAILY_NB_UNIQ_VISITORS),
    ("nb_hits", NB_HITS),
    ("sum_time_spent", SUM_TIME_SPENT),
];

/// Read-only metric lookup shared by every sort call.
///
/// Deserializes from `{"metrics": {"nb_visits": 2, ...}, "default_metric": 2}`;
/// `default_metric` may be omitted and defaults to [`NB_VISITS`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RegistryConfig", into = "RegistryConfig")]
pub struct MetricRegistry {
    by_name: BTreeMap<String, MetricId>,
    by_id: HashMap<MetricId, String>,
    default_metric: MetricId,
}

/// Serialized form of a [`MetricRegistry`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegistryConfig {
    pub metrics: BTreeMap<String, MetricId>,
    #[serde(default = "default_metric")]
    pub default_metric: MetricId,
}

fn default_metric() -> MetricId {
    NB_VISITS
}

impl From<RegistryConfig> for MetricRegistry {
    fn from(config: RegistryConfig) -> Self {
        config
            .metrics
            .into_iter()
            .fold(MetricRegistry::empty(config.default_metric), |registry, (name, id)| {
                registry.with_metric(name, id)
            })
    }
}

impl From<MetricRegistry> for RegistryConfig {
    fn from(registry: MetricRegistry) -> Self {
        RegistryConfig {
            metrics: registry.by_name,
            default_metric: registry.default_metric,
        }
    }
}

impl Default for MetricRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl MetricRegistry {
    /// Registry with no metrics and the given fallback metric id.
    pub fn empty(default_metric: MetricId) -> Self {
        Self {
            by_name: BTreeMap::new(),
            by_id: HashMap::new(),
            default_metric,
        }
    }

    /// The core visit metrics, falling back on `nb_visits`.
    pub fn standard() -> Self {
        STANDARD_METRICS
            .iter()
            .fold(Self::empty(NB_VISITS), |registry, &(name, id)| {
                registry.with_metric(name, id)
            })
    }

    /// Adds or replaces a metric. The mapping stays one-to-one: re-registering a
    /// name or an id drops its previous pairing.
    pub fn with_metric(mut self, name: impl Into<String>, id: MetricId) -> Self {
        let name = name.into();
        if let Some(previous_id) = self.by_name.insert(name.clone(), id) {
            if previous_id != id {
                self.by_id.remove(&previous_id);
            }
        }
        if let Some(previous_name) = self.by_id.insert(id, name.clone()) {
            if previous_name != name {
                self.by_name.remove(&previous_name);
            }
        }
        self
    }

    pub fn id_of(&self, name: &str) -> Option<MetricId> {
        self.by_name.get(name).copied()
    }

    pub fn name_of(&self, id: MetricId) -> Option<&str> {
        self.by_id.get(&id).map(String::as_str)
    }

    pub fn default_metric(&self) -> MetricId {
        self.default_metric
    }

    /// The other spelling of `key`: the id for a known name, the name for a known id.
    pub fn counterpart(&self, key: &ColumnKey) -> Option<ColumnKey> {
        match key {
            ColumnKey::Name(name) => self.id_of(name).map(ColumnKey::Metric),
            ColumnKey::Metric(id) => self.name_of(*id).map(ColumnKey::from),
        }
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_maps_both_ways() {
        let registry = MetricRegistry::standard();
        assert_eq!(registry.id_of("nb_visits"), Some(NB_VISITS));
        assert_eq!(registry.name_of(NB_ACTIONS), Some("nb_actions"));
        assert_eq!(registry.default_metric(), NB_VISITS);
        assert_eq!(
            registry.counterpart(&ColumnKey::from("revenue")),
            Some(ColumnKey::Metric(REVENUE))
        );
        assert_eq!(registry.counterpart(&ColumnKey::Metric(999)), None);
    }

    #[test]
    fn reregistering_a_name_drops_the_old_id() {
        let registry = MetricRegistry::empty(1)
            .with_metric("hits", 1)
            .with_metric("hits", 5);
        assert_eq!(registry.id_of("hits"), Some(5));
        assert_eq!(registry.name_of(1), None);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn deserializes_from_config() {
        let registry: MetricRegistry =
            serde_json::from_str(r#"{"metrics": {"nb_plays": 40, "nb_visits": 2}}"#).unwrap();
        assert_eq!(registry.id_of("nb_plays"), Some(40));
        assert_eq!(registry.name_of(2), Some("nb_visits"));
        assert_eq!(registry.default_metric(), NB_VISITS);

        let json = serde_json::to_string(&registry).unwrap();
        let back: MetricRegistry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, registry);
    }
}
