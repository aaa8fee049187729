//! City -> resident aliens index.
//!
//! A derived cache over the live alien set, owned and mutated only by the
//! orchestrator. Invariant: every live alien appears exactly once, under the
//! city it stands on. Empty lists are dropped so the entry count equals the
//! number of occupied cities.

use std::collections::BTreeMap;

use crate::alien::AlienId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct OccupancyIndex {
    residents: BTreeMap<String, Vec<AlienId>>,
}

impl OccupancyIndex {
    /// Append `alien` to the residents of `city`.
    pub(crate) fn insert(&mut self, city: &str, alien: AlienId) {
        self.residents.entry(city.to_owned()).or_default().push(alien);
    }

    /// Remove `alien` from `city`. Returns whether it was there.
    pub(crate) fn remove(&mut self, city: &str, alien: AlienId) -> bool {
        let Some(list) = self.residents.get_mut(city) else {
            return false;
        };
        let before = list.len();
        list.retain(|id| *id != alien);
        let removed = list.len() != before;
        if list.is_empty() {
            self.residents.remove(city);
        }
        removed
    }

    /// Drop the entry for `city` and return its residents in arrival order.
    pub(crate) fn evict(&mut self, city: &str) -> Vec<AlienId> {
        self.residents.remove(city).unwrap_or_default()
    }

    /// Residents of `city` in arrival order.
    pub(crate) fn residents(&self, city: &str) -> &[AlienId] {
        self.residents.get(city).map_or(&[], Vec::as_slice)
    }

    /// Total residents across all cities.
    pub(crate) fn total(&self) -> usize {
        self.residents.values().map(Vec::len).sum()
    }

    /// Every `(city, alien)` pair.
    pub(crate) fn entries(&self) -> impl Iterator<Item = (&str, AlienId)> {
        self.residents
            .iter()
            .flat_map(|(city, ids)| ids.iter().map(move |id| (city.as_str(), *id)))
    }
}
