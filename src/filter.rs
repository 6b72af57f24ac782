//! The user's current dashboard selection.
//!
//! `FilterState` is a plain value: it is created with defaults, changed
//! through the toggle/select/clear methods, and handed to the aggregation
//! engine by reference. Nothing in it is shared or persisted.

use crate::models::{AgeGroup, Gender, HesitancyLevel, Region, VaccineType};
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FilterState {
    pub region: Option<Region>,
    pub vaccines: BTreeSet<VaccineType>,
    pub hesitancy: BTreeSet<HesitancyLevel>,
    pub genders: BTreeSet<Gender>,
    pub age_groups: BTreeSet<AgeGroup>,
}

impl Default for FilterState {
    /// All hesitancy levels selected, everything else empty.
    fn default() -> Self {
        Self {
            region: None,
            vaccines: BTreeSet::new(),
            hesitancy: HesitancyLevel::ALL.into_iter().collect(),
            genders: BTreeSet::new(),
            age_groups: BTreeSet::new(),
        }
    }
}

/// Insert `value` if absent, remove it if present.
fn toggle<T: Ord>(set: &mut BTreeSet<T>, value: T) {
    if !set.remove(&value) {
        set.insert(value);
    }
}

#[allow(dead_code)] // Selection API for interactive callers
impl FilterState {
    /// Set or clear the region filter.
    pub fn select_region(&mut self, region: Option<Region>) {
        self.region = region;
    }

    /// Select `region`, or deselect it if it is already the selected one.
    pub fn toggle_region(&mut self, region: Region) {
        self.region = match self.region {
            Some(current) if current == region => None,
            _ => Some(region),
        };
    }

    pub fn toggle_vaccine(&mut self, vaccine: VaccineType) {
        toggle(&mut self.vaccines, vaccine);
    }

    pub fn toggle_hesitancy(&mut self, level: HesitancyLevel) {
        toggle(&mut self.hesitancy, level);
    }

    pub fn toggle_gender(&mut self, gender: Gender) {
        toggle(&mut self.genders, gender);
    }

    pub fn toggle_age_group(&mut self, group: AgeGroup) {
        toggle(&mut self.age_groups, group);
    }

    pub fn clear_vaccines(&mut self) {
        self.vaccines.clear();
    }

    pub fn clear_genders(&mut self) {
        self.genders.clear();
    }

    pub fn clear_age_groups(&mut self) {
        self.age_groups.clear();
    }

    /// True when any gender or age group is selected.
    ///
    /// While this holds, the vaccine and region filters are disabled in
    /// the UI. They keep their values and come back once the demographic
    /// selection is cleared.
    pub fn demographics_active(&self) -> bool {
        !self.genders.is_empty() || !self.age_groups.is_empty()
    }

    pub fn vaccine_filter_enabled(&self) -> bool {
        !self.demographics_active()
    }

    pub fn region_filter_enabled(&self) -> bool {
        !self.demographics_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_selects_all_hesitancy() {
        let filter = FilterState::default();
        assert_eq!(filter.region, None);
        assert!(filter.vaccines.is_empty());
        assert_eq!(filter.hesitancy.len(), HesitancyLevel::ALL.len());
        assert!(filter.genders.is_empty());
        assert!(filter.age_groups.is_empty());
        assert!(!filter.demographics_active());
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut filter = FilterState::default();

        filter.toggle_hesitancy(HesitancyLevel::High);
        assert!(!filter.hesitancy.contains(&HesitancyLevel::High));
        filter.toggle_hesitancy(HesitancyLevel::High);
        assert!(filter.hesitancy.contains(&HesitancyLevel::High));

        filter.toggle_vaccine(VaccineType::Pfizer);
        filter.toggle_vaccine(VaccineType::Moderna);
        filter.toggle_vaccine(VaccineType::Pfizer);
        assert_eq!(
            filter.vaccines.iter().copied().collect::<Vec<_>>(),
            vec![VaccineType::Moderna]
        );
    }

    #[test]
    fn test_toggle_region() {
        let mut filter = FilterState::default();

        filter.toggle_region(Region::NorthEast);
        assert_eq!(filter.region, Some(Region::NorthEast));
        filter.toggle_region(Region::SouthWest);
        assert_eq!(filter.region, Some(Region::SouthWest));
        filter.toggle_region(Region::SouthWest);
        assert_eq!(filter.region, None);
    }

    #[test]
    fn test_demographics_disable_but_keep_other_filters() {
        let mut filter = FilterState::default();
        filter.select_region(Some(Region::GreaterLondon));
        filter.toggle_vaccine(VaccineType::MonkeyPox);

        filter.toggle_age_group(AgeGroup::Age60Plus);
        assert!(filter.demographics_active());
        assert!(!filter.vaccine_filter_enabled());
        assert!(!filter.region_filter_enabled());
        assert_eq!(filter.region, Some(Region::GreaterLondon));
        assert!(filter.vaccines.contains(&VaccineType::MonkeyPox));

        filter.clear_age_groups();
        assert!(filter.vaccine_filter_enabled());
    }

    #[test]
    fn test_clear_operations() {
        let mut filter = FilterState::default();
        filter.toggle_gender(Gender::Male);
        filter.toggle_gender(Gender::Female);
        filter.toggle_vaccine(VaccineType::AstraZenica);

        filter.clear_genders();
        filter.clear_vaccines();

        assert!(filter.genders.is_empty());
        assert!(filter.vaccines.is_empty());
        assert_eq!(filter.hesitancy.len(), 4);
    }
}
