// src/filter/evaluate.rs

use crate::domain::{CboProfile, OrganizationRecord};
use crate::filter::selection::{DietaryTag, FilterSelection, OtherFlag};

/// Returns the records matching every active dimension of `selection`,
/// in dataset order. Dimensions combine by AND; within a set dimension a
/// single match is enough. Total over any dataset, including an empty one.
pub fn evaluate(dataset: &[OrganizationRecord], selection: &FilterSelection) -> Vec<OrganizationRecord> {
    let compiled = CompiledFilter::new(selection);
    dataset
        .iter()
        .filter(|record| compiled.matches(record))
        .cloned()
        .collect()
}

/// Same conjunction as [`evaluate`], counting only. Used to preview a
/// selection that has not been committed yet.
pub fn preview_count(dataset: &[OrganizationRecord], selection: &FilterSelection) -> usize {
    let compiled = CompiledFilter::new(selection);
    dataset.iter().filter(|record| compiled.matches(record)).count()
}

pub fn matches(record: &OrganizationRecord, selection: &FilterSelection) -> bool {
    CompiledFilter::new(selection).matches(record)
}

// Lower-cased copies of the free-text inputs, built once per evaluation.
struct CompiledFilter<'a> {
    selection: &'a FilterSelection,
    cuisines: Vec<String>,
    search: Option<String>,
}

impl<'a> CompiledFilter<'a> {
    fn new(selection: &'a FilterSelection) -> Self {
        Self {
            selection,
            cuisines: selection.cuisines().iter().map(|c| c.to_lowercase()).collect(),
            search: selection.search_term().map(str::to_lowercase),
        }
    }

    // Steps run in a fixed order; each one is a pure filter.
    fn matches(&self, record: &OrganizationRecord) -> bool {
        self.in_region(record)
            && self.in_boroughs(record)
            && self.in_congressional_districts(record)
            && self.in_city_council_districts(record)
            && self.has_dietary_tag(record)
            && self.within_poverty_threshold(record)
            && self.has_cuisine(record)
            && self.flags_hold(record)
            && self.type_matches(record)
            && self.name_matches(record)
    }

    fn in_region(&self, record: &OrganizationRecord) -> bool {
        let region = self.selection.region();
        match record.borough {
            Some(borough) => region.boroughs().contains(&borough),
            // No borough on file: primary region keeps it, other regions
            // match on the city name instead.
            None if region.is_primary() => true,
            None => record
                .address
                .city
                .as_deref()
                .is_some_and(|city| city.trim().eq_ignore_ascii_case(region.label())),
        }
    }

    fn in_boroughs(&self, record: &OrganizationRecord) -> bool {
        let boroughs = self.selection.boroughs();
        boroughs.is_empty() || record.borough.is_some_and(|b| boroughs.contains(&b))
    }

    fn in_congressional_districts(&self, record: &OrganizationRecord) -> bool {
        let wanted = self.selection.congressional_districts();
        wanted.is_empty()
            || cbo(record)
                .and_then(|p| p.congressional_district.as_ref())
                .is_some_and(|d| wanted.contains(d))
    }

    fn in_city_council_districts(&self, record: &OrganizationRecord) -> bool {
        let wanted = self.selection.city_council_districts();
        wanted.is_empty()
            || cbo(record)
                .and_then(|p| p.city_council_district.as_ref())
                .is_some_and(|d| wanted.contains(d))
    }

    fn has_dietary_tag(&self, record: &OrganizationRecord) -> bool {
        let wanted = self.selection.dietary_tags();
        if wanted.is_empty() {
            return true;
        }
        cbo(record).is_some_and(|p| {
            p.dietary_tags()
                .any(|tag| wanted.iter().any(|w| dietary_matches(*w, tag)))
        })
    }

    // A missing percentage never passes once a threshold is set.
    fn within_poverty_threshold(&self, record: &OrganizationRecord) -> bool {
        let threshold = self.selection.poverty_threshold().percent();
        if threshold == 0 {
            return true;
        }
        cbo(record)
            .and_then(|p| p.percent_below_poverty_served)
            .is_some_and(|pct| pct <= f64::from(threshold))
    }

    fn has_cuisine(&self, record: &OrganizationRecord) -> bool {
        if self.cuisines.is_empty() {
            return true;
        }
        cbo(record).is_some_and(|p| {
            p.cuisines()
                .any(|c| self.cuisines.iter().any(|w| c.to_lowercase() == *w))
        })
    }

    fn flags_hold(&self, record: &OrganizationRecord) -> bool {
        self.selection
            .other_flags()
            .iter()
            .all(|flag| flag_holds(*flag, cbo(record)))
    }

    fn type_matches(&self, record: &OrganizationRecord) -> bool {
        self.selection
            .org_type()
            .map_or(true, |wanted| record.org_type() == wanted)
    }

    fn name_matches(&self, record: &OrganizationRecord) -> bool {
        self.search
            .as_deref()
            .map_or(true, |q| record.name.to_lowercase().contains(q))
    }
}

fn cbo(record: &OrganizationRecord) -> Option<&CboProfile> {
    record.cbo()
}

fn dietary_matches(wanted: DietaryTag, tag: &str) -> bool {
    tag.to_lowercase()
        .contains(&wanted.label().to_lowercase())
}

// Flags test for "present and equal"; an absent value fails every flag.
fn flag_holds(flag: OtherFlag, profile: Option<&CboProfile>) -> bool {
    let Some(profile) = profile else {
        return false;
    };
    match flag {
        OtherFlag::ServesMinors => profile.program_serving_minors == Some(true),
        OtherFlag::SelectiveDistribution => profile.open_distribution == Some(false),
        OtherFlag::OpenDistribution => profile.open_distribution == Some(true),
        OtherFlag::VolunteerOpportunities => profile.volunteer_opportunities == Some(true),
    }
}
