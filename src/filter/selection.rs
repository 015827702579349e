// src/filter/selection.rs

use crate::domain::{canonical_district, Borough, OrgType};
use crate::errors::FilterError;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Region {
    #[default]
    Nyc,
    Miami,
    Chicago,
}

impl Region {
    pub const ALL: [Region; 3] = [Region::Nyc, Region::Miami, Region::Chicago];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "nyc" | "new york" | "new york city" => Some(Region::Nyc),
            "miami" => Some(Region::Miami),
            "chicago" => Some(Region::Chicago),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Region::Nyc => "New York City",
            Region::Miami => "Miami",
            Region::Chicago => "Chicago",
        }
    }

    pub fn is_primary(&self) -> bool {
        *self == Region::Nyc
    }

    /// Only the primary region is divided into boroughs.
    pub fn boroughs(&self) -> &'static [Borough] {
        match self {
            Region::Nyc => &Borough::ALL,
            Region::Miami | Region::Chicago => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DietaryTag {
    Halal,
    Kosher,
}

impl DietaryTag {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "halal" => Some(DietaryTag::Halal),
            "kosher" => Some(DietaryTag::Kosher),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DietaryTag::Halal => "Halal",
            DietaryTag::Kosher => "Kosher",
        }
    }
}

/// Named boolean toggles, each with its own predicate over the CBO profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OtherFlag {
    ServesMinors,
    SelectiveDistribution,
    OpenDistribution,
    VolunteerOpportunities,
}

impl OtherFlag {
    pub fn parse(raw: &str) -> Option<Self> {
        let key: String = raw
            .trim()
            .to_ascii_lowercase()
            .chars()
            .map(|c| if c == ' ' || c == '_' { '-' } else { c })
            .collect();
        match key.as_str() {
            "serves-minors" | "serves-youth" => Some(OtherFlag::ServesMinors),
            "selective-distribution" => Some(OtherFlag::SelectiveDistribution),
            "open-distribution" => Some(OtherFlag::OpenDistribution),
            "volunteer-opportunities" => Some(OtherFlag::VolunteerOpportunities),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum PovertyThreshold {
    #[default]
    Off,
    Upto25,
    Upto50,
    Upto75,
    Upto100,
}

impl PovertyThreshold {
    pub const ALL: [PovertyThreshold; 5] = [
        PovertyThreshold::Off,
        PovertyThreshold::Upto25,
        PovertyThreshold::Upto50,
        PovertyThreshold::Upto75,
        PovertyThreshold::Upto100,
    ];

    pub fn from_percent(percent: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.percent() == percent)
    }

    pub fn percent(&self) -> u8 {
        match self {
            PovertyThreshold::Off => 0,
            PovertyThreshold::Upto25 => 25,
            PovertyThreshold::Upto50 => 50,
            PovertyThreshold::Upto75 => 75,
            PovertyThreshold::Upto100 => 100,
        }
    }
}

const CONGRESSIONAL_DISTRICTS: u32 = 26;
const CITY_COUNCIL_DISTRICTS: u32 = 51;

/// The dimensions `apply_filter` understands, keyed by the names the UI sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Region,
    Borough,
    CongressionalDistrict,
    CityCouncilDistrict,
    Dietary,
    Cuisine,
    Flag,
    Poverty,
    OrgType,
}

impl Dimension {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "region" => Some(Dimension::Region),
            "borough" | "boroughs" => Some(Dimension::Borough),
            "congressional" | "congressional_district" => Some(Dimension::CongressionalDistrict),
            "council" | "city_council_district" => Some(Dimension::CityCouncilDistrict),
            "dietary" => Some(Dimension::Dietary),
            "cuisine" => Some(Dimension::Cuisine),
            "flag" => Some(Dimension::Flag),
            "poverty" => Some(Dimension::Poverty),
            "type" | "org_type" => Some(Dimension::OrgType),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Dimension::Region => "region",
            Dimension::Borough => "borough",
            Dimension::CongressionalDistrict => "congressional district",
            Dimension::CityCouncilDistrict => "city council district",
            Dimension::Dietary => "dietary",
            Dimension::Cuisine => "cuisine",
            Dimension::Flag => "flag",
            Dimension::Poverty => "poverty threshold",
            Dimension::OrgType => "organization type",
        }
    }
}

/// Typed updates. Toggles flip membership; `Set*` replace a dimension
/// wholesale (a modal committing several choices at once).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterUpdate {
    Region(Region),
    ToggleBorough(Borough),
    SetBoroughs(BTreeSet<Borough>),
    ToggleCongressionalDistrict(String),
    SetCongressionalDistricts(BTreeSet<String>),
    ToggleCityCouncilDistrict(String),
    SetCityCouncilDistricts(BTreeSet<String>),
    ToggleDietary(DietaryTag),
    SetDietary(BTreeSet<DietaryTag>),
    ToggleCuisine(String),
    SetCuisines(BTreeSet<String>),
    ToggleFlag(OtherFlag),
    SetFlags(BTreeSet<OtherFlag>),
    /// Selecting the active type clears it.
    OrgType(OrgType),
    Poverty(PovertyThreshold),
}

/// Every user-controlled filter input. Fields are only reachable through
/// validated updates, so a selection never holds an out-of-vocabulary value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    region: Region,
    boroughs: BTreeSet<Borough>,
    congressional_districts: BTreeSet<String>,
    city_council_districts: BTreeSet<String>,
    dietary_tags: BTreeSet<DietaryTag>,
    cuisines: BTreeSet<String>,
    other_flags: BTreeSet<OtherFlag>,
    poverty_threshold: PovertyThreshold,
    org_type: Option<OrgType>,
    search_query: String,
}

impl FilterSelection {
    pub fn region(&self) -> Region {
        self.region
    }

    pub fn boroughs(&self) -> &BTreeSet<Borough> {
        &self.boroughs
    }

    pub fn congressional_districts(&self) -> &BTreeSet<String> {
        &self.congressional_districts
    }

    pub fn city_council_districts(&self) -> &BTreeSet<String> {
        &self.city_council_districts
    }

    pub fn dietary_tags(&self) -> &BTreeSet<DietaryTag> {
        &self.dietary_tags
    }

    pub fn cuisines(&self) -> &BTreeSet<String> {
        &self.cuisines
    }

    pub fn other_flags(&self) -> &BTreeSet<OtherFlag> {
        &self.other_flags
    }

    pub fn poverty_threshold(&self) -> PovertyThreshold {
        self.poverty_threshold
    }

    pub fn org_type(&self) -> Option<OrgType> {
        self.org_type
    }

    /// Raw text as typed.
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Trimmed query, `None` when blank.
    pub fn search_term(&self) -> Option<&str> {
        Some(self.search_query.trim()).filter(|q| !q.is_empty())
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    /// True when any dimension other than the search text differs from its default.
    pub fn has_active_dimensions(&self) -> bool {
        let defaults = FilterSelection::default();
        self.region != defaults.region
            || !self.boroughs.is_empty()
            || !self.congressional_districts.is_empty()
            || !self.city_council_districts.is_empty()
            || !self.dietary_tags.is_empty()
            || !self.cuisines.is_empty()
            || !self.other_flags.is_empty()
            || self.poverty_threshold != defaults.poverty_threshold
            || self.org_type.is_some()
    }

    pub fn reset(&mut self) {
        *self = FilterSelection::default();
    }

    /// Resets everything except the organization type and the search text.
    pub fn clear_keeping_type_and_search(&mut self) {
        let org_type = self.org_type;
        let search_query = std::mem::take(&mut self.search_query);
        *self = FilterSelection {
            org_type,
            search_query,
            ..FilterSelection::default()
        };
    }

    /// Copies the dimensions the filter modal owns from `draft`; type and
    /// search stay as they are.
    pub fn adopt_modal_dimensions(&mut self, draft: &FilterSelection) {
        self.region = draft.region;
        self.boroughs = draft.boroughs.clone();
        self.congressional_districts = draft.congressional_districts.clone();
        self.city_council_districts = draft.city_council_districts.clone();
        self.dietary_tags = draft.dietary_tags.clone();
        self.cuisines = draft.cuisines.clone();
        self.other_flags = draft.other_flags.clone();
        self.poverty_threshold = draft.poverty_threshold;
    }

    /// Applies a raw UI value to one dimension. Unknown values are rejected
    /// and the selection is left unchanged. For boroughs, `All` clears the set.
    pub fn apply_filter(&mut self, dimension: Dimension, value: &str) -> Result<(), FilterError> {
        let unknown = || FilterError::UnknownValue {
            dimension: dimension.name(),
            value: value.to_string(),
        };

        let update = match dimension {
            Dimension::Region => FilterUpdate::Region(Region::parse(value).ok_or_else(unknown)?),
            Dimension::Borough if value.trim().eq_ignore_ascii_case("all") => {
                FilterUpdate::SetBoroughs(BTreeSet::new())
            }
            Dimension::Borough => {
                FilterUpdate::ToggleBorough(Borough::parse(value).ok_or_else(unknown)?)
            }
            Dimension::CongressionalDistrict => {
                FilterUpdate::ToggleCongressionalDistrict(value.to_string())
            }
            Dimension::CityCouncilDistrict => {
                FilterUpdate::ToggleCityCouncilDistrict(value.to_string())
            }
            Dimension::Dietary => {
                FilterUpdate::ToggleDietary(DietaryTag::parse(value).ok_or_else(unknown)?)
            }
            Dimension::Cuisine => FilterUpdate::ToggleCuisine(value.to_string()),
            Dimension::Flag => FilterUpdate::ToggleFlag(OtherFlag::parse(value).ok_or_else(unknown)?),
            Dimension::Poverty => {
                let percent = value.trim().parse::<u8>().map_err(|_| unknown())?;
                FilterUpdate::Poverty(PovertyThreshold::from_percent(percent).ok_or_else(unknown)?)
            }
            Dimension::OrgType => FilterUpdate::OrgType(OrgType::parse(value).ok_or_else(unknown)?),
        };

        self.update(update)
    }

    pub fn update(&mut self, update: FilterUpdate) -> Result<(), FilterError> {
        match update {
            FilterUpdate::Region(region) => {
                self.region = region;
                if !region.is_primary() {
                    self.boroughs.clear();
                    self.congressional_districts.clear();
                    self.city_council_districts.clear();
                }
            }
            FilterUpdate::ToggleBorough(borough) => {
                self.require_primary_region(Dimension::Borough)?;
                toggle(&mut self.boroughs, borough);
            }
            FilterUpdate::SetBoroughs(boroughs) => {
                if !boroughs.is_empty() {
                    self.require_primary_region(Dimension::Borough)?;
                }
                self.boroughs = boroughs;
            }
            FilterUpdate::ToggleCongressionalDistrict(raw) => {
                let id = self.district(Dimension::CongressionalDistrict, &raw)?;
                toggle(&mut self.congressional_districts, id);
            }
            FilterUpdate::SetCongressionalDistricts(raw) => {
                self.congressional_districts =
                    self.districts(Dimension::CongressionalDistrict, raw)?;
            }
            FilterUpdate::ToggleCityCouncilDistrict(raw) => {
                let id = self.district(Dimension::CityCouncilDistrict, &raw)?;
                toggle(&mut self.city_council_districts, id);
            }
            FilterUpdate::SetCityCouncilDistricts(raw) => {
                self.city_council_districts = self.districts(Dimension::CityCouncilDistrict, raw)?;
            }
            FilterUpdate::ToggleDietary(tag) => toggle(&mut self.dietary_tags, tag),
            FilterUpdate::SetDietary(tags) => self.dietary_tags = tags,
            FilterUpdate::ToggleCuisine(raw) => {
                let wanted = cuisine(&raw)?;
                let existing = self
                    .cuisines
                    .iter()
                    .find(|c| c.eq_ignore_ascii_case(&wanted))
                    .cloned();
                match existing {
                    Some(existing) => {
                        self.cuisines.remove(&existing);
                    }
                    None => {
                        self.cuisines.insert(wanted);
                    }
                }
            }
            FilterUpdate::SetCuisines(raw) => {
                let mut cuisines: BTreeSet<String> = BTreeSet::new();
                for entry in raw {
                    let entry = cuisine(&entry)?;
                    if !cuisines.iter().any(|c| c.eq_ignore_ascii_case(&entry)) {
                        cuisines.insert(entry);
                    }
                }
                self.cuisines = cuisines;
            }
            FilterUpdate::ToggleFlag(flag) => toggle(&mut self.other_flags, flag),
            FilterUpdate::SetFlags(flags) => self.other_flags = flags,
            FilterUpdate::OrgType(org_type) => {
                self.org_type = if self.org_type == Some(org_type) {
                    None
                } else {
                    Some(org_type)
                };
            }
            FilterUpdate::Poverty(threshold) => self.poverty_threshold = threshold,
        }
        Ok(())
    }

    // Boroughs and districts only exist inside the primary region.
    fn require_primary_region(&self, dimension: Dimension) -> Result<(), FilterError> {
        if self.region.is_primary() {
            Ok(())
        } else {
            Err(FilterError::RegionMismatch {
                dimension: dimension.name(),
            })
        }
    }

    fn district(&self, dimension: Dimension, raw: &str) -> Result<String, FilterError> {
        self.require_primary_region(dimension)?;

        let limit = match dimension {
            Dimension::CityCouncilDistrict => CITY_COUNCIL_DISTRICTS,
            _ => CONGRESSIONAL_DISTRICTS,
        };

        canonical_district(raw)
            .filter(|id| id.parse::<u32>().is_ok_and(|n| (1..=limit).contains(&n)))
            .ok_or_else(|| FilterError::UnknownValue {
                dimension: dimension.name(),
                value: raw.to_string(),
            })
    }

    fn districts(
        &self,
        dimension: Dimension,
        raw: BTreeSet<String>,
    ) -> Result<BTreeSet<String>, FilterError> {
        if raw.is_empty() {
            return Ok(BTreeSet::new());
        }
        raw.iter().map(|r| self.district(dimension, r)).collect()
    }
}

fn toggle<T: Ord>(set: &mut BTreeSet<T>, value: T) {
    if set.contains(&value) {
        set.remove(&value);
    } else {
        set.insert(value);
    }
}

fn cuisine(raw: &str) -> Result<String, FilterError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FilterError::UnknownValue {
            dimension: Dimension::Cuisine.name(),
            value: raw.to_string(),
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn borough_toggle_is_symmetric() {
        let mut s = FilterSelection::default();
        s.apply_filter(Dimension::Borough, "Queens").unwrap();
        assert!(s.boroughs().contains(&Borough::Queens));
        s.apply_filter(Dimension::Borough, "queens").unwrap();
        assert!(s.boroughs().is_empty());
        assert_eq!(s, FilterSelection::default());
    }

    #[test]
    fn all_boroughs_clears_the_set() {
        let mut s = FilterSelection::default();
        s.apply_filter(Dimension::Borough, "Bronx").unwrap();
        s.apply_filter(Dimension::Borough, "Brooklyn").unwrap();
        s.apply_filter(Dimension::Borough, "All").unwrap();
        assert!(s.boroughs().is_empty());
    }

    #[test]
    fn unknown_values_leave_selection_untouched() {
        let mut s = FilterSelection::default();
        s.apply_filter(Dimension::Borough, "Brooklyn").unwrap();
        let before = s.clone();

        assert!(s.apply_filter(Dimension::Borough, "Hoboken").is_err());
        assert!(s.apply_filter(Dimension::Poverty, "30").is_err());
        assert!(s.apply_filter(Dimension::Poverty, "lots").is_err());
        assert!(s.apply_filter(Dimension::Dietary, "Vegan").is_err());
        assert!(s.apply_filter(Dimension::CongressionalDistrict, "27").is_err());
        assert!(s.apply_filter(Dimension::CityCouncilDistrict, "0").is_err());
        assert!(s.apply_filter(Dimension::Cuisine, "   ").is_err());
        assert!(s.apply_filter(Dimension::OrgType, "farm").is_err());
        assert!(s
            .update(FilterUpdate::SetCongressionalDistricts(
                ["3".to_string(), "99".to_string()].into_iter().collect()
            ))
            .is_err());

        assert_eq!(s, before);
    }

    #[test]
    fn org_type_is_toggle_exclusive() {
        let mut s = FilterSelection::default();
        s.apply_filter(Dimension::OrgType, "CBO").unwrap();
        assert_eq!(s.org_type(), Some(OrgType::Cbo));
        s.apply_filter(Dimension::OrgType, "Restaurant").unwrap();
        assert_eq!(s.org_type(), Some(OrgType::Restaurant));
        s.apply_filter(Dimension::OrgType, "restaurants").unwrap();
        assert_eq!(s.org_type(), None);
    }

    #[test]
    fn leaving_primary_region_clears_districts() {
        let mut s = FilterSelection::default();
        s.apply_filter(Dimension::CongressionalDistrict, "07").unwrap();
        s.apply_filter(Dimension::CityCouncilDistrict, "34").unwrap();
        assert!(s.congressional_districts().contains("7"));

        s.apply_filter(Dimension::Region, "Miami").unwrap();
        assert!(s.congressional_districts().is_empty());
        assert!(s.city_council_districts().is_empty());

        assert_eq!(
            s.apply_filter(Dimension::CongressionalDistrict, "7"),
            Err(FilterError::RegionMismatch {
                dimension: "congressional district"
            })
        );
    }

    #[test]
    fn cuisine_toggle_ignores_case() {
        let mut s = FilterSelection::default();
        s.apply_filter(Dimension::Cuisine, " Thai ").unwrap();
        assert!(s.cuisines().contains("Thai"));
        s.apply_filter(Dimension::Cuisine, "thai").unwrap();
        assert!(s.cuisines().is_empty());
    }

    #[test]
    fn poverty_accepts_only_the_five_steps() {
        let mut s = FilterSelection::default();
        for percent in ["0", "25", "50", "75", "100"] {
            s.apply_filter(Dimension::Poverty, percent).unwrap();
            assert_eq!(s.poverty_threshold().percent().to_string(), percent);
        }
    }

    #[test]
    fn clear_keeps_type_and_search() {
        let mut s = FilterSelection::default();
        s.apply_filter(Dimension::OrgType, "cbo").unwrap();
        s.apply_filter(Dimension::Borough, "Bronx").unwrap();
        s.apply_filter(Dimension::Flag, "serves minors").unwrap();
        s.set_search_query("pantry");

        s.clear_keeping_type_and_search();
        assert_eq!(s.org_type(), Some(OrgType::Cbo));
        assert_eq!(s.search_query(), "pantry");
        assert!(s.boroughs().is_empty());
        assert!(s.other_flags().is_empty());
    }

    #[test]
    fn search_term_is_trimmed() {
        let mut s = FilterSelection::default();
        s.set_search_query("   ");
        assert_eq!(s.search_term(), None);
        s.set_search_query("  kitchen ");
        assert_eq!(s.search_term(), Some("kitchen"));
        assert!(!s.has_active_dimensions());
    }

    #[test]
    fn leaving_primary_region_clears_boroughs() {
        let mut s = FilterSelection::default();
        s.apply_filter(Dimension::Borough, "Queens").unwrap();
        s.apply_filter(Dimension::Region, "Miami").unwrap();
        assert!(s.boroughs().is_empty());
    }

    #[test]
    fn boroughs_are_rejected_outside_primary_region() {
        let mut s = FilterSelection::default();
        s.apply_filter(Dimension::Region, "Chicago").unwrap();
        let before = s.clone();

        assert_eq!(
            s.apply_filter(Dimension::Borough, "Queens"),
            Err(FilterError::RegionMismatch {
                dimension: "borough"
            })
        );
        assert!(s
            .update(FilterUpdate::SetBoroughs([Borough::Bronx].into_iter().collect()))
            .is_err());
        assert_eq!(s, before);

        // "All" only clears, so it is still accepted.
        s.apply_filter(Dimension::Borough, "All").unwrap();
        assert_eq!(s, before);
    }

    #[test]
    fn set_updates_replace_wholesale() {
        let mut s = FilterSelection::default();
        s.apply_filter(Dimension::Borough, "Bronx").unwrap();
        s.apply_filter(Dimension::Borough, "Queens").unwrap();
        s.apply_filter(Dimension::CityCouncilDistrict, "40").unwrap();
        s.apply_filter(Dimension::Dietary, "Halal").unwrap();
        s.apply_filter(Dimension::Flag, "serves-minors").unwrap();

        s.update(FilterUpdate::SetBoroughs([Borough::Manhattan].into_iter().collect()))
            .unwrap();
        s.update(FilterUpdate::SetCityCouncilDistricts(
            ["03".to_string(), "51".to_string()].into_iter().collect(),
        ))
        .unwrap();
        s.update(FilterUpdate::SetDietary([DietaryTag::Kosher].into_iter().collect()))
            .unwrap();
        s.update(FilterUpdate::SetFlags(
            [OtherFlag::OpenDistribution, OtherFlag::VolunteerOpportunities]
                .into_iter()
                .collect(),
        ))
        .unwrap();

        assert_eq!(s.boroughs().iter().copied().collect::<Vec<_>>(), vec![Borough::Manhattan]);
        assert_eq!(
            s.city_council_districts().iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["3", "51"]
        );
        assert_eq!(s.dietary_tags().iter().copied().collect::<Vec<_>>(), vec![DietaryTag::Kosher]);
        assert_eq!(s.other_flags().len(), 2);
        assert!(!s.other_flags().contains(&OtherFlag::ServesMinors));
    }

    #[test]
    fn set_cuisines_trims_and_dedupes_ignoring_case() {
        let mut s = FilterSelection::default();
        s.apply_filter(Dimension::Cuisine, "Caribbean").unwrap();

        s.update(FilterUpdate::SetCuisines(
            ["Thai".to_string(), "thai".to_string(), " Soul Food ".to_string()]
                .into_iter()
                .collect(),
        ))
        .unwrap();

        assert_eq!(
            s.cuisines().iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["Soul Food", "Thai"]
        );
    }

    #[test]
    fn rejected_set_leaves_selection_untouched() {
        let mut s = FilterSelection::default();
        s.apply_filter(Dimension::Cuisine, "Thai").unwrap();
        s.apply_filter(Dimension::CityCouncilDistrict, "12").unwrap();
        let before = s.clone();

        assert!(s
            .update(FilterUpdate::SetCuisines(
                ["Caribbean".to_string(), "  ".to_string()].into_iter().collect()
            ))
            .is_err());
        assert!(s
            .update(FilterUpdate::SetCityCouncilDistricts(
                ["3".to_string(), "52".to_string()].into_iter().collect()
            ))
            .is_err());
        assert_eq!(s, before);
    }
}
