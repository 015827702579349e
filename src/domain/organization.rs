// src/domain/organization.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Organization identifier as the directory API hands it out: usually an
/// integer key, sometimes a UUID string. Numeric strings are folded into
/// `Int` so `"7"` and `7` refer to the same organization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum OrgId {
    Int(i64),
    Text(String),
}

impl From<i64> for OrgId {
    fn from(n: i64) -> Self {
        OrgId::Int(n)
    }
}

impl From<&str> for OrgId {
    fn from(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<i64>() {
            Ok(n) => OrgId::Int(n),
            Err(_) => OrgId::Text(trimmed.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for OrgId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Int(i64),
            Text(String),
        }

        Ok(match Wire::deserialize(deserializer)? {
            Wire::Int(n) => OrgId::Int(n),
            Wire::Text(s) => OrgId::from(s.as_str()),
        })
    }
}

impl fmt::Display for OrgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrgId::Int(n) => write!(f, "{n}"),
            OrgId::Text(s) => write!(f, "{s}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OrgType {
    Restaurant,
    Cbo,
}

impl OrgType {
    /// Case-insensitive; also accepts the plural spellings the filter bar sends.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "restaurant" | "restaurants" => Some(OrgType::Restaurant),
            "cbo" | "cbos" => Some(OrgType::Cbo),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OrgType::Restaurant => "Restaurant",
            OrgType::Cbo => "Community Based Organization",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Borough {
    Bronx,
    Brooklyn,
    Manhattan,
    Queens,
    StatenIsland,
}

impl Borough {
    pub const ALL: [Borough; 5] = [
        Borough::Bronx,
        Borough::Brooklyn,
        Borough::Manhattan,
        Borough::Queens,
        Borough::StatenIsland,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        let wanted = raw.trim();
        Self::ALL
            .into_iter()
            .find(|b| b.label().eq_ignore_ascii_case(wanted))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Borough::Bronx => "Bronx",
            Borough::Brooklyn => "Brooklyn",
            Borough::Manhattan => "Manhattan",
            Borough::Queens => "Queens",
            Borough::StatenIsland => "Staten Island",
        }
    }
}

impl fmt::Display for Borough {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    Cuisine,
    Dietary,
}

/// One entry of a CBO's food preferences. Dietary markers (Halal, Kosher)
/// share the source string with cuisines and are split out by kind here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoodTag {
    pub kind: TagKind,
    pub label: String,
}

const DIETARY_MARKERS: [&str; 2] = ["halal", "kosher"];

impl FoodTag {
    pub fn classify(label: &str) -> Self {
        let label = label.trim().to_string();
        let lower = label.to_lowercase();
        let kind = if DIETARY_MARKERS.iter().any(|m| lower.contains(m)) {
            TagKind::Dietary
        } else {
            TagKind::Cuisine
        };
        FoodTag { kind, label }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostalAddress {
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

/// Fields that only exist for community-based organizations.
/// Every flag stays `None` when the extension record lacks it; "missing" is
/// not the same as "false".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CboProfile {
    pub open_distribution: Option<bool>,
    pub volunteer_opportunities: Option<bool>,
    pub program_serving_minors: Option<bool>,
    pub food_tags: Vec<FoodTag>,
    pub meal_format: Option<String>,
    pub annual_funding_goal: Option<f64>,
    pub quarter_funding_goal: Option<f64>,
    pub congressional_district: Option<String>,
    pub city_council_district: Option<String>,
    pub percent_below_poverty_served: Option<f64>,
}

impl CboProfile {
    pub fn cuisines(&self) -> impl Iterator<Item = &str> {
        self.tags_of(TagKind::Cuisine)
    }

    pub fn dietary_tags(&self) -> impl Iterator<Item = &str> {
        self.tags_of(TagKind::Dietary)
    }

    fn tags_of(&self, kind: TagKind) -> impl Iterator<Item = &str> {
        self.food_tags
            .iter()
            .filter(move |t| t.kind == kind)
            .map(|t| t.label.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OrgKind {
    Restaurant,
    Cbo(CboProfile),
}

/// A directory entry after the organizations and CBO tables are merged.
#[derive(Debug, Clone, PartialEq)]
pub struct OrganizationRecord {
    pub id: OrgId,
    pub name: String,
    pub kind: OrgKind,
    pub borough: Option<Borough>,
    pub address: PostalAddress,
    /// Weekly meal volume.
    pub meal_count: Option<u32>,
    pub website: Option<String>,
    pub writeup: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl OrganizationRecord {
    pub fn org_type(&self) -> OrgType {
        match self.kind {
            OrgKind::Restaurant => OrgType::Restaurant,
            OrgKind::Cbo(_) => OrgType::Cbo,
        }
    }

    pub fn cbo(&self) -> Option<&CboProfile> {
        match &self.kind {
            OrgKind::Cbo(profile) => Some(profile),
            OrgKind::Restaurant => None,
        }
    }
}

/// Canonical text form of a district identifier: integers lose leading
/// zeros and a trailing `.0`, anything else is kept trimmed.
pub fn canonical_district(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(n) = trimmed.parse::<u32>() {
        return Some(n.to_string());
    }
    match trimmed.parse::<f64>() {
        Ok(f) if f.fract() == 0.0 && f >= 0.0 && f <= f64::from(u32::MAX) => {
            Some((f as u32).to_string())
        }
        _ => Some(trimmed.to_string()),
    }
}
