// src/domain/merge.rs

use crate::domain::organization::{
    canonical_district, Borough, CboProfile, FoodTag, OrgId, OrgKind, OrgType,
    OrganizationRecord, PostalAddress,
};
use crate::source::{CuisineField, RawCboExtension, RawOrganization};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Left-joins CBO extension rows onto organization rows sharing an id.
///
/// Output order follows `orgs`. Rows that cannot become a valid record
/// (no id, blank name, unknown org type, repeated id) are dropped with a
/// warning. Extension rows with no matching CBO are ignored.
pub fn merge(orgs: &[RawOrganization], extensions: &[RawCboExtension]) -> Vec<OrganizationRecord> {
    let mut by_id: HashMap<&OrgId, &RawCboExtension> = HashMap::new();
    for ext in extensions {
        if let Some(id) = ext.id.as_ref() {
            by_id.entry(id).or_insert(ext);
        }
    }

    let mut seen = HashSet::new();
    let mut merged = Vec::with_capacity(orgs.len());

    for org in orgs {
        let Some(record) = normalize(org, &by_id) else {
            continue;
        };
        if !seen.insert(record.id.clone()) {
            warn!(id = %record.id, "duplicate organization id, keeping first occurrence");
            continue;
        }
        merged.push(record);
    }

    merged
}

fn normalize(
    org: &RawOrganization,
    extensions: &HashMap<&OrgId, &RawCboExtension>,
) -> Option<OrganizationRecord> {
    let Some(id) = org.id.clone() else {
        warn!(name = ?org.name, "organization row without id, skipping");
        return None;
    };

    let Some(name) = non_blank(org.name.as_deref()) else {
        warn!(%id, "organization row with blank name, skipping");
        return None;
    };

    let Some(org_type) = org.org_type.as_deref().and_then(OrgType::parse) else {
        warn!(%id, org_type = ?org.org_type, "unknown org_type, skipping");
        return None;
    };

    let own_meals = org.number_of_meals.and_then(|n| u32::try_from(n).ok());
    let own_writeup = non_blank(org.writeup.as_deref());

    let mut record = OrganizationRecord {
        id,
        name,
        kind: OrgKind::Restaurant,
        borough: org.borough.as_deref().and_then(Borough::parse),
        address: PostalAddress {
            street_address: non_blank(org.street_address.as_deref()),
            city: non_blank(org.city.as_deref()),
            state: non_blank(org.state.as_deref()),
            zip: non_blank(org.zip.as_deref()),
        },
        meal_count: own_meals,
        website: non_blank(org.website.as_deref()),
        writeup: own_writeup.clone(),
        created_at: parse_timestamp(org.created_at.as_deref()),
        updated_at: parse_timestamp(org.updated_at.as_deref()),
    };

    if org_type == OrgType::Restaurant {
        return Some(record);
    }

    let Some(ext) = extensions.get(&record.id) else {
        record.kind = OrgKind::Cbo(CboProfile::default());
        return Some(record);
    };

    // Coalesced fields: the extension only wins with a usable value.
    record.meal_count = ext
        .meal_count
        .and_then(|n| u32::try_from(n).ok())
        .or(own_meals);
    record.writeup = non_blank(ext.write_up.as_deref()).or(own_writeup);

    if let Some(website) = non_blank(ext.website.as_deref()) {
        record.website = Some(website);
    }

    record.kind = OrgKind::Cbo(CboProfile {
        open_distribution: ext.open_distribution,
        volunteer_opportunities: ext.volunteer_opportunities,
        program_serving_minors: ext.program_serving_minors,
        food_tags: parse_food_tags(ext.cuisine_preference.as_deref(), ext.cuisine.as_ref()),
        meal_format: non_blank(ext.meal_format.as_deref()),
        annual_funding_goal: ext.annual_funding_goal,
        quarter_funding_goal: ext.quarter_funding_goal,
        congressional_district: ext
            .congressional_district
            .as_deref()
            .and_then(canonical_district),
        city_council_district: ext
            .city_council_district
            .as_deref()
            .and_then(canonical_district),
        percent_below_poverty_served: ext.percent_below_poverty_served,
    });

    Some(record)
}

/// `cuisine_preference` is `;`-delimited, `cuisine` a list or `,`-delimited.
/// Entries are trimmed, blanks dropped, case-insensitive repeats dropped.
pub fn parse_food_tags(preference: Option<&str>, cuisine: Option<&CuisineField>) -> Vec<FoodTag> {
    let mut entries: Vec<&str> = Vec::new();
    if let Some(preference) = preference {
        entries.extend(preference.split(';'));
    }
    if let Some(cuisine) = cuisine {
        entries.extend(cuisine.entries());
    }

    let mut tags: Vec<FoodTag> = Vec::new();
    for entry in entries {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        if tags.iter().any(|t| t.label.eq_ignore_ascii_case(entry)) {
            continue;
        }
        tags.push(FoodTag::classify(entry));
    }
    tags
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn parse_timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    value
        .and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TagKind;

    fn org(id: i64, name: &str, org_type: &str) -> RawOrganization {
        RawOrganization {
            id: Some(OrgId::Int(id)),
            name: Some(name.to_string()),
            org_type: Some(org_type.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn blank_extension_text_and_null_meals_fall_back_to_organization() {
        let mut base = org(1, "Bed-Stuy Fridge", "cbo");
        base.writeup = Some("org text".to_string());
        base.number_of_meals = Some(10);

        let ext = RawCboExtension {
            id: Some(OrgId::Int(1)),
            write_up: Some(String::new()),
            meal_count: None,
            ..Default::default()
        };

        let merged = merge(&[base], &[ext]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].writeup.as_deref(), Some("org text"));
        assert_eq!(merged[0].meal_count, Some(10));
    }

    #[test]
    fn extension_values_win_when_present() {
        let mut base = org(2, "Astoria Kitchen", "CBO");
        base.writeup = Some("old".to_string());
        base.number_of_meals = Some(10);

        let ext = RawCboExtension {
            id: Some(OrgId::Int(2)),
            write_up: Some("  fresh  ".to_string()),
            meal_count: Some(250),
            open_distribution: Some(false),
            congressional_district: Some("07".to_string()),
            percent_below_poverty_served: Some(40.0),
            ..Default::default()
        };

        let merged = merge(&[base], &[ext]);
        let record = &merged[0];
        assert_eq!(record.writeup.as_deref(), Some("fresh"));
        assert_eq!(record.meal_count, Some(250));

        let profile = record.cbo().unwrap();
        assert_eq!(profile.open_distribution, Some(false));
        assert_eq!(profile.volunteer_opportunities, None);
        assert_eq!(profile.congressional_district.as_deref(), Some("7"));
        assert_eq!(profile.percent_below_poverty_served, Some(40.0));
    }

    #[test]
    fn restaurants_ignore_extensions_and_order_is_kept() {
        let rows = vec![org(3, "Taqueria", "restaurant"), org(1, "Pantry", "cbo")];
        let ext = RawCboExtension {
            id: Some(OrgId::Int(3)),
            meal_count: Some(999),
            ..Default::default()
        };

        let merged = merge(&rows, &[ext]);
        assert_eq!(merged[0].name, "Taqueria");
        assert_eq!(merged[0].kind, OrgKind::Restaurant);
        assert_eq!(merged[0].meal_count, None);
        assert_eq!(merged[1].cbo(), Some(&CboProfile::default()));
    }

    #[test]
    fn orphan_extensions_and_bad_rows_are_dropped() {
        let rows = vec![
            org(1, "Keep", "cbo"),
            org(1, "Duplicate", "cbo"),
            org(2, "   ", "cbo"),
            org(3, "Farm", "farm"),
            RawOrganization {
                id: None,
                ..org(0, "No id", "restaurant")
            },
        ];
        let orphan = RawCboExtension {
            id: Some(OrgId::Int(77)),
            ..Default::default()
        };

        let merged = merge(&rows, &[orphan]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].name, "Keep");
    }

    #[test]
    fn food_tags_combine_both_sources() {
        let tags = parse_food_tags(
            Some("Caribbean; Halal ;; caribbean"),
            Some(&CuisineField::Text("Soul Food, Kosher".to_string())),
        );
        let labels: Vec<_> = tags.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["Caribbean", "Halal", "Soul Food", "Kosher"]);
        assert_eq!(tags[1].kind, TagKind::Dietary);
        assert_eq!(tags[2].kind, TagKind::Cuisine);
    }

    #[test]
    fn merge_is_deterministic() {
        let rows = vec![org(1, "A", "cbo"), org(2, "B", "restaurant")];
        let ext = RawCboExtension {
            id: Some(OrgId::Int(1)),
            cuisine_preference: Some("Thai".to_string()),
            ..Default::default()
        };
        assert_eq!(merge(&rows, &[ext.clone()]), merge(&rows, &[ext]));
    }

    #[test]
    fn timestamps_parse_rfc3339_or_stay_absent() {
        let mut base = org(5, "Dated", "restaurant");
        base.created_at = Some("2024-03-01T12:30:00.123+00:00".to_string());
        base.updated_at = Some("yesterday".to_string());

        let merged = merge(&[base], &[]);
        assert!(merged[0].created_at.is_some());
        assert!(merged[0].updated_at.is_none());
    }
}
