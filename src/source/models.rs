use crate::domain::OrgId;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

// GET /organizations
//  ├── success
//  └── organizations[]
//       ├── id, name, org_type, borough
//       ├── street_address, city, state, zip
//       ├── number_of_meals, website, writeup
//       └── created_at, updated_at
//
// GET /cbos
//  ├── success
//  └── cbos[]
//       ├── id                      (same key as the organization row)
//       ├── meal_count, write_up
//       ├── open_distribution, volunteer_opportunities, program_serving_minors
//       ├── cuisine_preference      ("Caribbean; Halal; ...")
//       ├── cuisine                 (list, or comma-separated string)
//       ├── meal_format
//       ├── annual_funding_goal, quarter_funding_goal
//       ├── congressional_district, city_council_district
//       └── percent_below_poverty_served
//
// GET /meal_providers?cbo_id=X | ?restaurant_id=Y
//  ├── success, count
//  └── meal_providers[]
//       ├── cbo_id, restaurant_id
//       ├── cbo        { id, name, ... }
//       └── restaurant { id, name, ... }

#[derive(Debug, Deserialize)]
pub struct OrganizationsEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub organizations: Vec<RawOrganization>,
}

#[derive(Debug, Deserialize)]
pub struct CbosEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub cbos: Vec<RawCboExtension>,
}

#[derive(Debug, Deserialize)]
pub struct MealProvidersEnvelope {
    #[serde(default)]
    pub success: bool,
    pub count: Option<usize>,
    #[serde(default)]
    pub meal_providers: Vec<MealProvider>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawOrganization {
    pub id: Option<OrgId>,
    pub name: Option<String>,
    pub org_type: Option<String>,
    pub borough: Option<String>,

    pub street_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub zip: Option<String>,

    #[serde(default, deserialize_with = "lenient_int")]
    pub number_of_meals: Option<i64>,
    pub website: Option<String>,
    pub writeup: Option<String>,

    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCboExtension {
    pub id: Option<OrgId>,

    #[serde(default, deserialize_with = "lenient_int")]
    pub meal_count: Option<i64>,
    pub write_up: Option<String>,
    pub website: Option<String>,

    pub open_distribution: Option<bool>,
    pub volunteer_opportunities: Option<bool>,
    pub program_serving_minors: Option<bool>,

    pub cuisine_preference: Option<String>,
    pub cuisine: Option<CuisineField>,
    pub meal_format: Option<String>,

    #[serde(default, deserialize_with = "lenient_float")]
    pub annual_funding_goal: Option<f64>,
    #[serde(default, deserialize_with = "lenient_float")]
    pub quarter_funding_goal: Option<f64>,

    // Numeric in some rows, text in others.
    #[serde(default, deserialize_with = "lenient_string")]
    pub congressional_district: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub city_council_district: Option<String>,

    #[serde(default, deserialize_with = "lenient_float")]
    pub percent_below_poverty_served: Option<f64>,
}

/// `cuisine` arrives either as a JSON list or as one comma-separated string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CuisineField {
    List(Vec<String>),
    Text(String),
}

impl CuisineField {
    pub fn entries(&self) -> Vec<&str> {
        match self {
            CuisineField::List(items) => items.iter().map(String::as_str).collect(),
            CuisineField::Text(text) => text.split(',').collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MealProvider {
    pub cbo_id: OrgId,
    pub restaurant_id: OrgId,
    pub cbo: Option<RelatedOrg>,
    pub restaurant: Option<RelatedOrg>,
}

/// The embedded side of a meal-provider link; only the fields the detail views read.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RelatedOrg {
    pub id: OrgId,
    pub name: Option<String>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_float<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_loosely_typed_cbo_rows() {
        let json = r#"{
            "success": true,
            "count": 1,
            "cbos": [{
                "id": "12",
                "meal_count": "150",
                "congressional_district": 7,
                "city_council_district": "034",
                "percent_below_poverty_served": "42.5",
                "cuisine": "Caribbean, Soul Food",
                "open_distribution": false
            }]
        }"#;

        let envelope: CbosEnvelope = serde_json::from_str(json).unwrap();
        assert!(envelope.success);

        let cbo = &envelope.cbos[0];
        assert_eq!(cbo.id, Some(OrgId::Int(12)));
        assert_eq!(cbo.meal_count, Some(150));
        assert_eq!(cbo.congressional_district.as_deref(), Some("7"));
        assert_eq!(cbo.city_council_district.as_deref(), Some("034"));
        assert_eq!(cbo.percent_below_poverty_served, Some(42.5));
        assert_eq!(cbo.open_distribution, Some(false));
        assert_eq!(cbo.volunteer_opportunities, None);
        assert_eq!(
            cbo.cuisine.as_ref().unwrap().entries(),
            vec!["Caribbean", " Soul Food"]
        );
    }

    #[test]
    fn null_fields_stay_absent() {
        let json = r#"{ "id": 3, "meal_count": null, "write_up": null, "zip": 11201 }"#;
        let cbo: RawCboExtension = serde_json::from_str(json).unwrap();
        assert_eq!(cbo.meal_count, None);
        assert_eq!(cbo.write_up, None);

        let org: RawOrganization = serde_json::from_str(json).unwrap();
        assert_eq!(org.zip.as_deref(), Some("11201"));
    }

    #[test]
    fn decodes_meal_provider_links() {
        let json = r#"{
            "success": true,
            "count": 1,
            "meal_providers": [{
                "id": 1,
                "cbo_id": 4,
                "restaurant_id": 9,
                "cbo": { "id": 4, "name": "Harlem Pantry", "meal_format": "Hot meals" },
                "restaurant": null
            }]
        }"#;

        let envelope: MealProvidersEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.count, Some(1));
        let link = &envelope.meal_providers[0];
        assert_eq!(link.restaurant_id, OrgId::Int(9));
        assert_eq!(link.cbo.as_ref().unwrap().name.as_deref(), Some("Harlem Pantry"));
        assert!(link.restaurant.is_none());
    }
}
