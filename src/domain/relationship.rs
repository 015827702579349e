// src/domain/relationship.rs

use crate::domain::OrgId;
use crate::source::{MealProvider, RelatedOrg};

/// The other end of a meal-provider link, as shown on a detail card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partner {
    pub id: OrgId,
    pub name: String,
}

/// Restaurants that supply a CBO, in response order.
pub fn supplying_restaurants(links: &[MealProvider]) -> Vec<Partner> {
    partners(links.iter().map(|l| l.restaurant.as_ref()))
}

/// CBOs a restaurant supplies, in response order.
pub fn supplied_cbos(links: &[MealProvider]) -> Vec<Partner> {
    partners(links.iter().map(|l| l.cbo.as_ref()))
}

// Links without an embedded record are skipped; repeats collapse to the first.
fn partners<'a>(sides: impl Iterator<Item = Option<&'a RelatedOrg>>) -> Vec<Partner> {
    let mut out: Vec<Partner> = Vec::new();
    for related in sides.flatten() {
        if out.iter().any(|p| p.id == related.id) {
            continue;
        }
        let name = related
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Organization {}", related.id));
        out.push(Partner {
            id: related.id.clone(),
            name,
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn related(id: i64, name: Option<&str>) -> RelatedOrg {
        RelatedOrg {
            id: OrgId::Int(id),
            name: name.map(str::to_string),
        }
    }

    fn link(cbo: Option<RelatedOrg>, restaurant: Option<RelatedOrg>) -> MealProvider {
        MealProvider {
            cbo_id: cbo.as_ref().map(|c| c.id.clone()).unwrap_or(OrgId::Int(0)),
            restaurant_id: restaurant
                .as_ref()
                .map(|r| r.id.clone())
                .unwrap_or(OrgId::Int(0)),
            cbo,
            restaurant,
        }
    }

    #[test]
    fn restaurants_for_a_cbo_skip_missing_and_repeats() {
        let links = vec![
            link(Some(related(1, Some("Pantry"))), Some(related(10, Some("Dosa Hut")))),
            link(Some(related(1, Some("Pantry"))), None),
            link(Some(related(1, Some("Pantry"))), Some(related(11, None))),
            link(Some(related(1, Some("Pantry"))), Some(related(10, Some("Dosa Hut")))),
        ];

        let names: Vec<_> = supplying_restaurants(&links)
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Dosa Hut", "Organization 11"]);
    }

    #[test]
    fn cbos_for_a_restaurant() {
        let links = vec![
            link(Some(related(2, Some("Bronx Shelter"))), Some(related(10, Some("Dosa Hut")))),
            link(Some(related(3, Some("Queens Fridge"))), Some(related(10, Some("Dosa Hut")))),
        ];

        let ids: Vec<_> = supplied_cbos(&links).into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![OrgId::Int(2), OrgId::Int(3)]);
    }
}
