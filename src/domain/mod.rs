mod merge;
mod organization;
mod relationship;
mod summary;

pub use merge::merge;
pub use organization::{canonical_district, Borough, CboProfile, OrgId, OrgType, OrganizationRecord};
pub use relationship::{supplied_cbos, supplying_restaurants};
pub use summary::{distribution_label, total_weekly_meals, ImpactSummary, MealBadge, PovertyBand};

#[cfg(test)]
pub use organization::{FoodTag, OrgKind, PostalAddress, TagKind};
