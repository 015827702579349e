// src/domain/summary.rs

use crate::domain::OrganizationRecord;

/// Meal-volume chip shown on list cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MealBadge {
    HundredPlus,
    FiveHundredPlus,
    ThousandPlus,
}

impl MealBadge {
    pub fn for_meals(meals: Option<u32>) -> Option<Self> {
        match meals? {
            n if n >= 1000 => Some(MealBadge::ThousandPlus),
            n if n >= 500 => Some(MealBadge::FiveHundredPlus),
            n if n >= 100 => Some(MealBadge::HundredPlus),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MealBadge::HundredPlus => "100+ meals served",
            MealBadge::FiveHundredPlus => "500+ meals served",
            MealBadge::ThousandPlus => "1000+ meals served",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PovertyBand {
    Over25,
    Over50,
    Over75,
}

impl PovertyBand {
    pub fn for_percent(percent: Option<f64>) -> Option<Self> {
        match percent? {
            p if p > 75.0 => Some(PovertyBand::Over75),
            p if p > 50.0 => Some(PovertyBand::Over50),
            p if p > 25.0 => Some(PovertyBand::Over25),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PovertyBand::Over25 => ">25% Below Poverty Line",
            PovertyBand::Over50 => ">50% Below Poverty Line",
            PovertyBand::Over75 => ">75% Below Poverty Line",
        }
    }
}

pub fn distribution_label(record: &OrganizationRecord) -> Option<&'static str> {
    match record.cbo()?.open_distribution? {
        true => Some("Open Distribution"),
        false => Some("Selective Distribution"),
    }
}

/// The "your support matters" strip for a selected CBO.
/// Each figure is only present when it is positive.
#[derive(Debug, Clone, PartialEq)]
pub struct ImpactSummary {
    pub name: String,
    pub meals_per_week: Option<u32>,
    pub poverty_percent: Option<f64>,
    pub quarter_funding_goal: Option<f64>,
    pub donate_url: Option<String>,
}

impl ImpactSummary {
    /// `None` for restaurants.
    pub fn for_record(record: &OrganizationRecord) -> Option<Self> {
        let profile = record.cbo()?;
        Some(ImpactSummary {
            name: record.name.clone(),
            meals_per_week: record.meal_count.filter(|n| *n > 0),
            poverty_percent: profile.percent_below_poverty_served.filter(|p| *p > 0.0),
            quarter_funding_goal: profile.quarter_funding_goal.filter(|g| *g > 0.0),
            donate_url: record.website.clone(),
        })
    }
}

pub fn total_weekly_meals(view: &[OrganizationRecord]) -> u64 {
    view.iter()
        .filter_map(|r| r.meal_count)
        .map(u64::from)
        .sum()
}
