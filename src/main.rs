use crate::config::Config;
use crate::directory::Directory;
use crate::domain::{
    distribution_label, supplied_cbos, supplying_restaurants, total_weekly_meals, ImpactSummary,
    MealBadge, OrgId, OrgType, OrganizationRecord, PovertyBand,
};
use crate::filter::{matches, Dimension, FilterStore};
use crate::source::{CancellationToken, DirectoryClient, MealProviderQuery, RecordSource};
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;
mod directory;
mod domain;
mod errors;
mod filter;
mod selection;
mod source;


fn main() {
    // 1️⃣ Configuration
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Configuration error: {e}");
            std::process::exit(1);
        }
    };

    init_tracing(config.log_json);

    // 2️⃣ Directory API client
    let client = match DirectoryClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("❌ Could not build API client: {e}");
            std::process::exit(1);
        }
    };

    // 3️⃣ Load and merge both collections
    let mut directory = Directory::new(FilterStore::new());
    let token = CancellationToken::new();
    if !directory.load_from(&client, &token) {
        eprintln!("Load was cancelled before any records were committed.");
        std::process::exit(1);
    }

    // 4️⃣ Apply key=value filters from the command line
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut select_id = None;
    for (key, value) in parse_pairs(&args) {
        match key.as_str() {
            "q" | "search" => directory.set_search_query(value),
            "select" => select_id = Some(OrgId::from(value.as_str())),
            _ => match Dimension::parse(&key) {
                Some(dimension) => {
                    if let Err(e) = directory.apply_filter(dimension, &value) {
                        warn!(error = %e, "ignoring filter");
                    }
                }
                None => warn!(%key, "unknown filter key"),
            },
        }
    }

    let view = directory.filtered_destinations().unwrap_or_default();
    for org in view {
        println!("{}", list_line(org));
    }
    println!(
        "{} of {} organizations ({} meals/week), filters {}",
        view.len(),
        directory.all_destinations().len(),
        total_weekly_meals(view),
        if directory.is_filter_active() { "active" } else { "off" },
    );

    // 5️⃣ Optional detail view
    if let Some(id) = select_id {
        if !directory.select(&id) {
            let selection = directory.filters().selection();
            match directory.all_destinations().iter().find(|org| org.id == id) {
                Some(org) if !matches(org, selection) => {
                    println!("{} is hidden by the active filters.", org.name)
                }
                _ => println!("Organization {id} was not found."),
            }
            return;
        }
        if let Some(org) = directory.selected() {
            print_detail(&client, org);
        }
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// `borough=Queens type=cbo` → [("borough", "Queens"), ("type", "cbo")]
fn parse_pairs(args: &[String]) -> Vec<(String, String)> {
    args.iter()
        .filter_map(|arg| {
            let mut parts = arg.splitn(2, '=');
            match (parts.next(), parts.next()) {
                (Some(k), Some(v)) => Some((k.trim().to_string(), v.to_string())),
                _ => None,
            }
        })
        .collect()
}

fn list_line(org: &OrganizationRecord) -> String {
    let mut line = format!("[{}] {} · {}", org.id, org.name, org.org_type().label());
    if let Some(borough) = org.borough {
        line.push_str(&format!(" · {borough}"));
    }
    if let Some(badge) = MealBadge::for_meals(org.meal_count) {
        line.push_str(&format!(" · {}", badge.label()));
    }
    if let Some(band) = org
        .cbo()
        .and_then(|p| PovertyBand::for_percent(p.percent_below_poverty_served))
    {
        line.push_str(&format!(" · {}", band.label()));
    }
    if let Some(label) = distribution_label(org) {
        line.push_str(&format!(" · {label}"));
    }
    line
}

fn print_detail(client: &DirectoryClient, org: &OrganizationRecord) {
    println!();
    println!("{}", org.name);
    if let Some(writeup) = &org.writeup {
        println!("{writeup}");
    }

    if let Some(summary) = ImpactSummary::for_record(org) {
        if let Some(meals) = summary.meals_per_week {
            println!("  {meals} meals served per week");
        }
        if let Some(pct) = summary.poverty_percent {
            println!("  {pct}% of recipients living below the poverty line");
        }
        if let Some(goal) = summary.quarter_funding_goal {
            println!("  Quarter funding goal: ${goal:.0}");
        }
        if let Some(url) = summary.donate_url {
            println!("  Donate: {url}");
        }
    }

    let query = match org.org_type() {
        OrgType::Cbo => MealProviderQuery::ForCbo(org.id.clone()),
        OrgType::Restaurant => MealProviderQuery::ForRestaurant(org.id.clone()),
    };
    match client.fetch_meal_providers(&query) {
        Ok(links) => {
            let (heading, partners) = match org.org_type() {
                OrgType::Cbo => ("Provided by", supplying_restaurants(&links)),
                OrgType::Restaurant => ("Supplies", supplied_cbos(&links)),
            };
            if !partners.is_empty() {
                let names: Vec<_> = partners.iter().map(|p| p.name.as_str()).collect();
                println!("  {heading}: {}", names.join(", "));
            }
        }
        Err(e) => warn!(error = %e, "could not load meal providers"),
    }
}
