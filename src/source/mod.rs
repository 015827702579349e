mod client;
mod loader;
mod models;

pub use client::{DirectoryClient, MealProviderQuery};
pub use loader::{load_dataset, CancellationToken};
pub use models::{CuisineField, MealProvider, RawCboExtension, RawOrganization, RelatedOrg};

use crate::errors::SourceError;

/// Where organization records come from. The HTTP client is the production
/// implementation; tests plug in fixed data.
pub trait RecordSource: Sync {
    fn fetch_organizations(&self) -> Result<Vec<RawOrganization>, SourceError>;

    fn fetch_cbo_extensions(&self) -> Result<Vec<RawCboExtension>, SourceError>;

    fn fetch_meal_providers(
        &self,
        query: &MealProviderQuery,
    ) -> Result<Vec<MealProvider>, SourceError>;
}
