// client.rs
use crate::config::Config;
use crate::domain::OrgId;
use crate::errors::SourceError;
use crate::source::models::{
    CbosEnvelope, MealProvider, MealProvidersEnvelope, OrganizationsEnvelope, RawCboExtension,
    RawOrganization,
};
use crate::source::RecordSource;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use std::time::Instant;
use tracing::debug;
use url::Url;

const USER_AGENT: &str = concat!("mealmap/", env!("CARGO_PKG_VERSION"));

/// Which side of the meal-provider table to look up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MealProviderQuery {
    ForCbo(OrgId),
    ForRestaurant(OrgId),
}

/// Blocking client for the directory API.
pub struct DirectoryClient {
    client: Client,
    base: Url,
}

impl DirectoryClient {
    pub fn new(config: &Config) -> Result<Self, SourceError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| SourceError::Http {
                endpoint: config.api_base.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            base: base_url(&config.api_base)?,
        })
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, SourceError> {
        self.base
            .join(path)
            .map_err(|e| SourceError::InvalidUrl(format!("{path}: {e}")))
    }

    pub fn meal_providers_url(&self, query: &MealProviderQuery) -> Result<Url, SourceError> {
        let mut url = self.endpoint("meal_providers")?;
        match query {
            MealProviderQuery::ForCbo(id) => {
                url.query_pairs_mut().append_pair("cbo_id", &id.to_string());
            }
            MealProviderQuery::ForRestaurant(id) => {
                url.query_pairs_mut()
                    .append_pair("restaurant_id", &id.to_string());
            }
        }
        Ok(url)
    }

    fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, SourceError> {
        let endpoint = url.path().to_string();
        let start = Instant::now();

        let resp = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .map_err(|e| SourceError::Http {
                endpoint: endpoint.clone(),
                reason: e.to_string(),
            })?;

        let status = resp.status();
        let text = resp.text().map_err(|e| SourceError::Http {
            endpoint: endpoint.clone(),
            reason: e.to_string(),
        })?;

        debug!(%endpoint, %status, elapsed = ?start.elapsed(), bytes = text.len(), "fetched");

        if !status.is_success() {
            return Err(SourceError::Status {
                endpoint,
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|e| SourceError::Decode {
            endpoint,
            reason: e.to_string(),
        })
    }
}

impl RecordSource for DirectoryClient {
    fn fetch_organizations(&self) -> Result<Vec<RawOrganization>, SourceError> {
        let url = self.endpoint("organizations")?;
        let envelope: OrganizationsEnvelope = self.get_json(url)?;
        if !envelope.success {
            return Err(SourceError::Unsuccessful {
                endpoint: "organizations".into(),
            });
        }
        Ok(envelope.organizations)
    }

    fn fetch_cbo_extensions(&self) -> Result<Vec<RawCboExtension>, SourceError> {
        let url = self.endpoint("cbos")?;
        let envelope: CbosEnvelope = self.get_json(url)?;
        if !envelope.success {
            return Err(SourceError::Unsuccessful {
                endpoint: "cbos".into(),
            });
        }
        Ok(envelope.cbos)
    }

    fn fetch_meal_providers(
        &self,
        query: &MealProviderQuery,
    ) -> Result<Vec<MealProvider>, SourceError> {
        let url = self.meal_providers_url(query)?;
        let envelope: MealProvidersEnvelope = self.get_json(url)?;
        if !envelope.success {
            return Err(SourceError::Unsuccessful {
                endpoint: "meal_providers".into(),
            });
        }
        Ok(envelope.meal_providers)
    }
}

// `Url::join` drops the last segment unless the base ends in '/'.
fn base_url(raw: &str) -> Result<Url, SourceError> {
    let mut normalized = raw.trim().to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    Url::parse(&normalized).map_err(|e| SourceError::InvalidUrl(format!("{raw}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> DirectoryClient {
        let config = Config {
            api_base: base.to_string(),
            ..Config::default()
        };
        DirectoryClient::new(&config).unwrap()
    }

    #[test]
    fn endpoints_keep_the_api_prefix() {
        for base in ["http://localhost:3000/api", "http://localhost:3000/api/"] {
            let url = client(base).endpoint("cbos").unwrap();
            assert_eq!(url.as_str(), "http://localhost:3000/api/cbos");
        }
    }

    #[test]
    fn meal_provider_queries() {
        let c = client("https://directory.example.org/api");

        let by_cbo = c
            .meal_providers_url(&MealProviderQuery::ForCbo(OrgId::Int(12)))
            .unwrap();
        assert_eq!(
            by_cbo.as_str(),
            "https://directory.example.org/api/meal_providers?cbo_id=12"
        );

        let by_restaurant = c
            .meal_providers_url(&MealProviderQuery::ForRestaurant(OrgId::Text("a b".into())))
            .unwrap();
        assert_eq!(by_restaurant.query(), Some("restaurant_id=a+b"));
    }

    #[test]
    fn rejects_unparseable_base() {
        let config = Config {
            api_base: "not a url".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            DirectoryClient::new(&config),
            Err(SourceError::InvalidUrl(_))
        ));
    }
}
