use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Response, StatusCode};
use url::Url;

use crate::config::ApiConfig;
use crate::error::FetchError;
use crate::source::PolicySource;
use crate::types::{ApiToken, EscalationPolicy};

pub mod assemble;
pub mod models;

use self::models::{
    EscalationPolicyModel, Listing, OnCallModel, Page, UserModel,
};

const ACCEPT_V2: &str = "application/vnd.pagerduty+json;version=2";

/// PagerDuty rejects a larger `limit`.
const MAX_PAGE_SIZE: u32 = 100;

pub struct PagerDutyClient {
    client: reqwest::Client,
    base_url: Url,
    token: ApiToken,
    page_size: u32,
}

impl PagerDutyClient {
    pub fn new(config: &ApiConfig) -> Result<Self, FetchError> {
        let token = config.token.clone().ok_or(FetchError::MissingToken)?;

        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url: with_trailing_slash(config.base_url.clone()),
            token,
            page_size: config.page_size.clamp(1, MAX_PAGE_SIZE),
        })
    }

    /// Fetches policies, on-calls and users concurrently and joins them.
    pub async fn fetch_escalation_policies(
        &self,
    ) -> Result<Vec<EscalationPolicy>, FetchError> {
        let (policies, oncalls, users) = tokio::try_join!(
            self.fetch_all::<EscalationPolicyModel>(),
            self.fetch_all::<OnCallModel>(),
            self.fetch_all::<UserModel>(),
        )?;

        tracing::debug!(
            policies = policies.len(),
            oncalls = oncalls.len(),
            users = users.len(),
            "Fetched listings"
        );

        Ok(assemble::make_escalation_policies(policies, users, oncalls))
    }

    async fn fetch_all<T: Listing>(&self) -> Result<Vec<T>, FetchError> {
        let url = self.base_url.join(T::PATH)?;

        let mut items = Vec::new();
        let mut offset = 0;

        loop {
            let page = self.get_page(&url, T::INCLUDES, offset).await?;
            let more = page.more;

            let page_items = T::from_objects(page.objects).ok_or_else(|| {
                FetchError::UnexpectedListing {
                    path: url.path().to_string(),
                }
            })?;
            let received = page_items.len() as u32;
            items.extend(page_items);

            if !more {
                break;
            }

            if received == 0 {
                tracing::warn!(
                    path = url.path(),
                    offset,
                    "Empty page still reports more records, stopping"
                );
                break;
            }

            // The server may return fewer records than the requested limit
            offset += received;
        }

        Ok(items)
    }

    async fn get_page(
        &self,
        url: &Url,
        includes: &[&str],
        offset: u32,
    ) -> Result<Page, FetchError> {
        tracing::debug!(url = %url, offset, "GET request");

        let mut query = vec![
            ("sort_by", "name".to_string()),
            ("limit", self.page_size.to_string()),
            ("offset", offset.to_string()),
        ];
        if !includes.is_empty() {
            query.push(("include[]", includes.join(",")));
        }

        let response = self
            .client
            .get(url.clone())
            .query(&query)
            .header(ACCEPT, ACCEPT_V2)
            .header(AUTHORIZATION, self.token.authorization_header())
            .send()
            .await?;

        let response = Self::validate_response(response).await?;
        let body = response.text().await?;

        decode_page(url.path(), &body)
    }

    async fn validate_response(
        response: Response,
    ) -> Result<Response, FetchError> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
        {
            return Err(FetchError::Unauthorized {
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            let body = response.text().await?;

            return Err(FetchError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}

#[async_trait::async_trait]
impl PolicySource for PagerDutyClient {
    async fn fetch_policies(&self) -> Result<Vec<EscalationPolicy>, FetchError> {
        self.fetch_escalation_policies().await
    }
}

fn decode_page(path: &str, body: &str) -> Result<Page, FetchError> {
    serde_json::from_str(body).map_err(|source| {
        tracing::info!(path, "Unparsable response from PagerDuty");
        tracing::debug!(path, body, "Unparsable response body");

        FetchError::Decode {
            path: path.to_string(),
            source,
        }
    })
}

/// `Url::join` replaces the last segment unless the base ends with `/`.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    url
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("https://api.pagerduty.com", "https://api.pagerduty.com/users" ; "bare host")]
    #[test_case("https://api.pagerduty.com/", "https://api.pagerduty.com/users" ; "root path")]
    #[test_case("http://127.0.0.1:8080/proxy/pd", "http://127.0.0.1:8080/proxy/pd/users" ; "nested path")]
    fn listing_urls(base_url: &str, expected: &str) {
        let base_url = with_trailing_slash(Url::parse(base_url).unwrap());

        let url = base_url.join(UserModel::PATH).unwrap();

        assert_eq!(url.as_str(), expected);
    }

    #[test]
    fn client_requires_token() {
        let config = ApiConfig::default();

        let result = PagerDutyClient::new(&config);

        assert!(matches!(result, Err(FetchError::MissingToken)));
    }

    #[test]
    fn zero_page_size_is_clamped() {
        let config = ApiConfig {
            page_size: 0,
            token: Some(ApiToken::new("token")),
            ..ApiConfig::default()
        };

        let client = PagerDutyClient::new(&config).unwrap();

        assert_eq!(client.page_size, 1);
    }

    #[test]
    fn oversized_page_size_is_clamped() {
        let config = ApiConfig {
            page_size: 150,
            token: Some(ApiToken::new("token")),
            ..ApiConfig::default()
        };

        let client = PagerDutyClient::new(&config).unwrap();

        assert_eq!(client.page_size, MAX_PAGE_SIZE);
    }

    #[test]
    fn decode_error_names_the_path() {
        let error = decode_page("/oncalls", "<html>Bad Gateway</html>")
            .expect_err("html is not a page");

        assert!(matches!(
            error,
            FetchError::Decode { ref path, .. } if path == "/oncalls"
        ));
    }
}
