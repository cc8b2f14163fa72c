//! API client for communicating with the sizing service

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use sizer_lib::{PerformanceProfile, PlanRequest, ProvisioningPlan};
use url::Url;

/// API client for the sizing service
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

/// Error body returned by the service for rejected plans
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(base_url).context("Invalid API URL")?;

        Ok(Self { client, base_url })
    }

    /// Ask the service for a provisioning plan
    pub async fn plan(&self, request: &PlanRequest) -> Result<ProvisioningPlan> {
        self.post("api/v1/plans", request).await
    }

    /// Fetch the performance profile the service plans with
    pub async fn profile(&self) -> Result<PerformanceProfile> {
        self.get("api/v1/profile").await
    }

    /// Make a GET request
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;

        Self::read_json(response).await
    }

    /// Make a POST request with JSON body
    async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .context("Failed to send request")?;

        Self::read_json(response).await
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            match serde_json::from_str::<ErrorResponse>(&body) {
                Ok(error) => anyhow::bail!("API error ({}): {}", status, error.message),
                Err(_) => anyhow::bail!("API error ({}): {}", status, body),
            }
        }

        response.json().await.context("Failed to parse response")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sizer_lib::{Planner, VmFlavor};

    #[tokio::test]
    async fn test_plan_posts_request() {
        let mut server = mockito::Server::new_async().await;
        let request = PlanRequest::new(VmFlavor::new(8, 32)).with_failures(1);
        let plan = Planner::new(PerformanceProfile::bare_metal())
            .unwrap()
            .plan(&request)
            .unwrap();

        let mock = server
            .mock("POST", "/api/v1/plans")
            .match_body(mockito::Matcher::Json(serde_json::to_value(request).unwrap()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(serde_json::to_string(&plan).unwrap())
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let received = client.plan(&request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(received, plan);
    }

    #[tokio::test]
    async fn test_rejected_plan_surfaces_message() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/v1/plans")
            .with_status(400)
            .with_body(r#"{"error":"invalid_input","message":"invalid input: unknown event size 512"}"#)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let err = client
            .plan(&PlanRequest::new(VmFlavor::new(8, 32)))
            .await
            .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("400"));
        assert!(message.contains("unknown event size 512"));
    }

    #[tokio::test]
    async fn test_profile_fetch() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/v1/profile")
            .with_status(200)
            .with_body(serde_json::to_string(&PerformanceProfile::bare_metal()).unwrap())
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let profile = client.profile().await.unwrap();
        assert_eq!(profile.name, "bare-metal");
    }

    #[test]
    fn test_invalid_url() {
        assert!(ApiClient::new("not a url").is_err());
    }
}
