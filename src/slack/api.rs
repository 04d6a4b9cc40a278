use anyhow::{Context, Result};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::time::{sleep, Duration};
use tracing::{debug, warn};

use super::client::SlackClient;
use super::types::{ResponseMetadata, SlackResponse, DEFAULT_RETRY_AFTER_SECS, PAGE_LIMIT};

impl SlackClient {
    pub(super) async fn get<T>(&self, method: &str, params: &[(&str, &str)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let builder = self.http.get(self.api_url(method)).query(params);
        let resp: SlackResponse<T> = self.call(builder, method).await?;
        Ok(resp.body)
    }

    /// Mutating methods send their arguments form-encoded.
    pub(super) async fn post<T>(&self, method: &str, params: &[(&str, &str)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let builder = self.http.post(self.api_url(method)).form(params);
        let resp: SlackResponse<T> = self.call(builder, method).await?;
        Ok(resp.body)
    }

    /// Follows `response_metadata.next_cursor` until the platform reports no
    /// further pages, collecting the items `extract` pulls out of each page.
    pub(super) async fn get_all_pages<P, I, F>(
        &self,
        method: &str,
        params: &[(&str, &str)],
        mut extract: F,
    ) -> Result<Vec<I>>
    where
        P: DeserializeOwned,
        F: FnMut(P) -> Vec<I>,
    {
        let mut items = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let mut page_params: Vec<(&str, &str)> = params.to_vec();
            page_params.push(("limit", PAGE_LIMIT));
            if let Some(ref c) = cursor {
                page_params.push(("cursor", c.as_str()));
            }

            let builder = self.http.get(self.api_url(method)).query(&page_params);
            let resp: SlackResponse<P> = self.call(builder, method).await?;
            pages += 1;

            items.extend(extract(resp.body));
            cursor = next_cursor(resp.response_metadata);

            if cursor.is_none() {
                break;
            }
        }

        debug!(method, pages, items = items.len(), "pagination finished");
        Ok(items)
    }

    async fn call<T>(&self, builder: RequestBuilder, method: &str) -> Result<SlackResponse<T>>
    where
        T: DeserializeOwned,
    {
        let response = self
            .execute_request(builder.bearer_auth(&self.token), method)
            .await?;

        let resp: SlackResponse<T> = response
            .json()
            .await
            .with_context(|| format!("Failed to parse {} response", method))?;

        if !resp.ok {
            let error_msg = resp.error.as_deref().unwrap_or("unknown error");
            anyhow::bail!("{} returned ok=false: {}", method, error_msg);
        }

        Ok(resp)
    }

    pub(super) async fn execute_request(
        &self,
        builder: RequestBuilder,
        label: &str,
    ) -> Result<Response> {
        let base_builder = builder;

        loop {
            let request = base_builder
                .try_clone()
                .context("Unable to clone Slack request for retry")?;

            let response = request
                .send()
                .await
                .with_context(|| format!("Failed to send {}", label))?;

            if response.status() == StatusCode::TOO_MANY_REQUESTS {
                let wait = retry_after(&response);
                warn!(
                    method = label,
                    wait_secs = wait.as_secs(),
                    "rate limited, waiting before retrying"
                );
                sleep(wait).await;
                continue;
            }

            if !response.status().is_success() {
                anyhow::bail!("{} returned status: {}", label, response.status());
            }

            return Ok(response);
        }
    }

    fn api_url(&self, method: &str) -> String {
        format!("{}{}", self.base_url, method)
    }
}

fn next_cursor(metadata: Option<ResponseMetadata>) -> Option<String> {
    metadata
        .and_then(|meta| meta.next_cursor)
        .filter(|cursor| !cursor.is_empty())
}

fn retry_after(response: &Response) -> Duration {
    response
        .headers()
        .get("Retry-After")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or_else(|| Duration::from_secs(DEFAULT_RETRY_AFTER_SECS))
}
