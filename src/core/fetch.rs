use std::time::Duration;

use crate::rdf::{turtle, Graph};
use crate::utils::error::{Result, WrangleError};

/// HTTP access to CALMA documents: GET with Turtle content negotiation,
/// parsed straight into a graph.
#[derive(Debug, Clone)]
pub struct RdfClient {
    client: reqwest::Client,
}

impl RdfClient {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(RdfClient { client })
    }

    /// Fetch `url` and parse the response body as Turtle. Relative IRIs in
    /// the document are resolved against the request URL.
    pub async fn fetch_graph(&self, url: &str) -> Result<Graph> {
        tracing::debug!("GET {} (Accept: text/turtle)", url);
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "text/turtle")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WrangleError::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let graph = turtle::parse(&body, Some(url)).map_err(|source| WrangleError::TurtleError {
            url: url.to_string(),
            source,
        })?;
        tracing::debug!("Parsed {} triples from {}", graph.len(), url);
        Ok(graph)
    }
}
