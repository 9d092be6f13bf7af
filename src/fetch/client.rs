use async_trait::async_trait;
use reqwest::{Request, Response};

/// Minimal HTTP capability the source loader needs.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
