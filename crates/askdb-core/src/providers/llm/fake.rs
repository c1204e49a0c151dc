use super::LlmClient;
use async_trait::async_trait;

/// Deterministic in-process client for tests and offline runs.
pub struct FakeClient {
    response: String,
    fail_with: Option<String>,
}

impl FakeClient {
    pub fn with_response(response: &str) -> Self {
        Self {
            response: response.to_string(),
            fail_with: None,
        }
    }

    pub fn failing(detail: &str) -> Self {
        Self {
            response: String::new(),
            fail_with: Some(detail.to_string()),
        }
    }
}

#[async_trait]
impl LlmClient for FakeClient {
    async fn complete(&self, _prompt: &str) -> anyhow::Result<String> {
        if let Some(detail) = &self.fail_with {
            anyhow::bail!("{}", detail);
        }
        Ok(self.response.clone())
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}
