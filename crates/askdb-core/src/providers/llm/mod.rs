use async_trait::async_trait;

/// Black-box text-completion service. Implementations return free-form model
/// output; sanitization is the synthesizer's job, not the client's.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> anyhow::Result<String>;
    fn provider_name(&self) -> &'static str;
}

pub mod fake;
pub mod ollama;
