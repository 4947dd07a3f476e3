use anyhow::{Context, Result};

use heft_core::gemini::{GenerateContentRequest, GenerateContentResponse, MODEL, quote_or_fallback};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub struct GeminiClient {
    client: reqwest::Client,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(format!(
                "heft-cli/{} (weight tracker)",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(std::time::Duration::from_secs(10))
            .connect_timeout(std::time::Duration::from_secs(5))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, api_key })
    }

    pub async fn generate_async(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let api_key = self
            .api_key
            .as_deref()
            .context("GEMINI_API_KEY is not set")?;

        let url = format!("{API_BASE}/{MODEL}:generateContent");
        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(request)
            .send()
            .await
            .context("Failed to reach Gemini API")?
            .error_for_status()
            .context("Gemini API returned an error")?;

        resp.json()
            .await
            .context("Failed to parse Gemini response")
    }

    /// One motivational quote. Failures resolve to a fallback line.
    pub async fn fetch_quote(&self) -> String {
        tracing::debug!(model = MODEL, "fetching motivational quote");
        let result = self
            .generate_async(&GenerateContentRequest::motivational_quote())
            .await;
        quote_or_fallback(result)
    }
}
