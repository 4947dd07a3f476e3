//! Motivational quote: request/response shapes for the Gemini
//! `generateContent` endpoint and the fallback rules around them.
//!
//! The HTTP call itself lives with the platform client; this module only
//! decides what text the user ends up seeing.

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub const MODEL: &str = "gemini-2.5-flash";

pub const QUOTE_PROMPT: &str = "Give me a short, inspiring motivational quote for someone on a weight loss journey. The quote should be concise and uplifting. Only return the quote itself, without any surrounding text like \"Here is a quote:\" or quotation marks.";

/// Shown when the model answers with nothing usable.
pub const FALLBACK_EMPTY: &str = "You are stronger than you think.";
/// Shown when the request fails outright.
pub const FALLBACK_ERROR: &str = "Believe in the process and trust yourself.";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f64,
    pub max_output_tokens: u32,
    pub thinking_config: ThinkingConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThinkingConfig {
    pub thinking_budget: u32,
}

#[derive(Debug, Deserialize, Default)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize, Default)]
pub struct Candidate {
    #[serde(default)]
    pub content: Content,
}

impl GenerateContentRequest {
    #[must_use]
    pub fn motivational_quote() -> Self {
        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(QUOTE_PROMPT.to_string()),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 1.0,
                max_output_tokens: 60,
                thinking_config: ThinkingConfig { thinking_budget: 0 },
            },
        }
    }
}

impl GenerateContentResponse {
    /// Text parts of the first candidate, joined.
    #[must_use]
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

/// Trim the model output and drop one pair of surrounding double quotes.
#[must_use]
pub fn clean_quote(raw: &str) -> Option<String> {
    let text = raw.trim();
    let text = text.strip_prefix('"').unwrap_or(text);
    let text = text.strip_suffix('"').unwrap_or(text);
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Resolve a quote fetch into display text. Never fails.
#[must_use]
pub fn quote_or_fallback(result: Result<GenerateContentResponse>) -> String {
    match result {
        Ok(resp) => clean_quote(&resp.text()).unwrap_or_else(|| {
            tracing::warn!("quote response was empty, using fallback");
            FALLBACK_EMPTY.to_string()
        }),
        Err(e) => {
            let error = format!("{e:#}");
            tracing::warn!(%error, "quote fetch failed, using fallback");
            FALLBACK_ERROR.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(json: &str) -> GenerateContentResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(GenerateContentRequest::motivational_quote()).unwrap();
        assert_eq!(body["contents"][0]["parts"][0]["text"], QUOTE_PROMPT);
        assert_eq!(body["generationConfig"]["temperature"], 1.0);
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 60);
        assert_eq!(
            body["generationConfig"]["thinkingConfig"]["thinkingBudget"],
            0
        );
    }

    #[test]
    fn test_response_text_joins_first_candidate_parts() {
        let resp = response(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Small steps "},{"text":"add up."}]},"finishReason":"STOP"}]}"#,
        );
        assert_eq!(resp.text(), "Small steps add up.");
    }

    #[test]
    fn test_response_without_candidates() {
        assert_eq!(response("{}").text(), "");
        assert_eq!(response(r#"{"candidates":[{}]}"#).text(), "");
    }

    #[test]
    fn test_clean_quote_strips_quotes_and_whitespace() {
        assert_eq!(
            clean_quote("  \"Progress, not perfection.\"\n").as_deref(),
            Some("Progress, not perfection.")
        );
        assert_eq!(
            clean_quote("Keep going.").as_deref(),
            Some("Keep going.")
        );
        assert_eq!(clean_quote("   "), None);
        assert_eq!(clean_quote("\"\""), None);
    }

    #[test]
    fn test_quote_or_fallback() {
        let ok = response(r#"{"candidates":[{"content":{"parts":[{"text":"\"One day at a time.\""}]}}]}"#);
        assert_eq!(quote_or_fallback(Ok(ok)), "One day at a time.");

        assert_eq!(
            quote_or_fallback(Ok(GenerateContentResponse::default())),
            FALLBACK_EMPTY
        );
        assert_eq!(
            quote_or_fallback(Err(anyhow::anyhow!("connection refused"))),
            FALLBACK_ERROR
        );
    }
}
