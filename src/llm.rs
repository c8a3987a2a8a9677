use eyre::{Result, bail};
use log::debug;

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Token and cost counters accumulated across all calls in one run
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Usage {
    pub requests: u32,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub cost_usd: f64,
}

impl Usage {
    pub fn total_tokens(&self) -> u64 {
        self.prompt_tokens + self.completion_tokens
    }
}

impl std::fmt::Display for Usage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Tokens Used: {}", self.total_tokens())?;
        writeln!(f, "\tPrompt Tokens: {}", self.prompt_tokens)?;
        writeln!(f, "\tCompletion Tokens: {}", self.completion_tokens)?;
        writeln!(f, "Successful Requests: {}", self.requests)?;
        write!(f, "Total Cost (USD): ${:.6}", self.cost_usd)
    }
}

/// The text-generation seam: one blocking completion call per prompt,
/// with running usage counters.
#[allow(async_fn_in_trait)]
pub trait TextGenerator {
    async fn complete(&mut self, prompt: &str) -> Result<String>;
    fn usage(&self) -> &Usage;
}

/// OpenAI chat-completions client
pub struct OpenAi {
    client: reqwest::Client,
    api_key: String,
    model: String,
    usage: Usage,
}

impl OpenAi {
    pub fn new(client: reqwest::Client, model: &str) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| eyre::eyre!("OPENAI_API_KEY environment variable not set (required for summarization)"))?;
        Ok(OpenAi {
            client,
            api_key,
            model: model.to_string(),
            usage: Usage::default(),
        })
    }
}

impl TextGenerator for OpenAi {
    async fn complete(&mut self, prompt: &str) -> Result<String> {
        debug!("Requesting completion from {} (prompt: {} chars)", self.model, prompt.len());

        let body = serde_json::json!({
            "model": self.model,
            "temperature": 0,
            "messages": [
                {
                    "role": "user",
                    "content": prompt
                }
            ]
        });

        let resp = self
            .client
            .post(CHAT_COMPLETIONS_URL)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("OpenAI API returned {status}: {body}");
        }

        let json: serde_json::Value = resp.json().await?;
        let (text, prompt_tokens, completion_tokens) = extract_completion(&json)?;

        self.usage.requests += 1;
        self.usage.prompt_tokens += prompt_tokens;
        self.usage.completion_tokens += completion_tokens;
        self.usage.cost_usd += completion_cost(&self.model, prompt_tokens, completion_tokens);

        debug!(
            "Completion received: {} chars, {prompt_tokens}+{completion_tokens} tokens",
            text.len()
        );

        Ok(text)
    }

    fn usage(&self) -> &Usage {
        &self.usage
    }
}

fn extract_completion(json: &serde_json::Value) -> Result<(String, u64, u64)> {
    let text = json
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|t| t.as_str());

    let Some(text) = text else {
        bail!("unexpected OpenAI API response format");
    };

    let prompt_tokens = json
        .pointer("/usage/prompt_tokens")
        .and_then(|v| v.as_u64())
        .unwrap_or_default();
    let completion_tokens = json
        .pointer("/usage/completion_tokens")
        .and_then(|v| v.as_u64())
        .unwrap_or_default();

    Ok((text.to_string(), prompt_tokens, completion_tokens))
}

/// Estimated USD cost per call; unknown models count tokens but cost zero
fn completion_cost(model: &str, prompt_tokens: u64, completion_tokens: u64) -> f64 {
    // (prompt, completion) USD per 1K tokens
    let (prompt_rate, completion_rate) = match model {
        m if m.starts_with("gpt-3.5-turbo") => (0.0015, 0.002),
        m if m.starts_with("gpt-4o-mini") => (0.00015, 0.0006),
        m if m.starts_with("gpt-4o") => (0.0025, 0.01),
        _ => (0.0, 0.0),
    };
    (prompt_tokens as f64 / 1000.0) * prompt_rate + (completion_tokens as f64 / 1000.0) * completion_rate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_completion() {
        let json = serde_json::json!({
            "choices": [
                {
                    "message": {
                        "role": "assistant",
                        "content": "[31]: Intro"
                    }
                }
            ],
            "usage": {
                "prompt_tokens": 120,
                "completion_tokens": 8,
                "total_tokens": 128
            }
        });
        let (text, prompt, completion) = extract_completion(&json).unwrap();
        assert_eq!(text, "[31]: Intro");
        assert_eq!(prompt, 120);
        assert_eq!(completion, 8);
    }

    #[test]
    fn test_extract_completion_missing_usage() {
        let json = serde_json::json!({
            "choices": [
                {
                    "message": { "content": "ok" }
                }
            ]
        });
        let (text, prompt, completion) = extract_completion(&json).unwrap();
        assert_eq!(text, "ok");
        assert_eq!(prompt, 0);
        assert_eq!(completion, 0);
    }

    #[test]
    fn test_extract_completion_empty_choices() {
        let json = serde_json::json!({"choices": []});
        assert!(extract_completion(&json).is_err());
    }

    #[test]
    fn test_completion_cost_known_model() {
        let cost = completion_cost("gpt-3.5-turbo", 1000, 1000);
        assert!((cost - 0.0035).abs() < 1e-9);
    }

    #[test]
    fn test_completion_cost_unknown_model() {
        assert_eq!(completion_cost("some-local-model", 1000, 1000), 0.0);
    }

    #[test]
    fn test_usage_display() {
        let usage = Usage {
            requests: 3,
            prompt_tokens: 280,
            completion_tokens: 40,
            cost_usd: 0.0005,
        };
        let rendered = usage.to_string();
        assert!(rendered.contains("Tokens Used: 320"));
        assert!(rendered.contains("Prompt Tokens: 280"));
        assert!(rendered.contains("Completion Tokens: 40"));
        assert!(rendered.contains("Successful Requests: 3"));
        assert!(rendered.contains("Total Cost (USD): $0.000500"));
    }
}
