//! OpenAI-compatible chat-completions oracle.
//!
//! Without an API key the oracle declines every request (`Ok(None)`), so a
//! session can always be wired with one. Requests are counted per UTC day
//! and refused past the daily limit. Models are tried in order starting at
//! the last one that answered.

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::json;
use time::{Date, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::ai::oracle::{extract_response, DecisionOracle, OracleContext, OracleError, OracleResponse};
use crate::domain::state::{BiddingPhase, Phase};

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODELS: [&str; 4] = [
    "llama-3.1-8b-instant",
    "mixtral-8x7b-32768",
    "llama3-70b-8192",
    "gemma-7b-it",
];
pub const DEFAULT_DAILY_LIMIT: u32 = 14_000;

const SYSTEM_PROMPT: &str = "You are an expert Dou Dizhu (Fight the Landlord) player. \
Ranks order 3<4<5<6<7<8<9<10<J<Q<K<A<2<small joker<big joker; suits never matter. \
Always answer with a single JSON object.";

#[derive(Debug, Clone)]
pub struct HttpOracleConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub models: Vec<String>,
    pub daily_limit: u32,
    pub max_tokens: u32,
    pub temperature: f32,
    pub request_timeout: Duration,
}

impl Default for HttpOracleConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            daily_limit: DEFAULT_DAILY_LIMIT,
            max_tokens: 500,
            temperature: 0.7,
            request_timeout: Duration::from_secs(8),
        }
    }
}

impl HttpOracleConfig {
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.api_key = (!key.trim().is_empty()).then_some(key);
        self
    }
}

#[derive(Debug)]
struct DailyUsage {
    date: Date,
    count: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

pub struct HttpOracle {
    client: reqwest::Client,
    config: HttpOracleConfig,
    usage: Mutex<DailyUsage>,
    preferred_model: Mutex<usize>,
}

impl HttpOracle {
    pub fn new(config: HttpOracleConfig) -> Result<Self, OracleError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| OracleError::Unavailable(format!("http client: {e}")))?;
        Ok(Self {
            client,
            config,
            usage: Mutex::new(DailyUsage {
                date: OffsetDateTime::now_utc().date(),
                count: 0,
            }),
            preferred_model: Mutex::new(0),
        })
    }

    /// Requests counted today.
    pub fn request_count(&self) -> u32 {
        let mut usage = self.usage.lock();
        roll_day(&mut usage);
        usage.count
    }

    pub fn remaining_requests(&self) -> u32 {
        self.config.daily_limit.saturating_sub(self.request_count())
    }

    fn model_order(&self) -> Vec<String> {
        let n = self.config.models.len();
        let start = *self.preferred_model.lock();
        (0..n)
            .map(|i| self.config.models[(start + i) % n].clone())
            .collect()
    }

    async fn call_model(&self, key: &str, model: &str, prompt: &str) -> Result<String, OracleError> {
        let body = json!({
            "model": model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": prompt},
            ],
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "top_p": 0.9,
        });
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(url)
            .bearer_auth(key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OracleError::Timeout(self.config.request_timeout)
                } else {
                    OracleError::Http(e.to_string())
                }
            })?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(OracleError::Http(format!("{status}: {text}")));
        }
        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| OracleError::Parse(format!("chat response: {e}")))?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| OracleError::Parse("chat response without content".into()))
    }
}

fn roll_day(usage: &mut DailyUsage) {
    let today = OffsetDateTime::now_utc().date();
    if usage.date != today {
        usage.date = today;
        usage.count = 0;
    }
}

/// User prompt for one decision point.
pub fn build_prompt(ctx: &OracleContext) -> String {
    let mut prompt = format!(
        "Personality: {}\nDifficulty: {}\nRole: {:?}\nYour hand: {}\nCards left per seat: {:?}\nMultiplier: {}\n",
        ctx.personality,
        ctx.difficulty,
        ctx.role,
        ctx.current_cards.join(", "),
        ctx.remaining_cards,
        ctx.multiplier,
    );
    match (ctx.phase, ctx.bidding_phase) {
        (Phase::Bidding, Some(BiddingPhase::Grabbing)) => prompt.push_str(
            "Someone has called landlord. Grab the landlord role or not? \
             Options: \"grab\", \"pass\".\n\
             Reply as {\"decision\": \"grab|pass\", \"confidence\": 0.8, \"reasoning\": \"...\"}",
        ),
        (Phase::Bidding, _) => prompt.push_str(
            "Call landlord or not? Options: \"call\", \"pass\".\n\
             Reply as {\"decision\": \"call|pass\", \"confidence\": 0.8, \"reasoning\": \"...\"}",
        ),
        (Phase::Multiplier, _) => prompt.push_str(
            "Double the stake or not? Options: \"double\", \"pass\".\n\
             Reply as {\"decision\": \"double|pass\", \"confidence\": 0.7, \"reasoning\": \"...\"}",
        ),
        _ => {
            if ctx.last_play.is_empty() {
                prompt.push_str("You lead this trick; any valid pattern may be played.\n");
            } else {
                prompt.push_str(&format!(
                    "Play to beat: {}\n",
                    ctx.last_play.join(", ")
                ));
            }
            prompt.push_str(
                "Choose cards from your hand, as ranks separated by commas (e.g. \"3,3\" or \"K\"), or \"pass\".\n\
                 Reply as {\"decision\": \"3,3\", \"confidence\": 0.9, \"reasoning\": \"...\"}",
            );
        }
    }
    prompt
}

#[async_trait]
impl DecisionOracle for HttpOracle {
    async fn decide(
        &self,
        context: &OracleContext,
    ) -> Result<Option<OracleResponse>, OracleError> {
        let Some(key) = self.config.api_key.as_deref() else {
            debug!("No oracle API key configured; declining");
            return Ok(None);
        };
        {
            let mut usage = self.usage.lock();
            roll_day(&mut usage);
            if usage.count >= self.config.daily_limit {
                return Err(OracleError::RateLimited {
                    limit: self.config.daily_limit,
                });
            }
        }

        let prompt = build_prompt(context);
        let mut last_error = OracleError::Unavailable("no models configured".into());
        for model in self.model_order() {
            match self.call_model(key, &model, &prompt).await {
                Ok(content) => {
                    self.usage.lock().count += 1;
                    if let Some(idx) = self.config.models.iter().position(|m| *m == model) {
                        let mut preferred = self.preferred_model.lock();
                        if *preferred != idx {
                            info!(model = %model, "Switching preferred oracle model");
                            *preferred = idx;
                        }
                    }
                    return extract_response(&content).map(Some);
                }
                Err(e) => {
                    warn!(model = %model, error = %e, "Oracle model failed");
                    last_error = e;
                }
            }
        }
        Err(last_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::config::{Difficulty, Personality};
    use crate::domain::bidding::start_game;
    use crate::domain::player_view::CurrentRoundInfo;
    use crate::domain::state::RoundState;

    fn bidding_context() -> OracleContext {
        let mut s = RoundState::new(4);
        start_game(&mut s).unwrap();
        let seat = s.current_actor().unwrap();
        let view = CurrentRoundInfo::for_seat(&s, seat);
        OracleContext::from_view(&view, Personality::Balanced, Difficulty::Medium)
    }

    #[tokio::test]
    async fn declines_without_api_key() {
        let oracle = HttpOracle::new(HttpOracleConfig::default()).unwrap();
        let out = oracle.decide(&bidding_context()).await.unwrap();
        assert!(out.is_none());
        assert_eq!(oracle.request_count(), 0);
    }

    #[tokio::test]
    async fn refuses_past_daily_limit() {
        let config = HttpOracleConfig {
            daily_limit: 0,
            ..HttpOracleConfig::default()
        }
        .with_api_key("test-key");
        let oracle = HttpOracle::new(config).unwrap();
        let err = oracle.decide(&bidding_context()).await.unwrap_err();
        assert!(matches!(err, OracleError::RateLimited { limit: 0 }));
        assert_eq!(oracle.remaining_requests(), 0);
    }

    #[test]
    fn blank_api_key_counts_as_absent() {
        let config = HttpOracleConfig::default().with_api_key("   ");
        assert!(config.api_key.is_none());
    }

    #[test]
    fn prompt_lists_hand_and_options() {
        let ctx = bidding_context();
        let prompt = build_prompt(&ctx);
        assert!(prompt.contains(&ctx.current_cards[0]));
        assert!(prompt.contains("\"call\""));
        assert!(prompt.contains("balanced"));
    }
}
