use std::env;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use quiz_core::{AnswerPayload, Level, Question, QuestionId, Subject};

use super::{ApiError, LeaderboardApi, ProgressApi, ProgressUpdate, QuestionApi, ScoreSubmission};

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
    pub bearer_token: Option<String>,
}

impl ApiConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            bearer_token: None,
        }
    }

    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Read the API endpoint from `QUIZ_API_BASE_URL` / `QUIZ_API_TOKEN`.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let base_url = env::var("QUIZ_API_BASE_URL").ok()?;
        if base_url.trim().is_empty() {
            return None;
        }
        let bearer_token = env::var("QUIZ_API_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty());
        Some(Self {
            base_url,
            bearer_token,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url.trim_end_matches('/'))
    }
}

/// Reqwest-backed implementation of the three collaborator contracts.
#[derive(Clone)]
pub struct HttpApi {
    client: Client,
    config: ApiConfig,
}

impl HttpApi {
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.config.bearer_token.as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

/// Wire shape of one question record, internally tagged by `type`.
#[derive(Debug, Deserialize)]
struct QuestionRecord {
    id: u64,
    prompt: String,
    timer_secs: u32,
    #[serde(flatten)]
    payload: AnswerPayload,
}

impl QuestionRecord {
    fn into_question(self) -> Result<Question, ApiError> {
        Question::new(
            QuestionId::new(self.id),
            self.prompt,
            self.payload,
            self.timer_secs,
        )
        .map_err(ApiError::from)
    }
}

#[async_trait]
impl QuestionApi for HttpApi {
    async fn fetch_questions(
        &self,
        subject: &Subject,
        level: Level,
    ) -> Result<Vec<Question>, ApiError> {
        let response = self
            .request(self.client.get(self.config.endpoint("questions")))
            .query(&[
                ("subject", subject.as_str().to_string()),
                ("level", level.value().to_string()),
            ])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound);
        }
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }

        let records: Vec<QuestionRecord> = response.json().await?;
        records
            .into_iter()
            .map(QuestionRecord::into_question)
            .collect()
    }
}

#[async_trait]
impl LeaderboardApi for HttpApi {
    async fn submit_score(&self, submission: &ScoreSubmission) -> Result<(), ApiError> {
        let response = self
            .request(self.client.post(self.config.endpoint("leaderboard")))
            .json(submission)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }
        Ok(())
    }
}

#[async_trait]
impl ProgressApi for HttpApi {
    async fn submit_progress(&self, update: &ProgressUpdate) -> Result<(), ApiError> {
        let response = self
            .request(self.client.post(self.config.endpoint("user/progress")))
            .json(update)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }
        Ok(())
    }
}
