use super::service::{InterpretedUtterance, IntentInterpreter, InterpreterError};
use super::types::{
    DetectIntentRequest, DetectIntentResponse, GoogleErrorPayload, QueryInput, TextInput,
};
use crate::sdk::config::{DialogflowConfig, TokenSource};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use tokio::sync::OnceCell;
use uuid::Uuid;
use yup_oauth2::authenticator::DefaultAuthenticator;
use yup_oauth2::ServiceAccountAuthenticator;

const DIALOGFLOW_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// Dialogflow ES client speaking the v2 REST API.
pub struct DialogflowInterpreter {
    client: Client,
    config: DialogflowConfig,
    // Built on first use; holds the token cache for the process lifetime
    service_account: OnceCell<DefaultAuthenticator>,
}

impl DialogflowInterpreter {
    pub fn new(config: DialogflowConfig) -> Result<Self, InterpreterError> {
        Ok(Self {
            client: Client::builder().timeout(Duration::from_secs(15)).build()?,
            config,
            service_account: OnceCell::new(),
        })
    }

    /// Credentials are read per call so that a refreshed token file is picked
    /// up without restarting. Service account tokens come from the
    /// authenticator's cache and are only exchanged again near expiry.
    async fn bearer_token(&self) -> Result<String, InterpreterError> {
        let token = match &self.config.token {
            TokenSource::Inline(token) => token.clone(),
            TokenSource::File(path) => tokio::fs::read_to_string(path).await.map_err(|e| {
                InterpreterError::Credentials(format!("{}: {}", path.display(), e))
            })?,
            TokenSource::ServiceAccount(path) => self.service_account_token(path).await?,
            TokenSource::Missing => {
                return Err(InterpreterError::Credentials(
                    "no access token configured".to_string(),
                ))
            }
        };
        let token = token.trim();
        if token.is_empty() {
            return Err(InterpreterError::Credentials("access token is empty".to_string()));
        }
        Ok(token.to_string())
    }

    async fn service_account_token(&self, path: &Path) -> Result<String, InterpreterError> {
        let credentials = |e: std::io::Error| {
            InterpreterError::Credentials(format!("{}: {}", path.display(), e))
        };
        let auth = self
            .service_account
            .get_or_try_init(|| async {
                let key = yup_oauth2::read_service_account_key(path)
                    .await
                    .map_err(credentials)?;
                log::info!("[Dialogflow] Using service account {}", key.client_email);
                ServiceAccountAuthenticator::builder(key)
                    .build()
                    .await
                    .map_err(credentials)
            })
            .await?;

        let token = auth.token(&[DIALOGFLOW_SCOPE]).await.map_err(|e| {
            InterpreterError::Credentials(format!("token exchange failed: {}", e))
        })?;
        token
            .token()
            .map(str::to_string)
            .ok_or_else(|| InterpreterError::Credentials("token exchange returned no token".into()))
    }

    fn session_url(&self, session_id: &str) -> String {
        format!(
            "{}/v2/projects/{}/agent/sessions/{}:detectIntent",
            self.config.base_url.trim_end_matches('/'),
            self.config.project_id,
            session_id
        )
    }
}

#[async_trait]
impl IntentInterpreter for DialogflowInterpreter {
    async fn interpret(&self, utterance: &str) -> Result<InterpretedUtterance, InterpreterError> {
        let token = self.bearer_token().await?;

        let session_id = Uuid::new_v4().to_string();
        log::debug!("[Dialogflow] Session ID: {}", session_id);
        log::debug!("[Dialogflow] Query Input: {}", utterance);

        let url = self.session_url(&session_id);
        let body = DetectIntentRequest {
            query_input: QueryInput {
                text: TextInput {
                    text: utterance,
                    language_code: &self.config.language_code,
                },
            },
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                log::error!("Failed to send detectIntent request. URL: {}\nError: {}", url, e);
                e
            })?;

        let status = response.status();
        let text = response.text().await?;
        let interpreted = decode_detect_intent(status, &text)?;
        log::debug!("[Dialogflow] Bot Reply: {}", interpreted.reply_text);
        Ok(interpreted)
    }
}

/// Maps a detectIntent response body to an `InterpretedUtterance`.
pub fn decode_detect_intent(
    status: StatusCode,
    text: &str,
) -> Result<InterpretedUtterance, InterpreterError> {
    if !status.is_success() {
        let message = match serde_json::from_str::<GoogleErrorPayload>(text) {
            Ok(payload) => match payload.error.status {
                Some(kind) => format!("{} ({})", payload.error.message, kind),
                None => payload.error.message,
            },
            Err(_) => {
                log::error!(
                    "Dialogflow returned non-success status: {}. Unparseable Body: {}",
                    status,
                    text
                );
                text.to_string()
            }
        };
        return Err(InterpreterError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let response: DetectIntentResponse = serde_json::from_str(text).map_err(|e| {
        log::error!("Failed to parse DetectIntentResponse.\nError: {}. Body: {}", e, text);
        e
    })?;
    if let Some(id) = &response.response_id {
        log::trace!("[Dialogflow] Response ID: {}", id);
    }

    let result = response.query_result;
    let slots: BTreeMap<String, String> = result
        .parameters
        .iter()
        .filter_map(|(key, value)| slot_value(value).map(|v| (key.clone(), v)))
        .collect();

    Ok(InterpretedUtterance {
        intent_name: result.intent.map(|i| i.display_name).unwrap_or_default(),
        reply_text: result.fulfillment_text,
        slots,
    })
}

// Unfilled Dialogflow parameters come back as "" and are treated as absent.
fn slot_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
