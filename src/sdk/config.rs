use anyhow::{bail, Context, Result};
use std::{env, fmt, path::PathBuf, time::Duration};

pub const DEFAULT_DIALOGFLOW_BASE_URL: &str = "https://dialogflow.googleapis.com";
pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_TURN_TIMEOUT_SECS: u64 = 15;

/// Where the Dialogflow bearer token comes from.
#[derive(Clone)]
pub enum TokenSource {
    Inline(String),
    File(PathBuf),
    /// Service account key (JSON) exchanged for scoped access tokens, which
    /// are cached and refreshed as they expire.
    ServiceAccount(PathBuf),
    // Not fatal at startup: each turn reports the credentials message instead
    Missing,
}

impl fmt::Debug for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenSource::Inline(_) => f.write_str("Inline([REDACTED])"),
            TokenSource::File(path) => f.debug_tuple("File").field(path).finish(),
            TokenSource::ServiceAccount(path) => {
                f.debug_tuple("ServiceAccount").field(path).finish()
            }
            TokenSource::Missing => f.write_str("Missing"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DialogflowConfig {
    pub project_id: String,
    pub language_code: String,
    pub base_url: String,
    pub token: TokenSource,
}

#[derive(Clone)]
pub enum GeocoderConfig {
    Remote { api_key: String },
    Local { base_url: String },
}

impl fmt::Debug for GeocoderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeocoderConfig::Remote { .. } => f
                .debug_struct("Remote")
                .field("api_key", &"[REDACTED]")
                .finish(),
            GeocoderConfig::Local { base_url } => {
                f.debug_struct("Local").field("base_url", base_url).finish()
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct NavConfig {
    pub dialogflow: DialogflowConfig,
    pub geocoder: GeocoderConfig,
    pub turn_timeout: Duration,
}

impl NavConfig {
    /// Reads the configuration from the process environment. Call
    /// `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let project_id = var("DIALOGFLOW_PROJECT_ID").context("DIALOGFLOW_PROJECT_ID not set")?;
        let service_account =
            var("DIALOGFLOW_SERVICE_ACCOUNT_FILE").or_else(|| var("GOOGLE_APPLICATION_CREDENTIALS"));
        let token = match (
            var("DIALOGFLOW_ACCESS_TOKEN"),
            service_account,
            var("DIALOGFLOW_TOKEN_FILE"),
        ) {
            (Some(token), _, _) => TokenSource::Inline(token),
            (None, Some(path), _) => TokenSource::ServiceAccount(PathBuf::from(path)),
            (None, None, Some(path)) => TokenSource::File(PathBuf::from(path)),
            (None, None, None) => {
                log::warn!("No Dialogflow access token configured - every command will fail");
                TokenSource::Missing
            }
        };
        let dialogflow = DialogflowConfig {
            project_id,
            language_code: var("DIALOGFLOW_LANGUAGE").unwrap_or_else(|| DEFAULT_LANGUAGE.into()),
            base_url: var("DIALOGFLOW_BASE_URL")
                .unwrap_or_else(|| DEFAULT_DIALOGFLOW_BASE_URL.into()),
            token,
        };

        // A self-hosted geocoder wins over the hosted one when both are set
        let geocoder = match (var("PELIAS_BASE_URL"), var("ORS_API_KEY")) {
            (Some(base_url), _) => GeocoderConfig::Local { base_url },
            (None, Some(api_key)) => GeocoderConfig::Remote { api_key },
            (None, None) => bail!("Set ORS_API_KEY or PELIAS_BASE_URL to enable place lookup"),
        };

        let turn_timeout = match var("NAV_TURN_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw
                    .parse()
                    .with_context(|| format!("NAV_TURN_TIMEOUT_SECS is not a number: {}", raw))?;
                if secs == 0 {
                    bail!("NAV_TURN_TIMEOUT_SECS must be at least 1");
                }
                secs
            }
            None => DEFAULT_TURN_TIMEOUT_SECS,
        };

        Ok(Self {
            dialogflow,
            geocoder,
            turn_timeout: Duration::from_secs(turn_timeout),
        })
    }
}
