use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// --- Dialogflow ES v2 detectIntent wire format ---

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DetectIntentRequest<'a> {
    pub query_input: QueryInput<'a>,
}
#[derive(Serialize, Debug)]
pub struct QueryInput<'a> {
    pub text: TextInput<'a>,
}
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TextInput<'a> {
    pub text: &'a str,
    pub language_code: &'a str,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DetectIntentResponse {
    #[serde(default)]
    pub response_id: Option<String>,
    pub query_result: QueryResult,
}
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    #[serde(default)]
    pub fulfillment_text: String,
    // Absent when no intent matched
    #[serde(default)]
    pub intent: Option<IntentRef>,
    #[serde(default)]
    pub parameters: Map<String, Value>,
}
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct IntentRef {
    #[serde(default)]
    pub display_name: String,
}

// Google API error envelope
#[derive(Deserialize, Debug)]
pub struct GoogleErrorPayload {
    pub error: GoogleErrorDetail,
}
#[derive(Deserialize, Debug)]
pub struct GoogleErrorDetail {
    pub code: u16,
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}
