use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub text: String,
    pub subject: Option<String>,
    pub sentiment: Option<String>,
    pub category_id: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub status: String,
    pub ticket_id: i32,
}

/// The one projection shape every consumer sees. Tickets missing a relation
/// carry empty strings and zero confidences, never nulls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketView {
    pub id: i32,
    pub subject: String,
    pub body: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub classification: ClassificationView,
    pub contact: ContactView,
    pub facility: FacilityView,
    pub device: DeviceView,
    pub ai_response: AiResponseView,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationView {
    pub sentiment: String,
    pub sentiment_confidence: f64,
    pub category: String,
    pub category_confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactView {
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacilityView {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceView {
    pub serial_number: String,
    #[serde(rename = "type")]
    pub device_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiResponseView {
    pub subject: String,
    pub body: String,
    pub method: String,
}

#[derive(Debug, Serialize)]
pub struct StatsView {
    pub total_processed: i64,
    pub by_sentiment: BTreeMap<String, i64>,
    pub by_category: BTreeMap<String, i64>,
    pub last_updated: DateTime<Utc>,
}
