use chrono::{DateTime, Utc};
use diesel::dsl::count_star;
use diesel::prelude::*;
use log::error;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::shared::schema::{
    categories, contacts, facilities, gas_analyzer_types, gas_analyzers, sentiments, tickets,
};
use crate::tickets::error::TicketsError;
use crate::tickets::types::{
    AiResponseView, ClassificationView, ContactView, DeviceView, FacilityView, PredictRequest,
    StatsView, TicketView,
};

pub const STATUS_OPEN: &str = "open";

pub const SENTIMENT_NEGATIVE: i32 = 1;
pub const SENTIMENT_NEUTRAL: i32 = 2;
pub const SENTIMENT_POSITIVE: i32 = 3;

const DEFAULT_CATEGORY_ID: i32 = 1;
const DEFAULT_FACILITY_ID: i32 = 1;
const DEFAULT_CONTACT_ID: i32 = 1;

const SUBJECT_MAX_CHARS: usize = 255;
const FALLBACK_SUBJECT: &str = "Support request";

#[derive(Debug, Clone, Serialize, Deserialize, Queryable)]
pub struct TicketRow {
    pub id: i32,
    pub email_id: Option<String>,
    pub subject: String,
    pub body: String,
    pub status: String,
    pub facility_id: Option<i32>,
    pub contact_id: Option<i32>,
    pub sentiment_id: Option<i32>,
    pub category_id: Option<i32>,
    pub gas_analyzer_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub sentiment_confidence: Option<f64>,
    pub category_confidence: Option<f64>,
    pub generated_response: Option<String>,
    pub response_subject: Option<String>,
    pub response_method: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable)]
pub struct FacilityRow {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable)]
pub struct ContactRow {
    pub id: i32,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable)]
pub struct CategoryRow {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable)]
pub struct SentimentRow {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable)]
pub struct GasAnalyzerRow {
    pub id: i32,
    pub serial_number: String,
    pub type_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable)]
pub struct GasAnalyzerTypeRow {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = tickets)]
pub struct NewTicket {
    pub email_id: Option<String>,
    pub subject: String,
    pub body: String,
    pub status: String,
    pub facility_id: Option<i32>,
    pub contact_id: Option<i32>,
    pub sentiment_id: Option<i32>,
    pub category_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl NewTicket {
    /// Applies the ingestion defaults: open status, neutral sentiment and
    /// category 1 unless the classifier provided values, and the placeholder
    /// facility/contact rows until enrichment assigns real ones.
    pub fn from_request(req: PredictRequest) -> Self {
        let subject = derive_subject(req.subject.as_deref(), &req.text);
        Self {
            email_id: None,
            subject,
            body: req.text,
            status: STATUS_OPEN.to_string(),
            facility_id: Some(DEFAULT_FACILITY_ID),
            contact_id: Some(DEFAULT_CONTACT_ID),
            sentiment_id: Some(sentiment_ref_id(req.sentiment.as_deref())),
            category_id: Some(req.category_id.unwrap_or(DEFAULT_CATEGORY_ID)),
            created_at: Utc::now(),
        }
    }
}

/// Maps a classifier label onto the seeded sentiment rows. Unknown or missing
/// labels fall back to neutral.
pub fn sentiment_ref_id(label: Option<&str>) -> i32 {
    match label.map(|l| l.trim().to_lowercase()).as_deref() {
        Some("negative") => SENTIMENT_NEGATIVE,
        Some("positive") => SENTIMENT_POSITIVE,
        _ => SENTIMENT_NEUTRAL,
    }
}

/// Picks the ticket subject: the explicit one when present, otherwise the
/// first usable body line with leading list markers stripped, otherwise a
/// fixed label. Capped at 255 characters, not bytes.
fn derive_subject(explicit: Option<&str>, body: &str) -> String {
    if let Some(subject) = explicit {
        let subject = subject.trim();
        if !subject.is_empty() {
            return cap_subject(subject);
        }
    }
    for line in body.lines() {
        let line = line.trim().trim_start_matches(['*', '#', '-']).trim_start();
        if !line.is_empty() {
            return cap_subject(line);
        }
    }
    FALLBACK_SUBJECT.to_string()
}

fn cap_subject(subject: &str) -> String {
    subject.chars().take(SUBJECT_MAX_CHARS).collect()
}

/// Left joins produce nulls for tickets missing a relation; the projection
/// substitutes each type's empty value instead.
fn or_default<T: Default>(value: Option<T>) -> T {
    value.unwrap_or_default()
}

type JoinedTicket = (
    TicketRow,
    Option<FacilityRow>,
    Option<ContactRow>,
    Option<CategoryRow>,
    Option<SentimentRow>,
    Option<GasAnalyzerRow>,
    Option<GasAnalyzerTypeRow>,
);

fn row_to_view(row: JoinedTicket) -> TicketView {
    let (ticket, facility, contact, category, sentiment, analyzer, analyzer_type) = row;
    let (contact_name, contact_email, contact_phone) = match contact {
        Some(c) => (Some(c.full_name), c.email, c.phone),
        None => (None, None, None),
    };
    TicketView {
        id: ticket.id,
        subject: ticket.subject,
        body: ticket.body,
        status: ticket.status,
        created_at: ticket.created_at,
        classification: ClassificationView {
            sentiment: or_default(sentiment.map(|s| s.name)),
            sentiment_confidence: or_default(ticket.sentiment_confidence),
            category: or_default(category.map(|c| c.name)),
            category_confidence: or_default(ticket.category_confidence),
        },
        contact: ContactView {
            name: or_default(contact_name),
            email: or_default(contact_email),
            phone: or_default(contact_phone),
        },
        facility: FacilityView {
            name: or_default(facility.map(|f| f.name)),
        },
        device: DeviceView {
            serial_number: or_default(analyzer.map(|a| a.serial_number)),
            device_type: or_default(analyzer_type.map(|t| t.name)),
        },
        ai_response: AiResponseView {
            subject: or_default(ticket.response_subject),
            body: or_default(ticket.generated_response),
            method: or_default(ticket.response_method),
        },
    }
}

pub fn create_ticket(conn: &mut PgConnection, ticket: NewTicket) -> Result<i32, TicketsError> {
    diesel::insert_into(tickets::table)
        .values(&ticket)
        .returning(tickets::id)
        .get_result(conn)
        .map_err(|err| {
            error!("ticket insert failed: {}", err);
            TicketsError::Write(err.to_string())
        })
}

pub fn list_tickets(
    conn: &mut PgConnection,
    limit: Option<i64>,
) -> Result<Vec<TicketView>, TicketsError> {
    let mut query = tickets::table
        .left_join(facilities::table)
        .left_join(contacts::table)
        .left_join(categories::table)
        .left_join(sentiments::table)
        .left_join(gas_analyzers::table.left_join(gas_analyzer_types::table))
        .select((
            tickets::all_columns,
            facilities::all_columns.nullable(),
            contacts::all_columns.nullable(),
            categories::all_columns.nullable(),
            sentiments::all_columns.nullable(),
            gas_analyzers::all_columns.nullable(),
            gas_analyzer_types::all_columns.nullable(),
        ))
        .order(tickets::id.desc())
        .into_boxed();

    if let Some(limit) = limit {
        query = query.limit(limit);
    }

    let rows: Vec<JoinedTicket> = query.load(conn).map_err(|err| {
        error!("ticket list query failed: {}", err);
        TicketsError::Query(err.to_string())
    })?;

    Ok(rows.into_iter().map(row_to_view).collect())
}

pub fn find_ticket(
    conn: &mut PgConnection,
    ticket_id: i32,
) -> Result<Option<TicketView>, TicketsError> {
    let row: Option<JoinedTicket> = tickets::table
        .left_join(facilities::table)
        .left_join(contacts::table)
        .left_join(categories::table)
        .left_join(sentiments::table)
        .left_join(gas_analyzers::table.left_join(gas_analyzer_types::table))
        .filter(tickets::id.eq(ticket_id))
        .select((
            tickets::all_columns,
            facilities::all_columns.nullable(),
            contacts::all_columns.nullable(),
            categories::all_columns.nullable(),
            sentiments::all_columns.nullable(),
            gas_analyzers::all_columns.nullable(),
            gas_analyzer_types::all_columns.nullable(),
        ))
        .first(conn)
        .optional()
        .map_err(|err| {
            error!("ticket {} lookup failed: {}", ticket_id, err);
            TicketsError::Query(err.to_string())
        })?;

    Ok(row.map(row_to_view))
}

pub fn ticket_stats(conn: &mut PgConnection) -> Result<StatsView, TicketsError> {
    let total_processed: i64 = tickets::table
        .select(count_star())
        .get_result(conn)
        .map_err(|err| {
            error!("ticket count query failed: {}", err);
            TicketsError::Query(err.to_string())
        })?;

    let sentiment_rows: Vec<(Option<String>, i64)> = tickets::table
        .left_join(sentiments::table)
        .group_by(sentiments::name)
        .select((sentiments::name.nullable(), count_star()))
        .load(conn)
        .map_err(|err| {
            error!("sentiment breakdown query failed: {}", err);
            TicketsError::Query(err.to_string())
        })?;

    let category_rows: Vec<(Option<String>, i64)> = tickets::table
        .left_join(categories::table)
        .group_by(categories::name)
        .select((categories::name.nullable(), count_star()))
        .load(conn)
        .map_err(|err| {
            error!("category breakdown query failed: {}", err);
            TicketsError::Query(err.to_string())
        })?;

    Ok(StatsView {
        total_processed,
        by_sentiment: tally(sentiment_rows),
        by_category: tally(category_rows),
        last_updated: Utc::now(),
    })
}

fn tally(rows: Vec<(Option<String>, i64)>) -> BTreeMap<String, i64> {
    rows.into_iter()
        .map(|(name, count)| (name.unwrap_or_else(|| "unknown".to_string()), count))
        .collect()
}
