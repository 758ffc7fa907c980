use crate::payload::{column_path_text, first_present};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use std::cmp::Ordering;

/// Shown wherever a field has no usable value.
pub const PLACEHOLDER: &str = "-";

/// The raw columns of one alarm row as read from the `events` table.
///
/// `registered_location` is only populated by the query that joins the
/// `register` table; it is `NULL` when that table is unavailable.
#[derive(Debug, Clone, Default, PartialEq, FromRow, Serialize, Deserialize)]
pub struct AlertSource {
    pub integration_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub raw_payload: Option<JsonValue>,
    pub triage: Option<JsonValue>,
    pub triage_level: Option<String>,
    pub resumo: Option<String>,
    pub registered_location: Option<String>,
}

/// A triaged alert, with every display field resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub integration_id: Option<String>,
    pub event_time: Option<DateTime<Utc>>,
    pub location: String,
    pub category: String,
    pub urgency: String,
    pub summary: String,
}

impl AlertRecord {
    /// Resolves each display field through its priority waterfall.
    pub fn from_source(source: &AlertSource) -> Self {
        let payload = source.raw_payload.as_ref();
        let triage = source.triage.as_ref();

        let location = first_present([
            source.registered_location.clone(),
            column_path_text(payload, &["location"]),
            column_path_text(payload, &["payload", "location"]),
        ]);
        let category = first_present([
            column_path_text(triage, &["ia_categoria"]),
            column_path_text(triage, &["triage_level"]),
            source.triage_level.clone(),
        ]);
        let urgency = first_present([
            column_path_text(triage, &["ia_urgencia"]),
            column_path_text(triage, &["triage_reason"]),
        ]);
        let summary = first_present([
            source.resumo.clone(),
            column_path_text(triage, &["ia_resumo"]),
            column_path_text(triage, &["resumo"]),
        ]);

        Self {
            integration_id: source.integration_id.clone(),
            event_time: source.created_at,
            location: or_placeholder(location),
            category: or_placeholder(category),
            urgency: or_placeholder(urgency),
            summary: or_placeholder(summary),
        }
    }

    /// Descending by event time, records without a timestamp last.
    pub fn newest_first(a: &Self, b: &Self) -> Ordering {
        match (a.event_time, b.event_time) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

impl From<AlertSource> for AlertRecord {
    fn from(source: AlertSource) -> Self {
        Self::from_source(&source)
    }
}

/// Stable sort into report order.
pub fn sort_newest_first(records: &mut [AlertRecord]) {
    records.sort_by(AlertRecord::newest_first);
}

/// Only a missing or empty winner is replaced; whitespace is kept as is.
fn or_placeholder(value: Option<String>) -> String {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => PLACEHOLDER.to_string(),
    }
}
