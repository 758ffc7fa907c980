use chrono::{DateTime, TimeZone};
use std::fmt::Display;
use core_types::{AlertRecord, PLACEHOLDER};

pub const TITLE: &str = "Relatório de Alertas Críticos - SMA v2.0";

pub const COLUMN_HEADERS: [&str; COLUMN_COUNT] = [
    "Data/Hora do Evento",
    "Localização do Dispositivo",
    "Categoria (IA)",
    "Urgência (IA)",
    "Resumo para o Gestor (IA)",
];

pub const COLUMN_COUNT: usize = 5;

/// Shown in place of the body when there are no alerts.
pub const NO_RECORDS: &str = "Sem registros encontrados";

const EVENT_TIME_FORMAT: &str = "%d/%m/%Y %H:%M:%S";
const GENERATED_AT_FORMAT: &str = "%d/%m/%Y %H:%M:%S %Z";

/// What a table body row holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyRow {
    Alert([String; COLUMN_COUNT]),
    /// The single "no records" row, spanning the table width.
    NoRecords,
}

impl BodyRow {
    pub fn cells(&self) -> [&str; COLUMN_COUNT] {
        match self {
            BodyRow::Alert(cells) => cells.each_ref().map(String::as_str),
            BodyRow::NoRecords => [NO_RECORDS, "", "", "", ""],
        }
    }
}

/// The text of the report, independent of page geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportContent {
    pub title: String,
    pub generated_at: String,
    pub summary: String,
    pub header: [String; COLUMN_COUNT],
    pub rows: Vec<BodyRow>,
}

impl ReportContent {
    /// Builds the report text for `records`.
    ///
    /// Records are put in report order (newest first, undated last) before
    /// they become rows. The timestamp line ends with the zone's name as its
    /// offset displays it: an abbreviation such as `-03` or `UTC` for a
    /// `chrono_tz::Tz`, a numeric offset for `FixedOffset`.
    ///
    /// Event times are converted into the zone of `generated_at`. This is the
    /// report reader's zone, which need not match the time zone of the
    /// database session the rows were read in.
    pub fn new<Tz>(records: &[AlertRecord], generated_at: DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let mut ordered = records.to_vec();
        core_types::sort_newest_first(&mut ordered);

        let zone = generated_at.timezone();
        let rows = if ordered.is_empty() {
            vec![BodyRow::NoRecords]
        } else {
            ordered
                .iter()
                .map(|record| {
                    let event_time = record
                        .event_time
                        .map(|t| t.with_timezone(&zone).format(EVENT_TIME_FORMAT).to_string())
                        .unwrap_or_else(|| PLACEHOLDER.to_string());
                    BodyRow::Alert([
                        event_time,
                        record.location.clone(),
                        record.category.clone(),
                        record.urgency.clone(),
                        record.summary.clone(),
                    ])
                })
                .collect()
        };

        Self {
            title: TITLE.to_string(),
            generated_at: format!("Gerado em: {}", generated_at.format(GENERATED_AT_FORMAT)),
            summary: summary_line(records.len()),
            header: COLUMN_HEADERS.map(String::from),
            rows,
        }
    }

    /// Number of table rows, header included.
    pub fn table_row_count(&self) -> usize {
        self.rows.len() + 1
    }
}

pub fn summary_line(alert_count: usize) -> String {
    if alert_count == 0 {
        "Resumo: Nenhum alerta crítico foi processado pela IA no período.".to_string()
    } else {
        format!("Resumo: Foram encontrados {alert_count} alertas críticos processados pela IA.")
    }
}
