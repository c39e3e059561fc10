//! Per-obra event log: maintenance, alerts, inspections and repairs.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Maintenance,
    Alert,
    Inspection,
    Repair,
}

impl EventKind {
    pub fn label(self) -> &'static str {
        match self {
            EventKind::Maintenance => "Manutenção",
            EventKind::Alert => "Alerta",
            EventKind::Inspection => "Inspeção",
            EventKind::Repair => "Reparo",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObraEvent {
    pub id: String,
    pub obra_id: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

/// The fixed event log, timestamped relative to `now`.
pub fn mock_events(now: DateTime<Utc>) -> Vec<ObraEvent> {
    let event = |id: &str,
                 obra_id: &str,
                 kind: EventKind,
                 description: &str,
                 age: Duration,
                 user: Option<&str>| ObraEvent {
        id: id.to_string(),
        obra_id: obra_id.to_string(),
        kind,
        description: description.to_string(),
        timestamp: now - age,
        user: user.map(str::to_string),
    };

    vec![
        event("1", "1", EventKind::Inspection,
            "Inspeção de rotina realizada - Nenhum problema detectado",
            Duration::days(3), Some("João Silva")),
        event("2", "3", EventKind::Alert,
            "Alerta crítico - Integridade abaixo do limite",
            Duration::hours(2), None),
        event("3", "2", EventKind::Maintenance,
            "Manutenção preventiva agendada para 25/01/2025",
            Duration::hours(5), Some("Carlos Mendes")),
        event("4", "4", EventKind::Repair,
            "Substituição de 8 blocos danificados concluída",
            Duration::days(2), Some("Marina Oliveira")),
        event("5", "5", EventKind::Inspection,
            "Inspeção trimestral realizada - Excelente condição",
            Duration::days(1), Some("Fernando Santos")),
    ]
}

/// Events of one obra, newest first. Unknown ids yield an empty list.
pub fn events_for_obra<'a>(events: &'a [ObraEvent], obra_id: &str) -> Vec<&'a ObraEvent> {
    let mut out: Vec<&ObraEvent> = events.iter().filter(|e| e.obra_id == obra_id).collect();
    out.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_for_obra() {
        let now = Utc::now();
        let events = mock_events(now);

        let third = events_for_obra(&events, "3");
        assert_eq!(third.len(), 1);
        assert_eq!(third[0].kind, EventKind::Alert);
        assert_eq!(third[0].timestamp, now - Duration::hours(2));
        assert!(third[0].user.is_none());

        assert!(events_for_obra(&events, "99").is_empty());
    }

    #[test]
    fn test_event_serializes_kind_as_type() {
        let events = mock_events(Utc::now());
        let json = serde_json::to_value(&events[3]).unwrap();
        assert_eq!(json["type"], "repair");
        assert_eq!(json["obraId"], "4");
        assert_eq!(json["user"], "Marina Oliveira");

        let alert = serde_json::to_value(&events[1]).unwrap();
        assert!(alert.get("user").is_none());
    }
}
