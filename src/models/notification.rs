use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity of a notification. Closed set; drives the message pool and
/// display title of synthesized events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Critical, Severity::Warning, Severity::Info];

    /// Display title attached to synthesized events of this severity.
    pub fn title(self) -> &'static str {
        match self {
            Severity::Critical => "Alerta Crítico",
            Severity::Warning => "Aviso",
            Severity::Info => "Informação",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Severity::Critical => "🔴",
            Severity::Warning => "⚠️",
            Severity::Info => "ℹ️",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "critical" => Ok(Severity::Critical),
            "warning" => Ok(Severity::Warning),
            "info" => Ok(Severity::Info),
            other => Err(format!("unknown severity '{}'", other)),
        }
    }
}

/// A notification about an obra, either synthesized by the bus or loaded
/// from the static notification list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    /// Not validated against the obra catalogue.
    pub obra_id: String,
    pub obra_name: String,
    #[serde(rename = "type")]
    pub severity: Severity,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Severity::Critical).unwrap(), "\"critical\"");
        let parsed: Severity = serde_json::from_str("\"warning\"").unwrap();
        assert_eq!(parsed, Severity::Warning);
        assert!(serde_json::from_str::<Severity>("\"fatal\"").is_err());
    }

    #[test]
    fn test_severity_from_str() {
        assert_eq!("INFO".parse::<Severity>().unwrap(), Severity::Info);
        assert!("debug".parse::<Severity>().is_err());
    }

    #[test]
    fn test_notification_wire_shape() {
        let n = Notification {
            id: "sim-1".into(),
            obra_id: "3".into(),
            obra_name: "Fábrica de Reciclagem Oeste".into(),
            severity: Severity::Critical,
            title: Severity::Critical.title().into(),
            message: "Necessária intervenção imediata".into(),
            timestamp: "2025-01-20T10:00:00Z".parse().unwrap(),
            read: false,
        };
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["obraId"], "3");
        assert_eq!(json["type"], "critical");
        assert_eq!(json["timestamp"], "2025-01-20T10:00:00Z");
        assert_eq!(json["read"], false);
    }

    #[test]
    fn test_read_defaults_to_false() {
        let n: Notification = serde_json::from_str(
            r#"{"id":"x","obraId":"1","obraName":"n","type":"info","title":"t","message":"m","timestamp":"2025-01-20T10:00:00Z"}"#,
        )
        .unwrap();
        assert!(!n.read);
    }
}
