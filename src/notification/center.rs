//! Notification center: the static notification list shown in the
//! notifications panel, with read tracking and filtering. It is a separate
//! data source from the bus.

use chrono::{DateTime, Duration, Utc};

use crate::errors::AppError;
use crate::models::notification::{Notification, Severity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Unread,
}

/// The fixed notification list, timestamped relative to `now`.
pub fn mock_notifications(now: DateTime<Utc>) -> Vec<Notification> {
    let entry = |id: &str,
                 obra_id: &str,
                 obra_name: &str,
                 severity: Severity,
                 title: &str,
                 message: &str,
                 age: Duration,
                 read: bool| Notification {
        id: id.to_string(),
        obra_id: obra_id.to_string(),
        obra_name: obra_name.to_string(),
        severity,
        title: title.to_string(),
        message: message.to_string(),
        timestamp: now - age,
        read,
    };

    vec![
        entry("1", "3", "Fábrica de Reciclagem Oeste", Severity::Critical,
            "Integridade Crítica Detectada",
            "A integridade caiu para 35%. Manutenção urgente necessária.",
            Duration::hours(2), false),
        entry("2", "2", "Centro de Distribuição Sul", Severity::Warning,
            "Alerta de Manutenção Preventiva",
            "15 blocos com integridade entre 40-50%. Recomenda-se inspeção.",
            Duration::hours(5), false),
        entry("3", "1", "Galpão Industrial Norte", Severity::Info,
            "Relatório Mensal Disponível",
            "O relatório de integridade de janeiro está pronto para download.",
            Duration::days(1), false),
        entry("4", "3", "Fábrica de Reciclagem Oeste", Severity::Critical,
            "Blocos Críticos Identificados",
            "32 blocos com integridade abaixo de 40% detectados no setor A.",
            Duration::hours(12), true),
        entry("5", "4", "Armazém Logístico Central", Severity::Info,
            "Manutenção Programada Concluída",
            "A manutenção preventiva foi concluída com sucesso.",
            Duration::days(2), true),
        entry("6", "2", "Centro de Distribuição Sul", Severity::Warning,
            "Tendência de Queda Detectada",
            "A integridade média caiu 5% nas últimas 2 semanas.",
            Duration::days(3), true),
    ]
}

#[derive(Debug, Clone, Default)]
pub struct NotificationCenter {
    notifications: Vec<Notification>,
}

impl NotificationCenter {
    pub fn new(notifications: Vec<Notification>) -> Self {
        Self { notifications }
    }

    pub fn with_mock_data() -> Self {
        Self::new(mock_notifications(Utc::now()))
    }

    /// Newest first.
    pub fn push(&mut self, notification: Notification) {
        self.notifications.insert(0, notification);
    }

    pub fn all(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn filtered(&self, filter: Filter) -> Vec<&Notification> {
        self.notifications
            .iter()
            .filter(|n| filter == Filter::All || !n.read)
            .collect()
    }

    pub fn for_obra(&self, obra_id: &str) -> Vec<&Notification> {
        self.notifications
            .iter()
            .filter(|n| n.obra_id == obra_id)
            .collect()
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }

    pub fn mark_as_read(&mut self, id: &str) -> Result<(), AppError> {
        let notification = self
            .notifications
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| AppError::NotificationNotFound(id.to_string()))?;
        notification.read = true;
        Ok(())
    }

    /// Returns how many notifications changed state.
    pub fn mark_all_as_read(&mut self) -> usize {
        let mut changed = 0;
        for n in self.notifications.iter_mut().filter(|n| !n.read) {
            n.read = true;
            changed += 1;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_data_unread_count() {
        let center = NotificationCenter::with_mock_data();
        assert_eq!(center.all().len(), 6);
        assert_eq!(center.unread_count(), 3);
    }

    #[test]
    fn test_mock_timestamps_relative_to_now() {
        let now: DateTime<Utc> = "2025-01-22T12:00:00Z".parse().unwrap();
        let list = mock_notifications(now);
        assert_eq!(list[0].timestamp, now - Duration::hours(2));
        assert_eq!(list[5].timestamp, now - Duration::days(3));
    }

    #[test]
    fn test_filter_unread() {
        let center = NotificationCenter::with_mock_data();
        let unread = center.filtered(Filter::Unread);
        assert_eq!(unread.len(), 3);
        assert!(unread.iter().all(|n| !n.read));
        assert_eq!(center.filtered(Filter::All).len(), 6);
    }

    #[test]
    fn test_for_obra() {
        let center = NotificationCenter::with_mock_data();
        let ids: Vec<&str> = center.for_obra("3").iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "4"]);
        assert!(center.for_obra("5").is_empty());
    }

    #[test]
    fn test_mark_as_read() {
        let mut center = NotificationCenter::with_mock_data();
        center.mark_as_read("2").unwrap();
        assert_eq!(center.unread_count(), 2);

        // already read stays read
        center.mark_as_read("2").unwrap();
        assert_eq!(center.unread_count(), 2);

        let err = center.mark_as_read("missing").unwrap_err();
        assert!(matches!(err, AppError::NotificationNotFound(id) if id == "missing"));
    }

    #[test]
    fn test_mark_all_as_read() {
        let mut center = NotificationCenter::with_mock_data();
        assert_eq!(center.mark_all_as_read(), 3);
        assert_eq!(center.unread_count(), 0);
        assert_eq!(center.mark_all_as_read(), 0);
        assert!(center.filtered(Filter::Unread).is_empty());
    }

    #[test]
    fn test_push_prepends() {
        let mut center = NotificationCenter::default();
        let mut first = mock_notifications(Utc::now()).remove(0);
        first.id = "a".into();
        let mut second = first.clone();
        second.id = "b".into();

        center.push(first);
        center.push(second);
        assert_eq!(center.all()[0].id, "b");
        assert_eq!(center.unread_count(), 2);
    }
}
