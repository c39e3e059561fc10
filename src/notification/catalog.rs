//! Static configuration data the bus draws synthetic events from:
//! the pool of referenced obras and the per-severity message pools.

use crate::errors::AppError;
use crate::models::notification::Severity;
use crate::models::obra::{mock_obras, EntityRef};

#[derive(Debug, Clone)]
pub struct MessagePool {
    pub critical: Vec<String>,
    pub warning: Vec<String>,
    pub info: Vec<String>,
}

impl MessagePool {
    pub fn for_severity(&self, severity: Severity) -> &[String] {
        match severity {
            Severity::Critical => &self.critical,
            Severity::Warning => &self.warning,
            Severity::Info => &self.info,
        }
    }
}

impl Default for MessagePool {
    fn default() -> Self {
        fn owned(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }

        Self {
            critical: owned(&[
                "Integridade crítica detectada em múltiplos blocos",
                "Sistema de alerta crítico ativado",
                "Necessária intervenção imediata",
            ]),
            warning: owned(&[
                "Tendência de queda na integridade detectada",
                "Manutenção preventiva recomendada",
                "Blocos com baixa integridade identificados",
            ]),
            info: owned(&[
                "Relatório de integridade disponível",
                "Manutenção programada concluída",
                "Inspeção de rotina realizada",
            ]),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    pub entities: Vec<EntityRef>,
    pub messages: MessagePool,
}

impl Catalog {
    /// Every pool must be non-empty for uniform selection to be defined.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.entities.is_empty() {
            return Err(AppError::EmptyPool("entities"));
        }
        for severity in Severity::ALL {
            if self.messages.for_severity(severity).is_empty() {
                return Err(AppError::EmptyPool(severity.as_str()));
            }
        }
        Ok(())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            entities: mock_obras().iter().map(|o| o.entity_ref()).collect(),
            messages: MessagePool::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_is_valid() {
        let catalog = Catalog::default();
        assert!(catalog.validate().is_ok());
        assert_eq!(catalog.entities.len(), 5);
        assert_eq!(catalog.entities[2].name, "Fábrica de Reciclagem Oeste");
    }

    #[test]
    fn test_empty_entity_pool_rejected() {
        let catalog = Catalog {
            entities: vec![],
            ..Catalog::default()
        };
        assert!(matches!(catalog.validate(), Err(AppError::EmptyPool("entities"))));
    }

    #[test]
    fn test_empty_message_pool_rejected() {
        let mut catalog = Catalog::default();
        catalog.messages.warning.clear();
        assert!(matches!(catalog.validate(), Err(AppError::EmptyPool("warning"))));
    }
}
