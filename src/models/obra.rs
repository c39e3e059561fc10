//! Monitored sites ("obras") and their integrity bands.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Threshold at or above which integrity is considered good.
pub const GOOD_THRESHOLD: u8 = 70;
/// Threshold at or above which integrity is a warning rather than critical.
pub const WARNING_THRESHOLD: u8 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObraStatus {
    Active,
    Warning,
    Critical,
}

/// Health band of an integrity score (0–100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegrityBand {
    Good,
    Warning,
    Critical,
}

impl IntegrityBand {
    pub fn from_integrity(integrity: u8) -> Self {
        if integrity >= GOOD_THRESHOLD {
            IntegrityBand::Good
        } else if integrity >= WARNING_THRESHOLD {
            IntegrityBand::Warning
        } else {
            IntegrityBand::Critical
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            IntegrityBand::Good => "Bom",
            IntegrityBand::Warning => "Alerta",
            IntegrityBand::Critical => "Crítico",
        }
    }
}

/// Id + display name of an obra, as referenced by notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: String,
    pub name: String,
}

impl EntityRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Obra {
    pub id: String,
    pub name: String,
    /// 0–100
    pub integrity: u8,
    pub location: String,
    pub status: ObraStatus,
    pub last_update: NaiveDate,
    pub area_m2: Option<u32>,
    pub year: Option<u16>,
    pub kind: Option<String>,
    pub manager: Option<String>,
    pub total_blocks: Option<u32>,
}

impl Obra {
    pub fn band(&self) -> IntegrityBand {
        IntegrityBand::from_integrity(self.integrity)
    }

    pub fn entity_ref(&self) -> EntityRef {
        EntityRef::new(&self.id, &self.name)
    }

    /// City part of a "City - UF" location.
    pub fn city(&self) -> &str {
        self.location
            .split(" - ")
            .next()
            .unwrap_or(&self.location)
    }

    pub fn needs_attention(&self) -> bool {
        matches!(self.status, ObraStatus::Warning | ObraStatus::Critical)
    }
}

#[allow(clippy::too_many_arguments)]
fn obra(
    id: &str,
    name: &str,
    integrity: u8,
    location: &str,
    status: ObraStatus,
    last_update: (i32, u32, u32),
    area_m2: u32,
    year: u16,
    kind: &str,
    manager: &str,
) -> Obra {
    let (y, m, d) = last_update;
    Obra {
        id: id.to_string(),
        name: name.to_string(),
        integrity,
        location: location.to_string(),
        status,
        last_update: NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN),
        area_m2: Some(area_m2),
        year: Some(year),
        kind: Some(kind.to_string()),
        manager: Some(manager.to_string()),
        total_blocks: Some(400),
    }
}

/// The fixed site catalogue.
pub fn mock_obras() -> Vec<Obra> {
    vec![
        obra("1", "Galpão Industrial Norte", 85, "Palmas - TO", ObraStatus::Active,
            (2025, 1, 20), 2500, 2023, "Galpão Industrial", "Carlos Mendes"),
        obra("2", "Centro de Distribuição Sul", 62, "Araguaína - TO", ObraStatus::Warning,
            (2025, 1, 19), 3200, 2022, "Centro de Distribuição", "Ana Paula Silva"),
        obra("3", "Fábrica de Reciclagem Oeste", 35, "Gurupi - TO", ObraStatus::Critical,
            (2025, 1, 18), 1800, 2021, "Fábrica", "Roberto Costa"),
        obra("4", "Armazém Logístico Central", 78, "Porto Nacional - TO", ObraStatus::Active,
            (2025, 1, 21), 2100, 2024, "Armazém", "Marina Oliveira"),
        obra("5", "Complexo Industrial Leste", 91, "Colinas do Tocantins - TO", ObraStatus::Active,
            (2025, 1, 22), 4500, 2024, "Complexo Industrial", "Fernando Santos"),
    ]
}

pub fn find_obra<'a>(obras: &'a [Obra], id: &str) -> Option<&'a Obra> {
    obras.iter().find(|o| o.id == id)
}

/// Distinct cities in catalogue order.
pub fn cities(obras: &[Obra]) -> Vec<&str> {
    let mut seen = Vec::new();
    for o in obras {
        let city = o.city();
        if !seen.contains(&city) {
            seen.push(city);
        }
    }
    seen
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    Name,
    IntegrityDesc,
    IntegrityAsc,
    Location,
    /// Most recently updated first.
    #[default]
    Recent,
}

impl std::str::FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(SortBy::Name),
            "integrity-desc" => Ok(SortBy::IntegrityDesc),
            "integrity-asc" => Ok(SortBy::IntegrityAsc),
            "location" => Ok(SortBy::Location),
            "recent" => Ok(SortBy::Recent),
            other => Err(format!(
                "unknown sort '{}' (name, integrity-desc, integrity-asc, location, recent)",
                other
            )),
        }
    }
}

/// Integrity range (inclusive), city selection and ordering for the
/// obra list. An empty city list matches every city.
#[derive(Debug, Clone)]
pub struct ObraQuery {
    pub min_integrity: u8,
    pub max_integrity: u8,
    pub cities: Vec<String>,
    pub sort: SortBy,
}

impl Default for ObraQuery {
    fn default() -> Self {
        Self {
            min_integrity: 0,
            max_integrity: 100,
            cities: Vec::new(),
            sort: SortBy::default(),
        }
    }
}

impl ObraQuery {
    pub fn matches(&self, obra: &Obra) -> bool {
        if obra.integrity < self.min_integrity || obra.integrity > self.max_integrity {
            return false;
        }
        self.cities.is_empty() || self.cities.iter().any(|c| c == obra.city())
    }

    pub fn apply<'a>(&self, obras: &'a [Obra]) -> Vec<&'a Obra> {
        let mut out: Vec<&Obra> = obras.iter().filter(|o| self.matches(o)).collect();
        match self.sort {
            SortBy::Name => out.sort_by(|a, b| a.name.cmp(&b.name)),
            SortBy::IntegrityDesc => out.sort_by(|a, b| b.integrity.cmp(&a.integrity)),
            SortBy::IntegrityAsc => out.sort_by_key(|o| o.integrity),
            SortBy::Location => out.sort_by(|a, b| a.location.cmp(&b.location)),
            SortBy::Recent => out.sort_by(|a, b| b.last_update.cmp(&a.last_update)),
        }
        out
    }
}
