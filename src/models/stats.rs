//! Fleet-wide summary shown above the obra list.

use serde::Serialize;

use crate::models::obra::Obra;

/// Blocks counted for an obra without a recorded total.
pub const FALLBACK_BLOCKS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetStats {
    pub total_obras: usize,
    pub average_integrity: u8,
    pub total_blocks: u32,
    /// Obras in warning or critical status.
    pub needing_attention: usize,
    /// Obras at or above the average.
    pub above_average: usize,
}

impl FleetStats {
    /// `None` for an empty fleet.
    pub fn compute(obras: &[Obra]) -> Option<Self> {
        if obras.is_empty() {
            return None;
        }
        let sum: u32 = obras.iter().map(|o| u32::from(o.integrity)).sum();
        let average = (f64::from(sum) / obras.len() as f64).round() as u8;

        Some(Self {
            total_obras: obras.len(),
            average_integrity: average,
            total_blocks: obras
                .iter()
                .map(|o| o.total_blocks.unwrap_or(FALLBACK_BLOCKS))
                .sum(),
            needing_attention: obras.iter().filter(|o| o.needs_attention()).count(),
            above_average: obras.iter().filter(|o| o.integrity >= average).count(),
        })
    }

    /// At least half the fleet is at or above average.
    pub fn trend_positive(&self) -> bool {
        self.above_average * 2 >= self.total_obras
    }
}
