//! Smart-block grids and integrity history, generated on demand.
//!
//! Grids are random but stable per obra for the lifetime of a
//! [`BlockGridCache`]; history is regenerated on every call.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::models::obra::IntegrityBand;

pub const DEFAULT_GRID_SIZE: u16 = 20;
pub const HISTORY_DAYS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Block {
    pub x: u16,
    pub y: u16,
    /// 0–99
    pub integrity: u8,
}

impl Block {
    pub fn band(&self) -> IntegrityBand {
        IntegrityBand::from_integrity(self.integrity)
    }
}

/// `size`×`size` blocks in row-major order.
pub fn generate_block_grid<R: Rng + ?Sized>(rng: &mut R, size: u16) -> Vec<Block> {
    let mut blocks = Vec::with_capacity(usize::from(size) * usize::from(size));
    for y in 0..size {
        for x in 0..size {
            blocks.push(Block {
                x,
                y,
                integrity: rng.gen_range(0..100),
            });
        }
    }
    blocks
}

/// Generates each obra's grid once and hands back the same grid afterwards.
pub struct BlockGridCache {
    rng: Mutex<StdRng>,
    grids: Mutex<HashMap<String, Vec<Block>>>,
    size: u16,
}

impl BlockGridCache {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng: Mutex::new(rng),
            grids: Mutex::new(HashMap::new()),
            size: DEFAULT_GRID_SIZE,
        }
    }

    pub fn blocks_for_obra(&self, obra_id: &str) -> Vec<Block> {
        let mut grids = self.grids.lock().unwrap_or_else(|e| e.into_inner());
        grids
            .entry(obra_id.to_string())
            .or_insert_with(|| {
                let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
                tracing::debug!(obra_id, size = self.size, "generating block grid");
                generate_block_grid(&mut *rng, self.size)
            })
            .clone()
    }

    pub fn cached(&self) -> usize {
        self.grids.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HistoryPoint {
    pub date: NaiveDate,
    pub integrity: u8,
}

/// Thirty daily points ending at `today`, oldest first. Each day jitters
/// by up to ±5 around `current`, drifting 0.2 lower per day back in time.
pub fn generate_integrity_history<R: Rng + ?Sized>(
    rng: &mut R,
    current: u8,
    today: NaiveDate,
) -> Vec<HistoryPoint> {
    (0..HISTORY_DAYS)
        .rev()
        .map(|days_ago| {
            let variation = (rng.gen::<f64>() - 0.5) * 10.0;
            let value = f64::from(current) + variation - f64::from(days_ago) * 0.2;
            HistoryPoint {
                date: today - Duration::days(i64::from(days_ago)),
                integrity: value.clamp(0.0, 100.0).round() as u8,
            }
        })
        .collect()
}
