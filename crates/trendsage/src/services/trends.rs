//! Synthetic publication-trend series for charts.
//!
//! The numbers are random and carry no information about the query. They
//! exist so the frontend has something to plot.

use std::sync::Mutex;

use chrono::{Datelike, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::{PublicationTrend, TrendPoint};

/// Years in each series, ending with the current year.
const SERIES_YEARS: i32 = 6;

/// Random publication-trend generator with an injectable seed.
#[derive(Debug)]
pub struct TrendChartGenerator {
    rng: Mutex<StdRng>,
}

impl TrendChartGenerator {
    /// Generator seeded from OS entropy.
    #[must_use]
    pub fn new() -> Self {
        Self { rng: Mutex::new(StdRng::from_entropy()) }
    }

    /// Deterministic generator for tests.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self { rng: Mutex::new(StdRng::seed_from_u64(seed)) }
    }

    /// Series for `query` ending at the current year.
    #[must_use]
    pub fn publication_trend(&self, query: &str) -> PublicationTrend {
        self.generate_for_year(query, Utc::now().year())
    }

    /// Series for `query` ending at `current_year`.
    ///
    /// `base * (1 + rate)^k` with base in [100, 300), rate in [0.10, 0.40) and
    /// ±10% jitter per point.
    #[must_use]
    pub fn generate_for_year(&self, query: &str, current_year: i32) -> PublicationTrend {
        // Poisoning leaves the RNG state intact.
        let mut rng = self.rng.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

        let base = f64::from(rng.gen_range(100_u32..300));
        let rate: f64 = rng.gen_range(0.10..0.40);

        let trend: Vec<TrendPoint> = (0..SERIES_YEARS)
            .map(|k| {
                let jitter: f64 = rng.gen_range(0.9..1.1);
                let value = base * (1.0 + rate).powi(k) * jitter;
                TrendPoint {
                    year: current_year - (SERIES_YEARS - 1) + k,
                    publications: value.floor() as u64,
                }
            })
            .collect();

        PublicationTrend {
            query: query.to_string(),
            total_publications: trend.iter().map(|p| p.publications).sum(),
            growth_rate: format!("{}%", (rate * 100.0).round() as u32),
            trend,
        }
    }
}

impl Default for TrendChartGenerator {
    fn default() -> Self {
        Self::new()
    }
}
