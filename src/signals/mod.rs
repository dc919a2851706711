//! Signal Derivation Module
//!
//! Pure numeric transforms that turn a raw price/volume history into the
//! four bounded-range features embedded in a recommendation request:
//! - Momentum: net change blended with average slope of the price series
//! - Volatility: relative standard deviation of the price series
//! - Volume spike: latest volume against its trailing average
//! - Market-cap bucket: ordinal size class from capitalization rank
//!
//! Every operation is total and side-effect-free. Degenerate input
//! (series shorter than 2 samples, zero denominators) yields a neutral
//! default instead of an error, so a bad series never aborts the
//! caller's request-building flow. Outputs are finite for finite input.

use crate::config::SignalsConfig;
use crate::types::{MarketCapBucket, MarketChart, SignalSet};

/// Neutral score for momentum/volatility when the series is too short
const NEUTRAL_SCORE: f64 = 0.5;

/// Map `value` linearly onto [0, 1] relative to [min, max], clamped.
///
/// Values below `min` map to 0, above `max` to 1. A degenerate domain
/// (`min == max`) maps everything to 0.
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    if max <= min {
        return 0.0;
    }
    ((value - min) / (max - min)).clamp(0.0, 1.0)
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Derives the signal set for one chart window.
///
/// Stateless: the struct only carries the domain bounds, so identical
/// inputs always produce bitwise-identical outputs.
#[derive(Debug, Clone)]
pub struct SignalEngine {
    cfg: SignalsConfig,
}

impl SignalEngine {
    pub fn new(cfg: SignalsConfig) -> Self {
        Self { cfg }
    }

    /// Normalized recent directional price movement.
    ///
    /// Blends the net change over the window (the coarse "did price
    /// move" signal) with the summed consecutive slope relative to the
    /// mean price (the "was the trend monotonic/steep" signal). Net
    /// change gets the larger weight since it is less noise-sensitive.
    pub fn momentum_score(&self, prices: &[f64]) -> f64 {
        if prices.len() < 2 {
            return NEUTRAL_SCORE;
        }

        let first = prices[0];
        let last = prices[prices.len() - 1];
        let net_change = (last - first) / first;
        let normalized_change = normalize(
            net_change,
            -self.cfg.net_change_limit,
            self.cfg.net_change_limit,
        );

        // Summed consecutive differences telescope to last - first
        let slope: f64 = prices.windows(2).map(|w| w[1] - w[0]).sum();
        let relative_slope = slope / mean(prices);
        let normalized_slope =
            normalize(relative_slope, -self.cfg.slope_limit, self.cfg.slope_limit);

        normalized_change * self.cfg.momentum_change_weight
            + normalized_slope * self.cfg.momentum_slope_weight
    }

    /// Normalized relative price dispersion over the window.
    ///
    /// Population stddev over mean, mapped onto the configured band
    /// (default 1%-15%, the typical short-window crypto range).
    pub fn volatility_score(&self, prices: &[f64]) -> f64 {
        if prices.len() < 2 {
            return NEUTRAL_SCORE;
        }

        let mean_price = mean(prices);
        let variance = prices
            .iter()
            .map(|p| (p - mean_price).powi(2))
            .sum::<f64>()
            / prices.len() as f64;
        let relative_stddev = variance.sqrt() / mean_price;

        normalize(
            relative_stddev,
            self.cfg.volatility_floor,
            self.cfg.volatility_ceiling,
        )
    }

    /// Normalized excess of the latest volume sample over its trailing
    /// average. A trailing average of zero means "spiked from nothing":
    /// score 1 if the latest sample is positive, 0 otherwise.
    pub fn volume_spike(&self, volumes: &[f64]) -> f64 {
        if volumes.len() < 2 {
            return 0.0;
        }

        let latest = volumes[volumes.len() - 1];
        let trailing_avg = mean(&volumes[..volumes.len() - 1]);

        if trailing_avg == 0.0 {
            return if latest > 0.0 { 1.0 } else { 0.0 };
        }

        let spike_ratio = latest / trailing_avg;
        normalize(spike_ratio, self.cfg.spike_floor, self.cfg.spike_ceiling)
    }

    /// Ordinal size class from market-cap rank (1 = largest cap).
    ///
    /// Total over all of u32; rank 0 falls into Mega with the top-10.
    /// Positivity of the rank is a caller precondition.
    pub fn market_cap_bucket(&self, rank: u32) -> MarketCapBucket {
        match rank {
            0..=10 => MarketCapBucket::Mega,
            11..=50 => MarketCapBucket::Large,
            51..=200 => MarketCapBucket::Mid,
            _ => MarketCapBucket::Small,
        }
    }

    /// Derive all four features for one chart window.
    pub fn derive(&self, chart: &MarketChart, rank: u32) -> SignalSet {
        let prices = chart.price_values();
        let volumes = chart.volume_values();

        SignalSet {
            momentum_score: self.momentum_score(&prices),
            volatility_score: self.volatility_score(&prices),
            volume_spike: self.volume_spike(&volumes),
            market_cap_bucket: self.market_cap_bucket(rank),
        }
    }
}

impl Default for SignalEngine {
    fn default() -> Self {
        Self::new(SignalsConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PricePoint, VolumePoint};

    fn engine() -> SignalEngine {
        SignalEngine::default()
    }

    #[test]
    fn normalize_endpoints_and_clamps() {
        assert_eq!(normalize(-0.5, -0.5, 0.5), 0.0);
        assert_eq!(normalize(0.5, -0.5, 0.5), 1.0);
        assert_eq!(normalize(0.0, -0.5, 0.5), 0.5);
        // Outside the domain clamps to the endpoints
        assert_eq!(normalize(2.0, -0.5, 0.5), 1.0);
        assert_eq!(normalize(-2.0, -0.5, 0.5), 0.0);
    }

    #[test]
    fn normalize_is_non_decreasing() {
        let mut prev = normalize(-1.0, -0.5, 0.5);
        let mut v = -1.0;
        while v <= 1.0 {
            let cur = normalize(v, -0.5, 0.5);
            assert!(cur >= prev);
            prev = cur;
            v += 0.01;
        }
    }

    #[test]
    fn normalize_degenerate_domain_is_deterministic_zero() {
        assert_eq!(normalize(3.0, 1.0, 1.0), 0.0);
        assert_eq!(normalize(1.0, 1.0, 1.0), 0.0);
    }

    #[test]
    fn momentum_short_series_is_neutral() {
        assert_eq!(engine().momentum_score(&[]), 0.5);
        assert_eq!(engine().momentum_score(&[100.0]), 0.5);
    }

    #[test]
    fn momentum_saturates_on_fifty_percent_move() {
        // net change = 0.5 -> 1.0; slope 50 / mean 125 = 0.4 -> clamps
        // to 1.0; blended 0.6 * 1 + 0.4 * 1 = 1.0
        let score = engine().momentum_score(&[100.0, 150.0]);
        assert!((score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn momentum_flat_series_is_neutral() {
        let score = engine().momentum_score(&[100.0, 100.0, 100.0]);
        assert!((score - 0.5).abs() < 1e-12);
    }

    #[test]
    fn momentum_downtrend_scores_below_neutral() {
        let score = engine().momentum_score(&[100.0, 95.0, 90.0, 85.0]);
        assert!(score < 0.5);
        assert!(score >= 0.0);
    }

    #[test]
    fn volatility_short_series_is_neutral() {
        assert_eq!(engine().volatility_score(&[]), 0.5);
        assert_eq!(engine().volatility_score(&[42.0]), 0.5);
    }

    #[test]
    fn volatility_constant_series_is_zero() {
        // stddev 0 -> relative stddev 0 -> below the 1% floor
        assert_eq!(engine().volatility_score(&[100.0, 100.0, 100.0]), 0.0);
    }

    #[test]
    fn volatility_wild_series_saturates() {
        let score = engine().volatility_score(&[100.0, 160.0, 40.0, 170.0]);
        assert_eq!(score, 1.0);
    }

    #[test]
    fn volume_spike_short_series_is_zero() {
        assert_eq!(engine().volume_spike(&[]), 0.0);
        assert_eq!(engine().volume_spike(&[10.0]), 0.0);
    }

    #[test]
    fn volume_spike_tenfold_saturates() {
        // trailing avg 10, latest 100, ratio 10 -> clamps at the 5x cap
        assert_eq!(engine().volume_spike(&[10.0, 10.0, 100.0]), 1.0);
    }

    #[test]
    fn volume_spike_from_nothing() {
        // zero trailing average: positive latest means "spiked from
        // nothing", zero latest does not
        assert_eq!(engine().volume_spike(&[0.0, 0.0]), 0.0);
        assert_eq!(engine().volume_spike(&[0.0, 5.0]), 1.0);
    }

    #[test]
    fn volume_spike_at_trailing_average_is_zero() {
        // ratio exactly 1 sits at the floor of the [1, 5] domain
        assert_eq!(engine().volume_spike(&[10.0, 10.0, 10.0]), 0.0);
    }

    #[test]
    fn bucket_thresholds() {
        let e = engine();
        assert_eq!(e.market_cap_bucket(1), MarketCapBucket::Mega);
        assert_eq!(e.market_cap_bucket(10), MarketCapBucket::Mega);
        assert_eq!(e.market_cap_bucket(11), MarketCapBucket::Large);
        assert_eq!(e.market_cap_bucket(50), MarketCapBucket::Large);
        assert_eq!(e.market_cap_bucket(51), MarketCapBucket::Mid);
        assert_eq!(e.market_cap_bucket(200), MarketCapBucket::Mid);
        assert_eq!(e.market_cap_bucket(201), MarketCapBucket::Small);
        assert_eq!(e.market_cap_bucket(u32::MAX), MarketCapBucket::Small);
    }

    #[test]
    fn outputs_are_finite_and_bounded() {
        let e = engine();
        let cases: &[&[f64]] = &[
            &[],
            &[1.0],
            &[1.0, 1.0],
            &[0.000_001, 1_000_000.0],
            &[100.0, 150.0, 50.0, 125.0],
        ];
        for prices in cases {
            for score in [e.momentum_score(prices), e.volatility_score(prices)] {
                assert!(score.is_finite());
                assert!((0.0..=1.0).contains(&score));
            }
            let spike = e.volume_spike(prices);
            assert!(spike.is_finite());
            assert!((0.0..=1.0).contains(&spike));
        }
    }

    #[test]
    fn derive_is_idempotent() {
        let chart = MarketChart {
            prices: vec![
                PricePoint { ts: 0, price: 100.0 },
                PricePoint { ts: 1, price: 104.0 },
                PricePoint { ts: 2, price: 99.0 },
                PricePoint { ts: 3, price: 108.0 },
            ],
            volumes: vec![
                VolumePoint { ts: 0, volume: 10.0 },
                VolumePoint { ts: 1, volume: 12.0 },
                VolumePoint { ts: 2, volume: 9.0 },
                VolumePoint { ts: 3, volume: 30.0 },
            ],
        };
        let e = engine();
        let a = e.derive(&chart, 7);
        let b = e.derive(&chart, 7);
        assert_eq!(a, b);
        assert_eq!(a.market_cap_bucket, MarketCapBucket::Mega);
    }
}
