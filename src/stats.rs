/// Read-pair statistics tracking and reporting
use log::info;

/// Tracks how the pairs of an input stream were filtered.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct PairStats {
    /// Total number of mate pairs read
    pub total: u64,
    /// Pairs admitted to the index
    pub mapped: u64,
    /// Admitted pairs with both mates properly paired
    pub concordant: u64,
    /// Admitted pairs that are not
    pub discordant: u64,
}

impl PairStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pair read from the stream, admitted or not.
    pub fn record_pair(&mut self) {
        self.total += 1;
    }

    /// Record a pair admitted to the index.
    pub fn record_mapped(&mut self, concordant: bool) {
        self.mapped += 1;
        if concordant {
            self.concordant += 1;
        } else {
            self.discordant += 1;
        }
    }

    /// Print summary statistics to log
    pub fn print_summary(&self) {
        if self.total == 0 {
            info!("No read pairs processed");
            return;
        }

        info!("=== Pair Summary ===");
        info!("Number of read pairs: {}", self.total);
        info!(
            "Indexed pairs: {} ({:.2}%)",
            self.mapped,
            100.0 * self.mapped_fraction()
        );
        info!(
            "Concordant pairs: {} ({:.2}%)",
            self.concordant,
            100.0 * self.concordant_fraction()
        );
        info!(
            "Discordant pairs: {} ({:.2}%)",
            self.discordant,
            100.0 * self.discordant_fraction()
        );
    }

    /// Fraction of all pairs that were indexed; NaN when nothing was read.
    pub fn mapped_fraction(&self) -> f64 {
        fraction(self.mapped, self.total)
    }

    pub fn concordant_fraction(&self) -> f64 {
        fraction(self.concordant, self.total)
    }

    pub fn discordant_fraction(&self) -> f64 {
        fraction(self.discordant, self.total)
    }
}

/// `n / d` as a float; `0 / 0` is NaN.
pub fn fraction(n: u64, d: u64) -> f64 {
    n as f64 / d as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_default() {
        let stats = PairStats::default();
        assert_eq!(stats.total, 0);
        assert_eq!(stats.mapped, 0);
        assert_eq!(stats.concordant, 0);
        assert_eq!(stats.discordant, 0);
    }

    #[test]
    fn test_record_concordant() {
        let mut stats = PairStats::new();
        stats.record_pair();
        stats.record_mapped(true);
        assert_eq!(stats.total, 1);
        assert_eq!(stats.mapped, 1);
        assert_eq!(stats.concordant, 1);
        assert_eq!(stats.discordant, 0);
    }

    #[test]
    fn test_record_filtered() {
        let mut stats = PairStats::new();
        stats.record_pair();
        assert_eq!(stats.total, 1);
        assert_eq!(stats.mapped, 0);
    }

    #[test]
    fn test_multiple_pairs() {
        let mut stats = PairStats::new();
        for concordant in [Some(true), None, Some(false), Some(true)] {
            stats.record_pair();
            if let Some(c) = concordant {
                stats.record_mapped(c);
            }
        }

        assert_eq!(stats.total, 4);
        assert_eq!(stats.mapped, 3);
        assert_eq!(stats.concordant, 2);
        assert_eq!(stats.discordant, 1);
        assert!((stats.mapped_fraction() - 0.75).abs() < 1e-9);
        assert!((stats.concordant_fraction() - 0.5).abs() < 1e-9);
        assert!((stats.discordant_fraction() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_empty_fractions_are_nan() {
        let stats = PairStats::new();
        assert!(stats.mapped_fraction().is_nan());
        assert!(fraction(0, 0).is_nan());
        assert_eq!(fraction(1, 4), 0.25);
    }
}
