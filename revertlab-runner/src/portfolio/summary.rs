//! Scalar portfolio statistics.

use serde::{Deserialize, Serialize};

use revertlab_core::engine::InstrumentRun;

/// Headline numbers for a portfolio run.
///
/// Percentages are taken over instruments that completed; failed instruments
/// only show up in `failed`. With no successes every ratio is 0 and
/// `final_capital` equals `starting_capital`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub starting_capital: f64,
    /// Mean final equity per instrument.
    pub final_capital: f64,
    pub total_return_pct: f64,
    pub benchmark_return_pct: f64,
    pub pct_outperformed: f64,
    pub pct_profitable: f64,
    pub num_outperformed: usize,
    pub num_profitable: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl PortfolioSummary {
    pub fn compute(runs: &[InstrumentRun], failed: usize, initial_capital: f64) -> Self {
        let succeeded = runs.len();
        let num_profitable = runs.iter().filter(|r| r.is_profitable()).count();
        let num_outperformed = runs.iter().filter(|r| r.outperformed()).count();

        let strategy_pnl: f64 = runs
            .iter()
            .map(|r| r.final_equity() - initial_capital)
            .sum();
        let benchmark_pnl: f64 = runs
            .iter()
            .map(|r| r.benchmark_final() - initial_capital)
            .sum();

        let (final_capital, total_return_pct, benchmark_return_pct) = if succeeded == 0 {
            (initial_capital, 0.0, 0.0)
        } else {
            let n = succeeded as f64;
            let deployed = initial_capital * n;
            (
                initial_capital + strategy_pnl / n,
                strategy_pnl / deployed * 100.0,
                benchmark_pnl / deployed * 100.0,
            )
        };

        Self {
            starting_capital: initial_capital,
            final_capital,
            total_return_pct,
            benchmark_return_pct,
            pct_outperformed: pct(num_outperformed, succeeded),
            pct_profitable: pct(num_profitable, succeeded),
            num_outperformed,
            num_profitable,
            succeeded,
            failed,
        }
    }
}

fn pct(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_portfolio() {
        let summary = PortfolioSummary::compute(&[], 3, 10_000.0);
        assert_eq!(summary.final_capital, 10_000.0);
        assert_eq!(summary.total_return_pct, 0.0);
        assert_eq!(summary.pct_profitable, 0.0);
        assert_eq!(summary.succeeded, 0);
        assert_eq!(summary.failed, 3);
    }

    #[test]
    fn pct_handles_zero_total() {
        assert_eq!(pct(0, 0), 0.0);
        assert_eq!(pct(1, 4), 25.0);
    }
}
