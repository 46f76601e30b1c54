//! Console summary for a finished backtest.

use crate::runner::BacktestOutcome;

const RULE: &str = "===============================================";

/// Render the results block plus per-instrument finals and failures.
pub fn render_summary(outcome: &BacktestOutcome) -> String {
    let portfolio = &outcome.portfolio;
    let summary = &portfolio.summary;
    let mut out = String::with_capacity(1024 + 64 * portfolio.runs.len());

    if !portfolio.runs.is_empty() {
        out.push_str(&format!(
            "{:<8} {:>14} {:>14}\n",
            "Symbol", "Final", "Buy & Hold"
        ));
        for run in &portfolio.runs {
            out.push_str(&format!(
                "{:<8} {:>14.2} {:>14.2}\n",
                run.symbol,
                run.final_equity(),
                run.benchmark_final()
            ));
        }
        out.push('\n');
    }

    out.push_str("============== BACKTEST RESULTS ==============\n");
    out.push_str(&format!("Run:              {}\n", outcome.run_id));
    out.push_str(&format!(
        "Instruments:      {} succeeded, {} failed\n",
        summary.succeeded, summary.failed
    ));
    out.push_str(&format!(
        "Starting Capital: {:.2}\n",
        summary.starting_capital
    ));
    out.push_str(&format!("Final Capital:    {:.2}\n", summary.final_capital));
    out.push_str(&format!(
        "The Strategy Returned: {:.2}%\n",
        summary.total_return_pct
    ));
    out.push_str("------------------------\n");
    out.push_str(&format!(
        "The Strategy Outperformed Buy and Hold: {:.2}% of the time\n",
        summary.pct_outperformed
    ));
    out.push_str(&format!(
        "The Strategy was Profitable: {:.2}% of the time\n",
        summary.pct_profitable
    ));
    out.push_str(&format!(
        "In this time Buy and Hold: {:.2}%\n",
        summary.benchmark_return_pct
    ));
    if let Err(e) = &portfolio.aggregate {
        out.push_str(&format!("Aggregate curve:  unavailable ({e})\n"));
    }
    out.push_str(RULE);
    out.push('\n');

    if !portfolio.failures.is_empty() {
        out.push_str("\nFailed instruments:\n");
        for failure in &portfolio.failures {
            out.push_str(&format!(
                "  {:<8} [{:?}] {}\n",
                failure.symbol, failure.stage, failure.reason
            ));
        }
    }
    if outcome.has_synthetic {
        out.push_str("\nWARNING: Results include SYNTHETIC data\n");
    }

    out
}

pub fn print_summary(outcome: &BacktestOutcome) {
    println!();
    print!("{}", render_summary(outcome));
    println!();
}
