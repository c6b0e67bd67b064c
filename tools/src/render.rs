//! Plain-text rendering of the dashboard's charts and tables.

use std::fmt::Write;
use utility_risk_core::{
    record::ScoredRecord,
    visualize::{BoxPlot, CorrelationMatrix, Histogram},
};

pub fn histogram(h: &Histogram, width: usize) -> String {
    let mut out = String::new();
    let peak = h.bins.iter().map(|b| b.count).max().unwrap_or(0).max(1);
    for bin in &h.bins {
        let bar = "#".repeat(bin.count * width / peak);
        let _ = writeln!(out, "  {:>10.1} - {:<10.1} |{bar} {}", bin.lower, bin.upper, bin.count);
    }
    out
}

pub fn box_plots(plots: &[BoxPlot]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "  {:<12} {:>6} {:>10} {:>10} {:>10} {:>10} {:>10} {:>8}",
        "resource", "n", "min", "q1", "median", "q3", "max", "outliers"
    );
    for p in plots {
        let _ = writeln!(
            out,
            "  {:<12} {:>6} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>8}",
            p.resource_type, p.count, p.min, p.q1, p.median, p.q3, p.max, p.outliers.len()
        );
    }
    out
}

pub fn correlation(m: &CorrelationMatrix) -> String {
    let mut out = String::new();
    let _ = write!(out, "  {:<20}", "");
    for c in &m.columns {
        let _ = write!(out, " {c:>20}");
    }
    let _ = writeln!(out);
    for (name, row) in m.columns.iter().zip(&m.values) {
        let _ = write!(out, "  {name:<20}");
        for cell in row {
            match cell {
                Some(v) => { let _ = write!(out, " {v:>20.3}"); }
                None    => { let _ = write!(out, " {:>20}", "n/a"); }
            }
        }
        let _ = writeln!(out);
    }
    out
}

pub fn preview(rows: &[ScoredRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "  {:<10} {:<10} {:<10} {:>10} {:>10} {:>10} {:>8} {:>5} {:>10}",
        "customer", "txn", "resource", "debt", "amount", "usage", "z", "risk", "loss"
    );
    for s in rows {
        let r = &s.record;
        let _ = writeln!(
            out,
            "  {:<10} {:<10} {:<10} {:>10.2} {:>10.2} {:>10.2} {:>8.3} {:>5} {:>10.2}",
            r.customer_id,
            r.transaction_id,
            r.resource_type,
            r.total_debt,
            r.transaction_amount,
            r.usage_volume,
            s.usage_z_score,
            if s.is_risk { "yes" } else { "no" },
            s.estimated_loss
        );
    }
    out
}
