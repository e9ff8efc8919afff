use std::fmt::Write;

use super::types::{Criterion, Means, SummaryRow};

fn label(criterion: Criterion) -> &'static str {
    match criterion {
        Criterion::Similarity => "Similarity ",
        Criterion::Correctness => "Correctness",
        Criterion::Helpfulness => "Helpfulness",
        Criterion::Containment => "Containment",
    }
}

/// One `Label: mean/10` line per criterion, in evaluation order.
pub fn format_means(means: &Means) -> String {
    let mut out = String::new();
    for criterion in Criterion::ALL {
        let _ = writeln!(out, "{}: {:.2}/10", label(criterion), means.get(criterion));
    }
    out
}

/// Compact per-example listing.
pub fn format_rows(rows: &[SummaryRow]) -> String {
    let mut out = String::new();
    for row in rows {
        let _ = writeln!(
            out,
            "- Q: {}\n  → sim={}, corr={}, help={}, cont={}",
            row.question, row.similarity, row.correctness, row.helpfulness, row.containment
        );
    }
    out
}
