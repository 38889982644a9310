//! Terminal summaries for sweep and fleet runs

use crate::fleet::ClientReport;
use crate::stats::SizeStatistics;
use colored::Colorize;
use std::time::Duration;

fn fmt_us(value: Option<f64>) -> String {
    match value {
        Some(us) => format!("{:>10.2}", us),
        None => format!("{:>10}", "-"),
    }
}

/// Per-size statistics table for one client's sweep.
pub fn format_size_table(stats: &[SizeStatistics], color: bool) -> String {
    let mut out = String::new();
    let header = format!(
        "{:>8} {:>7} {:>7} {:>8} {:>9} {:>10} {:>10} {:>10} {:>10}",
        "size", "ok", "timeout", "mismatch", "rate%", "min_us", "mean_us", "p95_us", "max_us"
    );
    if color {
        out.push_str(&header.bold().to_string());
    } else {
        out.push_str(&header);
    }
    out.push('\n');

    for s in stats {
        let rate = format!("{:>9.1}", s.success_rate);
        let rate = if !color {
            rate
        } else if s.success_rate >= 99.0 {
            rate.green().to_string()
        } else if s.success_rate >= 90.0 {
            rate.yellow().to_string()
        } else {
            rate.red().to_string()
        };
        out.push_str(&format!(
            "{:>8} {:>7} {:>7} {:>8} {} {} {} {} {}\n",
            s.size,
            s.ok_count,
            s.timeout_count,
            s.mismatch_count,
            rate,
            fmt_us(s.min_us),
            fmt_us(s.mean_us),
            fmt_us(s.p95_us),
            fmt_us(s.max_us),
        ));
    }
    out
}

/// Final fleet report: per-client status lines plus aggregate counts.
pub fn format_fleet_report(reports: &[ClientReport], total_elapsed: Duration, color: bool) -> String {
    let mut out = String::new();
    let title = "=== Fleet report ===";
    if color {
        out.push_str(&title.bold().to_string());
    } else {
        out.push_str(title);
    }
    out.push('\n');

    let mut succeeded = 0usize;
    let mut failed = 0usize;

    for report in reports {
        match &report.result {
            Ok(set) => {
                succeeded += 1;
                let status = if color {
                    "ok".green().to_string()
                } else {
                    "ok".to_string()
                };
                let csv = report
                    .csv_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "-".to_string());
                out.push_str(&format!(
                    "  {} [{}] {} samples, {} timeouts, {} mismatches, {:.2}s, csv: {}\n",
                    report.client_id,
                    status,
                    set.samples.len(),
                    set.timeout_count(),
                    set.mismatch_count(),
                    report.elapsed.as_secs_f64(),
                    csv,
                ));
            }
            Err(e) => {
                failed += 1;
                let status = if color {
                    "failed".red().to_string()
                } else {
                    "failed".to_string()
                };
                out.push_str(&format!(
                    "  {} [{}] after {:.2}s: {}\n",
                    report.client_id,
                    status,
                    report.elapsed.as_secs_f64(),
                    e,
                ));
            }
        }
    }

    out.push_str(&format!(
        "clients: {} succeeded, {} failed, total {:.2}s\n",
        succeeded,
        failed,
        total_elapsed.as_secs_f64()
    ));
    out
}
