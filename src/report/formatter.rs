use crate::simulator::{DropoffReport, StepResult};
use itertools::Itertools;

const BAR_WIDTH: usize = 20;

/// Formats drop-off reports into human-readable funnel tables
pub struct ReportFormatter;

impl ReportFormatter {
    /// Formats a report as a table, one row per visited step.
    pub fn format_report(report: &DropoffReport) -> String {
        let key_width = report
            .step_results
            .iter()
            .map(|r| r.step_key.chars().count())
            .chain(std::iter::once("step".len()))
            .max()
            .unwrap_or(4);

        let header = format!(
            "{:>3}  {:<key_width$}  {:>8}  {:>8}  {:>6}",
            "#", "step", "reached", "dropped", "rate"
        );
        let rows = report
            .step_results
            .iter()
            .enumerate()
            .map(|(i, r)| Self::format_row(i + 1, r, key_width));

        let title = if report.campaign_label.is_empty() {
            format!("Simulated funnel ({} calls)", report.initial_volume)
        } else {
            format!(
                "Campaign '{}' ({} calls)",
                report.campaign_label, report.initial_volume
            )
        };

        std::iter::once(title)
            .chain(std::iter::once(header))
            .chain(rows)
            .join("\n")
    }

    fn format_row(position: usize, result: &StepResult, key_width: usize) -> String {
        format!(
            "{:>3}  {:<key_width$}  {:>8}  {:>8}  {:>6}  {}",
            position,
            result.step_key,
            result.calls_reached,
            result.calls_dropped,
            Self::format_rate(result.drop_rate_percent),
            Self::bar(result.drop_rate_percent),
        )
        .trim_end()
        .to_string()
    }

    /// Format a percentage, dropping a zero fraction.
    pub fn format_rate(rate: f64) -> String {
        if rate.fract() == 0.0 {
            format!("{}%", rate as i64)
        } else {
            format!("{:.1}%", rate)
        }
    }

    fn bar(rate: f64) -> String {
        let filled = ((rate / 100.0) * BAR_WIDTH as f64).round() as usize;
        "#".repeat(filled.min(BAR_WIDTH))
    }
}
