use crate::simulator::{DropoffReport, StepResult};
use std::cmp::Reverse;

/// Picks the step worth a closer look: the one that lost the most calls in
/// absolute terms, ignoring steps that lost nothing and steps that lost
/// everything (those are exits, not problems). Ties go to the earliest step.
///
/// Returns `None` when no step qualifies.
pub fn pick_worst_step(report: &DropoffReport) -> Option<&StepResult> {
    report
        .step_results
        .iter()
        .filter(|r| r.drop_rate_percent > 0.0 && r.drop_rate_percent < 100.0)
        .min_by_key(|r| Reverse(r.calls_dropped))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(results: Vec<StepResult>) -> DropoffReport {
        DropoffReport {
            campaign_label: "Test".to_string(),
            initial_volume: 1000,
            step_results: results,
        }
    }

    #[test]
    fn test_ties_go_to_earliest_step() {
        let report = report(vec![
            StepResult::new("a", "", 1000, 50),
            StepResult::new("b", "", 950, 50),
            StepResult::new("c", "", 900, 900),
        ]);
        assert_eq!(pick_worst_step(&report).unwrap().step_key, "a");
    }

    #[test]
    fn test_absolute_loss_beats_rate() {
        let report = report(vec![
            StepResult::new("big", "", 1000, 60),
            StepResult::new("small", "", 100, 20),
            StepResult::new("end", "", 80, 80),
        ]);
        let worst = pick_worst_step(&report).unwrap();
        assert_eq!(worst.step_key, "big");
        assert!(worst.drop_rate_percent < 20.0);
    }
}
