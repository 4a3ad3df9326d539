mod common;
use common::*;
use pretty_assertions::assert_eq;
use rand::SeedableRng;
use rand::rngs::StdRng;
use ridatsu::prelude::*;

#[test]
fn test_worst_step_is_the_largest_absolute_loss() {
    // 10% of 1000 loses more calls than 20% of what is left after.
    let report = create_report("Spring", &[("a", 100), ("b", 180), ("c", 720)]);
    assert_eq!(report.step("b").unwrap().drop_rate_percent, 20.0);

    let worst = pick_worst_step(&report).unwrap();
    assert_eq!(worst.step_key, "b");
    assert_eq!(worst.calls_dropped, 180);
}

#[test]
fn test_larger_rate_does_not_win_on_its_own() {
    let report = create_report("Spring", &[("a", 200), ("b", 180), ("c", 620)]);
    assert_eq!(report.step("a").unwrap().drop_rate_percent, 20.0);
    assert_eq!(report.step("b").unwrap().drop_rate_percent, 22.5);

    let worst = pick_worst_step(&report).unwrap();
    assert_eq!(worst.step_key, "a");
}

#[test]
fn test_ties_go_to_the_earliest_step() {
    let report = create_report("Spring", &[("a", 50), ("b", 50), ("c", 900)]);
    assert_eq!(pick_worst_step(&report).unwrap().step_key, "a");
}

#[test]
fn test_repeated_selection_gives_the_same_step() {
    let tied = create_report("Spring", &[("a", 50), ("b", 50), ("c", 900)]);
    let first = pick_worst_step(&tied);
    let second = pick_worst_step(&tied);
    assert_eq!(first, second);
    assert!(std::ptr::eq(first.unwrap(), second.unwrap()));

    let graph = create_branching_flow();
    let report = DropoffSimulator::default()
        .simulate_with_rng(&graph, "Spring", &mut StdRng::seed_from_u64(21))
        .unwrap();
    let picks: Vec<_> = (0..5)
        .map(|_| pick_worst_step(&report).map(|r| r.step_key.clone()))
        .collect();
    assert!(picks[0].is_some());
    assert!(picks.iter().all(|p| *p == picks[0]));
}

#[test]
fn test_exits_and_pass_throughs_are_ignored() {
    let report = create_report("Spring", &[("a", 0), ("b", 0), ("c", 1000)]);
    assert!(pick_worst_step(&report).is_none());

    let empty = create_report("Spring", &[]);
    assert!(pick_worst_step(&empty).is_none());
}

#[test]
fn test_selected_step_is_strictly_between_zero_and_hundred() {
    let graph = create_branching_flow();
    for seed in 0..100 {
        let report = DropoffSimulator::default()
            .simulate_with_rng(&graph, "Spring", &mut StdRng::seed_from_u64(seed))
            .unwrap();
        let worst = pick_worst_step(&report).unwrap();
        assert!(worst.drop_rate_percent > 0.0);
        assert!(worst.drop_rate_percent < 100.0);

        let max_loss = report
            .step_results
            .iter()
            .filter(|r| r.drop_rate_percent > 0.0 && r.drop_rate_percent < 100.0)
            .map(|r| r.calls_dropped)
            .max()
            .unwrap();
        assert_eq!(worst.calls_dropped, max_loss);
    }
}

#[tokio::test]
async fn test_no_significant_drop_skips_the_provider() {
    let config = SimulatorConfig {
        passive_drop: DropRange { min: 0.0, max: 0.0 },
        ..SimulatorConfig::default()
    };
    let graph = CallFlowGraph::builder("Recorded notice", "exit")
        .step("greeting", CallFlowStep::new("Hello.").then("notice"))
        .step("notice", CallFlowStep::new("This call is recorded.").then("exit"))
        .step("exit", CallFlowStep::new("Goodbye."))
        .build()
        .unwrap();

    let report = DropoffSimulator::new(config)
        .simulate_with_rng(&graph, "Quiet", &mut StdRng::seed_from_u64(1))
        .unwrap();
    let rates: Vec<_> = report.step_results.iter().map(|r| r.drop_rate_percent).collect();
    assert_eq!(rates, vec![0.0, 0.0, 100.0]);

    let requester = DropAnalysisRequester::new(FakeProvider::answering("unused"));
    let outcome = analyze_worst_step(&report, &graph, &requester).await.unwrap();
    assert_eq!(outcome, AnalysisOutcome::NoSignificantDrop);
    assert_eq!(
        outcome.user_message(),
        "No significant drop points found in this call flow."
    );
    assert_eq!(requester.provider().calls(), 0);
}
