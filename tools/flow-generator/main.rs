use clap::Parser;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use ridatsu::prelude::*;
use std::fs;

/// A CLI tool to generate random call flows for the Ridatsu simulator
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_flow.json")]
    output: String,

    /// The number of steps between the greeting and the exit
    #[arg(long, default_value_t = 6)]
    steps: usize,

    /// Random seed for a reproducible flow
    #[arg(long)]
    seed: Option<u64>,

    /// Chance (0..=1) that a middle step waits for a caller response
    #[arg(long, default_value_t = 0.5)]
    interactive_ratio: f64,
}

const PROMPTS: &[&str] = &[
    "Can I confirm your date of birth?",
    "Would you like to hear about our new plan?",
    "Is now a good time to talk?",
    "Which product are you calling about?",
    "Shall I transfer you to an agent?",
    "Can you tell me your postcode?",
];

const STATEMENTS: &[&str] = &[
    "This call may be recorded for quality purposes.",
    "Thanks, one moment while I check that.",
    "Our offices are open from nine to five.",
    "You are eligible for a loyalty discount.",
];

const KEYWORDS: &[&str] = &["yes", "no", "agent", "later", "price", "cancel"];

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if !(0.0..=1.0).contains(&cli.interactive_ratio) {
        eprintln!(
            "Error: --interactive-ratio ({}) must be between 0 and 1",
            cli.interactive_ratio
        );
        std::process::exit(1);
    }

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    println!("Generating call flow with {} middle step(s)...", cli.steps);

    let graph = generate_flow(&mut rng, cli.steps, cli.interactive_ratio)?;
    fs::write(&cli.output, graph.to_json_pretty()?)?;

    println!(
        "Successfully generated and saved call flow '{}' to '{}'",
        graph.name(),
        cli.output
    );

    Ok(())
}

/// Builds `greeting -> step_1 .. step_n -> exit`. Interactive steps branch
/// on keywords to later steps or straight to the exit.
fn generate_flow(
    rng: &mut StdRng,
    middle_steps: usize,
    interactive_ratio: f64,
) -> std::result::Result<CallFlowGraph, GraphError> {
    let keys: Vec<String> = std::iter::once("greeting".to_string())
        .chain((1..=middle_steps).map(|i| format!("step_{}", i)))
        .chain(std::iter::once("exit".to_string()))
        .collect();

    let name = format!("Generated flow #{}", rng.random_range(100..1000));
    let mut builder =
        CallFlowGraph::builder(name, "exit").description("Randomly generated call flow");

    for (i, key) in keys.iter().enumerate() {
        let step = match i {
            0 => CallFlowStep::new("Hello, thanks for taking our call.")
                .with_description("Greeting")
                .then(keys[1].clone()),
            _ if i == keys.len() - 1 => {
                CallFlowStep::new("Thank you, goodbye.").with_description("Exit")
            }
            _ => generate_middle_step(rng, &keys[i + 1..], interactive_ratio),
        };
        builder = builder.step(key.clone(), step);
        if i > 0 && i < keys.len() - 1 {
            println!("-> Generated '{}'.", key);
        }
    }

    builder.build()
}

fn generate_middle_step(
    rng: &mut StdRng,
    later_keys: &[String],
    interactive_ratio: f64,
) -> CallFlowStep {
    let next = later_keys[0].clone();
    if !rng.random_bool(interactive_ratio) {
        let text = STATEMENTS.choose(rng).copied().unwrap_or("Please hold.");
        return CallFlowStep::new(text).with_description("Statement").then(next);
    }

    let text = PROMPTS.choose(rng).copied().unwrap_or("Can you repeat that?");
    let timeout = rng.random_bool(0.5).then(|| rng.random_range(5..=30));
    let mut step = CallFlowStep::new(text)
        .with_description("Question")
        .waiting(timeout);

    let branches = rng.random_range(0..=2);
    for _ in 0..branches {
        let keyword = KEYWORDS.choose(rng).copied().unwrap_or("yes");
        let target = later_keys.choose(rng).cloned().unwrap_or_else(|| next.clone());
        step = step.with_condition(Condition::contains([keyword], target));
    }
    if branches > 0 {
        step = step.with_condition(Condition::default_to(next));
    } else {
        step = step.then(next);
    }
    step
}
