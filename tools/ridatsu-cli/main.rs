use clap::{Parser, ValueEnum};
use ridatsu::config::AppConfig;
use ridatsu::logging;
use ridatsu::prelude::*;
use std::fs;
use std::io::{self, Write};
use std::time::Instant;

/// Define a CLI-specific enum for clap to parse.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum TerminalRuleCli {
    /// Keys containing "exit" end the flow
    ExitKey,
    /// Only dead ends and the default exit end the flow
    Structural,
}

impl From<TerminalRuleCli> for TerminalRule {
    fn from(rule: TerminalRuleCli) -> Self {
        match rule {
            TerminalRuleCli::ExitKey => TerminalRule::ExitKeyHeuristic,
            TerminalRuleCli::Structural => TerminalRule::Structural,
        }
    }
}

/// Simulate call-flow drop-off and analyze the worst step
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the call flow JSON file
    flow_path: Option<String>,

    /// Campaign label shown in the report and sent with the analysis (defaults to the flow name)
    #[arg(short, long)]
    campaign: Option<String>,

    /// Random seed for a reproducible simulation
    #[arg(short, long)]
    seed: Option<u64>,

    /// Which steps count as exits
    #[arg(long, value_enum)]
    terminal_rule: Option<TerminalRuleCli>,

    /// Print the report as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Request an analysis of the worst step from the configured endpoint
    #[arg(short, long)]
    analyze: bool,

    /// Path to a JSON configuration file
    #[arg(long)]
    config: Option<String>,

    /// Run in interactive mode to be prompted for inputs
    #[arg(short = 'i', long, help = "Run in interactive 'human' mode")]
    human: bool,
}

struct RunOptions {
    flow_path: String,
    campaign: Option<String>,
    json: bool,
    analyze: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())
        .unwrap_or_else(|e| exit_with_error(&e.to_string()));
    logging::init(&config.logging.filter);

    if let Some(seed) = cli.seed {
        config.simulation.seed = Some(seed);
    }
    if let Some(rule) = cli.terminal_rule {
        config.simulation.terminal_rule = rule.into();
    }

    let options = if cli.human {
        prompt_options()
    } else {
        RunOptions {
            flow_path: cli.flow_path.unwrap_or_else(|| {
                exit_with_error("Flow path is required in non-interactive mode.")
            }),
            campaign: cli.campaign,
            json: cli.json,
            analyze: cli.analyze,
        }
    };

    run(options, config).await;
}

async fn run(options: RunOptions, config: AppConfig) {
    let total_start = Instant::now();

    // --- 1. Loading ---
    let flow_json = fs::read_to_string(&options.flow_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read call flow file '{}': {}",
            &options.flow_path, e
        ))
    });
    let graph = CallFlowGraph::from_json(&flow_json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load call flow: {}", e)));
    let campaign = options
        .campaign
        .unwrap_or_else(|| graph.name().to_string());

    // --- 2. Simulation ---
    let sim_start = Instant::now();
    let simulator = DropoffSimulator::new(config.simulation.clone());
    let report = simulator
        .simulate(&graph, &campaign)
        .unwrap_or_else(|e| exit_with_error(&format!("Simulation failed: {}", e)));
    let sim_duration = sim_start.elapsed();

    if options.json {
        let json = serde_json::to_string_pretty(&report)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to encode report: {}", e)));
        println!("{}", json);
    } else {
        println!("\n{}", ReportFormatter::format_report(&report));
    }

    // --- 3. Analysis ---
    let mut analysis_duration = None;
    if options.analyze {
        let provider = HttpAnalysisProvider::from_config(&config.analysis)
            .unwrap_or_else(|e| exit_with_error(&e.user_message()));
        let requester = DropAnalysisRequester::new(provider);

        println!("\nRequesting drop-off analysis...");
        let analysis_start = Instant::now();
        match analyze_worst_step(&report, &graph, &requester).await {
            Ok(outcome) => println!("  -> {}", outcome.user_message()),
            Err(e) => exit_with_error(&e.user_message()),
        }
        analysis_duration = Some(analysis_start.elapsed());
    } else if let Some(worst) = pick_worst_step(&report) {
        println!(
            "\n  -> Worst step: {} ({} calls lost, {})",
            worst.step_key,
            worst.calls_dropped,
            ReportFormatter::format_rate(worst.drop_rate_percent)
        );
    } else {
        println!("\n  -> {}", AnalysisOutcome::NoSignificantDrop.user_message());
    }

    if options.json {
        return;
    }
    println!("\n--- Summary ---");
    println!("Flow:                 {} ({} steps)", graph.name(), graph.len());
    println!("Visited Steps:        {}", report.len());
    println!("Simulation:           {:?}", sim_duration);
    if let Some(duration) = analysis_duration {
        println!("Analysis:             {:?}", duration);
    }
    println!("-----------------------------");
    println!("Total Execution:      {:?}", total_start.elapsed());
    println!();
}

/// Collects run options through prompts.
fn prompt_options() -> RunOptions {
    println!("--- Ridatsu Interactive Mode ---");

    let flow_path = prompt_for_input("Enter call flow path", Some("data/sample_flow.json"));
    let campaign = prompt_for_input("Enter campaign label (optional)", None);
    let analyze = loop {
        let answer = prompt_for_input("Request an analysis of the worst step? (y/n)", Some("n"));
        match answer.to_lowercase().as_str() {
            "y" | "yes" => break true,
            "n" | "no" => break false,
            _ => println!("Please answer 'y' or 'n'."),
        }
    };

    RunOptions {
        flow_path,
        campaign: (!campaign.is_empty()).then_some(campaign),
        json: false,
        analyze,
    }
}

/// A helper function to prompt the user and read a line of input.
fn prompt_for_input(prompt_text: &str, default: Option<&str>) -> String {
    let mut line = String::new();
    let default_prompt = default.map_or("".to_string(), |d| format!(" [default: {}]", d));

    print!("> {}{}: ", prompt_text, default_prompt);
    if let Err(e) = io::stdout().flush() {
        exit_with_error(&format!("Failed to write prompt: {}", e));
    }
    if let Err(e) = io::stdin().read_line(&mut line) {
        exit_with_error(&format!("Failed to read line: {}", e));
    }
    let trimmed = line.trim().to_string();

    if trimmed.is_empty() {
        default.unwrap_or("").to_string()
    } else {
        trimmed
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
