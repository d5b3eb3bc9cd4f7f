//! Guided crime analysis flow.
//!
//! Walks the cascading selection (state, then district, then years and
//! crimes constrained by both), submits the analysis, and renders the
//! normalized report as tables.

use std::time::Duration;

use console::style;
use crime_console_analysis::orchestrator::{RequestOrchestrator, SubmissionPhase};
use crime_console_analysis::parse;
use crime_console_analysis::report::AnalysisReport;
use crime_console_analysis::selection::SelectionController;
use crime_console_gateway::GatewayClient;
use dialoguer::{Input, MultiSelect, Select};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Runs the guided analysis flow once.
///
/// # Errors
///
/// Returns an error if a terminal prompt fails. Gateway and validation
/// failures are rendered inline and leave the menu usable.
pub async fn run(
    client: &GatewayClient,
    multi: &MultiProgress,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut controller = SelectionController::new();

    controller.load_states(client).await;
    if controller.available_states().is_empty() {
        println!(
            "{}",
            style(format!(
                "No states available from the gateway at {}. Is it running?",
                client.base_url()
            ))
            .red()
        );
        return Ok(());
    }

    prompt_state(&mut controller, client).await?;
    prompt_district(&mut controller, client).await?;
    prompt_years(&mut controller)?;
    prompt_crimes(&mut controller)?;
    prompt_predict_years(&mut controller)?;

    let mut orchestrator = RequestOrchestrator::new();

    let spinner = analyzing_spinner(multi);
    orchestrator.submit(client, controller.selection()).await;
    spinner.finish_and_clear();

    match orchestrator.phase() {
        SubmissionPhase::Ready => {
            if let Some(report) = orchestrator.report() {
                render_report(client, report);
            }
        }
        SubmissionPhase::Error => {
            let message = orchestrator.error_message().unwrap_or("An error occurred.");
            println!("{}", style(format!("Analysis failed: {message}")).red());
        }
        SubmissionPhase::Idle | SubmissionPhase::Loading => {}
    }

    Ok(())
}

/// Prompts for the state and synchronizes the dependent option lists.
async fn prompt_state(
    controller: &mut SelectionController,
    client: &GatewayClient,
) -> Result<(), Box<dyn std::error::Error>> {
    let states = controller.available_states().to_vec();
    let idx = Select::new()
        .with_prompt("State")
        .items(&states)
        .default(0)
        .interact()?;

    let effects = controller.set_state(&states[idx]);
    controller.run_effects(client, effects).await;
    Ok(())
}

/// Prompts for the district (when the state has any) and synchronizes the
/// pair-keyed option lists.
async fn prompt_district(
    controller: &mut SelectionController,
    client: &GatewayClient,
) -> Result<(), Box<dyn std::error::Error>> {
    let districts = controller.available_districts().to_vec();
    if districts.is_empty() {
        println!(
            "No districts listed for {}; analysis needs one.",
            controller.selection().state
        );
        let district: String = Input::new().with_prompt("District").interact_text()?;
        let effects = controller.set_district(district.trim());
        controller.run_effects(client, effects).await;
        return Ok(());
    }

    let idx = Select::new()
        .with_prompt("District")
        .items(&districts)
        .default(0)
        .interact()?;

    let effects = controller.set_district(&districts[idx]);
    controller.run_effects(client, effects).await;
    Ok(())
}

/// Prompts for the years to analyze, defaulting to every year the area has
/// records for.
fn prompt_years(controller: &mut SelectionController) -> Result<(), Box<dyn std::error::Error>> {
    let available = controller.available_years();
    let default = available
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    if !available.is_empty() {
        println!("Years with records: {default}");
    }

    let mut input = Input::new().with_prompt("Years to analyze (comma-separated)");
    if !default.is_empty() {
        input = input.default(default);
    }
    let years_text: String = input
        .validate_with(|text: &String| parse::parse_years(text).map(|_| ()).map_err(|e| e.to_string()))
        .interact_text()?;

    controller.set_years_text(&years_text);
    Ok(())
}

/// Prompts for the crimes to analyze, offering the area's prevalent crimes
/// as checkboxes and falling back to free text.
fn prompt_crimes(controller: &mut SelectionController) -> Result<(), Box<dyn std::error::Error>> {
    let prevalent = controller.prevalent_crimes();

    if !prevalent.is_empty() {
        let labels: Vec<String> = prevalent.iter().map(ToString::to_string).collect();
        let selected = MultiSelect::new()
            .with_prompt("Crimes to analyze (space=toggle, enter=confirm)")
            .items(&labels)
            .interact()?;

        if !selected.is_empty() {
            let crimes_text = selected
                .iter()
                .map(|&i| prevalent[i].crime.clone())
                .collect::<Vec<_>>()
                .join(", ");
            controller.set_crimes_text(&crimes_text);
            return Ok(());
        }
    }

    let crimes_text: String = Input::new()
        .with_prompt("Crimes to analyze (comma-separated)")
        .validate_with(|text: &String| {
            parse::parse_crimes(text).map(|_| ()).map_err(|e| e.to_string())
        })
        .interact_text()?;

    controller.set_crimes_text(&crimes_text);
    Ok(())
}

/// Prompts for the prediction horizon.
fn prompt_predict_years(
    controller: &mut SelectionController,
) -> Result<(), Box<dyn std::error::Error>> {
    let predict_years_text: String = Input::new()
        .with_prompt("Years to predict")
        .default("5".to_string())
        .validate_with(|text: &String| {
            parse::parse_predict_years(text)
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .interact_text()?;

    controller.set_predict_years_text(&predict_years_text);
    Ok(())
}

/// Spinner shown while the analyze call is in flight.
fn analyzing_spinner(multi: &MultiProgress) -> ProgressBar {
    let bar = multi.add(ProgressBar::new_spinner());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message("Analyzing...");
    bar
}

/// Renders the normalized report: historical counts, per-crime prediction
/// tables, totals, and the plot URL.
fn render_report(client: &GatewayClient, report: &AnalysisReport) {
    println!();
    println!("{}", style("Analysis Report").bold());
    println!("{}", "-".repeat(60));

    if report.historical_statistics.is_empty() {
        println!("No historical statistics returned.");
    } else {
        println!("{}", style("Historical Crime Statistics").bold());
        println!("{:<30} CASES", "CRIME");
        for (crime, count) in &report.historical_statistics {
            println!("{crime:<30} {count}");
        }
    }

    for (crime, points) in &report.predictions_by_crime {
        println!();
        println!("{}", style(format!("Predictions: {crime}")).bold());
        if points.is_empty() {
            println!("No prediction points returned.");
            continue;
        }
        println!("{:<8} {:<14} CONFIDENCE INTERVAL", "YEAR", "PREDICTED");
        for point in points {
            let interval = point
                .confidence_interval
                .as_ref()
                .map_or_else(|| "-".to_string(), ToString::to_string);
            println!("{:<8} {:<14.2} {interval}", point.year, point.predicted);
        }
    }

    println!();
    println!("Total records analyzed: {}", report.total_records);

    if !report.plot_reference.is_empty() {
        println!("Crime trend plot: {}", client.plot_url(&report.plot_reference));
    }
}
