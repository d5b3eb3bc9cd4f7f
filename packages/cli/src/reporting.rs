//! Single-shot crime reporting flow.

use console::style;
use crime_console_gateway::GatewayClient;
use crime_console_gateway_models::ReportRequest;
use dialoguer::Input;

/// Prompts for the report fields, submits once, and renders the gateway's
/// confirmation, detected crimes, and recommendations.
///
/// # Errors
///
/// Returns an error if a terminal prompt fails. A gateway failure is
/// rendered inline and leaves the menu usable.
pub async fn run(client: &GatewayClient) -> Result<(), Box<dyn std::error::Error>> {
    let crime: String = Input::new()
        .with_prompt("Crime details")
        .validate_with(|text: &String| {
            if text.trim().is_empty() {
                Err("Please provide crime details.")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    let location: String = Input::new()
        .with_prompt("Location")
        .allow_empty(true)
        .interact_text()?;

    let attack_type: String = Input::new()
        .with_prompt("Type of attack")
        .allow_empty(true)
        .interact_text()?;

    let request = ReportRequest {
        crime: crime.trim().to_string(),
        location: location.trim().to_string(),
        attack_type: attack_type.trim().to_string(),
    };

    match client.report(&request).await {
        Ok(response) => {
            println!();
            if !response.message.is_empty() {
                println!("{}", style(&response.message).green());
            }

            if !response.detected_crimes.is_empty() {
                println!();
                println!("{}", style("Detected Crimes").bold());
                for crime in &response.detected_crimes {
                    println!("- {crime}");
                }
            }

            if let Some(recommendations) = response.recommendations() {
                println!();
                println!("{}", style("Recommendations").bold());
                println!("{recommendations}");
            }
        }
        Err(e) => {
            println!("{}", style(format!("Report failed: {e}")).red());
        }
    }

    Ok(())
}
