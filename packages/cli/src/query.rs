//! Natural-language crime query flow.

use console::style;
use crime_console_gateway::GatewayClient;
use dialoguer::Input;

/// Prompts for a question, submits once, and renders the answer plus any
/// similar crimes the gateway found.
///
/// # Errors
///
/// Returns an error if a terminal prompt fails. A gateway failure is
/// rendered inline and leaves the menu usable.
pub async fn run(client: &GatewayClient) -> Result<(), Box<dyn std::error::Error>> {
    let input: String = Input::new()
        .with_prompt("Ask about a crime")
        .validate_with(|text: &String| {
            if text.trim().is_empty() {
                Err("Please enter a query.")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    match client.query(input.trim()).await {
        Ok(response) => {
            println!();
            if response.response.is_empty() {
                println!("No response from the gateway.");
            } else {
                println!("{}", style("Response").bold());
                println!("{}", response.response);
            }

            if !response.similar_crimes.is_empty() {
                println!();
                println!("{}", style("Similar Crimes").bold());
                for similar in &response.similar_crimes {
                    match similar.similarity {
                        Some(score) => println!(
                            "- {}: {} (similarity {score:.2})",
                            similar.crime, similar.description
                        ),
                        None => println!("- {}: {}", similar.crime, similar.description),
                    }
                }
            }
        }
        Err(e) => {
            println!("{}", style(format!("Query failed: {e}")).red());
        }
    }

    Ok(())
}
