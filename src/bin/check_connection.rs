//! Manual connectivity check: lists models visible to the configured key, then
//! sends one test prompt. Exits 0 on success, 1 otherwise.

use std::process::ExitCode;

use colored::*;

use healthmonitor_ai::config::Config;
use healthmonitor_ai::error::CallPath;
use healthmonitor_ai::extract::extract;
use healthmonitor_ai::models::{GenerateContentRequest, Part};
use healthmonitor_ai::transport::{GeminiTransport, Transport};

const TEST_PROMPT: &str = r#"Say "Connection Successful""#;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load();
    println!("Using API Key: {}", config.gemini.masked_key());

    let transport = match GeminiTransport::new(config.gemini.clone()) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("{} {}", "Checking failed:".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };

    // Listing is informational; a failure here does not fail the check.
    println!("\n--- Testing {} listModels ---", config.gemini.api_version);
    match transport.list_models().await {
        Ok(models) => {
            let names: Vec<&str> = models.iter().take(3).map(|m| m.name.as_str()).collect();
            println!("Available models: {}", names.join(", ").cyan());
        }
        Err(e) => eprintln!("{} {}", "Error listing models:".yellow(), e),
    }

    println!(
        "\n--- Testing {}/{} generateContent ---",
        config.gemini.api_version,
        transport.model()
    );
    let request = GenerateContentRequest::single(vec![Part::Text {
        text: TEST_PROMPT.to_string(),
    }]);
    let outcome = match transport.generate(&request).await {
        Ok(resp) => extract(&resp).into_text(CallPath::Chat),
        Err(e) => Err(e),
    };

    match outcome {
        Ok(text) => {
            println!("{} {}", "SUCCESS:".green(), text.trim());
            println!(
                "\n{}",
                format!(
                    ">>> VERIFICATION PASSED: API Key is valid and {} is working. <<<",
                    transport.model()
                )
                .green()
                .bold()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{} {}", "FAILURE:".red(), e);
            println!(
                "\n{}",
                ">>> VERIFICATION FAILED: Could not connect with the provided key. <<<"
                    .red()
                    .bold()
            );
            ExitCode::FAILURE
        }
    }
}
