use anyhow::{Context, Result};
use base64::Engine as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use healthmonitor_ai::HealthAssistant;
use healthmonitor_ai::config::Config;
use healthmonitor_ai::models::{UserContext, Vitals};

#[derive(Parser)]
#[command(name = "healthmonitor")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze symptom text and/or a photo of a health concern
    Analyze {
        #[arg(default_value = "")]
        symptoms: String,

        /// Image file to attach
        #[arg(long, conflicts_with = "image_base64")]
        image: Option<std::path::PathBuf>,

        /// Already-encoded image, optionally as a data: URI
        #[arg(long)]
        image_base64: Option<String>,
    },

    /// Ask the health companion a question
    Chat {
        text: String,

        #[arg(long)]
        role: Option<String>,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        heart_rate: Option<f64>,

        #[arg(long)]
        systolic: Option<f64>,

        #[arg(long)]
        diastolic: Option<f64>,

        #[arg(long)]
        weight: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays pure JSON
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load();
    let assistant = HealthAssistant::new(&config);

    match cli.command {
        Commands::Analyze {
            symptoms,
            image,
            image_base64,
        } => {
            let image_base64 = match image {
                Some(path) => {
                    let bytes = std::fs::read(&path)
                        .with_context(|| format!("Failed to read image {}", path.display()))?;
                    Some(base64::engine::general_purpose::STANDARD.encode(bytes))
                }
                None => image_base64,
            };
            let result = assistant
                .analyze_symptoms(&symptoms, image_base64.as_deref())
                .await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Chat {
            text,
            role,
            name,
            heart_rate,
            systolic,
            diastolic,
            weight,
        } => {
            let has_vitals = [heart_rate, systolic, diastolic, weight]
                .iter()
                .any(Option::is_some);
            let context = UserContext {
                role,
                user_name: name,
                latest_vitals: has_vitals.then_some(Vitals {
                    heart_rate,
                    systolic_bp: systolic,
                    diastolic_bp: diastolic,
                    weight,
                }),
            };
            let message = assistant.send_message(&text, Some(&context)).await;
            println!("{}", serde_json::to_string_pretty(&message)?);
        }
    }

    Ok(())
}
