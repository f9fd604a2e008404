//! Command-line frontend for the FundScope API.
//!
//! Plays the role the web form plays in production: gathers a profile or a
//! free-text description (inline or from a file), calls the HTTP API, and
//! renders the response as text.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use fundscope::client::{ApiClient, InlineTextSource, InputSource, TextFileSource};
use fundscope::models::{NewUserProfile, RecommendationResponse};

#[derive(Debug, Parser)]
#[command(name = "fundscope-cli", about = "FundScope funding recommendations")]
struct Cli {
    /// Base URL of the FundScope API
    #[arg(long, default_value = "http://localhost:8080", global = true)]
    api: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Submit a startup profile
    Profile {
        #[arg(long)]
        name: String,
        #[arg(long)]
        company: String,
        #[arg(long)]
        sector: String,
        #[arg(long)]
        funding_needs: String,
        #[arg(long)]
        growth_stage: String,
    },
    /// Rule-based funding lookup by sector and amount
    Funding {
        #[arg(long)]
        sector: String,
        #[arg(long)]
        funding_needs: String,
    },
    /// AI recommendation for a free-text company description
    Recommend {
        /// Description given inline
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,
        /// Plain-text file to extract the description from
        #[arg(long)]
        file: Option<std::path::PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = ApiClient::new(&cli.api);

    match cli.command {
        Command::Profile {
            name,
            company,
            sector,
            funding_needs,
            growth_stage,
        } => {
            let profile = NewUserProfile {
                name,
                company,
                sector,
                funding_needs,
                growth_stage,
            };
            let stored = client
                .create_profile(&profile)
                .await
                .context("profile submission failed")?;
            println!("Profile created: {}", stored.id);
            println!("  {} ({}) - {}", stored.profile.company, stored.profile.sector, stored.profile.growth_stage);
        }
        Command::Funding {
            sector,
            funding_needs,
        } => {
            let opportunities = client
                .funding_recommend(&sector, &funding_needs)
                .await
                .context("funding lookup failed")?;
            if opportunities.is_empty() {
                println!("No matching funding opportunities.");
            } else {
                for opp in opportunities {
                    println!(
                        "{} - {} ({}), deadline {}",
                        opp.name,
                        opp.amount,
                        opp.eligibility_criteria,
                        opp.deadline.format("%Y-%m-%d")
                    );
                }
            }
        }
        Command::Recommend { text, file } => {
            let source: Box<dyn InputSource> = match (text, file) {
                (Some(text), None) => Box::new(InlineTextSource::new(text)),
                (None, Some(path)) => Box::new(TextFileSource::new(path)),
                _ => bail!("provide exactly one of --text or --file"),
            };

            let description = source.extract_text().context("could not extract input text")?;
            let response = client
                .ai_recommend(&description)
                .await
                .context("recommendation request failed")?;

            match response {
                RecommendationResponse::Single { recommendation } => {
                    println!("{}", recommendation);
                }
                RecommendationResponse::Transcript { recommendations } => {
                    // Degraded success: the bridge handed back raw output.
                    for line in recommendations {
                        println!("{}", line);
                    }
                }
            }
        }
    }

    Ok(())
}
