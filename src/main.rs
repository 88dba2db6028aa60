use std::{fs, path::PathBuf};

use anyhow::Context;
use autofill::{
    config::AutofillConfigBuilder,
    detector,
    filler::FormFiller,
    resolver::ApplicantFields,
};
use clap::{Parser, Subcommand};
use headless_chrome::browser::default_executable;
use log::debug;
use serde_json::json;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "ATS Form Autofill CLI", long_about = None)]
struct Args {
    /// Path to the real Chrome executable (default: system Chrome)
    #[arg(long)]
    chrome_path: Option<PathBuf>,
    /// Persistent Chrome user-data directory, so login state survives runs
    #[arg(long)]
    user_data_dir: Option<PathBuf>,
    /// Chrome profile directory name within the user-data directory
    #[arg(long, default_value = "Default")]
    profile: String,
    /// Run the browser headless (pass `--headless false` for a visible window)
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    headless: bool,
    /// Navigation timeout in milliseconds
    #[arg(short = 't', long, default_value_t = 30_000)]
    timeout: u64,
    /// Directory where verification screenshots are written
    #[arg(long, default_value = "data/screenshots")]
    artifact_dir: PathBuf,
    /// Path of the JSONL event log
    #[arg(long, default_value = "logs/app.log")]
    event_log: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Fill the application form at a job posting URL and report the result
    Fill {
        #[arg(short = 'u', long)]
        url: String,
        /// JSON file with the canonical applicant fields
        #[arg(short = 'f', long)]
        fields: PathBuf,
    },
    /// Detect which ATS vendor hosts a job posting
    Detect {
        #[arg(short = 'u', long)]
        url: String,
        /// Also fetch the page so content signatures can be checked
        #[arg(long, default_value_t = false)]
        fetch: bool,
    },
    /// Show the configured browser identity and whether its paths exist
    ProfileInfo,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    debug!("starting with {:#?}", args);

    let config = AutofillConfigBuilder::default_builder()
        .chrome_executable(args.chrome_path.clone())
        .user_data_dir(args.user_data_dir.clone())
        .profile_name(args.profile.clone())
        .headless(args.headless)
        .navigation_timeout_ms(args.timeout)
        .artifact_dir(args.artifact_dir.clone())
        .event_log(args.event_log.clone())
        .build()?;

    match args.command {
        Command::Fill { url, fields } => {
            let raw = fs::read_to_string(&fields)
                .context(format!("could not read fields file {:?}", fields))?;
            let applicant: ApplicantFields = serde_json::from_str(&raw)
                .context(format!("invalid applicant fields in {:?}", fields))?;

            let filler = FormFiller::new(config);
            let result = filler.fill_and_report(&url, applicant).await;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Detect { url, fetch } => {
            let content = if fetch {
                let body = reqwest::get(&url)
                    .await
                    .context(format!("could not fetch {}", url))?
                    .text()
                    .await
                    .context("could not read response body")?;
                Some(body)
            } else {
                None
            };
            let signature = detector::detect(&url, content.as_deref());
            println!("{}", signature.vendor);
        }
        Command::ProfileInfo => {
            let executable = match &config.chrome_executable {
                Some(path) => path.clone(),
                None => default_executable()
                    .map_err(|e| anyhow::anyhow!("no Chrome executable found: {}", e))?,
            };
            let info = json!({
                "chrome_executable": executable,
                "chrome_executable_exists": executable.exists(),
                "user_data_dir": config.user_data_dir,
                "user_data_dir_exists": config
                    .user_data_dir
                    .as_ref()
                    .map(|p| p.exists())
                    .unwrap_or(false),
                "profile_name": config.profile_name,
                "headless": config.headless,
                "navigation_timeout_ms": config.navigation_timeout_ms,
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
    }

    Ok(())
}
