use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};

use foodrec::food::{NO_RECOMMENDATIONS_PLACEHOLDER, NO_RESTRICTIONS_PLACEHOLDER};
use foodrec::render::{self, OutputFormat};
use foodrec::view::{FollowUpView, HistoryView, TimelineView};
use foodrec::{
    ApiClient, ClientConfig, DiseaseType, Error, FollowUpRequest, RawSource,
    RecommendationRequest, RecommendationView, Session, ViewOptions,
};

/// Get dietary recommendations from the food recommendation API and render
/// them as clean HTML, Markdown or text.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Base URL of the API (overrides FOODREC_API_URL).
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    /// Request timeout in seconds (overrides FOODREC_TIMEOUT_SECS).
    #[arg(
        long,
        global = true,
        value_name = "SECS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout: Option<u64>,

    /// Output format.
    #[arg(short, long, global = true, value_enum, default_value_t = Format::Markdown)]
    format: Format,

    /// Payload field shown as the raw response section.
    #[arg(long, global = true, value_enum, default_value_t = RawSourceArg::Recommendations)]
    raw_source: RawSourceArg,

    /// Write output to a file instead of stdout.
    #[arg(short, long, global = true, value_name = "PATH")]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Normalize a notes blob read from a file or stdin.
    Notes {
        /// Input file. Omit to read from stdin.
        file: Option<PathBuf>,
    },
    /// Render a recommendation payload (JSON) read from a file or stdin.
    Render {
        /// Input file. Omit to read from stdin.
        file: Option<PathBuf>,
    },
    /// Ask the API for a recommendation and render it.
    Recommend {
        /// Disease or condition name.
        #[arg(short, long)]
        disease: String,

        #[arg(long = "type", value_enum, default_value_t = DiseaseTypeArg::Chronic)]
        disease_type: DiseaseTypeArg,

        /// Severity from 1 (mild) to 10 (severe).
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=10))]
        severity: Option<u8>,

        /// Preferred AI provider.
        #[arg(long)]
        provider: Option<String>,

        /// Use the detailed endpoint.
        #[arg(long)]
        detailed: bool,
    },
    /// Report a follow-up on a case.
    Feedback {
        /// Case id. Defaults to the most recent case in the history.
        #[arg(long)]
        case: Option<u64>,

        /// How the patient feels now, e.g. "Feeling better".
        #[arg(long)]
        condition: String,

        #[arg(long, default_value = "")]
        notes: String,
    },
    /// List past recommendations.
    History {
        #[arg(long, default_value_t = 0)]
        page: u32,

        #[arg(long, default_value_t = 10)]
        size: u32,
    },
    /// Render a stored recommendation again.
    Show { id: u64 },
    /// List the cases of the logged-in user.
    Cases,
    /// Show the follow-up timeline of a case.
    Timeline { id: u64 },
    /// Delete a past recommendation.
    Delete { id: u64 },
    /// Check that the API is reachable.
    Health,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Html,
    Markdown,
    Text,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Html => OutputFormat::Html,
            Format::Markdown => OutputFormat::Markdown,
            Format::Text => OutputFormat::Text,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum RawSourceArg {
    Notes,
    Recommendations,
    None,
}

impl From<RawSourceArg> for RawSource {
    fn from(source: RawSourceArg) -> Self {
        match source {
            RawSourceArg::Notes => RawSource::AdditionalNotes,
            RawSourceArg::Recommendations => RawSource::Recommendations,
            RawSourceArg::None => RawSource::None,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum DiseaseTypeArg {
    Chronic,
    Acute,
}

impl From<DiseaseTypeArg> for DiseaseType {
    fn from(kind: DiseaseTypeArg) -> Self {
        match kind {
            DiseaseTypeArg::Chronic => DiseaseType::Chronic,
            DiseaseTypeArg::Acute => DiseaseType::Acute,
        }
    }
}

fn build_config(cli: &Cli) -> Result<ClientConfig, Error> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = &cli.api_url {
        config = config.with_base_url(url);
    }
    if let Some(secs) = cli.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    Ok(config)
}

fn view_options(cli: &Cli) -> ViewOptions {
    ViewOptions {
        raw_source: cli.raw_source.into(),
        eat_placeholder: NO_RECOMMENDATIONS_PLACEHOLDER.to_string(),
        avoid_placeholder: NO_RESTRICTIONS_PLACEHOLDER.to_string(),
    }
}

fn read_input(file: Option<&Path>) -> Result<String, Error> {
    match file {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

fn execute(cli: &Cli) -> Result<String, Error> {
    let format: OutputFormat = cli.format.into();

    match &cli.command {
        Command::Notes { file } => {
            let text = read_input(file.as_deref())?;
            let blocks = foodrec::normalize_notes(Some(&text));
            Ok(render::render_blocks(&blocks, format))
        }
        Command::Render { file } => {
            let json = read_input(file.as_deref())?;
            foodrec::render_payload(&json, &view_options(cli), format)
        }
        Command::Recommend {
            disease,
            disease_type,
            severity,
            provider,
            detailed,
        } => {
            let client = ApiClient::new(build_config(cli)?);
            let mut request =
                RecommendationRequest::new(disease.as_str()).with_disease_type((*disease_type).into());
            if let Some(level) = severity {
                request = request.with_severity(*level);
            }
            if let Some(provider) = provider {
                request = request.with_ai_provider(provider.as_str());
            }
            let payload = if *detailed {
                client.recommend_detailed(&request)?
            } else {
                client.recommend(&request)?
            };
            let view = RecommendationView::from_payload(&payload, &view_options(cli));
            Ok(render::render_view(&view, format))
        }
        Command::Feedback {
            case,
            condition,
            notes,
        } => {
            let client = ApiClient::new(build_config(cli)?);
            let session = match case {
                Some(id) => Session::for_case(*id),
                None => client.latest_session()?,
            };
            let request = FollowUpRequest::new(condition.as_str(), notes.as_str());
            let analysis = client.submit_feedback(&session, &request)?;
            Ok(render::render_follow_up(
                &FollowUpView::from_analysis(&analysis),
                format,
            ))
        }
        Command::History { page, size } => {
            let client = ApiClient::new(build_config(cli)?);
            let history = client.history(*page, *size)?;
            Ok(render::render_history(&HistoryView::from_page(&history), format))
        }
        Command::Show { id } => {
            let client = ApiClient::new(build_config(cli)?);
            let record = client.history_entry(*id)?;
            let view = RecommendationView::from_payload(&record.to_payload(), &view_options(cli));
            Ok(render::render_view(&view, format))
        }
        Command::Cases => {
            let client = ApiClient::new(build_config(cli)?);
            let cases = client.cases()?;
            Ok(render::render_history(&HistoryView::from_cases(&cases), format))
        }
        Command::Timeline { id } => {
            let client = ApiClient::new(build_config(cli)?);
            let entries = client.timeline(*id)?;
            Ok(render::render_timeline(
                &TimelineView::from_entries(&entries),
                format,
            ))
        }
        Command::Delete { id } => {
            let client = ApiClient::new(build_config(cli)?);
            let message = client.delete_history_entry(*id)?;
            Ok(format!("{message}\n"))
        }
        Command::Health => {
            let client = ApiClient::new(build_config(cli)?);
            let health = client.health()?;
            Ok(match health.message {
                Some(message) => format!("API status: {} ({message})\n", health.status),
                None => format!("API status: {}\n", health.status),
            })
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, ExitCode> {
    let output_buf = execute(&cli).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(1)
    })?;

    if let Some(ref out_path) = cli.output {
        std::fs::write(out_path, &output_buf).map_err(|e| {
            eprintln!("error: {}: {e}", out_path.display());
            ExitCode::from(1)
        })?;
    } else {
        io::stdout().write_all(output_buf.as_bytes()).map_err(|e| {
            eprintln!("error: stdout: {e}");
            ExitCode::from(1)
        })?;
    }

    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .try_init()
        .ok();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(code) => code,
    }
}
