use anyhow::{Context, Result};
use clap::builder::NonEmptyStringValueParser;
use clap::{Parser, ValueEnum};
use octovars::config::{Config, ConnectionOverrides};
use octovars::octopus::OctopusClient;
use octovars::output::{self, OutputFormat, OutputMode};
use octovars::GetVariableSet;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Get Octopus variable sets by project or library set name.
///
/// With no names, every project and library variable set is returned. A single
/// name may contain wildcards (*, ?, [a-z]); several names must all be exact.
#[derive(Parser, Debug)]
#[command(name = "octovars", version, about, long_about = None)]
struct Args {
    /// Project name(s) whose variable sets to get
    #[arg(
        short = 'p',
        long,
        value_name = "NAME",
        num_args = 1..,
        value_parser = NonEmptyStringValueParser::new()
    )]
    project_name: Option<Vec<String>>,

    /// Library variable set name(s) whose variable sets to get
    #[arg(
        short = 'l',
        long,
        value_name = "NAME",
        num_args = 1..,
        value_parser = NonEmptyStringValueParser::new()
    )]
    library_set_name: Option<Vec<String>>,

    /// List the projects using each library variable set (friendly output only)
    #[arg(long)]
    include_library_set_usage: bool,

    /// Return the server's resources unchanged
    #[arg(long, conflicts_with = "friendly")]
    resource_only: bool,

    /// Return converted, human friendly variable sets
    #[arg(long)]
    friendly: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Octopus server URL (overrides OctopusURL and the config file)
    #[arg(long)]
    server: Option<String>,

    /// Octopus API key (overrides OctopusAPIKey and the config file)
    #[arg(long)]
    api_key: Option<String>,

    /// Octopus space id, e.g. Spaces-1
    #[arg(long)]
    space: Option<String>,

    /// Store the effective server, API key and space in the config file
    #[arg(long)]
    save_connection: bool,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();
    let file = open_log_file(&log_path)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("octovars {} started with log level: {:?}", octovars::VERSION, level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

/// Open the log file for appending, warning on stderr when that is not possible
fn open_log_file(log_path: &Path) -> Option<File> {
    if let Some(parent) = log_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("Warning: cannot create log directory {:?}: {}", parent, e);
        }
    }

    match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
    {
        Ok(file) => Some(file),
        Err(e) => {
            eprintln!("Warning: cannot open log file {:?}: {}", log_path, e);
            None
        }
    }
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("octovars").join("octovars.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".octovars").join("octovars.log");
    }
    PathBuf::from("octovars.log")
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{:#}", err);
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let mut config = Config::load();

    let overrides = ConnectionOverrides {
        server_url: args.server.clone(),
        api_key: args.api_key.clone(),
        space_id: args.space.clone(),
    };
    let settings = config.connection(&overrides)?;

    tracing::info!(
        "Using server: {}, space: {}",
        settings.server_url,
        settings.space_id.as_deref().unwrap_or("default")
    );

    let client = OctopusClient::new(
        &settings.server_url,
        &settings.api_key,
        settings.space_id.as_deref(),
    )?;

    if args.save_connection {
        config.remember(&settings);
        config.save().context("Failed to save connection settings")?;
    }

    let command = GetVariableSet {
        project_name: args.project_name,
        library_set_name: args.library_set_name,
        include_library_set_usage: args.include_library_set_usage,
        output_mode: OutputMode::effective(args.friendly, args.resource_only, config.resource_only),
    };

    let result = command.run(&client).await?;
    let text = output::render(&result, args.format)?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", text).context("Failed to write output")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use octovars::selection::matcher::{classify, MatchStrategy};
    use octovars::selection::Selection;

    #[test]
    fn test_args_accept_several_names() {
        let args = Args::try_parse_from([
            "octovars",
            "--project-name",
            "Website_Stardust",
            "Website_Diamond",
        ])
        .unwrap();
        assert_eq!(
            args.project_name,
            Some(vec!["Website_Stardust".to_string(), "Website_Diamond".to_string()])
        );
        assert_eq!(args.library_set_name, None);

        let args =
            Args::try_parse_from(["octovars", "-l", "Stands_SC", "-l", "Stands_DII"]).unwrap();
        assert_eq!(
            args.library_set_name,
            Some(vec!["Stands_SC".to_string(), "Stands_DII".to_string()])
        );
    }

    #[test]
    fn test_args_keep_commas_inside_a_name() {
        let args =
            Args::try_parse_from(["octovars", "--library-set-name", "stands_[a,b]*"]).unwrap();
        assert_eq!(args.library_set_name, Some(vec!["stands_[a,b]*".to_string()]));

        let selection = Selection::new(args.project_name, args.library_set_name);
        let filter = selection.library_sets.as_ref().unwrap();
        assert!(matches!(classify(filter).unwrap(), MatchStrategy::Wildcard(_)));
    }

    #[test]
    fn test_open_log_file_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("octovars.log");
        assert!(open_log_file(&path).is_some());
        assert!(path.exists());
    }

    #[test]
    fn test_open_log_file_reports_unusable_directory() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();

        assert!(open_log_file(&blocker.join("octovars.log")).is_none());
    }

    #[test]
    fn test_args_reject_empty_name() {
        assert!(Args::try_parse_from(["octovars", "--library-set-name", ""]).is_err());
    }

    #[test]
    fn test_args_friendly_conflicts_with_resource_only() {
        assert!(Args::try_parse_from(["octovars", "--friendly", "--resource-only"]).is_err());
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["octovars"]).unwrap();
        assert_eq!(args.format, OutputFormat::Json);
        assert!(!args.include_library_set_usage);
        assert!(matches!(args.log_level, LogLevel::Off));
    }
}
