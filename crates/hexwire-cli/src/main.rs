use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use glob::glob;
use tracing_subscriber::EnvFilter;

use hexwire_core::{ProtocolCounters, SessionSummary};

#[derive(Parser, Debug)]
#[command(name = "hexwire")]
#[command(version)]
#[command(long_version = concat!(
    env!("CARGO_PKG_VERSION"),
    " (", env!("HEXWIRE_BUILD_COMMIT"), " ", env!("HEXWIRE_BUILD_DATE"), ")"
))]
#[command(
    about = "Raw frame sniffer: dissects Ethernet/IPv4/ICMP/TCP/UDP into hex-dump logs.",
    long_about = None,
    after_help = "Examples:\n  hexwire pcap dissect capture.pcap -o frames.log\n  hexwire pcap dissect capture.pcapng --stdout\n  hexwire live --interface eth0 -o frames.log"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Operations on PCAP/PCAPNG inputs (offline).
    Pcap {
        #[command(subcommand)]
        command: PcapCommands,
    },
    /// Live capture from a raw socket (Linux only; requires CAP_NET_RAW).
    Live {
        /// Interface to capture on; all interfaces when omitted
        #[arg(short = 'i', long)]
        interface: Option<String>,

        /// Output log path
        #[arg(short = 'o', long, required_unless_present = "stdout")]
        log: Option<PathBuf>,

        /// Write reports to stdout instead of a log file
        #[arg(long, conflicts_with = "log")]
        stdout: bool,

        /// Write a JSON session summary to this path on exit
        #[arg(long)]
        summary: Option<PathBuf>,

        /// Suppress the status line and non-error output
        #[arg(long)]
        quiet: bool,
    },
}

#[derive(Subcommand, Debug)]
enum PcapCommands {
    /// Dissect a capture file into a hex-dump log.
    #[command(
        after_help = "Examples:\n  hexwire pcap dissect capture.pcap -o frames.log\n  hexwire pcap dissect 'captures/*.pcapng' --stdout"
    )]
    Dissect {
        /// Path to a .pcap or .pcapng file (glob patterns allowed)
        input: PathBuf,

        /// Output log path
        #[arg(short = 'o', long, required_unless_present = "stdout")]
        log: Option<PathBuf>,

        /// Write reports to stdout instead of a log file
        #[arg(long, conflicts_with = "log")]
        stdout: bool,

        /// Write a JSON session summary to this path
        #[arg(long)]
        summary: Option<PathBuf>,

        /// Suppress the status line and non-error output
        #[arg(long)]
        quiet: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Pcap { command } => match command {
            PcapCommands::Dissect {
                input,
                log,
                stdout,
                summary,
                quiet,
            } => cmd_pcap_dissect(input, log, stdout, summary, quiet),
        },
        Commands::Live {
            interface,
            log,
            stdout,
            summary,
            quiet,
        } => cmd_live(interface, log, stdout, summary, quiet),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(err.to_string(), None)
    }
}

fn cmd_pcap_dissect(
    input: PathBuf,
    log: Option<PathBuf>,
    stdout: bool,
    summary: Option<PathBuf>,
    quiet: bool,
) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&input)?;
    validate_input_file(&resolved_input)?;

    let source = hexwire_core::PcapFileSource::open(&resolved_input)
        .map_err(|err| CliError::new(format!("failed to open capture: {err}"), None))?;

    run_to_sink(source, log, stdout, summary, quiet)
}

#[cfg(target_os = "linux")]
fn cmd_live(
    interface: Option<String>,
    log: Option<PathBuf>,
    stdout: bool,
    summary: Option<PathBuf>,
    quiet: bool,
) -> Result<(), CliError> {
    let source = hexwire_core::RawSocketSource::open(interface.as_deref()).map_err(|err| {
        CliError::new(
            format!("failed to open raw socket: {err}"),
            Some("live capture needs CAP_NET_RAW (try sudo)".to_string()),
        )
    })?;

    if !quiet {
        eprintln!("capturing... press Ctrl-C to stop");
    }
    run_to_sink(source, log, stdout, summary, quiet)
}

#[cfg(not(target_os = "linux"))]
fn cmd_live(
    _interface: Option<String>,
    _log: Option<PathBuf>,
    _stdout: bool,
    _summary: Option<PathBuf>,
    _quiet: bool,
) -> Result<(), CliError> {
    Err(CliError::new(
        "live capture is only supported on Linux",
        Some("use `hexwire pcap dissect` on a capture file instead".to_string()),
    ))
}

fn run_to_sink<S: hexwire_core::PacketSource>(
    source: S,
    log: Option<PathBuf>,
    stdout: bool,
    summary: Option<PathBuf>,
    quiet: bool,
) -> Result<(), CliError> {
    let status = |counters: &ProtocolCounters| {
        if !quiet {
            eprint!("\rPackets Stat: {counters}");
            let _ = io::stderr().flush();
        }
    };

    let session_summary = if stdout {
        let mut sink = io::stdout().lock();
        let session_summary = run_session_mapped(source, &mut sink, status)?;
        if !quiet {
            eprintln!();
        }
        session_summary
    } else {
        let log = log.expect("log path required when not using stdout");
        if let Some(parent) = log.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create output directory: {}", parent.display())
                })?;
            }
        }
        let file = fs::File::create(&log)
            .with_context(|| format!("Failed to create log file: {}", log.display()))?;
        let mut sink = io::BufWriter::new(file);
        let session_summary = run_session_mapped(source, &mut sink, status)?;
        if !quiet {
            eprintln!();
            eprintln!("OK: log written -> {}", log.display());
        }
        session_summary
    };

    if let Some(summary_path) = summary {
        write_summary(&summary_path, &session_summary)?;
        if !quiet {
            eprintln!("OK: summary written -> {}", summary_path.display());
        }
    }
    Ok(())
}

fn run_session_mapped<S, W, F>(
    source: S,
    sink: &mut W,
    on_frame: F,
) -> Result<SessionSummary, CliError>
where
    S: hexwire_core::PacketSource,
    W: Write,
    F: FnMut(&ProtocolCounters),
{
    hexwire_core::run_session(source, sink, on_frame)
        .map_err(|err| CliError::new(format!("dissection failed: {err}"), None))
}

fn write_summary(path: &PathBuf, summary: &SessionSummary) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(summary)
        .context("JSON serialization failed")
        .map_err(CliError::from)?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write summary: {}", path.display()))?;
    Ok(())
}

fn validate_input_file(input: &PathBuf) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("use a .pcap or .pcapng file".to_string()),
        ));
    }
    let meta = fs::metadata(input)
        .with_context(|| format!("Failed to read input file: {}", input.display()))?;
    if !meta.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("use a .pcap or .pcapng file".to_string()),
        ));
    }
    let ext = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "pcap" && ext != "pcapng" {
        return Err(CliError::new(
            format!("unsupported input format '{}'", input.display()),
            Some("expected a .pcap or .pcapng file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &PathBuf) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.clone());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern; expected .pcap or .pcapng".to_string()),
        ));
    }
    if matches.len() > 1 {
        let hint = "pass a single capture file, or run once per file".to_string();
        let mut message = format!(
            "multiple files match pattern '{}' ({} matches)",
            pattern,
            matches.len()
        );
        let listed = matches.iter().take(3).collect::<Vec<_>>();
        if !listed.is_empty() {
            let mut details = String::new();
            details.push_str("; matches: ");
            details.push_str(
                &listed
                    .into_iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            );
            if matches.len() > 3 {
                details.push_str(", ...");
            }
            message.push_str(&details);
        }
        return Err(CliError::new(message, Some(hint)));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
