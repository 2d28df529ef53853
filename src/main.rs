// src/main.rs
use std::fs::File;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{error, warn};
use linescope::drivers::{channel_color, LogSink, ReadSource};
use linescope::{
    frame_queue, ByteSource, ReaderOptions, ScopeConfig, StreamReader, TelemetryPipeline,
};

#[derive(Parser, Debug)]
#[command(name = "linescope", version, about = "Live view of a P,x,y[,D,...] telemetry stream")]
struct Cli {
    /// Serial port to read, e.g. /dev/ttyUSB0 or COM4
    #[arg(long, conflicts_with = "replay", required_unless_present = "replay")]
    port: Option<String>,
    #[arg(long, default_value_t = 115_200)]
    baud: u32,
    /// Replay a captured stream from a file instead of a port
    #[arg(long)]
    replay: Option<PathBuf>,
    /// JSON config file
    #[arg(long, env = "LINESCOPE_CONFIG")]
    config: Option<PathBuf>,
    /// Channel ids to include in the window summary
    #[arg(long = "select", value_delimiter = ',')]
    select: Vec<usize>,
    /// Line to send to the device after connecting (repeatable)
    #[arg(long = "send")]
    send: Vec<String>,
    /// Stop after this many seconds
    #[arg(long)]
    duration: Option<f64>,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let config = match &cli.config {
        Some(path) => ScopeConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ScopeConfig::default(),
    };

    if let Some(path) = &cli.replay {
        run(ReadSource::new(open_replay(path)?), &cli, &config)
    } else {
        let name = cli.port.as_deref().context("no port given")?;
        let port = serialport::new(name, cli.baud)
            .timeout(config.read_timeout())
            .open()
            .with_context(|| format!("opening serial port {name} @ {}", cli.baud))?;
        run(port, &cli, &config)
    }
}

/// Replay reads are unbounded, so only regular files are accepted.
fn open_replay(path: &Path) -> Result<File> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let meta = file
        .metadata()
        .with_context(|| format!("reading metadata of {}", path.display()))?;
    if !meta.is_file() {
        bail!("{} is not a regular file; replay needs a capture file", path.display());
    }
    Ok(file)
}

fn run<S: ByteSource + 'static>(source: S, cli: &Cli, config: &ScopeConfig) -> Result<()> {
    let (tx, rx) = frame_queue();
    let options = ReaderOptions {
        echo_structured: config.echo_structured,
    };
    let handle = StreamReader::new(source, tx, options).start()?;
    for line in &cli.send {
        if !handle.send_line(line.as_str()) {
            warn!("reader already gone, not sent: {line}");
        }
    }

    let mut pipeline = TelemetryPipeline::new(rx, config)?;
    for &id in &cli.select {
        pipeline.view_mut().select(id);
    }
    let mut sink = LogSink;
    let started = Instant::now();
    let mut last_summary = Instant::now();
    loop {
        thread::sleep(config.tick_interval());
        let report = pipeline.tick(unix_seconds(), &mut sink);
        if last_summary.elapsed() >= Duration::from_secs(1) {
            print_summary(&pipeline);
            last_summary = Instant::now();
        }
        if report.source_closed {
            break;
        }
        if let Some(limit) = cli.duration {
            if started.elapsed().as_secs_f64() >= limit {
                break;
            }
        }
    }
    print_summary(&pipeline);

    if let Err(err) = handle.shutdown(config.join_timeout()) {
        error!("reader did not shut down cleanly: {err}");
        return Err(err).context("stopping reader thread");
    }
    Ok(())
}

fn print_summary(pipeline: &TelemetryPipeline) {
    let store = pipeline.store();
    let window = pipeline.window();
    println!(
        "📈 {} samples buffered, window {:.2}s ({} rows)",
        store.len(),
        window.span_seconds(),
        window.timestamps.len()
    );
    for (id, values) in &window.series {
        let Some(channel) = store.channel(*id) else {
            println!("   #{id}: no data yet");
            continue;
        };
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        let range = match value_range(&finite) {
            Some((min, max)) => format!(" min={min:.3} max={max:.3}"),
            None => String::new(),
        };
        println!(
            "   {} [{}] x{}: last={:?}{range}",
            channel.label,
            channel_color(*id).hex(),
            channel.scale,
            finite.last(),
        );
    }
}

fn value_range(values: &[f64]) -> Option<(f64, f64)> {
    let (&first, rest) = values.split_first()?;
    Some(
        rest.iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
    )
}

fn unix_seconds() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_needs_at_least_one_value() {
        assert_eq!(value_range(&[]), None);
        assert_eq!(value_range(&[2.0]), Some((2.0, 2.0)));
        assert_eq!(value_range(&[3.0, -1.0, 7.5]), Some((-1.0, 7.5)));
    }

    #[test]
    fn replay_rejects_non_regular_files() {
        let dir = tempfile::tempdir().unwrap();
        assert!(open_replay(dir.path()).is_err());
        let capture = dir.path().join("capture.txt");
        std::fs::write(&capture, "P,1,2\n").unwrap();
        assert!(open_replay(&capture).is_ok());
    }
}
