use clap::Parser;
use crossbeam::channel;
use crossbeam::select;
use log::info;
use serial_logger_rust::config::{
    Config, DEFAULT_BAUDRATE, DEFAULT_HISTORY_CAPACITY, DEFAULT_POLL_INTERVAL_MS,
};
use serial_logger_rust::source::open_serial;
use serial_logger_rust::StreamSession;
use std::error::Error;
use std::io::BufRead;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

/// Capture a two-channel integer stream from a serial port into a live
/// history and an append-only log file.
#[derive(Parser)]
#[command(name = "serial_logger")]
struct Cli {
    /// Serial device path, e.g. /dev/ttyUSB0
    #[arg(long)]
    port: PathBuf,

    #[arg(long, default_value_t = DEFAULT_BAUDRATE)]
    baudrate: u32,

    /// Number of recent records kept for the live view
    #[arg(long, default_value_t = DEFAULT_HISTORY_CAPACITY)]
    capacity: usize,

    /// Live view poll interval in milliseconds
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL_MS)]
    poll_interval_ms: u64,

    /// Persist records to this exact file
    #[arg(long, conflicts_with = "output_dir")]
    output: Option<PathBuf>,

    /// Persist records to <dir>/<YYYY-MM-DD>/<HH-MM-SS>.txt
    #[arg(long)]
    output_dir: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn into_config(self) -> Config {
        let persist_path = match (self.output, self.output_dir) {
            (Some(path), _) => Some(path),
            (None, Some(dir)) => {
                let now = chrono::Local::now();
                Some(
                    dir.join(now.format("%Y-%m-%d").to_string())
                        .join(format!("{}.txt", now.format("%H-%M-%S"))),
                )
            }
            (None, None) => None,
        };

        Config {
            port: self.port,
            baudrate: self.baudrate,
            history_capacity: self.capacity,
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            persist_path,
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    let config = cli.into_config();

    // Startup failures (bad port, unwritable persist path) abort here with a
    // non-zero exit before any capture begins.
    let source = open_serial(&config.port, config.baudrate)?;
    let mut session = StreamSession::new(config.history_capacity, config.persist_path.clone());
    session.start(source)?;

    if let Some(path) = &config.persist_path {
        info!("persisting records to {}", path.display());
    }
    println!("Capturing from {}. Press Enter to stop.", config.port.display());

    let (stop_sender, stop_receiver) = channel::bounded::<()>(1);
    thread::spawn(move || {
        let mut line = String::new();
        let _ = std::io::stdin().lock().read_line(&mut line);
        let _ = stop_sender.send(());
    });

    let ticker = channel::tick(config.poll_interval);
    loop {
        select! {
            recv(ticker) -> _ => {
                let snap = session.snapshot();
                if let (Some(t), Some(a), Some(b)) = (
                    snap.timestamps.last(),
                    snap.channel_a.last(),
                    snap.channel_b.last(),
                ) {
                    println!("t={t:.2}s  a={a}  b={b}  ({} in view)", snap.len());
                }
            }
            recv(stop_receiver) -> _ => break,
        }
    }

    session.request_stop()?;
    info!("session stopped, {} records in final view", session.snapshot().len());
    Ok(())
}
