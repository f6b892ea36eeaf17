//! CLI tool for Net Pulse (netpulse)

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "netpulse")]
#[command(
    about = "Net Pulse: per-interface network throughput and proxy status",
    long_about = None
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Sampling interval in seconds (overrides the config file)
    #[arg(short, long, global = true)]
    interval: Option<f64>,

    /// Output format (json or text)
    #[arg(short, long, default_value = "text", global = true)]
    format: String,

    /// Number of reports to print (0 = run until interrupted)
    #[arg(short = 'n', long, default_value = "0")]
    count: u64,

    /// Configuration file (default: ~/.config/netpulse/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Poll throughput and proxy status (default)
    Watch,
    /// Run proxy detection once and exit
    Proxy,
    /// Print the effective configuration
    Config,
}

#[cfg(feature = "cli")]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use netpulse::{Config, NetPulse, ProxyDetector};

    let cli = Cli::parse();

    env_logger::init();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(secs) = cli.interval {
        config.sampling.interval_ms = (secs.max(0.05) * 1000.0) as u64;
    }

    match &cli.command {
        Some(Commands::Proxy) => {
            let status = ProxyDetector::with_config(config.proxy.clone()).detect();
            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                println!("Proxy: {}", status);
            }
        }
        Some(Commands::Config) => {
            println!("{}", toml::to_string_pretty(&config)?);
        }
        Some(Commands::Watch) | None => {
            let mut pulse = NetPulse::with_config(&config);
            watch(&mut pulse, &cli)?;
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn watch(pulse: &mut netpulse::NetPulse, cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let interval = pulse.interval().max(Duration::from_millis(50));

    // Baseline tick; its failure just means the next tick is the warm-up
    if let Err(e) = pulse.snapshot(Instant::now()) {
        log::warn!("baseline sample failed: {}", e);
    }

    let mut printed = 0u64;
    while cli.count == 0 || printed < cli.count {
        std::thread::sleep(interval);
        match pulse.snapshot(Instant::now()) {
            Ok(snapshot) => {
                if cli.format == "json" {
                    println!("{}", serde_json::to_string(&snapshot)?);
                } else {
                    print_snapshot(&snapshot);
                }
            }
            Err(e) => eprintln!("metrics unavailable: {}", e),
        }
        printed += 1;
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn print_snapshot(snapshot: &netpulse::StatusSnapshot) {
    println!("=== {} ===", chrono::Local::now().format("%H:%M:%S"));
    if snapshot.networks.is_empty() {
        println!("  (no active interfaces)");
    }
    for iface in &snapshot.networks {
        println!(
            "  {:<10} ↓{:>8.2} MB/s  ↑{:>8.2} MB/s  {}",
            iface.name,
            iface.rx_rate_mbps,
            iface.tx_rate_mbps,
            iface.ip.as_deref().unwrap_or("-")
        );
    }
    println!("  Proxy: {}", snapshot.proxy);
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI features not enabled. Please compile with --features cli");
    std::process::exit(1);
}
