//! # Interactive Broadcast Host Daemon
//!
//! Main entry point for the host runtime, driving the built-in demo engine.

use ibhostd::{DemoEngine, HostConfig, HostMode, HostRuntime, HostRuntimeConfig};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    let config = parse_args(&args).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        print_usage(&args[0]);
        process::exit(1);
    });

    let mut runtime = HostRuntime::new(config, DemoEngine::new()).unwrap_or_else(|e| {
        eprintln!("Failed to create runtime: {}", e);
        process::exit(1);
    });

    if let Err(e) = runtime.run() {
        eprintln!("Runtime error: {}", e);
        process::exit(1);
    }
}

fn parse_args(args: &[String]) -> Result<HostRuntimeConfig, String> {
    let mut config = HostRuntimeConfig::default();
    let mut root: Option<PathBuf> = None;
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --config".to_string());
                }
                config.host = HostConfig::load(Path::new(&args[i])).map_err(|e| e.to_string())?;
            }
            "--root" | "-r" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --root".to_string());
                }
                root = Some(PathBuf::from(&args[i]));
            }
            "--mode" | "-m" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --mode".to_string());
                }
                config.mode = match args[i].as_str() {
                    "sim" => HostMode::Sim,
                    "live" => HostMode::Live,
                    other => return Err(format!("Invalid mode: {}", other)),
                };
            }
            "--script" | "-s" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --script".to_string());
                }
                let script_text = fs::read_to_string(&args[i])
                    .map_err(|e| format!("Failed to read script file: {}", e))?;
                config.script = Some(script_text);
            }
            "--max-steps" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --max-steps".to_string());
                }
                config.max_steps = args[i]
                    .parse()
                    .map_err(|_| format!("Invalid max-steps value: {}", args[i]))?;
            }
            "--help" | "-h" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            other => {
                return Err(format!("Unknown option: {}", other));
            }
        }
        i += 1;
    }

    // Applied last so it wins over the config file regardless of order
    if let Some(root) = root {
        config.host.content_root = root;
    }

    Ok(config)
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} [OPTIONS]", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --config <FILE>      JSON host configuration");
    eprintln!("  -r, --root <DIR>         Carousel content root (overrides config)");
    eprintln!("  -m, --mode <MODE>        Host mode: sim (default) or live");
    eprintln!("  -s, --script <FILE>      Input script file (for sim mode)");
    eprintln!("  --max-steps <N>          Maximum pump ticks to run (0 = unlimited)");
    eprintln!("  -h, --help               Show this help message");
    eprintln!();
    eprintln!("Set RUST_LOG=debug for per-tick logging.");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} --root ./carousel --script demos/menu.ibkeys", program);
    eprintln!("  {} --mode live --config host.json", program);
}
