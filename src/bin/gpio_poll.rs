//! Copies the level of an input pin onto an output pin once per interval.
use anyhow::{Context, Result};
use clap::Parser;
use std::{path::PathBuf, thread, time::Duration};

use dragonboard_gpio::{
    poll::{self, PollConfig},
    PinRegistry, DRAGONBOARD_410C, SYSFS_ROOT,
};

/// Mirror a DragonBoard input pin onto an output pin
#[derive(Parser)]
#[command(name = "gpio-poll")]
#[command(version)]
struct Cli {
    /// Board pin driven with the sampled level
    #[arg(long, default_value_t = 27)]
    output: u32,

    /// Board pin to sample
    #[arg(long, default_value_t = 29)]
    input: u32,

    /// Number of samples to take
    #[arg(short = 'n', long, default_value_t = 20)]
    iterations: u32,

    /// Pause between samples, in milliseconds
    #[arg(long, default_value_t = 1000)]
    interval_ms: u64,

    /// Directory of the sysfs GPIO interface
    #[arg(long, default_value = SYSFS_ROOT)]
    sysfs_root: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = PollConfig {
        output: cli.output,
        input: cli.input,
        iterations: cli.iterations,
        interval: Duration::from_millis(cli.interval_ms),
    };

    log::info!(
        "Mirroring board pin {} onto board pin {} {} times",
        config.input, config.output, config.iterations
    );

    let mut gpio = PinRegistry::with_root(DRAGONBOARD_410C, cli.sysfs_root);
    poll::run(&mut gpio, &config, thread::sleep).with_context(|| {
        format!(
            "Failed to mirror board pin {} onto board pin {}",
            config.input, config.output
        )
    })
}
