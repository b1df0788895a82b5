//! Mirrors an input pin onto an output pin for a fixed number of iterations.
use log::info;
use std::time::Duration;

use crate::error::Result;
use crate::gpio::PinRegistry;

#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Board label of the pin that follows the input.
    pub output: u32,
    /// Board label of the pin being sampled.
    pub input: u32,
    pub iterations: u32,
    /// Pause after each iteration.
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        PollConfig {
            output: 27,
            input: 29,
            iterations: 20,
            interval: Duration::from_secs(1),
        }
    }
}

/// Runs the demo, calling `sleep` with the configured interval between samples.
///
/// Both pins are released before returning, whether or not the loop failed.
pub fn run<F>(gpio: &mut PinRegistry, config: &PollConfig, sleep: F) -> Result<()>
where
    F: FnMut(Duration),
{
    let result = mirror(gpio, config, sleep);
    gpio.release_all();
    result
}

fn mirror<F>(gpio: &mut PinRegistry, config: &PollConfig, mut sleep: F) -> Result<()>
where
    F: FnMut(Duration),
{
    let output = gpio.acquire_label(config.output)?;
    let input = gpio.acquire_label(config.input)?;

    output.set_out()?;
    input.set_in()?;

    for _ in 0..config.iterations {
        let level = input.value()?;
        info!("Pin value: {}", level);
        output.set_value(level)?;
        sleep(config.interval);
    }

    Ok(())
}
