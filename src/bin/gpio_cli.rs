//! Interactive CLI to turn an LED on the DragonBoard on and off.
//!
//! Reads commands from standard input:
//!
//! * `use <pin>` - pick the board pin the LED is wired to
//! * `led on|off|status` - drive or query that pin
//! * `h` - help
//! * `q` - release every pin and quit
use anyhow::{Context, Result};
use std::io;

use dragonboard_gpio::{session::Session, PinRegistry, DRAGONBOARD_410C};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let gpio = PinRegistry::new(DRAGONBOARD_410C);
    let mut session = Session::new(gpio, io::stdout());

    session
        .run(io::stdin().lock())
        .context("Failed to talk to the terminal")
}
