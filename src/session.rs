//! Line-oriented command interpreter for switching an LED on and off.
//!
//! All state lives in a [`Session`]: the registry that owns the exported pins
//! and the pin picked with `use`. Output goes to any [`Write`], which keeps
//! several sessions independent of each other and of stdout.
use log::error;
use std::io::{self, BufRead, Write};

use crate::error::GpioError;
use crate::gpio::{Pin, PinRegistry};

/// What the caller should do after a line has been handled.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Control {
    Continue,
    Quit,
}

/// One interactive session: the registry, the selected pin and where to print.
pub struct Session<W: Write> {
    gpio: PinRegistry,
    led: Option<Pin>,
    out: W,
}

impl<W: Write> Session<W> {
    /// Starts a session with no pin selected.
    pub fn new(gpio: PinRegistry, out: W) -> Self {
        Session {
            gpio,
            led: None,
            out,
        }
    }

    /// The registry holding the pins exported so far.
    pub fn registry(&self) -> &PinRegistry {
        &self.gpio
    }

    /// The pin selected with `use`, if any.
    pub fn current_pin(&self) -> Option<&Pin> {
        self.led.as_ref()
    }

    /// Everything written so far goes here.
    pub fn output(&self) -> &W {
        &self.out
    }

    /// Reads commands until `q` or end of input, then releases every pin.
    pub fn run<R: BufRead>(&mut self, input: R) -> io::Result<()> {
        writeln!(self.out, "Hello.\nType 'q' to quit or 'h' for help.")?;

        for line in input.lines() {
            if self.handle_line(&line?)? == Control::Quit {
                return Ok(());
            }
        }

        self.quit()?;
        Ok(())
    }

    /// Handles one line of input.
    ///
    /// GPIO failures are reported on the output and never end the session;
    /// only errors writing the output itself are returned.
    pub fn handle_line(&mut self, line: &str) -> io::Result<Control> {
        let tokens: Vec<&str> = line.split_whitespace().collect();

        match tokens.as_slice() {
            [] => writeln!(self.out, "Please enter a command first...")?,
            ["q", ..] => {
                self.quit()?;
                return Ok(Control::Quit);
            }
            ["h", ..] => self.print_help()?,
            ["use", pin, ..] => self.use_pin(pin)?,
            ["led", mode, ..] => self.led(mode)?,
            ["use"] | ["led"] => writeln!(self.out, "Missing second argument.")?,
            _ => writeln!(self.out, "Invalid command.")?,
        }

        Ok(Control::Continue)
    }

    fn quit(&mut self) -> io::Result<()> {
        writeln!(self.out, "Goodbye!")?;
        self.led = None;
        self.gpio.release_all();
        Ok(())
    }

    fn print_help(&mut self) -> io::Result<()> {
        writeln!(self.out, "Type 'use x' to use pin x.")?;
        writeln!(self.out, "Type 'led on/off' to turn the led on/off.")?;
        writeln!(self.out, "Type 'led status' to see whether the led is on.")?;
        writeln!(self.out, "Type 'q' to quit or 'h' for help.")
    }

    fn invalid_pin(&mut self) -> io::Result<()> {
        match self.gpio.table().range() {
            Some((low, high)) => {
                writeln!(self.out, "Invalid pin. Must be between {} and {}.", low, high)
            }
            None => writeln!(self.out, "Invalid pin. This board has no usable pins."),
        }
    }

    fn use_pin(&mut self, label: &str) -> io::Result<()> {
        let label: u32 = match label.parse() {
            Ok(label) => label,
            Err(_) => return self.invalid_pin(),
        };

        match self.gpio.acquire_label(label) {
            Ok(pin) => {
                writeln!(self.out, "Using pin {} (GPIO {}).", label, pin.number())?;
                self.led = Some(pin);
                Ok(())
            }
            Err(GpioError::UnknownPin { .. }) => self.invalid_pin(),
            Err(e) => self.report(e),
        }
    }

    fn led(&mut self, mode: &str) -> io::Result<()> {
        let Some(pin) = self.led.as_ref() else {
            return writeln!(self.out, "Set the pin to use first.");
        };

        let result = match mode {
            "on" => pin.set_out().and_then(|_| pin.set_high()),
            "off" => pin.set_out().and_then(|_| pin.set_low()),
            "status" => match pin.is_high() {
                Ok(on) => return writeln!(self.out, "{}", if on { "on" } else { "off" }),
                Err(e) => Err(e),
            },
            _ => return writeln!(self.out, "Invalid led mode. Must be 'on' or 'off'."),
        };

        match result {
            Ok(()) => Ok(()),
            Err(e) => self.report(e),
        }
    }

    fn report(&mut self, e: GpioError) -> io::Result<()> {
        error!("{}", e);
        writeln!(self.out, "Error: {}", e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpio_pin_data::DRAGONBOARD_410C;

    fn session() -> Session<Vec<u8>> {
        // nothing below touches the filesystem
        let gpio = PinRegistry::with_root(DRAGONBOARD_410C, "/nonexistent/gpio");
        Session::new(gpio, Vec::new())
    }

    fn output(session: &Session<Vec<u8>>) -> String {
        String::from_utf8(session.output().clone()).unwrap()
    }

    #[test]
    fn empty_line_asks_for_a_command() {
        let mut s = session();
        assert_eq!(s.handle_line("   ").unwrap(), Control::Continue);
        assert_eq!(output(&s), "Please enter a command first...\n");
    }

    #[test]
    fn led_without_pin_is_refused() {
        let mut s = session();
        s.handle_line("led on").unwrap();
        assert_eq!(output(&s), "Set the pin to use first.\n");
        assert!(s.registry().exported().is_empty());
    }

    #[test]
    fn missing_arguments_are_reported() {
        let mut s = session();
        s.handle_line("use").unwrap();
        s.handle_line("led").unwrap();
        assert_eq!(output(&s), "Missing second argument.\nMissing second argument.\n");
    }

    #[test]
    fn labels_outside_the_header_are_rejected() {
        let mut s = session();
        s.handle_line("use 22").unwrap();
        s.handle_line("use abc").unwrap();
        assert_eq!(
            output(&s),
            "Invalid pin. Must be between 23 and 34.\nInvalid pin. Must be between 23 and 34.\n"
        );
        assert!(s.current_pin().is_none());
    }

    #[test]
    fn unknown_commands_are_rejected() {
        let mut s = session();
        s.handle_line("blink 27").unwrap();
        assert_eq!(output(&s), "Invalid command.\n");
    }

    #[test]
    fn help_lists_the_commands() {
        let mut s = session();
        s.handle_line("h").unwrap();
        let out = output(&s);
        assert!(out.contains("use x"));
        assert!(out.contains("led on/off"));
        assert!(out.ends_with("Type 'q' to quit or 'h' for help.\n"));
    }

    #[test]
    fn quit_stops_the_session() {
        let mut s = session();
        assert_eq!(s.handle_line(" q ").unwrap(), Control::Quit);
        assert_eq!(output(&s), "Goodbye!\n");
    }

    #[test]
    fn export_failures_keep_the_session_alive() {
        let mut s = session();
        assert_eq!(s.handle_line("use 27").unwrap(), Control::Continue);
        assert!(output(&s).starts_with("Error: couldn't export GPIO 115"));
        assert!(s.current_pin().is_none());
    }

    #[test]
    fn sessions_are_independent() {
        let mut a = session();
        let mut b = session();
        a.handle_line("h").unwrap();
        b.handle_line("led off").unwrap();
        assert!(output(&a).contains("use x"));
        assert_eq!(output(&b), "Set the pin to use first.\n");
    }
}
