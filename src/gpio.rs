use log::{debug, info, warn};
use std::{
    fmt, fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use crate::error::{GpioError, Result};
use crate::gpio_pin_data::PinTable;

/// Where the kernel exposes the sysfs GPIO interface.
pub static SYSFS_ROOT: &str = "/sys/class/gpio";

/// A GPIO number as the kernel knows it.
///
/// This is the number used in sysfs paths (`gpio<N>`) and written to the
/// `export`/`unexport` files, not the label printed on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KernelNumber(u32);

impl KernelNumber {
    pub fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for KernelNumber {
    fn from(number: u32) -> Self {
        KernelNumber(number)
    }
}

impl fmt::Display for KernelNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Specifies the GPIO pin value.
///
/// * `Low` - 0
/// * `High` - 1
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Level {
    Low,
    High,
}

impl Level {
    /// The literal the kernel reads and writes in the `value` attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Low => "0",
            Level::High => "1",
        }
    }

    /// Parses a `value` token, `None` if it is neither `0` nor `1`.
    pub fn from_token(token: &str) -> Option<Level> {
        match token {
            "0" => Some(Level::Low),
            "1" => Some(Level::High),
            _ => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Specifies the GPIO pin direction.
///
/// * `In` - Input
/// * `Out` - Output
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Direction {
    In,
    Out,
}

impl Direction {
    /// The literal the kernel reads and writes in the `direction` attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::In => "in",
            Direction::Out => "out",
        }
    }

    /// Parses a `direction` token, `None` if it is neither `in` nor `out`.
    pub fn from_token(token: &str) -> Option<Direction> {
        match token {
            "in" => Some(Direction::In),
            "out" => Some(Direction::Out),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// sysfs attributes must already exist, so never create them
fn write_attribute(path: &Path, payload: &str) -> io::Result<()> {
    let mut file = fs::OpenOptions::new().write(true).truncate(true).open(path)?;
    file.write_all(payload.as_bytes())
}

/// Requests and releases GPIOs from the kernel.
///
/// [`SysfsControl`] writes the `export` and `unexport` files; other
/// implementations let a [`PinRegistry`] run without a kernel behind it.
pub trait ExportControl: fmt::Debug + Send {
    fn export(&mut self, number: KernelNumber) -> io::Result<()>;
    fn unexport(&mut self, number: KernelNumber) -> io::Result<()>;
}

/// The `export` and `unexport` files of a sysfs GPIO directory.
#[derive(Debug, Clone)]
pub struct SysfsControl {
    root: PathBuf,
}

impl SysfsControl {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        SysfsControl { root: root.into() }
    }
}

impl ExportControl for SysfsControl {
    fn export(&mut self, number: KernelNumber) -> io::Result<()> {
        debug!("Exporting GPIO {}", number);
        write_attribute(&self.root.join("export"), &number.to_string())
    }

    fn unexport(&mut self, number: KernelNumber) -> io::Result<()> {
        debug!("Unexporting GPIO {}", number);
        write_attribute(&self.root.join("unexport"), &number.to_string())
    }
}

/// One exported GPIO line.
///
/// A `Pin` is only handed out by [`PinRegistry::acquire`]. It never unexports
/// itself; once the registry releases its number the attribute files are gone
/// and every operation fails with [`GpioError::Io`].
#[derive(Debug)]
pub struct Pin {
    number: KernelNumber,
    gpio_dir: PathBuf,
}

impl Pin {
    fn new(root: &Path, number: KernelNumber) -> Self {
        Pin {
            number,
            gpio_dir: root.join(format!("gpio{}", number)),
        }
    }

    /// The kernel GPIO number this pin is bound to.
    pub fn number(&self) -> KernelNumber {
        self.number
    }

    fn write(&self, attribute: &str, payload: &str) -> Result<()> {
        let path = self.gpio_dir.join(attribute);
        debug!("Setting {} of GPIO {} to {}", attribute, self.number, payload);
        write_attribute(&path, payload).map_err(|source| GpioError::Io { path, source })
    }

    fn read_token<T>(&self, attribute: &str, parse: fn(&str) -> Option<T>) -> Result<T> {
        let path = self.gpio_dir.join(attribute);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(source) => return Err(GpioError::Io { path, source }),
        };

        let token = contents.split_whitespace().next().unwrap_or("");
        debug!("Read {} of GPIO {}: {}", attribute, self.number, token);
        match parse(token) {
            Some(value) => Ok(value),
            None => Err(GpioError::UnexpectedValue {
                found: token.to_string(),
                path,
            }),
        }
    }

    /// Writes `in` or `out` to the `direction` attribute.
    pub fn set_direction(&self, direction: Direction) -> Result<()> {
        self.write("direction", direction.as_str())
    }

    /// Writes `0` or `1` to the `value` attribute.
    ///
    /// The kernel only accepts this while the direction is `out`.
    pub fn set_value(&self, level: Level) -> Result<()> {
        self.write("value", level.as_str())
    }

    /// Reads the current direction.
    pub fn direction(&self) -> Result<Direction> {
        self.read_token("direction", Direction::from_token)
    }

    /// Reads the current level.
    pub fn value(&self) -> Result<Level> {
        self.read_token("value", Level::from_token)
    }

    pub fn set_high(&self) -> Result<()> {
        self.set_value(Level::High)
    }

    pub fn set_low(&self) -> Result<()> {
        self.set_value(Level::Low)
    }

    pub fn set_out(&self) -> Result<()> {
        self.set_direction(Direction::Out)
    }

    pub fn set_in(&self) -> Result<()> {
        self.set_direction(Direction::In)
    }

    pub fn is_high(&self) -> Result<bool> {
        Ok(self.value()? == Level::High)
    }

    pub fn is_low(&self) -> Result<bool> {
        Ok(self.value()? == Level::Low)
    }
}

/// Hands out exported pins and keeps track of them until they are released.
///
/// Dropping the registry releases everything it still holds, so exported
/// GPIOs don't outlive the program on any exit path.
///
/// Acquiring a number the registry already holds does not export it again:
/// the caller gets another handle over the same line and the number is still
/// released only once.
///
/// A pin that is still configured as an output is driven low before it is
/// unexported, so nothing is left switched on.
///
/// # Example
///
/// ```rust,no_run
/// use dragonboard_gpio::{PinRegistry, DRAGONBOARD_410C};
///
/// let mut gpio = PinRegistry::new(DRAGONBOARD_410C);
/// let led = gpio.acquire_label(27).unwrap();
/// led.set_out().unwrap();
/// led.set_high().unwrap();
///
/// gpio.release_all();
/// ```
#[derive(Debug)]
pub struct PinRegistry {
    table: PinTable,
    root: PathBuf,
    control: Box<dyn ExportControl>,
    exported: Vec<KernelNumber>,
}

impl PinRegistry {
    /// Creates a registry over the kernel's sysfs GPIO interface.
    pub fn new(table: PinTable) -> Self {
        PinRegistry::with_root(table, SYSFS_ROOT)
    }

    /// Creates a registry whose sysfs GPIO directory lives at `root`.
    pub fn with_root(table: PinTable, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let control = SysfsControl::new(root.clone());
        PinRegistry::with_control(table, root, control)
    }

    /// Creates a registry that exports and unexports through `control`, while
    /// pin attributes are still read from `root`.
    pub fn with_control(
        table: PinTable,
        root: impl Into<PathBuf>,
        control: impl ExportControl + 'static,
    ) -> Self {
        PinRegistry {
            table,
            root: root.into(),
            control: Box::new(control),
            exported: Vec::new(),
        }
    }

    pub fn table(&self) -> &PinTable {
        &self.table
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Kernel numbers currently held, in acquisition order.
    pub fn exported(&self) -> &[KernelNumber] {
        &self.exported
    }

    pub fn is_exported(&self, number: KernelNumber) -> bool {
        self.exported.contains(&number)
    }

    /// Looks up the kernel number of a board label.
    pub fn resolve(&self, label: u32) -> Result<KernelNumber> {
        self.table.resolve(label)
    }

    /// Exports `number` and returns a pin bound to it.
    ///
    /// Fails with [`GpioError::Export`] if the `export` file can't be opened or
    /// the kernel rejects the write (already exported by someone else, no
    /// permission, no such GPIO).
    pub fn acquire(&mut self, number: KernelNumber) -> Result<Pin> {
        if self.is_exported(number) {
            debug!("GPIO {} is already exported by this process", number);
            return Ok(Pin::new(&self.root, number));
        }

        if self.root.join(format!("gpio{}", number)).exists() {
            warn!("GPIO {} is already in use, continuing anyway", number);
        }

        self.control
            .export(number)
            .map_err(|source| GpioError::Export { number, source })?;
        self.exported.push(number);
        info!("Exported GPIO {}", number);

        Ok(Pin::new(&self.root, number))
    }

    /// Resolves a board label and acquires the GPIO behind it.
    pub fn acquire_label(&mut self, label: u32) -> Result<Pin> {
        let number = self.resolve(label)?;
        self.acquire(number)
    }

    /// Acquires a board pin, makes it an output and drives it to `initial`.
    pub fn acquire_output(&mut self, label: u32, initial: Level) -> Result<Pin> {
        let pin = self.acquire_label(label)?;
        pin.set_out()?;
        pin.set_value(initial)?;
        Ok(pin)
    }

    /// Unexports `number` if this registry holds it, driving it low first if
    /// it is an output.
    ///
    /// Failures are logged and otherwise ignored.
    pub fn release(&mut self, number: KernelNumber) {
        if !self.is_exported(number) {
            debug!("GPIO {} was not exported by this process, nothing to release", number);
            return;
        }

        self.exported.retain(|n| *n != number);
        self.unexport(number);
    }

    /// Unexports every held number in acquisition order.
    ///
    /// A failure on one pin doesn't stop the others, and the registry ends up
    /// empty either way.
    pub fn release_all(&mut self) {
        for number in std::mem::take(&mut self.exported) {
            self.unexport(number);
        }
    }

    fn unexport(&mut self, number: KernelNumber) {
        let pin = Pin::new(&self.root, number);
        // inputs, and pins whose direction can't be read, are left alone
        if let Ok(Direction::Out) = pin.direction() {
            if let Err(e) = pin.set_low() {
                warn!("Couldn't drive GPIO {} low before unexporting: {}", number, e);
            }
        }

        match self.control.unexport(number) {
            Ok(()) => info!("Unexported GPIO {}", number),
            Err(e) => warn!("Couldn't unexport GPIO {}: {}", number, e),
        }
    }
}

impl Drop for PinRegistry {
    fn drop(&mut self) {
        self.release_all();
    }
}
