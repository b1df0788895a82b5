//! Access to the GPIO pins of a DragonBoard 410c through the Linux sysfs
//! interface (`/sys/class/gpio`).
//!
//! A [`PinRegistry`] translates board labels into kernel GPIO numbers using a
//! [`PinTable`], exports them and hands out [`Pin`]s. Pins read and write the
//! `direction` and `value` attributes. The registry unexports everything it
//! handed out on [`PinRegistry::release_all`] or when it is dropped.
//!
//! ```rust,no_run
//! use dragonboard_gpio::{PinRegistry, DRAGONBOARD_410C};
//!
//! let mut gpio = PinRegistry::new(DRAGONBOARD_410C);
//! let button = gpio.acquire_label(29).unwrap();
//! button.set_in().unwrap();
//! println!("button pressed: {}", button.is_high().unwrap());
//! ```
pub mod error;
pub mod gpio;
pub mod gpio_pin_data;
pub mod poll;
pub mod session;

pub use error::{GpioError, Result};
pub use gpio::{
    Direction, ExportControl, KernelNumber, Level, Pin, PinRegistry, SysfsControl, SYSFS_ROOT,
};
pub use gpio_pin_data::{PinTable, DRAGONBOARD_410C};
