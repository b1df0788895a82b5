use crate::error::{GpioError, Result};
use crate::gpio::KernelNumber;

/// Maps the labels printed on a board's header to kernel GPIO numbers.
///
/// The table is plain data: a board name and a list of
/// `(board label, kernel GPIO number)` pairs. Supporting another board means
/// declaring another table, nothing else.
///
/// # Example
///
/// ```rust
/// use dragonboard_gpio::PinTable;
///
/// static MY_BOARD: PinTable = PinTable::new("MY_BOARD", &[(1, 17), (2, 18)]);
///
/// assert_eq!(MY_BOARD.resolve(2).unwrap().to_string(), "18");
/// assert!(MY_BOARD.resolve(3).is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PinTable {
    name: &'static str,
    pins: &'static [(u32, u32)],
}

/// Low-speed expansion header of the DragonBoard 410c.
///
/// Note that the kernel numbering has nothing to do with the silkscreen: board
/// pin 27 is GPIO 115 and board pin 28 sits on the PMIC at GPIO 901.
pub static DRAGONBOARD_410C: PinTable = PinTable::new(
    "DRAGONBOARD_410C",
    &[
        (23, 36),
        (24, 12),
        (25, 13),
        (26, 69),
        (27, 115),
        (28, 901),
        (29, 24),
        (30, 25),
        (31, 35),
        (32, 34),
        (33, 28),
        (34, 33),
    ],
);

impl PinTable {
    pub const fn new(name: &'static str, pins: &'static [(u32, u32)]) -> Self {
        PinTable { name, pins }
    }

    /// Name of the board this table describes.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the kernel GPIO number behind a board label.
    ///
    /// Fails with [`GpioError::UnknownPin`] if the label is not on the header.
    pub fn resolve(&self, label: u32) -> Result<KernelNumber> {
        self.pins
            .iter()
            .find(|(board, _)| *board == label)
            .map(|(_, gpio)| KernelNumber::from(*gpio))
            .ok_or(GpioError::UnknownPin {
                label,
                board: self.name,
            })
    }

    /// All board labels in ascending order.
    pub fn labels(&self) -> Vec<u32> {
        let mut labels: Vec<u32> = self.pins.iter().map(|(board, _)| *board).collect();
        labels.sort_unstable();
        labels
    }

    /// Lowest and highest board label, `None` for an empty table.
    pub fn range(&self) -> Option<(u32, u32)> {
        let labels = self.labels();
        Some((*labels.first()?, *labels.last()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dragonboard_table_matches_the_header() {
        let expected = [
            (23, 36),
            (24, 12),
            (25, 13),
            (26, 69),
            (27, 115),
            (28, 901),
            (29, 24),
            (30, 25),
            (31, 35),
            (32, 34),
            (33, 28),
            (34, 33),
        ];

        for (label, gpio) in expected {
            assert_eq!(DRAGONBOARD_410C.resolve(label).unwrap(), KernelNumber::from(gpio));
        }
    }

    #[test]
    fn labels_outside_the_header_are_rejected() {
        for label in [0, 1, 22, 35, 100, u32::MAX] {
            match DRAGONBOARD_410C.resolve(label) {
                Err(GpioError::UnknownPin { label: l, board }) => {
                    assert_eq!(l, label);
                    assert_eq!(board, "DRAGONBOARD_410C");
                }
                other => panic!("expected UnknownPin for {}, got {:?}", label, other),
            }
        }
    }

    #[test]
    fn range_covers_the_header() {
        assert_eq!(DRAGONBOARD_410C.range(), Some((23, 34)));
        assert_eq!(DRAGONBOARD_410C.labels().len(), 12);
        assert_eq!(PinTable::new("EMPTY", &[]).range(), None);
    }

    #[test]
    fn labels_are_sorted() {
        let table = PinTable::new("SHUFFLED", &[(9, 1), (3, 2), (5, 3)]);
        assert_eq!(table.labels(), vec![3, 5, 9]);
        assert_eq!(table.range(), Some((3, 9)));
    }
}
