//! Human-readable byte sizes.
//!
//! [`ByteSize1024`] scales by powers of 1024 (`KiB`, `MiB`, ...) and
//! [`ByteSize1000`] by powers of 1000 (`KB`, `MB`, ...). Both implement
//! [`Display`](fmt::Display):
//!
//! - `{}` prints the shortest exact decimal: `1.5KiB`
//! - `{:.2}` fixes the number of decimals: `1.50KiB`
//! - `{:#}` separates number and unit with a space: `1.5 KiB`
//!
//! ```
//! use dops_core::size::{ByteSize1000, ByteSize1024};
//!
//! assert_eq!(ByteSize1024(1536).to_string(), "1.5KiB");
//! assert_eq!(format!("{:#.1}", ByteSize1000(2_345_678)), "2.3 MB");
//! ```

use std::fmt;

const UNITS_1024: [(u64, &str); 5] = [
    (1, "b"),
    (1 << 10, "KiB"),
    (1 << 20, "MiB"),
    (1 << 30, "GiB"),
    (1 << 40, "TiB"),
];

const UNITS_1000: [(u64, &str); 5] = [
    (1, "b"),
    (1_000, "KB"),
    (1_000_000, "MB"),
    (1_000_000_000, "GB"),
    (1_000_000_000_000, "TB"),
];

/// Byte count rendered with binary (1024-based) units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ByteSize1024(pub u64);

/// Byte count rendered with decimal (1000-based) units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ByteSize1000(pub u64);

impl fmt::Display for ByteSize1024 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_scaled(f, self.0, &UNITS_1024)
    }
}

impl fmt::Display for ByteSize1000 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_scaled(f, self.0, &UNITS_1000)
    }
}

#[allow(clippy::cast_precision_loss)]
fn write_scaled(f: &mut fmt::Formatter<'_>, bytes: u64, units: &[(u64, &str)]) -> fmt::Result {
    // Largest unit not exceeding the value; the last unit caps.
    let (divisor, unit) = units
        .iter()
        .rev()
        .find(|(divisor, _)| bytes >= *divisor)
        .copied()
        .unwrap_or(units[0]);

    let value = bytes as f64 / divisor as f64;
    match f.precision() {
        Some(precision) => write!(f, "{value:.precision$}")?,
        None => write!(f, "{value}")?,
    }
    if f.alternate() {
        f.write_str(" ")?;
    }
    f.write_str(unit)
}
