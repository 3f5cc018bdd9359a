pub mod time;

pub use time::{DateTimeFormatter, TimezoneConfig};
