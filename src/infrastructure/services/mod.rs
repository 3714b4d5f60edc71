mod logger;
mod sntp;

pub use logger::SerialLog;
pub use sntp::SntpClock;
