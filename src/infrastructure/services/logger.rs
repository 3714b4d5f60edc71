//! Serial diagnostic sink.
//!
//! Lines go to the UART console; with the `log` feature disabled the sink
//! compiles down to nothing.

use bin_monitor_core::ports::LogSink;
#[cfg(feature = "log")]
use esp_println::println;

#[derive(Debug, Default, Clone, Copy)]
pub struct SerialLog;

impl LogSink for SerialLog {
    fn debug(&self, line: &str) {
        #[cfg(feature = "log")]
        println!("DEBUG: {}", line);
        #[cfg(not(feature = "log"))]
        let _ = line;
    }

    fn error(&self, line: &str) {
        #[cfg(feature = "log")]
        println!("ERROR: {}", line);
        #[cfg(not(feature = "log"))]
        let _ = line;
    }
}
