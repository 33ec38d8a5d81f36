//! Logging setup.
//!
//! Library code only emits `tracing` events. With the `logging` feature,
//! `init_logging` installs a plain fmt subscriber: on wasm32 every formatted
//! line goes to `console.log`, natively to stderr. Without the feature it is a
//! no-op so hosts can call it unconditionally.

use tracing::Level;

/// Install the global subscriber. Returns false if one was already set or
/// the `logging` feature is off.
#[cfg(feature = "logging")]
pub fn init_logging(max_level: Level) -> bool {
    let builder = tracing_subscriber::fmt()
        .with_max_level(max_level)
        .with_ansi(false)
        .with_target(false)
        .without_time();

    #[cfg(target_arch = "wasm32")]
    let builder = builder.with_writer(console::ConsoleWriter::default);
    #[cfg(not(target_arch = "wasm32"))]
    let builder = builder.with_writer(std::io::stderr);

    builder.try_init().is_ok()
}

#[cfg(not(feature = "logging"))]
pub fn init_logging(_max_level: Level) -> bool {
    false
}

/// Parse a level name as used by hosts ("debug", "INFO", ...). Unknown names
/// fall back to `info`.
pub fn parse_level(name: &str) -> Level {
    name.trim().parse().unwrap_or(Level::INFO)
}

#[cfg(all(feature = "logging", target_arch = "wasm32"))]
mod console {
    use std::io;

    /// Collects one formatted event and hands it to `console.log` on drop.
    #[derive(Default)]
    pub struct ConsoleWriter {
        buf: Vec<u8>,
    }

    impl io::Write for ConsoleWriter {
        fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
            self.buf.extend_from_slice(bytes);
            Ok(bytes.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            if !self.buf.is_empty() {
                let line = String::from_utf8_lossy(&self.buf);
                crate::wasm::console_log(line.trim_end());
                self.buf.clear();
            }
            Ok(())
        }
    }

    impl Drop for ConsoleWriter {
        fn drop(&mut self) {
            let _ = io::Write::flush(self);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), Level::DEBUG);
        assert_eq!(parse_level(" WARN "), Level::WARN);
        assert_eq!(parse_level("chatty"), Level::INFO);
    }
}
