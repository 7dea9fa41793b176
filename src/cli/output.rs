//! Output helpers shared by the CLI commands.
//!
//! Global flags are propagated through environment variables so every
//! command module can check them without threading state around.

pub fn is_json() -> bool {
    std::env::var("PRICEWATCH_JSON").is_ok()
}

pub fn is_quiet() -> bool {
    std::env::var("PRICEWATCH_QUIET").is_ok()
}

pub fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(_) => println!("{value}"),
    }
}

/// Minimal status symbols, colored unless disabled.
pub struct Styled {
    color: bool,
}

impl Styled {
    pub fn new() -> Self {
        Self {
            color: std::env::var("PRICEWATCH_NO_COLOR").is_err()
                && std::env::var("NO_COLOR").is_err(),
        }
    }

    pub fn ok_sym(&self) -> &'static str {
        if self.color {
            "\x1b[32m✓\x1b[0m"
        } else {
            "✓"
        }
    }

    pub fn warn_sym(&self) -> &'static str {
        if self.color {
            "\x1b[33m!\x1b[0m"
        } else {
            "!"
        }
    }
}

impl Default for Styled {
    fn default() -> Self {
        Self::new()
    }
}
