use std::time::Duration;

pub const DEFAULT_SERVER_ADDR: &str = "localhost:3000";

pub const DEFAULT_REPEATS: usize = 1024;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

// every call in the driver loop bumps the counter by this much
pub const INCREMENT_STEP: u64 = 1;

/// Startup parameters for one run of the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub server: String,
    pub repeats: usize,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER_ADDR.to_string(),
            repeats: DEFAULT_REPEATS,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

const LONG_FLAGS: [&str; 3] = ["server", "repeats", "timeout"];

/// Rewrites single-dash long flags (`-server x`, `-server=x`) into the
/// double-dash form so both spellings reach the parser.
pub fn normalize_args<I: IntoIterator<Item = String>>(args: I) -> Vec<String> {
    args.into_iter()
        .map(|arg| {
            let name = arg
                .strip_prefix('-')
                .filter(|rest| !rest.starts_with('-'))
                .map(|rest| rest.split('=').next().unwrap_or(rest));
            match name {
                Some(name) if LONG_FLAGS.contains(&name) => format!("-{}", arg),
                _ => arg,
            }
        })
        .collect()
}
