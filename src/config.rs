use std::time::Duration;

/// Runtime configuration, resolved once at start-up and passed explicitly
/// into the components that need it.
#[derive(Debug, Clone)]
pub struct Config {
    /// The single lab host every scan runs against.
    pub target: String,
    /// Name or path of the nmap binary to invoke.
    pub nmap_path: String,
    /// Hard deadline for one external scan run.
    pub scan_timeout: Duration,
}

impl Config {
    pub fn new(
        target: impl Into<String>,
        nmap_path: impl Into<String>,
        scan_timeout: Duration,
    ) -> Self {
        Self {
            target: target.into(),
            nmap_path: nmap_path.into(),
            scan_timeout,
        }
    }
}
