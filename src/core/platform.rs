//! Host operating system identity.

use std::fmt;

/// Operating system an interpreter runs on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostOs {
    Windows,
    Linux,
    MacOs,
    Other(String),
}

impl HostOs {
    /// OS this binary was compiled for.
    pub fn current() -> Self {
        Self::from_name(std::env::consts::OS)
    }

    /// Parse an OS name as reported by `platform.system()` or `std::env::consts::OS`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "windows" => HostOs::Windows,
            "linux" => HostOs::Linux,
            "darwin" | "macos" => HostOs::MacOs,
            _ => HostOs::Other(name.trim().to_string()),
        }
    }

    /// Whether installs on this OS must bundle the runtime shared library
    /// next to the extension module.
    pub fn requires_runtime_asset(&self) -> bool {
        matches!(self, HostOs::Windows)
    }
}

impl fmt::Display for HostOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostOs::Windows => write!(f, "Windows"),
            HostOs::Linux => write!(f, "Linux"),
            HostOs::MacOs => write!(f, "Darwin"),
            HostOs::Other(name) => write!(f, "{}", name),
        }
    }
}
