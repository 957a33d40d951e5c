//! Interpreter environment probing.
//!
//! Runs the target interpreter once and reads the `sysconfig` values needed
//! to locate its headers and shared library. Missing values are reported,
//! never defaulted: a wrong library path yields a build that succeeds but
//! produces a module the interpreter cannot load.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::core::HostOs;
use crate::error::BuildError;
use crate::util::process::ProcessBuilder;

const PROBE_SCRIPT: &str = r#"
import importlib.machinery, json, platform, sys, sysconfig
var = sysconfig.get_config_var
print(json.dumps({
    "version": [sys.version_info[0], sys.version_info[1]],
    "INCLUDEPY": var("INCLUDEPY"),
    "INCLUDEDIR": var("INCLUDEDIR"),
    "LIBDIR": var("LIBDIR"),
    "INSTSONAME": var("INSTSONAME"),
    "EXT_SUFFIX": var("EXT_SUFFIX") or var("SO"),
    "EXTENSION_SUFFIXES": importlib.machinery.EXTENSION_SUFFIXES,
    "platform": sysconfig.get_platform(),
    "system": platform.system(),
}))
"#;

#[derive(Debug, Deserialize)]
struct RawProbe {
    version: (u32, u32),
    #[serde(rename = "INCLUDEPY")]
    include_py: Option<String>,
    #[serde(rename = "INCLUDEDIR")]
    include_dir: Option<String>,
    #[serde(rename = "LIBDIR")]
    lib_dir: Option<String>,
    #[serde(rename = "INSTSONAME")]
    inst_so_name: Option<String>,
    #[serde(rename = "EXT_SUFFIX")]
    ext_suffix: Option<String>,
    #[serde(rename = "EXTENSION_SUFFIXES", default)]
    extension_suffixes: Vec<String>,
    platform: String,
    system: String,
}

/// Build-relevant facts about the target interpreter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterInfo {
    /// `(major, minor)` version
    pub version: (u32, u32),
    /// Directory containing `Python.h`
    pub include_dir: PathBuf,
    /// Installation include root, if the interpreter reports one
    pub include_root: Option<PathBuf>,
    /// Directory containing the interpreter's shared library
    pub library_dir: PathBuf,
    /// File name of the interpreter's shared library
    pub library_name: String,
    /// Suffix of extension module file names, e.g. `.cpython-311-x86_64-linux-gnu.so`
    pub ext_suffix: String,
    /// Every suffix the interpreter imports extension modules from, `ext_suffix` first
    pub extension_suffixes: Vec<String>,
    /// `sysconfig.get_platform()`, e.g. `linux-x86_64`
    pub platform_tag: String,
    /// Operating system the interpreter runs on
    pub host_os: HostOs,
}

impl InterpreterInfo {
    /// Probe the interpreter at `python`.
    pub fn probe(python: &Path) -> Result<Self, BuildError> {
        tracing::info!("Probing interpreter {}", python.display());

        let output = ProcessBuilder::new(python)
            .arg("-c")
            .arg(PROBE_SCRIPT)
            .env("PYTHONIOENCODING", "utf-8")
            .exec_and_check()
            .map_err(|e| BuildError::EnvironmentUnresolved {
                variable: "sysconfig".to_string(),
                reason: format!("{:#}", e),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        Self::from_json(&stdout)
    }

    /// Parse the probe script's JSON output.
    pub fn from_json(json: &str) -> Result<Self, BuildError> {
        let raw: RawProbe =
            serde_json::from_str(json.trim()).map_err(|e| BuildError::EnvironmentUnresolved {
                variable: "sysconfig".to_string(),
                reason: format!("unreadable probe output: {}", e),
            })?;

        let ext_suffix = required("EXT_SUFFIX", raw.ext_suffix)?;
        let mut extension_suffixes = vec![ext_suffix.clone()];
        for suffix in raw.extension_suffixes {
            if !suffix.is_empty() && !extension_suffixes.contains(&suffix) {
                extension_suffixes.push(suffix);
            }
        }

        let info = InterpreterInfo {
            version: raw.version,
            include_dir: PathBuf::from(required("INCLUDEPY", raw.include_py)?),
            include_root: raw.include_dir.filter(|s| !s.is_empty()).map(PathBuf::from),
            library_dir: PathBuf::from(required("LIBDIR", raw.lib_dir)?),
            library_name: required("INSTSONAME", raw.inst_so_name)?,
            ext_suffix,
            extension_suffixes,
            platform_tag: raw.platform,
            host_os: HostOs::from_name(&raw.system),
        };

        tracing::debug!(
            "interpreter {}.{} on {} ({})",
            info.version.0,
            info.version.1,
            info.platform_tag,
            info.host_os
        );

        Ok(info)
    }

    /// Full path of the interpreter's shared library.
    pub fn library_path(&self) -> PathBuf {
        self.library_dir.join(&self.library_name)
    }

    /// Directory-name suffix for per-interpreter build output, e.g. `linux-x86_64-3.11`.
    pub fn plat_specifier(&self) -> String {
        format!(
            "{}-{}.{}",
            self.platform_tag, self.version.0, self.version.1
        )
    }
}

fn required(variable: &str, value: Option<String>) -> Result<String, BuildError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(BuildError::EnvironmentUnresolved {
            variable: variable.to_string(),
            reason: "not set by this interpreter build".to_string(),
        }),
    }
}
