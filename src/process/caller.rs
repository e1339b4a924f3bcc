// Keygate: Caller Identification
//
// Identifies the process that invoked the gateway, i.e. the parent of the
// current process. On Linux this reads /proc/<pid>/comm and /proc/<pid>/exe;
// other Unix systems ask `ps`. Nothing is cached: every call re-reads the
// process table.

use std::fs;
use std::io;
use std::path::PathBuf;

use sha2::{Digest, Sha256};

/// Returned by `caller_process_name` when the caller cannot be resolved.
pub const UNKNOWN_PROCESS: &str = "(unknown process)";

/// Information about a process on this host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerInfo {
    /// Process ID.
    pub pid: u32,
    /// Short process name (command name).
    pub name: String,
    /// Resolved path to the executable, when the OS exposes it.
    pub exe_path: Option<PathBuf>,
}

impl CallerInfo {
    /// Look up a process by ID.
    pub fn from_pid(pid: u32) -> io::Result<Self> {
        lookup(pid)
    }

    /// Look up the parent of the current process.
    pub fn parent() -> io::Result<Self> {
        Self::from_pid(parent_pid()?)
    }

    /// SHA-256 hex digest of the executable, for audit fingerprints.
    pub fn exe_hash(&self) -> io::Result<String> {
        let path = self.exe_path.as_ref().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "executable path unknown")
        })?;
        let binary = fs::read(path)?;
        let hash = Sha256::digest(&binary);
        Ok(hash.iter().map(|b| format!("{:02x}", b)).collect())
    }

    /// Return a short actor string for audit logging.
    pub fn actor_string(&self) -> String {
        match &self.exe_path {
            Some(exe) => format!("pid:{} name:{} exe:{}", self.pid, self.name, exe.display()),
            None => format!("pid:{} name:{}", self.pid, self.name),
        }
    }
}

impl std::fmt::Display for CallerInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (PID {})", self.name, self.pid)
    }
}

/// Name of the process that called into the gateway, or `UNKNOWN_PROCESS`.
/// Never empty.
pub fn caller_process_name() -> String {
    process_name(&CallerInfo::parent())
}

/// Name to show for a lookup result, falling back to `UNKNOWN_PROCESS`.
pub fn process_name(caller: &io::Result<CallerInfo>) -> String {
    match caller {
        Ok(info) if !info.name.is_empty() => info.name.clone(),
        Ok(info) => {
            tracing::debug!(pid = info.pid, "Caller process has no name");
            UNKNOWN_PROCESS.to_string()
        }
        Err(e) => {
            tracing::debug!(error = %e, "Could not resolve caller process");
            UNKNOWN_PROCESS.to_string()
        }
    }
}

// ─── Platform lookups ────────────────────────────────────────────────────────

#[cfg(unix)]
fn parent_pid() -> io::Result<u32> {
    Ok(std::os::unix::process::parent_id())
}

#[cfg(not(unix))]
fn parent_pid() -> io::Result<u32> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "parent process lookup is not supported on this platform",
    ))
}

#[cfg(target_os = "linux")]
fn lookup(pid: u32) -> io::Result<CallerInfo> {
    let comm = fs::read_to_string(format!("/proc/{}/comm", pid))?;
    // Unreadable for processes owned by other users; the name is enough.
    let exe_path = fs::read_link(format!("/proc/{}/exe", pid)).ok();

    let mut name = comm.trim().to_string();
    if name.is_empty() {
        name = exe_path.as_deref().and_then(file_name).unwrap_or_default();
    }

    Ok(CallerInfo {
        pid,
        name,
        exe_path,
    })
}

#[cfg(all(unix, not(target_os = "linux")))]
fn lookup(pid: u32) -> io::Result<CallerInfo> {
    let output = std::process::Command::new("ps")
        .args(["-p", &pid.to_string(), "-o", "comm="])
        .output()?;

    let command = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if !output.status.success() || command.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("no process with PID {}", pid),
        ));
    }

    let path = PathBuf::from(&command);
    let name = file_name(&path).unwrap_or_else(|| command.clone());
    let exe_path = path.is_absolute().then_some(path);

    Ok(CallerInfo {
        pid,
        name,
        exe_path,
    })
}

#[cfg(not(unix))]
fn lookup(pid: u32) -> io::Result<CallerInfo> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        format!("cannot inspect PID {} on this platform", pid),
    ))
}

#[cfg(unix)]
fn file_name(path: &std::path::Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}

// ─── Tests ───────────────────────────────────────────────────────────────────
