//! Async probe execution with timeout.

use crate::ProbeFailure;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

/// Run a probe program and capture its output.
///
/// The execution is wrapped in `limit` so an unresponsive tool cannot stall
/// the run. Stdout is preferred; some tools (`java -version`, `nginx -v`)
/// print their version on stderr, which is used as fallback. Invalid UTF-8
/// is replaced lossily.
///
/// # Errors
///
/// - `Timeout` if the command takes longer than `limit`
/// - `PermissionDenied` if the executable cannot be run due to permissions
/// - `Io` for other spawn failures
/// - `NonZeroExit` if the command exits unsuccessfully
pub(crate) async fn run_probe(
    program: &Path,
    args: &[&str],
    limit: Duration,
) -> Result<String, ProbeFailure> {
    let output = timeout(
        limit,
        Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output(),
    )
    .await
    .map_err(|_| ProbeFailure::Timeout)?
    .map_err(|e| match e.kind() {
        std::io::ErrorKind::PermissionDenied => ProbeFailure::PermissionDenied,
        std::io::ErrorKind::NotFound => ProbeFailure::NotFound,
        _ => ProbeFailure::Io,
    })?;

    if !output.status.success() {
        return Err(ProbeFailure::NonZeroExit);
    }

    let out = if !output.stdout.is_empty() {
        output.stdout
    } else {
        output.stderr
    };

    Ok(String::from_utf8_lossy(&out).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_run_probe_success() {
        let path = PathBuf::from("/bin/sh");
        if path.exists() {
            let result = run_probe(&path, &["-c", "echo 1.2.3"], Duration::from_secs(2)).await;
            assert_eq!(result.unwrap().trim(), "1.2.3");
        }
    }

    #[tokio::test]
    async fn test_run_probe_stderr_fallback() {
        let path = PathBuf::from("/bin/sh");
        if path.exists() {
            let result =
                run_probe(&path, &["-c", "echo v9 1>&2"], Duration::from_secs(2)).await;
            assert_eq!(result.unwrap().trim(), "v9");
        }
    }

    #[tokio::test]
    async fn test_run_probe_nonzero_exit() {
        let path = PathBuf::from("/bin/sh");
        if path.exists() {
            let result = run_probe(&path, &["-c", "exit 3"], Duration::from_secs(2)).await;
            assert_eq!(result, Err(ProbeFailure::NonZeroExit));
        }
    }

    #[tokio::test]
    async fn test_run_probe_timeout() {
        let path = PathBuf::from("/bin/sh");
        if path.exists() {
            let result =
                run_probe(&path, &["-c", "sleep 5"], Duration::from_millis(100)).await;
            assert_eq!(result, Err(ProbeFailure::Timeout));
        }
    }

    #[tokio::test]
    async fn test_run_probe_nonexistent() {
        let path = PathBuf::from("/nonexistent/path/to/executable");
        let result = run_probe(&path, &["--version"], Duration::from_secs(2)).await;
        assert_eq!(result, Err(ProbeFailure::NotFound));
    }
}
