use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::engine::ScanResult;
use crate::scanner::CheckFailure;

pub const EXIT_CLEAN: i32 = 0;
pub const EXIT_UNTERMINATED: i32 = 1;
/// Bad flags, config or ignore patterns; nothing was scanned.
pub const EXIT_CONFIG_ERROR: i32 = 2;

/// Write `path` exactly as the filesystem spells it, so names that are
/// not valid UTF-8 survive a round trip through `xargs` and friends.
#[cfg(unix)]
fn write_path<W: Write>(out: &mut W, path: &Path) -> io::Result<()> {
    use std::os::unix::ffi::OsStrExt;
    out.write_all(path.as_os_str().as_bytes())
}

#[cfg(not(unix))]
fn write_path<W: Write>(out: &mut W, path: &Path) -> io::Result<()> {
    write!(out, "{}", path.display())
}

pub fn write_listing<W: Write>(out: &mut W, paths: &[PathBuf]) -> io::Result<()> {
    for path in paths {
        write_path(out, path)?;
        out.write_all(b"\n")?;
    }
    out.flush()
}

pub fn write_diagnostics<W: Write>(err: &mut W, failures: &[CheckFailure]) -> io::Result<()> {
    for failure in failures {
        err.write_all(b"error determining termination for file '")?;
        write_path(err, &failure.path)?;
        writeln!(err, "': {}", failure.error)?;
    }
    err.flush()
}

pub fn exit_code(result: &ScanResult) -> i32 {
    if result.is_clean() {
        EXIT_CLEAN
    } else {
        EXIT_UNTERMINATED
    }
}

/// Print diagnostics and, unless `quiet`, the listing. Returns the exit
/// code for the process.
pub fn report<O: Write, E: Write>(
    result: &ScanResult,
    quiet: bool,
    out: &mut O,
    err: &mut E,
) -> io::Result<i32> {
    write_diagnostics(err, &result.failures)?;
    if !quiet {
        write_listing(out, &result.unterminated)?;
    }
    Ok(exit_code(result))
}
