use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::Error;

/// Check whether the file at `path` ends in `\n`.
///
/// Empty files pass. Only the final byte is read, so the cost does not
/// depend on file size.
pub fn is_terminated(path: &Path) -> Result<bool, Error> {
    let mut file = File::open(path).map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let len = file
        .metadata()
        .map_err(|source| Error::Metadata {
            path: path.to_path_buf(),
            source,
        })?
        .len();

    if len == 0 {
        return Ok(true);
    }

    let mut last = [0u8; 1];
    file.seek(SeekFrom::Start(len - 1))
        .and_then(|_| file.read_exact(&mut last))
        .map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(last[0] == b'\n')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_empty_file_is_terminated() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("empty");
        fs::write(&path, "").unwrap();
        assert!(is_terminated(&path).unwrap());
    }

    #[test]
    fn test_trailing_newline() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("ok.txt");
        fs::write(&path, "line one\nline two\n").unwrap();
        assert!(is_terminated(&path).unwrap());

        let lone = tmp.path().join("lone.txt");
        fs::write(&lone, "\n").unwrap();
        assert!(is_terminated(&lone).unwrap());
    }

    #[test]
    fn test_other_final_bytes() {
        let tmp = tempdir().unwrap();
        for (i, last) in [b'x', b'\r', b' ', 0u8, 0xFF].iter().enumerate() {
            let path = tmp.path().join(format!("f{}", i));
            fs::write(&path, [b'a', b'\n', *last]).unwrap();
            assert!(!is_terminated(&path).unwrap(), "final byte {:#04x}", last);
        }
    }

    #[test]
    fn test_crlf_counts_as_terminated() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("dos.txt");
        fs::write(&path, "a\r\n").unwrap();
        assert!(is_terminated(&path).unwrap());
    }

    #[test]
    fn test_large_file_reads_only_tail() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("big.bin");
        let mut content = vec![b'\n'; 1 << 20];
        content.push(b'z');
        fs::write(&path, &content).unwrap();
        assert!(!is_terminated(&path).unwrap());
    }

    #[test]
    fn test_missing_file_is_open_error() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("gone.txt");
        let err = is_terminated(&path).unwrap_err();
        assert!(matches!(err, Error::Open { .. }));
        assert!(err.to_string().starts_with("couldn't open file '"));
    }
}
