//! Host-dependent filename handling.

use std::path::PathBuf;

/// Compare two filenames the way the host platform does.
///
/// On Unix filenames are opaque bytes. On Windows ASCII case is folded and
/// `/` and `\` are interchangeable, matching what the platform's own
/// filename comparison accepts.
#[cfg(not(windows))]
pub fn filenames_equal(a: &[u8], b: &[u8]) -> bool {
    a == b
}

#[cfg(windows)]
pub fn filenames_equal(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).all(|(&x, &y)| fold(x) == fold(y))
}

#[cfg(windows)]
fn fold(c: u8) -> u8 {
    if c == b'\\' {
        b'/'
    } else {
        c.to_ascii_lowercase()
    }
}

/// Convert a byte filename to a filesystem path.
#[cfg(unix)]
pub fn filename_to_path(bytes: &[u8]) -> PathBuf {
    use std::os::unix::ffi::OsStrExt;
    PathBuf::from(std::ffi::OsStr::from_bytes(bytes))
}

#[cfg(not(unix))]
pub fn filename_to_path(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_reflexive() {
        assert!(filenames_equal(b"src/a.s", b"src/a.s"));
        assert!(!filenames_equal(b"src/a.s", b"src/b.s"));
    }

    #[cfg(not(windows))]
    #[test]
    fn unix_compare_is_byte_exact() {
        assert!(!filenames_equal(b"A.s", b"a.s"));
        assert!(!filenames_equal(b"dir\\a.s", b"dir/a.s"));
    }

    #[cfg(windows)]
    #[test]
    fn windows_compare_folds_case_and_separators() {
        assert!(filenames_equal(b"A.S", b"a.s"));
        assert!(filenames_equal(b"dir\\a.s", b"dir/a.s"));
    }

    #[test]
    fn filename_round_trips_through_path() {
        let path = filename_to_path(b"some/dir/file.s");
        assert_eq!(path, PathBuf::from("some/dir/file.s"));
    }
}
