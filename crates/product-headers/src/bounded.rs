//! Size-capped reads so that header parsing cost never scales with payload size.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::error::HeaderResult;

/// Read at most `limit` bytes from the start of `path`.
pub fn read_prefix(path: &Path, limit: usize) -> HeaderResult<Vec<u8>> {
    let file = File::open(path)?;
    let mut buf = Vec::with_capacity(limit.min(64 * 1024));
    file.take(limit as u64).read_to_end(&mut buf)?;

    debug!(
        path = %path.display(),
        bytes = buf.len(),
        limit,
        "Read header prefix"
    );

    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_prefix_caps_length() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[7u8; 4096]).unwrap();

        let head = read_prefix(file.path(), 100).unwrap();
        assert_eq!(head.len(), 100);

        let all = read_prefix(file.path(), 1 << 20).unwrap();
        assert_eq!(all.len(), 4096);
    }

    #[test]
    fn test_read_prefix_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_prefix(&dir.path().join("absent.nat"), 10).is_err());
    }
}
