use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{Storage, StorageFile};

/// Storage rooted at a directory, the way the SD card root is seen on device
#[derive(Debug, Clone)]
pub struct DirStorage {
    root: PathBuf,
}

impl DirStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a card path ("/icons/a.bmp" or "icons/a.bmp") under the root
    pub fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

pub struct DirFile {
    file: File,
}

impl StorageFile for DirFile {
    fn seek(&mut self, offset: u64) -> io::Result<()> {
        self.file.seek(SeekFrom::Start(offset)).map(|_| ())
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl Storage for DirStorage {
    type File = DirFile;

    fn open(&mut self, path: &str) -> io::Result<DirFile> {
        let full = self.resolve(path);
        debug!("Opening {}", full.display());
        Ok(DirFile {
            file: File::open(full)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_strips_leading_slash() {
        let storage = DirStorage::new("/media/sd");
        assert_eq!(
            storage.resolve("/icons/next.bmp"),
            PathBuf::from("/media/sd/icons/next.bmp")
        );
        assert_eq!(
            storage.resolve("icons/next.bmp"),
            PathBuf::from("/media/sd/icons/next.bmp")
        );
    }

    #[test]
    fn test_open_read_seek() {
        let dir = std::env::temp_dir().join(format!("touch-deck-dir-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("data.bin"), [1u8, 2, 3, 4, 5]).unwrap();

        let mut storage = DirStorage::new(&dir);
        let mut file = storage.open("/data.bin").unwrap();
        file.seek(2).unwrap();
        let mut buf = [0u8; 3];
        file.read_exact(&mut buf).unwrap();
        assert_eq!(buf, [3, 4, 5]);

        let mut more = [0u8; 1];
        assert!(file.read_exact(&mut more).is_err());
        file.close();

        assert!(storage.open("missing.bmp").is_err());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
