//! Removable-storage interface (SD card)
//!
//! Files are opened by path, read sequentially with an absolute seek, and
//! closed either explicitly or when the handle is dropped.

mod dir;
#[cfg(test)]
pub mod mock;

pub use dir::DirStorage;

use std::io;

/// An open file on storage
pub trait StorageFile {
    /// Move the read position to an absolute byte offset
    fn seek(&mut self, offset: u64) -> io::Result<()>;

    /// Read up to `buf.len()` bytes, returning how many were read
    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Fill `buf` completely or fail with `UnexpectedEof`
    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.read_bytes(&mut buf[filled..])? {
                0 => return Err(io::Error::from(io::ErrorKind::UnexpectedEof)),
                n => filled += n,
            }
        }
        Ok(())
    }

    fn close(self)
    where
        Self: Sized,
    {
    }
}

pub trait Storage {
    type File: StorageFile;

    fn open(&mut self, path: &str) -> io::Result<Self::File>;
}
