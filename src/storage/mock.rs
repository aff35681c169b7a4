//! In-memory storage for tests

use std::cell::Cell;
use std::collections::HashMap;
use std::io;
use std::rc::Rc;

use super::{Storage, StorageFile};

#[derive(Default)]
pub struct MemoryStorage {
    files: HashMap<String, Rc<Vec<u8>>>,
    open_handles: Rc<Cell<usize>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: &str, data: Vec<u8>) {
        self.files.insert(path.to_string(), Rc::new(data));
    }

    /// Handles opened and not yet closed or dropped
    pub fn open_handles(&self) -> usize {
        self.open_handles.get()
    }
}

pub struct MemoryFile {
    data: Rc<Vec<u8>>,
    pos: usize,
    open_handles: Rc<Cell<usize>>,
}

impl Drop for MemoryFile {
    fn drop(&mut self) {
        self.open_handles.set(self.open_handles.get() - 1);
    }
}

impl StorageFile for MemoryFile {
    fn seek(&mut self, offset: u64) -> io::Result<()> {
        self.pos = offset as usize;
        Ok(())
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let start = self.pos.min(self.data.len());
        let n = buf.len().min(self.data.len() - start);
        buf[..n].copy_from_slice(&self.data[start..start + n]);
        self.pos = start + n;
        Ok(n)
    }
}

impl Storage for MemoryStorage {
    type File = MemoryFile;

    fn open(&mut self, path: &str) -> io::Result<MemoryFile> {
        let data = self
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))?;
        self.open_handles.set(self.open_handles.get() + 1);
        Ok(MemoryFile {
            data,
            pos: 0,
            open_handles: self.open_handles.clone(),
        })
    }
}
