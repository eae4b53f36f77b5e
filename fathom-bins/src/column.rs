//! Fixed-width columnar inputs.
//!
//! A column is a finite, ordered sequence of little-endian fixed-width
//! records. Tests build them in memory; the binaries map flat files.
//! Consumers only see a length and indexed reads, so either backing can
//! feed the replay driver.

use std::fs::File;
use std::marker::PhantomData;
use std::path::Path;

use anyhow::{ensure, Context, Result};
use memmap2::Mmap;

/// A fixed-width record decodable from little-endian bytes.
pub trait Record: Copy {
    /// Encoded width in bytes.
    const WIDTH: usize;

    /// Decode from exactly [`Self::WIDTH`] bytes.
    fn read_le(bytes: &[u8]) -> Self;
}

macro_rules! impl_record {
    ($($ty:ty),*) => {$(
        impl Record for $ty {
            const WIDTH: usize = std::mem::size_of::<$ty>();

            #[inline]
            fn read_le(bytes: &[u8]) -> Self {
                let mut raw = [0u8; Self::WIDTH];
                raw.copy_from_slice(&bytes[..Self::WIDTH]);
                <$ty>::from_le_bytes(raw)
            }
        }
    )*};
}

impl_record!(u64, i64, f64);

/// Read-only view over an ordered record sequence.
pub trait Column<R: Record> {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Record at `idx`. Panics if out of range.
    fn get(&self, idx: usize) -> R;
}

/// In-memory column for dynamically generated test inputs.
#[derive(Debug, Clone, Default)]
pub struct MemColumn<R> {
    records: Vec<R>,
}

impl<R: Record> MemColumn<R> {
    pub fn new(records: Vec<R>) -> Self {
        Self { records }
    }

    pub fn iter(&self) -> impl Iterator<Item = R> + '_ {
        self.records.iter().copied()
    }
}

impl<R: Record> From<Vec<R>> for MemColumn<R> {
    fn from(records: Vec<R>) -> Self {
        Self::new(records)
    }
}

impl<R: Record> Column<R> for MemColumn<R> {
    fn len(&self) -> usize {
        self.records.len()
    }

    fn get(&self, idx: usize) -> R {
        self.records[idx]
    }
}

/// Column backed by a one-shot memory map of a flat binary file.
///
/// The file must be non-empty and a whole number of records long; records
/// are decoded on access, so unaligned files are fine.
#[derive(Debug)]
pub struct FileColumn<R> {
    map: Mmap,
    len: usize,
    _record: PhantomData<R>,
}

impl<R: Record> FileColumn<R> {
    /// Map `path` read-only and validate its size.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("opening column file {}", path.display()))?;

        // Safety: the map is read-only and the harness treats its input
        // files as immutable for the lifetime of the run.
        let map = unsafe { Mmap::map(&file) }
            .with_context(|| format!("mapping column file {}", path.display()))?;

        ensure!(!map.is_empty(), "column file {} is empty", path.display());
        ensure!(
            map.len() % R::WIDTH == 0,
            "column file {} is {} bytes, not a multiple of the {}-byte record",
            path.display(),
            map.len(),
            R::WIDTH
        );

        let len = map.len() / R::WIDTH;
        Ok(Self {
            map,
            len,
            _record: PhantomData,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = R> + '_ {
        (0..self.len).map(move |idx| self.get(idx))
    }
}

impl<R: Record> Column<R> for FileColumn<R> {
    fn len(&self) -> usize {
        self.len
    }

    fn get(&self, idx: usize) -> R {
        let at = idx * R::WIDTH;
        R::read_le(&self.map[at..at + R::WIDTH])
    }
}
