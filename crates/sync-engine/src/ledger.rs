// crates/sync-engine/src/ledger.rs
//! Persisted ledger of externally known identifiers
//!
//! The ledger is the only record of which mapped ids existed at the end of
//! the previous cycle; the external store cannot report deletions, so the
//! delta engine infers them from ids present here but absent from the
//! current snapshot.
//!
//! On-disk format: one u32 count followed by that many u32 identifiers,
//! fixed width, native byte order, no version tag or checksum. A file
//! shorter than its declared count is read as far as it goes and reported
//! as truncated rather than rejected, so a crash mid-write never blocks
//! future synchronization.

use crate::error::{SyncError, SyncResult};
use serde::Serialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use tasklink_core::MappedId;

const ID_WIDTH: usize = 4;

/// Outcome of loading the ledger file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LedgerStatus {
    /// Every identifier the header declared was present
    Complete,
    /// No ledger file existed; treated as an empty ledger
    Missing,
    /// The file ended before the declared count was reached
    Truncated { declared: u32, read: u32 },
}

impl LedgerStatus {
    /// Returns true if fewer identifiers were read than declared
    pub fn is_partial(&self) -> bool {
        matches!(self, Self::Truncated { .. })
    }
}

/// The identifier set restored from disk, plus how the read went
#[derive(Debug, Clone)]
pub struct LedgerSnapshot {
    pub ids: HashSet<MappedId>,
    pub status: LedgerStatus,
}

impl LedgerSnapshot {
    fn missing() -> Self {
        Self {
            ids: HashSet::new(),
            status: LedgerStatus::Missing,
        }
    }
}

/// Persists and restores the set of identifiers known as of the last cycle
pub struct SyncLedger {
    path: PathBuf,
}

impl SyncLedger {
    /// Creates a ledger handle for the given file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the ledger file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Restores the identifier set from disk
    ///
    /// Never fails: a missing or unreadable file degrades to an empty
    /// ledger, and a file shorter than its declared count yields exactly
    /// the identifiers physically present with a [`LedgerStatus::Truncated`]
    /// marker. At worst a real deletion goes undetected for one cycle.
    pub fn load(&self) -> LedgerSnapshot {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("No ledger at {}, starting empty", self.path.display());
                return LedgerSnapshot::missing();
            }
            Err(e) => {
                log::warn!(
                    "Ledger at {} unreadable ({}), treating as empty",
                    self.path.display(),
                    e
                );
                return LedgerSnapshot::missing();
            }
        };
        let mut reader = BufReader::new(file);

        let mut field = [0u8; ID_WIDTH];
        // A file too short to hold its own header carries no usable data.
        if reader.read_exact(&mut field).is_err() {
            log::warn!(
                "Ledger at {} has no readable header, treating as empty",
                self.path.display()
            );
            return LedgerSnapshot {
                ids: HashSet::new(),
                status: LedgerStatus::Complete,
            };
        }
        let declared = u32::from_ne_bytes(field);

        // Read one fixed-width field at a time until the declared count or
        // EOF, whichever comes first. The declared count never sizes an
        // allocation; it only bounds the loop.
        let mut ids = HashSet::new();
        let mut read = 0u32;
        while read < declared {
            match reader.read_exact(&mut field) {
                Ok(()) => {
                    ids.insert(MappedId::new(u32::from_ne_bytes(field)));
                    read += 1;
                }
                Err(_) => break,
            }
        }

        let status = if read == declared {
            LedgerStatus::Complete
        } else {
            log::warn!(
                "Ledger at {} declared {} ids but held {}; deletions may be under-reported this cycle",
                self.path.display(),
                declared,
                read
            );
            LedgerStatus::Truncated { declared, read }
        };

        LedgerSnapshot { ids, status }
    }

    /// Writes the identifier set, replacing any previous ledger
    ///
    /// The write is direct, not staged through a temporary file: a crash
    /// mid-write leaves a short ledger, which the next `load` absorbs.
    pub fn save(&self, ids: &HashSet<MappedId>) -> SyncResult<()> {
        let file = File::create(&self.path).map_err(|e| SyncError::LedgerWrite {
            path: self.path.clone(),
            source: e,
        })?;
        let mut writer = BufWriter::new(file);

        let count = ids.len() as u32;
        self.write_field(&mut writer, count)?;
        for id in ids {
            self.write_field(&mut writer, id.as_u32())?;
        }

        writer.flush().map_err(|e| SyncError::LedgerWrite {
            path: self.path.clone(),
            source: e,
        })?;

        log::debug!("Saved {} ids to ledger at {}", count, self.path.display());
        Ok(())
    }

    fn write_field(&self, writer: &mut impl Write, value: u32) -> SyncResult<()> {
        writer
            .write_all(&value.to_ne_bytes())
            .map_err(|e| SyncError::LedgerWrite {
                path: self.path.clone(),
                source: e,
            })
    }
}
