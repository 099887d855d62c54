//! File-backed append-only anomaly log.

use std::collections::VecDeque;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use detection_spi::AnomalyRecord;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tokio::sync::{watch, Mutex};

use crate::error::{Result, StoreError};

/// Durable append-only log of anomaly records.
///
/// A single writer appends; any number of readers replay or tail
/// concurrently through independent file handles. Every successful append
/// publishes the new committed length on a watch channel, so tailers wake
/// promptly instead of polling.
pub struct AnomalyLog {
    path: PathBuf,
    writer: Mutex<File>,
    committed_tx: watch::Sender<u64>,
}

impl AnomalyLog {
    /// Open (or create) the log at `path`.
    ///
    /// If a previous process died mid-write and left a torn trailing line,
    /// a newline is appended first so the torn bytes cannot merge with the
    /// next record.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut writer = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(StoreError::Open)?;

        let len = writer.metadata().await.map_err(StoreError::Open)?.len();
        let mut committed = len;
        if len > 0 && !ends_with_newline(&path).await? {
            writer.write_all(b"\n").await.map_err(StoreError::Open)?;
            writer.flush().await.map_err(StoreError::Open)?;
            committed = len + 1;
            tracing::warn!(path = %path.display(), "repaired torn trailing line in anomaly log");
        }

        let (committed_tx, _) = watch::channel(committed);
        Ok(Self {
            path,
            writer: Mutex::new(writer),
            committed_tx,
        })
    }

    /// Path of the underlying log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Durably persist one record; returns the byte offset just past it.
    ///
    /// Safe to call while any number of readers replay or tail. On error
    /// the record is not in storage; the caller decides whether that is
    /// fatal (the ingest pipeline treats it as a warning and carries on).
    pub async fn append(&self, record: &AnomalyRecord) -> Result<u64> {
        let mut line = serde_json::to_vec(record).map_err(StoreError::Encode)?;
        line.push(b'\n');

        let mut writer = self.writer.lock().await;
        writer.write_all(&line).await.map_err(StoreError::Append)?;
        writer.flush().await.map_err(StoreError::Append)?;
        // Append mode leaves the cursor at end-of-file, which stays correct
        // even if an operator truncated the file underneath us.
        let end = writer.stream_position().await.map_err(StoreError::Append)?;
        drop(writer);

        self.committed_tx.send_replace(end);
        Ok(end)
    }

    /// Committed length in bytes, the offset new tails should start from
    /// to see only subsequent records.
    pub fn committed(&self) -> u64 {
        *self.committed_tx.borrow()
    }

    /// Replay every record from the start of the log, in append order.
    ///
    /// A torn trailing line (no newline terminator yet) is not an error;
    /// it is simply not visible yet.
    pub async fn read_all(&self) -> Result<Vec<AnomalyRecord>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(StoreError::Read(err)),
        };
        let (records, _) = parse_complete_lines(&bytes, 0);
        Ok(records)
    }

    /// Tail the log, producing records appended beyond `from_offset`.
    ///
    /// The cursor is restartable: persist an offset returned by
    /// [`AnomalyLog::append`] or [`AnomalyLog::committed`] and reopen from
    /// it later.
    pub fn tail(&self, from_offset: u64) -> Tail {
        Tail {
            path: self.path.clone(),
            offset: from_offset,
            wakeup: self.committed_tx.subscribe(),
            pending: VecDeque::new(),
        }
    }
}

/// Lazy cursor over records appended beyond a byte offset.
///
/// Waits (no busy-poll) while caught up and wakes promptly after each
/// append. Tolerates torn trailing lines by holding them until the
/// newline arrives, and survives external truncation by resuming from the
/// new end of file.
pub struct Tail {
    path: PathBuf,
    offset: u64,
    wakeup: watch::Receiver<u64>,
    pending: VecDeque<AnomalyRecord>,
}

impl Tail {
    /// Current byte offset; save it to restart the tail later.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Next record, or `None` once the owning log has been dropped and the
    /// file holds nothing further.
    pub async fn next(&mut self) -> Result<Option<AnomalyRecord>> {
        loop {
            if let Some(record) = self.pending.pop_front() {
                return Ok(Some(record));
            }

            let len = match tokio::fs::metadata(&self.path).await {
                Ok(meta) => meta.len(),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => 0,
                Err(err) => return Err(StoreError::Read(err)),
            };

            if len < self.offset {
                tracing::warn!(
                    path = %self.path.display(),
                    offset = self.offset,
                    len,
                    "anomaly log truncated externally; resuming from new end"
                );
                self.offset = len;
            }

            if len > self.offset {
                let (records, consumed) = self.read_from_offset(len).await?;
                self.offset += consumed;
                if !records.is_empty() {
                    self.pending.extend(records);
                    continue;
                }
                // Only a torn line so far; wait for its newline.
            }

            if self.wakeup.changed().await.is_err() {
                return Ok(None);
            }
        }
    }

    async fn read_from_offset(&self, len: u64) -> Result<(Vec<AnomalyRecord>, u64)> {
        let mut file = File::open(&self.path).await.map_err(StoreError::Read)?;
        file.seek(SeekFrom::Start(self.offset))
            .await
            .map_err(StoreError::Read)?;
        let mut buf = Vec::with_capacity((len - self.offset) as usize);
        file.take(len - self.offset)
            .read_to_end(&mut buf)
            .await
            .map_err(StoreError::Read)?;
        Ok(parse_complete_lines(&buf, self.offset))
    }
}

async fn ends_with_newline(path: &Path) -> Result<bool> {
    let mut file = File::open(path).await.map_err(StoreError::Open)?;
    file.seek(SeekFrom::End(-1)).await.map_err(StoreError::Open)?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last).await.map_err(StoreError::Open)?;
    Ok(last[0] == b'\n')
}

/// Parse every newline-terminated record in `buf`; returns the records and
/// the number of bytes consumed. Unterminated trailing bytes are left
/// unconsumed. Complete lines that do not parse (crash debris, editor
/// droppings) are skipped with a warning so one bad line cannot poison
/// replay.
fn parse_complete_lines(buf: &[u8], base_offset: u64) -> (Vec<AnomalyRecord>, u64) {
    let mut records = Vec::new();
    let mut consumed = 0u64;
    for line in buf.split_inclusive(|&b| b == b'\n') {
        if line.last() != Some(&b'\n') {
            break;
        }
        let body = &line[..line.len() - 1];
        if !body.is_empty() {
            match serde_json::from_slice(body) {
                Ok(record) => records.push(record),
                Err(err) => tracing::warn!(
                    offset = base_offset + consumed,
                    error = %err,
                    "skipping unparseable anomaly log line"
                ),
            }
        }
        consumed += line.len() as u64;
    }
    (records, consumed)
}
