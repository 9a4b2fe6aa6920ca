//! Flat-file store: one append-only record file per channel.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};

use super::record::{self, Row};
use crate::domain::{Channel, Job, JobType, Payload, QueueError, RetrievalMode};
use crate::ports::JobStore;
use crate::typed::PayloadCodec;

const EXTENSION: &str = "job";
const TEMP_SUFFIX: &str = ".temp";

/// Stores each channel as `<folder>/<channel>.job`, one record per job.
///
/// Design:
/// - `add` only ever appends.
/// - `get` writes the remaining records to `<channel>.job.temp` and renames it
///   over the channel file. The rename is the single commit point; until it
///   happens the channel file keeps its full previous content.
/// - Records that stay are copied verbatim; only their terminator is
///   normalized to `\n`.
#[derive(Debug, Clone)]
pub struct FileStore {
    folder: PathBuf,
    mode: RetrievalMode,
}

impl FileStore {
    pub fn new(folder: impl Into<PathBuf>, mode: RetrievalMode) -> Self {
        Self {
            folder: folder.into(),
            mode,
        }
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn mode(&self) -> RetrievalMode {
        self.mode
    }

    pub fn channel_path(&self, channel: &Channel) -> PathBuf {
        self.folder.join(format!("{channel}.{EXTENSION}"))
    }

    fn temp_path(&self, channel: &Channel) -> PathBuf {
        let mut path = self.channel_path(channel).into_os_string();
        path.push(TEMP_SUFFIX);
        PathBuf::from(path)
    }

    fn read_rows(path: &Path) -> Result<(String, Vec<Row>), QueueError> {
        let text = String::from_utf8(fs::read(path)?).map_err(|e| {
            QueueError::Decoding(format!("{} is not valid UTF-8: {e}", path.display()))
        })?;
        let rows = record::parse_rows(&text)
            .map_err(|e| QueueError::Decoding(format!("{}: {e}", path.display())))?;
        Ok((text, rows))
    }

    fn row_to_job(path: &Path, row: &Row) -> Result<Job, QueueError> {
        let [job_type, payload] = row.fields.as_slice() else {
            return Err(QueueError::Decoding(format!(
                "{}: line {}: expected 2 fields, found {}",
                path.display(),
                row.line,
                row.fields.len()
            )));
        };
        Ok(Job::new(job_type.as_str(), PayloadCodec::decode(payload)?))
    }

    /// Replace the channel file with every record except `rows[skip]`.
    fn rewrite_without(
        &self,
        channel: &Channel,
        text: &str,
        rows: &[Row],
        skip: usize,
    ) -> Result<(), QueueError> {
        let target = self.channel_path(channel);
        let pending = PendingRewrite::new(self.temp_path(channel));

        let mut writer = BufWriter::new(File::create(pending.path())?);
        for (index, row) in rows.iter().enumerate() {
            if index == skip {
                continue;
            }
            writer.write_all(text[row.span.clone()].as_bytes())?;
            writer.write_all(b"\n")?;
        }
        let file = writer.into_inner().map_err(io::IntoInnerError::into_error)?;
        file.sync_all()?;
        drop(file);

        trace!(
            channel = %channel,
            remaining = rows.len() - 1,
            path = %target.display(),
            "committing channel rewrite"
        );
        pending.commit(&target)?;
        Ok(())
    }
}

impl JobStore for FileStore {
    fn add(
        &self,
        job_type: &JobType,
        payload: &Payload,
        channel: &Channel,
    ) -> Result<(), QueueError> {
        let encoded = PayloadCodec::encode(payload)?;
        let path = self.channel_path(channel);

        let mut file = OpenOptions::new()
            .read(true)
            .create(true)
            .append(true)
            .open(&path)?;
        terminate_last_record(&mut file)?;
        record::write_row(&mut file, &[job_type.as_str(), &encoded])?;

        debug!(channel = %channel, job_type = %job_type, "job appended");
        Ok(())
    }

    fn get(&self, channel: &Channel) -> Result<Job, QueueError> {
        if !self.has(channel)? {
            return Err(QueueError::not_found(channel));
        }

        let path = self.channel_path(channel);
        let (text, rows) = Self::read_rows(&path)?;
        let selected = match self.mode {
            RetrievalMode::OldestFirst => 0,
            RetrievalMode::NewestFirst => rows.len().saturating_sub(1),
        };
        // Only blank lines: nothing to hand out, and nothing is rewritten.
        let Some(row) = rows.get(selected) else {
            return Err(QueueError::not_found(channel));
        };

        // Decode before committing so a corrupt record leaves the file as it was.
        let job = Self::row_to_job(&path, row)?;
        self.rewrite_without(channel, &text, &rows, selected)?;

        debug!(
            channel = %channel,
            job_type = %job.job_type(),
            mode = %self.mode,
            "job taken"
        );
        Ok(job)
    }

    fn has(&self, channel: &Channel) -> Result<bool, QueueError> {
        match fs::metadata(self.channel_path(channel)) {
            Ok(meta) => Ok(meta.is_file() && meta.len() > 0),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// Append a `\n` if the file is non-empty and its last byte is not one, so a
/// new record never joins an unterminated last line.
fn terminate_last_record(file: &mut File) -> io::Result<()> {
    if file.metadata()?.len() == 0 {
        return Ok(());
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    if last[0] != b'\n' {
        trace!("terminating unterminated last record");
        file.write_all(b"\n")?;
    }
    Ok(())
}

/// Temp file that is removed on drop unless it was committed by rename.
struct PendingRewrite {
    path: PathBuf,
    committed: bool,
}

impl PendingRewrite {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            committed: false,
        }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn commit(mut self, target: &Path) -> io::Result<()> {
        fs::rename(&self.path, target)?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for PendingRewrite {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        if let Err(e) = fs::remove_file(&self.path)
            && e.kind() != io::ErrorKind::NotFound
        {
            warn!(path = %self.path.display(), error = %e, "failed to remove temp file");
        }
    }
}
