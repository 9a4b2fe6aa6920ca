//! SQLite store: jobs as rows of one externally owned table.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags, OptionalExtension, params};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::domain::{Channel, Job, JobType, Payload, QueueError, RetrievalMode};
use crate::ports::JobStore;
use crate::typed::PayloadCodec;

/// Names of the four columns the store reads and writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnNames {
    pub id: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub payload: String,
    pub channel: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            id: "id".to_string(),
            job_type: "type".to_string(),
            payload: "payload".to_string(),
            channel: "channel".to_string(),
        }
    }
}

/// Table the jobs live in. Supplied per deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSpec {
    pub name: String,
    pub columns: ColumnNames,
}

impl Default for TableSpec {
    fn default() -> Self {
        Self {
            name: "jobs".to_string(),
            columns: ColumnNames::default(),
        }
    }
}

impl TableSpec {
    /// Names are spliced into SQL, so each must be a plain identifier.
    pub fn validate(&self) -> Result<(), QueueError> {
        check_identifier("table name", &self.name)?;
        let columns = [
            ("id column", &self.columns.id),
            ("type column", &self.columns.job_type),
            ("payload column", &self.columns.payload),
            ("channel column", &self.columns.channel),
        ];
        for (what, name) in columns {
            check_identifier(what, name)?;
        }
        for (i, (what, name)) in columns.iter().enumerate() {
            if let Some((other, _)) = columns[i + 1..]
                .iter()
                .find(|(_, n)| n.eq_ignore_ascii_case(name))
            {
                return Err(QueueError::Validation(format!(
                    "{what} and {other} are both named {name:?}"
                )));
            }
        }
        Ok(())
    }
}

fn check_identifier(what: &str, name: &str) -> Result<(), QueueError> {
    let mut chars = name.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(QueueError::Validation(format!(
            "{what} {name:?} is not a valid SQL identifier"
        )))
    }
}

fn quote(name: &str) -> String {
    format!("\"{name}\"")
}

/// Statements built once from the table spec.
#[derive(Debug, Clone)]
struct Statements {
    insert: String,
    count: String,
    select_oldest: String,
    select_newest: String,
    delete: String,
    create_table: String,
    create_index: String,
}

impl Statements {
    fn new(table: &TableSpec) -> Self {
        let t = quote(&table.name);
        let id = quote(&table.columns.id);
        let job_type = quote(&table.columns.job_type);
        let payload = quote(&table.columns.payload);
        let channel = quote(&table.columns.channel);
        let select = |order: &str| {
            format!(
                "SELECT {id}, {job_type}, {payload} FROM {t} WHERE {channel} = ?1 \
                 ORDER BY {id} {order} LIMIT 1"
            )
        };

        Self {
            insert: format!(
                "INSERT INTO {t} ({job_type}, {payload}, {channel}) VALUES (?1, ?2, ?3)"
            ),
            count: format!("SELECT COUNT(*) FROM {t} WHERE {channel} = ?1"),
            select_oldest: select("ASC"),
            select_newest: select("DESC"),
            delete: format!("DELETE FROM {t} WHERE {id} = ?1"),
            create_table: format!(
                "CREATE TABLE IF NOT EXISTS {t} (\
                 {id} INTEGER PRIMARY KEY AUTOINCREMENT, \
                 {job_type} TEXT NOT NULL, \
                 {payload} TEXT NOT NULL, \
                 {channel} TEXT NOT NULL)"
            ),
            create_index: format!(
                "CREATE INDEX IF NOT EXISTS {} ON {t} ({channel}, {id})",
                quote(&format!("{}_{}_idx", table.name, table.columns.channel))
            ),
        }
    }

    fn select(&self, mode: RetrievalMode) -> &str {
        match mode {
            RetrievalMode::OldestFirst => &self.select_oldest,
            RetrievalMode::NewestFirst => &self.select_newest,
        }
    }
}

/// Stores jobs as rows `(id, type, payload, channel)`.
///
/// Design:
/// - The auto-increment id is the arrival order; it never leaves the store.
/// - A connection is opened per call and closed when the call returns. Only
///   `ensure_table` may create the database file; every other call expects
///   it to exist.
/// - `get` selects and deletes inside one transaction, so the row handed out
///   is the row removed.
/// - The schema belongs to the deployment. [`SqliteStore::ensure_table`] is
///   only called when asked for.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    database: PathBuf,
    table: TableSpec,
    mode: RetrievalMode,
    sql: Statements,
}

impl SqliteStore {
    pub fn new(
        database: impl Into<PathBuf>,
        table: TableSpec,
        mode: RetrievalMode,
    ) -> Result<Self, QueueError> {
        let database = database.into();
        if database.as_os_str().is_empty() {
            return Err(QueueError::Validation("database path is empty".into()));
        }
        table.validate()?;
        let sql = Statements::new(&table);
        Ok(Self {
            database,
            table,
            mode,
            sql,
        })
    }

    pub fn database(&self) -> &Path {
        &self.database
    }

    pub fn table(&self) -> &TableSpec {
        &self.table
    }

    pub fn mode(&self) -> RetrievalMode {
        self.mode
    }

    /// Create the table (and a channel index) if it does not exist yet.
    pub fn ensure_table(&self) -> Result<(), QueueError> {
        let conn = Connection::open(&self.database)?;
        conn.execute_batch(&format!(
            "{};\n{};",
            self.sql.create_table, self.sql.create_index
        ))?;
        debug!(table = %self.table.name, "table ensured");
        Ok(())
    }

    fn connect(&self) -> Result<Connection, QueueError> {
        trace!(database = %self.database.display(), "opening connection");
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        Ok(Connection::open_with_flags(&self.database, flags)?)
    }
}

impl JobStore for SqliteStore {
    fn add(
        &self,
        job_type: &JobType,
        payload: &Payload,
        channel: &Channel,
    ) -> Result<(), QueueError> {
        let encoded = PayloadCodec::encode(payload)?;
        let conn = self.connect()?;
        conn.execute(
            &self.sql.insert,
            params![job_type.as_str(), encoded, channel.as_str()],
        )?;
        debug!(channel = %channel, job_type = %job_type, "job inserted");
        Ok(())
    }

    fn get(&self, channel: &Channel) -> Result<Job, QueueError> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;

        let row = tx
            .query_row(self.sql.select(self.mode), [channel.as_str()], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })
            .optional()?;
        let Some((id, job_type, payload)) = row else {
            return Err(QueueError::not_found(channel));
        };

        // Decode before deleting so a corrupt row stays where it is.
        let job = Job::new(job_type, PayloadCodec::decode(&payload)?);
        tx.execute(&self.sql.delete, [id])?;
        tx.commit()?;

        debug!(
            channel = %channel,
            job_type = %job.job_type(),
            mode = %self.mode,
            "job taken"
        );
        Ok(job)
    }

    fn has(&self, channel: &Channel) -> Result<bool, QueueError> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row(&self.sql.count, [channel.as_str()], |row| row.get(0))?;
        Ok(count > 0)
    }
}
