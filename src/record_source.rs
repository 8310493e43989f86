use std::path::{Path, PathBuf};

use rusqlite::{named_params, Connection, OpenFlags, Row, Rows, Statement};

use crate::error::{ExtractError, Result};
use crate::model::RawRow;
use crate::signal::SignalKind;

/// Seconds between the Unix epoch and 2001-01-01T00:00:00Z, the reference
/// date of `ZLOGGEDTIME.ZTIME`.
pub const CORE_DATA_EPOCH_OFFSET: i64 = 978_307_200;

const SELECT_ROWS_SQL: &str = r#"
    SELECT
        CAST(t.ZTIME AS INTEGER) + :epoch AS timestamp,
        d.Z_FOK_TIMESTAMP AS zfok_timestamp,
        d.ZVALUE AS value
    FROM ZLOGGEDDATA d
    INNER JOIN ZLOGGEDTIME t ON d.ZTIMESTAMP = t.Z_PK
    WHERE d.ZTYPE = :ztype
    ORDER BY timestamp ASC, zfok_timestamp ASC
"#;

/// Read-only handle on a vital log database, shared by all streams.
///
/// A `rusqlite::Connection` cannot be used from two threads at once, so each
/// stream calls [`VitalStore::connect`] and prepares its own statement.
#[derive(Debug, Clone)]
pub struct VitalStore {
    path: PathBuf,
}

impl VitalStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        std::fs::metadata(path).map_err(|e| ExtractError::access(path, e))?;
        let store = Self {
            path: path.to_path_buf(),
        };
        // Fail early on files sqlite refuses to open at all.
        store.connect()?;
        Ok(store)
    }

    pub fn connect(&self) -> Result<Connection> {
        Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| ExtractError::access(&self.path, e))
    }
}

pub fn prepare_rows(conn: &Connection) -> Result<Statement<'_>> {
    conn.prepare(SELECT_ROWS_SQL).map_err(ExtractError::Query)
}

/// Runs the prepared statement for one signal kind. Rows come back ordered
/// by `(timestamp, zfok_timestamp)` and are decoded lazily.
pub fn query_rows<'s>(stmt: &'s mut Statement<'_>, kind: SignalKind) -> Result<RowStream<'s>> {
    let rows = stmt
        .query(named_params! {
            ":epoch": CORE_DATA_EPOCH_OFFSET,
            ":ztype": kind.type_code(),
        })
        .map_err(ExtractError::Query)?;
    Ok(RowStream { rows })
}

pub struct RowStream<'s> {
    rows: Rows<'s>,
}

impl Iterator for RowStream<'_> {
    type Item = Result<RawRow>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.rows.next() {
            Ok(Some(row)) => Some(decode_row(row)),
            Ok(None) => None,
            Err(e) => Some(Err(ExtractError::Query(e))),
        }
    }
}

fn decode_row(row: &Row<'_>) -> Result<RawRow> {
    let decode = |row: &Row<'_>| -> rusqlite::Result<RawRow> {
        Ok(RawRow {
            timestamp: row.get("timestamp")?,
            zfok_timestamp: row.get("zfok_timestamp")?,
            value: row.get("value")?,
        })
    };
    decode(row).map_err(ExtractError::Decode)
}
