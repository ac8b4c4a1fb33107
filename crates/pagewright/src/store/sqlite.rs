use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use super::{ConfigStore, TestDataSet};
use crate::locator::{LocatorDescriptor, LocatorType};
use crate::result::{PagewrightError, PagewrightResult};

/// Default table holding locator rows
pub const DEFAULT_LOCATOR_TABLE: &str = "locators";
/// Default column the locator name is matched against
pub const DEFAULT_FILTER_COLUMN: &str = "name";

const DATA_SET_TABLE: &str = "data_sets";

/// Store backed by a SQLite table keyed by (table, filter column, name).
///
/// Widget-specific fields are kept as a JSON object in the `extra` column.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    table: String,
    filter_column: String,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("table", &self.table)
            .field("filter_column", &self.filter_column)
            .finish_non_exhaustive()
    }
}

impl SqliteStore {
    /// Open or create a database with the default table layout
    pub fn open(path: impl AsRef<Path>) -> PagewrightResult<Self> {
        Self::open_table(path, DEFAULT_LOCATOR_TABLE, DEFAULT_FILTER_COLUMN)
    }

    /// Open or create a database, reading locators from `table` keyed by
    /// `filter_column`
    pub fn open_table(
        path: impl AsRef<Path>,
        table: &str,
        filter_column: &str,
    ) -> PagewrightResult<Self> {
        let conn = Connection::open(path.as_ref())?;
        let store = Self::with_connection(conn, table, filter_column)?;
        info!(path = ?path.as_ref(), table, filter_column, "opened sqlite locator store");
        Ok(store)
    }

    /// In-memory database (for testing)
    pub fn open_memory() -> PagewrightResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn, DEFAULT_LOCATOR_TABLE, DEFAULT_FILTER_COLUMN)
    }

    fn with_connection(
        conn: Connection,
        table: &str,
        filter_column: &str,
    ) -> PagewrightResult<Self> {
        check_identifier(table)?;
        check_identifier(filter_column)?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
            table: table.to_string(),
            filter_column: filter_column.to_string(),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> PagewrightResult<()> {
        let conn = self.conn.lock();
        conn.execute_batch(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {table} (
                {column} TEXT PRIMARY KEY,
                locator_type TEXT,
                locator_hook TEXT NOT NULL,
                clear_required INTEGER NOT NULL DEFAULT 0,
                extra TEXT NOT NULL DEFAULT '{{}}'
            );

            CREATE TABLE IF NOT EXISTS {DATA_SET_TABLE} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                color TEXT NOT NULL,
                text_input TEXT NOT NULL,
                pre_filled_input TEXT NOT NULL,
                color_to_change INTEGER NOT NULL
            );
            "#,
            table = self.table,
            column = self.filter_column,
        ))?;
        Ok(())
    }

    /// Insert or replace a locator row
    pub fn put_locator(&self, name: &str, descriptor: &LocatorDescriptor) -> PagewrightResult<()> {
        let conn = self.conn.lock();
        self.write_locator(&conn, name, descriptor)
    }

    /// Append a data set row
    pub fn put_data_set(&self, data_set: &TestDataSet) -> PagewrightResult<()> {
        let conn = self.conn.lock();
        write_data_set(&conn, data_set)
    }

    /// Copy every locator and data set from another store in one transaction.
    ///
    /// Locators with the same name are replaced and the existing data sets
    /// are replaced by the source's, so importing twice leaves one copy.
    pub fn import(&self, source: &impl ConfigStore) -> PagewrightResult<usize> {
        let names = source.locator_names()?;
        let mut descriptors = Vec::with_capacity(names.len());
        for name in &names {
            descriptors.push(source.locator(name)?);
        }
        let data_sets = source.test_data_sets()?;

        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        for (name, descriptor) in names.iter().zip(&descriptors) {
            self.write_locator(&tx, name, descriptor)?;
        }
        let _ = tx.execute(&format!("DELETE FROM {DATA_SET_TABLE}"), [])?;
        for data_set in &data_sets {
            write_data_set(&tx, data_set)?;
        }
        tx.commit()?;
        info!(
            locators = names.len(),
            data_sets = data_sets.len(),
            table = %self.table,
            "imported config store"
        );
        Ok(names.len())
    }

    fn write_locator(
        &self,
        conn: &Connection,
        name: &str,
        descriptor: &LocatorDescriptor,
    ) -> PagewrightResult<()> {
        let extra = serde_json::to_string(&descriptor.extra)?;
        let _ = conn.execute(
            &format!(
                "INSERT OR REPLACE INTO {} ({}, locator_type, locator_hook, clear_required, extra)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                self.table, self.filter_column
            ),
            params![
                name,
                descriptor.locator_type.map(|t| t.as_tag()),
                descriptor.locator_hook,
                descriptor.clear_required,
                extra,
            ],
        )?;
        debug!(name, table = %self.table, "stored locator");
        Ok(())
    }
}

fn write_data_set(conn: &Connection, data_set: &TestDataSet) -> PagewrightResult<()> {
    let _ = conn.execute(
        &format!(
            "INSERT INTO {DATA_SET_TABLE} (color, text_input, pre_filled_input, color_to_change)
             VALUES (?1, ?2, ?3, ?4)"
        ),
        params![
            data_set.color,
            data_set.text_input,
            data_set.pre_filled_input,
            data_set.color_to_change,
        ],
    )?;
    debug!(color = %data_set.color, "stored data set");
    Ok(())
}

impl ConfigStore for SqliteStore {
    fn locator(&self, name: &str) -> PagewrightResult<LocatorDescriptor> {
        let conn = self.conn.lock();
        let row = conn
            .query_row(
                &format!(
                    "SELECT locator_type, locator_hook, clear_required, extra FROM {} WHERE {} = ?1",
                    self.table, self.filter_column
                ),
                params![name],
                |row| {
                    Ok((
                        row.get::<_, Option<String>>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, bool>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?;

        let Some((locator_type, locator_hook, clear_required, extra)) = row else {
            return Err(PagewrightError::not_found(name));
        };
        let extra: BTreeMap<String, serde_json::Value> = serde_json::from_str(&extra)?;
        Ok(LocatorDescriptor {
            locator_type: locator_type.as_deref().map(LocatorType::from_tag),
            locator_hook,
            clear_required,
            extra,
        })
    }

    fn test_data_sets(&self) -> PagewrightResult<Vec<TestDataSet>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT color, text_input, pre_filled_input, color_to_change FROM {DATA_SET_TABLE} ORDER BY id"
        ))?;
        let rows = stmt.query_map([], |row| {
            Ok(TestDataSet {
                color: row.get(0)?,
                text_input: row.get(1)?,
                pre_filled_input: row.get(2)?,
                color_to_change: row.get(3)?,
            })
        })?;
        let mut data_sets = Vec::new();
        for row in rows {
            data_sets.push(row?);
        }
        Ok(data_sets)
    }

    fn locator_names(&self) -> PagewrightResult<Vec<String>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {column} FROM {table} ORDER BY {column}",
            table = self.table,
            column = self.filter_column
        ))?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }
}

/// Table and column names are interpolated into SQL, so only plain
/// identifiers are accepted.
fn check_identifier(ident: &str) -> PagewrightResult<()> {
    let mut chars = ident.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if valid_start && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(PagewrightError::invalid_config(format!(
            "invalid sqlite identifier: {ident:?}"
        )))
    }
}
