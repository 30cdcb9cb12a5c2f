use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use tracing::debug;

use crate::fts5_index::Fts5Index;
use crate::{DocumentRecord, Filter, FilterOp, IndexStore, IndexedDocument, Page, StoreError};

/// SQLite-backed local index. Full-text search lives in `fts5_index`.
pub struct SqliteIndex {
    conn: Connection,
}

pub(crate) const SELECT_COLUMNS: &str = "s.kind, s.uuid, s.resource, s.payload_json, s.updated_at";

impl SqliteIndex {
    /// Open an in-memory index and initialize schema.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(backend)?;
        let index = Self { conn };
        index.init().map_err(backend)?;
        Ok(index)
    }

    /// Open a file-backed index at `path` and initialize schema if absent.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path.as_ref()).map_err(backend)?;
        let index = Self { conn };
        index.init().map_err(backend)?;
        debug!(path = %path.as_ref().display(), "opened sqlite index");
        Ok(index)
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    fn init(&self) -> rusqlite::Result<()> {
        // Pragmas for durability and concurrency
        self.conn.pragma_update(None, "journal_mode", &"WAL")?;
        self.conn.pragma_update(None, "synchronous", &"FULL")?;
        self.conn.pragma_update(None, "foreign_keys", &"ON")?;

        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS searchables (
                id INTEGER PRIMARY KEY,
                kind TEXT NOT NULL,
                uuid TEXT NOT NULL,
                resource TEXT NOT NULL,
                payload_json TEXT NOT NULL,
                search_text TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE UNIQUE INDEX IF NOT EXISTS idx_searchables_kind_uuid ON searchables(kind, uuid);

            CREATE TABLE IF NOT EXISTS searchable_fields (
                document_id INTEGER NOT NULL REFERENCES searchables(id) ON DELETE CASCADE,
                field TEXT NOT NULL,
                value TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_fields_field_value ON searchable_fields(field, value);
            CREATE INDEX IF NOT EXISTS idx_fields_document ON searchable_fields(document_id);

            -- FTS5 virtual table linked to searchables via content= and rowid
            CREATE VIRTUAL TABLE IF NOT EXISTS searchables_fts USING fts5(
                search_text,
                content='searchables',
                content_rowid='id',
                tokenize = 'unicode61'
            );

            -- Triggers to keep FTS index consistent
            CREATE TRIGGER IF NOT EXISTS searchables_ai AFTER INSERT ON searchables BEGIN
                INSERT INTO searchables_fts(rowid, search_text) VALUES (new.id, new.search_text);
            END;

            CREATE TRIGGER IF NOT EXISTS searchables_ad AFTER DELETE ON searchables BEGIN
                INSERT INTO searchables_fts(searchables_fts, rowid, search_text) VALUES ('delete', old.id, old.search_text);
            END;

            CREATE TRIGGER IF NOT EXISTS searchables_au AFTER UPDATE OF search_text ON searchables BEGIN
                INSERT INTO searchables_fts(searchables_fts, rowid, search_text) VALUES ('delete', old.id, old.search_text);
                INSERT INTO searchables_fts(rowid, search_text) VALUES (new.id, new.search_text);
            END;
            "#,
        )?;
        Ok(())
    }

    /// Ensure the FTS content table is populated; rebuild if empty while documents exist.
    pub fn maybe_rebuild_fts(&self) -> Result<(), StoreError> {
        let (docs, fts) = self.counts()?;
        if docs > 0 && fts == 0 {
            self.conn
                .execute("INSERT INTO searchables_fts(searchables_fts) VALUES('rebuild')", [])
                .map_err(backend)?;
        }
        Ok(())
    }

    /// Return (documents, fts rows) for debugging.
    pub fn counts(&self) -> Result<(i64, i64), StoreError> {
        let docs: i64 = self
            .conn
            .query_row("SELECT count(*) FROM searchables", [], |r| r.get(0))
            .map_err(backend)?;
        let fts: i64 = self
            .conn
            .query_row("SELECT count(*) FROM searchables_fts", [], |r| r.get(0))
            .map_err(backend)?;
        Ok((docs, fts))
    }

    /// Distinct kinds with their document counts, for diagnostics.
    pub fn kinds(&self) -> Result<Vec<(String, i64)>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT kind, count(*) FROM searchables GROUP BY kind ORDER BY kind")
            .map_err(backend)?;
        let rows = stmt
            .query_map([], |r| Ok((r.get(0)?, r.get(1)?)))
            .map_err(backend)?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r.map_err(backend)?);
        }
        Ok(out)
    }
}

impl IndexStore for SqliteIndex {
    fn upsert_documents(&mut self, docs: &[IndexedDocument]) -> Result<(), StoreError> {
        if docs.is_empty() {
            return Ok(());
        }
        for doc in docs {
            doc.validate()?;
        }

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(backend)?;
        let now = now_iso();
        {
            let mut upsert = tx
                .prepare(
                    r#"
                INSERT INTO searchables (kind, uuid, resource, payload_json, search_text, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                ON CONFLICT(kind, uuid) DO UPDATE SET
                    resource=excluded.resource,
                    payload_json=excluded.payload_json,
                    search_text=excluded.search_text,
                    updated_at=excluded.updated_at
                ;
                "#,
                )
                .map_err(backend)?;
            let mut lookup = tx
                .prepare("SELECT id FROM searchables WHERE kind = ?1 AND uuid = ?2")
                .map_err(backend)?;
            let mut clear_fields = tx
                .prepare("DELETE FROM searchable_fields WHERE document_id = ?1")
                .map_err(backend)?;
            let mut insert_field = tx
                .prepare("INSERT INTO searchable_fields (document_id, field, value) VALUES (?1, ?2, ?3)")
                .map_err(backend)?;

            for doc in docs {
                upsert
                    .execute(params![doc.kind, doc.uuid, doc.resource, doc.payload, doc.search_text, now])
                    .map_err(backend)?;
                let id: i64 = lookup
                    .query_row(params![doc.kind, doc.uuid], |r| r.get(0))
                    .map_err(backend)?;
                clear_fields.execute(params![id]).map_err(backend)?;
                for (field, value) in &doc.fields {
                    insert_field.execute(params![id, field, value]).map_err(backend)?;
                }
            }
        }
        tx.commit().map_err(backend)?;
        debug!(count = docs.len(), kind = %docs[0].kind, "upserted documents");
        Ok(())
    }

    fn replace_document(&mut self, doc: &IndexedDocument) -> Result<(), StoreError> {
        doc.validate()?;
        let exists: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM searchables WHERE kind = ?1 AND uuid = ?2",
                params![doc.kind, doc.uuid],
                |r| r.get(0),
            )
            .optional()
            .map_err(backend)?;
        if exists.is_none() {
            return Err(StoreError::NotFound { kind: doc.kind.clone(), uuid: doc.uuid.clone() });
        }
        self.upsert_documents(std::slice::from_ref(doc))
    }

    fn get_document(&self, kind: &str, uuid: &str) -> Result<Option<DocumentRecord>, StoreError> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM searchables s WHERE s.kind = ?1 AND s.uuid = ?2");
        self.conn
            .query_row(&sql, params![kind, uuid], read_record)
            .optional()
            .map_err(backend)
    }

    fn find_documents(
        &self,
        kind: &str,
        filters: &[Filter],
        page: Option<Page>,
    ) -> Result<Vec<DocumentRecord>, StoreError> {
        let mut where_sql = String::from("WHERE s.kind = ?");
        let mut params: Vec<rusqlite::types::Value> = vec![kind.to_string().into()];
        push_filter_sql(&mut where_sql, &mut params, filters);

        let sql = format!("SELECT {SELECT_COLUMNS} FROM searchables s {where_sql} ORDER BY s.id LIMIT ? OFFSET ?");
        push_page(&mut params, page);
        debug!(kind, filters = filters.len(), "find documents");

        let mut stmt = self.conn.prepare(&sql).map_err(backend)?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(params), read_record)
            .map_err(backend)?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r.map_err(backend)?);
        }
        Ok(out)
    }

    fn search_documents(
        &self,
        kind: &str,
        query: &str,
        filters: &[Filter],
        page: Option<Page>,
    ) -> Result<Vec<DocumentRecord>, StoreError> {
        if query.trim().is_empty() {
            return self.find_documents(kind, filters, page);
        }
        Fts5Index::new().search(self, kind, query, filters, page)
    }

    fn count_documents(&self, kind: &str, filters: &[Filter]) -> Result<usize, StoreError> {
        let mut where_sql = String::from("WHERE s.kind = ?");
        let mut params: Vec<rusqlite::types::Value> = vec![kind.to_string().into()];
        push_filter_sql(&mut where_sql, &mut params, filters);
        let sql = format!("SELECT count(*) FROM searchables s {where_sql}");
        let n: i64 = self
            .conn
            .query_row(&sql, rusqlite::params_from_iter(params), |r| r.get(0))
            .map_err(backend)?;
        Ok(n as usize)
    }

    fn delete_documents(&mut self, kind: &str, uuids: &[String]) -> Result<usize, StoreError> {
        if uuids.is_empty() {
            return Ok(0);
        }
        let tx = self.conn.transaction().map_err(backend)?;
        let mut placeholders = String::from("(");
        for i in 0..uuids.len() {
            if i > 0 {
                placeholders.push(',');
            }
            placeholders.push('?');
        }
        placeholders.push(')');
        let sql = format!("DELETE FROM searchables WHERE kind = ? AND uuid IN {placeholders}");
        let mut params: Vec<&str> = Vec::with_capacity(uuids.len() + 1);
        params.push(kind);
        params.extend(uuids.iter().map(String::as_str));
        let n = tx
            .execute(&sql, rusqlite::params_from_iter(params.iter()))
            .map_err(backend)?;
        tx.commit().map_err(backend)?;
        debug!(kind, requested = uuids.len(), deleted = n, "deleted documents");
        Ok(n)
    }
}

/// Append one `EXISTS` clause per filter. Values are matched literally;
/// prefix filters compare case-insensitively.
pub(crate) fn push_filter_sql(where_sql: &mut String, params: &mut Vec<rusqlite::types::Value>, filters: &[Filter]) {
    for f in filters {
        match f.op {
            FilterOp::Prefix => {
                where_sql.push_str(
                    r" AND EXISTS (SELECT 1 FROM searchable_fields f WHERE f.document_id = s.id AND f.field = ? AND f.value LIKE ? ESCAPE '\')",
                );
                params.push(f.field.clone().into());
                params.push(format!("{}%", escape_like(&f.value)).into());
            }
            FilterOp::Eq => {
                where_sql.push_str(
                    " AND EXISTS (SELECT 1 FROM searchable_fields f WHERE f.document_id = s.id AND f.field = ? AND f.value = ?)",
                );
                params.push(f.field.clone().into());
                params.push(f.value.clone().into());
            }
        }
    }
}

pub(crate) fn push_page(params: &mut Vec<rusqlite::types::Value>, page: Option<Page>) {
    match page {
        Some(p) => {
            params.push((p.size as i64).into());
            params.push((p.offset() as i64).into());
        }
        // SQLite reads a negative LIMIT as "no limit"
        None => {
            params.push((-1i64).into());
            params.push(0i64.into());
        }
    }
}

pub(crate) fn read_record(row: &Row<'_>) -> rusqlite::Result<DocumentRecord> {
    Ok(DocumentRecord {
        kind: row.get(0)?,
        uuid: row.get(1)?,
        resource: row.get(2)?,
        payload: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

pub(crate) fn backend(e: rusqlite::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::{escape_like, SqliteIndex};
    use crate::StoreError;

    #[test]
    fn missing_fts_table_is_reported_not_rebuilt() {
        let index = SqliteIndex::open_in_memory().expect("index");
        index.conn().execute_batch("DROP TABLE searchables_fts;").expect("drop fts");
        assert!(matches!(index.counts(), Err(StoreError::Backend(_))));
        assert!(index.maybe_rebuild_fts().is_err());
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("Jane"), "Jane");
    }
}
