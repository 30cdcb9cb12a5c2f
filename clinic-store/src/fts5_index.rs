use tracing::debug;

use crate::sqlite_index::{backend, push_filter_sql, push_page, read_record, SqliteIndex, SELECT_COLUMNS};
use crate::{DocumentRecord, Filter, Page, StoreError};

/// FTS5-backed text search over the SQLite index.
/// Index maintenance is handled by SQLite triggers in the store.
#[derive(Default)]
pub struct Fts5Index;

impl Fts5Index {
    pub fn new() -> Self {
        Self
    }

    /// Rank documents of `kind` against an FTS5 query, applying field filters
    /// in the same statement. The query is handed to FTS5 verbatim, so its
    /// operators (`AND`, `OR`, `"phrase"`, `term*`) are available to callers.
    pub fn search(
        &self,
        index: &SqliteIndex,
        kind: &str,
        query: &str,
        filters: &[Filter],
        page: Option<Page>,
    ) -> Result<Vec<DocumentRecord>, StoreError> {
        let mut where_sql = String::from("WHERE searchables_fts MATCH ? AND s.kind = ?");
        let mut params: Vec<rusqlite::types::Value> = vec![query.to_string().into(), kind.to_string().into()];
        push_filter_sql(&mut where_sql, &mut params, filters);

        let sql = format!(
            "SELECT {SELECT_COLUMNS} \n\
             FROM searchables_fts \n\
             JOIN searchables s ON s.id = searchables_fts.rowid \n\
             {where_sql} \n\
             ORDER BY bm25(searchables_fts), s.id LIMIT ? OFFSET ?"
        );
        push_page(&mut params, page);
        debug!(kind, query, filters = filters.len(), "fts5 search");

        let conn = index.conn();
        let mut stmt = conn.prepare(&sql).map_err(classify)?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(params), read_record)
            .map_err(classify)?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r.map_err(classify)?);
        }
        Ok(out)
    }

    /// Number of FTS rows matching `query` regardless of kind (for debugging).
    pub fn match_count(&self, index: &SqliteIndex, query: &str) -> Result<i64, StoreError> {
        index
            .conn()
            .query_row(
                "SELECT count(*) FROM searchables_fts WHERE searchables_fts MATCH ?1",
                [query],
                |r| r.get(0),
            )
            .map_err(classify)
    }
}

/// FTS5 reports malformed MATCH expressions as generic `SQLITE_ERROR`s. The
/// statement text is fixed, so that code means the query was rejected;
/// the message check covers builds that report otherwise.
fn classify(e: rusqlite::Error) -> StoreError {
    if let rusqlite::Error::SqliteFailure(err, _) = &e {
        if err.code == rusqlite::ErrorCode::Unknown {
            return StoreError::QuerySyntax(e.to_string());
        }
    }
    let msg = e.to_string();
    if msg.contains("fts5") || msg.contains("syntax error") || msg.contains("no such column") || msg.contains("unterminated string") {
        StoreError::QuerySyntax(msg)
    } else {
        backend(e)
    }
}

#[cfg(test)]
mod tests {
    use super::classify;
    use crate::StoreError;

    #[test]
    fn generic_sqlite_error_is_query_syntax() {
        let err = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_ERROR),
            Some("fts5: syntax error near \"\"".into()),
        );
        assert!(matches!(classify(err), StoreError::QuerySyntax(_)));
    }

    #[test]
    fn other_failures_stay_backend_errors() {
        let busy = rusqlite::Error::SqliteFailure(rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY), None);
        assert!(matches!(classify(busy), StoreError::Backend(_)));
        assert!(matches!(classify(rusqlite::Error::QueryReturnedNoRows), StoreError::Backend(_)));
    }
}
