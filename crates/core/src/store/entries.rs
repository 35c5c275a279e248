//! Generation and entry operations on the SQLite store.
//!
//! Implements the [`Store`] seam: generation registration and deletion, and
//! response upsert/lookup keyed by request identity.

use async_trait::async_trait;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

use super::connection::CacheDb;
use super::key::entry_key;
use super::Store;
use crate::http::{Request, Response, ResponseKind};
use crate::Error;

impl CacheDb {
    /// Number of entries stored under a generation.
    pub async fn entry_count(&self, generation: &str) -> Result<u64, Error> {
        let generation = generation.to_string();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count: i64 = conn
                    .query_row(
                        "SELECT COUNT(*) FROM entries WHERE generation = ?1",
                        params![generation],
                        |row| row.get(0),
                    )
                    .map_err(Error::from)?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}

#[async_trait]
impl Store for CacheDb {
    async fn open(&self, generation: &str) -> Result<(), Error> {
        let generation = generation.to_string();
        let created_at = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT OR IGNORE INTO generations (name, created_at) VALUES (?1, ?2)",
                    params![generation, created_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    async fn put(&self, generation: &str, request: &Request, response: &Response) -> Result<(), Error> {
        let key = entry_key(request);
        let headers_json =
            serde_json::to_string(&response.headers).map_err(|e| Error::Encode(e.to_string()))?;

        let generation = generation.to_string();
        let created_at = chrono::Utc::now().to_rfc3339();
        let method = request.method.as_str().to_string();
        let url = request.url.clone();
        let status = response.status;
        let status_text = response.status_text.clone();
        let body = response.body.clone();
        let kind = response.kind.as_str().to_string();

        self.conn
            .call(move |conn| -> Result<(), Error> {
                // A write-back may land in a generation never explicitly
                // opened; register it so the entry satisfies the foreign key.
                conn.execute(
                    "INSERT OR IGNORE INTO generations (name, created_at) VALUES (?1, ?2)",
                    params![generation, created_at],
                )?;

                conn.execute(
                    "INSERT INTO entries (
                        generation, entry_key, method, url, status, status_text,
                        headers_json, body, kind, stored_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                    ON CONFLICT(generation, entry_key) DO UPDATE SET
                        status = excluded.status,
                        status_text = excluded.status_text,
                        headers_json = excluded.headers_json,
                        body = excluded.body,
                        kind = excluded.kind,
                        stored_at = excluded.stored_at",
                    params![
                        generation,
                        key,
                        method,
                        url,
                        status,
                        status_text,
                        headers_json,
                        body,
                        kind,
                        chrono::Utc::now().to_rfc3339(),
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    async fn lookup(&self, request: &Request) -> Result<Option<Response>, Error> {
        let key = entry_key(request);
        self.conn
            .call(move |conn| -> Result<Option<Response>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT e.status, e.status_text, e.headers_json, e.body, e.kind
                     FROM entries e
                     JOIN generations g ON g.name = e.generation
                     WHERE e.entry_key = ?1
                     ORDER BY g.created_at ASC, g.name ASC
                     LIMIT 1",
                )?;

                let row = stmt.query_row(params![key], |row| {
                    Ok((
                        row.get::<_, u16>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, Vec<u8>>(3)?,
                        row.get::<_, String>(4)?,
                    ))
                });

                match row {
                    Ok((status, status_text, headers_json, body, kind)) => {
                        let headers: Vec<(String, String)> = serde_json::from_str(&headers_json)
                            .map_err(|e| Error::CorruptEntry(e.to_string()))?;
                        let kind = ResponseKind::parse(&kind)
                            .ok_or_else(|| Error::CorruptEntry(format!("unknown kind {kind:?}")))?;
                        Ok(Some(Response { status, status_text, headers, body, kind }))
                    }
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    async fn generations(&self) -> Result<Vec<String>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<String>, Error> {
                let mut stmt =
                    conn.prepare("SELECT name FROM generations ORDER BY created_at ASC, name ASC")?;
                let names = stmt
                    .query_map([], |row| row.get::<_, String>(0))?
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(Error::from)?;
                Ok(names)
            })
            .await
            .map_err(Error::from)
    }

    async fn delete(&self, generation: &str) -> Result<bool, Error> {
        let generation = generation.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                // Entries cascade via the foreign key.
                let deleted = conn
                    .execute("DELETE FROM generations WHERE name = ?1", params![generation])?;
                Ok(deleted > 0)
            })
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_response(body: &[u8]) -> Response {
        Response {
            status: 200,
            status_text: "OK".to_string(),
            headers: vec![("Content-Type".to_string(), "text/html".to_string())],
            body: body.to_vec(),
            kind: ResponseKind::Basic,
        }
    }

    #[tokio::test]
    async fn test_put_and_lookup() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let request = Request::get("https://example.com/index.html");

        db.open("assets-v1").await.unwrap();
        db.put("assets-v1", &request, &make_response(b"<html>")).await.unwrap();

        let stored = db.lookup(&request).await.unwrap().unwrap();
        assert_eq!(stored.status, 200);
        assert_eq!(stored.body, b"<html>");
        assert_eq!(stored.header("content-type"), Some("text/html"));
        assert_eq!(stored.kind, ResponseKind::Basic);
    }

    #[tokio::test]
    async fn test_lookup_miss() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let found = db.lookup(&Request::get("https://example.com/missing")).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_put_is_idempotent() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let request = Request::get("https://example.com/app.js");

        db.put("assets-v1", &request, &make_response(b"one")).await.unwrap();
        db.put("assets-v1", &request, &make_response(b"two")).await.unwrap();

        assert_eq!(db.entry_count("assets-v1").await.unwrap(), 1);
        let stored = db.lookup(&request).await.unwrap().unwrap();
        assert_eq!(stored.body, b"two");
    }

    #[tokio::test]
    async fn test_open_is_create_if_absent() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.open("assets-v1").await.unwrap();
        db.open("assets-v1").await.unwrap();
        assert_eq!(db.generations().await.unwrap(), vec!["assets-v1".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_cascades_to_entries() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let request = Request::get("https://example.com/");
        db.put("assets-v1", &request, &make_response(b"body")).await.unwrap();

        assert!(db.delete("assets-v1").await.unwrap());
        assert!(db.generations().await.unwrap().is_empty());
        assert!(db.lookup(&request).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_generation() {
        let db = CacheDb::open_in_memory().await.unwrap();
        assert!(!db.delete("assets-v0").await.unwrap());
    }

    #[tokio::test]
    async fn test_lookup_ignores_generation_from_caller() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let request = Request::get("https://example.com/shared");
        db.put("assets-v1", &request, &make_response(b"old")).await.unwrap();
        db.put("assets-v2", &request, &make_response(b"new")).await.unwrap();

        // First match in generation-creation order wins.
        let stored = db.lookup(&request).await.unwrap().unwrap();
        assert_eq!(stored.body, b"old");

        db.delete("assets-v1").await.unwrap();
        let stored = db.lookup(&request).await.unwrap().unwrap();
        assert_eq!(stored.body, b"new");
    }

    #[tokio::test]
    async fn test_method_is_part_of_identity() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let get = Request::get("https://example.com/form");
        db.put("assets-v1", &get, &make_response(b"cached")).await.unwrap();

        let head = Request::new(crate::http::Method::Head, "https://example.com/form");
        assert!(db.lookup(&head).await.unwrap().is_none());
    }
}
