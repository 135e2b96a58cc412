//! Chunk record storage
//!
//! Implements [`ChunkStore`] on top of the `chunk_records` table.

use super::vectors::{bytes_to_embedding, cosine_similarity, embedding_to_bytes};
use super::Database;
use crate::error::Result;
use crate::index::{check_aligned, Chunk, ChunkMetadata, ChunkStore, ScoredChunk};
use chrono::Utc;
use rusqlite::params;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Record counts for one scope
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ScopeStats {
    pub scope: String,
    pub documents: usize,
    pub chunks: usize,
}

impl ChunkStore for Database {
    fn store_chunks(
        &self,
        scope: &str,
        path: &str,
        content_hash: &str,
        chunks: &[Chunk],
        embeddings: &[Vec<f32>],
    ) -> Result<()> {
        check_aligned(path, chunks, embeddings)?;
        if chunks.is_empty() {
            return Ok(());
        }

        let now = Utc::now().to_rfc3339();
        self.transaction(|conn| {
            // Leftovers from an earlier version must not survive alongside new rows
            conn.execute(
                "DELETE FROM chunk_records WHERE scope = ?1 AND path = ?2",
                params![scope, path],
            )?;

            let mut stmt = conn.prepare(
                "INSERT INTO chunk_records
                 (scope, path, chunk_index, content_hash, content, embedding, metadata, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for (chunk, embedding) in chunks.iter().zip(embeddings) {
                let metadata = serde_json::to_string(&ChunkMetadata::new(path, content_hash, chunk))?;
                stmt.execute(params![
                    scope,
                    path,
                    chunk.chunk_index as i64,
                    content_hash,
                    chunk.content,
                    embedding_to_bytes(embedding),
                    metadata,
                    now,
                ])?;
            }
            Ok(())
        })?;

        debug!(scope, path, chunks = chunks.len(), "stored chunk records");
        Ok(())
    }

    fn delete_chunks(&self, scope: &str, path: &str) -> Result<usize> {
        let deleted = self.conn.execute(
            "DELETE FROM chunk_records WHERE scope = ?1 AND path = ?2",
            params![scope, path],
        )?;
        Ok(deleted)
    }

    fn recorded_hashes(&self, scope: &str) -> Result<HashMap<String, String>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT path, content_hash FROM chunk_records WHERE scope = ?1",
        )?;

        let hashes = stmt
            .query_map(params![scope], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<std::result::Result<HashMap<_, _>, _>>()?;

        Ok(hashes)
    }

    fn query_similar(
        &self,
        scope: &str,
        query_vector: &[f32],
        allowed_paths: &[String],
        top_k: usize,
    ) -> Result<Vec<ScoredChunk>> {
        if allowed_paths.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }
        let allowed: HashSet<&str> = allowed_paths.iter().map(String::as_str).collect();

        let mut stmt = self.conn.prepare(
            "SELECT path, content, embedding, metadata FROM chunk_records WHERE scope = ?1",
        )?;
        let rows = stmt
            .query_map(params![scope], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Vec<u8>>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut scored = Vec::new();
        for (path, content, embedding, metadata) in rows {
            if !allowed.contains(path.as_str()) {
                continue;
            }
            let score = cosine_similarity(query_vector, &bytes_to_embedding(&embedding));
            scored.push(ScoredChunk {
                content,
                score,
                metadata: serde_json::from_str(&metadata)?,
            });
        }

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(top_k);
        Ok(scored)
    }
}

impl Database {
    /// Document and chunk counts per scope, ordered by scope
    pub fn scope_stats(&self) -> Result<Vec<ScopeStats>> {
        let mut stmt = self.conn.prepare(
            "SELECT scope, COUNT(DISTINCT path), COUNT(*)
             FROM chunk_records GROUP BY scope ORDER BY scope",
        )?;

        let stats = stmt
            .query_map([], |row| {
                Ok(ScopeStats {
                    scope: row.get(0)?,
                    documents: row.get::<_, i64>(1)? as usize,
                    chunks: row.get::<_, i64>(2)? as usize,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(stats)
    }

    /// Stored chunks of one document in chunk order
    pub fn get_document_chunks(&self, scope: &str, path: &str) -> Result<Vec<ChunkMetadata>> {
        let mut stmt = self.conn.prepare(
            "SELECT metadata FROM chunk_records
             WHERE scope = ?1 AND path = ?2 ORDER BY chunk_index",
        )?;

        let rows = stmt
            .query_map(params![scope, path], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.iter()
            .map(|m| serde_json::from_str(m).map_err(Into::into))
            .collect()
    }
}
