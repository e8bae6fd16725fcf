// ── Lexicon Store: Tag Taxonomy ────────────────────────────────────────────
// Tag groups plus per-word tag sets.
//
// Word tags live comma-joined in `words.tags`; the FTS copy is space-joined
// so every tag is an individually matchable token. Tag search uses a fixed
// template with one bound `AND w.tags LIKE ?` per tag — parameters only,
// never string-spliced values.

use super::dictionaries::{map_word_row, word_definitions, word_example_refs};
use super::{fts_tags, join_tags, split_tags, LexiconStore};
use crate::atoms::constants::SEARCH_RESULT_LIMIT;
use crate::atoms::error::EngineResult;
use crate::atoms::types::{SearchResult, TagGroup};
use rusqlite::{params, Connection, OptionalExtension};

impl LexiconStore {
    /// Create a tag group with its tags. Fails if the group already exists.
    pub fn create_tag_group(
        &self,
        name: &str,
        description: &str,
        tags: &[String],
    ) -> EngineResult<()> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO tag_groups (name, description) VALUES (?1, ?2)",
            params![name, description],
        )?;
        for tag in tags {
            tx.execute(
                "INSERT INTO tag_group_entries (group_name, tag) VALUES (?1, ?2)",
                params![name, tag],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    /// Every tag group with its tags, highest priority first.
    pub fn get_tag_groups(&self) -> EngineResult<Vec<TagGroup>> {
        let conn = self.conn.lock();
        let mut group_stmt =
            conn.prepare("SELECT name, description FROM tag_groups ORDER BY priority DESC")?;
        let groups: Vec<(String, Option<String>)> = group_stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<_, _>>()?;

        let mut tag_stmt =
            conn.prepare("SELECT tag FROM tag_group_entries WHERE group_name = ?1 ORDER BY tag")?;
        groups
            .into_iter()
            .map(|(name, description)| {
                let tags = tag_stmt
                    .query_map([&name], |row| row.get(0))?
                    .collect::<Result<_, _>>()?;
                Ok(TagGroup {
                    name,
                    description,
                    tags,
                })
            })
            .collect()
    }

    /// Union the given tags into a word's tag set.
    pub fn add_tags(&self, word_id: &str, tags: &[String]) -> EngineResult<()> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        add_tags_on(&tx, word_id, tags)?;
        tx.commit()?;
        Ok(())
    }

    /// Remove the given tags from a word's tag set.
    pub fn remove_tags(&self, word_id: &str, tags: &[String]) -> EngineResult<()> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        let current = current_tags(&tx, word_id)?;
        let updated: Vec<String> = current
            .into_iter()
            .filter(|t| !tags.contains(t))
            .collect();
        write_tags(&tx, word_id, &updated)?;

        tx.commit()?;
        Ok(())
    }

    /// Words carrying every one of the given tags, from enabled
    /// dictionaries, ranked by frequency.
    pub fn search_by_tags(&self, tags: &[String]) -> EngineResult<Vec<SearchResult>> {
        let conn = self.conn.lock();

        let mut sql = String::from(
            "SELECT w.id, w.word, w.reading, w.pos, w.frequency, w.dictionary, w.tags
             FROM words w
             JOIN dictionaries dict ON w.dictionary = dict.title
             WHERE dict.enabled = 1",
        );
        let mut bound: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();
        for tag in tags {
            sql.push_str(&format!(" AND w.tags LIKE ?{}", bound.len() + 1));
            bound.push(Box::new(format!("%{tag}%")));
        }
        sql.push_str(&format!(
            " GROUP BY w.id ORDER BY w.frequency DESC NULLS LAST LIMIT ?{}",
            bound.len() + 1
        ));
        bound.push(Box::new(SEARCH_RESULT_LIMIT));

        let mut stmt = conn.prepare(&sql)?;
        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            bound.iter().map(|b| b.as_ref()).collect();
        let base: Vec<SearchResult> = stmt
            .query_map(params_ref.as_slice(), map_word_row)?
            .collect::<Result<_, _>>()?;

        base.into_iter()
            .map(|mut result| {
                result.definitions = word_definitions(&conn, &result.id)?;
                result.examples = word_example_refs(&conn, &result.id)?;
                Ok(result)
            })
            .collect()
    }
}

// ── Transaction-scoped helpers (shared with proficiency assignment) ────────

pub(crate) fn add_tags_on(conn: &Connection, word_id: &str, tags: &[String]) -> EngineResult<()> {
    let mut updated = current_tags(conn, word_id)?;
    for tag in tags {
        if !updated.contains(tag) {
            updated.push(tag.clone());
        }
    }
    write_tags(conn, word_id, &updated)
}

fn current_tags(conn: &Connection, word_id: &str) -> EngineResult<Vec<String>> {
    let column: Option<Option<String>> = conn
        .query_row("SELECT tags FROM words WHERE id = ?1", [word_id], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(split_tags(column.flatten()))
}

fn write_tags(conn: &Connection, word_id: &str, tags: &[String]) -> EngineResult<()> {
    conn.execute(
        "UPDATE words SET tags = ?1 WHERE id = ?2",
        params![join_tags(tags), word_id],
    )?;
    conn.execute(
        "UPDATE word_fts SET tags = ?1
         WHERE word IN (SELECT word FROM words WHERE id = ?2)",
        params![fts_tags(tags), word_id],
    )?;
    Ok(())
}
