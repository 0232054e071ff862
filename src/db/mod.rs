use crate::activity;
use crate::errors::{AppError, AppResult};
use crate::models::{
    Affirmation, AffirmationLog, Answer, CreativityEntry, GratitudeEntry, GratitudeItem, Question,
};
use chrono::{DateTime, Duration, Utc};
use rand::seq::IndexedRandom;
use rusqlite::{params, Connection, OptionalExtension};
use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const SCHEMA_SQL: &str = include_str!("schema.sql");

const MAX_GRATITUDE_ITEMS_PER_DAY: i64 = 5;

const DEFAULT_QUESTIONS: [&str; 40] = [
    "What am I grateful for today?",
    "What's something I learned recently?",
    "What's a challenge I'm currently facing and how can I overcome it?",
    "What brings me joy in my daily life?",
    "What's one small step I can take today towards my biggest goal?",
    "How can I be kinder to myself today?",
    "What's something I appreciate about my body?",
    "What's a belief I hold that might be limiting me?",
    "If I had unlimited resources, what would I do with my life?",
    "What relationships in my life deserve more attention?",
    "What is one small victory I can celebrate about myself today?",
    "How have my priorities shifted in the past year, and what does that reveal about my growth?",
    "What negative thought pattern do I want to release, and what would I replace it with?",
    "When did I last feel truly at peace, and how can I create more of those moments?",
    "What advice would my future self, 10 years from now, give to me today?",
    "Which of my personal strengths have I been underutilizing lately?",
    "What fear has been holding me back, and what's one small way I could face it?",
    "Who has positively influenced me recently, and what qualities of theirs do I admire?",
    "What boundaries do I need to establish or reinforce in my life right now?",
    "When do I feel most authentically myself, and how can I bring more of that into my daily life?",
    "What am I holding onto that no longer serves my growth or happiness?",
    "How do I typically respond to failure, and how might I respond more constructively?",
    "What skill or area of knowledge would I like to develop further, and why?",
    "What does 'success' mean to me right now, beyond external achievements?",
    "Which aspects of my life feel balanced, and which need more attention?",
    "What simple pleasures or small joys am I overlooking in my daily routine?",
    "How has a recent challenge changed my perspective or made me stronger?",
    "What am I curious about learning or exploring more deeply?",
    "In what ways have I been kind to others recently, and how did it make me feel?",
    "What activity makes me lose track of time in a positive way, and how could I engage in it more often?",
    "When do I feel most connected to something greater than myself?",
    "What past mistake am I still carrying, and how could I practice forgiveness—either of myself or someone else?",
    "What would a perfect day look like for me right now, and what elements of it could I incorporate into my life?",
    "How do my surroundings affect my mood and productivity, and what small change could improve them?",
    "What would I do differently if I knew no one would judge me?",
    "What recurring dreams or aspirations keep coming back to me, and what might they be telling me?",
    "How do I recharge when I'm feeling depleted, and am I making enough time for it?",
    "What habit would I like to develop, and what's the smallest first step I could take?",
    "When was the last time I truly surprised myself, and what did I learn from it?",
    "What legacy or impact would I like to leave in the lives of those around me?",
];

#[derive(Debug)]
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn new(path: &Path) -> AppResult<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| AppError::Io(err.to_string()))?;
        }
        let conn = Connection::open(path).map_err(AppError::from)?;
        conn.execute_batch(SCHEMA_SQL).map_err(AppError::from)?;

        let db = Self {
            conn: Mutex::new(conn),
        };
        db.seed_default_questions()?;
        Ok(db)
    }

    fn conn(&self) -> AppResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| AppError::Internal("database mutex poisoned".to_string()))
    }

    // ─── Questions ──────────────────────────────────────────────────────────

    fn seed_default_questions(&self) -> AppResult<()> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM questions", [], |row| row.get(0))?;
        if count > 0 {
            return Ok(());
        }

        let now = Utc::now().to_rfc3339();
        for content in DEFAULT_QUESTIONS {
            conn.execute(
                "INSERT INTO questions (content, created_at) VALUES (?1, ?2)",
                params![content, now],
            )?;
        }
        tracing::info!(count = DEFAULT_QUESTIONS.len(), "seeded starter questions");
        Ok(())
    }

    pub fn add_question(&self, content: &str) -> AppResult<Question> {
        let now = Utc::now();
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO questions (content, created_at) VALUES (?1, ?2)",
            params![content, now.to_rfc3339()],
        )?;

        Ok(Question {
            id: conn.last_insert_rowid(),
            content: content.to_string(),
            used_on: None,
            created_at: now,
        })
    }

    pub fn insert_question_at(
        &self,
        content: &str,
        used_on: Option<&str>,
        created_at: DateTime<Utc>,
    ) -> AppResult<Question> {
        if let Some(raw) = used_on {
            activity::parse_date_key(raw)?;
        }
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO questions (content, used_on, created_at) VALUES (?1, ?2, ?3)",
            params![content, used_on, created_at.to_rfc3339()],
        )?;

        Ok(Question {
            id: conn.last_insert_rowid(),
            content: content.to_string(),
            used_on: used_on.map(ToString::to_string),
            created_at,
        })
    }

    pub fn get_all_questions(&self) -> AppResult<Vec<Question>> {
        let conn = self.conn()?;
        let mut statement = conn.prepare(
            "SELECT id, content, used_on, created_at FROM questions ORDER BY created_at DESC, id DESC",
        )?;
        let rows = statement.query_map([], parse_question_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(AppError::from)
    }

    pub fn get_question_by_id(&self, id: i64) -> AppResult<Option<Question>> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id, content, used_on, created_at FROM questions WHERE id = ?1",
            [id],
            parse_question_row,
        )
        .optional()
        .map_err(AppError::from)
    }

    pub fn update_question(&self, id: i64, content: &str) -> AppResult<()> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE questions SET content = ?1 WHERE id = ?2",
            params![content, id],
        )?;
        if changed == 0 {
            return Err(AppError::NotFound(format!("question {id}")));
        }
        Ok(())
    }

    pub fn delete_question(&self, id: i64) -> AppResult<()> {
        let conn = self.conn()?;
        let changed = conn.execute("DELETE FROM questions WHERE id = ?1", [id])?;
        if changed == 0 {
            return Err(AppError::NotFound(format!("question {id}")));
        }
        Ok(())
    }

    pub fn get_random_question(&self) -> AppResult<Option<Question>> {
        let questions = self.get_all_questions()?;
        Ok(questions.choose(&mut rand::rng()).cloned())
    }

    /// Question of the day: sticky for a given local day. Picks a random
    /// never-used question and stamps `used_on`; repeat calls on the same day
    /// return the same question. `None` once the pool is exhausted.
    pub fn get_daily_question(&self, today: &str) -> AppResult<Option<Question>> {
        activity::parse_date_key(today)?;

        let existing = {
            let conn = self.conn()?;
            conn.query_row(
                "SELECT id, content, used_on, created_at FROM questions WHERE used_on = ?1",
                [today],
                parse_question_row,
            )
            .optional()?
        };
        if existing.is_some() {
            return Ok(existing);
        }

        let unused = {
            let conn = self.conn()?;
            let mut statement = conn.prepare(
                "SELECT id, content, used_on, created_at FROM questions WHERE used_on IS NULL",
            )?;
            let rows = statement.query_map([], parse_question_row)?;
            rows.collect::<Result<Vec<_>, _>>()?
        };

        let Some(mut question) = unused.choose(&mut rand::rng()).cloned() else {
            return Ok(None);
        };

        let conn = self.conn()?;
        conn.execute(
            "UPDATE questions SET used_on = ?1 WHERE id = ?2",
            params![today, question.id],
        )?;
        question.used_on = Some(today.to_string());
        Ok(Some(question))
    }

    pub fn count_questions(&self) -> AppResult<u64> {
        self.count_rows("questions")
    }

    // ─── Answers ────────────────────────────────────────────────────────────

    pub fn create_new_answer(&self, question_id: i64, content: &str) -> AppResult<Answer> {
        let now = Utc::now();
        self.insert_answer_at(question_id, content, now, now)
    }

    pub fn insert_answer_at(
        &self,
        question_id: i64,
        content: &str,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> AppResult<Answer> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO answers (question_id, content, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                question_id,
                content,
                created_at.to_rfc3339(),
                updated_at.to_rfc3339()
            ],
        )?;

        Ok(Answer {
            id: conn.last_insert_rowid(),
            question_id,
            content: content.to_string(),
            created_at,
            updated_at,
        })
    }

    pub fn get_all_answers(&self) -> AppResult<Vec<Answer>> {
        let conn = self.conn()?;
        let mut statement = conn.prepare(
            "SELECT id, question_id, content, created_at, updated_at
             FROM answers ORDER BY created_at DESC, id DESC",
        )?;
        let rows = statement.query_map([], parse_answer_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(AppError::from)
    }

    pub fn get_answer_history_by_question_id(&self, question_id: i64) -> AppResult<Vec<Answer>> {
        let conn = self.conn()?;
        let mut statement = conn.prepare(
            "SELECT id, question_id, content, created_at, updated_at
             FROM answers WHERE question_id = ?1 ORDER BY created_at DESC, id DESC",
        )?;
        let rows = statement.query_map([question_id], parse_answer_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(AppError::from)
    }

    pub fn get_recent_answers(&self, days_range: i64) -> AppResult<Vec<Answer>> {
        let cutoff = Utc::now() - Duration::days(days_range.max(0));
        let conn = self.conn()?;
        let mut statement = conn.prepare(
            "SELECT id, question_id, content, created_at, updated_at
             FROM answers WHERE created_at >= ?1 ORDER BY created_at DESC, id DESC",
        )?;
        let rows = statement.query_map([cutoff.to_rfc3339()], parse_answer_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(AppError::from)
    }

    pub fn update_answer(&self, id: i64, content: &str) -> AppResult<()> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE answers SET content = ?1, updated_at = ?2 WHERE id = ?3",
            params![content, Utc::now().to_rfc3339(), id],
        )?;
        if changed == 0 {
            return Err(AppError::NotFound(format!("answer {id}")));
        }
        Ok(())
    }

    pub fn delete_answer(&self, id: i64) -> AppResult<()> {
        let conn = self.conn()?;
        let changed = conn.execute("DELETE FROM answers WHERE id = ?1", [id])?;
        if changed == 0 {
            return Err(AppError::NotFound(format!("answer {id}")));
        }
        Ok(())
    }

    /// Raw `created_at` strings for the activity engine. Bad rows are the
    /// engine's to skip, so no parsing happens here.
    pub fn answer_timestamps(&self) -> AppResult<Vec<String>> {
        self.raw_column("SELECT created_at FROM answers")
    }

    pub fn count_answers(&self) -> AppResult<u64> {
        self.count_rows("answers")
    }

    // ─── Affirmations ───────────────────────────────────────────────────────

    pub fn save_affirmation(&self, content: &str) -> AppResult<Affirmation> {
        let now = Utc::now();
        self.insert_affirmation_at(content, now, now)
    }

    pub fn insert_affirmation_at(
        &self,
        content: &str,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> AppResult<Affirmation> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO affirmations (content, created_at, updated_at) VALUES (?1, ?2, ?3)",
            params![content, created_at.to_rfc3339(), updated_at.to_rfc3339()],
        )?;

        Ok(Affirmation {
            id: conn.last_insert_rowid(),
            content: content.to_string(),
            created_at,
            updated_at,
        })
    }

    pub fn get_active_affirmation(&self) -> AppResult<Option<Affirmation>> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id, content, created_at, updated_at
             FROM affirmations ORDER BY created_at DESC, id DESC LIMIT 1",
            [],
            parse_affirmation_row,
        )
        .optional()
        .map_err(AppError::from)
    }

    pub fn get_all_affirmations(&self) -> AppResult<Vec<Affirmation>> {
        let conn = self.conn()?;
        let mut statement = conn.prepare(
            "SELECT id, content, created_at, updated_at
             FROM affirmations ORDER BY created_at DESC, id DESC",
        )?;
        let rows = statement.query_map([], parse_affirmation_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(AppError::from)
    }

    pub fn update_affirmation(&self, id: i64, content: &str) -> AppResult<()> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE affirmations SET content = ?1, updated_at = ?2 WHERE id = ?3",
            params![content, Utc::now().to_rfc3339(), id],
        )?;
        if changed == 0 {
            return Err(AppError::NotFound(format!("affirmation {id}")));
        }
        Ok(())
    }

    pub fn delete_affirmation(&self, id: i64) -> AppResult<()> {
        let conn = self.conn()?;
        let changed = conn.execute("DELETE FROM affirmations WHERE id = ?1", [id])?;
        if changed == 0 {
            return Err(AppError::NotFound(format!("affirmation {id}")));
        }
        Ok(())
    }

    pub fn log_affirmation_completion(&self, affirmation_id: i64) -> AppResult<AffirmationLog> {
        self.log_affirmation_completion_at(affirmation_id, Utc::now())
    }

    pub fn log_affirmation_completion_at(
        &self,
        affirmation_id: i64,
        completed_at: DateTime<Utc>,
    ) -> AppResult<AffirmationLog> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO affirmation_logs (affirmation_id, completed_at) VALUES (?1, ?2)",
            params![affirmation_id, completed_at.to_rfc3339()],
        )?;

        Ok(AffirmationLog {
            id: conn.last_insert_rowid(),
            affirmation_id,
            completed_at,
        })
    }

    pub fn get_all_affirmation_logs(&self) -> AppResult<Vec<AffirmationLog>> {
        let conn = self.conn()?;
        let mut statement = conn.prepare(
            "SELECT id, affirmation_id, completed_at
             FROM affirmation_logs ORDER BY completed_at DESC, id DESC",
        )?;
        let rows = statement.query_map([], parse_affirmation_log_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(AppError::from)
    }

    pub fn delete_affirmation_log(&self, id: i64) -> AppResult<()> {
        let conn = self.conn()?;
        let changed = conn.execute("DELETE FROM affirmation_logs WHERE id = ?1", [id])?;
        if changed == 0 {
            return Err(AppError::NotFound(format!("affirmation log {id}")));
        }
        Ok(())
    }

    pub fn affirmation_log_timestamps(&self) -> AppResult<Vec<String>> {
        self.raw_column("SELECT completed_at FROM affirmation_logs")
    }

    pub fn count_affirmation_logs(&self) -> AppResult<u64> {
        self.count_rows("affirmation_logs")
    }

    // ─── Gratitude ──────────────────────────────────────────────────────────

    /// Add a gratitude item for a local day, holding the line at five per day.
    pub fn add_gratitude_item(&self, content: &str, entry_date: &str) -> AppResult<GratitudeItem> {
        activity::parse_date_key(entry_date)?;

        let existing = self.count_gratitude_entries_on(entry_date)?;
        if existing >= MAX_GRATITUDE_ITEMS_PER_DAY {
            return Err(AppError::Limit(format!(
                "maximum number of gratitude entries for {entry_date} reached ({MAX_GRATITUDE_ITEMS_PER_DAY})"
            )));
        }

        self.insert_gratitude_item_at(content, entry_date, Utc::now())
    }

    pub fn insert_gratitude_item_at(
        &self,
        content: &str,
        entry_date: &str,
        created_at: DateTime<Utc>,
    ) -> AppResult<GratitudeItem> {
        activity::parse_date_key(entry_date)?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO gratitude_items (content, entry_date, created_at) VALUES (?1, ?2, ?3)",
            params![content, entry_date, created_at.to_rfc3339()],
        )?;

        Ok(GratitudeItem {
            id: conn.last_insert_rowid(),
            content: content.to_string(),
            entry_date: entry_date.to_string(),
            created_at,
        })
    }

    pub fn get_gratitude_items_by_date(&self, entry_date: &str) -> AppResult<Vec<GratitudeItem>> {
        let conn = self.conn()?;
        let mut statement = conn.prepare(
            "SELECT id, content, entry_date, created_at
             FROM gratitude_items WHERE entry_date = ?1 ORDER BY created_at ASC, id ASC",
        )?;
        let rows = statement.query_map([entry_date], parse_gratitude_item_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(AppError::from)
    }

    pub fn count_gratitude_entries_on(&self, entry_date: &str) -> AppResult<i64> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT COUNT(*) FROM gratitude_items WHERE entry_date = ?1",
            [entry_date],
            |row| row.get(0),
        )
        .map_err(AppError::from)
    }

    pub fn has_gratitude_entries_on(&self, entry_date: &str) -> AppResult<bool> {
        Ok(self.count_gratitude_entries_on(entry_date)? > 0)
    }

    /// All gratitude items grouped by day, newest day first.
    pub fn get_all_gratitude_entries(&self) -> AppResult<Vec<GratitudeEntry>> {
        let dates = self.raw_column(
            "SELECT DISTINCT entry_date FROM gratitude_items ORDER BY entry_date DESC",
        )?;

        let mut entries = Vec::with_capacity(dates.len());
        for date in dates {
            let items = self.get_gratitude_items_by_date(&date)?;
            entries.push(GratitudeEntry { date, items });
        }
        Ok(entries)
    }

    pub fn get_last_n_days_with_gratitude(&self, n: u32) -> AppResult<Vec<GratitudeEntry>> {
        let dates = {
            let conn = self.conn()?;
            let mut statement = conn.prepare(
                "SELECT DISTINCT entry_date FROM gratitude_items
                 ORDER BY entry_date DESC LIMIT ?1",
            )?;
            let rows = statement.query_map([n], |row| row.get::<_, String>(0))?;
            rows.collect::<Result<Vec<_>, _>>()?
        };

        let mut entries = Vec::with_capacity(dates.len());
        for date in dates {
            let items = self.get_gratitude_items_by_date(&date)?;
            entries.push(GratitudeEntry { date, items });
        }
        Ok(entries)
    }

    pub fn update_gratitude_item(&self, id: i64, content: &str) -> AppResult<()> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE gratitude_items SET content = ?1 WHERE id = ?2",
            params![content, id],
        )?;
        if changed == 0 {
            return Err(AppError::NotFound(format!("gratitude item {id}")));
        }
        Ok(())
    }

    pub fn delete_gratitude_item(&self, id: i64) -> AppResult<()> {
        let conn = self.conn()?;
        let changed = conn.execute("DELETE FROM gratitude_items WHERE id = ?1", [id])?;
        if changed == 0 {
            return Err(AppError::NotFound(format!("gratitude item {id}")));
        }
        Ok(())
    }

    pub fn gratitude_entry_dates(&self) -> AppResult<Vec<String>> {
        self.raw_column("SELECT DISTINCT entry_date FROM gratitude_items")
    }

    pub fn count_gratitude_items(&self) -> AppResult<u64> {
        self.count_rows("gratitude_items")
    }

    // ─── Creativity ─────────────────────────────────────────────────────────

    /// Create or replace the single creativity entry for a local day.
    pub fn save_creativity_entry(
        &self,
        content: &str,
        entry_date: &str,
    ) -> AppResult<CreativityEntry> {
        activity::parse_date_key(entry_date)?;
        let now = Utc::now();

        if let Some(existing) = self.get_creativity_entry_by_date(entry_date)? {
            let conn = self.conn()?;
            conn.execute(
                "UPDATE creativity_entries SET content = ?1, updated_at = ?2 WHERE id = ?3",
                params![content, now.to_rfc3339(), existing.id],
            )?;
            return Ok(CreativityEntry {
                content: content.to_string(),
                updated_at: now,
                ..existing
            });
        }

        self.insert_creativity_entry_at(content, entry_date, now, now)
    }

    pub fn insert_creativity_entry_at(
        &self,
        content: &str,
        entry_date: &str,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> AppResult<CreativityEntry> {
        activity::parse_date_key(entry_date)?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO creativity_entries (content, entry_date, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                content,
                entry_date,
                created_at.to_rfc3339(),
                updated_at.to_rfc3339()
            ],
        )?;

        Ok(CreativityEntry {
            id: conn.last_insert_rowid(),
            content: content.to_string(),
            entry_date: entry_date.to_string(),
            created_at,
            updated_at,
        })
    }

    pub fn get_creativity_entry_by_date(
        &self,
        entry_date: &str,
    ) -> AppResult<Option<CreativityEntry>> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id, content, entry_date, created_at, updated_at
             FROM creativity_entries WHERE entry_date = ?1 ORDER BY id DESC LIMIT 1",
            [entry_date],
            parse_creativity_row,
        )
        .optional()
        .map_err(AppError::from)
    }

    pub fn get_all_creativity_entries(&self) -> AppResult<Vec<CreativityEntry>> {
        let conn = self.conn()?;
        let mut statement = conn.prepare(
            "SELECT id, content, entry_date, created_at, updated_at
             FROM creativity_entries ORDER BY entry_date DESC, id DESC",
        )?;
        let rows = statement.query_map([], parse_creativity_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(AppError::from)
    }

    pub fn update_creativity_entry(&self, id: i64, content: &str) -> AppResult<()> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE creativity_entries SET content = ?1, updated_at = ?2 WHERE id = ?3",
            params![content, Utc::now().to_rfc3339(), id],
        )?;
        if changed == 0 {
            return Err(AppError::NotFound(format!("creativity entry {id}")));
        }
        Ok(())
    }

    pub fn delete_creativity_entry(&self, id: i64) -> AppResult<()> {
        let conn = self.conn()?;
        let changed = conn.execute("DELETE FROM creativity_entries WHERE id = ?1", [id])?;
        if changed == 0 {
            return Err(AppError::NotFound(format!("creativity entry {id}")));
        }
        Ok(())
    }

    pub fn has_creativity_entry_for_date(&self, entry_date: &str) -> AppResult<bool> {
        Ok(self.get_creativity_entry_by_date(entry_date)?.is_some())
    }

    pub fn creativity_entry_dates(&self) -> AppResult<Vec<String>> {
        self.raw_column("SELECT DISTINCT entry_date FROM creativity_entries")
    }

    pub fn count_creativity_entries(&self) -> AppResult<u64> {
        self.count_rows("creativity_entries")
    }

    // ─── Shared helpers ─────────────────────────────────────────────────────

    fn raw_column(&self, sql: &str) -> AppResult<Vec<String>> {
        let conn = self.conn()?;
        let mut statement = conn.prepare(sql)?;
        let rows = statement.query_map([], |row| row.get::<_, String>(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(AppError::from)
    }

    fn count_rows(&self, table: &str) -> AppResult<u64> {
        let conn = self.conn()?;
        let count: i64 =
            conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }
}

fn parse_question_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Question> {
    Ok(Question {
        id: row.get(0)?,
        content: row.get(1)?,
        used_on: row.get(2)?,
        created_at: parse_time(&row.get::<_, String>(3)?)?,
    })
}

fn parse_answer_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Answer> {
    Ok(Answer {
        id: row.get(0)?,
        question_id: row.get(1)?,
        content: row.get(2)?,
        created_at: parse_time(&row.get::<_, String>(3)?)?,
        updated_at: parse_time(&row.get::<_, String>(4)?)?,
    })
}

fn parse_affirmation_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Affirmation> {
    Ok(Affirmation {
        id: row.get(0)?,
        content: row.get(1)?,
        created_at: parse_time(&row.get::<_, String>(2)?)?,
        updated_at: parse_time(&row.get::<_, String>(3)?)?,
    })
}

fn parse_affirmation_log_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AffirmationLog> {
    Ok(AffirmationLog {
        id: row.get(0)?,
        affirmation_id: row.get(1)?,
        completed_at: parse_time(&row.get::<_, String>(2)?)?,
    })
}

fn parse_gratitude_item_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<GratitudeItem> {
    Ok(GratitudeItem {
        id: row.get(0)?,
        content: row.get(1)?,
        entry_date: row.get(2)?,
        created_at: parse_time(&row.get::<_, String>(3)?)?,
    })
}

fn parse_creativity_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<CreativityEntry> {
    Ok(CreativityEntry {
        id: row.get(0)?,
        content: row.get(1)?,
        entry_date: row.get(2)?,
        created_at: parse_time(&row.get::<_, String>(3)?)?,
        updated_at: parse_time(&row.get::<_, String>(4)?)?,
    })
}

fn parse_time(raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|error| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    error.to_string(),
                )),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::{Database, DEFAULT_QUESTIONS, MAX_GRATITUDE_ITEMS_PER_DAY};
    use crate::errors::AppError;
    use chrono::{Duration, Utc};

    fn open_db(dir: &tempfile::TempDir) -> Database {
        Database::new(&dir.path().join("test.db")).expect("db")
    }

    #[test]
    fn empty_database_is_seeded_with_starter_questions_once() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = open_db(&dir);
        assert_eq!(db.count_questions().expect("count"), DEFAULT_QUESTIONS.len() as u64);

        // Reopening must not seed again.
        drop(db);
        let db = open_db(&dir);
        assert_eq!(db.count_questions().expect("count"), DEFAULT_QUESTIONS.len() as u64);
    }

    #[test]
    fn question_crud_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = open_db(&dir);

        let question = db.add_question("What went well today?").expect("add");
        let loaded = db
            .get_question_by_id(question.id)
            .expect("get")
            .expect("exists");
        assert_eq!(loaded.content, "What went well today?");
        assert!(loaded.used_on.is_none());

        db.update_question(question.id, "What went well this week?")
            .expect("update");
        let updated = db
            .get_question_by_id(question.id)
            .expect("get")
            .expect("exists");
        assert_eq!(updated.content, "What went well this week?");

        db.delete_question(question.id).expect("delete");
        assert!(db.get_question_by_id(question.id).expect("get").is_none());
        assert!(matches!(
            db.delete_question(question.id),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn daily_question_is_sticky_for_the_day() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = open_db(&dir);

        let first = db
            .get_daily_question("2025-06-14")
            .expect("daily")
            .expect("question available");
        assert_eq!(first.used_on.as_deref(), Some("2025-06-14"));

        let second = db
            .get_daily_question("2025-06-14")
            .expect("daily")
            .expect("question available");
        assert_eq!(second.id, first.id);

        let next_day = db
            .get_daily_question("2025-06-15")
            .expect("daily")
            .expect("question available");
        assert_ne!(next_day.id, first.id);
    }

    #[test]
    fn answers_are_listed_newest_first_and_filtered_by_question() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = open_db(&dir);

        let question = db.add_question("prompt").expect("add question");
        let other = db.add_question("other prompt").expect("add question");

        let old = Utc::now() - Duration::days(10);
        db.insert_answer_at(question.id, "old answer", old, old)
            .expect("insert old");
        db.create_new_answer(question.id, "new answer")
            .expect("insert new");
        db.create_new_answer(other.id, "unrelated").expect("insert other");

        let all = db.get_all_answers().expect("all");
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].content, "unrelated");

        let history = db
            .get_answer_history_by_question_id(question.id)
            .expect("history");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].content, "new answer");
        assert_eq!(history[1].content, "old answer");

        let recent = db.get_recent_answers(7).expect("recent");
        assert_eq!(recent.len(), 2);
        assert!(recent.iter().all(|answer| answer.content != "old answer"));
    }

    #[test]
    fn active_affirmation_is_latest_by_creation() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = open_db(&dir);
        assert!(db.get_active_affirmation().expect("active").is_none());

        let earlier = Utc::now() - Duration::days(3);
        db.insert_affirmation_at("I am calm", earlier, earlier)
            .expect("insert");
        let latest = db.save_affirmation("I am focused").expect("save");

        let active = db
            .get_active_affirmation()
            .expect("active")
            .expect("exists");
        assert_eq!(active.id, latest.id);
        assert_eq!(active.content, "I am focused");
    }

    #[test]
    fn affirmation_logs_round_trip_and_expose_raw_timestamps() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = open_db(&dir);

        let affirmation = db.save_affirmation("I am consistent").expect("save");
        let log = db
            .log_affirmation_completion(affirmation.id)
            .expect("log today");
        db.log_affirmation_completion_at(affirmation.id, Utc::now() - Duration::days(1))
            .expect("log yesterday");

        let logs = db.get_all_affirmation_logs().expect("logs");
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].id, log.id);
        assert_eq!(db.affirmation_log_timestamps().expect("raw").len(), 2);

        db.delete_affirmation_log(log.id).expect("delete");
        assert_eq!(db.count_affirmation_logs().expect("count"), 1);
    }

    #[test]
    fn gratitude_items_are_capped_per_day() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = open_db(&dir);

        for index in 0..MAX_GRATITUDE_ITEMS_PER_DAY {
            db.add_gratitude_item(&format!("thing {index}"), "2025-06-14")
                .expect("add");
        }
        assert!(matches!(
            db.add_gratitude_item("one too many", "2025-06-14"),
            Err(AppError::Limit(_))
        ));

        // A different day starts a fresh allowance.
        db.add_gratitude_item("fresh", "2025-06-15").expect("add");
        assert_eq!(db.count_gratitude_entries_on("2025-06-14").expect("count"), 5);
        assert!(db.has_gratitude_entries_on("2025-06-15").expect("has"));
    }

    #[test]
    fn gratitude_entries_group_by_day_newest_first() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = open_db(&dir);

        db.add_gratitude_item("sunlight", "2025-06-13").expect("add");
        db.add_gratitude_item("coffee", "2025-06-14").expect("add");
        db.add_gratitude_item("friends", "2025-06-14").expect("add");

        let entries = db.get_all_gratitude_entries().expect("entries");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].date, "2025-06-14");
        assert_eq!(entries[0].items.len(), 2);
        assert_eq!(entries[1].date, "2025-06-13");

        let last_one = db.get_last_n_days_with_gratitude(1).expect("last n");
        assert_eq!(last_one.len(), 1);
        assert_eq!(last_one[0].date, "2025-06-14");
    }

    #[test]
    fn gratitude_rejects_malformed_entry_dates() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = open_db(&dir);
        assert!(matches!(
            db.add_gratitude_item("anything", "June 14th"),
            Err(AppError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn creativity_save_is_an_upsert_per_day() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = open_db(&dir);

        let first = db
            .save_creativity_entry("a rough sketch", "2025-06-14")
            .expect("save");
        let second = db
            .save_creativity_entry("a finished sketch", "2025-06-14")
            .expect("save again");
        assert_eq!(second.id, first.id);

        let loaded = db
            .get_creativity_entry_by_date("2025-06-14")
            .expect("get")
            .expect("exists");
        assert_eq!(loaded.content, "a finished sketch");
        assert_eq!(db.count_creativity_entries().expect("count"), 1);
        assert!(db
            .has_creativity_entry_for_date("2025-06-14")
            .expect("has"));
        assert!(!db
            .has_creativity_entry_for_date("2025-06-15")
            .expect("has"));
    }
}
