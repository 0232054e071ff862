//! Command surface a desktop shell binds to. Thin over the store; every
//! derived number (streaks, rates, calendars) goes through `activity`.

use crate::activity::{self, ActivityDateSets, ActivityTotals};
use crate::db::Database;
use crate::errors::AppResult;
use crate::models::{
    ActivityStats, Affirmation, AffirmationLog, Answer, CalendarDay, CreativityEntry, DataExport,
    ExportResponse, GratitudeEntry, GratitudeItem, ImportSummary, Question,
    TodaysAnsweredQuestion,
};
use chrono::{Local, NaiveDate};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

const EXPORT_FILE_NAME: &str = "journal-export.json";

#[derive(Clone)]
pub struct JournalCore {
    db: Arc<Database>,
}

impl JournalCore {
    pub fn new(app_data_dir: impl AsRef<Path>) -> AppResult<Self> {
        let db = Database::new(&app_data_dir.as_ref().join("journal.db"))?;
        Ok(Self { db: Arc::new(db) })
    }

    /// The only place ambient "now" enters: everything downstream takes the
    /// resolved local day explicitly.
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn today_key(&self) -> String {
        activity::date_key(self.today())
    }

    // ─── Questions ──────────────────────────────────────────────────────────

    pub fn add_question(&self, content: &str) -> AppResult<Question> {
        self.db.add_question(content)
    }

    pub fn get_all_questions(&self) -> AppResult<Vec<Question>> {
        self.db.get_all_questions()
    }

    pub fn get_question_by_id(&self, id: i64) -> AppResult<Option<Question>> {
        self.db.get_question_by_id(id)
    }

    pub fn update_question(&self, id: i64, content: &str) -> AppResult<()> {
        self.db.update_question(id, content)
    }

    pub fn delete_question(&self, id: i64) -> AppResult<()> {
        self.db.delete_question(id)
    }

    pub fn get_random_question(&self) -> AppResult<Option<Question>> {
        self.db.get_random_question()
    }

    pub fn get_daily_question(&self) -> AppResult<Option<Question>> {
        self.db.get_daily_question(&self.today_key())
    }

    // ─── Answers ────────────────────────────────────────────────────────────

    pub fn create_new_answer(&self, question_id: i64, content: &str) -> AppResult<Answer> {
        self.db.create_new_answer(question_id, content)
    }

    pub fn get_all_answers(&self) -> AppResult<Vec<Answer>> {
        self.db.get_all_answers()
    }

    pub fn update_answer(&self, id: i64, content: &str) -> AppResult<()> {
        self.db.update_answer(id, content)
    }

    pub fn delete_answer(&self, id: i64) -> AppResult<()> {
        self.db.delete_answer(id)
    }

    pub fn get_answer_history_by_question_id(&self, question_id: i64) -> AppResult<Vec<Answer>> {
        self.db.get_answer_history_by_question_id(question_id)
    }

    pub fn get_recent_answers(&self, days_range: i64) -> AppResult<Vec<Answer>> {
        self.db.get_recent_answers(days_range)
    }

    pub fn get_todays_answer(&self) -> AppResult<Option<Answer>> {
        let today = self.today();
        let answers = self.db.get_all_answers()?;
        Ok(answers
            .into_iter()
            .find(|answer| activity::local_day(answer.created_at, &Local) == today))
    }

    pub fn get_todays_answered_question(&self) -> AppResult<TodaysAnsweredQuestion> {
        let Some(answer) = self.get_todays_answer()? else {
            return Ok(TodaysAnsweredQuestion {
                answer: None,
                question: None,
            });
        };
        let question = self.db.get_question_by_id(answer.question_id)?;
        Ok(TodaysAnsweredQuestion {
            answer: Some(answer),
            question,
        })
    }

    // ─── Affirmations ───────────────────────────────────────────────────────

    pub fn get_active_affirmation(&self) -> AppResult<Option<Affirmation>> {
        self.db.get_active_affirmation()
    }

    pub fn save_affirmation(&self, content: &str) -> AppResult<Affirmation> {
        self.db.save_affirmation(content)
    }

    pub fn update_affirmation(&self, id: i64, content: &str) -> AppResult<()> {
        self.db.update_affirmation(id, content)
    }

    pub fn delete_affirmation(&self, id: i64) -> AppResult<()> {
        self.db.delete_affirmation(id)
    }

    pub fn get_all_affirmations(&self) -> AppResult<Vec<Affirmation>> {
        self.db.get_all_affirmations()
    }

    pub fn log_affirmation(&self, affirmation_id: i64) -> AppResult<AffirmationLog> {
        self.db.log_affirmation_completion(affirmation_id)
    }

    pub fn delete_affirmation_log(&self, id: i64) -> AppResult<()> {
        self.db.delete_affirmation_log(id)
    }

    pub fn get_all_affirmation_logs(&self) -> AppResult<Vec<AffirmationLog>> {
        self.db.get_all_affirmation_logs()
    }

    pub fn check_today_affirmation(&self, affirmation_id: i64) -> AppResult<bool> {
        let today = self.today();
        let logs = self.db.get_all_affirmation_logs()?;
        Ok(logs.iter().any(|log| {
            log.affirmation_id == affirmation_id
                && activity::local_day(log.completed_at, &Local) == today
        }))
    }

    pub fn get_affirmation_streak(&self) -> AppResult<u32> {
        let raws = self.db.affirmation_log_timestamps()?;
        let set = activity::date_set_from_timestamps(raws.iter().map(String::as_str), &Local);
        Ok(activity::compute_streak(&set, self.today()))
    }

    // ─── Gratitude ──────────────────────────────────────────────────────────

    pub fn add_gratitude_item(&self, content: &str) -> AppResult<GratitudeItem> {
        self.db.add_gratitude_item(content, &self.today_key())
    }

    pub fn get_today_gratitude_items(&self) -> AppResult<Vec<GratitudeItem>> {
        self.db.get_gratitude_items_by_date(&self.today_key())
    }

    pub fn get_gratitude_items_by_date(&self, date: &str) -> AppResult<Vec<GratitudeItem>> {
        self.db.get_gratitude_items_by_date(date)
    }

    pub fn has_today_gratitude_entries(&self) -> AppResult<bool> {
        self.db.has_gratitude_entries_on(&self.today_key())
    }

    pub fn count_today_gratitude_entries(&self) -> AppResult<i64> {
        self.db.count_gratitude_entries_on(&self.today_key())
    }

    pub fn get_all_gratitude_entries(&self) -> AppResult<Vec<GratitudeEntry>> {
        self.db.get_all_gratitude_entries()
    }

    pub fn update_gratitude_item(&self, id: i64, content: &str) -> AppResult<()> {
        self.db.update_gratitude_item(id, content)
    }

    pub fn delete_gratitude_item(&self, id: i64) -> AppResult<()> {
        self.db.delete_gratitude_item(id)
    }

    pub fn get_last_n_days_with_gratitude(&self, n: u32) -> AppResult<Vec<GratitudeEntry>> {
        self.db.get_last_n_days_with_gratitude(n)
    }

    pub fn get_gratitude_streak(&self) -> AppResult<u32> {
        let dates = self.db.gratitude_entry_dates()?;
        let set = activity::date_set_from_keys(dates.iter().map(String::as_str));
        Ok(activity::compute_streak(&set, self.today()))
    }

    // ─── Creativity ─────────────────────────────────────────────────────────

    pub fn save_creativity_entry(
        &self,
        content: &str,
        entry_date: &str,
    ) -> AppResult<CreativityEntry> {
        self.db.save_creativity_entry(content, entry_date)
    }

    pub fn get_creativity_entry_by_date(
        &self,
        entry_date: &str,
    ) -> AppResult<Option<CreativityEntry>> {
        self.db.get_creativity_entry_by_date(entry_date)
    }

    pub fn get_all_creativity_entries(&self) -> AppResult<Vec<CreativityEntry>> {
        self.db.get_all_creativity_entries()
    }

    pub fn update_creativity_entry(&self, id: i64, content: &str) -> AppResult<()> {
        self.db.update_creativity_entry(id, content)
    }

    pub fn delete_creativity_entry(&self, id: i64) -> AppResult<()> {
        self.db.delete_creativity_entry(id)
    }

    pub fn has_creativity_entry_for_date(&self, entry_date: &str) -> AppResult<bool> {
        self.db.has_creativity_entry_for_date(entry_date)
    }

    pub fn get_creativity_streak(&self) -> AppResult<u32> {
        let dates = self.db.creativity_entry_dates()?;
        let set = activity::date_set_from_keys(dates.iter().map(String::as_str));
        Ok(activity::compute_streak(&set, self.today()))
    }

    // ─── Dashboard ──────────────────────────────────────────────────────────

    fn activity_date_sets(&self) -> AppResult<ActivityDateSets> {
        let answers = self.db.answer_timestamps()?;
        let logs = self.db.affirmation_log_timestamps()?;
        let gratitude = self.db.gratitude_entry_dates()?;
        let creativity = self.db.creativity_entry_dates()?;

        Ok(ActivityDateSets {
            answers: activity::date_set_from_timestamps(
                answers.iter().map(String::as_str),
                &Local,
            ),
            affirmations: activity::date_set_from_timestamps(
                logs.iter().map(String::as_str),
                &Local,
            ),
            gratitude: activity::date_set_from_keys(gratitude.iter().map(String::as_str)),
            creativity: activity::date_set_from_keys(creativity.iter().map(String::as_str)),
        })
    }

    pub fn activity_stats(&self) -> AppResult<ActivityStats> {
        let totals = ActivityTotals {
            answers: self.db.count_answers()?,
            affirmation_logs: self.db.count_affirmation_logs()?,
            gratitude_items: self.db.count_gratitude_items()?,
            creativity_entries: self.db.count_creativity_entries()?,
        };
        let sets = self.activity_date_sets()?;
        Ok(activity::activity_stats(totals, &sets, self.today()))
    }

    pub fn calendar_month(&self, year: i32, month: u32) -> AppResult<Vec<CalendarDay>> {
        let sets = self.activity_date_sets()?;
        activity::build_calendar_month(year, month, &sets)
    }

    // ─── Bulk transfer ──────────────────────────────────────────────────────

    /// Write every record of every table to one JSON file in `dir`.
    pub fn export_data(&self, dir: impl AsRef<Path>) -> AppResult<ExportResponse> {
        let export = DataExport {
            questions: self.db.get_all_questions()?,
            answers: self.db.get_all_answers()?,
            affirmations: self.db.get_all_affirmations()?,
            affirmation_logs: self.db.get_all_affirmation_logs()?,
            gratitude_items: self
                .db
                .get_all_gratitude_entries()?
                .into_iter()
                .flat_map(|entry| entry.items)
                .collect(),
            creativity_entries: self.db.get_all_creativity_entries()?,
        };

        fs::create_dir_all(dir.as_ref())?;
        let path = dir.as_ref().join(EXPORT_FILE_NAME);
        let file = fs::File::create(&path)?;
        serde_json::to_writer_pretty(file, &export)?;

        tracing::info!(path = %path.display(), "exported journal data");
        Ok(ExportResponse {
            path: path.display().to_string(),
        })
    }

    /// Read an export file back in, preserving original timestamps. Question
    /// and affirmation ids are remapped so answers and logs keep pointing at
    /// the right rows.
    pub fn import_data(&self, path: impl AsRef<Path>) -> AppResult<ImportSummary> {
        let raw = fs::read_to_string(path.as_ref())?;
        let data: DataExport = serde_json::from_str(&raw)?;
        let mut summary = ImportSummary {
            questions: 0,
            answers: 0,
            affirmations: 0,
            affirmation_logs: 0,
            gratitude_items: 0,
            creativity_entries: 0,
        };

        let mut question_ids: HashMap<i64, i64> = HashMap::new();
        for question in &data.questions {
            let inserted = self.db.insert_question_at(
                &question.content,
                question.used_on.as_deref(),
                question.created_at,
            )?;
            question_ids.insert(question.id, inserted.id);
            summary.questions += 1;
        }

        for answer in &data.answers {
            let question_id = question_ids
                .get(&answer.question_id)
                .copied()
                .unwrap_or(answer.question_id);
            self.db.insert_answer_at(
                question_id,
                &answer.content,
                answer.created_at,
                answer.updated_at,
            )?;
            summary.answers += 1;
        }

        let mut affirmation_ids: HashMap<i64, i64> = HashMap::new();
        for affirmation in &data.affirmations {
            let inserted = self.db.insert_affirmation_at(
                &affirmation.content,
                affirmation.created_at,
                affirmation.updated_at,
            )?;
            affirmation_ids.insert(affirmation.id, inserted.id);
            summary.affirmations += 1;
        }

        for log in &data.affirmation_logs {
            let affirmation_id = affirmation_ids
                .get(&log.affirmation_id)
                .copied()
                .unwrap_or(log.affirmation_id);
            self.db
                .log_affirmation_completion_at(affirmation_id, log.completed_at)?;
            summary.affirmation_logs += 1;
        }

        for item in &data.gratitude_items {
            self.db
                .insert_gratitude_item_at(&item.content, &item.entry_date, item.created_at)?;
            summary.gratitude_items += 1;
        }

        for entry in &data.creativity_entries {
            self.db.insert_creativity_entry_at(
                &entry.content,
                &entry.entry_date,
                entry.created_at,
                entry.updated_at,
            )?;
            summary.creativity_entries += 1;
        }

        tracing::info!(
            questions = summary.questions,
            answers = summary.answers,
            affirmations = summary.affirmations,
            "imported journal data"
        );
        Ok(summary)
    }
}
