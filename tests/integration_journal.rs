use chrono::{Datelike, Local};
use daily_reflection::JournalCore;

fn today_key() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

#[test]
fn fresh_core_starts_with_seeded_questions_and_empty_stats() {
    let dir = tempfile::tempdir().expect("tempdir");
    let core = JournalCore::new(dir.path()).expect("core");

    let questions = core.get_all_questions().expect("questions");
    assert_eq!(questions.len(), 40);

    let stats = core.activity_stats().expect("stats");
    assert_eq!(stats.total_answers, 0);
    assert_eq!(stats.current_affirmation_streak, 0);
    assert_eq!(stats.longest_streak, 0);
    assert_eq!(stats.completion_rate, 0);
}

#[test]
fn daily_question_stays_fixed_until_answered() {
    let dir = tempfile::tempdir().expect("tempdir");
    let core = JournalCore::new(dir.path()).expect("core");

    let first = core
        .get_daily_question()
        .expect("daily")
        .expect("question available");
    let again = core
        .get_daily_question()
        .expect("daily")
        .expect("question available");
    assert_eq!(first.id, again.id);

    core.create_new_answer(first.id, "a short reflection")
        .expect("answer");
    let todays = core.get_todays_answered_question().expect("todays");
    assert_eq!(todays.question.map(|question| question.id), Some(first.id));
}

#[test]
fn random_question_can_be_answered_and_found_in_history() {
    let dir = tempfile::tempdir().expect("tempdir");
    let core = JournalCore::new(dir.path()).expect("core");

    let question = core
        .get_random_question()
        .expect("random")
        .expect("pool is seeded");
    core.create_new_answer(question.id, "an integration answer")
        .expect("answer");

    let history = core
        .get_answer_history_by_question_id(question.id)
        .expect("history");
    assert!(history
        .iter()
        .any(|answer| answer.content == "an integration answer"));
}

#[test]
fn a_full_day_of_activity_shows_up_in_stats_and_calendar() {
    let dir = tempfile::tempdir().expect("tempdir");
    let core = JournalCore::new(dir.path()).expect("core");

    let question = core.add_question("What surprised you?").expect("question");
    core.create_new_answer(question.id, "an old song").expect("answer");

    let affirmation = core.save_affirmation("I notice things").expect("affirmation");
    core.log_affirmation(affirmation.id).expect("log");
    assert!(core.check_today_affirmation(affirmation.id).expect("check"));

    core.add_gratitude_item("rain on the window").expect("gratitude");
    core.add_gratitude_item("a quiet hour").expect("gratitude");
    assert_eq!(core.count_today_gratitude_entries().expect("count"), 2);

    core.save_creativity_entry("wrote two verses", &today_key())
        .expect("creativity");

    let stats = core.activity_stats().expect("stats");
    assert_eq!(stats.total_answers, 1);
    assert_eq!(stats.total_affirmations, 1);
    assert_eq!(stats.total_gratitude_items, 2);
    assert_eq!(stats.total_creativity_entries, 1);
    assert_eq!(stats.total_gratitude_days, 1);
    assert_eq!(stats.current_affirmation_streak, 1);
    assert_eq!(stats.current_gratitude_streak, 1);
    assert_eq!(stats.current_creativity_streak, 1);
    assert_eq!(stats.longest_streak, 1);
    // 4 of 120 slots in the 30-day window.
    assert_eq!(stats.completion_rate, 3);

    let today = Local::now().date_naive();
    let grid = core
        .calendar_month(today.year(), today.month())
        .expect("calendar");
    assert_eq!(grid.len() % 7, 0);
    let cell = grid
        .iter()
        .find(|cell| cell.date == today_key())
        .expect("today's cell");
    assert!(cell.is_current_month);
    assert!(cell.has_answer && cell.has_affirmation && cell.has_gratitude && cell.has_creativity);

    // Same inputs, same outputs.
    assert_eq!(core.activity_stats().expect("stats again"), stats);
}

#[test]
fn deleting_records_is_reflected_on_the_next_query() {
    let dir = tempfile::tempdir().expect("tempdir");
    let core = JournalCore::new(dir.path()).expect("core");

    let affirmation = core.save_affirmation("I let go").expect("affirmation");
    let log = core.log_affirmation(affirmation.id).expect("log");
    assert_eq!(core.get_affirmation_streak().expect("streak"), 1);

    core.delete_affirmation_log(log.id).expect("delete");
    assert_eq!(core.get_affirmation_streak().expect("streak"), 0);
    assert!(!core.check_today_affirmation(affirmation.id).expect("check"));
}

#[test]
fn tracing_can_be_initialized_against_the_data_dir() {
    let dir = tempfile::tempdir().expect("tempdir");
    // Only the first initialization in the process can win the global slot.
    let _ = daily_reflection::init_tracing(dir.path());
    assert!(dir.path().join("logs").is_dir());
}
