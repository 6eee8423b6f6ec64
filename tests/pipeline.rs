use once_cell::sync::Lazy;
use proptest::prelude::*;
use query_assistant::{
    data::SqliteStore,
    nlp::{
        corpus::IntentLabel,
        intent::{IntentClassifier, CONFIDENCE_FLOOR},
        normalize::TextNormalizer,
        QueryEngine,
    },
};

static ENGINE: Lazy<QueryEngine> = Lazy::new(|| {
    QueryEngine::new(IntentClassifier::train(TextNormalizer::new()).expect("corpus trains"))
});

#[test]
fn show_all_employees_joins_departments() {
    let translation = ENGINE.translate("Show all employees");
    assert_eq!(translation.intent, IntentLabel::SelectAll);
    assert_eq!(
        translation.sql,
        "SELECT * FROM employees e JOIN departments d ON e.department_id = d.id"
    );
}

#[test]
fn department_filter_uses_upper_name() {
    let translation = ENGINE.translate("show employees in it department");
    assert_eq!(translation.intent, IntentLabel::SelectWithCondition);
    assert!(translation.sql.contains("WHERE UPPER(d.name) = 'IT'"));
}

#[test]
fn salary_threshold_becomes_strict_comparison() {
    let translation = ENGINE.translate("employees with salary greater than 70000");
    assert_eq!(translation.intent, IntentLabel::SelectWithCondition);
    assert!(translation.sql.contains("e.salary > 70000"));
}

#[test]
fn average_salary_aggregates() {
    assert_eq!(
        ENGINE.text_to_sql("What is the average salary?"),
        "SELECT AVG(salary) AS average_salary FROM employees"
    );
}

#[test]
fn counting_departments() {
    assert_eq!(
        ENGINE.text_to_sql("How many departments are there?"),
        "SELECT COUNT(*) AS total_departments FROM departments"
    );
}

#[test]
fn empty_question_falls_back_to_limited_listing() {
    let translation = ENGINE.translate("");
    assert_eq!(translation.intent, IntentLabel::Unknown);
    assert_eq!(translation.confidence, None);
    assert!(translation.sql.ends_with("LIMIT 10"));
}

#[test]
fn low_confidence_question_uses_the_fallback_listing() {
    let translation = ENGINE.translate("employee name");
    assert_eq!(translation.intent, IntentLabel::Unknown);
    let confidence = translation.confidence.expect("best guess is reported");
    assert!(confidence <= CONFIDENCE_FLOOR);
    assert_eq!(
        translation.sql,
        "SELECT * FROM employees e JOIN departments d ON e.department_id = d.id LIMIT 10"
    );
}

#[test]
fn generated_sql_runs_against_seed_data() {
    let store = SqliteStore::open_in_memory().unwrap();
    for question in [
        "show all employees",
        "list all projects",
        "show employees in engineering",
        "list employees hired after 2020",
        "show recent hires",
        "how many projects",
        "highest paid employee",
        "show employees with their departments",
        "tell me a joke",
    ] {
        let sql = ENGINE.text_to_sql(question);
        let result = store.execute(&sql);
        assert!(result.success, "{question}: {sql}: {:?}", result.error);
    }
}

#[test]
fn engineering_filter_returns_engineering_staff() {
    let store = SqliteStore::open_in_memory().unwrap();
    let result = store.execute(&ENGINE.text_to_sql("show employees in engineering"));
    assert!(result.success);
    assert!(result.row_count > 0);
    assert!(result
        .data
        .iter()
        .all(|row| row["department_name"] == "Engineering"));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn translation_is_deterministic(text in "\\PC{0,60}") {
        let first = ENGINE.translate(&text);
        let second = ENGINE.translate(&text);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn sql_is_always_a_single_select(text in "[a-zA-Z0-9 ,'?]{0,80}") {
        let sql = ENGINE.text_to_sql(&text);
        prop_assert!(sql.starts_with("SELECT "));
        prop_assert!(!sql.contains(';'));
    }
}

#[test]
fn first_department_in_vocabulary_order_wins() {
    let translation = ENGINE.translate("show employees in finance and engineering");
    assert_eq!(translation.entities.department.as_deref(), Some("ENGINEERING"));
}
