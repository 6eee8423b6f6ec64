//! Heuristic entity extraction over lowercased question text.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Department vocabulary in scan order. The first term found wins, so `it`
/// takes precedence over every later entry.
pub const DEPARTMENTS: &[&str] = &["it", "engineering", "marketing", "hr", "sales", "finance"];

/// Words that make a number in the question read as a salary.
const SALARY_CONTEXT: &[&str] = &["salary", "paid"];

static AMOUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+(?:,[0-9]{3})*").expect("valid amount regex"));
static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b20[0-9]{2}\b").expect("valid year regex"));

/// Structured values pulled out of a question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntitySet {
    /// Upper-cased department name.
    pub department: Option<String>,
    pub salary: Option<u64>,
    /// Four digit year in the 2000s, kept verbatim.
    pub year: Option<String>,
    /// Reserved; never populated.
    pub limit: Option<u32>,
}

/// Extract department, salary threshold and year from lowercased text.
pub fn extract_entities(text: &str) -> EntitySet {
    EntitySet {
        department: find_department(text),
        salary: find_salary(text),
        year: YEAR.find(text).map(|m| m.as_str().to_string()),
        limit: None,
    }
}

fn find_department(text: &str) -> Option<String> {
    DEPARTMENTS
        .iter()
        .find(|term| text.contains(*term))
        .map(|term| term.to_ascii_uppercase())
}

fn find_salary(text: &str) -> Option<u64> {
    if !SALARY_CONTEXT.iter().any(|word| text.contains(word)) {
        return None;
    }
    let amount = AMOUNT.find(text)?;
    amount.as_str().replace(',', "").parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn department_is_upper_cased() {
        let entities = extract_entities("find employees in marketing");
        assert_eq!(entities.department.as_deref(), Some("MARKETING"));
    }

    #[test]
    fn first_vocabulary_entry_wins_over_text_order() {
        let entities = extract_entities("compare finance and hr headcount");
        assert_eq!(entities.department.as_deref(), Some("HR"));
    }

    #[test]
    fn it_matches_as_a_substring() {
        let entities = extract_entities("employees with salary above 1000");
        assert_eq!(entities.department.as_deref(), Some("IT"));
    }

    #[test]
    fn salary_requires_context_word() {
        assert_eq!(extract_entities("employees hired after 2020").salary, None);
        assert_eq!(
            extract_entities("employees paid more than 65,000").salary,
            Some(65_000)
        );
        assert_eq!(
            extract_entities("salary of at least 1,250,000").salary,
            Some(1_250_000)
        );
    }

    #[test]
    fn salary_takes_the_first_number_even_if_it_is_a_year() {
        let entities = extract_entities("hired after 2019 with salary above 50000");
        assert_eq!(entities.salary, Some(2019));
        assert_eq!(entities.year.as_deref(), Some("2019"));
    }

    #[test]
    fn oversized_salary_is_dropped() {
        let entities = extract_entities("salary above 99999999999999999999999");
        assert_eq!(entities.salary, None);
    }

    #[test]
    fn year_must_be_a_standalone_token() {
        assert_eq!(extract_entities("salary above 120000").year, None);
        assert_eq!(
            extract_entities("hired before 2022").year.as_deref(),
            Some("2022")
        );
        assert_eq!(extract_entities("hired before 1999").year, None);
    }

    #[test]
    fn only_ascii_digits_are_read_as_numbers() {
        let entities = extract_entities("salary above ٧٠٠٠٠ or 65000");
        assert_eq!(entities.salary, Some(65_000));
        assert_eq!(extract_entities("hired after 20٢١").year, None);
    }

    #[test]
    fn limit_is_never_populated() {
        assert_eq!(extract_entities("top 5 employees").limit, None);
        assert_eq!(extract_entities("show everything"), EntitySet::default());
    }
}
