//! Template-based SQL synthesis from a classified intent and extracted entities.

pub mod guard;
pub mod plan;

use crate::nlp::{corpus::IntentLabel, entities::EntitySet};

use plan::{AggregateFn, Comparison, Predicate, SelectPlan, Table};

/// Rows returned when the question could not be understood.
pub const FALLBACK_LIMIT: u32 = 10;

/// Window used for questions about "recent" hires.
pub const RECENT_YEARS: u32 = 2;

/// Choose the query plan for an intent.
pub fn plan_query(intent: IntentLabel, text: &str, entities: &EntitySet) -> SelectPlan {
    match intent {
        IntentLabel::SelectAll => match Table::first_mentioned(text) {
            Some(Table::Departments) => SelectPlan::all_of(Table::Departments),
            Some(Table::Projects) => SelectPlan::all_of(Table::Projects),
            Some(Table::Employees) | None => SelectPlan::employees_with_departments(),
        },
        IntentLabel::SelectWithCondition => conditional_plan(text, entities),
        // Nothing mentioned: counting employees is the most useful reading.
        IntentLabel::Count => {
            SelectPlan::count_of(Table::first_mentioned(text).unwrap_or(Table::Employees))
        }
        IntentLabel::Aggregate => aggregate_plan(text),
        IntentLabel::Join => SelectPlan::employee_listing(),
        IntentLabel::Unknown => SelectPlan::employees_with_departments().with_limit(FALLBACK_LIMIT),
    }
}

/// Render the SQL for an intent over lowercased text.
pub fn build_sql(intent: IntentLabel, text: &str, entities: &EntitySet) -> String {
    plan_query(intent, text, entities).render()
}

fn conditional_plan(text: &str, entities: &EntitySet) -> SelectPlan {
    let mut predicates = Vec::new();
    if let Some(department) = &entities.department {
        predicates.push(Predicate::Department(department.clone()));
    }
    if let Some(amount) = entities.salary {
        predicates.push(Predicate::Salary {
            op: salary_comparison(text),
            amount,
        });
    }
    if let Some(year) = &entities.year {
        if let Some(op) = hire_year_comparison(text) {
            predicates.push(Predicate::HireYear {
                op,
                year: year.clone(),
            });
        }
    }
    if text.contains("recent") {
        predicates.push(Predicate::HiredWithinYears(RECENT_YEARS));
    }
    SelectPlan::employee_listing().with_predicates(predicates)
}

fn salary_comparison(text: &str) -> Comparison {
    if contains_any(text, &["greater than", "more than", "above"]) {
        Comparison::Greater
    } else if contains_any(text, &["less than", "below"]) {
        Comparison::Less
    } else {
        Comparison::AtLeast
    }
}

fn hire_year_comparison(text: &str) -> Option<Comparison> {
    if contains_any(text, &["after", "since"]) {
        Some(Comparison::Greater)
    } else if text.contains("before") {
        Some(Comparison::Less)
    } else {
        None
    }
}

fn aggregate_plan(text: &str) -> SelectPlan {
    let stats = if text.contains("average salary") {
        vec![(AggregateFn::Avg, "average_salary")]
    } else if contains_any(text, &["maximum salary", "highest"]) {
        vec![(AggregateFn::Max, "maximum_salary")]
    } else if contains_any(text, &["minimum salary", "lowest"]) {
        vec![(AggregateFn::Min, "minimum_salary")]
    } else if contains_any(text, &["total salary", "sum"]) {
        vec![(AggregateFn::Sum, "total_salary")]
    } else {
        vec![
            (AggregateFn::Avg, "average_salary"),
            (AggregateFn::Max, "max_salary"),
            (AggregateFn::Min, "min_salary"),
        ]
    };
    SelectPlan::salary_stats(stats)
}

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;
    use crate::nlp::entities::extract_entities;

    fn sql(intent: IntentLabel, text: &str) -> String {
        build_sql(intent, text, &extract_entities(text))
    }

    #[test]
    fn select_all_picks_first_mentioned_table() {
        assert_snapshot!(sql(IntentLabel::SelectAll, "show all employees"), @"SELECT * FROM employees e JOIN departments d ON e.department_id = d.id");
        assert_snapshot!(sql(IntentLabel::SelectAll, "list all departments"), @"SELECT * FROM departments");
        assert_snapshot!(sql(IntentLabel::SelectAll, "get all projects"), @"SELECT * FROM projects");
        assert_snapshot!(sql(IntentLabel::SelectAll, "show everything"), @"SELECT * FROM employees e JOIN departments d ON e.department_id = d.id");
    }

    #[test]
    fn conditions_are_joined_in_fixed_order() {
        assert_snapshot!(
            sql(IntentLabel::SelectWithCondition, "recent marketing hires paid below 80,000 since 2021"),
            @"SELECT e.*, d.name AS department_name FROM employees e JOIN departments d ON e.department_id = d.id WHERE UPPER(d.name) = 'MARKETING' AND e.salary < 80000 AND strftime('%Y', e.hire_date) > '2021' AND e.hire_date >= date('now', '-2 years')"
        );
    }

    #[test]
    fn salary_defaults_to_at_least() {
        let query = sql(IntentLabel::SelectWithCondition, "salary of 50000");
        assert!(query.ends_with("WHERE e.salary >= 50000"));
    }

    #[test]
    fn year_without_direction_adds_no_condition() {
        let query = sql(IntentLabel::SelectWithCondition, "show employees hired in 2020");
        assert_eq!(query, SelectPlan::employee_listing().render());
    }

    #[test]
    fn no_conditions_means_no_where_clause() {
        let query = sql(IntentLabel::SelectWithCondition, "list senior employees");
        assert!(!query.contains("WHERE"));
        assert_snapshot!(query, @"SELECT e.*, d.name AS department_name FROM employees e JOIN departments d ON e.department_id = d.id");
    }

    #[test]
    fn count_targets_mentioned_table_or_employees() {
        assert_snapshot!(sql(IntentLabel::Count, "how many departments"), @"SELECT COUNT(*) AS total_departments FROM departments");
        assert_snapshot!(sql(IntentLabel::Count, "count projects"), @"SELECT COUNT(*) AS total_projects FROM projects");
        assert_snapshot!(sql(IntentLabel::Count, "how many are there"), @"SELECT COUNT(*) AS total_employees FROM employees");
    }

    #[test]
    fn aggregate_templates() {
        assert_snapshot!(sql(IntentLabel::Aggregate, "what is the average salary"), @"SELECT AVG(salary) AS average_salary FROM employees");
        assert_snapshot!(sql(IntentLabel::Aggregate, "highest paid employee"), @"SELECT MAX(salary) AS maximum_salary FROM employees");
        assert_snapshot!(sql(IntentLabel::Aggregate, "lowest paid employee"), @"SELECT MIN(salary) AS minimum_salary FROM employees");
        assert_snapshot!(sql(IntentLabel::Aggregate, "sum of salaries"), @"SELECT SUM(salary) AS total_salary FROM employees");
        assert_snapshot!(sql(IntentLabel::Aggregate, "salary statistics"), @"SELECT AVG(salary) AS average_salary, MAX(salary) AS max_salary, MIN(salary) AS min_salary FROM employees");
    }

    #[test]
    fn join_ignores_entities() {
        assert_snapshot!(sql(IntentLabel::Join, "it employees with department names in 2020"), @"SELECT e.*, d.name AS department_name FROM employees e JOIN departments d ON e.department_id = d.id");
    }

    #[test]
    fn unknown_falls_back_to_limited_join() {
        assert_snapshot!(sql(IntentLabel::Unknown, "???"), @"SELECT * FROM employees e JOIN departments d ON e.department_id = d.id LIMIT 10");
    }
}
