//! Structured query plans and their rendering to SQLite SQL.
//!
//! Rendering is the only place values reach SQL text. Department names are
//! quoted with single-quote doubling; salaries and years are rendered from
//! already-parsed values.

use std::fmt::Write as _;

/// Tables of the sample dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Employees,
    Departments,
    Projects,
}

impl Table {
    pub const ALL: [Table; 3] = [Table::Employees, Table::Departments, Table::Projects];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Employees => "employees",
            Self::Departments => "departments",
            Self::Projects => "projects",
        }
    }

    /// Singular word used to spot the table in a question.
    pub fn mention(&self) -> &'static str {
        match self {
            Self::Employees => "employee",
            Self::Departments => "department",
            Self::Projects => "project",
        }
    }

    /// First table mentioned in `text`, checked employees, departments, projects.
    pub fn first_mentioned(text: &str) -> Option<Table> {
        Self::ALL.into_iter().find(|t| text.contains(t.mention()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFn {
    Avg,
    Max,
    Min,
    Sum,
}

impl AggregateFn {
    fn keyword(&self) -> &'static str {
        match self {
            Self::Avg => "AVG",
            Self::Max => "MAX",
            Self::Min => "MIN",
            Self::Sum => "SUM",
        }
    }
}

/// One entry of the select list.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectItem {
    /// `*`
    Star,
    /// `alias.*`
    AllOf(&'static str),
    /// `expr AS alias`
    Column {
        expr: &'static str,
        alias: &'static str,
    },
    /// `COUNT(*) AS alias`
    CountAll { alias: String },
    /// `FN(column) AS alias`
    Aggregate {
        func: AggregateFn,
        column: &'static str,
        alias: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Greater,
    Less,
    AtLeast,
}

impl Comparison {
    fn symbol(&self) -> &'static str {
        match self {
            Self::Greater => ">",
            Self::Less => "<",
            Self::AtLeast => ">=",
        }
    }
}

/// Filter conditions over the employees/departments join.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Case-insensitive department name match; the value is upper-cased.
    Department(String),
    Salary { op: Comparison, amount: u64 },
    HireYear { op: Comparison, year: String },
    HiredWithinYears(u32),
}

/// Inner join of employees to their department.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepartmentJoin;

/// A single `SELECT` over one table, optionally joined and filtered.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectPlan {
    pub items: Vec<SelectItem>,
    pub table: Table,
    pub join: Option<DepartmentJoin>,
    pub predicates: Vec<Predicate>,
    pub limit: Option<u32>,
}

impl SelectPlan {
    /// `SELECT * FROM <table>`
    pub fn all_of(table: Table) -> Self {
        Self {
            items: vec![SelectItem::Star],
            table,
            join: None,
            predicates: Vec::new(),
            limit: None,
        }
    }

    /// Every column of employees joined to departments.
    pub fn employees_with_departments() -> Self {
        Self {
            join: Some(DepartmentJoin),
            ..Self::all_of(Table::Employees)
        }
    }

    /// Employee columns plus the department name.
    pub fn employee_listing() -> Self {
        Self {
            items: vec![
                SelectItem::AllOf("e"),
                SelectItem::Column {
                    expr: "d.name",
                    alias: "department_name",
                },
            ],
            ..Self::employees_with_departments()
        }
    }

    pub fn count_of(table: Table) -> Self {
        Self {
            items: vec![SelectItem::CountAll {
                alias: format!("total_{}", table.name()),
            }],
            ..Self::all_of(table)
        }
    }

    pub fn salary_stats(stats: Vec<(AggregateFn, &'static str)>) -> Self {
        Self {
            items: stats
                .into_iter()
                .map(|(func, alias)| SelectItem::Aggregate {
                    func,
                    column: "salary",
                    alias,
                })
                .collect(),
            ..Self::all_of(Table::Employees)
        }
    }

    pub fn with_predicates(mut self, predicates: Vec<Predicate>) -> Self {
        self.predicates = predicates;
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Render to SQLite SQL.
    pub fn render(&self) -> String {
        let items: Vec<String> = self.items.iter().map(render_item).collect();
        let mut sql = format!("SELECT {} FROM {}", items.join(", "), self.table.name());
        if self.join.is_some() {
            sql.push_str(" e JOIN departments d ON e.department_id = d.id");
        }
        if !self.predicates.is_empty() {
            let conditions: Vec<String> = self.predicates.iter().map(render_predicate).collect();
            let _ = write!(sql, " WHERE {}", conditions.join(" AND "));
        }
        if let Some(limit) = self.limit {
            let _ = write!(sql, " LIMIT {limit}");
        }
        sql
    }
}

fn render_item(item: &SelectItem) -> String {
    match item {
        SelectItem::Star => "*".to_string(),
        SelectItem::AllOf(alias) => format!("{alias}.*"),
        SelectItem::Column { expr, alias } => format!("{expr} AS {alias}"),
        SelectItem::CountAll { alias } => format!("COUNT(*) AS {alias}"),
        SelectItem::Aggregate {
            func,
            column,
            alias,
        } => format!("{}({column}) AS {alias}", func.keyword()),
    }
}

fn render_predicate(predicate: &Predicate) -> String {
    match predicate {
        Predicate::Department(name) => {
            format!("UPPER(d.name) = {}", quote(&name.to_uppercase()))
        }
        Predicate::Salary { op, amount } => format!("e.salary {} {amount}", op.symbol()),
        Predicate::HireYear { op, year } => {
            format!("strftime('%Y', e.hire_date) {} {}", op.symbol(), quote(year))
        }
        Predicate::HiredWithinYears(years) => {
            format!("e.hire_date >= date('now', '-{years} years')")
        }
    }
}

fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_plain_table_scan() {
        insta::assert_snapshot!(SelectPlan::all_of(Table::Projects).render(), @"SELECT * FROM projects");
    }

    #[test]
    fn renders_join_with_predicates_and_limit() {
        let sql = SelectPlan::employee_listing()
            .with_predicates(vec![
                Predicate::Department("it".into()),
                Predicate::Salary {
                    op: Comparison::AtLeast,
                    amount: 60000,
                },
                Predicate::HireYear {
                    op: Comparison::Less,
                    year: "2021".into(),
                },
            ])
            .with_limit(5)
            .render();
        insta::assert_snapshot!(sql, @"SELECT e.*, d.name AS department_name FROM employees e JOIN departments d ON e.department_id = d.id WHERE UPPER(d.name) = 'IT' AND e.salary >= 60000 AND strftime('%Y', e.hire_date) < '2021' LIMIT 5");
    }

    #[test]
    fn quotes_are_escaped() {
        let sql = SelectPlan::employee_listing()
            .with_predicates(vec![Predicate::Department("r'n d".into())])
            .render();
        assert!(sql.ends_with("WHERE UPPER(d.name) = 'R''N D'"));
    }

    #[test]
    fn first_mentioned_table_follows_fixed_precedence() {
        assert_eq!(
            Table::first_mentioned("projects per department"),
            Some(Table::Departments)
        );
        assert_eq!(
            Table::first_mentioned("departments of each employee"),
            Some(Table::Employees)
        );
        assert_eq!(Table::first_mentioned("budget overview"), None);
    }
}
