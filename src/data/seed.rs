//! Schema definition and sample rows for the employee dataset.

/// Tables created on open, in dependency order.
pub const CREATE_TABLES_SQL: &str = "
    CREATE TABLE IF NOT EXISTS departments (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        description TEXT,
        manager_id INTEGER REFERENCES employees(id),
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP
    );
    CREATE TABLE IF NOT EXISTS employees (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        department_id INTEGER NOT NULL REFERENCES departments(id),
        salary REAL NOT NULL,
        hire_date DATE NOT NULL,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP
    );
    CREATE TABLE IF NOT EXISTS projects (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        description TEXT,
        start_date DATE NOT NULL,
        end_date DATE,
        budget REAL,
        status TEXT DEFAULT 'active',
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP
    );
";

/// Tables exposed through schema introspection.
pub const TABLES: &[&str] = &["employees", "departments", "projects"];

/// `(name, description)`; ids follow insertion order starting at 1.
pub const DEPARTMENTS: &[(&str, &str)] = &[
    ("IT", "Information Technology Department"),
    ("HR", "Human Resources Department"),
    ("Engineering", "Software Engineering Department"),
    ("Marketing", "Marketing and Sales Department"),
    ("Finance", "Finance and Accounting Department"),
];

pub struct EmployeeSeed {
    pub first_name: &'static str,
    pub last_name: &'static str,
    pub email: &'static str,
    pub department_id: i64,
    pub salary: f64,
    pub hire_date: &'static str,
}

pub const EMPLOYEES: &[EmployeeSeed] = &[
    EmployeeSeed { first_name: "John", last_name: "Doe", email: "john.doe@company.com", department_id: 1, salary: 75000.0, hire_date: "2020-01-15" },
    EmployeeSeed { first_name: "Jane", last_name: "Smith", email: "jane.smith@company.com", department_id: 2, salary: 65000.0, hire_date: "2019-03-22" },
    EmployeeSeed { first_name: "Bob", last_name: "Johnson", email: "bob.johnson@company.com", department_id: 3, salary: 95000.0, hire_date: "2021-06-10" },
    EmployeeSeed { first_name: "Alice", last_name: "Williams", email: "alice.williams@company.com", department_id: 4, salary: 70000.0, hire_date: "2020-11-05" },
    EmployeeSeed { first_name: "Charlie", last_name: "Brown", email: "charlie.brown@company.com", department_id: 5, salary: 80000.0, hire_date: "2018-08-30" },
    EmployeeSeed { first_name: "Diana", last_name: "Davis", email: "diana.davis@company.com", department_id: 3, salary: 85000.0, hire_date: "2021-02-18" },
    EmployeeSeed { first_name: "Edward", last_name: "Wilson", email: "edward.wilson@company.com", department_id: 1, salary: 72000.0, hire_date: "2019-12-12" },
    EmployeeSeed { first_name: "Fiona", last_name: "Moore", email: "fiona.moore@company.com", department_id: 4, salary: 68000.0, hire_date: "2022-04-25" },
    EmployeeSeed { first_name: "George", last_name: "Taylor", email: "george.taylor@company.com", department_id: 2, salary: 62000.0, hire_date: "2020-07-08" },
    EmployeeSeed { first_name: "Helen", last_name: "Anderson", email: "helen.anderson@company.com", department_id: 5, salary: 77000.0, hire_date: "2021-09-14" },
];

pub struct ProjectSeed {
    pub name: &'static str,
    pub description: &'static str,
    pub start_date: &'static str,
    pub end_date: Option<&'static str>,
    pub budget: f64,
    pub status: &'static str,
}

pub const PROJECTS: &[ProjectSeed] = &[
    ProjectSeed {
        name: "Web Application Redesign",
        description: "Redesign the company website with modern UI/UX",
        start_date: "2023-01-01",
        end_date: Some("2023-06-30"),
        budget: 150000.0,
        status: "completed",
    },
    ProjectSeed {
        name: "Mobile App Development",
        description: "Develop iOS and Android mobile applications",
        start_date: "2023-03-15",
        end_date: Some("2023-12-31"),
        budget: 200000.0,
        status: "active",
    },
    ProjectSeed {
        name: "Data Analytics Platform",
        description: "Build internal data analytics and reporting platform",
        start_date: "2023-07-01",
        end_date: None,
        budget: 300000.0,
        status: "active",
    },
    ProjectSeed {
        name: "Customer Support System",
        description: "Implement new customer support ticketing system",
        start_date: "2022-10-01",
        end_date: Some("2023-02-28"),
        budget: 75000.0,
        status: "completed",
    },
];
