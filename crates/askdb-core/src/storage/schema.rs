pub const EXAMPLES_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS examples (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  question TEXT NOT NULL,
  query TEXT NOT NULL,
  created_at TEXT NOT NULL
);
"#;

pub const STUDENTS_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS students (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  name TEXT,
  cgpa REAL,
  location TEXT,
  email TEXT,
  phone_number TEXT,
  preferred_work_location TEXT,
  specialization TEXT
);
"#;
