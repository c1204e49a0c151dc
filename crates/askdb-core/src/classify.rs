use crate::model::QueryClass;

/// Leading keywords that mutate schema or data. Anything else is READ.
pub const WRITE_KEYWORDS: [&str; 8] = [
    "insert", "update", "delete", "drop", "alter", "create", "replace", "truncate",
];

/// Total classification on the first token of the trimmed statement,
/// case-insensitive. An empty statement classifies READ here but is rejected
/// before execution by the gateway, so it never rides the non-privileged path.
pub fn classify(sql: &str) -> QueryClass {
    let first = sql
        .trim()
        .split_whitespace()
        .next()
        .map(|w| w.to_lowercase())
        .unwrap_or_default();
    if WRITE_KEYWORDS.contains(&first.as_str()) {
        QueryClass::Write
    } else {
        QueryClass::Read
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_is_read() {
        assert_eq!(classify("SELECT * FROM students;"), QueryClass::Read);
    }

    #[test]
    fn every_write_keyword_classifies_write() {
        for kw in WRITE_KEYWORDS {
            let sql = format!("{} something", kw);
            assert_eq!(classify(&sql), QueryClass::Write, "keyword: {}", kw);
        }
    }

    #[test]
    fn classification_is_case_insensitive() {
        assert_eq!(classify("DeLeTe FROM students;"), QueryClass::Write);
        assert_eq!(classify("sElEcT 1;"), QueryClass::Read);
    }

    #[test]
    fn leading_whitespace_is_ignored() {
        assert_eq!(classify("   DROP TABLE students;"), QueryClass::Write);
    }

    #[test]
    fn only_first_token_matters() {
        assert_eq!(
            classify("SELECT name FROM students WHERE note = 'delete me';"),
            QueryClass::Read
        );
    }

    #[test]
    fn empty_and_garbage_are_read() {
        assert_eq!(classify(""), QueryClass::Read);
        assert_eq!(classify("   "), QueryClass::Read);
        assert_eq!(classify("explain stuff"), QueryClass::Read);
    }
}
