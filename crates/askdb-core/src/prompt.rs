use std::fmt::Write;

/// The closed specialization vocabulary. Enforced at the prompt level only;
/// synthesized queries may still carry free-text values outside this list.
pub const SPECIALIZATIONS: [&str; 10] = [
    "Computer Science",
    "Electronics and Communication",
    "Mechanical Engineering",
    "Civil Engineering",
    "Electrical Engineering",
    "Information Technology",
    "Chemical Engineering",
    "Aerospace Engineering",
    "Biotechnology",
    "Environmental Engineering",
];

const SCHEMA_BLOCK: &str = "\
Table Name: students
Columns (use these exact column names in your query):
- name (TEXT)
- cgpa (REAL)
- location (TEXT)
- email (TEXT)
- phone_number (TEXT)
- preferred_work_location (TEXT)
- specialization (TEXT)
";

const RULES_BLOCK: &str = "\
Only return the SQL query, nothing else. Make string comparisons case-insensitive and whitespace-safe by using LOWER(TRIM(column_name)) and LOWER(TRIM('value')) where applicable.

When converting natural language to SQL:

- For any string comparison (e.g., name, location, specialization), always:
  - Apply LOWER(TRIM(column_name)) to the column
  - If the user asks for partial matches (e.g., \"contains\", \"includes\", \"from\", \"with\", etc.), use:
    - LIKE '%' || LOWER(TRIM('value')) || '%'
  - If the user asks for exact matches (e.g., \"is\", \"equals\", \"named\", etc.), use:
    - = LOWER(TRIM('value'))

- When matching against 'location':
  - Use LOWER(TRIM(location)) LIKE '%' || LOWER(TRIM('value')) || '%'
  - This helps match phrases like \"Bangalore\", \"Bangalore, Karnataka\", or \"from Whitefield, Bangalore\"

- Always sanitize string comparisons by trimming and lowercasing both sides
- For numeric conditions (e.g., CGPA between X and Y), ensure the logic is correctly used with BETWEEN or >= / <=
- For aggregate questions (count, average, maximum, minimum), return a single aggregate query over the whole table, e.g. SELECT AVG(cgpa) FROM students
";

/// Deterministic prompt assembly: schema + rules + retrieved examples +
/// the user question. No side effects.
pub fn build_prompt(question: &str, examples: &[(String, String)]) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "You are an expert SQL assistant. Given a natural language request, convert it into a valid SQLite SQL query that works with the following table:\n\n",
    );
    prompt.push_str(SCHEMA_BLOCK);

    prompt.push_str(
        "\nWhen mapping user input about \"specialization,\" restrict it strictly to one or multiple of these 10 allowed specializations (case-insensitive match):\n",
    );
    for (i, s) in SPECIALIZATIONS.iter().enumerate() {
        writeln!(prompt, "{}. {}", i + 1, s).unwrap();
    }

    prompt.push('\n');
    prompt.push_str(RULES_BLOCK);

    if !examples.is_empty() {
        prompt.push_str("\nExamples:\n");
        for (q, sql) in examples {
            writeln!(prompt, "Q: {}", q).unwrap();
            writeln!(prompt, "{}", sql.trim()).unwrap();
        }
    }

    write!(prompt, "\nUser Question: {}", question).unwrap();
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_every_column_and_specialization() {
        let p = build_prompt("who is from pune", &[]);
        for col in [
            "name (TEXT)",
            "cgpa (REAL)",
            "location (TEXT)",
            "email (TEXT)",
            "phone_number (TEXT)",
            "preferred_work_location (TEXT)",
            "specialization (TEXT)",
        ] {
            assert!(p.contains(col), "missing column: {}", col);
        }
        for s in SPECIALIZATIONS {
            assert!(p.contains(s), "missing specialization: {}", s);
        }
    }

    #[test]
    fn no_examples_renders_no_example_block() {
        let p = build_prompt("who is from pune", &[]);
        assert!(!p.contains("Examples:"));
        assert!(!p.contains("Q: "));
    }

    #[test]
    fn examples_render_as_question_query_blocks() {
        let examples = vec![(
            "students from bangalore".to_string(),
            "SELECT * FROM students WHERE LOWER(location) LIKE '%bangalore%';".to_string(),
        )];
        let p = build_prompt("who is from bangalore", &examples);
        assert!(p.contains("Examples:\nQ: students from bangalore\nSELECT * FROM students"));
    }

    #[test]
    fn ends_with_user_question() {
        let p = build_prompt("who is from pune", &[]);
        assert!(p.ends_with("User Question: who is from pune"));
    }

    #[test]
    fn assembly_is_deterministic() {
        let examples = vec![("a".to_string(), "SELECT 1;".to_string())];
        assert_eq!(
            build_prompt("q", &examples),
            build_prompt("q", &examples)
        );
    }
}
