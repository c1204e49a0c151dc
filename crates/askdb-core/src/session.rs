use crate::model::QueryResult;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Per-conversation result state: the last question, the SQL it produced and
/// the materialized result, paged in memory. An explicit object passed by
/// the caller, never process-wide state.
#[derive(Debug, Clone)]
pub struct Session {
    pub last_question: Option<String>,
    pub last_sql: Option<String>,
    last_result: Option<QueryResult>,
    page: usize,
    page_size: usize,
}

impl Session {
    pub fn new(page_size: usize) -> Self {
        Self {
            last_question: None,
            last_sql: None,
            last_result: None,
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn record(&mut self, question: &str, sql: &str, result: QueryResult) {
        self.last_question = Some(question.to_string());
        self.last_sql = Some(sql.to_string());
        self.last_result = Some(result);
        self.page = 1;
    }

    pub fn result(&self) -> Option<&QueryResult> {
        self.last_result.as_ref()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total_pages(&self) -> usize {
        match &self.last_result {
            Some(r) if !r.rows.is_empty() => r.rows.len().div_ceil(self.page_size),
            _ => 0,
        }
    }

    pub fn current_rows(&self) -> &[Vec<String>] {
        let Some(r) = &self.last_result else {
            return &[];
        };
        let start = (self.page - 1) * self.page_size;
        if start >= r.rows.len() {
            return &[];
        }
        let end = (start + self.page_size).min(r.rows.len());
        &r.rows[start..end]
    }

    pub fn goto_page(&mut self, page: usize) {
        let total = self.total_pages().max(1);
        self.page = page.clamp(1, total);
    }

    pub fn next_page(&mut self) {
        self.goto_page(self.page + 1);
    }

    pub fn prev_page(&mut self) {
        self.goto_page(self.page.saturating_sub(1));
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with_rows(n: usize) -> QueryResult {
        QueryResult {
            columns: vec!["name".into()],
            rows: (0..n).map(|i| vec![format!("row{}", i)]).collect(),
        }
    }

    #[test]
    fn paging_slices_rows() {
        let mut s = Session::new(10);
        s.record("q", "SELECT 1;", result_with_rows(25));
        assert_eq!(s.total_pages(), 3);
        assert_eq!(s.current_rows().len(), 10);

        s.next_page();
        assert_eq!(s.page(), 2);
        assert_eq!(s.current_rows()[0][0], "row10");

        s.goto_page(3);
        assert_eq!(s.current_rows().len(), 5);
    }

    #[test]
    fn page_clamps_at_bounds() {
        let mut s = Session::new(10);
        s.record("q", "SELECT 1;", result_with_rows(5));
        s.goto_page(99);
        assert_eq!(s.page(), 1);
        s.prev_page();
        assert_eq!(s.page(), 1);
    }

    #[test]
    fn new_result_resets_to_first_page() {
        let mut s = Session::new(10);
        s.record("q1", "SELECT 1;", result_with_rows(30));
        s.goto_page(3);
        s.record("q2", "SELECT 2;", result_with_rows(30));
        assert_eq!(s.page(), 1);
        assert_eq!(s.last_question.as_deref(), Some("q2"));
    }

    #[test]
    fn empty_result_has_no_pages() {
        let mut s = Session::new(10);
        s.record("q", "SELECT 1;", result_with_rows(0));
        assert_eq!(s.total_pages(), 0);
        assert!(s.current_rows().is_empty());
    }
}
