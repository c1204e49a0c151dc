use crate::model::Example;
use crate::storage::ExampleStore;
use std::collections::{HashMap, HashSet};

pub const DEFAULT_K: usize = 3;

/// Ranks stored examples against an incoming question.
///
/// Retrieval is advisory: any store failure degrades to "no examples used"
/// rather than blocking synthesis.
pub struct Retriever {
    store: ExampleStore,
}

impl Retriever {
    pub fn new(store: ExampleStore) -> Self {
        Self { store }
    }

    pub fn retrieve(&self, question: &str, k: usize) -> Vec<(String, String)> {
        let examples = match self.store.list() {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("example retrieval degraded: {}", e);
                return Vec::new();
            }
        };
        rank_by_overlap(question, &examples, k)
    }
}

fn tokenize(s: &str) -> Vec<String> {
    s.to_lowercase()
        .split_whitespace()
        .map(|w| w.to_string())
        .collect()
}

/// Token-overlap scoring between lowercased word sets. Zero-overlap examples
/// are excluded entirely; ties keep insertion order (stable sort).
pub fn rank_by_overlap(question: &str, examples: &[Example], k: usize) -> Vec<(String, String)> {
    let words: HashSet<String> = tokenize(question).into_iter().collect();

    let mut scored: Vec<(usize, &Example)> = examples
        .iter()
        .filter_map(|ex| {
            let overlap = tokenize(&ex.question)
                .into_iter()
                .collect::<HashSet<_>>()
                .intersection(&words)
                .count();
            (overlap > 0).then_some((overlap, ex))
        })
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored
        .into_iter()
        .take(k)
        .map(|(_, ex)| (ex.question.clone(), ex.query.clone()))
        .collect()
}

/// TF-IDF cosine scoring over the corpus {question} ∪ stored questions.
/// Functionally interchangeable with `rank_by_overlap` for the pipeline;
/// ranks every example (an empty store still yields an empty result).
pub fn rank_by_tfidf(question: &str, examples: &[Example], k: usize) -> Vec<(String, String)> {
    if examples.is_empty() {
        return Vec::new();
    }

    let docs: Vec<Vec<String>> = std::iter::once(question)
        .chain(examples.iter().map(|ex| ex.question.as_str()))
        .map(tokenize)
        .collect();

    let n_docs = docs.len() as f64;
    let mut df: HashMap<&str, usize> = HashMap::new();
    for doc in &docs {
        for term in doc.iter().collect::<HashSet<_>>() {
            *df.entry(term.as_str()).or_default() += 1;
        }
    }

    let vectorize = |doc: &[String]| -> HashMap<String, f64> {
        if doc.is_empty() {
            return HashMap::new();
        }
        let mut tf: HashMap<&str, usize> = HashMap::new();
        for term in doc {
            *tf.entry(term.as_str()).or_default() += 1;
        }
        tf.into_iter()
            .map(|(term, count)| {
                let idf = (n_docs / (1.0 + df[term] as f64)).ln() + 1.0;
                (term.to_string(), count as f64 / doc.len() as f64 * idf)
            })
            .collect()
    };

    let qvec = vectorize(&docs[0]);
    let mut scored: Vec<(f64, &Example)> = examples
        .iter()
        .enumerate()
        .map(|(i, ex)| (cosine(&qvec, &vectorize(&docs[i + 1])), ex))
        .collect();

    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    scored
        .into_iter()
        .take(k)
        .map(|(_, ex)| (ex.question.clone(), ex.query.clone()))
        .collect()
}

fn cosine(a: &HashMap<String, f64>, b: &HashMap<String, f64>) -> f64 {
    let dot: f64 = a
        .iter()
        .filter_map(|(t, x)| b.get(t).map(|y| x * y))
        .sum();
    let na: f64 = a.values().map(|x| x * x).sum::<f64>().sqrt();
    let nb: f64 = b.values().map(|x| x * x).sum::<f64>().sqrt();
    if na == 0.0 || nb == 0.0 {
        0.0
    } else {
        dot / (na * nb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ex(id: i64, question: &str, query: &str) -> Example {
        Example {
            id,
            question: question.into(),
            query: query.into(),
        }
    }

    #[test]
    fn zero_overlap_is_excluded() {
        let examples = vec![ex(1, "average cgpa by specialization", "SELECT 1;")];
        let out = rank_by_overlap("who is from bangalore", &examples, 3);
        assert!(out.is_empty());
    }

    #[test]
    fn bangalore_scenario_retrieves_stored_example() {
        let examples = vec![ex(
            1,
            "students from bangalore",
            "SELECT * FROM students WHERE LOWER(location) LIKE '%bangalore%';",
        )];
        let out = rank_by_overlap("who is from bangalore", &examples, 1);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].0, "students from bangalore");
    }

    #[test]
    fn higher_overlap_ranks_first() {
        let examples = vec![
            ex(1, "list all students", "SELECT 1;"),
            ex(2, "list students from pune", "SELECT 2;"),
        ];
        let out = rank_by_overlap("list students from pune please", &examples, 2);
        assert_eq!(out[0].1, "SELECT 2;");
        assert_eq!(out[1].1, "SELECT 1;");
    }

    #[test]
    fn ties_keep_insertion_order() {
        let examples = vec![
            ex(1, "students in pune", "SELECT 1;"),
            ex(2, "students in delhi", "SELECT 2;"),
        ];
        // Both overlap only on "students".
        let out = rank_by_overlap("students anywhere", &examples, 2);
        assert_eq!(out[0].1, "SELECT 1;");
        assert_eq!(out[1].1, "SELECT 2;");
    }

    #[test]
    fn k_caps_result_length() {
        let examples = vec![
            ex(1, "students a", "SELECT 1;"),
            ex(2, "students b", "SELECT 2;"),
            ex(3, "students c", "SELECT 3;"),
        ];
        let out = rank_by_overlap("students", &examples, 2);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn tfidf_empty_store_yields_empty() {
        assert!(rank_by_tfidf("anything", &[], 3).is_empty());
    }

    #[test]
    fn tfidf_prefers_closer_question() {
        let examples = vec![
            ex(1, "average cgpa of students", "SELECT 1;"),
            ex(2, "students from bangalore", "SELECT 2;"),
        ];
        let out = rank_by_tfidf("who is from bangalore", &examples, 1);
        assert_eq!(out[0].1, "SELECT 2;");
    }

    #[test]
    fn retriever_degrades_to_empty_without_schema() {
        // Store opened but schema never initialized: list() fails, retrieve
        // must swallow it.
        let store = ExampleStore::memory().unwrap();
        let retriever = Retriever::new(store);
        assert!(retriever.retrieve("who is from bangalore", 3).is_empty());
    }
}
