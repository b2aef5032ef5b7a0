//! Keyword question generator: fixed canonical questions picked by
//! case-insensitive substring match on the raw tech-stack text.

use super::templates::{GENERAL_KEY, GENERAL_QUESTION};
use super::QuestionSet;

struct KeywordRule {
    label: &'static str,
    keywords: &'static [&'static str],
    questions: [&'static str; 2],
}

// Checked in order; each match adds one group.
const RULES: &[KeywordRule] = &[
    KeywordRule {
        label: "python",
        keywords: &["python"],
        questions: [
            "What are Python decorators and when would you use them?",
            "Explain difference between list, tuple, and set in Python.",
        ],
    },
    KeywordRule {
        label: "django",
        keywords: &["django"],
        questions: [
            "How does Django ORM work?",
            "Explain Django middleware with an example.",
        ],
    },
    KeywordRule {
        label: "java",
        keywords: &["java"],
        questions: [
            "What is the difference between abstract class and interface in Java?",
            "Explain JVM, JRE, and JDK.",
        ],
    },
    KeywordRule {
        label: "database",
        keywords: &["mysql", "database"],
        questions: [
            "What is normalization in databases?",
            "Explain difference between INNER JOIN and LEFT JOIN.",
        ],
    },
];

/// Groups keyed by canonical labels (`python`, `django`, `java`, `database`).
/// Falls back to a single `General` question when nothing matches.
pub fn keyword_questions(tech_stack: &str) -> QuestionSet {
    let haystack = tech_stack.to_lowercase();

    let mut questions: QuestionSet = RULES
        .iter()
        .filter(|rule| rule.keywords.iter().any(|k| haystack.contains(k)))
        .map(|rule| {
            (
                rule.label.to_string(),
                rule.questions.iter().map(|q| q.to_string()).collect(),
            )
        })
        .collect();

    if questions.is_empty() {
        questions.insert(GENERAL_KEY.to_string(), vec![GENERAL_QUESTION.to_string()]);
    }
    questions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::flatten;

    #[test]
    fn test_python_django_yields_four_questions_in_order() {
        let flat = flatten(&keyword_questions("Python, Django"));
        assert_eq!(
            flat,
            vec![
                "What are Python decorators and when would you use them?",
                "Explain difference between list, tuple, and set in Python.",
                "How does Django ORM work?",
                "Explain Django middleware with an example.",
            ]
        );
    }

    #[test]
    fn test_unknown_stack_yields_generic_question() {
        let questions = keyword_questions("Rust");
        assert_eq!(flatten(&questions), vec![GENERAL_QUESTION]);
        assert!(questions.contains_key(GENERAL_KEY));
    }

    #[test]
    fn test_order_is_fixed_regardless_of_input_order() {
        let questions = keyword_questions("MySQL, java, PYTHON");
        let keys: Vec<_> = questions.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["python", "java", "database"]);
    }

    #[test]
    fn test_mysql_and_database_share_one_group() {
        let questions = keyword_questions("mysql database");
        assert_eq!(questions.len(), 1);
        assert_eq!(questions["database"].len(), 2);
    }

    #[test]
    fn test_substring_match_includes_javascript() {
        assert!(keyword_questions("JavaScript").contains_key("java"));
    }

    #[test]
    fn test_empty_input_falls_back() {
        assert_eq!(flatten(&keyword_questions("")), vec![GENERAL_QUESTION]);
    }
}
