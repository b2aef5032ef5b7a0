//! Template question generator: deterministic fallback used whenever the model
//! is unavailable, fails, or returns nothing usable.

use super::QuestionSet;

pub const GENERAL_KEY: &str = "General";
pub const GENERAL_QUESTION: &str =
    "Tell us about a project where you applied your main tech stack.";

/// Three template questions per technology, keyed by the technology as given.
/// An empty list produces a single `General` entry.
pub fn template_questions(techs: &[String]) -> QuestionSet {
    let mut questions: QuestionSet = techs
        .iter()
        .map(|tech| (tech.clone(), questions_for(tech)))
        .collect();

    if questions.is_empty() {
        questions.insert(GENERAL_KEY.to_string(), vec![GENERAL_QUESTION.to_string()]);
    }
    questions
}

/// The three template questions for a single technology.
pub fn questions_for(tech: &str) -> Vec<String> {
    let name = display_name(tech);
    vec![
        format!("Explain a core concept of {name}."),
        format!("Describe a real-world use case of {name}."),
        format!("Give a short code example using {name}."),
    ]
}

/// First word of the technology, first letter upper-cased and the rest lower-cased.
fn display_name(tech: &str) -> String {
    let word = tech.split_whitespace().next().unwrap_or("");
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn techs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_three_questions_per_technology() {
        let list = techs(&["python", "Spring Boot", "SQL"]);
        let questions = template_questions(&list);

        assert_eq!(questions.len(), 3);
        let expected = [("python", "Python"), ("Spring Boot", "Spring"), ("SQL", "Sql")];
        for (tech, expected_name) in expected {
            let qs = &questions[tech];
            assert_eq!(qs.len(), 3);
            assert!(qs.iter().all(|q| q.contains(expected_name)), "{qs:?}");
        }
    }

    #[test]
    fn test_keys_keep_input_order_and_spelling() {
        let list = techs(&["rust", "Go", "node.js"]);
        let keys: Vec<_> = template_questions(&list).keys().cloned().collect();
        assert_eq!(keys, list);
    }

    #[test]
    fn test_question_wording() {
        assert_eq!(
            questions_for("django rest framework"),
            vec![
                "Explain a core concept of Django.",
                "Describe a real-world use case of Django.",
                "Give a short code example using Django.",
            ]
        );
    }

    #[test]
    fn test_empty_list_yields_general_entry() {
        let questions = template_questions(&[]);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[GENERAL_KEY], vec![GENERAL_QUESTION.to_string()]);
    }

    #[test]
    fn test_blank_technology_does_not_panic() {
        let questions = template_questions(&techs(&["   "]));
        assert_eq!(questions["   "][0], "Explain a core concept of .");
    }

    #[test]
    fn test_duplicate_technologies_collapse_to_one_key() {
        let questions = template_questions(&techs(&["Rust", "Rust"]));
        assert_eq!(questions.len(), 1);
        assert_eq!(questions["Rust"].len(), 3);
    }
}
