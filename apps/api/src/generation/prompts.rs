// Prompt constants for model-backed question generation.

/// Sampling temperature for question generation.
pub const QUESTION_TEMPERATURE: f32 = 0.7;

/// Question generation prompt. Replace `{techs}` with the comma-separated tech list.
pub const QUESTION_PROMPT_TEMPLATE: &str =
    "You are an interviewer. For each of these technologies: {techs}, \
generate 3 to 5 diverse, practical technical interview questions. \
Keep them short, clear, and challenging.\n\n\
Format:\n\
Technology: <name>\n\
- Question 1\n\
- Question 2\n\
...\n\n";

pub fn build_question_prompt(techs: &[String]) -> String {
    QUESTION_PROMPT_TEMPLATE.replace("{techs}", &techs.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_comma_separated_techs() {
        let prompt = build_question_prompt(&["Python".to_string(), "SQL".to_string()]);
        assert!(prompt.starts_with(
            "You are an interviewer. For each of these technologies: Python, SQL, generate"
        ));
        assert!(
            prompt.contains("Format:\nTechnology: <name>\n- Question 1\n- Question 2\n...\n\n")
        );
        assert!(!prompt.contains("{techs}"));
    }
}
