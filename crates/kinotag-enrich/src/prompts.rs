//! Prompt construction for the tag oracle.
//!
//! All three prompt pairs embed the active vocabulary verbatim, rendered at
//! oracle construction time. The dictionary text can therefore never drift
//! from the vocabulary the codec encodes against.

use kinotag_core::TagVocabulary;

use crate::engine::TagPolicy;

/// Render the vocabulary as the bracketed, quoted list the prompts embed.
fn dictionary_block(vocabulary: &TagVocabulary) -> String {
    let quoted: Vec<String> = vocabulary
        .tags()
        .iter()
        .map(|tag| format!("\"{tag}\""))
        .collect();
    format!("[{}]", quoted.join(", "))
}

/// System prompt for the classification call.
pub(crate) fn classify_system(vocabulary: &TagVocabulary) -> String {
    format!(
        "You are a strict classification model. You can only respond with words \
         from the dictionary below. You are not allowed to use any other words — \
         no variations, no synonyms, no guesses.\n\n\
         Return only a single comma-separated line. No extra text. No formatting. \
         No explanation.\n\n\
         Dictionary = {}",
        dictionary_block(vocabulary)
    )
}

/// User prompt for classifying one movie.
pub(crate) fn classify_user(title: &str, year: i32, policy: &TagPolicy) -> String {
    format!(
        "Describe the movie \"{title}\" ({year}) using only the dictionary provided \
         in the system prompt. You must choose between {min} and {max} words from \
         the dictionary. Return only a single comma-separated line. No extra text.",
        min = policy.min_tags,
        max = policy.max_tags,
    )
}

/// System prompt for the repair call.
pub(crate) fn repair_system(vocabulary: &TagVocabulary, policy: &TagPolicy) -> String {
    format!(
        "You are a strict language filter. Your job is to repair a given list of \
         descriptive words so that:\n\n\
         1. Only words from the dictionary below are used.\n\
         2. The final result contains {min} to {max} words total.\n\
         3. If any word is not in the dictionary, you must replace it with the \
         most semantically similar word from the dictionary.\n\
         4. Return a single comma-separated line with the final words.\n\n\
         Only use this dictionary:\n\n{}",
        dictionary_block(vocabulary),
        min = policy.min_tags,
        max = policy.max_tags,
    )
}

/// User prompt for repairing one rejected candidate line.
pub(crate) fn repair_user(raw: &str) -> String {
    format!(
        "Original input:\n{raw}\n\
         Return only a single comma-separated line. No extra text."
    )
}

/// System prompt for interpreting a free-text query as tags.
pub(crate) fn interpret_system(vocabulary: &TagVocabulary) -> String {
    format!(
        "You are a strict classification model. You can only respond with words \
         from the dictionary below. You are not allowed to use any other words — \
         no variations, no synonyms, no guesses.\n\n\
         Return only a single comma-separated line. No extra text. No formatting.\n\n\
         Dictionary = {}",
        dictionary_block(vocabulary)
    )
}

/// User prompt for rephrasing free text into dictionary words.
pub(crate) fn interpret_user(text: &str, policy: &TagPolicy) -> String {
    format!(
        "Rephrase the user input into a list of words from the dictionary.\n\n\
         User input:\n{text}\n\n\
         Return only a single comma-separated line. No extra text. Use minimum \
         {min} but no more than {max} words.",
        min = policy.min_tags,
        max = policy.max_tags,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dictionary_block_quotes_every_tag() {
        let vocabulary = TagVocabulary::movie_descriptors();
        let block = dictionary_block(&vocabulary);
        assert!(block.starts_with('['));
        assert!(block.ends_with(']'));
        assert!(block.contains("\"tense\""));
        assert!(block.contains("\"stylized-choreography\""));
        assert_eq!(block.matches('"').count(), 100);
    }

    #[test]
    fn test_classify_prompts_carry_contract() {
        let vocabulary = TagVocabulary::movie_descriptors();
        let policy = TagPolicy::default();
        let system = classify_system(&vocabulary);
        let user = classify_user("Heat", 1995, &policy);

        assert!(system.contains("Dictionary = ["));
        assert!(user.contains("\"Heat\" (1995)"));
        assert!(user.contains("between 5 and 10 words"));
    }

    #[test]
    fn test_repair_prompts_carry_contract() {
        let vocabulary = TagVocabulary::movie_descriptors();
        let policy = TagPolicy::default();
        let system = repair_system(&vocabulary, &policy);
        let user = repair_user("neo-noir, tense, crime-thriller");

        assert!(system.contains("5 to 10 words total"));
        assert!(system.contains("most semantically similar"));
        assert!(user.contains("neo-noir, tense, crime-thriller"));
    }

    #[test]
    fn test_interpret_user_embeds_query() {
        let policy = TagPolicy::default();
        let user = interpret_user("something bleak but beautiful", &policy);
        assert!(user.contains("something bleak but beautiful"));
    }
}
