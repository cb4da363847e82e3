use crate::{
    error::{CatalogError, CatalogResult},
    models::VibeCandidate,
};

/// Builds the generation prompt for a set of mood tags
///
/// Titles in `exclusions` are ones the user has already rated.
pub fn build_prompt(tags: &[String], exclusions: &[String], count: usize) -> String {
    let mut prompt = format!(
        "Recommend {} movies that match all of these vibes: {}.",
        count,
        tags.join(", ")
    );

    if !exclusions.is_empty() {
        prompt.push_str(&format!(
            " The user has already seen these movies, do not recommend any of them: {}.",
            exclusions.join("; ")
        ));
    }

    prompt.push_str(
        " Respond with only a JSON array of objects, each with the keys \"title\" (string) \
         and \"releaseYear\" (integer), and no other text.",
    );

    prompt
}

/// Parses the generator's reply into candidates, keeping generation order
///
/// Models sometimes wrap the array in code fences or prose. A ```` ```json ````
/// block is preferred when present; otherwise every `[` is tried in turn and
/// the first position that deserializes as a candidate list wins, so brackets
/// in the surrounding prose are skipped.
pub fn parse_candidates(text: &str) -> CatalogResult<Vec<VibeCandidate>> {
    let body = fenced_json(text).unwrap_or(text);
    let mut last_error = None;

    for (start, _) in body.match_indices('[') {
        let mut values =
            serde_json::Deserializer::from_str(&body[start..]).into_iter::<Vec<VibeCandidate>>();

        match values.next() {
            Some(Ok(candidates)) => return Ok(candidates),
            Some(Err(e)) => last_error = Some(e),
            None => {}
        }
    }

    match last_error {
        Some(e) => {
            tracing::warn!(error = %e, "Failed to parse vibe candidates");
            Err(CatalogError::Decode(format!("Malformed candidate list: {}", e)))
        }
        None => Err(CatalogError::Decode(
            "Generator response did not contain a JSON array".to_string(),
        )),
    }
}

/// Contents of the first ```` ```json ```` fence, if the reply has a closed one
fn fenced_json(text: &str) -> Option<&str> {
    const FENCE: &str = "```json";

    let start = text.find(FENCE)? + FENCE.len();
    let end = start + text[start..].find("```")?;
    Some(&text[start..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_tags_and_exclusions() {
        let tags = vec!["cozy".to_string(), "rainy day".to_string()];
        let exclusions = vec!["Amélie".to_string(), "Paddington 2".to_string()];

        let prompt = build_prompt(&tags, &exclusions, 8);

        assert!(prompt.starts_with("Recommend 8 movies"));
        assert!(prompt.contains("cozy, rainy day"));
        assert!(prompt.contains("Amélie; Paddington 2"));
        assert!(prompt.contains("\"releaseYear\""));
    }

    #[test]
    fn test_prompt_without_exclusions() {
        let prompt = build_prompt(&["tense".to_string()], &[], 5);
        assert!(!prompt.contains("already seen"));
    }

    #[test]
    fn test_parse_plain_array() {
        let text = r#"[{"title":"Heat","releaseYear":1995},{"title":"Thief","releaseYear":1981}]"#;
        let candidates = parse_candidates(text).unwrap();

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].title, "Heat");
        assert_eq!(candidates[1].release_year, 1981);
    }

    #[test]
    fn test_parse_fenced_array() {
        let text = "Here you go:\n```json\n[{\"title\": \"Collateral\", \"releaseYear\": 2004}]\n```";
        let candidates = parse_candidates(text).unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].title, "Collateral");
    }

    #[test]
    fn test_parse_skips_brackets_in_prose() {
        let text = "Here are [2] picks for you:\n```json\n[{\"title\":\"Heat\",\"releaseYear\":1995}]\n```";
        let candidates = parse_candidates(text).unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].title, "Heat");
    }

    #[test]
    fn test_parse_unfenced_with_surrounding_brackets() {
        let text = r#"Top [3] list: [{"title":"Heat","releaseYear":1995},{"title":"Ronin","releaseYear":1998}] [note: all thrillers]"#;
        let candidates = parse_candidates(text).unwrap();

        let titles: Vec<&str> = candidates.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Heat", "Ronin"]);
    }

    #[test]
    fn test_fenced_json_extraction() {
        assert_eq!(fenced_json("a ```json\n[1]\n``` b"), Some("\n[1]\n"));
        assert_eq!(fenced_json("```json\n[1]"), None);
        assert_eq!(fenced_json("[1]"), None);
    }

    #[test]
    fn test_parse_empty_array() {
        assert!(parse_candidates("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_non_array() {
        let result = parse_candidates("I cannot help with that.");
        assert!(matches!(result, Err(CatalogError::Decode(_))));
    }

    #[test]
    fn test_parse_rejects_wrong_shape() {
        let result = parse_candidates(r#"[{"name": "Heat"}]"#);
        assert!(matches!(result, Err(CatalogError::Decode(_))));
    }
}
