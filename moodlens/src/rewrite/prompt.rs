//! Generation prompt and raw-output cleanup.

use super::Tone;

/// Marker that ends the prompt; the generator's answer follows it.
pub const OUTPUT_MARKER: &str = "Output:";

const PROMPT_TEMPLATE: &str = r#"You are a careful editor.
Rewrite the following review in a {tone} tone.

Hard rules (must follow):
- Keep the original factual meaning and **do NOT change sentiment polarity**.
  - WRONG: "useless" -> "useful"
  - RIGHT : "useless" -> "not very useful"
  - WRONG: "awful" -> "great"
  - RIGHT : "awful" -> "poor"
- Remove profanity/insults by replacing with mild words (e.g., "fucking" -> "very").
- Soften strong subjective words (e.g., useless/awful/hate/really/very) without flipping polarity.
- Do NOT add apologies, sympathy, or new facts.
- Keep roughly similar length and structure.
- Output only the rewritten sentence.

Input: "{source}"
Output:"#;

/// Builds the rewrite prompt for `source` in the given tone. Double quotes
/// inside the source are escaped so the input stays one quoted string.
#[must_use]
pub fn build_prompt(tone: Tone, source: &str) -> String {
    PROMPT_TEMPLATE
        .replace("{tone}", tone.descriptor())
        .replace("{source}", &source.replace('"', "\\\""))
}

/// Cleans up raw generator output: drops an echoed prompt up to the first
/// [`OUTPUT_MARKER`], then trims whitespace and surrounding quotes.
#[must_use]
pub fn extract_generated_text(raw: &str) -> String {
    let text = raw
        .split_once(OUTPUT_MARKER)
        .map_or(raw, |(_, answer)| answer);
    text.trim_matches(|c: char| c == '"' || c == '\'' || c.is_whitespace())
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_prompt_embeds_tone_and_source() {
        let prompt = build_prompt(Tone::Polite, "It broke");
        assert!(prompt.contains("in a polite, respectful, non-confrontational tone"));
        assert!(prompt.contains("Input: \"It broke\""));
        assert!(prompt.ends_with(OUTPUT_MARKER));
    }

    #[test]
    fn test_prompt_escapes_quotes() {
        let prompt = build_prompt(Tone::Neutral, r#"the "premium" plan"#);
        assert!(prompt.contains(r#"Input: "the \"premium\" plan""#));
    }

    #[test]
    fn test_prompt_carries_worked_examples() {
        let prompt = build_prompt(Tone::Positive, "x");
        assert!(prompt.contains(r#"WRONG: "useless" -> "useful""#));
        assert!(prompt.contains(r#"RIGHT : "useless" -> "not very useful""#));
        assert!(prompt.contains("do NOT change sentiment polarity"));
        assert!(prompt.contains("Do NOT add apologies, sympathy, or new facts."));
        assert!(prompt.contains("Keep roughly similar length and structure."));
    }

    #[test]
    fn test_extract_strips_quotes_and_whitespace() {
        assert_eq!(extract_generated_text("  \"The app is poor.\"\n"), "The app is poor.");
        assert_eq!(extract_generated_text("'ok'"), "ok");
    }

    #[test]
    fn test_extract_after_echoed_prompt() {
        let raw = format!("{}\n \"The app is poor.\"", build_prompt(Tone::Neutral, "awful app"));
        assert_eq!(extract_generated_text(&raw), "The app is poor.");
    }

    #[test]
    fn test_extract_empty() {
        assert_eq!(extract_generated_text(""), "");
        assert_eq!(extract_generated_text("Output:  \"\" "), "");
    }
}
