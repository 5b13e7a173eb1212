/// System prompt for the summarization call.
pub const SYSTEM_PROMPT: &str =
    "You are a helpful assistant that creates clear, structured summaries.";

/// Build a deterministic summary prompt for meeting transcripts.
pub fn build_summary_prompt(title: &str, transcript: &str) -> String {
    format!(
        "You are an expert at summarizing meeting transcripts.\n\
Meeting title: {title}\n\
\n\
Provide a comprehensive summary of the following meeting transcript.\n\
Return Markdown with exactly these sections:\n\
1. ## Key Discussion Points\n\
2. ## Decisions\n\
3. ## Action Items\n\
4. ## Announcements\n\
\n\
Rules:\n\
- Use only information present in the transcript.\n\
- If a section has no content, write 'None'.\n\
- Keep each bullet short and concrete.\n\
\n\
Transcript:\n\
{transcript}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_requests_all_four_sections() {
        let prompt = build_summary_prompt("Budget review", "we talked about money");
        for section in [
            "## Key Discussion Points",
            "## Decisions",
            "## Action Items",
            "## Announcements",
        ] {
            assert!(prompt.contains(section), "missing section: {section}");
        }
        assert!(prompt.contains("Budget review"));
        assert!(prompt.contains("we talked about money"));
    }
}
