//! LLM prompt engineering for claim extraction

/// Builds prompts for the LLM to extract claims
pub struct PromptBuilder {
    title: String,
    body: String,
    max_claims: usize,
}

impl PromptBuilder {
    /// Create a new prompt builder
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            max_claims: 10,
        }
    }

    /// Ask for at most this many claims
    pub fn with_max_claims(mut self, max_claims: usize) -> Self {
        self.max_claims = max_claims;
        self
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\n");

        prompt.push_str(&format!(
            "Return at most {} claims, ordered as they appear in the article.\n\n",
            self.max_claims
        ));

        prompt.push_str(&format!("Article title: {}\n", self.title));
        prompt.push_str("Article body:\n");
        prompt.push_str("---\n");
        prompt.push_str(&self.body);
        prompt.push_str("\n---\n\n");

        prompt.push_str(OUTPUT_FORMAT_REMINDER);

        prompt
    }
}

const EXTRACTION_INSTRUCTIONS: &str = r#"You are a fact-checker for a cryptocurrency news site.
Extract the verifiable factual claims from the article below.

A claim is a single sentence-level assertion that can be checked against public sources:
prices, dates, amounts, named events, who did what.

Rules:
- One fact per claim
- Skip opinions, predictions, advice and rhetorical questions
- Keep the wording close to the article
- "search_query" is a short web search (5-12 words) that would find evidence for the claim
- "importance" is "high" for prices, dates, amounts and central events, "medium" for supporting facts, "low" for background
- Do not repeat a claim"#;

const OUTPUT_FORMAT_REMINDER: &str = r#"Output format (JSON array only, no additional text):
[
  {
    "text": "the claim",
    "search_query": "query to verify it",
    "importance": "high" | "medium" | "low"
  }
]

Remember: Return ONLY valid JSON, no markdown code blocks, no explanations."#;
