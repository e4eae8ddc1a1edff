// All LLM prompt constants for candidate evaluation.

/// System prompt — pins the recruiter persona and JSON-only output.
pub const EVALUATION_SYSTEM: &str =
    "You are an expert technical recruiter. Respond ONLY with a valid JSON object.";

/// Evaluation prompt template. Replace `{position_context}`, `{name}`,
/// `{experiences}`, `{screening_answers}`, `{resume_text}` before sending.
///
/// The example keys match `EvaluationResult` field names exactly, including
/// `domain_knowledge` — the parser reads the same key the example shows.
pub const EVALUATION_PROMPT_TEMPLATE: &str = r#"Return ONLY a single JSON object formatted exactly like this example (replace with actual evaluations):

{
  "technical_skills": 7.5,
  "experience_relevance": 8.0,
  "cultural_fit": 7.5,
  "domain_knowledge": 8.0,
  "overall_score": 7.8,
  "domain_knowledge_notes": "Demonstrates strong...",
  "technical_notes": "Strong background in...",
  "experience_notes": "Relevant experience in...",
  "cultural_notes": "Shows alignment with...",
  "overall_explanation": "Overall assessment shows..."
}

Position Information:
{position_context}

Candidate Information:
Name: {name}
Experience: {experiences}
Screening Answers: {screening_answers}
Resume: {resume_text}

Evaluate based on:
1. Domain knowledge: how well they know the industry (score 1-10).
2. Technical skills: qualifications and technical experience (score 1-10).
3. Experience relevance: how well past roles align with the position (score 1-10).
4. Cultural fit: values alignment and team fit (score 1-10).

When conducting the evaluation, consider each company and position the candidate has worked in carefully; employer and industry relevance carries the most weight. Put little emphasis on the screening answers, as candidates are not always honest in answering them.

Provide detailed notes for each area and an overall explanation.
YOUR RESPONSE MUST BE ONLY THE JSON OBJECT."#;
