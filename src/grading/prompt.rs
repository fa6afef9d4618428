use super::types::GradingRequest;

pub const GRADING_SYSTEM_PROMPT: &str = r#"
You are an experienced AP exam grader. Your ONLY role is to score student
free-response answers against the provided rubric.

RULES — ABSOLUTE, NO EXCEPTIONS:
1. Award points ONLY for rubric criteria the response explicitly satisfies.
2. NEVER award points for knowledge the rubric does not ask for.
3. Grade deterministically: the same response and rubric must always
   receive the same score.
4. The score must never exceed the stated maximum points.
5. Feedback must cite which rubric criteria were met and which were missed.
6. Output MUST be a single valid JSON object and nothing else.
"#;

/// Build the user prompt for a grading request.
///
/// Embeds the question, rubric, student response, and point maximum
/// verbatim and pins the exact JSON output schema. Pure string
/// composition, no side effects.
pub fn build_grading_prompt(request: &GradingRequest) -> String {
    format!(
        r#"Grade the following student response.

<question>
{question}
</question>

<rubric>
{rubric}
</rubric>

<student_response>
{response}
</student_response>

Maximum points: {max_points}

Respond with ONLY a JSON object in exactly this structure:

{{
  "score": <number between 0 and {max_points}>,
  "max_points": {max_points},
  "feedback": "<specific feedback referencing the rubric criteria>",
  "rubric_alignment": {{
    "<criterion name>": <number between 0.0 and 1.0>
  }}
}}
"#,
        question = request.question_prompt,
        rubric = request.rubric,
        response = request.student_response,
        max_points = request.max_points,
    )
}
