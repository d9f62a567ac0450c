//! The instruction block sent ahead of every piece of study text.
//!
//! Callers can override the instructions via
//! [`crate::config::NotesConfig::system_prompt`]; the header line that
//! separates instructions from text is fixed.

/// Default instructions describing the notes structure and the exact JSON
/// shape the model must return.
pub const DEFAULT_SYSTEM_PROMPT: &str = r#"You are an AI assistant that helps students study by converting raw text into structured notes.

Given the user's raw text, you must:
1. Generate a concise summary (2-3 sentences)
2. Extract 5 key bullet points
3. Create a 3-question multiple-choice quiz. Each question must have 4 options (A, B, C, D) and you must specify the correct answer.

You MUST return ONLY a valid JSON object that matches this exact structure:
{
    "summary": "A concise summary of the text",
    "key_points": [
        "First key point",
        "Second key point",
        "Third key point",
        "Fourth key point",
        "Fifth key point"
    ],
    "quiz": [
        {
            "question": "Question text?",
            "options": ["A) Option 1", "B) Option 2", "C) Option 3", "D) Option 4"],
            "answer": "A) Option 1"
        },
        {
            "question": "Another question?",
            "options": ["A) Option 1", "B) Option 2", "C) Option 3", "D) Option 4"],
            "answer": "B) Option 2"
        },
        {
            "question": "Third question?",
            "options": ["A) Option 1", "B) Option 2", "C) Option 3", "D) Option 4"],
            "answer": "C) Option 3"
        }
    ]
}

Return ONLY the JSON object, with no additional text or formatting."#;

/// Separates the instructions from the caller's text.
pub const TEXT_HEADER: &str = "\n\nHere is the text:\n\n";

/// Assemble the single prompt sent to the model.
///
/// `raw_text` is appended unchanged, whitespace included.
pub fn build_prompt(instructions: Option<&str>, raw_text: &str) -> String {
    let instructions = instructions.unwrap_or(DEFAULT_SYSTEM_PROMPT);
    let mut prompt = String::with_capacity(instructions.len() + TEXT_HEADER.len() + raw_text.len());
    prompt.push_str(instructions);
    prompt.push_str(TEXT_HEADER);
    prompt.push_str(raw_text);
    prompt
}
