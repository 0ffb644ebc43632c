pub const SYSTEM_PROMPT: &str = "You are a retrieval-augmented assistant.";

/// Renders the grounded-answer instruction around `context` and `question`.
pub fn render_user_prompt(context: &str, question: &str) -> String {
    format!(
        "Use ONLY the information found in the CONTEXT below to answer the QUESTION.\n\
         If the CONTEXT contains related information or synonyms, use it to infer an answer.\n\
         Do not say \"I don't know\" if the topic is mentioned, even indirectly.\n\
         \n\
         ---\n\
         CONTEXT:\n\
         {context}\n\
         ---\n\
         \n\
         QUESTION: {question}\n\
         \n\
         Provide a clear and concise answer, quoting the relevant sentence if needed."
    )
}
