use super::chat::build_request;
use super::*;

#[test]
fn test_prompt_embeds_context_and_question() {
    let prompt = render_user_prompt("[Document 1] (Source: a.txt)\nbody", "what is it?");
    assert!(prompt.contains("CONTEXT:\n[Document 1] (Source: a.txt)\nbody\n---"));
    assert!(prompt.contains("QUESTION: what is it?"));
    assert!(prompt.starts_with("Use ONLY the information"));
}

#[test]
fn test_request_has_system_and_user_messages() {
    let request = build_request("ctx", "q");
    assert_eq!(request.messages.len(), 2);
}

#[test]
fn test_generator_keeps_model_name() {
    assert_eq!(GenaiGenerator::new(DEFAULT_GENERATION_MODEL).model(), "llama3.2");
}
