use crate::llm::{ChatMessage, ChatRequest};

pub const SYSTEM_PROMPT: &str = "You are an AI assistant that helps analyze survey data.";

pub fn answer_prompt(query: &str, context: &str) -> String {
    format!(
        "Based on the question: '{}', here's the analysis:\n{}\n\nAnswer:",
        query, context
    )
}

pub fn sentiment_prompt(context: &str) -> String {
    format!("Analyze the sentiment of the following context: {}", context)
}

pub fn answer_request(query: &str, context: &str, max_tokens: u32) -> ChatRequest {
    ChatRequest::new(vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(answer_prompt(query, context)),
    ])
    .with_max_tokens(max_tokens)
}

pub fn sentiment_request(context: &str, max_tokens: u32) -> ChatRequest {
    ChatRequest::new(vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(sentiment_prompt(context)),
    ])
    .with_max_tokens(max_tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_request_wraps_question_and_context() {
        let request = answer_request("Who buys eco gifts?", "row one\n\nrow two", 150);

        assert_eq!(request.max_tokens, Some(150));
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0], ChatMessage::system(SYSTEM_PROMPT));
        assert_eq!(
            request.messages[1].content,
            "Based on the question: 'Who buys eco gifts?', here's the analysis:\nrow one\n\nrow two\n\nAnswer:"
        );
    }

    #[test]
    fn sentiment_request_uses_its_own_budget() {
        let request = sentiment_request("ctx", 1000);

        assert_eq!(request.max_tokens, Some(1000));
        assert_eq!(
            request.messages[1].content,
            "Analyze the sentiment of the following context: ctx"
        );
    }
}
