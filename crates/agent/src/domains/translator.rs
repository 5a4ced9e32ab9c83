use serde_json::{json, Value};

/// No-op translation layer between agents. Kept only so the inter-agent
/// message shape has a home until real translation exists.
#[derive(Debug, Default)]
pub struct TranslatorAgent;

impl TranslatorAgent {
    pub fn new() -> Self {
        Self
    }

    pub fn translate(&self, message: &Value, target_agent: &str) -> Value {
        json!({
            "original_message": message,
            "target_agent": target_agent,
            "translated_content": format!("Translated content for {target_agent}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::TranslatorAgent;

    #[test]
    fn translation_is_a_pass_through_envelope() {
        let translator = TranslatorAgent::new();
        let message = json!({"query": "reorder stock"});

        let translated = translator.translate(&message, "logistics");

        assert_eq!(translated["original_message"], message);
        assert_eq!(translated["target_agent"], "logistics");
        assert_eq!(translated["translated_content"], "Translated content for logistics");
    }
}
