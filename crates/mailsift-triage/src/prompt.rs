//! LLM prompts for classification, intent and field extraction

use mailsift_domain::LlmRequest;

const CLASSIFY_SYSTEM: &str = "You are a helpful assistant classifying emails.";
const INTENT_SYSTEM: &str = "You are a helpful assistant determining the primary intent of an email.";
const EXTRACT_SYSTEM: &str = "You are a helpful assistant extracting data from emails.";

/// Ask for a request type, sub-request type, reasoning and a confidence score
pub(crate) fn classification(email_text: &str, request_types: &[String]) -> LlmRequest {
    let prompt = format!(
        "Classify this email into one of the following types: {}.\n\
         Provide the request type, sub-request type, reasoning, and a confidence score (0-1).\n\
         Email: {}",
        request_types.join(", "),
        email_text
    );
    LlmRequest::new(prompt).with_system(CLASSIFY_SYSTEM)
}

/// Ask for the primary intent of the email
pub(crate) fn primary_intent(email_text: &str) -> LlmRequest {
    LlmRequest::new(format!("What is the primary intent of this email: {}", email_text)).with_system(INTENT_SYSTEM)
}

/// Ask for `fields`, with `N/A` for any that are missing
pub(crate) fn extraction(email_text: &str, request_type: &str, fields: &[String]) -> LlmRequest {
    let prompt = format!(
        "Extract the following fields from this email related to {}.\n\
         If a field is not present, return 'N/A'.\n\
         Fields: {}.\n\
         Email: {}",
        request_type,
        fields.join(", "),
        email_text
    );
    LlmRequest::new(prompt).with_system(EXTRACT_SYSTEM)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailsift_domain::{default_extract_fields, default_request_types};

    #[test]
    fn test_classification_lists_types() {
        let request = classification("Pay the fee.", &default_request_types());
        assert!(request
            .prompt
            .starts_with("Classify this email into one of the following types: Adjustment, Fee Payment,"));
        assert!(request.prompt.contains("Closing Notice.\n"));
        assert!(request.prompt.ends_with("Email: Pay the fee."));
        assert_eq!(request.system.as_deref(), Some(CLASSIFY_SYSTEM));
    }

    #[test]
    fn test_extraction_lists_fields() {
        let request = extraction("body", "Fee Payment", &default_extract_fields());
        assert!(request.prompt.contains("related to Fee Payment."));
        assert!(request.prompt.contains("Fields: Deal Name, Amount, Expiration Date."));
        assert!(request.prompt.contains("return 'N/A'"));
    }

    #[test]
    fn test_primary_intent() {
        let request = primary_intent("body");
        assert_eq!(request.prompt, "What is the primary intent of this email: body");
        assert_eq!(request.system.as_deref(), Some(INTENT_SYSTEM));
    }
}
