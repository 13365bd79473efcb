//! Triage result for a single email

/// Outcome of triaging one email
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmailReport {
    /// Rendered `From` header
    pub sender: Option<String>,

    /// `Subject` header
    pub subject: Option<String>,

    /// Raw classification text returned by the LLM
    pub classification: String,

    /// Configured request type named by the classification, if any
    pub request_type: Option<String>,

    /// Primary intent, `None` when the LLM call failed
    pub primary_intent: Option<String>,

    /// Extracted fields, `None` when the LLM call failed
    pub extracted_data: Option<String>,

    /// Body plus attachment text that was sent to the LLM
    pub email_text: String,
}
