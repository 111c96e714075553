use uuid::Uuid;
use chrono::{DateTime, Utc};

/// What happened during a scanning session, in a form fit for the JSON-lines journal.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionEventKind {
    Unmatched { sku: String },
    Progress { customer: String, sku: String, scanned: u32, required: u32 },
    ItemCompleted { customer: String, sku: String, required: u32 },
    AlreadySatisfied { sku: String },
    OrderJustCompleted { customer: String },
    LabelPrinted { customer: String, page: u32, forced: bool },
    LabelLookupFailed { customer: String },
    PrintDispatchFailed { customer: String, reason: String },
    AlreadyPrinted { customer: String },
    NotReady { customer: String, pending: u64 },
    UnknownCustomer { customer: String },
    Reset { customer: Option<String> },
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct SessionEvent {
    pub session_id: Uuid,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: SessionEventKind,
}

impl SessionEvent {
    pub fn new(session_id: Uuid, kind: SessionEventKind) -> Self {
        Self {
            session_id,
            timestamp: Utc::now(),
            kind,
        }
    }

    /// Single journal line, without the trailing newline
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
