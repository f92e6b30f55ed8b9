//! Intent taxonomy and per-intent payloads.

use serde::{Deserialize, Serialize};

use crate::model::Category;

/// Confidence below this triggers the low-confidence notice on
/// confirmations. Never a silent auto-correction.
pub const CONFIDENCE_THRESHOLD: f32 = 0.7;

/// The fixed intent taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    AddExpense,
    EditExpense,
    Greeting,
    Question,
    Unclear,
}

impl Intent {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "add_expense" => Some(Self::AddExpense),
            "edit_expense" => Some(Self::EditExpense),
            "greeting" => Some(Self::Greeting),
            "question" => Some(Self::Question),
            "unclear" => Some(Self::Unclear),
            _ => None,
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::AddExpense => "add_expense",
            Self::EditExpense => "edit_expense",
            Self::Greeting => "greeting",
            Self::Question => "question",
            Self::Unclear => "unclear",
        };
        write!(f, "{}", s)
    }
}

/// Payload for a new expense. `amount == None` is a terminal failure for
/// the message (syntax help), never a zero value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddPayload {
    pub amount: Option<i64>,
    pub description: String,
    pub category: Category,
    pub confidence: f32,
    pub needs_clarification: bool,
    pub clarification_question: Option<String>,
}

/// Payload for an edit. Every field is optional: `None` means
/// "unspecified, keep the prior value".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditPayload {
    pub amount: Option<i64>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub confidence: f32,
    pub needs_clarification: bool,
    pub clarification_question: Option<String>,
}

/// Question topics with canned replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionTopic {
    Expenses,
    Commands,
    Categories,
    Other,
}

impl QuestionTopic {
    /// Normalize an oracle-returned topic string. Out-of-set means `Other`.
    pub fn from_oracle(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "expenses" => Self::Expenses,
            "commands" => Self::Commands,
            "categories" => Self::Categories,
            _ => Self::Other,
        }
    }
}

/// The classifier's typed output: one tagged intent plus its payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum IntentResult {
    AddExpense(AddPayload),
    EditExpense(EditPayload),
    Greeting {
        should_show_help: bool,
    },
    Question {
        topic: QuestionTopic,
        should_show_help: bool,
    },
    Unclear {
        possible_intents: Vec<String>,
        clarification_question: String,
    },
}

impl IntentResult {
    pub fn intent(&self) -> Intent {
        match self {
            IntentResult::AddExpense(_) => Intent::AddExpense,
            IntentResult::EditExpense(_) => Intent::EditExpense,
            IntentResult::Greeting { .. } => Intent::Greeting,
            IntentResult::Question { .. } => Intent::Question,
            IntentResult::Unclear { .. } => Intent::Unclear,
        }
    }
}
