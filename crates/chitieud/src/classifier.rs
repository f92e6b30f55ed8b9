//! Intent classification via the language oracle.
//!
//! Converts a free-form Vietnamese message (plus the user's latest stored
//! expense, when one exists) into a typed `IntentResult`. Oracle failures of
//! any kind - transport, timeout, unparseable shape - downgrade to a
//! synthetic `Unclear` so the rest of the pipeline never special-cases them.

use serde::Deserialize;
use tracing::{info, warn};

use chitieu_common::error::BotError;
use chitieu_common::intent::{AddPayload, EditPayload, IntentResult, QuestionTopic};
use chitieu_common::model::{Category, ExpenseRecord};
use chitieu_common::replies;

use crate::amount;
use crate::oracle::Oracle;

/// Commands the transport handles itself. Slash text outside this set is
/// short-circuited before paying for a classification call.
pub const KNOWN_COMMANDS: &[&str] = &["/start", "/help", "/recent"];

/// Build the fixed system prompt: intent taxonomy, category keyword table,
/// amount suffix rules, confidence banding, and the five payload shapes.
pub fn build_system_prompt() -> String {
    let mut categories = String::new();
    for category in Category::ALL {
        if category == Category::Other {
            categories.push_str("- other: các khoản khác\n");
        } else {
            categories.push_str(&format!(
                "- {}: {}\n",
                category.as_str(),
                category.keywords().join(", ")
            ));
        }
    }

    format!(
        r#"Bạn là trợ lý phân tích chi tiêu. Phân loại tin nhắn tiếng Việt vào đúng một ý định: add_expense, edit_expense, greeting, question, unclear, và trả về JSON.

Quy tắc xử lý số tiền:
- "k", "nghìn", "ngàn": nhân với 1000
- "tr", "triệu": nhân với 1000000
- Mặc định đơn vị là VNĐ, làm tròn đến hàng nghìn
- Không tìm thấy số tiền: amount = null (không bao giờ đoán bằng 0)

Danh mục chi tiêu:
{categories}
Quy tắc chỉnh sửa (edit_expense):
- Trường người dùng không nhắc đến: để null (giữ nguyên giá trị cũ)
- "sửa thành 45k" chỉ có số tiền: description = null, category = null

Độ tin cậy: confidence trong [0, 1]. Dưới 0.7 nghĩa là không chắc chắn.
Tin nhắn mơ hồ: needs_clarification = true kèm clarification_question.

Trả về đúng một trong các dạng JSON sau:
{{"intent":"add_expense","amount":50000,"description":"ăn phở","category":"food","confidence":0.9,"needs_clarification":false,"clarification_question":null}}
{{"intent":"edit_expense","amount":45000,"description":null,"category":null,"confidence":0.9,"needs_clarification":false,"clarification_question":null}}
{{"intent":"greeting","should_show_help":false}}
{{"intent":"question","topic":"expenses","should_show_help":false}}
{{"intent":"unclear","possible_intents":["add_expense"],"clarification_question":"..."}}

topic thuộc: expenses, commands, categories, other.
CHỈ TRẢ VỀ JSON."#
    )
}

/// Build the user prompt. When a prior record exists its three editable
/// fields are supplied as explicit context, so the oracle can distinguish
/// an edit from a new expense.
pub fn build_user_prompt(text: &str, prior: Option<&ExpenseRecord>) -> String {
    match prior {
        Some(p) => format!(
            "Chi tiêu gần nhất:\n- Số tiền: {}đ\n- Mô tả: {}\n- Danh mục: {}\n\nTin nhắn: {}",
            p.amount, p.description, p.category, text
        ),
        None => format!("Hãy phân tích tin nhắn sau và trả về JSON: {}", text),
    }
}

/// Raw oracle output before validation. One loose shape covers all five
/// intents; the tagged `IntentResult` is built only after validation.
#[derive(Debug, Deserialize)]
struct OracleOutput {
    intent: String,
    #[serde(default)]
    amount: Option<f64>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    confidence: Option<f32>,
    #[serde(default)]
    needs_clarification: Option<bool>,
    #[serde(default)]
    clarification_question: Option<String>,
    #[serde(default)]
    topic: Option<String>,
    #[serde(default)]
    should_show_help: Option<bool>,
    #[serde(default)]
    possible_intents: Option<Vec<String>>,
}

/// Extract JSON from an oracle response, tolerating markdown code fences
/// and surrounding prose.
fn extract_json(response: &str) -> Result<String, BotError> {
    let t = response.trim();
    if t.starts_with('{') && t.ends_with('}') {
        return Ok(t.to_string());
    }
    if let (Some(start), Some(end)) = (t.find('{'), t.rfind('}')) {
        if start < end {
            return Ok(t[start..=end].to_string());
        }
    }
    Err(BotError::MalformedOracleResponse(
        "no JSON object in response".to_string(),
    ))
}

/// Drop negative, non-finite, overflowing, or zero-rounding oracle
/// amounts, and round the rest to thousand granularity. A rejected amount
/// is "unspecified", never a zero record.
fn sanitize_amount(raw: Option<f64>) -> Option<i64> {
    match raw {
        Some(v) if v >= 0.0 => amount::round_to_thousand(v).filter(|a| *a > 0),
        _ => None,
    }
}

fn sanitize_confidence(raw: Option<f32>) -> f32 {
    raw.unwrap_or(0.5).clamp(0.0, 1.0)
}

/// Validate a raw oracle response into a typed result.
///
/// `text` is the original utterance; it backs the defensive re-derivations
/// (amount from the normalizer, description fallback, local category
/// classification) when the oracle's output is missing a value.
pub fn parse_oracle_response(response: &str, text: &str) -> Result<IntentResult, BotError> {
    let json = extract_json(response)?;
    let output: OracleOutput = serde_json::from_str(&json)
        .map_err(|e| BotError::MalformedOracleResponse(e.to_string()))?;

    let needs_clarification = output.needs_clarification.unwrap_or(false);

    match output.intent.trim().to_lowercase().as_str() {
        "add_expense" => {
            // Re-derive a missing amount from the raw text before giving up.
            let amount = sanitize_amount(output.amount).or_else(|| amount::normalize_amount(text));
            let description = match output.description {
                Some(d) if !d.trim().is_empty() => d.trim().to_string(),
                _ => text.trim().to_string(),
            };
            let category = match output.category.as_deref() {
                Some(c) => Category::from_oracle(c),
                None => Category::classify_description(&description),
            };
            Ok(IntentResult::AddExpense(AddPayload {
                amount,
                description,
                category,
                confidence: sanitize_confidence(output.confidence),
                needs_clarification,
                clarification_question: output.clarification_question,
            }))
        }
        "edit_expense" => {
            // Null fields mean "keep the prior value"; nothing is re-derived
            // from text here, that would defeat field preservation.
            let description = output
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty() && d != text.trim());
            Ok(IntentResult::EditExpense(EditPayload {
                amount: sanitize_amount(output.amount),
                description,
                category: output.category.as_deref().map(Category::from_oracle),
                confidence: sanitize_confidence(output.confidence),
                needs_clarification,
                clarification_question: output.clarification_question,
            }))
        }
        "greeting" => Ok(IntentResult::Greeting {
            should_show_help: output.should_show_help.unwrap_or(false),
        }),
        "question" => Ok(IntentResult::Question {
            topic: QuestionTopic::from_oracle(output.topic.as_deref().unwrap_or("")),
            should_show_help: output.should_show_help.unwrap_or(false),
        }),
        "unclear" => Ok(IntentResult::Unclear {
            possible_intents: output.possible_intents.unwrap_or_default(),
            clarification_question: output
                .clarification_question
                .unwrap_or_else(|| replies::GENERIC_CLARIFICATION.to_string()),
        }),
        other => Err(BotError::MalformedOracleResponse(format!(
            "unknown intent: {}",
            other
        ))),
    }
}

/// Synthetic result used whenever the oracle cannot be trusted.
pub fn unclear_fallback() -> IntentResult {
    IntentResult::Unclear {
        possible_intents: Vec::new(),
        clarification_question: replies::GENERIC_CLARIFICATION.to_string(),
    }
}

/// Classify one utterance. Exactly one oracle call; never errors and never
/// retries - failure is an `Unclear` result.
pub async fn classify<O: Oracle>(
    oracle: &O,
    text: &str,
    prior: Option<&ExpenseRecord>,
) -> IntentResult {
    let system_prompt = build_system_prompt();
    let user_prompt = build_user_prompt(text, prior);

    let response = match oracle.structured_complete(&system_prompt, &user_prompt).await {
        Ok(r) => r,
        Err(e) => {
            warn!("oracle call failed, downgrading to unclear: {}", e);
            return unclear_fallback();
        }
    };

    match parse_oracle_response(&response, text) {
        Ok(result) => {
            info!("classifier: intent={}", result.intent());
            result
        }
        Err(e) => {
            warn!("oracle response rejected, downgrading to unclear: {}", e);
            unclear_fallback()
        }
    }
}

/// Cheap pre-filter for malformed command-like text. Returns a fast-path
/// "did you mean" reply for unknown slash commands; never decides between
/// add and edit - that distinction always comes from the classifier.
pub fn command_prefilter(text: &str) -> Option<String> {
    let t = text.trim();
    if !t.starts_with('/') {
        return None;
    }
    let cmd = t.split_whitespace().next().unwrap_or(t);
    if KNOWN_COMMANDS.contains(&cmd) {
        return None;
    }

    let closest = KNOWN_COMMANDS
        .iter()
        .max_by_key(|known| common_prefix_len(known, cmd))
        .copied()
        .unwrap_or("/help");
    Some(format!(
        "Lệnh không hợp lệ. Có phải bạn muốn dùng {}?",
        closest
    ))
}

fn common_prefix_len(a: &str, b: &str) -> usize {
    a.chars().zip(b.chars()).take_while(|(x, y)| x == y).count()
}
