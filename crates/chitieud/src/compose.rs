//! Response composer - pure rendering of one reply per outcome.
//!
//! No state, no storage: every function maps values to one of the fixed
//! message templates, so the whole module is table-testable.

use chitieu_common::intent::{QuestionTopic, CONFIDENCE_THRESHOLD};
use chitieu_common::model::{Category, ExpenseRecord, FieldChange};
use chitieu_common::replies;

/// Thousand separators, "50000" -> "50,000".
pub fn format_amount(amount: i64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Confirmation for a newly recorded expense. Appends the low-confidence
/// notice below the threshold.
pub fn add_confirmation(
    amount: i64,
    description: &str,
    category: Category,
    confidence: f32,
) -> String {
    let mut reply = format!(
        "✅ Đã ghi nhận chi tiêu:\n💰 Số tiền: {}đ\n📝 Mô tả: {}\n🏷️ Danh mục: {}",
        format_amount(amount),
        description,
        category
    );
    if confidence < CONFIDENCE_THRESHOLD {
        reply.push_str("\n\n");
        reply.push_str(replies::LOW_CONFIDENCE_NOTICE);
    }
    reply
}

fn render_change(change: &FieldChange) -> String {
    match change {
        FieldChange::Amount { old, new } => format!(
            "💰 Số tiền: {}đ → {}đ",
            format_amount(*old),
            format_amount(*new)
        ),
        FieldChange::Description { old, new } => format!("📝 Mô tả: {} → {}", old, new),
        FieldChange::Category { old, new } => format!("🏷️ Danh mục: {} → {}", old, new),
    }
}

/// Confirmation for an applied edit, one line per changed field.
pub fn edit_confirmation(diff: &[FieldChange], confidence: f32) -> String {
    let mut reply = String::from("✏️ Đã ghi nhận lại chi tiêu:");
    for change in diff {
        reply.push('\n');
        reply.push_str(&render_change(change));
    }
    if confidence < CONFIDENCE_THRESHOLD {
        reply.push_str("\n\n");
        reply.push_str(replies::LOW_CONFIDENCE_NOTICE);
    }
    reply
}

pub fn amount_help() -> String {
    replies::AMOUNT_HELP.to_string()
}

pub fn nothing_changed() -> String {
    replies::NOTHING_CHANGED.to_string()
}

pub fn no_prior_expense() -> String {
    replies::NO_PRIOR_EXPENSE.to_string()
}

pub fn stale_edit() -> String {
    replies::STALE_EDIT.to_string()
}

/// A clarification question is surfaced verbatim.
pub fn clarification(question: &str) -> String {
    question.to_string()
}

pub fn greeting(should_show_help: bool) -> String {
    if should_show_help {
        replies::WELCOME.to_string()
    } else {
        replies::GREETING_SHORT.to_string()
    }
}

pub fn question_reply(topic: QuestionTopic, should_show_help: bool) -> String {
    let canned = match topic {
        QuestionTopic::Expenses => replies::TOPIC_EXPENSES,
        QuestionTopic::Commands => replies::TOPIC_COMMANDS,
        QuestionTopic::Categories => replies::TOPIC_CATEGORIES,
        QuestionTopic::Other => replies::TOPIC_OTHER,
    };
    if should_show_help {
        format!("{}\n\n{}", canned, replies::HELP)
    } else {
        canned.to_string()
    }
}

pub fn unclear(question: &str) -> String {
    question.to_string()
}

/// Text listing for /recent, one line per expense plus a total.
pub fn recent_listing(expenses: &[ExpenseRecord], days: i64) -> String {
    if expenses.is_empty() {
        return format!("Không có chi tiêu nào trong {} ngày qua.", days);
    }

    let mut reply = format!("📊 Chi tiêu {} ngày qua:\n\n", days);
    let mut total: i64 = 0;
    for expense in expenses {
        total += expense.amount;
        reply.push_str(&format!(
            "- {}: {}đ - {}\n",
            expense.created_at.format("%d/%m/%Y"),
            format_amount(expense.amount),
            expense.description
        ));
    }
    reply.push_str(&format!("\n💰 Tổng chi tiêu: {}đ", format_amount(total)));
    reply
}
