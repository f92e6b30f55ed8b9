//! Expense records, the closed category set, and merge diffs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Expense categories, ordered by classifier priority.
///
/// The set is closed: anything the oracle returns outside it is normalized
/// to `Other`, never surfaced as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Food,
    Transport,
    Shopping,
    Entertainment,
    Bills,
    Health,
    Education,
    Other,
}

impl Category {
    /// All categories in keyword-priority order.
    pub const ALL: [Category; 8] = [
        Category::Food,
        Category::Transport,
        Category::Shopping,
        Category::Entertainment,
        Category::Bills,
        Category::Health,
        Category::Education,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Transport => "transport",
            Category::Shopping => "shopping",
            Category::Entertainment => "entertainment",
            Category::Bills => "bills",
            Category::Health => "health",
            Category::Education => "education",
            Category::Other => "other",
        }
    }

    /// Vietnamese keyword associations per category.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Category::Food => &[
                "ăn uống",
                "đồ ăn",
                "thức ăn",
                "cafe",
                "trà sữa",
                "nhà hàng",
                "ăn sáng",
                "ăn trưa",
                "ăn tối",
            ],
            Category::Transport => &[
                "di chuyển",
                "xăng",
                "grab",
                "taxi",
                "xe bus",
                "gửi xe",
                "đổ xăng",
                "xe ôm",
                "giao thông",
            ],
            Category::Shopping => &[
                "mua sắm",
                "quần áo",
                "giày dép",
                "phụ kiện",
                "đồ dùng",
                "mỹ phẩm",
            ],
            Category::Entertainment => &[
                "giải trí",
                "xem phim",
                "du lịch",
                "game",
                "vui chơi",
                "thể thao",
            ],
            Category::Bills => &[
                "hóa đơn",
                "điện",
                "nước",
                "internet",
                "điện thoại",
                "tiền nhà",
                "gas",
            ],
            Category::Health => &["khám bệnh", "thuốc", "bảo hiểm", "y tế"],
            Category::Education => &["học phí", "sách vở", "khóa học"],
            Category::Other => &[],
        }
    }

    /// Parse an in-set category string.
    pub fn parse(s: &str) -> Option<Category> {
        match s.trim().to_lowercase().as_str() {
            "food" => Some(Category::Food),
            "transport" => Some(Category::Transport),
            "shopping" => Some(Category::Shopping),
            "entertainment" => Some(Category::Entertainment),
            "bills" => Some(Category::Bills),
            "health" => Some(Category::Health),
            "education" => Some(Category::Education),
            "other" => Some(Category::Other),
            _ => None,
        }
    }

    /// Normalize an oracle-returned category string. Out-of-set values
    /// become `Other`.
    pub fn from_oracle(s: &str) -> Category {
        Category::parse(s).unwrap_or(Category::Other)
    }

    /// Keyword-based category classification. First category in priority
    /// order with a keyword hit wins; no hit means `Other`. Total over all
    /// input strings.
    pub fn classify_description(text: &str) -> Category {
        let t = text.to_lowercase();
        for category in Category::ALL {
            if category.keywords().iter().any(|kw| t.contains(kw)) {
                return category;
            }
        }
        Category::Other
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored expense. Owned by the persistence collaborator; the engine only
/// ever sees it as a value for the duration of one classify-merge-respond
/// cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: i64,
    pub user_id: i64,
    /// VND, thousand-unit granularity, never negative.
    pub amount: i64,
    pub description: String,
    pub category: Category,
    /// The literal utterance that produced or last modified this record.
    pub raw_text: String,
    /// Creation time, immutable once set.
    pub created_at: DateTime<Utc>,
    /// Bumped on every applied merge; the optimistic-concurrency token.
    pub updated_at: DateTime<Utc>,
}

/// A not-yet-persisted expense produced by an AddExpense utterance. The
/// store assigns identity and timestamps on append.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpense {
    pub amount: i64,
    pub description: String,
    pub category: Category,
    pub raw_text: String,
}

/// One changed field in an edit merge. Only fields whose value actually
/// changed produce an entry; a field merely present in the payload with its
/// prior value does not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", rename_all = "snake_case")]
pub enum FieldChange {
    Amount { old: i64, new: i64 },
    Description { old: String, new: String },
    Category { old: Category, new: Category },
}

impl FieldChange {
    pub fn field_name(&self) -> &'static str {
        match self {
            FieldChange::Amount { .. } => "amount",
            FieldChange::Description { .. } => "description",
            FieldChange::Category { .. } => "category",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_description_keyword_hit() {
        assert_eq!(
            Category::classify_description("đi grab về nhà"),
            Category::Transport
        );
        assert_eq!(
            Category::classify_description("Trà sữa với bạn"),
            Category::Food
        );
        assert_eq!(
            Category::classify_description("đóng học phí kỳ 2"),
            Category::Education
        );
    }

    #[test]
    fn test_classify_description_no_hit_is_other() {
        assert_eq!(Category::classify_description("linh tinh"), Category::Other);
        assert_eq!(Category::classify_description(""), Category::Other);
    }

    #[test]
    fn test_classify_description_priority_order() {
        // "điện thoại" (bills) vs "mua sắm" (shopping): shopping is earlier
        // in priority order, so it wins when both hit.
        assert_eq!(
            Category::classify_description("mua sắm điện thoại"),
            Category::Shopping
        );
    }

    #[test]
    fn test_classify_description_total() {
        // Every input maps to a member of the set, never a failure.
        for text in ["", "xyz", "12345", "🍜", "ăn phở"] {
            let c = Category::classify_description(text);
            assert!(Category::ALL.contains(&c));
        }
    }

    #[test]
    fn test_from_oracle_out_of_set() {
        assert_eq!(Category::from_oracle("food"), Category::Food);
        assert_eq!(Category::from_oracle("FOOD"), Category::Food);
        assert_eq!(Category::from_oracle("groceries"), Category::Other);
        assert_eq!(Category::from_oracle(""), Category::Other);
    }

    #[test]
    fn test_category_serde_roundtrip() {
        let json = serde_json::to_string(&Category::Food).unwrap();
        assert_eq!(json, "\"food\"");
        let back: Category = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Category::Food);
    }
}
