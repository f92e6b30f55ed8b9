//! Canned Vietnamese reply texts.
//!
//! These are fixed strings; everything rendered from runtime values lives
//! in the composer.

/// Reply to /start and to greetings that ask for help.
pub const WELCOME: &str = "Xin chào! Tôi là bot quản lý chi tiêu của bạn 🤖

Các lệnh có sẵn:
/help - Xem hướng dẫn sử dụng
/recent - Xem các chi tiêu gần đây

Để ghi nhận chi tiêu, bạn chỉ cần nhắn tin theo ngôn ngữ tự nhiên.
Ví dụ: \"Hôm nay tôi chi 50k ăn phở\"";

/// Reply to /help.
pub const HELP: &str = "🤖 Hướng dẫn sử dụng bot:

1️⃣ Ghi nhận chi tiêu:
- Nhắn tin trực tiếp bằng ngôn ngữ tự nhiên
- Ví dụ: \"Chiều nay mua sách 200k\"

2️⃣ Sửa chi tiêu vừa ghi:
- Nhắn yêu cầu chỉnh sửa, ví dụ: \"sửa thành 45k\" hoặc \"đổi mô tả thành cơm trưa\"
- Trường nào không nhắc đến sẽ được giữ nguyên

3️⃣ Xem lại chi tiêu:
/recent - Chi tiêu 7 ngày gần nhất
/recent 30 - Chi tiêu 30 ngày gần nhất";

/// Generic clarification used when the oracle fails or returns an
/// unusable shape.
pub const GENERIC_CLARIFICATION: &str =
    "Xin lỗi, tôi chưa hiểu ý bạn. 😕 Bạn muốn ghi nhận chi tiêu mới hay sửa chi tiêu vừa ghi?";

/// Syntax help when no amount can be resolved from an add request.
pub const AMOUNT_HELP: &str = "Xin lỗi, tôi không xác định được số tiền từ tin nhắn của bạn. 😕

Bạn thử ghi kèm số tiền nhé, ví dụ:
- \"Ăn phở 50k\"
- \"Đổ xăng 100 nghìn\"
- \"Mua điện thoại 1.2tr\"";

/// Edit requested but there is no stored expense to edit.
pub const NO_PRIOR_EXPENSE: &str =
    "Bạn chưa có chi tiêu nào để sửa. Hãy ghi nhận một chi tiêu trước nhé!";

/// Edit parsed fine but no field value actually changed.
pub const NOTHING_CHANGED: &str =
    "🤔 Không có gì thay đổi so với chi tiêu hiện tại. Bạn muốn sửa trường nào?";

/// The record changed underneath the edit (optimistic check failed).
pub const STALE_EDIT: &str =
    "Chi tiêu vừa được cập nhật bởi một tin nhắn khác. Bạn gửi lại yêu cầu sửa giúp nhé.";

/// Low-confidence notice appended to confirmations.
pub const LOW_CONFIDENCE_NOTICE: &str =
    "⚠️ Tôi không chắc lắm về thông tin trên, bạn kiểm tra lại giúp nhé.";

/// Short greeting without the help block.
pub const GREETING_SHORT: &str = "Chào bạn! 👋 Hôm nay bạn chi tiêu gì, cứ nhắn cho tôi nhé.";

/// Canned reply per question topic.
pub const TOPIC_EXPENSES: &str = "Bạn chỉ cần nhắn nội dung chi tiêu kèm số tiền, ví dụ \"Ăn trưa 45k\", tôi sẽ ghi nhận và phân loại giúp bạn. Nhắn tiếp \"sửa thành ...\" để chỉnh chi tiêu vừa ghi.";

pub const TOPIC_COMMANDS: &str = "Các lệnh có sẵn: /start, /help, /recent. Ngoài ra mọi tin nhắn thường đều được hiểu là ghi nhận hoặc chỉnh sửa chi tiêu.";

pub const TOPIC_CATEGORIES: &str = "Tôi phân loại chi tiêu vào các danh mục: food, transport, shopping, entertainment, bills, health, education, other.";

pub const TOPIC_OTHER: &str =
    "Tôi là bot quản lý chi tiêu, giỏi nhất là ghi nhận và chỉnh sửa chi tiêu của bạn. 💸";
