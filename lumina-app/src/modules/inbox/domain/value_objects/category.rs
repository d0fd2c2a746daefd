use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 消息类别
///
/// 值对象：封闭枚举，每条分析后的消息恰好属于一个类别。
/// 声明顺序即固定的枚举顺序（统计排序时用于打破平局）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Delivery,
    Banking,
    Appointment,
    Travel,
    Promotion,
    Reminder,
    #[serde(rename = "Bill Payment")]
    BillPayment,
    General,
}

impl Category {
    /// 类别总数
    pub const COUNT: usize = 8;

    /// 所有类别（枚举顺序）
    pub const ALL: [Category; Category::COUNT] = [
        Category::Delivery,
        Category::Banking,
        Category::Appointment,
        Category::Travel,
        Category::Promotion,
        Category::Reminder,
        Category::BillPayment,
        Category::General,
    ];

    /// 线上名称（与 LLM 约定的字符串完全一致）
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Delivery => "Delivery",
            Category::Banking => "Banking",
            Category::Appointment => "Appointment",
            Category::Travel => "Travel",
            Category::Promotion => "Promotion",
            Category::Reminder => "Reminder",
            Category::BillPayment => "Bill Payment",
            Category::General => "General",
        }
    }

    /// 成员检查：仅精确匹配线上名称
    pub fn from_wire(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == value)
    }

    /// 归一化外部服务返回的类别，未知值一律视为 General
    pub fn normalize(value: Option<&str>) -> Self {
        value.and_then(Self::from_wire).unwrap_or(Category::General)
    }

    /// 在枚举中的位置
    pub fn ordinal(&self) -> usize {
        *self as usize
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::General
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 面向用户输入的解析，忽略大小写与多余空白
impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.split_whitespace().collect::<Vec<_>>().join(" ");
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_is_identity_for_members() {
        for category in Category::ALL {
            assert_eq!(Category::normalize(Some(category.as_str())), category);
        }
    }

    #[test]
    fn test_normalize_unknown_to_general() {
        assert_eq!(Category::normalize(Some("Unknown")), Category::General);
        assert_eq!(Category::normalize(Some("delivery")), Category::General);
        assert_eq!(Category::normalize(Some("")), Category::General);
        assert_eq!(Category::normalize(None), Category::General);
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&Category::BillPayment).unwrap();
        assert_eq!(json, "\"Bill Payment\"");

        let parsed: Category = serde_json::from_str("\"Travel\"").unwrap();
        assert_eq!(parsed, Category::Travel);
    }

    #[test]
    fn test_from_str_is_lenient_for_user_input() {
        assert_eq!("bill payment".parse::<Category>(), Ok(Category::BillPayment));
        assert_eq!("  BANKING ".parse::<Category>(), Ok(Category::Banking));
        assert!("Shopping".parse::<Category>().is_err());
    }

    #[test]
    fn test_ordinal_follows_declaration_order() {
        assert_eq!(Category::Delivery.ordinal(), 0);
        assert_eq!(Category::General.ordinal(), 7);
    }
}
