// Console rendering
//
// 把领域对象渲染为终端文本，纯函数

use chrono::Local;
use std::fmt::Write;

use crate::modules::inbox::{AnalyzedMessage, ListMessagesResponse, SessionStats};

/// 卡片时间格式，如 "Oct 12, 05:00 PM"
pub const TIMESTAMP_FORMAT: &str = "%b %d, %I:%M %p";

/// 渲染单条消息卡片
pub fn render_card(message: &AnalyzedMessage) -> String {
    let mut out = String::new();
    let timestamp = message.created_at().with_timezone(&Local);

    let _ = writeln!(
        out,
        "[{}] {}",
        message.category().as_str().to_uppercase(),
        timestamp.format(TIMESTAMP_FORMAT)
    );
    let _ = writeln!(out, "  \"{}\"", message.original_text());

    if !message.entities().is_empty() {
        let _ = writeln!(out, "  Extracted Entities");
        for entity in message.entities() {
            let _ = writeln!(out, "    {}: {}", entity.label, entity.value);
        }
    }

    let _ = writeln!(out, "  Summary: {}", message.summary());
    out
}

/// 渲染过滤后的消息列表
pub fn render_list(response: &ListMessagesResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", response.header());

    if let Some(empty) = response.empty_state() {
        let _ = writeln!(out, "  {}", empty);
        return out;
    }

    for message in &response.messages {
        out.push('\n');
        out.push_str(&render_card(message));
    }
    out
}

/// 渲染统计面板
pub fn render_stats(stats: &SessionStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Intelligence Overview");
    let _ = writeln!(out, "  Total Analysed: {}", stats.total);
    let _ = writeln!(out, "  Categories: {}", stats.categories_shown());

    if stats.categories.is_empty() {
        return out;
    }

    let _ = writeln!(out, "Category Breakdown");
    for stat in &stats.categories {
        let _ = writeln!(
            out,
            "  {:<14}{:>4}{:>6}%",
            stat.category.as_str(),
            stat.count,
            stat.percentage
        );
    }
    out
}

pub const HELP_TEXT: &str = "\
Paste a message to analyze it (e.g. Flight to NYC at 3PM, Electricity bill of $40 due soon...)
Commands:
  :filter <All|Category>  show only one category
  :list                   list messages for the current filter
  :stats                  show the intelligence overview
  :retry                  resubmit the last failed message
  :reset                  clear the session
  :help                   show this help
  :quit                   exit
";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::inbox::{
        AnalysisResponse, Category, CategoryFilter, CategoryStat, Entity,
    };

    fn delivery() -> AnalyzedMessage {
        AnalyzedMessage::from_analysis(
            "Your Amazon order #34567 will be delivered on 12 Oct at 5 PM.",
            AnalysisResponse::new(
                Category::Delivery,
                vec![Entity::new("Order ID", "#34567")],
                "Your package is arriving on October 12th.",
            ),
        )
    }

    #[test]
    fn test_render_card() {
        let message = delivery();
        let card = render_card(&message);
        let lines: Vec<&str> = card.lines().collect();

        let expected_time = message
            .created_at()
            .with_timezone(&Local)
            .format(TIMESTAMP_FORMAT)
            .to_string();
        assert_eq!(lines[0], format!("[DELIVERY] {}", expected_time));
        assert_eq!(
            lines[1],
            "  \"Your Amazon order #34567 will be delivered on 12 Oct at 5 PM.\""
        );
        assert_eq!(lines[2], "  Extracted Entities");
        assert_eq!(lines[3], "    Order ID: #34567");
        assert_eq!(lines[4], "  Summary: Your package is arriving on October 12th.");
    }

    #[test]
    fn test_render_empty_list() {
        let response = ListMessagesResponse {
            filter: CategoryFilter::Only(Category::Travel),
            messages: vec![],
            total: 2,
        };

        assert_eq!(
            render_list(&response),
            "Travel Messages (0)\n  No messages found in this category.\n"
        );
    }

    #[test]
    fn test_render_stats() {
        let stats = SessionStats {
            total: 4,
            categories: vec![
                CategoryStat {
                    category: Category::Delivery,
                    count: 3,
                    percentage: 75,
                },
                CategoryStat {
                    category: Category::Banking,
                    count: 1,
                    percentage: 25,
                },
            ],
        };

        let rendered = render_stats(&stats);

        assert!(rendered.contains("Total Analysed: 4"));
        assert!(rendered.contains("Categories: 2"));
        assert!(rendered.contains("  Delivery         3    75%"));
        assert!(rendered.contains("  Banking          1    25%"));
    }
}
