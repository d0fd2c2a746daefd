use serde::{Deserialize, Serialize};

use super::super::entities::AnalyzedMessage;
use super::super::value_objects::Category;

/// 单个类别的统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStat {
    pub category: Category,
    pub count: usize,
    /// 占总数的百分比（四舍五入到整数）
    pub percentage: u32,
}

/// 会话统计视图
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub total: usize,
    /// 仅包含 count > 0 的类别，按数量降序，平局按枚举顺序
    pub categories: Vec<CategoryStat>,
}

impl SessionStats {
    /// 展示出的类别数
    pub fn categories_shown(&self) -> usize {
        self.categories.len()
    }

    pub fn get(&self, category: Category) -> Option<&CategoryStat> {
        self.categories.iter().find(|s| s.category == category)
    }
}

/// 统计聚合器
///
/// 纯函数：每次调用都从头计算，不缓存、不修改输入
#[derive(Debug, Clone, Copy, Default)]
pub struct StatsAggregator;

impl StatsAggregator {
    pub fn new() -> Self {
        Self
    }

    pub fn aggregate(&self, messages: &[AnalyzedMessage]) -> SessionStats {
        let mut counts = [0usize; Category::COUNT];
        for message in messages {
            counts[message.category().ordinal()] += 1;
        }

        let total = messages.len();
        let mut categories: Vec<CategoryStat> = Category::ALL
            .into_iter()
            .zip(counts)
            .filter(|(_, count)| *count > 0)
            .map(|(category, count)| CategoryStat {
                category,
                count,
                percentage: percentage(count, total),
            })
            .collect();

        // 稳定排序，平局保持枚举顺序
        categories.sort_by(|a, b| b.count.cmp(&a.count));

        SessionStats { total, categories }
    }
}

/// round-half-up(count * 100 / total)，total 为 0 时返回 0
pub fn percentage(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((count * 200 + total) / (total * 2)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::inbox::domain::value_objects::AnalysisResponse;

    fn messages(categories: &[Category]) -> Vec<AnalyzedMessage> {
        categories
            .iter()
            .map(|c| {
                AnalyzedMessage::from_analysis("text", AnalysisResponse::new(*c, vec![], "s"))
            })
            .collect()
    }

    #[test]
    fn test_three_to_one_split() {
        let msgs = messages(&[
            Category::Banking,
            Category::Delivery,
            Category::Delivery,
            Category::Delivery,
        ]);
        let stats = StatsAggregator::new().aggregate(&msgs);

        assert_eq!(stats.total, 4);
        assert_eq!(
            stats.categories,
            vec![
                CategoryStat {
                    category: Category::Delivery,
                    count: 3,
                    percentage: 75
                },
                CategoryStat {
                    category: Category::Banking,
                    count: 1,
                    percentage: 25
                },
            ]
        );
    }

    #[test]
    fn test_empty_sequence() {
        let stats = StatsAggregator::new().aggregate(&[]);

        assert_eq!(stats.total, 0);
        assert!(stats.categories.is_empty());
        assert_eq!(percentage(0, 0), 0);
    }

    #[test]
    fn test_ties_follow_enumeration_order() {
        let msgs = messages(&[Category::General, Category::Travel, Category::Banking]);
        let stats = StatsAggregator::new().aggregate(&msgs);

        let order: Vec<Category> = stats.categories.iter().map(|s| s.category).collect();
        assert_eq!(order, vec![Category::Banking, Category::Travel, Category::General]);
    }

    #[test]
    fn test_counts_sum_to_total_and_percentages_near_100() {
        let msgs = messages(&[
            Category::Banking,
            Category::Travel,
            Category::Reminder,
            Category::Reminder,
            Category::Promotion,
            Category::BillPayment,
            Category::General,
        ]);
        let stats = StatsAggregator::new().aggregate(&msgs);

        let count_sum: usize = stats.categories.iter().map(|s| s.count).sum();
        assert_eq!(count_sum, stats.total);

        let pct_sum: i64 = stats.categories.iter().map(|s| s.percentage as i64).sum();
        assert!((pct_sum - 100).abs() <= stats.categories_shown() as i64);
    }

    #[test]
    fn test_rounding_is_half_up() {
        // 1/8 = 12.5% -> 13
        assert_eq!(percentage(1, 8), 13);
        // 1/3 = 33.3% -> 33
        assert_eq!(percentage(1, 3), 33);
        // 2/3 = 66.7% -> 67
        assert_eq!(percentage(2, 3), 67);
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let msgs = messages(&[Category::Travel, Category::Banking, Category::Travel]);
        let aggregator = StatsAggregator::new();

        assert_eq!(aggregator.aggregate(&msgs), aggregator.aggregate(&msgs));
    }
}
