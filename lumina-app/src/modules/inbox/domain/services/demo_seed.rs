use super::super::entities::AnalyzedMessage;
use super::super::value_objects::{AnalysisResponse, Category, Entity};

/// 演示数据
///
/// 启动时预置的两条已分析消息，顺序为从新到旧
pub fn demo_messages() -> Vec<AnalyzedMessage> {
    // 先创建较旧的一条，保证序列从新到旧
    let bill = AnalyzedMessage::from_analysis(
        "Electricity bill of ₹1,450 is due on 20th Nov. Pay now to avoid late fees.",
        AnalysisResponse::new(
            Category::BillPayment,
            vec![
                Entity::new("Amount", "₹1,450"),
                Entity::new("Due Date", "20th Nov"),
                Entity::new("Service", "Electricity"),
            ],
            "Power bill due soon.",
        ),
    );

    let delivery = AnalyzedMessage::from_analysis(
        "Your Amazon order #34567 will be delivered on 12 Oct at 5 PM.",
        AnalysisResponse::new(
            Category::Delivery,
            vec![
                Entity::new("Order ID", "#34567"),
                Entity::new("Date", "12 Oct"),
                Entity::new("Time", "5 PM"),
                Entity::new("Service", "Amazon"),
            ],
            "Your package is arriving on October 12th.",
        ),
    );

    vec![delivery, bill]
}
