// ==========================================
// 产线生产看板 - 操作员领域模型
// ==========================================
// 职责: 操作员身份与当日绩效
// 日切时: 身份字段 (id/name/position/target) 保留，绩效清零
// ==========================================

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::types::OperatorStatus;

// ==========================================
// Operator - 操作员
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operator {
    // ===== 身份 =====
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub target: i64,

    // ===== 当日绩效 =====
    #[serde(default)]
    pub output: i64,
    #[serde(default)]
    pub defect: i64,
    #[serde(default)]
    pub efficiency: f64,           // output/target*100（派生）

    #[serde(default)]
    pub status: OperatorStatus,
}

impl Operator {
    /// 创建新操作员（自动生成 id）
    pub fn new(name: impl Into<String>, position: impl Into<String>, target: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            position: position.into(),
            target,
            output: 0,
            defect: 0,
            efficiency: 0.0,
            status: OperatorStatus::Active,
        }
    }

    /// 清零当日绩效
    pub fn reset_performance(&mut self) {
        self.output = 0;
        self.defect = 0;
        self.efficiency = 0.0;
    }

    /// 身份是否一致（用于日切前后校验）
    pub fn same_identity(&self, other: &Operator) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.position == other.position
            && self.target == other.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_keeps_identity() {
        let mut op = Operator::new("Siti", "Sewing", 100);
        op.output = 50;
        op.defect = 2;
        op.efficiency = 50.0;
        let before = op.clone();

        op.reset_performance();

        assert_eq!(op.output, 0);
        assert_eq!(op.defect, 0);
        assert_eq!(op.efficiency, 0.0);
        assert!(op.same_identity(&before));
    }

    #[test]
    fn test_deserialize_minimal_operator() {
        let op: Operator = serde_json::from_str(r#"{"id":"op-1","name":"Budi"}"#).unwrap();
        assert_eq!(op.status, OperatorStatus::Active);
        assert_eq!(op.target, 0);
    }
}
