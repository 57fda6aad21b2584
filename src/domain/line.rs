// ==========================================
// 产线生产看板 - 产线与整体状态
// ==========================================
// 职责: 产线持有型号列表及当前激活型号
// 红线: 激活型号是产线字段，不是进程级全局状态
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::production::ProductionModel;

// ==========================================
// Line - 产线
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    pub name: String,
    #[serde(default)]
    pub active_model: Option<String>,
    #[serde(default)]
    pub models: Vec<ProductionModel>,
}

impl Line {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active_model: None,
            models: Vec::new(),
        }
    }

    pub fn model(&self, model_name: &str) -> Option<&ProductionModel> {
        self.models.iter().find(|m| m.model_name == model_name)
    }

    pub fn model_mut(&mut self, model_name: &str) -> Option<&mut ProductionModel> {
        self.models.iter_mut().find(|m| m.model_name == model_name)
    }

    /// 当前激活型号名（未设置时取第一个型号）
    pub fn active_model_name(&self) -> Option<&str> {
        self.active_model
            .as_deref()
            .filter(|name| self.model(name).is_some())
            .or_else(|| self.models.first().map(|m| m.model_name.as_str()))
    }
}

// ==========================================
// ProductionState - 持久化文档
// ==========================================
// 整份读写，不做局部更新
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductionState {
    #[serde(default)]
    pub lines: BTreeMap<String, Line>,
}

impl ProductionState {
    pub fn line(&self, line_name: &str) -> Option<&Line> {
        self.lines.get(line_name)
    }

    pub fn line_mut(&mut self, line_name: &str) -> Option<&mut Line> {
        self.lines.get_mut(line_name)
    }

    /// 型号总数
    pub fn model_count(&self) -> usize {
        self.lines.values().map(|l| l.models.len()).sum()
    }

    /// 校验载入数据：录入字段不得为负
    ///
    /// # 返回
    /// 首个非法字段的描述
    pub fn validate(&self) -> Result<(), String> {
        for (line_name, line) in &self.lines {
            for model in &line.models {
                if let Some((field, value)) = model.first_negative_field() {
                    return Err(format!(
                        "{}/{} 的 {} 为负数: {}",
                        line_name, model.model_name, field, value
                    ));
                }
            }
        }
        Ok(())
    }
}
