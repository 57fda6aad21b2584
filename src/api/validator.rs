// ==========================================
// 产线生产看板 - 输入校验
// ==========================================
// 职责: 变更前校验计数/目标输入（负数、非数字一律拒绝）
// 说明: 表单提交的数值可能是数字或数字字符串，统一在此解析
// ==========================================

use serde_json::Value;

use crate::api::error::{ApiError, ApiResult};

/// 校验非负整数
pub fn validate_non_negative(field: &str, value: i64) -> ApiResult<i64> {
    if value < 0 {
        return Err(ApiError::ValidationError(format!(
            "{} 不能为负数: {}",
            field, value
        )));
    }
    Ok(value)
}

/// 校验名称非空，返回去除首尾空白后的名称
pub fn validate_name(field: &str, value: &str) -> ApiResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::ValidationError(format!("{} 不能为空", field)));
    }
    Ok(trimmed.to_string())
}

/// 解析计数值
///
/// # 接受
/// - JSON 整数
/// - 小数部分为 0 的 JSON 数字（如 12.0）
/// - 数字字符串（如 "12"，允许首尾空白）
///
/// # 拒绝
/// - 负数、非数字、null、数组、对象
pub fn parse_count(field: &str, value: &Value) -> ApiResult<i64> {
    let parsed = match value {
        Value::Number(n) => match n.as_i64() {
            Some(v) => Some(v),
            None => n
                .as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64),
        },
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    match parsed {
        Some(v) => validate_non_negative(field, v),
        None => Err(ApiError::ValidationError(format!(
            "{} 必须为数字: {}",
            field, value
        ))),
    }
}

/// 解析可选计数值（字段缺失或为 null 时返回 None）
pub fn parse_optional_count(field: &str, value: Option<&Value>) -> ApiResult<Option<i64>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v) => parse_count(field, v).map(Some),
    }
}
