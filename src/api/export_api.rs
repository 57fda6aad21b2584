// ==========================================
// 产线生产看板 - 报表导出 API
// ==========================================
// 职责: 将型号当日数据导出为 CSV（小时明细 + 合计行，操作员绩效）
// 说明: 导出前经 ProductionApi 读取，保证已做日切检查
// ==========================================

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::api::production_api::ProductionApi;
use crate::domain::production::ProductionModel;

// ==========================================
// ExportApi
// ==========================================
pub struct ExportApi {
    production_api: Arc<ProductionApi>,
}

impl ExportApi {
    pub fn new(production_api: Arc<ProductionApi>) -> Self {
        Self { production_api }
    }

    /// 导出型号报表到目录
    ///
    /// # 返回
    /// 生成的文件路径：`<line>_<model>_<date>_hourly.csv` 与 `..._operators.csv`
    pub fn export_model_to_dir(
        &self,
        line: &str,
        model: &str,
        dir: &Path,
    ) -> ApiResult<Vec<PathBuf>> {
        let current = self.production_api.get_model(line, model)?;
        std::fs::create_dir_all(dir)
            .map_err(|e| ApiError::ExportError(format!("{}: {}", dir.display(), e)))?;

        let stem = format!(
            "{}_{}_{}",
            sanitize(line),
            sanitize(&current.model_name),
            current.date
        );
        let hourly_path = dir.join(format!("{}_hourly.csv", stem));
        let operators_path = dir.join(format!("{}_operators.csv", stem));

        write_hourly_report(line, &current, create_file(&hourly_path)?)?;
        write_operator_report(&current, create_file(&operators_path)?)?;

        tracing::info!(
            line,
            model,
            hourly = %hourly_path.display(),
            operators = %operators_path.display(),
            "报表导出完成"
        );
        Ok(vec![hourly_path, operators_path])
    }
}

fn create_file(path: &Path) -> ApiResult<File> {
    File::create(path).map_err(|e| ApiError::ExportError(format!("{}: {}", path.display(), e)))
}

/// 文件名中只保留字母数字与 - _
fn sanitize(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

/// 写出小时明细报表
///
/// 表头块（产线/型号/周次/日期/日目标/不良率/达成率）后接小时明细与合计行
pub fn write_hourly_report<W: Write>(line: &str, model: &ProductionModel, writer: W) -> ApiResult<()> {
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(writer);

    wtr.write_record(["Line", line])?;
    wtr.write_record(["Model", model.model_name.as_str()])?;
    wtr.write_record(["Label Week", model.label_week.as_str()])?;
    wtr.write_record(["Date", model.date.as_str()])?;
    wtr.write_record(["Daily Target".to_string(), model.daily_target.to_string()])?;
    wtr.write_record([
        "Defect Rate %".to_string(),
        format!("{:.2}", model.defect_rate_percentage),
    ])?;
    wtr.write_record([
        "Achievement %".to_string(),
        format!("{:.2}", model.achievement_percentage),
    ])?;
    wtr.write_record([""])?;

    wtr.write_record([
        "Hour",
        "Target",
        "Cumulative Target",
        "Output",
        "Difference",
        "Defect",
        "QC Checked",
    ])?;
    for slot in &model.hourly {
        wtr.write_record([
            slot.label.clone(),
            slot.manual_target.to_string(),
            slot.cumulative_target.to_string(),
            slot.output.to_string(),
            slot.difference.to_string(),
            slot.defect.to_string(),
            slot.qc_checked.to_string(),
        ])?;
    }
    wtr.write_record([
        "TOTAL".to_string(),
        model.daily_target.to_string(),
        model.daily_target.to_string(),
        model.output_day.to_string(),
        (model.output_day - model.daily_target).to_string(),
        model.actual_defect.to_string(),
        model.qc_checking.to_string(),
    ])?;

    wtr.flush()
        .map_err(|e| ApiError::ExportError(e.to_string()))?;
    Ok(())
}

/// 写出操作员绩效报表
pub fn write_operator_report<W: Write>(model: &ProductionModel, writer: W) -> ApiResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([
        "ID", "Name", "Position", "Target", "Output", "Defect", "Efficiency %", "Status",
    ])?;
    for op in &model.operators {
        wtr.write_record([
            op.id.clone(),
            op.name.clone(),
            op.position.clone(),
            op.target.to_string(),
            op.output.to_string(),
            op.defect.to_string(),
            format!("{:.2}", op.efficiency),
            op.status.to_string(),
        ])?;
    }
    wtr.flush()
        .map_err(|e| ApiError::ExportError(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::operator::Operator;
    use crate::engine::{Aggregator, HourSchedule, TargetAllocator};

    fn sample_model() -> ProductionModel {
        let mut slots = HourSchedule::default().new_slots();
        TargetAllocator::default().allocate(160, &mut slots).unwrap();
        let mut model = ProductionModel::new("GX-200", "W42", "2026-10-16", slots);
        model.hourly[0].output = 18;
        model.hourly[0].qc_checked = 10;
        model.hourly[0].defect = 1;
        let mut op = Operator::new("Ani, S.", "Sewing", 80);
        op.output = 40;
        model.operators.push(op);
        Aggregator::new().recompute(&mut model).unwrap();
        model
    }

    #[test]
    fn test_hourly_report_layout() {
        let mut buf = Vec::new();
        write_hourly_report("LINE-1", &sample_model(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Line,LINE-1");
        assert_eq!(lines[4], "Daily Target,160");
        assert_eq!(lines[5], "Defect Rate %,10.00");
        assert!(lines[8].starts_with("Hour,Target,Cumulative Target"));
        assert_eq!(lines[9], "07:00 - 08:00,20,20,18,-2,1,10");
        assert_eq!(lines[14], "12:00 - 13:00,0,100,0,0,0,0");
        assert_eq!(lines.last().copied(), Some("TOTAL,160,160,18,-142,1,10"));
    }

    #[test]
    fn test_operator_report_quotes_commas() {
        let mut buf = Vec::new();
        write_operator_report(&sample_model(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("\"Ani, S.\",Sewing,80,40,0,50.00,active"));
    }

    #[test]
    fn test_sanitize_file_stem() {
        assert_eq!(sanitize("Line 1/A"), "Line_1_A");
        assert_eq!(sanitize("GX-200_b"), "GX-200_b");
    }
}
