// ==========================================
// 例会分桌轮换系统 - 导出层错误类型
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("文件写入失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV 读写失败: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON 序列化失败: {0}")]
    Json(#[from] serde_json::Error),

    #[error("分桌结果第 {row} 行无效: {message}")]
    InvalidRow { row: usize, message: String },
}

pub type ExportResult<T> = Result<T, ExportError>;
