use std::path::Path;

use crate::config::AnalysisLimits;
use crate::infrastructure::ProtocolError;

/// 检查文件扩展名是否在允许列表中（不区分大小写）
pub fn extension_allowed(file_name: &str, allowed: &[String]) -> bool {
    match file_name.rsplit_once('.') {
        Some((_, ext)) => allowed.iter().any(|a| a.eq_ignore_ascii_case(ext)),
        None => false,
    }
}

/// 上传文件的入口检查：存在、类型、大小
pub fn check_upload(path: &Path, limits: &AnalysisLimits) -> Result<(), ProtocolError> {
    let metadata = std::fs::metadata(path).map_err(|_| ProtocolError::MissingFile {
        path: path.display().to_string(),
    })?;
    if !metadata.is_file() {
        return Err(ProtocolError::MissingFile {
            path: path.display().to_string(),
        });
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if !extension_allowed(&file_name, &limits.allowed_extensions) {
        return Err(ProtocolError::UnsupportedFileType {
            path: path.display().to_string(),
            allowed: limits
                .allowed_extensions
                .iter()
                .map(|e| format!(".{}", e))
                .collect::<Vec<_>>()
                .join(", "),
        });
    }

    if metadata.len() > limits.max_upload_bytes {
        return Err(ProtocolError::FileTooLarge {
            size: metadata.len(),
            limit: limits.max_upload_bytes,
        });
    }

    Ok(())
}

/// 将段落合并为全文，并检查最小长度
pub fn assemble_text(paragraphs: &[String], limits: &AnalysisLimits) -> Result<String, ProtocolError> {
    let text = paragraphs.join("\n");
    let chars = text.chars().count();
    if chars < limits.min_text_chars {
        return Err(ProtocolError::TooShort {
            chars,
            min: limits.min_text_chars,
        });
    }
    Ok(text)
}
