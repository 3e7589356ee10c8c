use thiserror::Error;

/// 处理一份合同时可能出现的错误
///
/// 模型调用失败不会出现在这里，它们在流水线内部被消化为“跳过该条款”。
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Нет файла: {path}")]
    MissingFile { path: String },

    #[error("Только файлы {allowed}: {path}")]
    UnsupportedFileType { path: String, allowed: String },

    #[error("Файл слишком большой: {size} байт (максимум {limit})")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("Не удалось прочитать документ: {message}")]
    Extraction { message: String },

    #[error("Документ слишком короткий: {chars} символов (минимум {min})")]
    TooShort { chars: usize, min: usize },

    #[error("Не удалось сформировать протокол: {message}")]
    Render { message: String },

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),
}

impl ProtocolError {
    pub fn extraction(message: impl Into<String>) -> Self {
        ProtocolError::Extraction {
            message: message.into(),
        }
    }

    pub fn render(message: impl Into<String>) -> Self {
        ProtocolError::Render {
            message: message.into(),
        }
    }

    /// 是否由用户输入引起（而不是内部故障）
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ProtocolError::MissingFile { .. }
                | ProtocolError::UnsupportedFileType { .. }
                | ProtocolError::FileTooLarge { .. }
                | ProtocolError::Extraction { .. }
                | ProtocolError::TooShort { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ProtocolError::TooShort { chars: 12, min: 50 };
        assert_eq!(err.to_string(), "Документ слишком короткий: 12 символов (минимум 50)");

        let err = ProtocolError::UnsupportedFileType {
            path: "a.pdf".to_string(),
            allowed: ".txt".to_string(),
        };
        assert!(err.to_string().contains("a.pdf"));
    }

    #[test]
    fn test_client_error_classification() {
        assert!(ProtocolError::TooShort { chars: 0, min: 50 }.is_client_error());
        assert!(ProtocolError::extraction("bad utf-8").is_client_error());
        assert!(!ProtocolError::render("template").is_client_error());

        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        assert!(!ProtocolError::from(io).is_client_error());
    }
}
