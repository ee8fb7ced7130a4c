// 对外接口的错误类型

use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum OrganizerError {
    #[error("整理任务正在运行中")]
    AlreadyRunning,

    #[error("自动化服务不可用")]
    ServiceUnavailable,

    #[error("配置无效: {message}")]
    InvalidSettings { message: String },

    #[error("应用清单读取失败: {message}")]
    Inventory { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl OrganizerError {
    pub fn invalid_settings(message: impl Into<String>) -> Self {
        Self::InvalidSettings {
            message: message.into(),
        }
    }
}

// 展示层只需要错误文本
impl Serialize for OrganizerError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, OrganizerError>;
