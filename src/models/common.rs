use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// 列表接口附带的条数
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

/// 错误响应体 (由 `AppError` 生成)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    pub success: bool,
    pub error: String,
    pub code: String,
}

/// 按 id 删除的结果；目标不存在时 deleted = 0，仍视为成功
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    pub deleted: u64,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            count: None,
        }
    }

    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
            count: None,
        }
    }
}

impl<T> ApiResponse<Vec<T>> {
    pub fn list(data: Vec<T>) -> Self {
        let count = data.len();
        Self {
            success: true,
            data: Some(data),
            message: None,
            count: Some(count),
        }
    }
}

/// 去掉首尾空白后为空视为未提供
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
