//! Error types for configuration, storage and input validation
//!
//! Messages are bilingual (English | Chinese), matching the outcome descriptions.

use thiserror::Error;

/// Configuration errors; these abort the calling flow
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid flow key '{key}', expected '<sender>_<business>' | 无效的配置键: {key}")]
    InvalidFlowKey { key: String },

    #[error("Code lifetime is not configured for flow '{key}' | 未配置校验码有效时间: {key}")]
    MissingCodeTtl { key: String },

    #[error("Error limit is not configured for flow '{key}' | 未配置最大错误次数: {key}")]
    MissingErrorLimit { key: String },

    #[error("No sender registered with identity '{identity}' | 未找到发送者: {identity}")]
    UnknownSender { identity: String },

    #[error("Sender identity '{identity}' is already registered | 发送者重复注册: {identity}")]
    DuplicateSender { identity: String },

    #[error("No content template for business '{business}' and sender '{sender}' | 未配置内容模板: {sender}_{business}")]
    MissingTemplate { sender: String, business: String },
}

/// Failures reported by a storage backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Storage backend error: {message} | 存储错误: {message}")]
    Backend { message: String },

    #[error("Corrupted record at '{key}': {message} | 存储数据损坏: {key}")]
    Corrupted { key: String, message: String },
}

impl StorageError {
    pub fn backend(message: impl Into<String>) -> Self {
        StorageError::Backend {
            message: message.into(),
        }
    }
}

/// Input validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Value out of range for field: {field} (min: {min}, max: {max}) | 字段值超出范围: {field} (最小: {min}, 最大: {max})")]
    OutOfRange {
        field: String,
        min: String,
        max: String,
    },
}
