//! 类型转换模块
//!
//! API 层的 ID 解析辅助函数

use surrealdb::RecordId;

use crate::auth::CurrentUser;
use crate::db::models::UserId;
use crate::utils::AppError;

/// Parse a path segment into a record id for the given table.
///
/// Accepts either a full `table:key` string or a bare key.
pub fn parse_record_id(table: &str, raw: &str) -> Result<RecordId, AppError> {
    if let Some((prefix, key)) = raw.split_once(':') {
        if prefix != table {
            return Err(AppError::validation(format!("Invalid {} ID: {}", table, raw)));
        }
        // Keys may be wrapped in angle brackets by the SurrealQL printer
        let key = key.trim_start_matches('⟨').trim_end_matches('⟩');
        return Ok(RecordId::from_table_key(table, key));
    }
    Ok(RecordId::from_table_key(table, raw))
}

/// Record id of the authenticated user (claims carry it as a string)
pub fn user_record_id(user: &CurrentUser) -> Result<UserId, AppError> {
    parse_record_id("user", &user.id)
}
