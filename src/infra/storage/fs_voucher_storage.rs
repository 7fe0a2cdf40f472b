use crate::domain::ports::VoucherStorage;
use crate::error::AppError;
use async_trait::async_trait;
use std::path::PathBuf;
use uuid::Uuid;
use tracing::debug;

/// Stores payment voucher payloads on the local filesystem and hands back a
/// relative reference kept verbatim on the request.
pub struct FsVoucherStorage {
    base_dir: PathBuf,
}

impl FsVoucherStorage {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: base_dir.into() }
    }
}

#[async_trait]
impl VoucherStorage for FsVoucherStorage {
    async fn store(&self, request_id: &str, payload: &[u8]) -> Result<String, AppError> {
        tokio::fs::create_dir_all(&self.base_dir)
            .await
            .map_err(|e| AppError::InternalWithMsg(format!("Voucher dir unavailable: {}", e)))?;

        let file_name = format!("{}-{}.bin", request_id, Uuid::new_v4());
        let path = self.base_dir.join(&file_name);

        tokio::fs::write(&path, payload)
            .await
            .map_err(|e| AppError::InternalWithMsg(format!("Voucher write failed: {}", e)))?;

        debug!("Stored voucher for request {} at {:?}", request_id, path);
        Ok(format!("vouchers/{}", file_name))
    }
}
