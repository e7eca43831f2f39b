use std::sync::Arc;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    domain::*,
    error::{AppError, Result},
    gallery::{is_access_active, storage},
    repository::{CoupleRepository, FileUploadRepository, SubscriptionRepository, VendorRepository},
};

pub struct GalleryService {
    upload_repo: Arc<dyn FileUploadRepository>,
    couple_repo: Arc<dyn CoupleRepository>,
    vendor_repo: Arc<dyn VendorRepository>,
    subscription_repo: Arc<dyn SubscriptionRepository>,
    uploads_dir: String,
}

impl GalleryService {
    pub fn new(
        upload_repo: Arc<dyn FileUploadRepository>,
        couple_repo: Arc<dyn CoupleRepository>,
        vendor_repo: Arc<dyn VendorRepository>,
        subscription_repo: Arc<dyn SubscriptionRepository>,
        uploads_dir: String,
    ) -> Self {
        Self {
            upload_repo,
            couple_repo,
            vendor_repo,
            subscription_repo,
            uploads_dir,
        }
    }

    /// Stores a file a vendor delivered to a couple's gallery.
    pub async fn record_upload(
        &self,
        couple_id: Uuid,
        vendor_id: Uuid,
        file_name: &str,
        data: &[u8],
    ) -> Result<FileUpload> {
        if self.couple_repo.find_by_id(couple_id).await?.is_none() {
            return Err(AppError::NotFound("Couple not found".to_string()));
        }
        if self.vendor_repo.find_by_id(vendor_id).await?.is_none() {
            return Err(AppError::NotFound("Vendor not found".to_string()));
        }

        let storage_path = storage::save_gallery_file(&self.uploads_dir, couple_id, file_name, data).await?;

        let upload = FileUpload {
            id: Uuid::new_v4(),
            couple_id,
            vendor_id,
            upload_date: Utc::now(),
            file_name: file_name.to_string(),
            file_size: data.len() as i64,
            storage_path: storage_path.clone(),
        };

        let upload = match self.upload_repo.create(upload).await {
            Ok(upload) => upload,
            Err(e) => {
                if let Err(cleanup) = storage::remove_gallery_file(&self.uploads_dir, &storage_path).await {
                    tracing::warn!("Orphaned gallery file {}: {}", storage_path, cleanup);
                }
                return Err(e);
            }
        };
        tracing::info!("Vendor {} uploaded {} to gallery of couple {}", vendor_id, upload.file_name, couple_id);
        Ok(upload)
    }

    pub async fn list_files(&self, couple_id: Uuid) -> Result<Vec<FileUpload>> {
        self.upload_repo.list_by_couple(couple_id).await
    }

    /// Evaluates gallery access for a couple at `now`.
    pub async fn check_access(&self, couple_id: Uuid, now: DateTime<Utc>) -> Result<GalleryAccess> {
        let couple = self.couple_repo.find_by_id(couple_id).await?
            .ok_or_else(|| AppError::NotFound("Couple not found".to_string()))?;
        let upload_dates = self.upload_repo.upload_dates(couple_id).await?;
        let subscription = self.subscription_repo.find_by_couple(couple_id).await?;

        let access = is_access_active(&upload_dates, couple.created_at, subscription.as_ref(), now);

        if let Some(subscription) = &subscription {
            if subscription.free_period_expiry != Some(access.period_end) {
                self.subscription_repo
                    .set_free_period_expiry(couple_id, access.period_end)
                    .await?;
            }
        }

        Ok(access)
    }

    /// Returns the file if the couple may download it right now.
    pub async fn authorize_download(
        &self,
        couple_id: Uuid,
        file_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<FileUpload> {
        let upload = self.upload_repo.find_by_id(file_id).await?
            .filter(|u| u.couple_id == couple_id)
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

        let access = self.check_access(couple_id, now).await?;
        if !access.active {
            tracing::debug!("Gallery download refused for couple {}: free period over", couple_id);
            return Err(AppError::Payment(
                "Free gallery access has ended. Subscribe to keep downloading.".to_string()
            ));
        }

        Ok(upload)
    }

    pub async fn read_file(&self, upload: &FileUpload) -> Result<Vec<u8>> {
        storage::read_gallery_file(&self.uploads_dir, &upload.storage_path).await
    }
}
