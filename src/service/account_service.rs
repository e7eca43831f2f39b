use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    domain::*,
    error::{AppError, Result},
    repository::{CoupleRepository, VendorRepository},
};

pub struct AccountService {
    couple_repo: Arc<dyn CoupleRepository>,
    vendor_repo: Arc<dyn VendorRepository>,
}

impl AccountService {
    pub fn new(
        couple_repo: Arc<dyn CoupleRepository>,
        vendor_repo: Arc<dyn VendorRepository>,
    ) -> Self {
        Self { couple_repo, vendor_repo }
    }

    pub async fn create_couple(&self, request: CreateCoupleRequest) -> Result<Couple> {
        request.validate()?;
        self.couple_repo.create(request).await
    }

    pub async fn create_vendor(&self, request: CreateVendorRequest) -> Result<Vendor> {
        request.validate()?;
        self.vendor_repo.create(request).await
    }

    pub async fn get_vendor(&self, id: Uuid) -> Result<Vendor> {
        self.vendor_repo.find_by_id(id).await?
            .ok_or_else(|| AppError::NotFound("Vendor not found".to_string()))
    }

    /// Records the Stripe Connect account a vendor finished onboarding with.
    pub async fn connect_vendor_account(&self, vendor_id: Uuid, request: ConnectAccountRequest) -> Result<Vendor> {
        request.validate()?;
        if !request.stripe_account_id.starts_with("acct_") {
            return Err(AppError::Validation(
                "Connected account id must start with acct_".to_string()
            ));
        }

        let vendor = self.vendor_repo
            .set_stripe_account(vendor_id, &request.stripe_account_id)
            .await?;
        tracing::info!("Vendor {} connected payout account", vendor.id);
        Ok(vendor)
    }
}
