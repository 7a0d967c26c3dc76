use poem_openapi::{param::Path, payload::Json, OpenApi, Tags};
use std::sync::Arc;
use tracing::error;

use crate::api::{verify_bearer, AuthenticatedUser, BearerAuth};
use crate::errors::registration::RegistrationError;
use crate::services::promotion::{PromotionError, PromotionService};
use crate::services::TokenService;
use crate::stores::NewRegistration;
use crate::types::db::registration;
use crate::types::dto::common::MessageResponse;
use crate::types::dto::registration::{
    ApproveRegistrationRequest, ApproveRegistrationResponse, RegistrationListResponse,
    RegistrationView, RejectRegistrationRequest, SubmitRegistrationRequest,
    SubmitRegistrationResponse,
};

/// Registration API endpoints
///
/// Submission is public; everything else is staff-only.
pub struct RegistrationApi {
    tokens: Arc<TokenService>,
    promotions: Arc<PromotionService>,
}

impl RegistrationApi {
    pub fn new(tokens: Arc<TokenService>, promotions: Arc<PromotionService>) -> Self {
        Self { tokens, promotions }
    }

    fn require_staff(&self, auth: &BearerAuth) -> Result<AuthenticatedUser, RegistrationError> {
        let user = verify_bearer(&self.tokens, auth)
            .map_err(|_| RegistrationError::unauthorized())?;

        if !user.role.is_staff() {
            return Err(RegistrationError::forbidden());
        }

        Ok(user)
    }
}

fn view(model: registration::Model) -> RegistrationView {
    RegistrationView {
        id: model.id,
        child_name: model.child_name,
        child_birth_date: model.child_birth_date,
        guardian_name: model.guardian_name,
        guardian_email: model.guardian_email,
        guardian_phone: model.guardian_phone,
        status: model.status.as_str().to_string(),
        account_id: model.account_id,
        review_note: model.review_note,
        reviewed_by: model.reviewed_by,
        reviewed_at: model.reviewed_at,
        created_at: model.created_at,
    }
}

fn map_promotion_error(e: PromotionError) -> RegistrationError {
    match e {
        PromotionError::NotFound => RegistrationError::not_found(),
        PromotionError::NotPending => RegistrationError::invalid_state(),
        PromotionError::Store(store) => {
            error!(error = %store, "Registration store operation failed");
            RegistrationError::internal_error()
        }
    }
}

/// API tags for registration endpoints
#[derive(Tags)]
enum RegistrationTags {
    /// Student registration endpoints
    Registrations,
}

#[OpenApi]
impl RegistrationApi {
    /// Submit a new student registration
    ///
    /// Public endpoint; the registration starts in the pending state.
    #[oai(path = "/registrations", method = "post", tag = "RegistrationTags::Registrations")]
    async fn submit(
        &self,
        body: Json<SubmitRegistrationRequest>,
    ) -> Result<Json<SubmitRegistrationResponse>, RegistrationError> {
        if body.child_name.trim().is_empty() {
            return Err(RegistrationError::validation("child_name must not be empty"));
        }
        if body.guardian_name.trim().is_empty() {
            return Err(RegistrationError::validation("guardian_name must not be empty"));
        }
        if !body.guardian_email.contains('@') {
            return Err(RegistrationError::validation("guardian_email is not a valid email"));
        }

        let created = self
            .promotions
            .submit(NewRegistration {
                child_name: body.child_name.trim().to_string(),
                child_birth_date: body.child_birth_date.clone(),
                guardian_name: body.guardian_name.trim().to_string(),
                guardian_email: body.guardian_email.trim().to_string(),
                guardian_phone: body.guardian_phone.clone(),
            })
            .await
            .map_err(map_promotion_error)?;

        Ok(Json(SubmitRegistrationResponse {
            id: created.id,
            message: "Registration submitted".to_string(),
        }))
    }

    /// List all registrations, newest first
    #[oai(path = "/registrations", method = "get", tag = "RegistrationTags::Registrations")]
    async fn list(
        &self,
        auth: BearerAuth,
    ) -> Result<Json<RegistrationListResponse>, RegistrationError> {
        self.require_staff(&auth)?;

        let registrations = self
            .promotions
            .list()
            .await
            .map_err(map_promotion_error)?
            .into_iter()
            .map(view)
            .collect();

        Ok(Json(RegistrationListResponse { registrations }))
    }

    /// Approve a pending registration
    ///
    /// Optionally creates or upgrades a parent account for the guardian,
    /// atomically with the status change.
    #[oai(path = "/registrations/:id/approve", method = "post", tag = "RegistrationTags::Registrations")]
    async fn approve(
        &self,
        auth: BearerAuth,
        id: Path<i32>,
        body: Json<ApproveRegistrationRequest>,
    ) -> Result<Json<ApproveRegistrationResponse>, RegistrationError> {
        let reviewer = self.require_staff(&auth)?;

        let outcome = self
            .promotions
            .approve(id.0, &reviewer.user_id, body.create_account, body.note.clone())
            .await
            .map_err(map_promotion_error)?;

        Ok(Json(ApproveRegistrationResponse {
            message: "Registration approved".to_string(),
            account_outcome: outcome.map(|o| o.as_str().to_string()),
        }))
    }

    /// Reject a pending registration
    #[oai(path = "/registrations/:id/reject", method = "post", tag = "RegistrationTags::Registrations")]
    async fn reject(
        &self,
        auth: BearerAuth,
        id: Path<i32>,
        body: Json<RejectRegistrationRequest>,
    ) -> Result<Json<MessageResponse>, RegistrationError> {
        let reviewer = self.require_staff(&auth)?;

        self.promotions
            .reject(id.0, &reviewer.user_id, body.note.clone())
            .await
            .map_err(map_promotion_error)?;

        Ok(Json(MessageResponse {
            message: "Registration rejected".to_string(),
        }))
    }
}
