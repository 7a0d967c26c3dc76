use poem_openapi::Object;
use serde::{Deserialize, Serialize};

/// Public submission of a prospective-student registration
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct SubmitRegistrationRequest {
    /// Child's full name
    pub child_name: String,

    /// Child's birth date (free-form, e.g. "2019-06-02")
    pub child_birth_date: Option<String>,

    /// Guardian's full name
    pub guardian_name: String,

    /// Guardian's email, used for account promotion on approval
    pub guardian_email: String,

    /// Guardian's phone number
    pub guardian_phone: Option<String>,
}

/// Response model for a successful submission
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct SubmitRegistrationResponse {
    /// Identifier of the created registration
    pub id: i32,

    /// Confirmation message
    pub message: String,
}

/// Request model for approving a pending registration
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ApproveRegistrationRequest {
    /// Whether to create (or link) a guardian account for this registration
    pub create_account: bool,

    /// Optional reviewer note
    pub note: Option<String>,
}

/// Response model for an approval decision
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ApproveRegistrationResponse {
    /// Confirmation message
    pub message: String,

    /// How the guardian account was resolved: "created", "role_upgraded" or
    /// "already_satisfied". Absent when no account was requested.
    pub account_outcome: Option<String>,
}

/// Request model for rejecting a pending registration
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RejectRegistrationRequest {
    /// Optional reviewer note (e.g. rejection reason)
    pub note: Option<String>,
}

/// Registration as listed in the staff dashboard
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RegistrationView {
    pub id: i32,
    pub child_name: String,
    pub child_birth_date: Option<String>,
    pub guardian_name: String,
    pub guardian_email: String,
    pub guardian_phone: Option<String>,
    /// "pending", "approved" or "rejected"
    pub status: String,
    /// Account created or linked on approval, if any
    pub account_id: Option<String>,
    pub review_note: Option<String>,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<i64>,
    pub created_at: i64,
}

/// Response model for the registration listing
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RegistrationListResponse {
    pub registrations: Vec<RegistrationView>,
}
