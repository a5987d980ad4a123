use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::complaints::repo::{
    Complaint, ComplaintCategory, ComplaintPriority, ComplaintStatus, ComplaintWithOwner,
};

/// Request body for filing a complaint. Attachment URLs are produced by the
/// upload endpoint beforehand.
#[derive(Debug, Deserialize)]
pub struct CreateComplaintRequest {
    pub title: String,
    pub description: String,
    pub category: ComplaintCategory,
    #[serde(default = "default_priority")]
    pub priority: ComplaintPriority,
    pub location: String,
    pub customer_number: Option<String>,
    #[serde(default)]
    pub attachments: Vec<String>,
}

fn default_priority() -> ComplaintPriority {
    ComplaintPriority::Medium
}

impl CreateComplaintRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty()
            || self.description.trim().is_empty()
            || self.location.trim().is_empty()
        {
            return Err("title, description, category and location are required".into());
        }
        Ok(())
    }
}

/// Admin-only status update.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: ComplaintStatus,
    pub admin_notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OwnerInfo {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct ComplaintResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: ComplaintCategory,
    pub priority: ComplaintPriority,
    pub status: ComplaintStatus,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_number: Option<String>,
    pub attachments: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    /// Present in admin listings only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<OwnerInfo>,
}

impl From<Complaint> for ComplaintResponse {
    fn from(c: Complaint) -> Self {
        Self {
            id: c.id,
            user_id: c.user_id,
            title: c.title,
            description: c.description,
            category: c.category,
            priority: c.priority,
            status: c.status,
            location: c.location,
            customer_number: c.customer_number,
            attachments: c.attachments,
            admin_notes: c.admin_notes,
            created_at: c.created_at,
            updated_at: c.updated_at,
            owner: None,
        }
    }
}

impl From<ComplaintWithOwner> for ComplaintResponse {
    fn from(c: ComplaintWithOwner) -> Self {
        let mut resp = ComplaintResponse::from(c.complaint);
        resp.owner = Some(OwnerInfo {
            name: c.owner_name,
            email: c.owner_email,
        });
        resp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_requires_core_fields() {
        let req: CreateComplaintRequest = serde_json::from_value(serde_json::json!({
            "title": "Listrik padam",
            "description": "Power out since morning in block C",
            "category": "power_outage",
            "location": "Jl. Merdeka 5"
        }))
        .unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.priority, ComplaintPriority::Medium);
        assert!(req.attachments.is_empty());

        let blank: CreateComplaintRequest = serde_json::from_value(serde_json::json!({
            "title": "   ",
            "description": "x",
            "category": "billing",
            "location": "y"
        }))
        .unwrap();
        assert!(blank.validate().is_err());
    }

    #[test]
    fn unknown_category_is_rejected_by_serde() {
        let res: Result<CreateComplaintRequest, _> = serde_json::from_value(serde_json::json!({
            "title": "t",
            "description": "d",
            "category": "water_leak",
            "location": "l"
        }));
        assert!(res.is_err());
    }
}
