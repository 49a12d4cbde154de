//! Subject DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{NewSubject, Subject, UpdateSubject};

/// Request body for creating a subject.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[schema(example = json!({ "name": "Algorithms", "year": 2, "credits": 4 }))]
pub struct CreateSubjectRequest {
    /// Optional caller-chosen id; a UUID is assigned when omitted
    #[serde(default)]
    #[validate(length(max = 255, message = "Id must be at most 255 characters"))]
    pub id: Option<String>,
    #[serde(default)]
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: String,
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub credits: i32,
}

impl CreateSubjectRequest {
    pub fn into_new_subject(self) -> NewSubject {
        NewSubject {
            id: self.id,
            name: self.name,
            year: self.year,
            credits: self.credits,
        }
    }
}

/// Request body for replacing a subject's fields.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateSubjectRequest {
    #[serde(default)]
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: String,
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub credits: i32,
}

impl UpdateSubjectRequest {
    pub fn into_update_subject(self) -> UpdateSubject {
        UpdateSubject {
            name: self.name,
            year: self.year,
            credits: self.credits,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubjectResponse {
    pub id: String,
    pub name: String,
    pub year: i32,
    pub credits: i32,
}

impl From<Subject> for SubjectResponse {
    fn from(subject: Subject) -> Self {
        Self {
            id: subject.id,
            name: subject.name,
            year: subject.year,
            credits: subject.credits,
        }
    }
}
