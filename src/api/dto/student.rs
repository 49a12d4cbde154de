//! Student and enrollment DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::dto::SubjectResponse;
use crate::models::{NewStudent, Student, UpdateStudent};

/// Reference to an existing subject by id.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SubjectRefRequest {
    #[serde(default)]
    #[validate(length(max = 255, message = "Subject id must be at most 255 characters"))]
    pub id: String,
}

/// Request body for creating a student.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[schema(example = json!({
    "enrollment": "20230001",
    "name": "Ana",
    "current_year": 2,
    "subjects": [{ "id": "S1" }]
}))]
pub struct CreateStudentRequest {
    #[serde(default)]
    #[validate(length(max = 255, message = "Enrollment must be at most 255 characters"))]
    pub enrollment: String,
    #[serde(default)]
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: String,
    #[serde(default)]
    pub current_year: i32,
    /// Subjects to enroll in at creation; each must already exist
    #[serde(default)]
    #[validate(nested)]
    pub subjects: Vec<SubjectRefRequest>,
}

impl CreateStudentRequest {
    pub fn into_new_student(self) -> NewStudent {
        NewStudent {
            enrollment: self.enrollment,
            name: self.name,
            current_year: self.current_year,
            subject_ids: self.subjects.into_iter().map(|s| s.id).collect(),
        }
    }
}

/// Request body for updating a student's fields. Subjects are not changed here.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateStudentRequest {
    #[serde(default)]
    #[validate(length(max = 255, message = "Enrollment must be at most 255 characters"))]
    pub enrollment: String,
    #[serde(default)]
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: String,
    #[serde(default)]
    pub current_year: i32,
}

impl UpdateStudentRequest {
    pub fn into_update_student(self) -> UpdateStudent {
        UpdateStudent {
            enrollment: self.enrollment,
            name: self.name,
            current_year: self.current_year,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentResponse {
    pub id: String,
    pub enrollment: String,
    pub name: String,
    pub current_year: i32,
    pub subjects: Vec<SubjectResponse>,
}

impl From<Student> for StudentResponse {
    fn from(student: Student) -> Self {
        Self {
            id: student.id,
            enrollment: student.enrollment,
            name: student.name,
            current_year: student.current_year,
            subjects: student
                .subjects
                .into_iter()
                .map(SubjectResponse::from)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_collects_subject_ids() {
        let request: CreateStudentRequest = serde_json::from_str(
            r#"{"enrollment":"20230001","name":"Ana","current_year":2,"subjects":[{"id":"S1"},{"id":"S2"}]}"#,
        )
        .unwrap();

        let new_student = request.into_new_student();
        assert_eq!(new_student.subject_ids, vec!["S1", "S2"]);
        assert_eq!(new_student.current_year, 2);
    }

    #[test]
    fn test_nested_subject_ids_are_validated() {
        let long_id = "x".repeat(256);
        let request = CreateStudentRequest {
            enrollment: "20230001".to_string(),
            name: "Ana".to_string(),
            current_year: 1,
            subjects: vec![SubjectRefRequest { id: long_id }],
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_response_field_names() {
        let response = StudentResponse {
            id: "T1".to_string(),
            enrollment: "20230001".to_string(),
            name: "Ana".to_string(),
            current_year: 2,
            subjects: vec![],
        };
        let json = serde_json::to_value(response).unwrap();
        assert_eq!(json["current_year"], 2);
        assert!(json["subjects"].as_array().unwrap().is_empty());
    }
}
