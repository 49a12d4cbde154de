//! Teacher DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{NewTeacher, Teacher, UpdateTeacher};

/// Request body for creating a teacher. The registry is generated.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[schema(example = json!({ "name": "Dr. Silva", "department": "Computer Science" }))]
pub struct CreateTeacherRequest {
    #[serde(default)]
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 255, message = "Department must be at most 255 characters"))]
    pub department: String,
}

impl CreateTeacherRequest {
    pub fn into_new_teacher(self) -> NewTeacher {
        NewTeacher {
            name: self.name,
            department: self.department,
        }
    }
}

/// Request body for updating a teacher. A `registry` field, if sent, is ignored.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateTeacherRequest {
    #[serde(default)]
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 255, message = "Department must be at most 255 characters"))]
    pub department: String,
}

impl UpdateTeacherRequest {
    pub fn into_update_teacher(self) -> UpdateTeacher {
        UpdateTeacher {
            name: self.name,
            department: self.department,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "id": "0b8f5a3e-2d8c-4a39-9d39-5a3c1f2b7e11",
    "registry": "COMP-001",
    "name": "Dr. Silva",
    "department": "Computer Science"
}))]
pub struct TeacherResponse {
    pub id: String,
    pub registry: String,
    pub name: String,
    pub department: String,
}

impl From<Teacher> for TeacherResponse {
    fn from(teacher: Teacher) -> Self {
        Self {
            id: teacher.id,
            registry: teacher.registry,
            name: teacher.name,
            department: teacher.department,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_ignores_registry_field() {
        let request: UpdateTeacherRequest = serde_json::from_str(
            r#"{"name":"Dr. Silva","department":"Physics","registry":"HACK-999"}"#,
        )
        .unwrap();
        let update = request.into_update_teacher();
        assert_eq!(update.department, "Physics");
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let request: CreateTeacherRequest = serde_json::from_str("{}").unwrap();
        assert!(request.name.is_empty());
        assert!(request.department.is_empty());
    }
}
