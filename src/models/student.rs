use diesel::prelude::*;

use super::Subject;

/// Student row as stored in the `students` table.
/// Derives Queryable/Selectable for reads and Insertable for creation
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable, Identifiable)]
#[diesel(table_name = crate::schema::students)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StudentRecord {
    pub id: String,
    pub enrollment: String,
    pub name: String,
    pub current_year: i32,
}

/// Association row linking a student to a subject
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable, Identifiable, Associations)]
#[diesel(table_name = crate::schema::student_subjects)]
#[diesel(primary_key(student_id, subject_id))]
#[diesel(belongs_to(StudentRecord, foreign_key = student_id))]
#[diesel(belongs_to(Subject, foreign_key = subject_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StudentSubject {
    pub student_id: String,
    pub subject_id: String,
}

/// Input for creating a student together with its initial subject references.
#[derive(Debug, Clone, Default)]
pub struct NewStudent {
    pub enrollment: String,
    pub name: String,
    pub current_year: i32,
    pub subject_ids: Vec<String>,
}

/// Field updates for a student. Subjects are managed through enrollment only.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = crate::schema::students)]
pub struct UpdateStudent {
    pub enrollment: String,
    pub name: String,
    pub current_year: i32,
}

/// Student with the subjects it is currently enrolled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    pub id: String,
    pub enrollment: String,
    pub name: String,
    pub current_year: i32,
    pub subjects: Vec<Subject>,
}

impl Student {
    pub fn from_record(record: StudentRecord, subjects: Vec<Subject>) -> Self {
        Self {
            id: record.id,
            enrollment: record.enrollment,
            name: record.name,
            current_year: record.current_year,
            subjects,
        }
    }

    /// Returns true when the subject is part of this student's enrollment set.
    pub fn is_enrolled_in(&self, subject_id: &str) -> bool {
        self.subjects.iter().any(|s| s.id == subject_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject(id: &str) -> Subject {
        Subject {
            id: id.to_string(),
            name: format!("Subject {id}"),
            year: 1,
            credits: 4,
        }
    }

    #[test]
    fn test_from_record_keeps_fields() {
        let record = StudentRecord {
            id: "s1".to_string(),
            enrollment: "2024001".to_string(),
            name: "Ana".to_string(),
            current_year: 2,
        };

        let student = Student::from_record(record, vec![subject("math")]);
        assert_eq!(student.id, "s1");
        assert_eq!(student.enrollment, "2024001");
        assert_eq!(student.current_year, 2);
        assert_eq!(student.subjects.len(), 1);
    }

    #[test]
    fn test_is_enrolled_in() {
        let record = StudentRecord {
            id: "s1".to_string(),
            enrollment: "2024001".to_string(),
            name: "Ana".to_string(),
            current_year: 2,
        };
        let student = Student::from_record(record, vec![subject("math"), subject("physics")]);

        assert!(student.is_enrolled_in("math"));
        assert!(student.is_enrolled_in("physics"));
        assert!(!student.is_enrolled_in("history"));
    }
}
