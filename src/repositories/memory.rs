//! Process-local repository backend.
//!
//! Mirrors the PostgreSQL schema with concurrent maps: unique indexes on
//! student enrollment and teacher registry, an association set for
//! enrollments, and cascading link removal on delete. Never hold a guard on
//! one map while touching another.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::{DashMap, DashSet};

use crate::error::{AppError, AppResult};
use crate::models::{
    Student, StudentRecord, Subject, Teacher, UpdateStudent, UpdateSubject, UpdateTeacher,
};
use crate::repositories::{StudentRepository, SubjectRepository, TeacherRepository};
use crate::services::registry::latest_registry;

#[derive(Default)]
struct Tables {
    students: DashMap<String, StudentRecord>,
    /// enrollment -> student id
    enrollments: DashMap<String, String>,
    subjects: DashMap<String, Subject>,
    teachers: DashMap<String, Teacher>,
    /// registry -> teacher id
    registries: DashMap<String, String>,
    /// (student id, subject id)
    links: DashSet<(String, String)>,
}

/// In-memory store implementing every repository trait.
///
/// Clones share the same tables.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims a unique key for `owner`. Re-claiming a key the owner already holds succeeds.
    fn reserve(
        index: &DashMap<String, String>,
        key: &str,
        owner: &str,
        entity: &str,
        field: &str,
    ) -> AppResult<bool> {
        match index.entry(key.to_string()) {
            Entry::Occupied(existing) if existing.get() != owner => {
                Err(AppError::duplicate(entity, field, key))
            }
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(owner.to_string());
                Ok(true)
            }
        }
    }

    /// Drops `key` from a unique index if `owner` still holds it.
    fn release(index: &DashMap<String, String>, key: &str, owner: &str) {
        index.remove_if(key, |_, holder| holder == owner);
    }

    fn subjects_of(&self, student_id: &str) -> Vec<Subject> {
        let subject_ids: Vec<String> = self
            .tables
            .links
            .iter()
            .filter(|link| link.key().0 == student_id)
            .map(|link| link.key().1.clone())
            .collect();

        let mut subjects: Vec<Subject> = subject_ids
            .iter()
            .filter_map(|id| self.tables.subjects.get(id).map(|s| s.value().clone()))
            .collect();
        subjects.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        subjects
    }

    fn ensure_student(&self, student_id: &str) -> AppResult<()> {
        if self.tables.students.contains_key(student_id) {
            Ok(())
        } else {
            Err(AppError::not_found("student", "id", student_id))
        }
    }

    fn ensure_subject(&self, subject_id: &str) -> AppResult<()> {
        if self.tables.subjects.contains_key(subject_id) {
            Ok(())
        } else {
            Err(AppError::not_found("subject", "id", subject_id))
        }
    }
}

#[async_trait]
impl StudentRepository for InMemoryStore {
    async fn insert(&self, record: StudentRecord) -> AppResult<StudentRecord> {
        let tables = &self.tables;
        let taken = Self::reserve(
            &tables.enrollments,
            &record.enrollment,
            &record.id,
            "student",
            "enrollment",
        )?;

        match tables.students.entry(record.id.clone()) {
            Entry::Occupied(_) => {
                if taken {
                    Self::release(&tables.enrollments, &record.enrollment, &record.id);
                }
                Err(AppError::duplicate("student", "id", record.id))
            }
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(record)
            }
        }
    }

    async fn insert_with_subjects(
        &self,
        record: StudentRecord,
        subject_ids: &[String],
    ) -> AppResult<StudentRecord> {
        for subject_id in subject_ids {
            self.ensure_subject(subject_id)?;
        }

        let inserted = StudentRepository::insert(self, record).await?;
        for subject_id in subject_ids {
            self.tables
                .links
                .insert((inserted.id.clone(), subject_id.clone()));
        }
        Ok(inserted)
    }

    async fn find_by_id(&self, student_id: &str) -> AppResult<Option<Student>> {
        let record = self
            .tables
            .students
            .get(student_id)
            .map(|r| r.value().clone());

        Ok(record.map(|record| {
            let subjects = self.subjects_of(&record.id);
            Student::from_record(record, subjects)
        }))
    }

    async fn list_all(&self) -> AppResult<Vec<Student>> {
        let mut records: Vec<StudentRecord> = self
            .tables
            .students
            .iter()
            .map(|r| r.value().clone())
            .collect();
        records.sort_by(|a, b| a.enrollment.cmp(&b.enrollment));

        Ok(records
            .into_iter()
            .map(|record| {
                let subjects = self.subjects_of(&record.id);
                Student::from_record(record, subjects)
            })
            .collect())
    }

    async fn update(
        &self,
        student_id: &str,
        changes: UpdateStudent,
    ) -> AppResult<Option<StudentRecord>> {
        let tables = &self.tables;
        let Some(current) = tables.students.get(student_id).map(|r| r.value().clone()) else {
            return Ok(None);
        };

        let taken = Self::reserve(
            &tables.enrollments,
            &changes.enrollment,
            student_id,
            "student",
            "enrollment",
        )?;

        let updated = tables.students.get_mut(student_id).map(|mut record| {
            record.enrollment = changes.enrollment.clone();
            record.name = changes.name;
            record.current_year = changes.current_year;
            record.clone()
        });

        // deleted in between
        if updated.is_none() {
            if taken {
                Self::release(&tables.enrollments, &changes.enrollment, student_id);
            }
            return Ok(None);
        }

        if current.enrollment != changes.enrollment {
            tables.enrollments.remove(&current.enrollment);
        }
        Ok(updated)
    }

    async fn delete(&self, student_id: &str) -> AppResult<usize> {
        let tables = &self.tables;
        match tables.students.remove(student_id) {
            Some((_, record)) => {
                tables.enrollments.remove(&record.enrollment);
                tables.links.retain(|(student, _)| student != student_id);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn add_subject(&self, student_id: &str, subject_id: &str) -> AppResult<usize> {
        self.ensure_student(student_id)?;
        self.ensure_subject(subject_id)?;

        let inserted = self
            .tables
            .links
            .insert((student_id.to_string(), subject_id.to_string()));
        Ok(usize::from(inserted))
    }

    async fn remove_subject(&self, student_id: &str, subject_id: &str) -> AppResult<usize> {
        let removed = self
            .tables
            .links
            .remove(&(student_id.to_string(), subject_id.to_string()));
        Ok(usize::from(removed.is_some()))
    }
}

#[async_trait]
impl SubjectRepository for InMemoryStore {
    async fn insert(&self, subject: Subject) -> AppResult<Subject> {
        match self.tables.subjects.entry(subject.id.clone()) {
            Entry::Occupied(_) => Err(AppError::duplicate("subject", "id", subject.id)),
            Entry::Vacant(slot) => {
                slot.insert(subject.clone());
                Ok(subject)
            }
        }
    }

    async fn find_by_id(&self, subject_id: &str) -> AppResult<Option<Subject>> {
        Ok(self
            .tables
            .subjects
            .get(subject_id)
            .map(|s| s.value().clone()))
    }

    async fn list_all(&self) -> AppResult<Vec<Subject>> {
        let mut subjects: Vec<Subject> = self
            .tables
            .subjects
            .iter()
            .map(|s| s.value().clone())
            .collect();
        subjects.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(subjects)
    }

    async fn update(
        &self,
        subject_id: &str,
        changes: UpdateSubject,
    ) -> AppResult<Option<Subject>> {
        Ok(self.tables.subjects.get_mut(subject_id).map(|mut subject| {
            subject.name = changes.name;
            subject.year = changes.year;
            subject.credits = changes.credits;
            subject.clone()
        }))
    }

    async fn delete(&self, subject_id: &str) -> AppResult<usize> {
        match self.tables.subjects.remove(subject_id) {
            Some(_) => {
                self.tables.links.retain(|(_, subject)| subject != subject_id);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

#[async_trait]
impl TeacherRepository for InMemoryStore {
    async fn insert(&self, teacher: Teacher) -> AppResult<Teacher> {
        let tables = &self.tables;
        let taken = Self::reserve(
            &tables.registries,
            &teacher.registry,
            &teacher.id,
            "teacher",
            "registry",
        )?;

        match tables.teachers.entry(teacher.id.clone()) {
            Entry::Occupied(_) => {
                if taken {
                    Self::release(&tables.registries, &teacher.registry, &teacher.id);
                }
                Err(AppError::duplicate("teacher", "id", teacher.id))
            }
            Entry::Vacant(slot) => {
                slot.insert(teacher.clone());
                Ok(teacher)
            }
        }
    }

    async fn find_by_id(&self, teacher_id: &str) -> AppResult<Option<Teacher>> {
        Ok(self
            .tables
            .teachers
            .get(teacher_id)
            .map(|t| t.value().clone()))
    }

    async fn list_all(&self) -> AppResult<Vec<Teacher>> {
        let mut teachers: Vec<Teacher> = self
            .tables
            .teachers
            .iter()
            .map(|t| t.value().clone())
            .collect();
        teachers.sort_by(|a, b| a.registry.cmp(&b.registry));
        Ok(teachers)
    }

    async fn update(
        &self,
        teacher_id: &str,
        changes: UpdateTeacher,
    ) -> AppResult<Option<Teacher>> {
        Ok(self.tables.teachers.get_mut(teacher_id).map(|mut teacher| {
            teacher.name = changes.name;
            teacher.department = changes.department;
            teacher.clone()
        }))
    }

    async fn delete(&self, teacher_id: &str) -> AppResult<usize> {
        match self.tables.teachers.remove(teacher_id) {
            Some((_, teacher)) => {
                self.tables.registries.remove(&teacher.registry);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn last_registry_for_prefix(&self, prefix: &str) -> AppResult<Option<String>> {
        let candidates = self.tables.registries.iter().map(|entry| entry.key().clone());
        Ok(latest_registry(candidates, prefix))
    }
}
