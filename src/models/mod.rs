mod student;
mod subject;
mod teacher;

pub use student::{NewStudent, Student, StudentRecord, StudentSubject, UpdateStudent};
pub use subject::{NewSubject, Subject, UpdateSubject};
pub use teacher::{NewTeacher, Teacher, UpdateTeacher};
