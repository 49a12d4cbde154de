use diesel::prelude::*;

/// Teacher model. `registry` is generated on creation and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::teachers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Teacher {
    pub id: String,
    pub registry: String,
    pub name: String,
    pub department: String,
}

/// Input for creating a teacher
#[derive(Debug, Clone, Default)]
pub struct NewTeacher {
    pub name: String,
    pub department: String,
}

/// Updatable teacher fields. The registry is not among them.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = crate::schema::teachers)]
pub struct UpdateTeacher {
    pub name: String,
    pub department: String,
}
