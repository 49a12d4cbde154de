use diesel::prelude::*;

/// Subject model, used for both reads and inserts
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable, Identifiable)]
#[diesel(table_name = crate::schema::subjects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub year: i32,
    pub credits: i32,
}

/// Input for creating a subject. A missing or blank id gets a generated UUID.
#[derive(Debug, Clone, Default)]
pub struct NewSubject {
    pub id: Option<String>,
    pub name: String,
    pub year: i32,
    pub credits: i32,
}

/// UpdateSubject model for full updates
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = crate::schema::subjects)]
pub struct UpdateSubject {
    pub name: String,
    pub year: i32,
    pub credits: i32,
}
