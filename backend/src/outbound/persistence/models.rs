//! Row structs mapping Diesel tables to and from domain types.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{gadgets, users};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub email: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub password_hash: &'a str,
    pub date_joined: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = gadgets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct GadgetRow {
    pub id: i64,
    pub owner_id: Uuid,
    pub name: String,
    pub description: String,
    pub created: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = gadgets)]
pub(crate) struct NewGadgetRow<'a> {
    pub owner_id: Uuid,
    pub name: &'a str,
    pub description: &'a str,
    pub created: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

/// `None` fields are left out of the `SET` clause.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = gadgets)]
pub(crate) struct GadgetChangeset<'a> {
    pub name: Option<&'a str>,
    pub description: Option<&'a str>,
    pub last_modified: DateTime<Utc>,
}
