//! Internal Diesel row structs for database operations.
//!
//! Implementation details of the persistence layer; never exposed to the
//! domain.

use diesel::prelude::*;

use super::schema::users;

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub user_id: i32,
    pub user_name: String,
    pub user_email: String,
    pub user_role: String,
}

/// Insertable struct for creating new user records. The key is assigned by
/// the database serial.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub user_name: &'a str,
    pub user_email: &'a str,
    pub user_role: &'a str,
}

/// Changeset struct for full-replacement updates.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserChangeset<'a> {
    pub user_name: &'a str,
    pub user_email: &'a str,
    pub user_role: &'a str,
}
