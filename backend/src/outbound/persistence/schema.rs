//! Diesel table definition for the PostgreSQL schema.
//!
//! Must match the deployed table exactly; Diesel uses it for type-safe SQL
//! generation. The `user_email` column carries a unique constraint that the
//! repository surfaces as a duplicate-email error.

diesel::table! {
    /// User records.
    ///
    /// `user_id` is a serial primary key; the three text columns are
    /// required and capped at 100 characters.
    users (user_id) {
        user_id -> Int4,
        #[max_length = 100]
        user_name -> Varchar,
        #[max_length = 100]
        user_email -> Varchar,
        #[max_length = 100]
        user_role -> Varchar,
    }
}
