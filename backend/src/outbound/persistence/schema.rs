//! Diesel table definitions.
//!
//! Keep in sync with `backend/migrations`.

diesel::table! {
    /// Accounts that own gadgets and authenticate against the API.
    users (id) {
        id -> Uuid,
        #[max_length = 150]
        username -> Varchar,
        #[max_length = 254]
        email -> Varchar,
        #[max_length = 150]
        first_name -> Varchar,
        #[max_length = 150]
        last_name -> Varchar,
        /// Argon2 PHC string.
        password_hash -> Text,
        date_joined -> Timestamptz,
    }
}

diesel::table! {
    /// Gadget inventory rows, each owned by exactly one user.
    gadgets (id) {
        id -> Int8,
        owner_id -> Uuid,
        #[max_length = 255]
        name -> Varchar,
        description -> Text,
        created -> Timestamptz,
        last_modified -> Timestamptz,
    }
}

diesel::joinable!(gadgets -> users (owner_id));

diesel::allow_tables_to_appear_in_same_query!(gadgets, users);
