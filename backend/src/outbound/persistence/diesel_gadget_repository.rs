//! PostgreSQL-backed `GadgetRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{GadgetPersistenceError, GadgetRepository};
use crate::domain::{Gadget, GadgetChanges, GadgetDraft, GadgetId, GadgetName, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{GadgetChangeset, GadgetRow, NewGadgetRow};
use super::pool::{DbPool, PoolError};
use super::schema::gadgets;

/// Diesel-backed implementation of the gadget repository port.
#[derive(Clone)]
pub struct DieselGadgetRepository {
    pool: DbPool,
}

impl DieselGadgetRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> GadgetPersistenceError {
    map_pool_error(error, GadgetPersistenceError::connection)
}

fn diesel_error(error: diesel::result::Error) -> GadgetPersistenceError {
    map_diesel_error(
        error,
        GadgetPersistenceError::query,
        GadgetPersistenceError::connection,
    )
}

fn row_to_gadget(row: GadgetRow) -> Result<Gadget, GadgetPersistenceError> {
    let name = GadgetName::new(&row.name).map_err(|err| {
        GadgetPersistenceError::query(format!("stored gadget {} is invalid: {err}", row.id))
    })?;
    Ok(Gadget::new(
        GadgetId::new(row.id),
        UserId::from_uuid(row.owner_id),
        name,
        row.description,
        row.created,
        row.last_modified,
    ))
}

#[async_trait]
impl GadgetRepository for DieselGadgetRepository {
    async fn list_for_owner(&self, owner: UserId) -> Result<Vec<Gadget>, GadgetPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<GadgetRow> = gadgets::table
            .filter(gadgets::owner_id.eq(owner.as_uuid()))
            .order((gadgets::created.desc(), gadgets::id.desc()))
            .select(GadgetRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(row_to_gadget).collect()
    }

    async fn find(
        &self,
        owner: UserId,
        id: GadgetId,
    ) -> Result<Option<Gadget>, GadgetPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<GadgetRow> = gadgets::table
            .filter(gadgets::owner_id.eq(owner.as_uuid()))
            .filter(gadgets::id.eq(id.get()))
            .select(GadgetRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_gadget).transpose()
    }

    async fn insert(
        &self,
        owner: UserId,
        draft: GadgetDraft,
        now: DateTime<Utc>,
    ) -> Result<Gadget, GadgetPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let new_row = NewGadgetRow {
            owner_id: *owner.as_uuid(),
            name: draft.name.as_ref(),
            description: draft.initial_description(),
            created: now,
            last_modified: now,
        };
        let row: GadgetRow = diesel::insert_into(gadgets::table)
            .values(&new_row)
            .returning(GadgetRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        row_to_gadget(row)
    }

    async fn update(
        &self,
        owner: UserId,
        id: GadgetId,
        changes: GadgetChanges,
        now: DateTime<Utc>,
    ) -> Result<Option<Gadget>, GadgetPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let changeset = GadgetChangeset {
            name: changes.name.as_ref().map(AsRef::as_ref),
            description: changes.description.as_deref(),
            last_modified: now,
        };
        let row: Option<GadgetRow> = diesel::update(
            gadgets::table
                .filter(gadgets::owner_id.eq(owner.as_uuid()))
                .filter(gadgets::id.eq(id.get())),
        )
        .set(&changeset)
        .returning(GadgetRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(diesel_error)?;
        row.map(row_to_gadget).transpose()
    }

    async fn delete(&self, owner: UserId, id: GadgetId) -> Result<bool, GadgetPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let removed = diesel::delete(
            gadgets::table
                .filter(gadgets::owner_id.eq(owner.as_uuid()))
                .filter(gadgets::id.eq(id.get())),
        )
        .execute(&mut conn)
        .await
        .map_err(diesel_error)?;
        Ok(removed > 0)
    }

    async fn delete_many(
        &self,
        owner: UserId,
        ids: &[GadgetId],
    ) -> Result<Vec<GadgetId>, GadgetPersistenceError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let raw: Vec<i64> = ids.iter().map(|id| id.get()).collect();
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let mut removed: Vec<i64> = diesel::delete(
            gadgets::table
                .filter(gadgets::owner_id.eq(owner.as_uuid()))
                .filter(gadgets::id.eq_any(raw)),
        )
        .returning(gadgets::id)
        .get_results(&mut conn)
        .await
        .map_err(diesel_error)?;
        removed.sort_unstable();
        Ok(removed.into_iter().map(GadgetId::new).collect())
    }
}

#[cfg(test)]
mod tests {
    //! Row conversion only; query behaviour is covered by the in-memory
    //! adapter and the HTTP tests.
    use super::*;
    use rstest::rstest;
    use uuid::Uuid;

    fn row(name: &str) -> GadgetRow {
        let now = Utc::now();
        GadgetRow {
            id: 12,
            owner_id: Uuid::nil(),
            name: name.to_owned(),
            description: "Cable".to_owned(),
            created: now,
            last_modified: now,
        }
    }

    #[rstest]
    fn valid_rows_convert_to_gadgets() {
        let gadget = row_to_gadget(row("USB Hub")).expect("row converts");

        assert_eq!(gadget.id(), GadgetId::new(12));
        assert_eq!(gadget.owner(), UserId::from_uuid(Uuid::nil()));
        assert_eq!(gadget.name().as_ref(), "USB Hub");
        assert_eq!(gadget.description(), "Cable");
    }

    #[rstest]
    fn blank_stored_names_surface_as_query_errors() {
        let error = row_to_gadget(row("  ")).expect_err("blank name rejected");

        assert!(matches!(error, GadgetPersistenceError::Query { .. }));
    }
}
