use super::*;

impl PostgresSeedTransaction {
    pub(super) async fn find_permission_by_name_impl(
        &mut self,
        name: &str,
    ) -> Result<Option<Permission>, StoreError> {
        let row = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, name, description, created_at, updated_at, deleted_at
            FROM permissions
            WHERE name = $1 AND deleted_at IS NULL
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(&mut *self.transaction)
        .await
        .map_err(|error| store_error(error, "find permission by name"))?;

        row.map(Permission::try_from).transpose()
    }

    pub(super) async fn insert_permission_impl(
        &mut self,
        permission: &Permission,
    ) -> Result<InsertOutcome, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO permissions (id, name, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(permission.id().as_uuid())
        .bind(permission.name())
        .bind(permission.description())
        .bind(permission.metadata().created_at())
        .bind(permission.metadata().updated_at())
        .execute(&mut *self.transaction)
        .await
        .map_err(|error| store_error(error, "insert permission"))?;

        Ok(insert_outcome(
            result.rows_affected(),
            "permissions",
            permission.name(),
        ))
    }

    pub(super) async fn list_permissions_impl(&mut self) -> Result<Vec<Permission>, StoreError> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, name, description, created_at, updated_at, deleted_at
            FROM permissions
            WHERE deleted_at IS NULL
            ORDER BY name
            "#,
        )
        .fetch_all(&mut *self.transaction)
        .await
        .map_err(|error| store_error(error, "list permissions"))?;

        rows.into_iter().map(Permission::try_from).collect()
    }
}
