use super::*;

impl PostgresSeedTransaction {
    pub(super) async fn find_role_by_name_impl(
        &mut self,
        name: &str,
    ) -> Result<Option<Role>, StoreError> {
        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, description, created_at, updated_at, deleted_at
            FROM roles
            WHERE name = $1 AND deleted_at IS NULL
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(&mut *self.transaction)
        .await
        .map_err(|error| store_error(error, "find role by name"))?;

        row.map(Role::try_from).transpose()
    }

    pub(super) async fn insert_role_impl(
        &mut self,
        role: &Role,
    ) -> Result<InsertOutcome, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO roles (id, name, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(role.id().as_uuid())
        .bind(role.name())
        .bind(role.description())
        .bind(role.metadata().created_at())
        .bind(role.metadata().updated_at())
        .execute(&mut *self.transaction)
        .await
        .map_err(|error| store_error(error, "insert role"))?;

        Ok(insert_outcome(result.rows_affected(), "roles", role.name()))
    }

    pub(super) async fn replace_role_permissions_impl(
        &mut self,
        role_id: RoleId,
        permission_ids: &[PermissionId],
    ) -> Result<(), StoreError> {
        let ids: Vec<uuid::Uuid> = permission_ids.iter().map(PermissionId::as_uuid).collect();

        let live = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(DISTINCT id)
            FROM permissions
            WHERE id = ANY($1) AND deleted_at IS NULL
            "#,
        )
        .bind(&ids)
        .fetch_one(&mut *self.transaction)
        .await
        .map_err(|error| store_error(error, "check role permission targets"))?;

        let mut distinct = ids.clone();
        distinct.sort_unstable();
        distinct.dedup();
        if usize::try_from(live).ok() != Some(distinct.len()) {
            return Err(StoreError::Query(format!(
                "role {role_id} cannot be granted unknown or deleted permissions"
            )));
        }

        sqlx::query(
            r#"
            DELETE FROM role_permissions
            WHERE role_id = $1 AND NOT (permission_id = ANY($2))
            "#,
        )
        .bind(role_id.as_uuid())
        .bind(&ids)
        .execute(&mut *self.transaction)
        .await
        .map_err(|error| store_error(error, "remove stale role permissions"))?;

        sqlx::query(
            r#"
            INSERT INTO role_permissions (role_id, permission_id)
            SELECT $1, permission_id
            FROM UNNEST($2::uuid[]) AS grants(permission_id)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(role_id.as_uuid())
        .bind(&ids)
        .execute(&mut *self.transaction)
        .await
        .map_err(|error| store_error(error, "grant role permissions"))?;

        Ok(())
    }

    pub(super) async fn list_role_permissions_impl(
        &mut self,
        role_id: RoleId,
    ) -> Result<Vec<RolePermission>, StoreError> {
        let rows = sqlx::query_as::<_, RolePermissionRow>(
            r#"
            SELECT role_id, permission_id, created_at
            FROM role_permissions
            WHERE role_id = $1
            ORDER BY created_at, permission_id
            "#,
        )
        .bind(role_id.as_uuid())
        .fetch_all(&mut *self.transaction)
        .await
        .map_err(|error| store_error(error, "list role permissions"))?;

        Ok(rows.into_iter().map(RolePermission::from).collect())
    }
}
