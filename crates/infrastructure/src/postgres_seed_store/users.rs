use super::*;

impl PostgresSeedTransaction {
    pub(super) async fn find_user_by_email_impl(
        &mut self,
        email: &str,
    ) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, password_hash, first_name, last_name, active,
                   created_at, updated_at, deleted_at
            FROM users
            WHERE email = LOWER($1) AND deleted_at IS NULL
            LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(&mut *self.transaction)
        .await
        .map_err(|error| store_error(error, "find user by email"))?;

        row.map(User::try_from).transpose()
    }

    pub(super) async fn insert_user_impl(
        &mut self,
        user: &User,
    ) -> Result<InsertOutcome, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (
                id, email, password_hash, first_name, last_name, active, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(user.id().as_uuid())
        .bind(user.email().as_str())
        .bind(user.password_hash().as_str())
        .bind(user.first_name())
        .bind(user.last_name())
        .bind(user.is_active())
        .bind(user.metadata().created_at())
        .bind(user.metadata().updated_at())
        .execute(&mut *self.transaction)
        .await
        .map_err(|error| store_error(error, "insert user"))?;

        Ok(insert_outcome(
            result.rows_affected(),
            "users",
            user.email().as_str(),
        ))
    }

    pub(super) async fn replace_user_roles_impl(
        &mut self,
        user_id: UserId,
        role_ids: &[RoleId],
    ) -> Result<(), StoreError> {
        let ids: Vec<uuid::Uuid> = role_ids.iter().map(RoleId::as_uuid).collect();

        sqlx::query(
            r#"
            DELETE FROM user_roles
            WHERE user_id = $1 AND NOT (role_id = ANY($2))
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(&ids)
        .execute(&mut *self.transaction)
        .await
        .map_err(|error| store_error(error, "remove stale user roles"))?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO user_roles (user_id, role_id)
            SELECT $1, roles.id
            FROM roles
            WHERE roles.id = ANY($2) AND roles.deleted_at IS NULL
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(&ids)
        .execute(&mut *self.transaction)
        .await
        .map_err(|error| store_error(error, "assign user roles"))?;

        debug!(
            user_id = %user_id,
            assigned = inserted.rows_affected(),
            "user roles replaced"
        );

        Ok(())
    }

    pub(super) async fn list_user_roles_impl(
        &mut self,
        user_id: UserId,
    ) -> Result<Vec<UserRole>, StoreError> {
        let rows = sqlx::query_as::<_, UserRoleRow>(
            r#"
            SELECT user_id, role_id, created_at
            FROM user_roles
            WHERE user_id = $1
            ORDER BY created_at, role_id
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&mut *self.transaction)
        .await
        .map_err(|error| store_error(error, "list user roles"))?;

        Ok(rows.into_iter().map(UserRole::from).collect())
    }
}
