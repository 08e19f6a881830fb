use sqlx::SqlitePool;

use crate::error::{is_unique_violation, AppError, AppResult};
use crate::models::*;
use crate::utils::hash_password;

const USER_COLUMNS: &str = "id, name, email, password, role, status, phone, location, \
                            img_url, reset_code, reset_expires, created_at";

#[derive(Clone)]
pub struct UserService {
    pool: SqlitePool,
}

impl UserService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_all_users(&self) -> AppResult<Vec<UserResponse>> {
        let users = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users"))
            .fetch_all(&self.pool)
            .await?;

        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    pub async fn get_user(&self, id: i64) -> AppResult<User> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {id} not found")))
    }

    pub async fn create_user(&self, request: &CreateUserRequest) -> AppResult<i64> {
        let hashed = hash_password(&request.password)?;

        let result = sqlx::query(
            "INSERT INTO users (name, email, role, status, password, img_url) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&request.name)
        .bind(&request.email)
        .bind(request.role.as_deref().unwrap_or("Cliente"))
        .bind(request.status.as_deref().unwrap_or("active"))
        .bind(&hashed)
        .bind(&request.img_url)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e, "email") {
                AppError::ValidationError("email is already registered".to_string())
            } else {
                e.into()
            }
        })?;

        Ok(result.last_insert_rowid())
    }

    /// Admin update. A blank password keeps the stored hash.
    pub async fn update_user(&self, id: i64, request: &UpdateUserRequest) -> AppResult<()> {
        let result = match password_to_set(request.password.as_deref())? {
            Some(hashed) => {
                sqlx::query(
                    "UPDATE users SET name = ?, email = ?, role = ?, status = ?, \
                                      img_url = ?, password = ? \
                     WHERE id = ?",
                )
                .bind(&request.name)
                .bind(&request.email)
                .bind(&request.role)
                .bind(&request.status)
                .bind(&request.img_url)
                .bind(&hashed)
                .bind(id)
                .execute(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    "UPDATE users SET name = ?, email = ?, role = ?, status = ?, img_url = ? \
                     WHERE id = ?",
                )
                .bind(&request.name)
                .bind(&request.email)
                .bind(&request.role)
                .bind(&request.status)
                .bind(&request.img_url)
                .bind(id)
                .execute(&self.pool)
                .await?
            }
        };

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User {id} not found")));
        }

        Ok(())
    }

    /// Self-service profile update; returns the refreshed profile.
    pub async fn update_profile(
        &self,
        user_id: i64,
        request: &UpdateProfileRequest,
    ) -> AppResult<UserResponse> {
        match password_to_set(request.password.as_deref())? {
            Some(hashed) => {
                sqlx::query(
                    "UPDATE users SET name = ?, email = ?, phone = ?, location = ?, \
                                      img_url = ?, password = ? \
                     WHERE id = ?",
                )
                .bind(&request.name)
                .bind(&request.email)
                .bind(&request.phone)
                .bind(&request.location)
                .bind(&request.img_url)
                .bind(&hashed)
                .bind(user_id)
                .execute(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    "UPDATE users SET name = ?, email = ?, phone = ?, location = ?, img_url = ? \
                     WHERE id = ?",
                )
                .bind(&request.name)
                .bind(&request.email)
                .bind(&request.phone)
                .bind(&request.location)
                .bind(&request.img_url)
                .bind(user_id)
                .execute(&self.pool)
                .await?
            }
        };

        Ok(UserResponse::from(self.get_user(user_id).await?))
    }

    pub async fn delete_user(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User {id} not found")));
        }

        Ok(())
    }
}

fn password_to_set(password: Option<&str>) -> AppResult<Option<String>> {
    match password {
        Some(p) if !p.trim().is_empty() => Ok(Some(hash_password(p)?)),
        _ => Ok(None),
    }
}
