//! UserRepository - user directory

use super::{Create, Read, Update};
use crate::dtos::{CreateUserDTO, UpdateProfileDTO};
use crate::entities::User;
use chrono::Utc;
use sqlx::types::Json;
use sqlx::{Error, QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, info, instrument};

pub struct UserRepository {
    connection_pool: SqlitePool,
}

impl UserRepository {
    pub fn new(connection_pool: SqlitePool) -> UserRepository {
        Self { connection_pool }
    }

    /// Find user by exact username match (usernames are unique)
    #[instrument(skip(self))]
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, username, password, email, mobile, gender, language, dob,
                   travel_styles, interests, created_at
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(user)
    }

    /// All users except `user_id`, by id
    #[instrument(skip(self))]
    pub async fn find_all_except(&self, user_id: &i32) -> Result<Vec<User>, Error> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, username, password, email, mobile, gender, language, dob,
                   travel_styles, interests, created_at
            FROM users
            WHERE user_id != ?
            ORDER BY user_id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.connection_pool)
        .await?;

        debug!("Found {} other users", users.len());
        Ok(users)
    }
}

impl Create<User, CreateUserDTO> for UserRepository {
    #[instrument(skip(self, data), fields(username = %data.username))]
    async fn create(&self, data: &CreateUserDTO) -> Result<User, Error> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO users (username, password, email, mobile, gender, language, dob,
                               travel_styles, interests, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&data.username)
        .bind(&data.password)
        .bind(&data.email)
        .bind(&data.mobile)
        .bind(&data.gender)
        .bind(&data.language)
        .bind(data.dob)
        .bind(Json(data.travel_styles.clone()))
        .bind(Json(data.interests.clone()))
        .bind(now)
        .execute(&self.connection_pool)
        .await?;

        let new_id = result.last_insert_rowid() as i32;
        info!("User created with id {}", new_id);

        Ok(User {
            user_id: new_id,
            username: data.username.clone(),
            password: data.password.clone(),
            email: data.email.clone(),
            mobile: data.mobile.clone(),
            gender: data.gender.clone(),
            language: data.language.clone(),
            dob: data.dob,
            travel_styles: Json(data.travel_styles.clone()),
            interests: Json(data.interests.clone()),
            created_at: now,
        })
    }
}

impl Read<User, i32> for UserRepository {
    #[instrument(skip(self), fields(user_id = %id))]
    async fn read(&self, id: &i32) -> Result<Option<User>, Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, username, password, email, mobile, gender, language, dob,
                   travel_styles, interests, created_at
            FROM users
            WHERE user_id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(user)
    }
}

impl Update<User, UpdateProfileDTO, i32> for UserRepository {
    #[instrument(skip(self, data), fields(user_id = %id))]
    async fn update(&self, id: &i32, data: &UpdateProfileDTO) -> Result<User, Error> {
        // First, get the current user to ensure it exists
        let current_user = self.read(id).await?.ok_or(Error::RowNotFound)?;

        if data.is_empty() {
            debug!("No fields to update, returning current user");
            return Ok(current_user);
        }

        let mut query_builder = QueryBuilder::<Sqlite>::new("UPDATE users SET ");

        let mut separated = query_builder.separated(", ");
        if let Some(ref username) = data.username {
            separated.push("username = ");
            separated.push_bind_unseparated(username.clone());
        }
        if let Some(ref email) = data.email {
            separated.push("email = ");
            separated.push_bind_unseparated(email.clone());
        }
        if let Some(ref mobile) = data.mobile {
            separated.push("mobile = ");
            separated.push_bind_unseparated(mobile.clone());
        }
        if let Some(ref gender) = data.gender {
            separated.push("gender = ");
            separated.push_bind_unseparated(gender.clone());
        }
        if let Some(ref language) = data.language {
            separated.push("language = ");
            separated.push_bind_unseparated(language.clone());
        }
        if let Some(dob) = data.dob {
            separated.push("dob = ");
            separated.push_bind_unseparated(dob);
        }
        if let Some(ref styles) = data.travel_styles {
            separated.push("travel_styles = ");
            separated.push_bind_unseparated(Json(styles.clone()));
        }
        if let Some(ref interests) = data.interests {
            separated.push("interests = ");
            separated.push_bind_unseparated(Json(interests.clone()));
        }

        query_builder.push(" WHERE user_id = ");
        query_builder.push_bind(*id);

        query_builder.build().execute(&self.connection_pool).await?;

        info!("User profile updated");

        self.read(id).await?.ok_or(Error::RowNotFound)
    }
}
