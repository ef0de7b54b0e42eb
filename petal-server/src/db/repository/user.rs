//! User Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Role, User, UserCreate, UserId};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const USER_TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find user by id
    pub async fn find_by_id(&self, id: &UserId) -> RepoResult<Option<User>> {
        let user: Option<User> = self.base.db().select(id.clone()).await?;
        Ok(user)
    }

    /// Find user by email
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email.to_string()))
            .await?
            .take(0)?;
        Ok(users.into_iter().next())
    }

    /// Register a new user. Hashes the password before persisting.
    /// The unique index on `email` backs the duplicate check against
    /// concurrent signups.
    pub async fn create(&self, data: UserCreate) -> RepoResult<User> {
        if data.name.trim().is_empty() {
            return Err(RepoError::Validation("Name cannot be blank".into()));
        }
        if data.password.len() < 6 {
            return Err(RepoError::Validation(
                "Password must be at least 6 characters".into(),
            ));
        }
        if self.find_by_email(&data.email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Email is already registered: {}",
                data.email
            )));
        }

        let hash_pass = User::hash_password(&data.password)
            .map_err(|e| RepoError::Validation(format!("Failed to hash password: {}", e)))?;

        let user = User {
            id: None,
            name: data.name,
            email: data.email.clone(),
            hash_pass,
            role: data.role.unwrap_or(Role::Customer),
        };

        let created: Option<User> = self.base.db().create(USER_TABLE).content(user).await.map_err(
            |e| {
                // Unique index violation from a racing signup
                let msg = e.to_string();
                if msg.contains("uniq_user_email") {
                    RepoError::Duplicate(format!("Email is already registered: {}", data.email))
                } else {
                    RepoError::Database(msg)
                }
            },
        )?;

        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }
}
