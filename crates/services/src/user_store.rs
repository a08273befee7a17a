//! # User Store
//!
//! Registered users plus the single current session user, mirrored to
//! `@forum/users` and `@forum/currentUser`.

use domains::{keys, LoginError, Result, User, UserId};
use tracing::{debug, info};

use crate::persistence::Persistence;

pub struct UserStore {
    persistence: Persistence,
    users: Vec<User>,
    current_user: Option<User>,
}

impl UserStore {
    /// Loads users (default: none) and the persisted session (default: logged out).
    pub async fn load(persistence: Persistence) -> Self {
        let users: Vec<User> = persistence.get_item(keys::USERS, Vec::new()).await;
        let current_user: Option<User> = persistence.get_item(keys::CURRENT_USER, None).await;
        debug!(users = users.len(), logged_in = current_user.is_some(), "user store loaded");

        Self {
            persistence,
            users,
            current_user,
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    /// First user with exactly this name.
    pub fn find_by_name(&self, user_name: &str) -> Option<&User> {
        self.users.iter().find(|u| u.user_name == user_name)
    }

    /// Appends a user. Names are not checked for uniqueness here; login
    /// resolves to the first match.
    pub async fn create_user(&mut self, user: User) -> Result<()> {
        let mut users = self.users.clone();
        users.push(user);
        self.persistence.set_item(keys::USERS, &users).await?;
        self.users = users;
        Ok(())
    }

    /// Sets the session user, or clears the persisted session on `None`.
    pub async fn set_user(&mut self, user: Option<User>) -> Result<()> {
        match &user {
            Some(u) => self.persistence.set_item(keys::CURRENT_USER, u).await?,
            None => self.persistence.remove_item(keys::CURRENT_USER).await?,
        }
        self.current_user = user;
        Ok(())
    }

    /// Input is trimmed; name and password then compare exactly.
    pub async fn login(&mut self, user_name: &str, password: &str) -> std::result::Result<User, LoginError> {
        // Only empty fields are refused; blank ones go through the lookup.
        if user_name.is_empty() {
            return Err(LoginError::MissingField("user name is required".into()));
        }
        if password.is_empty() {
            return Err(LoginError::MissingField("password is required".into()));
        }
        let (user_name, password) = (user_name.trim(), password.trim());

        let user = self
            .find_by_name(user_name)
            .ok_or(LoginError::UserNotFound)?;
        if user.password != password {
            return Err(LoginError::WrongPassword);
        }

        let user = user.clone();
        self.set_user(Some(user.clone())).await?;
        info!(user = %user.user_name, "logged in");
        Ok(user)
    }

    pub async fn logout(&mut self) -> Result<()> {
        if let Some(user) = &self.current_user {
            info!(user = %user.user_name, "logged out");
        }
        self.set_user(None).await
    }

    /// Creates a regular (non-moderator) account with the next free id.
    pub async fn register(&mut self, user_name: &str, password: &str) -> std::result::Result<User, LoginError> {
        let (user_name, password) = required_fields(user_name, password)?;

        let user = User {
            id: self.next_id(),
            user_name: user_name.to_string(),
            password: password.to_string(),
            is_moderator: false,
        };
        self.create_user(user.clone()).await?;
        info!(user = %user.user_name, id = %user.id, "registered user");
        Ok(user)
    }

    fn next_id(&self) -> UserId {
        UserId(self.users.iter().map(|u| u.id.0).max().map_or(1, |max| max + 1))
    }
}

fn required_fields<'a>(user_name: &'a str, password: &'a str) -> std::result::Result<(&'a str, &'a str), LoginError> {
    let user_name = user_name.trim();
    let password = password.trim();
    if user_name.is_empty() {
        return Err(LoginError::MissingField("user name is required".into()));
    }
    if password.is_empty() {
        return Err(LoginError::MissingField("password is required".into()));
    }
    Ok((user_name, password))
}
