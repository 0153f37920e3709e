use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::RoleSecrets;
use crate::error::{ShopError, ShopResult};
use crate::models::user::{AccountStatus, RegisterUser, Role, User, UserResponse};
use crate::shop::Shop;

fn validate_name(name: &str) -> ShopResult<()> {
    if name.trim().len() < 2 {
        return Err(ShopError::Validation(
            "name must be at least 2 characters".into(),
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> ShopResult<()> {
    let (local, domain) = email
        .split_once('@')
        .ok_or_else(|| ShopError::Validation("email must contain '@'".into()))?;
    if local.is_empty() || !domain.contains('.') || email.chars().any(char::is_whitespace) {
        return Err(ShopError::Validation("email address is not valid".into()));
    }
    Ok(())
}

fn validate_password(password: &str) -> ShopResult<()> {
    if password.len() < 6 {
        return Err(ShopError::Validation(
            "password must be at least 6 characters".into(),
        ));
    }
    Ok(())
}

impl Shop {
    /// Create an account.
    ///
    /// Staff roles must present the matching shared secret; customers need
    /// none. The new account is stamped as logged in, so the caller can
    /// issue a session token right away.
    pub fn register(&self, request: RegisterUser, secrets: &RoleSecrets) -> ShopResult<User> {
        let name = request.name.trim().to_string();
        let email = request.email.trim().to_string();
        validate_name(&name)?;
        validate_email(&email)?;
        validate_password(&request.password)?;

        let expected = match request.role {
            Role::Customer => None,
            Role::Employee => Some(&secrets.employee),
            Role::Administrator => Some(&secrets.admin),
        };
        if let Some(expected) = expected {
            if request.secret_key.as_deref() != Some(expected.as_str()) {
                warn!("Rejected {} registration for {}: bad secret key", role_name(request.role), email);
                return Err(ShopError::InvalidSecretKey);
            }
        }

        let mut state = self.state();
        if state.users.contains_key(&email.to_lowercase()) {
            return Err(ShopError::EmailTaken);
        }

        let is_customer = request.role == Role::Customer;
        let user = User {
            id: Uuid::new_v4(),
            name,
            email: email.clone(),
            password_hash: bcrypt::hash(&request.password, bcrypt::DEFAULT_COST)?,
            role: request.role,
            status: AccountStatus::Active,
            last_login: Some(Utc::now()),
            size: request.size.filter(|_| is_customer),
            gender: request.gender.filter(|_| is_customer),
        };
        state.users.insert(email.to_lowercase(), user.clone());
        self.persist_user(&user)?;

        info!("Registered {} account for {}", role_name(user.role), user.email);
        Ok(user)
    }

    /// Establish a session: verify credentials, refuse blocked accounts,
    /// stamp the login time and write the record back.
    pub fn login(&self, email: &str, password: &str) -> ShopResult<User> {
        let mut state = self.state();
        let user = state
            .users
            .get_mut(&email.trim().to_lowercase())
            .ok_or(ShopError::InvalidCredentials)?;

        if !bcrypt::verify(password, &user.password_hash)? {
            warn!("Failed login for {}", user.email);
            return Err(ShopError::InvalidCredentials);
        }
        if user.status == AccountStatus::Blocked {
            warn!("Blocked account {} attempted to log in", user.email);
            return Err(ShopError::AccountBlocked);
        }

        user.last_login = Some(Utc::now());
        let user = user.clone();
        self.persist_user(&user)?;

        info!("{} logged in", user.email);
        Ok(user)
    }

    /// Directory listing for the admin view, ordered by email.
    pub fn users(&self) -> Vec<UserResponse> {
        let state = self.state();
        let mut users: Vec<_> = state.users.values().cloned().collect();
        users.sort_by(|a, b| a.email.cmp(&b.email));
        users.into_iter().map(UserResponse::from).collect()
    }

    /// Block or unblock an account. Blocked accounts cannot log in and
    /// lose access on their next request.
    pub fn set_user_status(&self, user_id: Uuid, status: AccountStatus) -> ShopResult<UserResponse> {
        let mut state = self.state();
        let user = state
            .users
            .values_mut()
            .find(|u| u.id == user_id)
            .ok_or(ShopError::AccountNotFound)?;
        user.status = status;
        let user = user.clone();
        self.persist_user(&user)?;

        info!("Account {} set to {:?}", user.email, user.status);
        Ok(user.into())
    }

    /// Flip a product in a customer's favorites set.
    ///
    /// A no-op for staff roles: the set is only meaningful for customers,
    /// so the call returns the (empty) current set unchanged.
    pub fn toggle_favorite(&self, user: &User, product_id: Uuid) -> ShopResult<Vec<Uuid>> {
        if user.role != Role::Customer {
            return Ok(self.favorites(user.id));
        }

        let mut state = self.state();
        let list = state.favorites.entry(user.id).or_default();
        if let Some(pos) = list.iter().position(|id| *id == product_id) {
            list.remove(pos);
        } else {
            list.push(product_id);
        }
        self.persist_favorites(&state, user.id)?;
        Ok(state.favorites.get(&user.id).cloned().unwrap_or_default())
    }

    /// A user's favorite product ids.
    pub fn favorites(&self, user_id: Uuid) -> Vec<Uuid> {
        self.state()
            .favorites
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }
}

fn role_name(role: Role) -> &'static str {
    match role {
        Role::Customer => "customer",
        Role::Employee => "employee",
        Role::Administrator => "administrator",
    }
}
