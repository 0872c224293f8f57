use std::sync::Arc;

use chrono::Utc;
use common_auth::{Role, TokenCodec};
use tracing::{info, warn};
use uuid::Uuid;

use crate::dto::{CashierRequest, LoginRequest, RegisterRequest};
use crate::error::{ServiceError, ServiceResult};
use crate::models::User;
use crate::pagination::{PageRequest, Paginated};
use crate::passwords::{hash_password, verify_password};
use crate::store::UserStore;

/// Registration, login and owner-side cashier management.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    codec: Arc<TokenCodec>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>, codec: Arc<TokenCodec>) -> Self {
        Self { store, codec }
    }

    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<User> {
        let role = request.validate()?;
        let user = build_user(
            request.username,
            request.email,
            &request.password,
            role,
            request.name,
        )?;
        self.store.insert(&user).await?;
        info!(user_id = %user.id, role = %user.role, "user registered");
        Ok(user)
    }

    /// Returns a signed token. Unknown email and wrong password are indistinguishable.
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<String> {
        let Some(user) = self.store.find_by_email(&request.email).await? else {
            return Err(ServiceError::InvalidCredentials);
        };

        if !verify_password(&request.password, &user.password_hash) {
            warn!(user_id = %user.id, "login rejected: password mismatch");
            return Err(ServiceError::InvalidCredentials);
        }

        let token = self.codec.issue(user.id, user.role)?;
        info!(user_id = %user.id, role = %user.role, "login succeeded");
        Ok(token)
    }

    pub async fn create_cashier(&self, request: CashierRequest) -> ServiceResult<User> {
        request.validate()?;
        let user = build_user(
            request.username,
            request.email,
            &request.password,
            Role::Cashier,
            request.name,
        )?;
        self.store.insert(&user).await?;
        info!(user_id = %user.id, "cashier created");
        Ok(user)
    }

    pub async fn list_cashiers(&self, page: PageRequest) -> ServiceResult<Paginated<User>> {
        let (users, total) = self.store.list_by_role(Role::Cashier, page).await?;
        Ok(Paginated::new(users, total, page))
    }

    pub async fn get_cashier(&self, raw_id: &str) -> ServiceResult<User> {
        self.load_cashier(raw_id).await
    }

    pub async fn update_cashier(&self, raw_id: &str, request: CashierRequest) -> ServiceResult<User> {
        request.validate()?;
        let mut user = self.load_cashier(raw_id).await?;

        user.username = request.username;
        user.email = request.email;
        user.name = request.name;
        user.password_hash = hash_password(&request.password)?;
        user.updated_at = Utc::now();

        self.store.update(&user).await?;
        info!(user_id = %user.id, "cashier updated");
        Ok(user)
    }

    pub async fn delete_cashier(&self, raw_id: &str) -> ServiceResult<()> {
        let user = self.load_cashier(raw_id).await?;
        self.store.soft_delete(user.id, Utc::now()).await?;
        info!(user_id = %user.id, "cashier deleted");
        Ok(())
    }

    /// Anything that is not an active cashier, including a malformed id, is "not found".
    async fn load_cashier(&self, raw_id: &str) -> ServiceResult<User> {
        let id = Uuid::parse_str(raw_id).map_err(|_| ServiceError::NotFound)?;
        self.store
            .find_by_id(id)
            .await?
            .filter(|user| user.role == Role::Cashier)
            .ok_or(ServiceError::NotFound)
    }
}

fn build_user(
    username: String,
    email: String,
    password: &str,
    role: Role,
    name: String,
) -> ServiceResult<User> {
    let now = Utc::now();
    Ok(User {
        id: Uuid::new_v4(),
        username,
        email,
        password_hash: hash_password(password)?,
        role,
        name,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryUserStore;
    use common_auth::JwtConfig;

    fn service() -> UserService {
        let codec = TokenCodec::new(JwtConfig::new("user-service-secret", "pos")).unwrap();
        UserService::new(Arc::new(MemoryUserStore::new()), Arc::new(codec))
    }

    fn register_request(email: &str, role: &str) -> RegisterRequest {
        RegisterRequest {
            username: "owner".into(),
            email: email.into(),
            password: "correct horse".into(),
            role: role.into(),
            name: "Owner".into(),
        }
    }

    fn cashier_request(email: &str) -> CashierRequest {
        CashierRequest {
            username: "till-1".into(),
            email: email.into(),
            password: "till-pass".into(),
            name: "Till One".into(),
        }
    }

    #[tokio::test]
    async fn login_issues_token_carrying_the_user_role() {
        let service = service();
        let user = service
            .register(register_request("owner@pos.test", "owner"))
            .await
            .unwrap();

        let token = service
            .login(LoginRequest {
                email: "owner@pos.test".into(),
                password: "correct horse".into(),
            })
            .await
            .unwrap();

        let claims = service.codec.verify(&token).unwrap();
        assert_eq!(claims.subject, user.id);
        assert_eq!(claims.role, Role::Owner);
    }

    #[tokio::test]
    async fn unknown_email_and_wrong_password_look_the_same() {
        let service = service();
        service
            .register(register_request("owner@pos.test", "owner"))
            .await
            .unwrap();

        for (email, password) in [("owner@pos.test", "nope"), ("ghost@pos.test", "correct horse")] {
            let err = service
                .login(LoginRequest {
                    email: email.into(),
                    password: password.into(),
                })
                .await
                .unwrap_err();
            assert!(matches!(err, ServiceError::InvalidCredentials));
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let service = service();
        service
            .register(register_request("dup@pos.test", "owner"))
            .await
            .unwrap();
        let err = service
            .register(register_request("dup@pos.test", "cashier"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::EmailTaken));
    }

    #[tokio::test]
    async fn owner_is_not_reachable_through_cashier_operations() {
        let service = service();
        let owner = service
            .register(register_request("owner@pos.test", "owner"))
            .await
            .unwrap();

        let id = owner.id.to_string();
        assert!(matches!(
            service.get_cashier(&id).await,
            Err(ServiceError::NotFound)
        ));
        assert!(matches!(
            service.delete_cashier(&id).await,
            Err(ServiceError::NotFound)
        ));
        assert!(matches!(
            service.get_cashier("not-a-uuid").await,
            Err(ServiceError::NotFound)
        ));
    }

    #[tokio::test]
    async fn update_rehashes_password() {
        let service = service();
        let cashier = service
            .create_cashier(cashier_request("till@pos.test"))
            .await
            .unwrap();
        assert_eq!(cashier.role, Role::Cashier);

        let mut changed = cashier_request("till@pos.test");
        changed.password = "new-pass".into();
        let updated = service
            .update_cashier(&cashier.id.to_string(), changed)
            .await
            .unwrap();
        assert_ne!(updated.password_hash, cashier.password_hash);

        let login = |password: &str| LoginRequest {
            email: "till@pos.test".into(),
            password: password.into(),
        };
        assert!(service.login(login("new-pass")).await.is_ok());
        assert!(service.login(login("till-pass")).await.is_err());
    }

    #[tokio::test]
    async fn deleted_cashier_cannot_log_in() {
        let service = service();
        let cashier = service
            .create_cashier(cashier_request("gone@pos.test"))
            .await
            .unwrap();
        service
            .delete_cashier(&cashier.id.to_string())
            .await
            .unwrap();

        let err = service
            .login(LoginRequest {
                email: "gone@pos.test".into(),
                password: "till-pass".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidCredentials));
    }
}
