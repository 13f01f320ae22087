//! User registration and login.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    PasswordHasher, PasswordHasherError, RegistrationCommand, UserPersistenceError,
    UserRepository,
};
use crate::domain::{
    CoreFact, Error, LoginCredentials, MirrorPublisher, PublicUser, Registration, User,
};

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Service implementing [`RegistrationCommand`].
pub struct RegistrationService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
    mirror: MirrorPublisher,
}

impl<U, H> RegistrationService<U, H> {
    /// Service storing accounts in `users` and announcing them on `mirror`.
    pub fn new(users: Arc<U>, hasher: Arc<H>, mirror: MirrorPublisher) -> Self {
        Self {
            users,
            hasher,
            mirror,
        }
    }
}

impl<U, H> RegistrationService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    fn map_user_error(error: UserPersistenceError) -> Error {
        match error {
            UserPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("user directory unavailable: {message}"))
            }
            UserPersistenceError::Query { message } => {
                Error::internal(format!("user directory error: {message}"))
            }
            UserPersistenceError::Duplicate { .. } => Self::duplicate_user(),
        }
    }

    fn map_hasher_error(error: PasswordHasherError) -> Error {
        Error::internal(error.to_string())
    }

    fn duplicate_user() -> Error {
        Error::conflict("user already exists").with_details(json!({
            "field": "email",
            "code": "duplicate_user",
        }))
    }
}

#[async_trait]
impl<U, H> RegistrationCommand for RegistrationService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn register(&self, registration: Registration) -> Result<PublicUser, Error> {
        if self
            .users
            .find_by_id(registration.user_id())
            .await
            .map_err(Self::map_user_error)?
            .is_some()
        {
            return Err(Self::duplicate_user());
        }

        let password_hash = self
            .hasher
            .hash(registration.password())
            .await
            .map_err(Self::map_hasher_error)?;
        let user = User {
            id: registration.user_id().clone(),
            profile: registration.profile().clone(),
            password_hash,
        };
        self.users
            .insert(&user)
            .await
            .map_err(Self::map_user_error)?;
        info!(user_id = %user.id, "user registered");

        let public = user.to_public();
        self.mirror.publish(CoreFact::UserRegistered(public.clone()));
        Ok(public)
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<PublicUser, Error> {
        let Some(user) = self
            .users
            .find_by_id(credentials.user_id())
            .await
            .map_err(Self::map_user_error)?
        else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let verified = self
            .hasher
            .verify(credentials.password(), &user.password_hash)
            .await
            .map_err(Self::map_hasher_error)?;
        if !verified {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        Ok(user.to_public())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockPasswordHasher, MockUserRepository};
    use crate::domain::{ErrorCode, PasswordHash, UserProfile, mirror_channel};
    use rstest::rstest;

    fn registration() -> Registration {
        Registration::try_new(
            "ada@example.com",
            "correct horse",
            UserProfile {
                city: Some("Vilnius".to_owned()),
                ..UserProfile::default()
            },
        )
        .expect("valid registration")
    }

    fn hashing_hasher() -> MockPasswordHasher {
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .returning(|password| Ok(PasswordHash::new(format!("hashed:{password}"))));
        hasher
            .expect_verify()
            .returning(|password, hash| Ok(hash.as_str() == format!("hashed:{password}")));
        hasher
    }

    fn stored_user() -> User {
        User {
            id: registration().user_id().clone(),
            profile: UserProfile::default(),
            password_hash: PasswordHash::new("hashed:correct horse"),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn register_hashes_password_and_publishes() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().return_once(|_| Ok(None));
        users
            .expect_insert()
            .withf(|user| user.password_hash.as_str() == "hashed:correct horse")
            .times(1)
            .return_once(|_| Ok(()));
        let (mirror, mut facts) = mirror_channel(2);
        let service = RegistrationService::new(Arc::new(users), Arc::new(hashing_hasher()), mirror);

        let user = service.register(registration()).await.expect("registered");
        assert_eq!(user.profile.city.as_deref(), Some("Vilnius"));
        let envelope = facts.try_recv().expect("fact published");
        assert_eq!(envelope.fact, CoreFact::UserRegistered(user));
    }

    #[rstest]
    #[case::existing(Ok(Some(stored_user())), None)]
    #[case::insert_race(Ok(None), Some(UserPersistenceError::duplicate("ada@example.com")))]
    #[tokio::test]
    async fn duplicate_registration_conflicts(
        #[case] lookup: Result<Option<User>, UserPersistenceError>,
        #[case] insert_error: Option<UserPersistenceError>,
    ) {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().return_once(move |_| lookup);
        users.expect_insert().returning(move |_| match insert_error.clone() {
            Some(err) => Err(err),
            None => Ok(()),
        });
        let service = RegistrationService::new(
            Arc::new(users),
            Arc::new(hashing_hasher()),
            MirrorPublisher::disabled(),
        );

        let err = service
            .register(registration())
            .await
            .expect_err("duplicate");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[case::wrong_password("ada@example.com", "battery staple", Some(stored_user()))]
    #[case::unknown_user("bob@example.com", "correct horse", None)]
    #[tokio::test]
    async fn login_rejects_bad_credentials(
        #[case] email: &str,
        #[case] password: &str,
        #[case] stored: Option<User>,
    ) {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().return_once(move |_| Ok(stored));
        let service = RegistrationService::new(
            Arc::new(users),
            Arc::new(hashing_hasher()),
            MirrorPublisher::disabled(),
        );

        let credentials = LoginCredentials::try_from_parts(email, password).expect("shape");
        let err = service.login(credentials).await.expect_err("rejected");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), INVALID_CREDENTIALS);
    }

    #[rstest]
    #[tokio::test]
    async fn login_accepts_matching_password() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .return_once(|_| Ok(Some(stored_user())));
        let service = RegistrationService::new(
            Arc::new(users),
            Arc::new(hashing_hasher()),
            MirrorPublisher::disabled(),
        );

        let credentials =
            LoginCredentials::try_from_parts("ada@example.com", "correct horse").expect("shape");
        let user = service.login(credentials).await.expect("logged in");
        assert_eq!(user.id.as_ref(), "ada@example.com");
    }
}
