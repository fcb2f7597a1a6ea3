//! In-memory OTP store and user directory
//!
//! Both repositories share one state behind a single lock, so the
//! multi-table operations of [`OtpRepository`] are atomic the same way a
//! database transaction makes them atomic. Used by tests and by local runs
//! without a database.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::otp_record::{NewOtpRecord, OtpRecord};
use crate::domain::entities::user::{NewUser, User};
use crate::errors::DomainError;

use super::otp::{IssuedRecord, OtpOwner, OtpRepository};
use super::user::UserRepository;

#[derive(Default)]
struct MemoryState {
    users: HashMap<i64, User>,
    otps: HashMap<i64, OtpRecord>,
    current: HashMap<String, i64>,
    next_user_id: i64,
    next_otp_id: i64,
}

impl MemoryState {
    fn user_by_email(&self, email: &str) -> Option<&User> {
        self.users.values().find(|u| u.email == email)
    }
}

/// In-memory [`OtpRepository`]
#[derive(Clone, Default)]
pub struct InMemoryOtpRepository {
    state: Arc<RwLock<MemoryState>>,
    fail_next_verification: Arc<AtomicBool>,
}

impl InMemoryOtpRepository {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// User directory backed by the same state
    pub fn user_repository(&self) -> InMemoryUserRepository {
        InMemoryUserRepository {
            state: Arc::clone(&self.state),
        }
    }

    /// Insert an account directly, returning it with its assigned id
    pub async fn seed_user(&self, user: NewUser) -> User {
        let mut state = self.state.write().await;
        state.next_user_id += 1;
        let user = user.into_user(state.next_user_id);
        state.users.insert(user.id, user.clone());
        user
    }

    /// Make the next [`OtpRepository::mark_verified`] fail as if the commit
    /// had been rejected
    pub fn fail_next_verification(&self) {
        self.fail_next_verification.store(true, Ordering::SeqCst);
    }

    /// Every record issued for an email, oldest first
    pub async fn records_for(&self, email: &str) -> Vec<OtpRecord> {
        let state = self.state.read().await;
        let mut records: Vec<OtpRecord> = state
            .otps
            .values()
            .filter(|r| r.email == email)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.id);
        records
    }

    /// Number of accounts in the directory
    pub async fn user_count(&self) -> usize {
        self.state.read().await.users.len()
    }
}

#[async_trait]
impl OtpRepository for InMemoryOtpRepository {
    async fn find_current(&self, email: &str) -> Result<Option<OtpRecord>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .current
            .get(email)
            .and_then(|id| state.otps.get(id))
            .cloned())
    }

    async fn create_for_owner(
        &self,
        owner: OtpOwner,
        record: NewOtpRecord,
    ) -> Result<IssuedRecord, DomainError> {
        let mut state = self.state.write().await;

        let (user, user_created) = match owner {
            OtpOwner::Existing(user_id) => {
                let user = state.users.get(&user_id).cloned().ok_or_else(|| {
                    DomainError::NotFound {
                        resource: "User".to_string(),
                    }
                })?;
                (user, false)
            }
            OtpOwner::Create(new_user) => match state.user_by_email(&new_user.email).cloned() {
                Some(existing) => (existing, false),
                None => {
                    state.next_user_id += 1;
                    let user = new_user.into_user(state.next_user_id);
                    state.users.insert(user.id, user.clone());
                    (user, true)
                }
            },
        };

        state.next_otp_id += 1;
        let record = record.into_record(state.next_otp_id, user.id);
        state.otps.insert(record.id, record.clone());
        state.current.insert(record.email.clone(), record.id);

        Ok(IssuedRecord {
            record,
            user,
            user_created,
        })
    }

    async fn record_failed_attempt(&self, otp_id: i64) -> Result<i32, DomainError> {
        let mut state = self.state.write().await;
        let record = state
            .otps
            .get_mut(&otp_id)
            .ok_or_else(|| DomainError::NotFound {
                resource: "OTP record".to_string(),
            })?;
        record.attempts += 1;
        Ok(record.attempts)
    }

    async fn mark_verified(&self, otp_id: i64, user_id: i64) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;

        if self.fail_next_verification.swap(false, Ordering::SeqCst) {
            return Err(DomainError::Database {
                message: "simulated commit failure".to_string(),
            });
        }

        if !state.users.contains_key(&user_id) {
            return Err(DomainError::NotFound {
                resource: "User".to_string(),
            });
        }

        match state.otps.get_mut(&otp_id) {
            Some(record) if record.used => return Ok(false),
            Some(record) => record.used = true,
            None => {
                return Err(DomainError::NotFound {
                    resource: "OTP record".to_string(),
                })
            }
        }

        if let Some(user) = state.users.get_mut(&user_id) {
            user.is_verified = true;
        }
        Ok(true)
    }
}

/// In-memory [`UserRepository`] sharing state with an [`InMemoryOtpRepository`]
#[derive(Clone)]
pub struct InMemoryUserRepository {
    state: Arc<RwLock<MemoryState>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let state = self.state.read().await;
        Ok(state.user_by_email(email).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError> {
        let state = self.state.read().await;
        Ok(state.users.get(&id).cloned())
    }
}
