use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Mutex,
};

use async_trait::async_trait;

use super::{repo::UserRepo, repo_types::User};
use crate::error::RepoError;

/// In-memory `UserRepo` for handler tests. Counts calls and can be told to fail.
#[derive(Default)]
pub struct MemoryUserRepo {
    rows: Mutex<Vec<User>>,
    last_id: Mutex<i32>,
    calls: AtomicUsize,
    failing: AtomicBool,
}

impl MemoryUserRepo {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> Vec<User> {
        self.rows.lock().unwrap().clone()
    }

    fn enter(&self) -> Result<(), RepoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(RepoError::Query(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepo for MemoryUserRepo {
    async fn list(&self) -> Result<Vec<User>, RepoError> {
        self.enter()?;
        Ok(self.snapshot())
    }

    async fn get_by_id(&self, id: i32) -> Result<User, RepoError> {
        self.enter()?;
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        self.enter()?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create(&self, username: &str, password: &str) -> Result<i32, RepoError> {
        self.enter()?;
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|u| u.username == username) {
            return Err(RepoError::Query(sqlx::Error::Protocol(
                "duplicate key value violates unique constraint \"users_username_key\"".into(),
            )));
        }
        let mut last_id = self.last_id.lock().unwrap();
        *last_id += 1;
        rows.push(User {
            id: *last_id,
            username: username.to_string(),
            password: password.to_string(),
        });
        Ok(*last_id)
    }

    async fn update(&self, id: i32, username: &str, password: &str) -> Result<u64, RepoError> {
        self.enter()?;
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.username = username.to_string();
                user.password = password.to_string();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: i32) -> Result<u64, RepoError> {
        self.enter()?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|u| u.id != id);
        Ok((before - rows.len()) as u64)
    }
}
