//! Test doubles used by this crate's own unit and integration tests.
//! Mirrors the source's `provisioner_mock.go`, hand-written rather than
//! generated, matching how the teacher's `users_info` crate hand-rolls its
//! own `test_support.rs`. Not part of the public API surface used by
//! `dyndns-server`.

use crate::domain::provisioner::{Provisioner, ProvisionerError};
use async_trait::async_trait;
use std::sync::Mutex;

/// One recorded call against [`DummyProvisioner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Add { host: String, apex: String, value: String },
    Update { host: String, apex: String, value: String },
    Delete { host: String, apex: String },
}

/// An in-memory `Provisioner` (`spec.md` §4.4, §8 scenarios name it
/// `"dummy"`) that records every call it receives and can be configured to
/// fail on demand, for exercising the Alias Engine's upstream-before-local
/// protocol without a real DNS backend.
pub struct DummyProvisioner {
    name: String,
    calls: Mutex<Vec<Call>>,
    fail_next: Mutex<bool>,
}

impl DummyProvisioner {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            calls: Mutex::new(Vec::new()),
            fail_next: Mutex::new(false),
        }
    }

    /// The next call (add, update, or delete) will fail with
    /// `ProvisionerError::Upstream`; the flag resets after firing once.
    pub fn fail_next_call(&self) {
        *self.fail_next.lock().unwrap_or_else(|e| e.into_inner()) = true;
    }

    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn take_fail_next(&self) -> bool {
        let mut flag = self.fail_next.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *flag)
    }

    fn record(&self, call: Call) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }
}

#[async_trait]
impl Provisioner for DummyProvisioner {
    async fn add_record(
        &self,
        host: &str,
        apex: &str,
        value: &str,
    ) -> Result<(), ProvisionerError> {
        if self.take_fail_next() {
            return Err(ProvisionerError::Upstream("dummy: forced failure".to_string()));
        }
        self.record(Call::Add {
            host: host.to_string(),
            apex: apex.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    async fn update_record(
        &self,
        host: &str,
        apex: &str,
        value: &str,
    ) -> Result<(), ProvisionerError> {
        if self.take_fail_next() {
            return Err(ProvisionerError::Upstream("dummy: forced failure".to_string()));
        }
        self.record(Call::Update {
            host: host.to_string(),
            apex: apex.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    async fn delete_record(&self, host: &str, apex: &str) -> Result<(), ProvisionerError> {
        if self.take_fail_next() {
            return Err(ProvisionerError::Upstream("dummy: forced failure".to_string()));
        }
        self.record(Call::Delete {
            host: host.to_string(),
            apex: apex.to_string(),
        });
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
