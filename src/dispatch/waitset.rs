// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! `WaitSet`: blocks a thread until one of its attached conditions
//! triggers. Ported from the teacher's `dds/waitset.rs`.

use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use super::condition::Condition;

/// A set of conditions a thread can block on with `wait`.
pub struct WaitSet {
    conditions: Mutex<Vec<Arc<dyn Condition>>>,
    signal: Mutex<()>,
    cv: Condvar,
}

impl Default for WaitSet {
    fn default() -> Self {
        Self { conditions: Mutex::new(Vec::new()), signal: Mutex::new(()), cv: Condvar::new() }
    }
}

impl WaitSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach_condition(&self, condition: Arc<dyn Condition>) {
        self.conditions.lock().unwrap().push(condition);
    }

    pub fn detach_condition(&self, condition: &Arc<dyn Condition>) {
        let mut conditions = self.conditions.lock().unwrap();
        conditions.retain(|c| !Arc::ptr_eq(c, condition));
    }

    /// Wake any thread blocked in `wait`. The entity graph calls this
    /// after pushing a `Notification` and updating the relevant
    /// `StatusCondition`/`ReadCondition`.
    pub fn notify(&self) {
        let _guard = self.signal.lock().unwrap();
        self.cv.notify_all();
    }

    fn triggered(&self) -> Vec<Arc<dyn Condition>> {
        self.conditions
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.get_trigger_value())
            .cloned()
            .collect()
    }

    /// Block up to `timeout` for at least one attached condition to
    /// trigger, returning the triggered subset (empty on timeout).
    pub fn wait(&self, timeout: Duration) -> Vec<Arc<dyn Condition>> {
        let already = self.triggered();
        if !already.is_empty() {
            return already;
        }
        let guard = self.signal.lock().unwrap();
        let (_guard, _timeout_result) = self
            .cv
            .wait_timeout_while(guard, timeout, |_| self.triggered().is_empty())
            .unwrap();
        self.triggered()
    }
}
