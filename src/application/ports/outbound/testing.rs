//! Test doubles for the random number port

use std::collections::VecDeque;
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{RandomNumberError, RandomNumberPort};
use crate::application::cancellation::CancelToken;

/// Returns values from a fixed sequence, cycling when it runs out
#[derive(Debug)]
pub struct FixedRandomPort {
    values: Vec<NonZeroU32>,
    index: AtomicUsize,
}

impl FixedRandomPort {
    pub fn new(values: Vec<u32>) -> Self {
        Self {
            values: values.into_iter().filter_map(NonZeroU32::new).collect(),
            index: AtomicUsize::new(0),
        }
    }

    pub fn constant(value: u32) -> Self {
        Self::new(vec![value])
    }

    pub fn calls(&self) -> usize {
        self.index.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RandomNumberPort for FixedRandomPort {
    async fn random_number(&self, _cancel: &CancelToken) -> Result<NonZeroU32, RandomNumberError> {
        let idx = self.index.fetch_add(1, Ordering::SeqCst);
        Ok(self.values[idx % self.values.len()])
    }
}

/// Plays back a script of results, then times out forever
#[derive(Debug, Default)]
pub struct ScriptedRandomPort {
    script: Mutex<VecDeque<Result<u32, RandomNumberError>>>,
    calls: AtomicUsize,
}

impl ScriptedRandomPort {
    pub fn new(script: Vec<Result<u32, RandomNumberError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn always_timing_out() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RandomNumberPort for ScriptedRandomPort {
    async fn random_number(&self, _cancel: &CancelToken) -> Result<NonZeroU32, RandomNumberError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Ok(n)) => NonZeroU32::new(n).ok_or(RandomNumberError::MalformedBody(n.to_string())),
            Some(Err(e)) => Err(e),
            None => Err(RandomNumberError::Timeout),
        }
    }
}

/// Starts every call and never finishes it
#[derive(Debug, Default)]
pub struct HangingRandomPort {
    calls: AtomicUsize,
}

impl HangingRandomPort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RandomNumberPort for HangingRandomPort {
    async fn random_number(&self, _cancel: &CancelToken) -> Result<NonZeroU32, RandomNumberError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        std::future::pending().await
    }
}
