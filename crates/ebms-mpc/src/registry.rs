//! Process-wide registry of partition channels
//!
//! The registry is created once at startup and passed explicitly to whoever
//! needs it. It holds at most one record per key and only ever grows through
//! its creation operations (`create`, `register`, `ensure` and lazy creation
//! of declared keys), which share a single checked insert.
//!
//! # Lookup outcomes on the inbound path
//!
//! ```text
//!   key ──► registered? ──yes──► Resolution::Registered
//!               │ no
//!               ▼
//!           declared? ──yes──► create(Lazy) ──► Resolution::Created
//!               │ no
//!               ▼
//!         Resolution::Unknown
//! ```
//!
//! `ensure` is for bootstrap and tests only; the inbound path never
//! auto-creates an undeclared key.

use crate::channel::{ChannelOrigin, Mpc};
use ebms_core::{CoreError, MpcId, Result};
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};

/// Outcome of resolving a key on the inbound path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The channel was already registered
    Registered(Mpc),
    /// The key was declared and its channel has just been created
    Created(Mpc),
    /// The key is neither registered nor declared
    Unknown,
}

#[derive(Debug, Default)]
struct RegistryState {
    channels: BTreeMap<MpcId, Mpc>,
    declared: BTreeSet<MpcId>,
}

impl RegistryState {
    fn insert(&mut self, mpc: Mpc) -> Result<()> {
        if self.channels.contains_key(mpc.id()) {
            return Err(CoreError::already_exists(mpc.id().as_str()));
        }
        tracing::info!(mpc = %mpc.id(), origin = ?mpc.origin(), "registered partition channel");
        self.channels.insert(mpc.id().clone(), mpc);
        Ok(())
    }
}

/// Registry of Message Partition Channels
#[derive(Debug, Default)]
pub struct MpcRegistry {
    state: RwLock<RegistryState>,
}

impl MpcRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding only the ebMS3 default channel
    pub fn with_default_channel() -> Self {
        let mut registry = Self::new();
        let default = Mpc::with_origin(MpcId::default_mpc(), ChannelOrigin::Default);
        registry
            .state
            .get_mut()
            .channels
            .insert(default.id().clone(), default);
        registry
    }

    /// Look up a channel by key; no side effects
    pub fn lookup(&self, key: &str) -> Result<Mpc> {
        let found = self.state.read().channels.get(key).cloned();
        tracing::debug!(mpc = key, found = found.is_some(), "channel lookup");
        found.ok_or_else(|| CoreError::not_found(key))
    }

    /// Whether a channel is registered under `key`
    pub fn contains(&self, key: &MpcId) -> bool {
        self.state.read().channels.contains_key(key)
    }

    /// Register a new channel
    ///
    /// Fails with [`CoreError::AlreadyExists`] if the key is taken; the
    /// existing record is left untouched.
    pub fn create(&self, mpc: Mpc) -> Result<()> {
        self.state.write().insert(mpc)
    }

    /// Parse `key` and register it
    pub fn register(&self, key: &str) -> Result<Mpc> {
        let mpc = Mpc::new(MpcId::new(key)?);
        self.create(mpc.clone())?;
        Ok(mpc)
    }

    /// Look the key up, registering it when absent
    ///
    /// Not used when processing inbound messages.
    pub fn ensure(&self, key: &str) -> Result<Mpc> {
        let id = MpcId::new(key)?;
        let mut state = self.state.write();
        if let Some(existing) = state.channels.get(&id) {
            return Ok(existing.clone());
        }
        let mpc = Mpc::new(id);
        state.insert(mpc.clone())?;
        Ok(mpc)
    }

    /// Declare a key whose channel may be created lazily on first pull
    pub fn declare(&self, id: MpcId) {
        tracing::debug!(mpc = %id, "declared partition channel");
        self.state.write().declared.insert(id);
    }

    /// Whether `id` was declared
    pub fn is_declared(&self, id: &MpcId) -> bool {
        self.state.read().declared.contains(id)
    }

    /// Resolve a syntactically valid key for an inbound pull
    ///
    /// Lookup and lazy creation happen under one write lock, so concurrent
    /// pulls on the same declared key create a single record.
    pub fn resolve(&self, id: &MpcId) -> Resolution {
        let registered = self.state.read().channels.get(id).cloned();
        if let Some(existing) = registered {
            return Resolution::Registered(existing);
        }

        let mut state = self.state.write();
        if let Some(existing) = state.channels.get(id) {
            return Resolution::Registered(existing.clone());
        }
        if !state.declared.contains(id) {
            return Resolution::Unknown;
        }
        let mpc = Mpc::with_origin(id.clone(), ChannelOrigin::Lazy);
        match state.insert(mpc.clone()) {
            Ok(()) => Resolution::Created(mpc),
            // The key was checked under this same lock
            Err(_) => Resolution::Registered(mpc),
        }
    }

    /// Registered keys in order
    pub fn keys(&self) -> Vec<MpcId> {
        self.state.read().channels.keys().cloned().collect()
    }

    /// Declared keys in order, registered or not
    pub fn declared_keys(&self) -> Vec<MpcId> {
        self.state.read().declared.iter().cloned().collect()
    }

    /// Number of registered channels
    pub fn len(&self) -> usize {
        self.state.read().channels.len()
    }

    /// Whether no channel is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
