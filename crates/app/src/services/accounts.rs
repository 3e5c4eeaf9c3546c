//! Account store service.
//!
//! Local-only persistence of every account plus the session flags. Each
//! mutation is a whole-document read-modify-write:
//!
//! 1. Load the document (never fails; bad data resolves to the empty default)
//! 2. Apply the change to the addressed account
//! 3. Recompute the current account's storage label from the serialized size
//! 4. Persist the full document
//!
//! Operations that need a current account quietly do nothing (or return a
//! default) when none is selected. Only backend write failures and numbers
//! JSON cannot hold (NaN, infinity) surface as errors.

use chrono::Utc;
use rand::Rng;
use tracing::{debug, info, instrument, warn};

use second_sole_core::{AccountId, EventId, PasswordDigest, RotationShoeId, ShoeId};

use crate::config::DEFAULT_STORAGE_KEY;
use crate::db::{KeyValueStore, StorageError};
use crate::models::{
    Account, AccountSummary, CartItem, DocumentLoad, GaitProfile, PrivacyAudit, ProfileUpdate,
    ShoeRotationItem, StoreDocument, UserProfile,
};

/// Length of the random suffix on member account ids.
const ID_SUFFIX_LEN: usize = 5;

/// Upper bound on label recomputation passes; the label length settles in two.
const MAX_LABEL_PASSES: usize = 4;

/// Returned by destructive wipes: the caller must drop any in-memory view of
/// the session and re-read from storage.
#[must_use = "the caller must discard its in-memory session view"]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionReload;

/// Account and session persistence over an injected key-value backend.
#[derive(Debug, Clone)]
pub struct AccountStore<S> {
    backend: S,
    key: String,
}

impl<S: KeyValueStore> AccountStore<S> {
    /// Create a store using the default document key.
    #[must_use]
    pub fn new(backend: S) -> Self {
        Self::with_key(backend, DEFAULT_STORAGE_KEY)
    }

    /// Create a store using a custom document key.
    ///
    /// The key is not checked here; [`FileStore`](crate::db::FileStore)
    /// refuses keys outside `[A-Za-z0-9_-]`, so reads then classify as
    /// unreadable and writes fail with `StorageError::InvalidKey`.
    #[must_use]
    pub fn with_key(backend: S, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    /// The injected backend.
    #[must_use]
    pub const fn backend(&self) -> &S {
        &self.backend
    }

    /// The key the document is stored under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    // =========================================================================
    // Document I/O
    // =========================================================================

    /// Read and classify the stored document.
    #[must_use]
    pub fn load(&self) -> DocumentLoad {
        match self.backend.get(&self.key) {
            Ok(raw) => DocumentLoad::parse(raw.as_deref()),
            Err(e) => DocumentLoad::Unreadable {
                reason: e.to_string(),
            },
        }
    }

    /// Load the document, absorbing bad data into the empty default.
    fn document(&self) -> StoreDocument {
        let load = self.load();
        match &load {
            DocumentLoad::Malformed { reason } => {
                warn!(key = %self.key, %reason, "Stored document is malformed, using defaults");
            }
            DocumentLoad::Unreadable { reason } => {
                warn!(key = %self.key, %reason, "Stored document is unreadable, using defaults");
            }
            DocumentLoad::Empty | DocumentLoad::Stored(_) => {}
        }

        let mut document = load.into_document();
        if document.repair_selection() {
            warn!(key = %self.key, "Current account id pointed at a missing account, cleared");
        }
        document
    }

    /// Recompute the storage label and persist the whole document.
    fn save(&self, document: &mut StoreDocument) -> Result<(), StorageError> {
        let serialized = stamp_storage_used(document)?;
        self.backend.set(&self.key, &serialized)?;
        debug!(
            key = %self.key,
            bytes = serialized.len(),
            "Document persisted"
        );
        Ok(())
    }

    /// Apply `change` to the current account and persist.
    ///
    /// Nothing is written when there is no current account or when `change`
    /// returns `None`.
    fn modify_current<T>(
        &self,
        change: impl FnOnce(&mut Account) -> Option<T>,
    ) -> Result<Option<T>, StorageError> {
        let mut document = self.document();
        let Some(account) = document.current_account_mut() else {
            debug!("No current account, skipping write");
            return Ok(None);
        };
        let Some(result) = change(account) else {
            return Ok(None);
        };
        self.save(&mut document)?;
        Ok(Some(result))
    }

    /// Apply `change` to the current account and persist, if one is selected.
    fn update_current(&self, change: impl FnOnce(&mut Account)) -> Result<(), StorageError> {
        self.modify_current(|account| {
            change(account);
            Some(())
        })?;
        Ok(())
    }

    /// Read a value from the current account, or `default` without one.
    fn read_current<T>(&self, read: impl FnOnce(&Account) -> T, default: impl FnOnce() -> T) -> T {
        self.document().current_account().map_or_else(default, read)
    }

    /// The full document as currently stored.
    #[must_use]
    pub fn raw_document(&self) -> StoreDocument {
        self.document()
    }

    // =========================================================================
    // Account Management
    // =========================================================================

    /// Every account as `{id, name, email, is_guest}`, ordered by id.
    #[must_use]
    pub fn list_accounts(&self) -> Vec<AccountSummary> {
        self.document().summaries()
    }

    /// Id of the selected account, if any.
    #[must_use]
    pub fn current_account_id(&self) -> Option<AccountId> {
        self.document().current_account_id
    }

    /// Create a member account, select it, and mark the session authenticated.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the document cannot be written.
    #[instrument(skip(self, password_hash))]
    pub fn create_account(
        &self,
        name: &str,
        email: &str,
        password_hash: PasswordDigest,
    ) -> Result<AccountId, StorageError> {
        let mut document = self.document();
        let id = fresh_account_id(&document, "acc", true);

        document.accounts.insert(
            id.clone(),
            Account::member(name, email, password_hash),
        );
        document.current_account_id = Some(id.clone());
        document.is_authenticated = true;
        self.save(&mut document)?;

        info!(account_id = %id, "Account created");
        Ok(id)
    }

    /// Select the guest account, creating it if none exists, and mark the
    /// session authenticated.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the document cannot be written.
    #[instrument(skip(self))]
    pub fn create_guest_account(&self) -> Result<AccountId, StorageError> {
        let mut document = self.document();

        let id = if let Some(existing) = document.guest_account_id() {
            let id = existing.clone();
            debug!(account_id = %id, "Reusing guest account");
            id
        } else {
            let id = fresh_account_id(&document, "guest", false);
            document.accounts.insert(id.clone(), Account::guest());
            info!(account_id = %id, "Guest account created");
            id
        };

        document.current_account_id = Some(id.clone());
        document.is_authenticated = true;
        self.save(&mut document)?;
        Ok(id)
    }

    /// Select `id` and require re-authentication.
    ///
    /// Returns `false` (and writes nothing) if the account does not exist.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the document cannot be written.
    #[instrument(skip(self), fields(account_id = %id))]
    pub fn switch_account(&self, id: &AccountId) -> Result<bool, StorageError> {
        let mut document = self.document();
        if !document.accounts.contains_key(id) {
            debug!("Switch target does not exist");
            return Ok(false);
        }

        document.current_account_id = Some(id.clone());
        document.is_authenticated = false;
        self.save(&mut document)?;

        info!("Switched account, re-authentication required");
        Ok(true)
    }

    /// Remove an account.
    ///
    /// If it was selected, another remaining account (lowest id) is selected,
    /// or none, and the session is locked. Returns whether an account was
    /// removed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the document cannot be written.
    #[instrument(skip(self), fields(account_id = %id))]
    pub fn delete_account(&self, id: &AccountId) -> Result<bool, StorageError> {
        let mut document = self.document();
        let removed = document.accounts.remove(id).is_some();

        if document.current_account_id.as_ref() == Some(id) {
            document.current_account_id = document.accounts.keys().next().cloned();
            document.is_authenticated = false;
        }
        self.save(&mut document)?;

        if removed {
            info!("Account deleted");
        }
        Ok(removed)
    }

    /// Whether the stored digest for `id` equals `candidate`.
    ///
    /// Unknown accounts never verify.
    #[must_use]
    pub fn verify_password(&self, id: &AccountId, candidate: &PasswordDigest) -> bool {
        self.document()
            .accounts
            .get(id)
            .is_some_and(|account| account.password_hash.verify(candidate))
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Whether the session is unlocked.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.document().is_authenticated
    }

    /// Set the session flag.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the document cannot be written.
    pub fn set_authenticated(&self, status: bool) -> Result<(), StorageError> {
        let mut document = self.document();
        document.is_authenticated = status;
        self.save(&mut document)
    }

    /// Lock the session without changing the selection.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the document cannot be written.
    pub fn logout(&self) -> Result<(), StorageError> {
        self.set_authenticated(false)?;
        info!("Logged out");
        Ok(())
    }

    // =========================================================================
    // Profile
    // =========================================================================

    /// Profile of the current account, or the default profile.
    #[must_use]
    pub fn profile(&self) -> UserProfile {
        self.read_current(|account| account.profile.clone(), UserProfile::default)
    }

    /// Merge `update` into the current profile and return the result.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NonFinite` if `milesRun` is NaN or infinite.
    /// Returns `StorageError` if the document cannot be written.
    pub fn update_profile(
        &self,
        update: ProfileUpdate,
    ) -> Result<Option<UserProfile>, StorageError> {
        if let Some(miles) = update.miles_run {
            ensure_finite("milesRun", miles)?;
        }
        self.modify_current(|account| {
            update.apply_to(&mut account.profile);
            Some(account.profile.clone())
        })
    }

    // =========================================================================
    // Gait Profile
    // =========================================================================

    /// Gait profile of the current account, or an empty one.
    #[must_use]
    pub fn gait_profile(&self) -> GaitProfile {
        self.read_current(|account| account.gait_profile.clone(), GaitProfile::default)
    }

    /// Merge `update` into the current gait profile.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the document cannot be written.
    pub fn update_gait_profile(&self, update: GaitProfile) -> Result<(), StorageError> {
        self.update_current(|account| account.gait_profile.merge(update))
    }

    // =========================================================================
    // Rotation
    // =========================================================================

    /// Shoes in the current rotation, in display order.
    #[must_use]
    pub fn rotation(&self) -> Vec<ShoeRotationItem> {
        self.read_current(|account| account.rotation.clone(), Vec::new)
    }

    /// Append a shoe to the rotation.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NonFinite` if `miles` or `threshold` is NaN or
    /// infinite.
    /// Returns `StorageError` if the document cannot be written.
    pub fn add_to_rotation(&self, shoe: ShoeRotationItem) -> Result<(), StorageError> {
        ensure_finite("miles", shoe.miles)?;
        ensure_finite("threshold", shoe.threshold)?;
        self.update_current(|account| account.rotation.push(shoe))
    }

    /// Add `miles` to the rotation shoe with instance id `id`.
    ///
    /// Returns `false` (and writes nothing) if no such shoe exists.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NonFinite` if `miles` or the new total is NaN or
    /// infinite; nothing is written.
    /// Returns `StorageError` if the document cannot be written.
    pub fn update_rotation_shoe(
        &self,
        id: &RotationShoeId,
        miles: f64,
    ) -> Result<bool, StorageError> {
        ensure_finite("miles", miles)?;

        let mut document = self.document();
        let Some(shoe) = document
            .current_account_mut()
            .and_then(|account| account.rotation.iter_mut().find(|shoe| shoe.id == *id))
        else {
            return Ok(false);
        };
        let total = shoe.miles + miles;
        ensure_finite("miles", total)?;
        shoe.miles = total;

        self.save(&mut document)?;
        Ok(true)
    }

    /// Remove the rotation shoe with instance id `id`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the document cannot be written.
    pub fn remove_rotation_shoe(&self, id: &RotationShoeId) -> Result<(), StorageError> {
        self.update_current(|account| account.rotation.retain(|shoe| shoe.id != *id))
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Cart lines of the current account.
    #[must_use]
    pub fn cart(&self) -> Vec<CartItem> {
        self.read_current(|account| account.cart.clone(), Vec::new)
    }

    /// Add a cart line, summing quantities with an existing `(shoe_id, size)` line.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NonFinite` if `size` is NaN or infinite.
    /// Returns `StorageError` if the document cannot be written.
    pub fn add_to_cart(&self, item: CartItem) -> Result<(), StorageError> {
        ensure_finite("size", item.size)?;
        self.update_current(|account| account.merge_cart_item(item))
    }

    /// Remove the `(shoe_id, size)` line.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the document cannot be written.
    pub fn remove_from_cart(&self, shoe_id: &ShoeId, size: f64) -> Result<(), StorageError> {
        self.update_current(|account| account.cart.retain(|line| !line.matches(shoe_id, size)))
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the document cannot be written.
    pub fn clear_cart(&self) -> Result<(), StorageError> {
        self.update_current(|account| account.cart.clear())
    }

    // =========================================================================
    // RSVPs
    // =========================================================================

    /// Events the current account has RSVPed to.
    #[must_use]
    pub fn rsvped_events(&self) -> Vec<EventId> {
        self.read_current(|account| account.rsvped_events.clone(), Vec::new)
    }

    /// Count one attendance and, if `event_id` is given and new, record it.
    ///
    /// Attendance is counted even without an event id (a generic check-in).
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the document cannot be written.
    pub fn rsvp_event(&self, event_id: Option<&EventId>) -> Result<(), StorageError> {
        self.update_current(|account| account.record_rsvp(event_id))
    }

    /// Forget an RSVP. Attendance is not decremented.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the document cannot be written.
    pub fn remove_rsvp(&self, event_id: &EventId) -> Result<(), StorageError> {
        self.update_current(|account| account.rsvped_events.retain(|id| id != event_id))
    }

    // =========================================================================
    // Privacy
    // =========================================================================

    /// Audit info of the current account, or the default.
    #[must_use]
    pub fn privacy_audit(&self) -> PrivacyAudit {
        self.read_current(|account| account.privacy_audit.clone(), PrivacyAudit::default)
    }

    /// Delete the current account and lock the session.
    ///
    /// A reload is requested even when no account was selected.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the document cannot be written.
    #[instrument(skip(self))]
    pub fn wipe_data(&self) -> Result<SessionReload, StorageError> {
        let mut document = self.document();
        if let Some(id) = document.current_account_id.take() {
            document.accounts.remove(&id);
            document.is_authenticated = false;
            self.save(&mut document)?;
            info!(account_id = %id, "Current account wiped");
        }
        Ok(SessionReload)
    }

    /// Erase the whole document.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the key cannot be removed.
    #[instrument(skip(self))]
    pub fn wipe_all_data(&self) -> Result<SessionReload, StorageError> {
        self.backend.remove(&self.key)?;
        info!(key = %self.key, "All local data wiped");
        Ok(SessionReload)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Format a byte count as kilobytes with two decimals, e.g. `"1.27KB"`.
#[must_use]
pub fn storage_label(bytes: usize) -> String {
    #[allow(clippy::cast_precision_loss)] // document sizes are far below f64 precision
    let kilobytes = bytes as f64 / 1024.0;
    format!("{kilobytes:.2}KB")
}

/// Write the current account's storage label and return the serialized
/// document it describes.
///
/// The label is part of the document, so the size is recomputed until the
/// label stops changing.
fn stamp_storage_used(document: &mut StoreDocument) -> Result<String, StorageError> {
    let mut serialized = serde_json::to_string(document)?;
    for _ in 0..MAX_LABEL_PASSES {
        let label = storage_label(serialized.len());
        let Some(account) = document.current_account_mut() else {
            break;
        };
        if account.privacy_audit.storage_used == label {
            break;
        }
        account.privacy_audit.storage_used = label;
        serialized = serde_json::to_string(document)?;
    }
    Ok(serialized)
}

/// Refuse numbers that `serde_json` would write as `null`.
fn ensure_finite(field: &'static str, value: f64) -> Result<(), StorageError> {
    if value.is_finite() {
        Ok(())
    } else {
        warn!(field, %value, "Refusing to store a non-finite number");
        Err(StorageError::NonFinite(field))
    }
}

/// Generate an id not yet present in the document.
///
/// Member ids look like `acc_<millis>_<5 base36 chars>`; guest ids are
/// `guest_<millis>` and only gain a suffix on collision.
fn fresh_account_id(document: &StoreDocument, prefix: &str, always_suffix: bool) -> AccountId {
    let millis = Utc::now().timestamp_millis();
    let mut rng = rand::rng();
    let mut with_suffix = always_suffix;

    loop {
        let candidate = if with_suffix {
            let suffix: String = (0..ID_SUFFIX_LEN)
                .map(|_| char::from_digit(rng.random_range(0..36), 36).unwrap_or('0'))
                .collect();
            format!("{prefix}_{millis}_{suffix}")
        } else {
            format!("{prefix}_{millis}")
        };

        if !document.accounts.contains_key(candidate.as_str()) {
            return AccountId::new(candidate);
        }
        with_suffix = true;
    }
}
