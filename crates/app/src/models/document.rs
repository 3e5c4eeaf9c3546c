//! The single persisted document and its load outcome.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use second_sole_core::AccountId;

use super::account::Account;

/// Everything the app persists, stored as one JSON value.
///
/// Missing top-level fields take their defaults when loading, which is how
/// new fields are introduced without a version marker.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreDocument {
    pub accounts: BTreeMap<AccountId, Account>,
    pub current_account_id: Option<AccountId>,
    pub is_authenticated: bool,
}

impl StoreDocument {
    /// The selected account, if any.
    #[must_use]
    pub fn current_account(&self) -> Option<&Account> {
        self.current_account_id
            .as_ref()
            .and_then(|id| self.accounts.get(id))
    }

    /// Mutable access to the selected account, if any.
    pub fn current_account_mut(&mut self) -> Option<&mut Account> {
        let id = self.current_account_id.as_ref()?;
        self.accounts.get_mut(id)
    }

    /// Id of the guest account, if one exists.
    #[must_use]
    pub fn guest_account_id(&self) -> Option<&AccountId> {
        self.accounts
            .iter()
            .find(|(_, account)| account.profile.is_guest)
            .map(|(id, _)| id)
    }

    /// List-screen view of every account, ordered by id.
    #[must_use]
    pub fn summaries(&self) -> Vec<AccountSummary> {
        self.accounts
            .iter()
            .map(|(id, account)| AccountSummary {
                id: id.clone(),
                name: account.profile.name.clone(),
                email: account.profile.email.clone(),
                is_guest: account.profile.is_guest,
            })
            .collect()
    }

    /// Drop a selection that points at a missing account.
    ///
    /// Returns `true` if the selection was cleared.
    pub fn repair_selection(&mut self) -> bool {
        let dangling = self
            .current_account_id
            .as_ref()
            .is_some_and(|id| !self.accounts.contains_key(id));
        if dangling {
            self.current_account_id = None;
            self.is_authenticated = false;
        }
        dangling
    }
}

/// Account list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub id: AccountId,
    pub name: String,
    pub email: String,
    pub is_guest: bool,
}

/// Outcome of reading the document from storage.
///
/// Reads never fail: every variant resolves to a usable document through
/// [`DocumentLoad::into_document`], but callers and tests can still tell a
/// legitimately empty store apart from corrupt contents.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentLoad {
    /// Nothing stored under the key.
    Empty,
    /// A document was parsed.
    Stored(StoreDocument),
    /// Something was stored but it is not a valid document.
    Malformed {
        /// Parser message.
        reason: String,
    },
    /// The backend could not be read.
    Unreadable {
        /// Backend error message.
        reason: String,
    },
}

impl DocumentLoad {
    /// Classify a raw stored value.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
            return Self::Empty;
        };

        let value: serde_json::Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                return Self::Malformed {
                    reason: e.to_string(),
                };
            }
        };

        match value {
            serde_json::Value::Null => Self::Empty,
            serde_json::Value::Object(_) => match serde_json::from_value(value) {
                Ok(document) => Self::Stored(document),
                Err(e) => Self::Malformed {
                    reason: e.to_string(),
                },
            },
            other => Self::Malformed {
                reason: format!("expected a JSON object, found {}", json_kind(&other)),
            },
        }
    }

    /// Whether the default document is being substituted for bad data.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Malformed { .. } | Self::Unreadable { .. })
    }

    /// Resolve to a usable document, substituting the empty default.
    #[must_use]
    pub fn into_document(self) -> StoreDocument {
        match self {
            Self::Stored(document) => document,
            Self::Empty | Self::Malformed { .. } | Self::Unreadable { .. } => {
                StoreDocument::default()
            }
        }
    }
}

const fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use second_sole_core::PasswordDigest;

    use super::*;

    #[test]
    fn test_parse_missing_and_blank_are_empty() {
        assert_eq!(DocumentLoad::parse(None), DocumentLoad::Empty);
        assert_eq!(DocumentLoad::parse(Some("")), DocumentLoad::Empty);
        assert_eq!(DocumentLoad::parse(Some("null")), DocumentLoad::Empty);
    }

    #[test]
    fn test_parse_garbage_is_malformed() {
        let load = DocumentLoad::parse(Some("{not json"));
        assert!(matches!(load, DocumentLoad::Malformed { .. }));
        assert!(load.is_fallback());
        assert_eq!(load.into_document(), StoreDocument::default());
    }

    #[test]
    fn test_parse_non_object_is_malformed() {
        let load = DocumentLoad::parse(Some("[1,2,3]"));
        match load {
            DocumentLoad::Malformed { reason } => assert!(reason.contains("an array")),
            other => panic!("expected malformed, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_wrong_field_type_is_malformed() {
        let load = DocumentLoad::parse(Some(r#"{"isAuthenticated": "yes"}"#));
        assert!(matches!(load, DocumentLoad::Malformed { .. }));
    }

    #[test]
    fn test_parse_missing_fields_take_defaults() {
        let load = DocumentLoad::parse(Some(r#"{"isAuthenticated": true}"#));
        let document = load.into_document();
        assert!(document.accounts.is_empty());
        assert!(document.current_account_id.is_none());
        assert!(document.is_authenticated);
    }

    #[test]
    fn test_current_account_and_guest_lookup() {
        let mut document = StoreDocument::default();
        document.accounts.insert(
            AccountId::new("acc_1"),
            Account::member("Ann", "ann@x.com", PasswordDigest::from_hex("h1")),
        );
        document
            .accounts
            .insert(AccountId::new("guest_1"), Account::guest());

        assert!(document.current_account().is_none());
        document.current_account_id = Some(AccountId::new("acc_1"));
        assert_eq!(document.current_account().unwrap().profile.name, "Ann");
        assert_eq!(document.guest_account_id().unwrap().as_str(), "guest_1");

        let summaries = document.summaries();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].id.as_str(), "acc_1");
        assert!(summaries[1].is_guest);
    }

    #[test]
    fn test_repair_selection_clears_dangling_id() {
        let mut document = StoreDocument {
            current_account_id: Some(AccountId::new("gone")),
            is_authenticated: true,
            ..StoreDocument::default()
        };
        assert!(document.repair_selection());
        assert!(document.current_account_id.is_none());
        assert!(!document.is_authenticated);
        assert!(!document.repair_selection());
    }

    #[test]
    fn test_document_json_shape() {
        let document = StoreDocument::default();
        let json = serde_json::to_string(&document).unwrap();
        assert_eq!(
            json,
            r#"{"accounts":{},"currentAccountId":null,"isAuthenticated":false}"#
        );
    }
}
