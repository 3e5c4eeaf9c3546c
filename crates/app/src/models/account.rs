//! Per-account records.
//!
//! Wire names are the camelCase keys of the `second_sole_v2_data` document,
//! so data already on a device loads unchanged. Every struct default-fills
//! missing fields; records written by older app versions still load.

use serde::{Deserialize, Deserializer, Serialize};

use second_sole_core::{EventId, PasswordDigest, RotationShoeId, ShoeId};

/// Display name given to the shared guest account.
pub const GUEST_NAME: &str = "Guest Runner";

/// Storage label used before the first write is measured.
pub const EMPTY_STORAGE_LABEL: &str = "0KB";

/// Reads `null` as `0.0`. `serde_json` writes NaN and infinity as `null`,
/// so one such field must not make the whole document unreadable.
fn null_as_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_default())
}

/// One user's full persisted state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Account {
    pub profile: UserProfile,
    pub password_hash: PasswordDigest,
    pub gait_profile: GaitProfile,
    pub rotation: Vec<ShoeRotationItem>,
    pub cart: Vec<CartItem>,
    pub rsvped_events: Vec<EventId>,
    pub privacy_audit: PrivacyAudit,
}

impl Account {
    /// A signed-up (non-guest) account.
    #[must_use]
    pub fn member(name: &str, email: &str, password_hash: PasswordDigest) -> Self {
        Self {
            profile: UserProfile {
                name: name.to_owned(),
                email: email.to_owned(),
                ..UserProfile::default()
            },
            password_hash,
            ..Self::default()
        }
    }

    /// The passwordless guest account.
    #[must_use]
    pub fn guest() -> Self {
        Self {
            profile: UserProfile {
                name: GUEST_NAME.to_owned(),
                is_guest: true,
                ..UserProfile::default()
            },
            ..Self::default()
        }
    }

    /// Merge a cart line, summing quantities on a `(shoe_id, size)` match.
    pub fn merge_cart_item(&mut self, item: CartItem) {
        match self
            .cart
            .iter_mut()
            .find(|line| line.matches(&item.shoe_id, item.size))
        {
            Some(line) => line.quantity = line.quantity.saturating_add(item.quantity),
            None => self.cart.push(item),
        }
    }

    /// Count one attendance and remember the event if it is new.
    pub fn record_rsvp(&mut self, event_id: Option<&EventId>) {
        self.profile.attendance_count = self.profile.attendance_count.saturating_add(1);
        if let Some(id) = event_id
            && !self.rsvped_events.contains(id)
        {
            self.rsvped_events.push(id.clone());
        }
    }
}

/// Display and stats data.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub is_guest: bool,
    pub attendance_count: u32,
    #[serde(deserialize_with = "null_as_zero")]
    pub miles_run: f64,
}

/// Partial profile update; `None` leaves a field untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub is_guest: Option<bool>,
    pub attendance_count: Option<u32>,
    pub miles_run: Option<f64>,
}

impl ProfileUpdate {
    /// Returns `true` if no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.is_guest.is_none()
            && self.attendance_count.is_none()
            && self.miles_run.is_none()
    }

    /// Shallow-merge into `profile`.
    pub fn apply_to(self, profile: &mut UserProfile) {
        if let Some(name) = self.name {
            profile.name = name;
        }
        if let Some(email) = self.email {
            profile.email = email;
        }
        if let Some(is_guest) = self.is_guest {
            profile.is_guest = is_guest;
        }
        if let Some(count) = self.attendance_count {
            profile.attendance_count = count;
        }
        if let Some(miles) = self.miles_run {
            profile.miles_run = miles;
        }
    }
}

/// Free-form biomechanical preferences gathered by the shoe finder.
///
/// Doubles as its own partial update: set fields overwrite, unset fields
/// are left alone.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GaitProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terrain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strike: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pronation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_goals: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cushion_pref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foot_shape: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub injury_history: Option<Vec<String>>,
}

impl GaitProfile {
    /// Shallow-merge `update` into `self`.
    pub fn merge(&mut self, update: Self) {
        fn take<T>(slot: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *slot = value;
            }
        }

        take(&mut self.terrain, update.terrain);
        take(&mut self.strike, update.strike);
        take(&mut self.arch, update.arch);
        take(&mut self.pronation, update.pronation);
        take(&mut self.distance_goals, update.distance_goals);
        take(&mut self.cushion_pref, update.cushion_pref);
        take(&mut self.foot_shape, update.foot_shape);
        take(&mut self.injury_history, update.injury_history);
    }
}

/// A tracked pair of shoes in a runner's rotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoeRotationItem {
    /// Unique instance id of this pair.
    pub id: RotationShoeId,
    /// Catalog reference, or a generic id for shoes bought elsewhere.
    pub shoe_id: ShoeId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub miles: f64,
    /// Mileage at which the pair should be replaced.
    #[serde(default, deserialize_with = "null_as_zero")]
    pub threshold: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ShoeRotationItem {
    /// Miles left before the replacement threshold (never negative).
    #[must_use]
    pub fn remaining_miles(&self) -> f64 {
        (self.threshold - self.miles).max(0.0)
    }

    /// Whether the pair has reached its replacement threshold.
    #[must_use]
    pub fn needs_replacement(&self) -> bool {
        self.threshold > 0.0 && self.miles >= self.threshold
    }
}

/// One cart line; `(shoe_id, size)` is the identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub shoe_id: ShoeId,
    pub quantity: u32,
    #[serde(deserialize_with = "null_as_zero")]
    pub size: f64,
}

impl CartItem {
    /// Whether this line has the given identity.
    #[must_use]
    #[allow(clippy::float_cmp)] // sizes are exact half-size values chosen from a list
    pub fn matches(&self, shoe_id: &ShoeId, size: f64) -> bool {
        self.shoe_id == *shoe_id && self.size == size
    }
}

/// Storage footprint and last wipe time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrivacyAudit {
    /// Free-form timestamp text; never parsed.
    pub last_wipe: Option<String>,
    /// Size of the whole document, e.g. `"1.27KB"`.
    pub storage_used: String,
}

impl Default for PrivacyAudit {
    fn default() -> Self {
        Self {
            last_wipe: None,
            storage_used: EMPTY_STORAGE_LABEL.to_owned(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn cart_line(shoe: &str, size: f64, quantity: u32) -> CartItem {
        CartItem {
            shoe_id: ShoeId::new(shoe),
            quantity,
            size,
        }
    }

    #[test]
    fn test_member_defaults() {
        let account = Account::member("Ann", "ann@x.com", PasswordDigest::from_hex("h1"));
        assert_eq!(account.profile.name, "Ann");
        assert!(!account.profile.is_guest);
        assert_eq!(account.profile.attendance_count, 0);
        assert!(account.rotation.is_empty());
        assert_eq!(account.privacy_audit.storage_used, "0KB");
        assert!(account.privacy_audit.last_wipe.is_none());
    }

    #[test]
    fn test_guest_defaults() {
        let guest = Account::guest();
        assert_eq!(guest.profile.name, GUEST_NAME);
        assert!(guest.profile.is_guest);
        assert!(guest.profile.email.is_empty());
        assert!(guest.password_hash.is_empty());
    }

    #[test]
    fn test_merge_cart_item_sums_same_key() {
        let mut account = Account::default();
        account.merge_cart_item(cart_line("hoka-speedgoat-6", 10.5, 1));
        account.merge_cart_item(cart_line("hoka-speedgoat-6", 10.5, 2));
        account.merge_cart_item(cart_line("hoka-speedgoat-6", 11.0, 1));

        assert_eq!(account.cart.len(), 2);
        assert_eq!(account.cart[0].quantity, 3);
        assert_eq!(account.cart[1].quantity, 1);
    }

    #[test]
    fn test_record_rsvp() {
        let mut account = Account::default();
        let event = EventId::new("sole-train");

        account.record_rsvp(None);
        account.record_rsvp(Some(&event));
        account.record_rsvp(Some(&event));

        assert_eq!(account.profile.attendance_count, 3);
        assert_eq!(account.rsvped_events, vec![event]);
    }

    #[test]
    fn test_profile_update_merges_only_set_fields() {
        let mut profile = UserProfile {
            name: "Ann".to_owned(),
            email: "ann@x.com".to_owned(),
            ..UserProfile::default()
        };
        let update = ProfileUpdate {
            miles_run: Some(12.5),
            ..ProfileUpdate::default()
        };
        assert!(!update.is_empty());
        update.apply_to(&mut profile);

        assert_eq!(profile.name, "Ann");
        assert!((profile.miles_run - 12.5).abs() < f64::EPSILON);
        assert!(ProfileUpdate::default().is_empty());
    }

    #[test]
    fn test_gait_merge() {
        let mut gait = GaitProfile {
            terrain: Some("road".to_owned()),
            arch: Some("high".to_owned()),
            ..GaitProfile::default()
        };
        gait.merge(GaitProfile {
            terrain: Some("trail".to_owned()),
            injury_history: Some(vec!["plantar fasciitis".to_owned()]),
            ..GaitProfile::default()
        });

        assert_eq!(gait.terrain.as_deref(), Some("trail"));
        assert_eq!(gait.arch.as_deref(), Some("high"));
        assert_eq!(gait.injury_history.unwrap().len(), 1);
    }

    #[test]
    fn test_rotation_replacement() {
        let mut shoe = ShoeRotationItem {
            id: RotationShoeId::new("r1"),
            shoe_id: ShoeId::new("brooks-ghost-16"),
            name: "Ghost 16".to_owned(),
            nickname: None,
            miles: 280.0,
            threshold: 300.0,
            image: None,
        };
        assert!(!shoe.needs_replacement());
        assert!((shoe.remaining_miles() - 20.0).abs() < f64::EPSILON);

        shoe.miles = 310.0;
        assert!(shoe.needs_replacement());
        assert!(shoe.remaining_miles().abs() < f64::EPSILON);
    }

    #[test]
    fn test_wire_names_match_stored_document() {
        let json = r#"{
            "profile": {"name": "Ann", "email": "ann@x.com", "isGuest": false, "attendanceCount": 2},
            "passwordHash": "h1",
            "gaitProfile": {"cushionPref": "Plush"},
            "rotation": [{"id": "r1", "shoeId": "nb-1080-v13", "name": "1080", "miles": 12, "threshold": 400}],
            "cart": [{"shoeId": "saucony-guide-17", "quantity": 1, "size": 9.5}],
            "rsvpedEvents": ["trail-heads"],
            "privacyAudit": {"lastWipe": null, "storageUsed": "1.02KB"}
        }"#;
        let account: Account = serde_json::from_str(json).unwrap();

        assert_eq!(account.profile.attendance_count, 2);
        // milesRun was optional in older documents
        assert!(account.profile.miles_run.abs() < f64::EPSILON);
        assert_eq!(account.gait_profile.cushion_pref.as_deref(), Some("Plush"));
        assert_eq!(account.rotation[0].shoe_id.as_str(), "nb-1080-v13");
        assert_eq!(account.privacy_audit.storage_used, "1.02KB");

        let value = serde_json::to_value(&account).unwrap();
        assert!(value["gaitProfile"].get("terrain").is_none());
        assert_eq!(value["rotation"][0]["threshold"], 400.0);
    }

    #[test]
    fn test_null_numbers_load_as_zero() {
        let json = r#"{
            "profile": {"name": "Ann", "milesRun": null},
            "rotation": [{"id": "r1", "shoeId": "nb-1080-v13", "name": "1080", "miles": null, "threshold": null}],
            "cart": [{"shoeId": "saucony-guide-17", "quantity": 1, "size": null}]
        }"#;
        let account: Account = serde_json::from_str(json).unwrap();

        assert_eq!(account.profile.name, "Ann");
        assert!(account.profile.miles_run.abs() < f64::EPSILON);
        assert!(account.rotation[0].miles.abs() < f64::EPSILON);
        assert!(account.rotation[0].threshold.abs() < f64::EPSILON);
        assert!(account.cart[0].size.abs() < f64::EPSILON);
    }

    #[test]
    fn test_last_wipe_keeps_any_text() {
        let json = r#"{"privacyAudit": {"lastWipe": "yesterday", "storageUsed": "2.00KB"}}"#;
        let account: Account = serde_json::from_str(json).unwrap();
        assert_eq!(account.privacy_audit.last_wipe.as_deref(), Some("yesterday"));

        let value = serde_json::to_value(&account).unwrap();
        assert_eq!(value["privacyAudit"]["lastWipe"], "yesterday");
    }
}
