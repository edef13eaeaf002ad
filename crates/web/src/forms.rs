//! HTML form binding and validation.
//!
//! Every form deserializes from `application/x-www-form-urlencoded` with all
//! fields defaulting to empty strings, so a missing field is reported as a
//! validation error on the re-rendered page rather than a 422 from the
//! extractor.

use serde::Deserialize;
use url::Url;

use grocery_core::{ItemCategory, Price, StoreId, Username};

use crate::models::{Item, ItemInput, Store, StoreInput};
use crate::services::auth;

const REQUIRED: &str = "This field is required.";
const INVALID_CHOICE: &str = "Not a valid choice.";
const INVALID_URL: &str = "Invalid URL.";
const HTTPS_REQUIRED: &str = "Photo URL must start with https://.";

// =============================================================================
// Errors
// =============================================================================

/// Validation messages keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(Vec<(&'static str, String)>);

impl FormErrors {
    /// Record an error for `field`. Only the first error per field is kept.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        if self.get(field).is_none() {
            self.0.push((field, message.into()));
        }
    }

    /// The error message for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, message)| message.as_str())
    }

    /// Whether no errors were recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields with errors.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() { Ok(value()) } else { Err(self) }
    }
}

/// An `<option>` in a `<select>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Trim `value` and check its length (in characters) is within `min..=max`.
fn required_text(
    errors: &mut FormErrors,
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> String {
    let value = value.trim();
    let len = value.chars().count();
    if len == 0 {
        errors.add(field, REQUIRED);
    } else if len < min || len > max {
        errors.add(
            field,
            format!("Field must be between {min} and {max} characters long."),
        );
    }
    value.to_owned()
}

// =============================================================================
// Store Form
// =============================================================================

/// Create/edit store form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoreForm {
    pub title: String,
    pub address: String,
}

impl StoreForm {
    pub const TITLE_MAX: usize = 80;
    pub const ADDRESS_MAX: usize = 200;

    /// Pre-fill the form from an existing store.
    #[must_use]
    pub fn from_store(store: &Store) -> Self {
        Self {
            title: store.title.clone(),
            address: store.address.clone(),
        }
    }

    /// Validate into the fields the repository writes.
    ///
    /// # Errors
    ///
    /// Returns the per-field messages when any field is invalid.
    pub fn validate(&self) -> Result<StoreInput, FormErrors> {
        let mut errors = FormErrors::default();
        let title = required_text(&mut errors, "title", &self.title, 3, Self::TITLE_MAX);
        let address = required_text(&mut errors, "address", &self.address, 3, Self::ADDRESS_MAX);

        errors.into_result(|| StoreInput { title, address })
    }
}

// =============================================================================
// Item Form
// =============================================================================

/// Create/edit item form.
///
/// `store` carries the selected store ID as submitted by the `<select>`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ItemForm {
    pub name: String,
    pub price: String,
    pub category: String,
    pub photo_url: String,
    pub store: String,
}

impl ItemForm {
    pub const NAME_MAX: usize = 80;

    /// Pre-fill the form from an existing item.
    #[must_use]
    pub fn from_item(item: &Item) -> Self {
        Self {
            name: item.name.clone(),
            price: item.price.amount().to_string(),
            category: item.category.as_str().to_owned(),
            photo_url: item.photo_url.clone().unwrap_or_default(),
            store: item.store_id.to_string(),
        }
    }

    /// Validate into the fields the repository writes.
    ///
    /// `store_choices` are the stores that may be selected; any other store
    /// ID is rejected.
    ///
    /// # Errors
    ///
    /// Returns the per-field messages when any field is invalid.
    pub fn validate(&self, store_choices: &[StoreId]) -> Result<ItemInput, FormErrors> {
        let mut errors = FormErrors::default();

        let name = required_text(&mut errors, "name", &self.name, 3, Self::NAME_MAX);

        let price = match Price::parse(&self.price) {
            Ok(price) => price,
            Err(e) => {
                errors.add("price", capitalize(&e.to_string()));
                Price::ZERO
            }
        };

        let category = if self.category.trim().is_empty() {
            ItemCategory::default()
        } else if let Ok(category) = self.category.parse::<ItemCategory>() {
            category
        } else {
            errors.add("category", INVALID_CHOICE);
            ItemCategory::default()
        };

        let photo_url = match validate_photo_url(&self.photo_url) {
            Ok(url) => url,
            Err(message) => {
                errors.add("photo_url", message);
                None
            }
        };

        let store_id = if self.store.trim().is_empty() {
            errors.add("store", REQUIRED);
            StoreId::new(0)
        } else {
            match self.store.parse::<StoreId>() {
                Ok(id) if store_choices.contains(&id) => id,
                _ => {
                    errors.add("store", INVALID_CHOICE);
                    StoreId::new(0)
                }
            }
        };

        errors.into_result(|| ItemInput {
            name,
            price,
            category,
            photo_url,
            store_id,
        })
    }

    /// Options for the category `<select>`, with the current value selected.
    #[must_use]
    pub fn category_options(&self) -> Vec<SelectOption> {
        let current = self.category.parse::<ItemCategory>().unwrap_or_default();
        ItemCategory::ALL
            .iter()
            .map(|c| SelectOption {
                value: c.as_str().to_owned(),
                label: c.label().to_owned(),
                selected: *c == current,
            })
            .collect()
    }

    /// Options for the store `<select>`, with the current value selected.
    #[must_use]
    pub fn store_options(&self, stores: &[Store]) -> Vec<SelectOption> {
        let current = self.store.parse::<StoreId>().ok();
        stores
            .iter()
            .map(|s| SelectOption {
                value: s.id.to_string(),
                label: s.title.clone(),
                selected: Some(s.id) == current,
            })
            .collect()
    }
}

/// An empty photo URL means "no photo"; anything else must be an absolute
/// https URL with a host. The page CSP only loads https images.
fn validate_photo_url(value: &str) -> Result<Option<String>, &'static str> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }

    let url = Url::parse(value).map_err(|_| INVALID_URL)?;
    if url.host_str().is_none() {
        return Err(INVALID_URL);
    }
    match url.scheme() {
        "https" => Ok(Some(value.to_owned())),
        "http" => Err(HTTPS_REQUIRED),
        _ => Err(INVALID_URL),
    }
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    chars.next().map_or_else(String::new, |first| {
        format!("{}{}.", first.to_uppercase(), chars.as_str())
    })
}

// =============================================================================
// Auth Forms
// =============================================================================

/// Sign-up form data.
#[derive(Default, Deserialize)]
#[serde(default)]
pub struct SignupForm {
    pub username: String,
    pub password: String,
    pub password_confirm: String,
}

impl SignupForm {
    /// Validate field formats. Uniqueness is checked on insert.
    ///
    /// # Errors
    ///
    /// Returns the per-field messages when any field is invalid.
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::default();

        if let Err(e) = Username::parse(&self.username) {
            errors.add("username", capitalize(&e.to_string()));
        }
        if self.password.is_empty() {
            errors.add("password", REQUIRED);
        } else if auth::validate_password(&self.password).is_err() {
            errors.add(
                "password",
                format!(
                    "Password must be at least {} characters.",
                    auth::MIN_PASSWORD_LENGTH
                ),
            );
        }
        if auth::confirm_password(&self.password, &self.password_confirm).is_err() {
            errors.add("password_confirm", "Passwords must match.");
        }

        errors.into_result(|| ())
    }
}

/// Login form data.
#[derive(Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    /// Both fields are required; correctness is checked by `AuthService`.
    ///
    /// # Errors
    ///
    /// Returns the per-field messages when a field is empty.
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::default();
        if self.username.trim().is_empty() {
            errors.add("username", REQUIRED);
        }
        if self.password.is_empty() {
            errors.add("password", REQUIRED);
        }
        errors.into_result(|| ())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use grocery_core::UserId;

    use super::*;

    fn store(id: i32, title: &str) -> Store {
        Store {
            id: StoreId::new(id),
            title: title.to_string(),
            address: "1 Main St".to_string(),
            created_by_id: Some(UserId::new(1)),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn item_form() -> ItemForm {
        ItemForm {
            name: "Sourdough".to_string(),
            price: "4.5".to_string(),
            category: "bakery".to_string(),
            photo_url: "https://example.com/bread.jpg".to_string(),
            store: "2".to_string(),
        }
    }

    #[test]
    fn test_store_form_valid_trims() {
        let form = StoreForm {
            title: "  Trader Joe's ".to_string(),
            address: "555 Market St".to_string(),
        };
        let input = form.validate().unwrap();
        assert_eq!(input.title, "Trader Joe's");
        assert_eq!(input.address, "555 Market St");
    }

    #[test]
    fn test_store_form_required_and_length() {
        let form = StoreForm {
            title: String::new(),
            address: "ab".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("title"), Some(REQUIRED));
        assert_eq!(
            errors.get("address"),
            Some("Field must be between 3 and 200 characters long.")
        );
    }

    #[test]
    fn test_store_form_title_too_long() {
        let form = StoreForm {
            title: "x".repeat(81),
            address: "555 Market St".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.get("title").is_some());
    }

    #[test]
    fn test_item_form_valid() {
        let input = item_form()
            .validate(&[StoreId::new(1), StoreId::new(2)])
            .unwrap();
        assert_eq!(input.name, "Sourdough");
        assert_eq!(input.price.to_string(), "$4.50");
        assert_eq!(input.category, ItemCategory::Bakery);
        assert_eq!(
            input.photo_url.as_deref(),
            Some("https://example.com/bread.jpg")
        );
        assert_eq!(input.store_id, StoreId::new(2));
    }

    #[test]
    fn test_item_form_defaults() {
        let form = ItemForm {
            category: String::new(),
            photo_url: "   ".to_string(),
            ..item_form()
        };
        let input = form.validate(&[StoreId::new(2)]).unwrap();
        assert_eq!(input.category, ItemCategory::Other);
        assert_eq!(input.photo_url, None);
    }

    #[test]
    fn test_item_form_rejects_unknown_store() {
        let errors = item_form().validate(&[StoreId::new(1)]).unwrap_err();
        assert_eq!(errors.get("store"), Some(INVALID_CHOICE));
    }

    #[test]
    fn test_item_form_requires_store() {
        let form = ItemForm {
            store: String::new(),
            ..item_form()
        };
        let errors = form.validate(&[StoreId::new(2)]).unwrap_err();
        assert_eq!(errors.get("store"), Some(REQUIRED));
    }

    #[test]
    fn test_item_form_field_errors() {
        let form = ItemForm {
            name: "ab".to_string(),
            price: "-3".to_string(),
            category: "snacks".to_string(),
            photo_url: "javascript:alert(1)".to_string(),
            store: "two".to_string(),
        };
        let errors = form.validate(&[StoreId::new(2)]).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert_eq!(errors.get("price"), Some("Price cannot be negative."));
        assert_eq!(errors.get("category"), Some(INVALID_CHOICE));
        assert_eq!(errors.get("photo_url"), Some(INVALID_URL));
    }

    #[test]
    fn test_item_form_keeps_photo_url_as_entered() {
        let form = ItemForm {
            photo_url: " https://Example.com ".to_string(),
            ..item_form()
        };
        let input = form.validate(&[StoreId::new(2)]).unwrap();
        assert_eq!(input.photo_url.as_deref(), Some("https://Example.com"));
    }

    #[test]
    fn test_item_form_rejects_plain_http_photo_url() {
        let form = ItemForm {
            photo_url: "http://example.com/bread.jpg".to_string(),
            ..item_form()
        };
        let errors = form.validate(&[StoreId::new(2)]).unwrap_err();
        assert_eq!(errors.get("photo_url"), Some(HTTPS_REQUIRED));
    }

    #[test]
    fn test_item_form_from_item_round_trips() {
        let item = Item {
            id: grocery_core::ItemId::new(9),
            name: "Milk".to_string(),
            price: Price::parse("3.49").unwrap(),
            category: ItemCategory::Deli,
            photo_url: None,
            store_id: StoreId::new(4),
            store_title: "Corner Market".to_string(),
            created_by_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let form = ItemForm::from_item(&item);
        assert_eq!(form.price, "3.49");
        let input = form.validate(&[StoreId::new(4)]).unwrap();
        assert_eq!(input.price, item.price);
        assert_eq!(input.category, ItemCategory::Deli);
    }

    #[test]
    fn test_select_options_mark_current_value() {
        let form = item_form();

        let categories = form.category_options();
        assert_eq!(categories.len(), ItemCategory::ALL.len());
        let selected: Vec<_> = categories.iter().filter(|o| o.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].label, "Bakery");

        let stores = form.store_options(&[store(1, "Safeway"), store(2, "Whole Foods")]);
        assert!(!stores[0].selected);
        assert!(stores[1].selected);
        assert_eq!(stores[1].value, "2");
    }

    #[test]
    fn test_signup_form() {
        let form = SignupForm {
            username: "shopper".to_string(),
            password: "longenough".to_string(),
            password_confirm: "longenough".to_string(),
        };
        assert!(form.validate().is_ok());

        let form = SignupForm {
            username: "a b".to_string(),
            password: "short".to_string(),
            password_confirm: "different".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("username"), Some("Username cannot contain spaces."));
        assert_eq!(
            errors.get("password"),
            Some("Password must be at least 8 characters.")
        );
        assert_eq!(errors.get("password_confirm"), Some("Passwords must match."));
    }

    #[test]
    fn test_login_form_requires_fields() {
        let errors = LoginForm::default().validate().unwrap_err();
        assert_eq!(errors.get("username"), Some(REQUIRED));
        assert_eq!(errors.get("password"), Some(REQUIRED));
    }

    #[test]
    fn test_form_errors_keep_first_message() {
        let mut errors = FormErrors::default();
        errors.add("title", "first");
        errors.add("title", "second");
        assert_eq!(errors.get("title"), Some("first"));
        assert_eq!(errors.len(), 1);
    }
}
