use crate::api::UserApi;
use crate::models::{Listing, User};
use tracing::warn;
use url::form_urlencoded;

/// Whether the "Contact landlord" action is offered to `viewer`
pub fn can_contact(listing: &Listing, viewer: Option<&User>) -> bool {
    viewer.is_some_and(|user| !listing.is_owned_by(&user.id))
}

/// Message to a listing's owner, sent through the visitor's mail client
#[derive(Debug, Clone)]
pub struct ContactForm {
    listing_name: String,
    landlord: Option<User>,
    message: String,
}

impl ContactForm {
    /// Look up the owner of `listing`; if that fails the form has no landlord
    /// and no link can be built.
    pub async fn load(api: &dyn UserApi, listing: &Listing) -> Self {
        let landlord = match api.get_user(&listing.user_ref).await {
            Ok(user) => Some(user),
            Err(err) => {
                warn!("Could not load owner {} of {}: {}", listing.user_ref, listing.id, err);
                None
            }
        };
        Self {
            listing_name: listing.fields.name.clone(),
            landlord,
            message: String::new(),
        }
    }

    pub fn landlord(&self) -> Option<&User> {
        self.landlord.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    /// `mailto:` link with the subject and body filled in
    pub fn mailto_link(&self) -> Option<String> {
        let landlord = self.landlord.as_ref()?;
        let subject = encode_component(&format!("Regarding {}", self.listing_name));
        let body = encode_component(&self.message);
        Some(format!("mailto:{}?subject={}&body={}", landlord.email, subject, body))
    }
}

/// Percent-encode for a mailto header; mail clients do not read `+` as a space
fn encode_component(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
