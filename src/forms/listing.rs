use crate::api::ListingApi;
use crate::error::{FormError, UploadError, ValidationError};
use crate::models::{ListingDraft, ListingType};
use crate::routes::Route;
use crate::session::SessionStore;
use crate::storage::{UploadBatcher, UploadFile, MAX_IMAGES};
use tracing::{info, warn};

const NAME_LENGTH: (usize, usize) = (10, 62);
const ROOMS: (u32, u32) = (1, 10);
const REGULAR_PRICE: (f64, f64) = (50.0, 10_000_000.0);
const DISCOUNT_PRICE: (f64, f64) = (0.0, 10_000_000.0);

/// Create a new listing, or update an existing one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Update { listing_id: String },
}

/// A single field change
#[derive(Debug, Clone, PartialEq)]
pub enum ListingEdit {
    Name(String),
    Description(String),
    Address(String),
    Type(ListingType),
    Bedrooms(u32),
    Bathrooms(u32),
    RegularPrice(f64),
    DiscountPrice(f64),
    Offer(bool),
    Parking(bool),
    Furnished(bool),
}

/// Draft of a listing being created or edited, with the form's status flags
#[derive(Debug, Clone)]
pub struct ListingForm {
    mode: FormMode,
    draft: ListingDraft,
    uploading: bool,
    upload_error: Option<String>,
    loading: bool,
    error: Option<String>,
}

impl ListingForm {
    pub fn create() -> Self {
        Self::with_draft(FormMode::Create, ListingDraft::default())
    }

    fn with_draft(mode: FormMode, draft: ListingDraft) -> Self {
        Self {
            mode,
            draft,
            uploading: false,
            upload_error: None,
            loading: false,
            error: None,
        }
    }

    /// Open the update form, prefilled from the stored listing.
    ///
    /// If the listing cannot be loaded the form keeps a blank draft; the
    /// failure is only logged.
    pub async fn load_for_update(api: &dyn ListingApi, listing_id: &str) -> Self {
        let mode = FormMode::Update {
            listing_id: listing_id.to_string(),
        };
        match api.get_listing(listing_id).await {
            Ok(listing) => Self::with_draft(mode, listing.into_draft()),
            Err(err) => {
                warn!("Could not prefill listing {}: {}", listing_id, err);
                Self::with_draft(mode, ListingDraft::default())
            }
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn draft(&self) -> &ListingDraft {
        &self.draft
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub fn upload_error(&self) -> Option<&str> {
        self.upload_error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn apply(&mut self, edit: ListingEdit) {
        let draft = &mut self.draft;
        match edit {
            ListingEdit::Name(name) => draft.name = name,
            ListingEdit::Description(description) => draft.description = description,
            ListingEdit::Address(address) => draft.address = address,
            ListingEdit::Type(listing_type) => draft.listing_type = listing_type,
            ListingEdit::Bedrooms(bedrooms) => draft.bedrooms = bedrooms,
            ListingEdit::Bathrooms(bathrooms) => draft.bathrooms = bathrooms,
            ListingEdit::RegularPrice(price) => draft.regular_price = price,
            ListingEdit::DiscountPrice(price) => draft.discount_price = price,
            ListingEdit::Offer(offer) => draft.offer = offer,
            ListingEdit::Parking(parking) => draft.parking = parking,
            ListingEdit::Furnished(furnished) => draft.furnished = furnished,
        }
    }

    /// Swap in a whole draft, e.g. one read from a file
    pub fn replace_draft(&mut self, draft: ListingDraft) {
        self.draft = draft;
    }

    /// Detach the image at `index`; later images move up, so index 0 stays the cover
    pub fn remove_image(&mut self, index: usize) -> Option<String> {
        (index < self.draft.image_urls.len()).then(|| self.draft.image_urls.remove(index))
    }

    /// Upload `files` and append their URLs to the draft.
    ///
    /// On any failure the draft's images are left untouched and the message is
    /// kept in [`ListingForm::upload_error`].
    pub async fn attach_images(
        &mut self,
        batcher: &UploadBatcher<'_>,
        files: &[UploadFile],
    ) -> Result<(), UploadError> {
        self.uploading = true;
        self.upload_error = None;

        let result = batcher.upload(files, &self.draft.image_urls).await;
        self.uploading = false;

        match result {
            Ok(urls) => {
                self.draft.image_urls.extend(urls);
                Ok(())
            }
            Err(err) => {
                self.upload_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_draft(&self.draft)
    }

    /// Validate, then send the draft with the signed-in user as owner.
    ///
    /// Returns the detail page of the saved listing.
    pub async fn submit(
        &mut self,
        api: &dyn ListingApi,
        session: &SessionStore,
    ) -> Result<Route, FormError> {
        if let Err(err) = self.validate() {
            self.error = Some(err.to_string());
            return Err(err.into());
        }
        let Some(owner_id) = session.current_user_id() else {
            let err = FormError::NotSignedIn;
            self.error = Some(err.to_string());
            return Err(err);
        };

        self.loading = true;
        self.error = None;
        let result = match &self.mode {
            FormMode::Create => api.create_listing(&self.draft, &owner_id).await,
            FormMode::Update { listing_id } => {
                api.update_listing(listing_id, &self.draft, &owner_id)
                    .await
            }
        };
        self.loading = false;

        match result {
            Ok(listing) => {
                info!("Saved listing {} ({})", listing.id, listing.fields.name);
                Ok(Route::Listing(listing.id))
            }
            Err(err) => {
                self.error = Some(err.to_string());
                Err(err.into())
            }
        }
    }
}

/// Client-side checks, first failure wins
pub fn validate_draft(draft: &ListingDraft) -> Result<(), ValidationError> {
    if draft.image_urls.is_empty() {
        return Err(ValidationError::MissingImage);
    }
    if draft.discount_price > draft.regular_price {
        return Err(ValidationError::DiscountAboveRegular);
    }
    if draft.image_urls.len() > MAX_IMAGES {
        return Err(ValidationError::TooManyImages { limit: MAX_IMAGES });
    }

    for (field, value) in [
        ("Name", &draft.name),
        ("Description", &draft.description),
        ("Address", &draft.address),
    ] {
        if value.trim().is_empty() {
            return Err(ValidationError::Required(field));
        }
    }

    let name_length = draft.name.chars().count();
    if name_length < NAME_LENGTH.0 || name_length > NAME_LENGTH.1 {
        return Err(ValidationError::NameLength {
            min: NAME_LENGTH.0,
            max: NAME_LENGTH.1,
        });
    }

    check_range("Bedrooms", f64::from(draft.bedrooms), (f64::from(ROOMS.0), f64::from(ROOMS.1)))?;
    check_range("Bathrooms", f64::from(draft.bathrooms), (f64::from(ROOMS.0), f64::from(ROOMS.1)))?;
    check_range("Regular price", draft.regular_price, REGULAR_PRICE)?;
    check_range("Discount price", draft.discount_price, DISCOUNT_PRICE)?;

    Ok(())
}

fn check_range(field: &'static str, value: f64, (min, max): (f64, f64)) -> Result<(), ValidationError> {
    if value.is_nan() || value < min || value > max {
        return Err(ValidationError::OutOfRange { field, min, max });
    }
    Ok(())
}
