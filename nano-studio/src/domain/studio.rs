//! Application facade driving every user-facing flow.
//!
//! `Studio` owns the record store, the session and the services, and is the
//! only place where a change to a user is written to the store and then
//! propagated to the session copy.

use std::sync::Arc;

use mockable::Clock;
use tracing::{debug, info, warn};
use url::Url;

use super::auth::{AuthService, Credentials};
use super::error::{Error, ErrorMessage};
use super::identity::Identity;
use super::image::{GeneratedImage, ImageId};
use super::image_generation::{GenerationModels, ImageGenerationService};
use super::inline_image::InlineImage;
use super::localization::Locale;
use super::ports::{ImageGenerator, KeyValueStore};
use super::quota::{self, FreeAllowance};
use super::record_store::RecordStore;
use super::session::SessionManager;
use super::upgrade;
use super::user::{User, UserId};

/// Driven adapters the studio runs on.
pub struct StudioPorts<S, G> {
    /// Durable slot store shared by records and session.
    pub storage: Arc<S>,
    /// Remote image model.
    pub generator: Arc<G>,
    /// Source of "now" for timestamps and subscription maths.
    pub clock: Arc<dyn Clock>,
}

/// Static settings resolved from configuration.
#[derive(Debug, Clone)]
pub struct StudioOptions {
    /// Password admitting the administrator username.
    pub admin_password: String,
    /// Models for generation and editing.
    pub models: GenerationModels,
    /// WhatsApp number used in upgrade links.
    pub whatsapp_number: String,
    /// Starting display language.
    pub locale: Locale,
}

/// What to generate: a prompt, optionally applied to a source image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationPrompt {
    prompt: String,
    source: Option<InlineImage>,
}

impl GenerationPrompt {
    /// Text-to-image request.
    #[must_use]
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            source: None,
        }
    }

    /// Edit `source` according to `prompt`.
    #[must_use]
    pub fn edit(prompt: impl Into<String>, source: InlineImage) -> Self {
        Self {
            prompt: prompt.into(),
            source: Some(source),
        }
    }

    /// Prompt as typed.
    #[must_use]
    pub fn prompt(&self) -> &str {
        self.prompt.as_str()
    }

    /// Source image for edits.
    #[must_use]
    pub const fn source(&self) -> Option<&InlineImage> {
        self.source.as_ref()
    }
}

/// Snapshot shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    /// Session identity.
    pub identity: Identity,
    /// The identity's images, oldest first.
    pub images: Vec<GeneratedImage>,
    /// Whole days left on the subscription.
    pub remaining_days: u32,
    /// Remaining free generations.
    pub allowance: FreeAllowance,
}

/// Facade over storage, session, auth and image generation.
pub struct Studio<S, G> {
    records: RecordStore<S>,
    session: SessionManager<S>,
    auth: AuthService,
    images: ImageGenerationService<G>,
    clock: Arc<dyn Clock>,
    whatsapp_number: String,
    locale: Locale,
}

impl<S, G> Studio<S, G>
where
    S: KeyValueStore,
    G: ImageGenerator,
{
    /// Load persisted records and restore the session.
    pub fn open(ports: StudioPorts<S, G>, options: StudioOptions) -> Result<Self, Error> {
        let StudioPorts {
            storage,
            generator,
            clock,
        } = ports;
        let records = RecordStore::load(Arc::clone(&storage))?;
        let session = SessionManager::restore(storage)?;
        Ok(Self {
            records,
            session,
            auth: AuthService::new(options.admin_password),
            images: ImageGenerationService::new(generator, options.models),
            clock,
            whatsapp_number: options.whatsapp_number,
            locale: options.locale,
        })
    }

    /// Current display language.
    #[must_use]
    pub const fn locale(&self) -> Locale {
        self.locale
    }

    /// Switch the display language.
    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
    }

    /// Flip between English and Arabic, returning the new language.
    pub fn toggle_locale(&mut self) -> Locale {
        self.locale = self.locale.toggled();
        self.locale
    }

    /// Logged-in identity, if any.
    #[must_use]
    pub fn current_identity(&self) -> Option<&Identity> {
        self.session.current()
    }

    /// Read access to the stored collections.
    #[must_use]
    pub const fn records(&self) -> &RecordStore<S> {
        &self.records
    }

    /// Create an account and log it in.
    pub fn register(&mut self, credentials: &Credentials) -> Result<User, Error> {
        let user = self.auth.register(self.records.users(), credentials)?;
        self.records.insert_user(user.clone())?;
        if let Err(err) = self.session.set(Identity::Regular(user.clone())) {
            self.undo_registration(user.id());
            return Err(err);
        }
        Ok(user)
    }

    /// Authenticate and open a session.
    pub fn login(&mut self, credentials: &Credentials) -> Result<Identity, Error> {
        let identity = self.auth.login(self.records.users(), credentials)?;
        self.session.set(identity.clone())?;
        Ok(identity)
    }

    /// Close the session.
    pub fn logout(&mut self) -> Result<(), Error> {
        self.session.clear()?;
        info!("logged out");
        Ok(())
    }

    /// Generate or edit an image for the session user.
    ///
    /// The quota is checked before the remote call. On success the user's
    /// counter is bumped in the store, then the image is recorded, then the
    /// session copy is refreshed. An image is never stored without its
    /// counter bump.
    pub async fn generate(&mut self, request: GenerationPrompt) -> Result<GeneratedImage, Error> {
        let identity = self.require_identity()?.clone();
        if request.prompt().trim().is_empty() {
            return Err(Error::validation(ErrorMessage::EmptyPrompt));
        }

        let user = self
            .records
            .find_user_by_id(identity.user().id())
            .unwrap_or_else(|| identity.user())
            .clone();
        quota::ensure_can_generate(&user)?;

        let inline = match request.source() {
            Some(source) => self.images.edit(source, request.prompt()).await?,
            None => self.images.generate(request.prompt()).await?,
        };

        let image = GeneratedImage::new(
            user.id().clone(),
            inline.to_data_uri(),
            request.prompt(),
            self.clock.utc(),
        );
        let mut updated = user.clone();
        updated.record_generation();
        self.records.replace_user(updated.clone())?;
        if let Err(err) = self.records.insert_image(image.clone()) {
            self.restore_user(user);
            return Err(err);
        }
        self.session.refresh(&updated)?;
        info!(
            user_id = %updated.id(),
            image_id = %image.id(),
            images_generated = updated.images_generated(),
            "image generated"
        );
        Ok(image)
    }

    /// Session identity with its history and allowances.
    pub fn dashboard(&self) -> Result<Dashboard, Error> {
        let identity = self.require_identity()?.clone();
        let user = identity.user();
        let images = self.records.images_for_user(user.id()).cloned().collect();
        Ok(Dashboard {
            remaining_days: quota::remaining_days(user, self.clock.utc()),
            allowance: quota::remaining_free_images(user),
            images,
            identity,
        })
    }

    /// One of the session user's images.
    pub fn find_image(&self, image_id: &ImageId) -> Result<&GeneratedImage, Error> {
        let identity = self.require_identity()?;
        self.records
            .images_for_user(identity.user().id())
            .find(|image| image.id() == image_id)
            .ok_or_else(|| Error::not_found(ErrorMessage::ImageNotFound))
    }

    /// Every stored user; administrator only.
    pub fn list_users(&self) -> Result<&[User], Error> {
        self.require_administrator()?;
        Ok(self.records.users())
    }

    /// Add a subscription period to `user_id`; administrator only.
    pub fn extend_subscription(&mut self, user_id: &UserId) -> Result<User, Error> {
        self.require_administrator()?;
        let user = self
            .records
            .find_user_by_id(user_id)
            .ok_or_else(|| Error::not_found(ErrorMessage::UserNotFound))?;
        let extended = quota::extend_subscription(user, self.clock.utc());
        self.records.replace_user(extended.clone())?;
        self.session.refresh(&extended)?;
        info!(
            user_id = %extended.id(),
            expiry = ?extended.subscription_expiry(),
            "subscription extended"
        );
        Ok(extended)
    }

    /// WhatsApp link for requesting a premium upgrade.
    pub fn upgrade_link(&self) -> Result<Url, Error> {
        upgrade::upgrade_link(&self.whatsapp_number)
    }

    fn undo_registration(&mut self, user_id: &UserId) {
        if let Err(err) = self.records.remove_user(user_id) {
            warn!(%user_id, error = %err, "failed to undo registration");
        }
    }

    fn restore_user(&mut self, previous: User) {
        let user_id = previous.id().clone();
        if let Err(err) = self.records.replace_user(previous) {
            warn!(%user_id, error = %err, "failed to restore user after storage error");
        }
    }

    fn require_identity(&self) -> Result<&Identity, Error> {
        self.session.current().ok_or_else(Error::unauthenticated)
    }

    fn require_administrator(&self) -> Result<&Identity, Error> {
        let identity = self.require_identity()?;
        if identity.is_administrator() {
            Ok(identity)
        } else {
            debug!(user_id = %identity.user().id(), "administrator action refused");
            Err(Error::forbidden())
        }
    }
}

#[cfg(test)]
mod tests {
    //! Facade behaviour over mocked ports.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::identity::ADMIN_USERNAME;
    use crate::domain::ports::{
        Candidate, GenerationResponse, MockImageGenerator, MockKeyValueStore, ResponsePart,
    };
    use chrono::{DateTime, TimeDelta, TimeZone, Utc};
    use mockable::MockClock;
    use rstest::{fixture, rstest};

    const ADMIN_PASSWORD: &str = "banana-pro";

    #[fixture]
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0)
            .single()
            .expect("valid date")
    }

    fn storage() -> MockKeyValueStore {
        let mut storage = MockKeyValueStore::new();
        storage.expect_get().returning(|_| Ok(None));
        storage.expect_set().returning(|_, _| Ok(()));
        storage.expect_remove().returning(|_| Ok(()));
        storage
    }

    fn clock(now: DateTime<Utc>) -> Arc<dyn Clock> {
        let mut clock = MockClock::new();
        clock.expect_utc().returning(move || now);
        Arc::new(clock)
    }

    fn image_answer() -> GenerationResponse {
        let image = InlineImage::from_base64("image/png", "YmFuYW5h").expect("valid mime");
        GenerationResponse {
            candidates: vec![Candidate {
                parts: vec![ResponsePart::InlineImage(image)],
            }],
        }
    }

    fn studio(
        generator: MockImageGenerator,
        now: DateTime<Utc>,
    ) -> Studio<MockKeyValueStore, MockImageGenerator> {
        Studio::open(
            StudioPorts {
                storage: Arc::new(storage()),
                generator: Arc::new(generator),
                clock: clock(now),
            },
            StudioOptions {
                admin_password: ADMIN_PASSWORD.to_owned(),
                models: GenerationModels::default(),
                whatsapp_number: "+15550100".to_owned(),
                locale: Locale::English,
            },
        )
        .expect("open studio")
    }

    fn never_called() -> MockImageGenerator {
        let mut generator = MockImageGenerator::new();
        generator.expect_generate_content().never();
        generator
    }

    #[rstest]
    fn register_opens_session(now: DateTime<Utc>) {
        let mut studio = studio(never_called(), now);
        let user = studio
            .register(&Credentials::new("ana", "1234"))
            .expect("register");
        assert_eq!(studio.current_identity(), Some(&Identity::Regular(user)));
        assert_eq!(studio.records().users().len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn generate_requires_session(now: DateTime<Utc>) {
        let mut studio = studio(never_called(), now);
        let err = studio
            .generate(GenerationPrompt::text("a banana"))
            .await
            .expect_err("logged out");
        assert_eq!(err.code(), ErrorCode::Unauthenticated);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[tokio::test]
    async fn blank_prompt_is_rejected_before_remote_call(
        now: DateTime<Utc>,
        #[case] prompt: &str,
    ) {
        let mut studio = studio(never_called(), now);
        studio
            .register(&Credentials::new("ana", "1234"))
            .expect("register");
        let err = studio
            .generate(GenerationPrompt::text(prompt))
            .await
            .expect_err("blank prompt");
        assert_eq!(err.message(), &ErrorMessage::EmptyPrompt);
    }

    #[rstest]
    #[tokio::test]
    async fn generation_records_image_and_bumps_both_copies(now: DateTime<Utc>) {
        let mut generator = MockImageGenerator::new();
        generator
            .expect_generate_content()
            .times(1)
            .returning(|_| Ok(image_answer()));
        let mut studio = studio(generator, now);
        let user = studio
            .register(&Credentials::new("ana", "1234"))
            .expect("register");

        let image = studio
            .generate(GenerationPrompt::text("  a banana  "))
            .await
            .expect("generate");

        assert_eq!(image.prompt(), "  a banana  ");
        assert_eq!(image.timestamp(), now);
        assert_eq!(image.url(), "data:image/png;base64,YmFuYW5h");
        assert_eq!(
            studio.records().find_user_by_id(user.id()).map(User::images_generated),
            Some(1)
        );
        assert_eq!(
            studio
                .current_identity()
                .map(|identity| identity.user().images_generated()),
            Some(1)
        );
    }

    #[rstest]
    #[tokio::test]
    async fn administrator_generates_without_a_stored_record(now: DateTime<Utc>) {
        let mut generator = MockImageGenerator::new();
        generator
            .expect_generate_content()
            .returning(|_| Ok(image_answer()));
        let mut studio = studio(generator, now);
        studio
            .login(&Credentials::new(ADMIN_USERNAME, ADMIN_PASSWORD))
            .expect("admin login");

        studio
            .generate(GenerationPrompt::text("a banana"))
            .await
            .expect("generate");

        assert!(studio.records().users().is_empty());
        let dashboard = studio.dashboard().expect("dashboard");
        assert_eq!(dashboard.images.len(), 1);
        assert_eq!(dashboard.identity.user().images_generated(), 1);
        assert_eq!(dashboard.allowance, FreeAllowance::Unlimited);
    }

    #[rstest]
    fn admin_operations_are_forbidden_for_regular_users(now: DateTime<Utc>) {
        let mut studio = studio(never_called(), now);
        let user = studio
            .register(&Credentials::new("ana", "1234"))
            .expect("register");

        assert_eq!(
            studio.list_users().expect_err("forbidden").code(),
            ErrorCode::Forbidden
        );
        assert_eq!(
            studio
                .extend_subscription(user.id())
                .expect_err("forbidden")
                .code(),
            ErrorCode::Forbidden
        );
    }

    #[rstest]
    fn extension_of_unknown_user_is_not_found(now: DateTime<Utc>) {
        let mut studio = studio(never_called(), now);
        studio
            .login(&Credentials::new(ADMIN_USERNAME, ADMIN_PASSWORD))
            .expect("admin login");
        let err = studio
            .extend_subscription(&UserId::new("ghost").expect("id"))
            .expect_err("unknown user");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    fn extension_is_reflected_on_the_dashboard(now: DateTime<Utc>) {
        let mut studio = studio(never_called(), now);
        let user = studio
            .register(&Credentials::new("ana", "1234"))
            .expect("register");
        studio
            .login(&Credentials::new(ADMIN_USERNAME, ADMIN_PASSWORD))
            .expect("admin login");
        let extended = studio.extend_subscription(user.id()).expect("extend");
        assert_eq!(
            extended.subscription_expiry(),
            Some(now + TimeDelta::days(30))
        );

        studio
            .login(&Credentials::new("ana", "1234"))
            .expect("login");
        let dashboard = studio.dashboard().expect("dashboard");
        assert_eq!(dashboard.remaining_days, 30);
        assert_eq!(dashboard.allowance, FreeAllowance::Unlimited);
    }

    #[rstest]
    fn locale_toggles_between_languages(now: DateTime<Utc>) {
        let mut studio = studio(never_called(), now);
        assert_eq!(studio.toggle_locale(), Locale::Arabic);
        assert_eq!(studio.toggle_locale(), Locale::English);
    }

    #[rstest]
    fn missing_image_is_not_found(now: DateTime<Utc>) {
        let mut studio = studio(never_called(), now);
        studio
            .register(&Credentials::new("ana", "1234"))
            .expect("register");
        let err = studio
            .find_image(&ImageId::new("nope"))
            .expect_err("no such image");
        assert_eq!(err.message(), &ErrorMessage::ImageNotFound);
    }
}
