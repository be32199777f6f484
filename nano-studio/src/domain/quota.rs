//! Free-tier quota and subscription policy.
//!
//! Everything here is a pure function of a [`User`] and, where time matters,
//! an explicit `now`. Callers read `now` from their clock.

use chrono::{DateTime, TimeDelta, Utc};

use super::error::Error;
use super::user::User;

/// Generations allowed before premium status is required.
pub const FREE_IMAGE_LIMIT: u32 = 5;

/// Length of one subscription extension, in days.
pub const SUBSCRIPTION_EXTENSION_DAYS: i64 = 30;

const MILLIS_PER_DAY: u64 = 24 * 60 * 60 * 1000;

/// How many more images a user may generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreeAllowance {
    /// Premium accounts are not metered.
    Unlimited,
    /// Free accounts have this many generations left.
    Remaining(u32),
}

/// Whether `user` may start another generation.
#[must_use]
pub fn can_generate(user: &User) -> bool {
    user.is_premium() || user.images_generated() < FREE_IMAGE_LIMIT
}

/// Fail with [`DomainError::quota_exceeded`] once the free allowance is used up.
///
/// [`DomainError::quota_exceeded`]: super::error::DomainError::quota_exceeded
pub fn ensure_can_generate(user: &User) -> Result<(), Error> {
    if can_generate(user) {
        Ok(())
    } else {
        Err(Error::quota_exceeded(FREE_IMAGE_LIMIT))
    }
}

/// Remaining free generations, or unlimited for premium accounts.
#[must_use]
pub fn remaining_free_images(user: &User) -> FreeAllowance {
    if user.is_premium() {
        FreeAllowance::Unlimited
    } else {
        FreeAllowance::Remaining(FREE_IMAGE_LIMIT.saturating_sub(user.images_generated()))
    }
}

/// Extend the subscription by [`SUBSCRIPTION_EXTENSION_DAYS`].
///
/// The extension starts from the later of `now` and the current expiry, so an
/// unexpired subscription is never shortened. Premium status is granted
/// unconditionally.
///
/// # Examples
/// ```
/// use chrono::{TimeDelta, TimeZone, Utc};
/// use nano_studio::domain::{User, UserId, extend_subscription};
///
/// let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
/// let user = User::new(UserId::new("u1").unwrap(), "ana", "1234");
/// let extended = extend_subscription(&user, now);
/// assert!(extended.is_premium());
/// assert_eq!(extended.subscription_expiry(), Some(now + TimeDelta::days(30)));
/// ```
#[must_use]
pub fn extend_subscription(user: &User, now: DateTime<Utc>) -> User {
    let base = match user.subscription_expiry() {
        Some(expiry) if expiry > now => expiry,
        _ => now,
    };
    let expiry = base
        .checked_add_signed(TimeDelta::days(SUBSCRIPTION_EXTENSION_DAYS))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);
    user.clone().with_premium(Some(expiry))
}

/// Whole days left on the subscription, rounded up and floored at zero.
///
/// Users without an expiry have zero days left.
#[must_use]
pub fn remaining_days(user: &User, now: DateTime<Utc>) -> u32 {
    let Some(expiry) = user.subscription_expiry() else {
        return 0;
    };
    let Ok(millis) = u64::try_from((expiry - now).num_milliseconds()) else {
        return 0;
    };
    let days = millis.div_ceil(MILLIS_PER_DAY);
    u32::try_from(days).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    //! Unit tests for quota and subscription arithmetic.
    use super::*;
    use crate::domain::{ErrorCode, UserId};
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    #[fixture]
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0)
            .single()
            .expect("valid date")
    }

    fn free_user(images: u32) -> User {
        User::new(UserId::random(), "ana", "1234").with_images_generated(images)
    }

    #[rstest]
    #[case(0, true)]
    #[case(FREE_IMAGE_LIMIT - 1, true)]
    #[case(FREE_IMAGE_LIMIT, false)]
    #[case(FREE_IMAGE_LIMIT + 3, false)]
    fn free_users_are_gated_at_the_limit(#[case] images: u32, #[case] allowed: bool) {
        assert_eq!(can_generate(&free_user(images)), allowed);
    }

    #[rstest]
    fn premium_users_are_never_gated() {
        let user = free_user(FREE_IMAGE_LIMIT * 10).with_premium(None);
        assert!(can_generate(&user));
        assert_eq!(remaining_free_images(&user), FreeAllowance::Unlimited);
    }

    #[rstest]
    fn exhausted_quota_reports_limit() {
        let err = ensure_can_generate(&free_user(FREE_IMAGE_LIMIT)).expect_err("blocked");
        assert_eq!(err.code(), ErrorCode::QuotaExceeded);
    }

    #[rstest]
    #[case(0, FREE_IMAGE_LIMIT)]
    #[case(2, FREE_IMAGE_LIMIT - 2)]
    #[case(FREE_IMAGE_LIMIT + 1, 0)]
    fn allowance_counts_down(#[case] images: u32, #[case] remaining: u32) {
        assert_eq!(
            remaining_free_images(&free_user(images)),
            FreeAllowance::Remaining(remaining)
        );
    }

    #[rstest]
    fn extension_is_monotonic_from_no_expiry(now: DateTime<Utc>) {
        let first = extend_subscription(&free_user(0), now);
        assert_eq!(first.subscription_expiry(), Some(now + TimeDelta::days(30)));

        let second = extend_subscription(&first, now);
        assert_eq!(second.subscription_expiry(), Some(now + TimeDelta::days(60)));
        assert!(second.subscription_expiry() > first.subscription_expiry());
    }

    #[rstest]
    fn lapsed_subscription_restarts_from_now(now: DateTime<Utc>) {
        let lapsed = free_user(0).with_premium(Some(now - TimeDelta::days(5)));
        let extended = extend_subscription(&lapsed, now);
        assert_eq!(extended.subscription_expiry(), Some(now + TimeDelta::days(30)));
    }

    #[rstest]
    fn extension_keeps_counters(now: DateTime<Utc>) {
        let user = free_user(3);
        let extended = extend_subscription(&user, now);
        assert_eq!(extended.images_generated(), 3);
        assert_eq!(extended.id(), user.id());
    }

    #[rstest]
    #[case(TimeDelta::days(30), 30)]
    #[case(TimeDelta::days(29) + TimeDelta::hours(1), 30)]
    #[case(TimeDelta::milliseconds(1), 1)]
    #[case(TimeDelta::zero(), 0)]
    #[case(TimeDelta::days(-2), 0)]
    fn remaining_days_round_up(
        now: DateTime<Utc>,
        #[case] left: TimeDelta,
        #[case] expected: u32,
    ) {
        let user = free_user(0).with_premium(Some(now + left));
        assert_eq!(remaining_days(&user, now), expected);
    }

    #[rstest]
    fn no_expiry_means_zero_days(now: DateTime<Utc>) {
        assert_eq!(remaining_days(&free_user(0), now), 0);
    }
}
