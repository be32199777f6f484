//! Premium upgrade contact link.

use url::Url;

use super::error::{Error, ErrorMessage};

/// Pre-filled chat message sent with an upgrade request.
pub const UPGRADE_MESSAGE: &str =
    "Hello! I want to upgrade my Nano Banana Pro account to Premium.";

const WHATSAPP_BASE: &str = "https://wa.me/";

/// Build the WhatsApp deep link for `number`.
///
/// A leading or embedded `+` is stripped; anything else that is not a digit
/// makes the number invalid.
///
/// # Examples
/// ```
/// use nano_studio::domain::upgrade_link;
///
/// let link = upgrade_link("+15550100").unwrap();
/// assert!(link.as_str().starts_with("https://wa.me/15550100?text=Hello"));
/// ```
pub fn upgrade_link(number: &str) -> Result<Url, Error> {
    let digits: String = number.trim().chars().filter(|c| *c != '+').collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::validation(ErrorMessage::InvalidContactNumber));
    }
    let mut url = Url::parse(WHATSAPP_BASE)
        .and_then(|base| base.join(&digits))
        .map_err(|_| Error::validation(ErrorMessage::InvalidContactNumber))?;
    url.query_pairs_mut().append_pair("text", UPGRADE_MESSAGE);
    Ok(url)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    fn link_strips_plus_and_encodes_message() {
        let link = upgrade_link("+201001234567").expect("valid number");
        assert_eq!(link.host_str(), Some("wa.me"));
        assert_eq!(link.path(), "/201001234567");
        let text = link
            .query_pairs()
            .find(|(key, _)| key == "text")
            .map(|(_, value)| value.into_owned());
        assert_eq!(text.as_deref(), Some(UPGRADE_MESSAGE));
    }

    #[rstest]
    #[case("")]
    #[case("+")]
    #[case("call me")]
    #[case("+20 100")]
    fn rejects_non_numeric_contacts(#[case] number: &str) {
        let err = upgrade_link(number).expect_err("invalid number");
        assert_eq!(err.code(), ErrorCode::ValidationError);
    }
}
