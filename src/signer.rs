//! Request signing for the nucleo API.
//!
//! Every command is authenticated with `Authorization: NEATOAPP <signature>`,
//! where the signature is an HMAC-SHA256 over
//! `lowercase(serial) + "\n" + date + "\n" + body` keyed with the robot secret.
//! The `date` must be byte-identical to the `Date` header sent alongside it.

use chrono::{DateTime, TimeZone, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Compute the lowercase hex signature for one request.
///
/// The serial number is lowercased here; nucleo rejects signatures made over
/// the original casing.
pub fn sign(serial_number: &str, date: &str, body: &str, secret: &[u8]) -> String {
    let message = format!("{}\n{date}\n{body}", serial_number.to_lowercase());

    let mut mac =
        <HmacSha256 as Mac>::new_from_slice(secret).expect("HMAC accepts keys of any length");
    mac.update(message.as_bytes());

    hex::encode(mac.finalize().into_bytes())
}

/// Format an instant as RFC 1123 in UTC, with the zone spelled `GMT`.
///
/// nucleo only understands `GMT`, and recomputes the same substitution when
/// verifying, so the textual replace has to happen exactly like this.
pub fn format_rfc1123_date<Tz: TimeZone>(at: &DateTime<Tz>) -> String {
    at.with_timezone(&Utc)
        .format("%a, %d %b %Y %H:%M:%S %Z")
        .to_string()
        .replace("UTC", "GMT")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    const SERIAL: &str = "OPS01234-0123456789AB";
    const DATE: &str = "Sun, 06 Nov 1994 08:49:37 GMT";
    const BODY: &str = r#"{"reqId":"77","cmd":"getRobotState"}"#;
    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    #[test]
    fn signature_is_deterministic() {
        let a = sign(SERIAL, DATE, BODY, SECRET);
        let b = sign(SERIAL, DATE, BODY, SECRET);
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn signature_matches_manual_hmac_over_lowercased_message() {
        let message = format!("{}\n{DATE}\n{BODY}", SERIAL.to_lowercase());
        let mut mac = <HmacSha256 as Mac>::new_from_slice(SECRET).unwrap();
        mac.update(message.as_bytes());
        let expected = hex::encode(mac.finalize().into_bytes());

        assert_eq!(sign(SERIAL, DATE, BODY, SECRET), expected);
    }

    #[test]
    fn serial_case_does_not_change_signature() {
        let upper = sign(&SERIAL.to_uppercase(), DATE, BODY, SECRET);
        let lower = sign(&SERIAL.to_lowercase(), DATE, BODY, SECRET);
        let mixed = sign(SERIAL, DATE, BODY, SECRET);
        assert_eq!(upper, lower);
        assert_eq!(lower, mixed);
    }

    #[test]
    fn any_single_perturbation_changes_signature() {
        let base = sign(SERIAL, DATE, BODY, SECRET);

        assert_ne!(base, sign(SERIAL, "Sun, 06 Nov 1994 08:49:38 GMT", BODY, SECRET));
        assert_ne!(
            base,
            sign(SERIAL, DATE, r#"{"reqId":"78","cmd":"getRobotState"}"#, SECRET)
        );
        assert_ne!(base, sign(SERIAL, DATE, BODY, b"0123456789abcdef0123456789abcdeF"));
        assert_ne!(base, sign("OPS01234-0123456789AC", DATE, BODY, SECRET));
    }

    #[test]
    fn empty_inputs_are_accepted() {
        let sig = sign("", "", "", b"");
        assert_eq!(sig.len(), 64);
    }

    #[test]
    fn date_uses_gmt_never_utc() {
        let at = Utc.with_ymd_and_hms(1994, 11, 6, 8, 49, 37).unwrap();
        let date = format_rfc1123_date(&at);
        assert_eq!(date, DATE);
        assert!(date.contains("GMT"));
        assert!(!date.contains("UTC"));
    }

    #[test]
    fn date_is_converted_to_utc() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let at = offset.with_ymd_and_hms(2024, 2, 29, 1, 5, 9).unwrap();
        assert_eq!(format_rfc1123_date(&at), "Wed, 28 Feb 2024 23:05:09 GMT");
    }

    #[test]
    fn date_pads_single_digit_day() {
        let at = Utc.with_ymd_and_hms(2023, 1, 2, 3, 4, 5).unwrap();
        let date = format_rfc1123_date(&at);
        assert_eq!(date, "Mon, 02 Jan 2023 03:04:05 GMT");
    }

    #[test]
    fn current_date_never_contains_utc() {
        let date = format_rfc1123_date(&Utc::now());
        assert!(date.ends_with(" GMT"));
        assert!(!date.contains("UTC"));
    }
}
