//! Pure validation rules for post creation.
//!
//! Validation is deterministic and performs no I/O: the default-photo fill
//! happens later, as an explicit step in the service, so these predicates
//! stay testable without network access.

use super::types::{PostPolicy, UploadPayload, UploadedFile};

/// Message for a blank title.
pub const TITLE_BLANK: &str = "Title can't be blank";
/// Message for a missing required photo.
pub const PHOTO_MISSING: &str = "Photo must be attached";
/// Message for the multi-image shape when it is disabled.
pub const IMAGES_NOT_ACCEPTED: &str = "Images are not accepted";
/// Message for a request supplying both upload shapes.
pub const UPLOAD_AMBIGUOUS: &str = "Photo and images cannot both be provided";

/// Resolve the raw form fields into a single upload payload.
///
/// Enforces that the single-photo and multi-image shapes are mutually
/// exclusive; an empty images list collapses to `None`.
///
/// # Errors
///
/// Returns the validation message when both shapes are supplied.
pub fn resolve_upload(
    photo: Option<UploadedFile>,
    images: Vec<UploadedFile>,
) -> Result<UploadPayload, String> {
    match (photo, images.is_empty()) {
        (Some(_), false) => Err(UPLOAD_AMBIGUOUS.to_string()),
        (Some(file), true) => Ok(UploadPayload::Single(file)),
        (None, false) => Ok(UploadPayload::Multiple(images)),
        (None, true) => Ok(UploadPayload::None),
    }
}

/// Validate a create request against the policy.
///
/// Returns the ordered list of violated-rule messages; an empty list means
/// the request is valid.
#[must_use]
pub fn validate(title: &str, upload: &UploadPayload, policy: &PostPolicy) -> Vec<String> {
    let mut errors = Vec::new();

    if title.trim().is_empty() {
        errors.push(TITLE_BLANK.to_string());
    }

    if matches!(upload, UploadPayload::Multiple(_)) && !policy.allow_multiple_images {
        errors.push(IMAGES_NOT_ACCEPTED.to_string());
    }

    // The photo rule only applies when the default-photo fill is off; with
    // the fill on, an empty payload is completed by the service instead.
    if upload.is_empty() && policy.require_photo && !policy.auto_fill_default_photo {
        errors.push(PHOTO_MISSING.to_string());
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use rstest::rstest;

    fn file(name: &str) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            content_type: "image/png".to_string(),
            bytes: Bytes::from_static(b"png"),
        }
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    fn test_blank_title_rejected(#[case] title: &str) {
        let errors = validate(
            title,
            &UploadPayload::Single(file("a.png")),
            &PostPolicy::default(),
        );
        assert_eq!(errors, vec![TITLE_BLANK.to_string()]);
    }

    #[test]
    fn test_valid_title_with_photo_passes() {
        let errors = validate(
            "Sunset",
            &UploadPayload::Single(file("sunset.png")),
            &PostPolicy::default(),
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn test_missing_photo_rejected_when_required() {
        let policy = PostPolicy {
            require_photo: true,
            auto_fill_default_photo: false,
            ..PostPolicy::default()
        };
        let errors = validate("Sunset", &UploadPayload::None, &policy);
        assert_eq!(errors, vec![PHOTO_MISSING.to_string()]);
    }

    #[test]
    fn test_missing_photo_allowed_when_not_required() {
        let policy = PostPolicy {
            require_photo: false,
            ..PostPolicy::default()
        };
        let errors = validate("Sunset", &UploadPayload::None, &policy);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_auto_fill_suppresses_photo_rule() {
        let policy = PostPolicy {
            require_photo: true,
            auto_fill_default_photo: true,
            ..PostPolicy::default()
        };
        let errors = validate("Sunset", &UploadPayload::None, &policy);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_multiple_images_rejected_when_disabled() {
        let policy = PostPolicy {
            allow_multiple_images: false,
            ..PostPolicy::default()
        };
        let payload = UploadPayload::Multiple(vec![file("a.png"), file("b.png")]);
        let errors = validate("Sunset", &payload, &policy);
        assert_eq!(errors, vec![IMAGES_NOT_ACCEPTED.to_string()]);
    }

    #[test]
    fn test_all_violations_collected_in_order() {
        let policy = PostPolicy {
            allow_multiple_images: false,
            ..PostPolicy::default()
        };
        let payload = UploadPayload::Multiple(vec![file("a.png")]);
        let errors = validate("  ", &payload, &policy);
        assert_eq!(
            errors,
            vec![TITLE_BLANK.to_string(), IMAGES_NOT_ACCEPTED.to_string()]
        );
    }

    #[test]
    fn test_resolve_upload_shapes() {
        assert!(matches!(
            resolve_upload(None, Vec::new()),
            Ok(UploadPayload::None)
        ));
        assert!(matches!(
            resolve_upload(Some(file("a.png")), Vec::new()),
            Ok(UploadPayload::Single(_))
        ));
        assert!(matches!(
            resolve_upload(None, vec![file("a.png")]),
            Ok(UploadPayload::Multiple(_))
        ));
    }

    #[test]
    fn test_resolve_upload_rejects_both_shapes() {
        let err = resolve_upload(Some(file("a.png")), vec![file("b.png")]).unwrap_err();
        assert_eq!(err, UPLOAD_AMBIGUOUS);
    }
}
