//! Rules for cart item image payloads.

use super::{char_len, is_blank};
use crate::dto::CartItemImageDto;

pub const MAX_FILE_NAME_LENGTH: usize = 100;
pub const MAX_CONTENT_TYPE_LENGTH: usize = 50;
pub const MAX_DESCRIPTION_LENGTH: usize = 100;
pub const MAX_DISPLAY_NAME_LENGTH: usize = 50;

/// Content types accepted for cart item images.
pub const ALLOWED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif"];

/// Validate an image payload, returning every violated rule in field order.
pub fn validate_cart_item_image(image: &CartItemImageDto) -> Vec<String> {
    let mut errors = Vec::new();

    match image.file_name.as_deref() {
        name if is_blank(name) => errors.push("File name is required.".to_string()),
        Some(name) if char_len(name) > MAX_FILE_NAME_LENGTH => errors.push(format!(
            "File name must not exceed {MAX_FILE_NAME_LENGTH} characters."
        )),
        _ => {}
    }

    if image.file_bytes.is_empty() {
        errors.push("File bytes are required.".to_string());
    }

    let content_type = image.content_type.as_deref();
    if is_blank(content_type) {
        errors.push("Content type is required.".to_string());
    }
    if let Some(content_type) = content_type {
        if char_len(content_type) > MAX_CONTENT_TYPE_LENGTH {
            errors.push(format!(
                "Content type must not exceed {MAX_CONTENT_TYPE_LENGTH} characters."
            ));
        }
    }
    if !content_type.is_some_and(|ct| ALLOWED_CONTENT_TYPES.contains(&ct)) {
        errors.push(
            "Invalid image content type. Supported types are JPEG, PNG, and GIF.".to_string(),
        );
    }

    if let Some(description) = &image.description {
        if char_len(description) > MAX_DESCRIPTION_LENGTH {
            errors.push(format!(
                "Description must not exceed {MAX_DESCRIPTION_LENGTH} characters."
            ));
        }
    }

    if image.length <= 0 {
        errors.push("Length must be greater than 0.".to_string());
    }

    if let Some(name) = &image.name {
        if char_len(name) > MAX_DISPLAY_NAME_LENGTH {
            errors.push(format!(
                "Name must not exceed {MAX_DISPLAY_NAME_LENGTH} characters."
            ));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_image() -> CartItemImageDto {
        CartItemImageDto {
            file_name: Some("widget.png".to_string()),
            file_bytes: vec![1, 2, 3, 4],
            content_type: Some("image/png".to_string()),
            description: Some("Front view".to_string()),
            length: 4,
            name: Some("front".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn valid_image_has_no_violations() {
        assert!(validate_cart_item_image(&valid_image()).is_empty());
    }

    #[test]
    fn every_allowed_content_type_passes() {
        for content_type in ALLOWED_CONTENT_TYPES {
            let image = CartItemImageDto {
                content_type: Some(content_type.to_string()),
                ..valid_image()
            };
            assert!(
                validate_cart_item_image(&image).is_empty(),
                "{content_type} should be accepted"
            );
        }
    }

    #[test]
    fn unsupported_content_type_is_rejected() {
        let image = CartItemImageDto {
            content_type: Some("image/webp".to_string()),
            ..valid_image()
        };
        assert_eq!(
            validate_cart_item_image(&image),
            vec!["Invalid image content type. Supported types are JPEG, PNG, and GIF."]
        );
    }

    #[test]
    fn content_type_match_is_exact() {
        let image = CartItemImageDto {
            content_type: Some("IMAGE/PNG".to_string()),
            ..valid_image()
        };
        assert_eq!(validate_cart_item_image(&image).len(), 1);
    }

    #[test]
    fn overlong_content_type_reports_length_and_set_violations() {
        let image = CartItemImageDto {
            content_type: Some(format!("image/{}", "x".repeat(60))),
            ..valid_image()
        };
        assert_eq!(
            validate_cart_item_image(&image),
            vec![
                "Content type must not exceed 50 characters.",
                "Invalid image content type. Supported types are JPEG, PNG, and GIF.",
            ]
        );
    }

    #[test]
    fn missing_file_name_and_bytes_are_required() {
        let image = CartItemImageDto {
            file_name: None,
            file_bytes: Vec::new(),
            ..valid_image()
        };
        assert_eq!(
            validate_cart_item_image(&image),
            vec!["File name is required.", "File bytes are required."]
        );
    }

    #[test]
    fn long_fields_are_rejected() {
        let image = CartItemImageDto {
            file_name: Some("f".repeat(MAX_FILE_NAME_LENGTH + 1)),
            description: Some("d".repeat(MAX_DESCRIPTION_LENGTH + 1)),
            name: Some("n".repeat(MAX_DISPLAY_NAME_LENGTH + 1)),
            ..valid_image()
        };
        assert_eq!(
            validate_cart_item_image(&image),
            vec![
                "File name must not exceed 100 characters.",
                "Description must not exceed 100 characters.",
                "Name must not exceed 50 characters.",
            ]
        );
    }

    #[test]
    fn empty_payload_reports_every_rule() {
        let errors = validate_cart_item_image(&CartItemImageDto::default());
        assert_eq!(
            errors,
            vec![
                "File name is required.",
                "File bytes are required.",
                "Content type is required.",
                "Invalid image content type. Supported types are JPEG, PNG, and GIF.",
                "Length must be greater than 0.",
            ]
        );
    }

    #[test]
    fn blank_content_type_is_required_and_unsupported() {
        for content_type in [None, Some(String::new()), Some("  ".to_string())] {
            let image = CartItemImageDto {
                content_type,
                ..valid_image()
            };
            assert_eq!(
                validate_cart_item_image(&image),
                vec![
                    "Content type is required.",
                    "Invalid image content type. Supported types are JPEG, PNG, and GIF.",
                ]
            );
        }
    }
}
