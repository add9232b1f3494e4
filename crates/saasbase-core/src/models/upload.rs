use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::constants::ALLOWED_IMAGE_CONTENT_TYPES;

/// Request for a presigned URL the client can PUT the file to
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    /// Original filename
    #[validate(length(
        min = 1,
        max = 255,
        message = "Filename must be between 1 and 255 characters"
    ))]
    pub file_name: String,
    /// MIME type of the file
    #[validate(custom(function = "validate_image_content_type"))]
    pub file_type: String,
}

fn validate_image_content_type(content_type: &str) -> Result<(), ValidationError> {
    let normalized = content_type.trim().to_lowercase();
    if ALLOWED_IMAGE_CONTENT_TYPES.contains(&normalized.as_str()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("content_type");
        err.message = Some(format!("Unsupported content type: {}", content_type).into());
        Err(err)
    }
}

/// Presigned upload issued for a new media item
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadTicket {
    pub media_id: Uuid,
    /// URL accepting a single PUT of the file bytes
    pub upload_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_request_validation() {
        let ok = UploadRequest {
            file_name: "me.png".to_string(),
            file_type: "image/png".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad_type = UploadRequest {
            file_name: "me.pdf".to_string(),
            file_type: "application/pdf".to_string(),
        };
        assert!(bad_type.validate().is_err());

        let empty_name = UploadRequest {
            file_name: String::new(),
            file_type: "image/jpeg".to_string(),
        };
        assert!(empty_name.validate().is_err());
    }

    #[test]
    fn test_upload_request_uses_camel_case() {
        let req: UploadRequest =
            serde_json::from_str(r#"{"fileName":"a.jpg","fileType":"image/jpeg"}"#).unwrap();
        assert_eq!(req.file_name, "a.jpg");
        assert_eq!(req.file_type, "image/jpeg");
    }
}
