use crate::utils::error::{LabelError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(LabelError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(LabelError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(LabelError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_bind_addr(field_name: &str, addr: &str) -> Result<()> {
    if addr.parse::<std::net::SocketAddr>().is_err() {
        return Err(LabelError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: addr.to_string(),
            reason: "Expected host:port socket address".to_string(),
        });
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(LabelError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_output_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(LabelError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(LabelError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https_urls() {
        assert!(validate_url("base_url", "https://api.discogs.com").is_ok());
        assert!(validate_url("base_url", "http://localhost:8080").is_ok());
    }

    #[test]
    fn rejects_empty_and_non_http_urls() {
        assert!(validate_url("base_url", "").is_err());
        assert!(validate_url("base_url", "ftp://example.com").is_err());
        assert!(validate_url("base_url", "not a url").is_err());
    }

    #[test]
    fn validates_bind_addresses() {
        assert!(validate_bind_addr("bind", "127.0.0.1:8080").is_ok());
        assert!(validate_bind_addr("bind", "localhost:8080").is_err());
        assert!(validate_bind_addr("bind", "8080").is_err());
    }

    #[test]
    fn validates_output_paths() {
        assert!(validate_output_path("out", "labels.pdf").is_ok());
        assert!(validate_output_path("out", "").is_err());
        assert!(validate_output_path("out", "bad\0path").is_err());
    }
}
