// SPDX-FileCopyrightText: 2026 Vocal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Page parameter resolution for list operations.

use vocal_config::model::PaginationConfig;
use vocal_core::VocalError;
use vocal_core::types::PageRequest;

/// Resolves optional `page`/`limit` inputs against the configured bounds.
///
/// `page` defaults to 1 and must be at least 1. `limit` defaults to
/// `default_limit` and must lie in `1..=max_limit`.
pub fn resolve_page(
    page: Option<u32>,
    limit: Option<u32>,
    config: &PaginationConfig,
) -> Result<PageRequest, VocalError> {
    let page = page.unwrap_or(1);
    if page == 0 {
        return Err(VocalError::validation("page must be at least 1"));
    }

    let limit = limit.unwrap_or(config.default_limit);
    if limit == 0 || limit > config.max_limit {
        return Err(VocalError::validation(format!(
            "limit must be between 1 and {}",
            config.max_limit
        )));
    }

    Ok(PageRequest { page, limit })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_page_of_ten() {
        let req = resolve_page(None, None, &PaginationConfig::default()).unwrap();
        assert_eq!(req, PageRequest { page: 1, limit: 10 });
    }

    #[test]
    fn rejects_out_of_range_values() {
        let config = PaginationConfig::default();
        assert!(resolve_page(Some(0), None, &config).is_err());
        assert!(resolve_page(None, Some(0), &config).is_err());
        assert!(resolve_page(None, Some(101), &config).is_err());
        assert!(resolve_page(Some(7), Some(100), &config).is_ok());
    }
}
