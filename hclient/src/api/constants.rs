//! Platform endpoint paths and limits

/// Largest batch the platform accepts for batch create/update
pub const MAX_BATCH_SIZE: usize = 30;

/// First page of a paginated query
pub const DEFAULT_PAGE_NO: u32 = 1;

/// Page size used when neither the query nor the client sets one
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Field that carries a record's platform-assigned identity
pub const CODE_FIELD: &str = "code";

/// Correlation header attached to every dispatched request
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

pub mod paths {
    //! Path builders, relative to the configured base URL

    fn segment(value: &str) -> String {
        urlencoding::encode(value).into_owned()
    }

    pub fn objects() -> String {
        "/v1/meta/objects".to_string()
    }

    pub fn object_description(meta_name: &str) -> String {
        format!("/v1/meta/objects/{}", segment(meta_name))
    }

    pub fn records(meta_name: &str) -> String {
        format!("/v1/data/objects/{}", segment(meta_name))
    }

    pub fn record(meta_name: &str, code: &str) -> String {
        format!("/v1/data/objects/{}/{}", segment(meta_name), segment(code))
    }

    pub fn batch(meta_name: &str) -> String {
        format!("/v1/data/objects/{}/batch", segment(meta_name))
    }

    pub fn query(meta_name: &str) -> String {
        format!("/v1/data/objects/{}/query", segment(meta_name))
    }

    pub fn auxiliary_query(meta_name: &str) -> String {
        format!("/v1/data/auxiliary/{}/query", segment(meta_name))
    }

    pub fn transfer(meta_name: &str, code: &str) -> String {
        format!(
            "/v1/data/objects/{}/{}/transfer",
            segment(meta_name),
            segment(code)
        )
    }

    pub fn sql() -> String {
        "/v1/data/sql".to_string()
    }
}
