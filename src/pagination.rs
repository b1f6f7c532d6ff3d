use crate::{errors::RequestError, validation::positive_integer_or};

pub const DEFAULT_LIMIT: i64 = 10;
pub const DEFAULT_PAGE: i64 = 1;

/// Row offset for page `p` of size `limit` out of `row_count` matching rows.
///
/// Page 3 and later start at `limit * p`, not `limit * (p - 1)`, so one page
/// of rows is skipped between pages 2 and 3. Clients depend on this offset
/// rule as-is.
pub fn calc_offset(p: i64, limit: i64, row_count: i64) -> i64 {
    if limit >= row_count || p == 1 {
        0
    } else if p == 2 {
        limit
    } else {
        limit.saturating_mul(p)
    }
}

/// Validated `limit` and `p` query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub p: i64,
}

impl Page {
    pub fn from_params(limit: Option<&str>, p: Option<&str>) -> Result<Self, RequestError> {
        Ok(Self {
            limit: positive_integer_or(limit, DEFAULT_LIMIT, "limit")?,
            p: positive_integer_or(p, DEFAULT_PAGE, "p")?,
        })
    }

    pub fn offset(&self, row_count: i64) -> i64 {
        calc_offset(self.p, self.limit, row_count)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            p: DEFAULT_PAGE,
        }
    }
}
