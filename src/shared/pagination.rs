/// Default page size for list endpoints
pub const DEFAULT_LIMIT: u64 = 100;
/// Upper bound on page size
pub const MAX_LIMIT: u64 = 1000;

/// Offset-based pagination (`skip` / `limit`), as the list endpoints expose it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub skip: u64,
    pub limit: u64,
}

impl Pagination {
    pub fn new(skip: Option<u64>, limit: Option<u64>) -> Self {
        Self {
            skip: skip.unwrap_or(0),
            limit: limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
        }
    }

    /// Apply the window to an already ordered list.
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.skip as usize)
            .take(self.limit as usize)
            .collect()
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_clamping() {
        assert_eq!(Pagination::default(), Pagination { skip: 0, limit: 100 });
        assert_eq!(Pagination::new(Some(5), Some(0)).limit, 1);
        assert_eq!(Pagination::new(None, Some(50_000)).limit, MAX_LIMIT);
    }

    #[test]
    fn apply_skips_and_takes() {
        let page = Pagination::new(Some(2), Some(3));
        assert_eq!(page.apply((0..10).collect()), vec![2, 3, 4]);
        assert!(Pagination::new(Some(20), None).apply(vec![1, 2]).is_empty());
    }
}
