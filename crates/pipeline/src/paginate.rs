//! Offset/limit pagination.
//!
//! A zero offset and a missing offset mean the same thing: no left trim.
//! Likewise a zero limit means "no limit". Bounds past the end are clamped.

/// Slice `items` to `items[offset..offset + limit]`, clamped to the input.
pub fn filter<T>(items: &[T], offset: Option<usize>, limit: Option<usize>) -> &[T] {
    let mut values = items;

    if let Some(offset) = offset.filter(|&o| o > 0) {
        values = &values[offset.min(values.len())..];
    }

    if let Some(limit) = limit.filter(|&l| l > 0) {
        values = &values[..limit.min(values.len())];
    }

    values
}

/// Requested page of a listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    pub offset: Option<usize>,
    pub limit: Option<usize>,
}

impl Page {
    pub fn new(offset: Option<usize>, limit: Option<usize>) -> Self {
        Self { offset, limit }
    }

    pub fn apply<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        filter(items, self.offset, self.limit)
    }
}
