//! Linear-scan lookups shared by the project and command lists

/// Index of the first item matching `predicate`.
pub fn index_where<T>(items: &[T], predicate: impl Fn(&T) -> bool) -> Option<usize> {
    items.iter().position(predicate)
}

/// Index of the first item whose `field` equals `value`.
pub fn index_where_field<T>(items: &[T], field: impl Fn(&T) -> &str, value: &str) -> Option<usize> {
    index_where(items, |item| field(item) == value)
}
