pub mod adjustments;
pub mod backup;
pub mod cash;
pub mod clients;
pub mod config;
pub mod employees;
pub mod expenses;
pub mod history;
pub mod invoice;
pub mod jobs;
pub mod log;
pub mod payroll;
pub mod propagation;
pub mod reports;
pub mod rollover;
pub mod tracker;

/// One page of a listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based, clamped to the last page.
    pub page: usize,
    pub pages: usize,
    pub total: usize,
}

/// Slice `items` into page `page` (1-based) of `size` items. A size of 0
/// keeps everything on one page.
pub fn paginate<T>(items: Vec<T>, page: usize, size: usize) -> Page<T> {
    let total = items.len();
    if size == 0 || total == 0 {
        return Page {
            items,
            page: 1,
            pages: 1,
            total,
        };
    }

    let pages = total.div_ceil(size);
    let page = page.clamp(1, pages);
    let items = items.into_iter().skip((page - 1) * size).take(size).collect();

    Page {
        items,
        page,
        pages,
        total,
    }
}
