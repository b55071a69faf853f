// src/common/pagination.rs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_PER_PAGE: usize = 10;
pub const MAX_PER_PAGE: usize = 100;

#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Página (começa em 1)
    pub page: Option<usize>,
    /// Itens por página (padrão 10, máximo 100)
    pub per_page: Option<usize>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
}

/// Fatia a lista já filtrada. Páginas além do fim voltam vazias.
pub fn paginate<T>(items: Vec<T>, params: PageParams) -> Page<T> {
    let per_page = params
        .per_page
        .unwrap_or(DEFAULT_PER_PAGE)
        .clamp(1, MAX_PER_PAGE);
    let page = params.page.unwrap_or(1).max(1);
    let total = items.len();
    let total_pages = total.div_ceil(per_page);

    let items = items
        .into_iter()
        .skip((page - 1).saturating_mul(per_page))
        .take(per_page)
        .collect();

    Page {
        items,
        page,
        per_page,
        total,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_requested_page() {
        let page = paginate((1..=25).collect::<Vec<_>>(), PageParams { page: Some(3), per_page: Some(10) });
        assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
        assert_eq!(page.total, 25);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn defaults_and_clamps() {
        let page = paginate((1..=5).collect::<Vec<_>>(), PageParams { page: Some(0), per_page: Some(0) });
        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, 1);
        assert_eq!(page.items, vec![1]);

        let page = paginate(Vec::<u8>::new(), PageParams::default());
        assert_eq!(page.per_page, DEFAULT_PER_PAGE);
        assert_eq!(page.total_pages, 0);
        assert!(page.items.is_empty());
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let page = paginate(vec![1, 2, 3], PageParams { page: Some(9), per_page: Some(2) });
        assert!(page.items.is_empty());
        assert_eq!(page.total, 3);
    }

    #[test]
    fn huge_page_number_does_not_overflow() {
        let page = paginate(vec![1, 2, 3], PageParams { page: Some(usize::MAX), per_page: Some(10) });
        assert!(page.items.is_empty());
        assert_eq!(page.page, usize::MAX);
        assert_eq!(page.total_pages, 1);
    }
}
