use serde::Deserialize;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Parameters of one `GET /students` call. An empty `search` or `course` means no filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    pub search: String,
    pub course: String,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::first_page(DEFAULT_PAGE_SIZE)
    }
}

impl ListQuery {
    pub fn first_page(limit: u32) -> Self {
        Self {
            page: 1,
            limit: limit.max(1),
            search: String::new(),
            course: String::new(),
        }
    }

    pub fn to_pairs(&self) -> [(&'static str, String); 4] {
        [
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
            ("search", self.search.clone()),
            ("course", self.course.clone()),
        ]
    }
}

pub fn clamp_page(page: u32, total_pages: u32) -> u32 {
    page.clamp(1, total_pages.max(1))
}

/// What the filter form sends to `/internal/students`.
///
/// `applied_*` and `current_page` echo the table currently on screen, so a changed filter can
/// be told apart from a page change. `page` is only sent by the pagination controls.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct ListQueryForm {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub course: String,
    #[serde(default)]
    pub applied_search: String,
    #[serde(default)]
    pub applied_course: String,
    #[serde(default)]
    pub current_page: Option<u32>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub total_pages: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_pages_are_clamped() {
        assert_eq!(clamp_page(0, 4), 1);
        assert_eq!(clamp_page(9, 4), 4);
        assert_eq!(clamp_page(3, 4), 3);
        assert_eq!(clamp_page(5, 0), 1);
    }

    #[test]
    fn defaults_are_explicit() {
        let query = ListQuery::default();
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, DEFAULT_PAGE_SIZE);
        assert!(query.search.is_empty() && query.course.is_empty());
        assert_eq!(ListQuery::first_page(0).limit, 1);
    }

    #[test]
    fn empty_filters_are_still_sent() {
        let pairs = ListQuery::default().to_pairs();
        assert_eq!(pairs[0], ("page", "1".to_string()));
        assert_eq!(pairs[3], ("course", String::new()));
    }
}
