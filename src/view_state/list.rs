//! Query state of the student list.
//!
//! Every table request rebuilds this from the applied filters the browser echoes back, applies
//! the submitted changes and fetches exactly one page. Ordering between requests belongs to the
//! browser: the filter form and the pagination controls share `hx-sync` on the filter form, so
//! a newer request aborts the one in flight, and a page that has been navigated away from has no
//! table left to swap a late response into.

use crate::{
    api::{ListPage, StudentApi},
    data::{
        query::{ListQuery, ListQueryForm, clamp_page},
        student::Student,
    },
    error::RegistrarResult,
    view_state::downloads::DownloadTracker,
};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ListStatus {
    Loading,
    Ready,
    Empty,
    Failed,
}

#[derive(Debug)]
pub struct StudentListState {
    query: ListQuery,
    total_pages: u32,
    students: Vec<Student>,
    status: ListStatus,
    downloads: DownloadTracker,
}

impl StudentListState {
    pub fn new(limit: u32, downloads: DownloadTracker) -> Self {
        Self {
            query: ListQuery::first_page(limit),
            total_pages: 1,
            students: vec![],
            status: ListStatus::Loading,
            downloads,
        }
    }

    ///picks up where the browser's last rendered table left off
    pub fn restore(form: &ListQueryForm, limit: u32, downloads: DownloadTracker) -> Self {
        let mut state = Self::new(limit, downloads);
        state.total_pages = form.total_pages.unwrap_or(1).max(1);
        state.query.search = form.applied_search.clone();
        state.query.course = form.applied_course.clone();
        state.query.page = clamp_page(form.current_page.unwrap_or(1), state.total_pages);
        state
    }

    pub const fn query(&self) -> &ListQuery {
        &self.query
    }

    pub const fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub const fn status(&self) -> ListStatus {
        self.status
    }

    pub const fn downloads(&self) -> &DownloadTracker {
        &self.downloads
    }

    ///a new search text goes back to the first page
    pub fn set_search(&mut self, search: impl Into<String>) -> bool {
        let search = search.into();
        if search == self.query.search {
            return false;
        }
        self.query.search = search;
        self.query.page = 1;
        self.status = ListStatus::Loading;
        true
    }

    ///a new course filter goes back to the first page
    pub fn set_course(&mut self, course: impl Into<String>) -> bool {
        let course = course.into();
        if course == self.query.course {
            return false;
        }
        self.query.course = course;
        self.query.page = 1;
        self.status = ListStatus::Loading;
        true
    }

    pub fn set_page(&mut self, page: u32) -> bool {
        let page = clamp_page(page, self.total_pages);
        if page == self.query.page {
            return false;
        }
        self.query.page = page;
        self.status = ListStatus::Loading;
        true
    }

    /// Applies everything the filter form submitted. A filter change wins over the requested
    /// page; with nothing changed the current page is fetched again, e.g. after a delete.
    pub fn apply_form(&mut self, form: &ListQueryForm) {
        let search = self.set_search(form.search.clone());
        let course = self.set_course(form.course.clone());
        if !(search || course) {
            self.set_page(form.page.unwrap_or(self.query.page));
        }
        self.status = ListStatus::Loading;
    }

    pub fn apply(&mut self, result: RegistrarResult<ListPage>) -> RegistrarResult<()> {
        match result {
            Ok(ListPage {
                students,
                total_pages,
            }) => {
                self.total_pages = total_pages.max(1);
                self.status = if students.is_empty() {
                    ListStatus::Empty
                } else {
                    ListStatus::Ready
                };
                self.students = students;
                Ok(())
            }
            Err(e) => {
                //whatever was on screen before stays there
                self.status = ListStatus::Failed;
                Err(e)
            }
        }
    }

    pub async fn fetch<A: StudentApi>(&mut self, api: &A) -> RegistrarResult<()> {
        let result = api.list(&self.query).await;
        self.apply(result)
    }
}
