use crate::{
    api::{HttpStudentApi, observer::TracingObserver},
    config::RuntimeConfiguration,
    error::RegistrarResult,
    maud_conveniences::render_nav,
    view_state::downloads::DownloadTracker,
};
use maud::{DOCTYPE, Markup, html};
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct RegistrarState {
    api: HttpStudentApi,
    config: RuntimeConfiguration,
    downloads: DownloadTracker,
}

impl RegistrarState {
    pub fn new(config: RuntimeConfiguration) -> RegistrarResult<Self> {
        let api = HttpStudentApi::new(&config.api_config(), Arc::new(TracingObserver))?;
        Ok(Self::with_api(api, config))
    }

    pub fn with_api(api: HttpStudentApi, config: RuntimeConfiguration) -> Self {
        Self {
            api,
            config,
            downloads: DownloadTracker::default(),
        }
    }

    pub const fn api(&self) -> &HttpStudentApi {
        &self.api
    }

    pub const fn config(&self) -> &RuntimeConfiguration {
        &self.config
    }

    pub const fn downloads(&self) -> &DownloadTracker {
        &self.downloads
    }

    pub fn page_size(&self) -> u32 {
        self.config.api_config().page_size
    }

    pub fn render(&self, current_path: &str, markup: Markup) -> Markup {
        self.render_with_toast(current_path, None, markup)
    }

    #[allow(clippy::unused_self, clippy::needless_pass_by_value)] //in case self is ever needed :), and to allow direct html! usage
    pub fn render_with_toast(
        &self,
        current_path: &str,
        toast: Option<Markup>,
        markup: Markup,
    ) -> Markup {
        let nav = render_nav(current_path);

        html! {
            (DOCTYPE)
            html {
                head {
                    meta charset="UTF-8" {}
                    meta name="viewport" content="width=device-width, initial-scale=1.0" {}
                    //error responses carry their own toast, so they get swapped too
                    meta name="htmx-config" content=r#"{"responseHandling":[{"code":"204","swap":false},{"code":"[23]..","swap":true},{"code":"[45]..","swap":true,"error":true}]}"# {}
                    script src="https://unpkg.com/htmx.org@2.0.4" integrity="sha384-HGfztofotfshcF7+8n44JQL2oJmowVChPTg48S+jvZoztPfvwD79OC/LTtG6dMp+" crossorigin="anonymous" {}
                    script src="https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4" {}
                    title { "Student Management" }
                }
                body class="bg-gray-900 min-h-screen flex flex-col items-center text-white" {
                    (nav)
                    div id="toasts" class="fixed top-4 right-4 z-50 w-80" {
                        @if let Some(toast) = toast {
                            (toast)
                        }
                    }
                    div id="modal" {}
                    (markup)
                }
            }
        }
    }
}
