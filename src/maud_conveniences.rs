use crate::data::{
    student::StudentDraft,
    validation::{DraftField, ValidationErrors},
};
use maud::{Markup, Render, html};

pub fn title(s: impl Render) -> Markup {
    html! {
        h1 class="text-2xl font-semibold mb-4" {(s)}
    }
}

pub fn subtitle(s: impl Render) -> Markup {
    html! {
        h2 class="text-lg font-semibold text-gray-300 mb-2" {(s)}
    }
}

pub const INPUT_CLASSES: &str = "shadow appearance-none border rounded w-full py-2 px-3 leading-tight focus:outline-none focus:shadow-outline bg-gray-700 border-gray-600";
const ERRORED_INPUT_CLASSES: &str = "shadow appearance-none border rounded w-full py-2 px-3 leading-tight focus:outline-none focus:shadow-outline bg-gray-700 border-red-500";

pub fn input_classes(errored: bool) -> &'static str {
    if errored {
        ERRORED_INPUT_CLASSES
    } else {
        INPUT_CLASSES
    }
}

/// Label, control and (optionally) the control's inline error.
pub fn form_element(id: &str, label: &str, error: Option<&str>, control: Markup) -> Markup {
    html! {
        div class="mb-4" {
            label for=(id) class="block text-sm font-bold mb-2 text-gray-300" {(label)}
            (control)
            p id={(id) "_error"} class="text-red-400 text-xs italic mt-1" {
                @if let Some(error) = error {
                    (error)
                }
            }
        }
    }
}

/// A text-like input for one draft field, with its current value and error.
///
/// Typing into the input clears its error line without touching any other field's.
pub fn simple_form_element(
    field: DraftField,
    label: &str,
    input_type: Option<&str>,
    draft: &StudentDraft,
    errors: &ValidationErrors,
) -> Markup {
    let id = field.form_name();
    let value = field.value_in(draft);
    let error = errors.get(field);

    form_element(
        id,
        label,
        error,
        html! {
            input type=(input_type.unwrap_or("text")) id=(id) name=(id) value=(value) class=(input_classes(error.is_some()))
                hx-on-input={"htmx.find('#" (id) "_error').textContent = ''; this.classList.remove('border-red-500')"} {}
        },
    )
}

pub fn form_submit_button(text: &str) -> Markup {
    html! {
        button type="submit" class="bg-blue-500 hover:bg-blue-700 font-bold py-2 px-4 rounded focus:outline-none focus:shadow-outline disabled:opacity-50" {
            (text)
        }
    }
}

pub fn toast(message: &str, is_error: bool) -> Markup {
    let colour = if is_error {
        "bg-red-700"
    } else {
        "bg-green-700"
    };

    html! {
        div role="status" class={"rounded shadow-md px-4 py-3 mb-2 " (colour)} hx-on-click="this.remove()" {
            (message)
        }
    }
}

pub fn render_nav(current_path: &str) -> Markup {
    let link_classes = |href: &str| {
        let active = if href == "/students" {
            current_path == "/" || current_path == "/students"
        } else {
            current_path == href
        };
        if active {
            "bg-blue-700 font-bold py-2 px-4 rounded"
        } else {
            "bg-slate-600 hover:bg-slate-800 font-bold py-2 px-4 rounded"
        }
    };

    html! {
        nav class="w-full bg-gray-800 shadow-md mb-8" {
            div class="container mx-auto flex flex-row items-center justify-between p-4" {
                a href="/students" class="text-xl font-semibold" {"Student Management"}
                div class="flex flex-row space-x-4" {
                    a href="/students" class=(link_classes("/students")) {"Students"}
                    a href="/students/new" class=(link_classes("/students/new")) {"Add Student"}
                }
            }
        }
    }
}

/// "Page X of Y" with previous/next and one button per page. Nothing for a single page.
///
/// Each button re-requests `endpoint` with the filter form's fields plus its own `page`.
pub fn pagination(page: u32, total_pages: u32, endpoint: &str, form_id: &str, target: &str) -> Markup {
    if total_pages <= 1 {
        return html! {};
    }

    let button = |to: u32, label: Markup, disabled: bool, current: bool| {
        html! {
            button type="button" name="page" value=(to) disabled[disabled]
                aria-current=[current.then_some("page")]
                hx-get=(endpoint) hx-include={"#" (form_id)} hx-target=(target) hx-sync={"#" (form_id) ":replace"}
                class={"py-1 px-3 rounded disabled:opacity-50 " (if current { "bg-blue-600 font-bold" } else { "bg-gray-700 hover:bg-gray-600" })} {
                (label)
            }
        }
    };

    html! {
        div class="flex flex-row items-center justify-between mt-4" {
            p class="text-sm text-gray-300" {"Page " (page) " of " (total_pages)}
            div class="flex flex-row space-x-1" {
                (button(page.saturating_sub(1).max(1), html! {"Previous"}, page <= 1, false))
                @for to in 1..=total_pages {
                    (button(to, html! {(to)}, false, to == page))
                }
                (button((page + 1).min(total_pages), html! {"Next"}, page >= total_pages, false))
            }
        }
    }
}

pub fn render_table<const N: usize>(titles: [&'static str; N], items: Vec<[Markup; N]>) -> Markup {
    html! {
        div class="overflow-x-auto" {
            table class="min-w-full bg-gray-800 rounded shadow-md" {
                thead class="bg-gray-700" {
                    tr {
                        @for title in titles {
                            th class="py-2 px-4 text-left font-semibold text-gray-300" {(title)}
                        }
                    }
                }
                tbody {
                    @for row in items {
                        tr class="hover:bg-gray-700" {
                            @for col in row {
                                td class="py-2 px-4 border-b border-gray-600 text-gray-200" {(col)}
                            }
                        }
                    }
                }
            }
        }
    }
}

pub struct Email<'a>(pub &'a str);

impl Render for Email<'_> {
    fn render(&self) -> Markup {
        html! {
            a href={"mailto:" (self.0)} class="text-blue-400 hover:underline" {(self.0)}
        }
    }
}
