use crate::shell::state::View;
use maud::{Markup, Render, html};

pub fn render_table<const N: usize>(
    titles: [&'static str; N],
    items: Vec<[Markup; N]>,
    empty_message: &'static str,
) -> Markup {
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
                    @if items.is_empty() {
                        tr {
                            td colspan=(N) class="py-8 px-4 text-center text-gray-400 italic" {(empty_message)}
                        }
                    }
                    @for row in items {
                        tr {
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

pub fn title(s: impl Render) -> Markup {
    html! {
        h1 class="text-2xl font-semibold mb-4" {(s)}
    }
}

pub fn subtitle(s: impl Render) -> Markup {
    html! {
        p class="text-gray-400 mb-8" {(s)}
    }
}

pub fn stat_card(label: &str, value: impl Render, caption: &str) -> Markup {
    html! {
        div class="bg-gray-800 p-6 rounded shadow-md" {
            p class="text-sm font-medium text-gray-400" {(label)}
            div class="text-3xl font-bold mt-2" {(value)}
            p class="text-xs text-gray-400 mt-1" {(caption)}
        }
    }
}

pub fn render_sidebar(active: View) -> Markup {
    html! {
        aside class="w-64 border-r border-gray-700 bg-gray-800 min-h-screen p-4" {
            div class="mb-8 px-2" {
                h1 class="font-semibold" {"Academica"}
                p class="text-xs text-gray-400" {"Sistema de Gestión"}
            }
            nav class="flex flex-col space-y-1" {
                @for view in View::ALL {
                    @if view == active {
                        a href=(view.href()) class="px-3 py-2 rounded bg-blue-600 font-medium" {(view.label())}
                    } @else {
                        a href=(view.href()) class="px-3 py-2 rounded text-gray-400 hover:bg-gray-700 hover:text-white font-medium" {(view.label())}
                    }
                }
            }
        }
    }
}

/// The list view's search box. It swaps the table in place via htmx and falls back to a
/// plain GET form.
pub fn search_box(action: &'static str, placeholder: &str, current: &str) -> Markup {
    html! {
        form method="get" action=(action) class="mb-4" {
            input type="search" name="q" value=(current) placeholder=(placeholder)
                hx-get=(action) hx-trigger="input changed delay:300ms, search" hx-target="#roster" hx-select="#roster" hx-swap="outerHTML"
                class="shadow appearance-none border rounded w-64 py-2 px-3 leading-tight focus:outline-none focus:shadow-outline bg-gray-700 border-gray-600" {}
        }
    }
}

pub fn mailto(email: &str) -> Markup {
    html! {
        a href={"mailto:" (email)} class="text-blue-200 underline" {(email)}
    }
}
