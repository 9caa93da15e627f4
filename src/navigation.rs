//! The navigation bar shared by the manage, read-only and chart pages.

use maud::{Markup, html};

use crate::endpoints;

/// The pages in the order they appear in the navigation bar.
const PAGES: [(&str, &str); 3] = [
    (endpoints::MANAGE_VIEW, "Manage"),
    (endpoints::READ_ONLY_VIEW, "View"),
    (endpoints::CHART_VIEW, "Chart"),
];

const TOP_LINK_STYLE: &str = "px-3 py-2 rounded hover:text-emerald-700 dark:hover:text-emerald-400";
const TOP_CURRENT_STYLE: &str = "px-3 py-2 rounded font-semibold text-emerald-700 dark:text-emerald-400";
const BOTTOM_LINK_STYLE: &str = "flex justify-center rounded-lg px-3 py-2 text-sm \
    text-gray-600 hover:bg-emerald-50 dark:text-gray-300 dark:hover:bg-emerald-900/20";
const BOTTOM_CURRENT_STYLE: &str = "flex justify-center rounded-lg px-3 py-2 text-sm \
    font-semibold bg-emerald-50 text-emerald-700 dark:bg-emerald-900/30 dark:text-emerald-200";

/// A link in the navigation bar.
#[derive(Clone, Copy)]
struct Link<'a> {
    url: &'a str,
    title: &'a str,
    is_current: bool,
}

impl Link<'_> {
    fn render(self, style: &str, current_style: &str) -> Markup {
        let class = if self.is_current { current_style } else { style };

        html!(
            a href=(self.url) class=(class) aria-current=[self.is_current.then_some("page")]
            {
                (self.title)
            }
        )
    }
}

/// The links to each page, with the page being shown highlighted.
pub struct NavBar<'a> {
    links: Vec<Link<'a>>,
}

impl NavBar<'_> {
    /// Get the navigation bar.
    ///
    /// If a link matches `active_endpoint`, then that link will be
    /// marked as active and displayed differently in the HTML.
    pub fn new(active_endpoint: &str) -> NavBar<'_> {
        let links = PAGES
            .into_iter()
            .map(|(url, title)| Link {
                url,
                title,
                is_current: active_endpoint == url,
            })
            .collect();

        NavBar { links }
    }

    /// Render a top bar for wide screens and a bottom bar for narrow ones.
    pub fn into_html(self) -> Markup {
        html!(
            nav class="bg-white border-b border-gray-200 dark:bg-gray-900 dark:border-gray-700"
            {
                div class="max-w-screen-xl mx-auto flex items-center justify-between p-4"
                {
                    a
                        href=(endpoints::ROOT)
                        class="text-2xl font-semibold whitespace-nowrap dark:text-white"
                    {
                        "Budget Board"
                    }

                    ul class="hidden lg:flex gap-4 font-medium text-gray-900 dark:text-white"
                    {
                        @for link in &self.links {
                            li { (link.render(TOP_LINK_STYLE, TOP_CURRENT_STYLE)) }
                        }
                    }
                }
            }

            nav class="fixed inset-x-0 bottom-0 z-40 p-4 lg:hidden"
            {
                ul
                    class="grid grid-cols-3 gap-2 p-3 rounded-xl border border-gray-200
                        bg-white/95 shadow-lg dark:border-gray-700 dark:bg-gray-900/95"
                    aria-label="Primary"
                {
                    @for link in &self.links {
                        li { (link.render(BOTTOM_LINK_STYLE, BOTTOM_CURRENT_STYLE)) }
                    }
                }
            }
        )
    }
}
