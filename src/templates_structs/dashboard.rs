use askama::Template;

use super::PageContext;

pub struct DashboardCard {
    pub label: &'static str,
    pub url: &'static str,
    /// `None` when the count could not be fetched.
    pub total: Option<u64>,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub ctx: PageContext,
    pub greeting: String,
    pub cards: Vec<DashboardCard>,
}
