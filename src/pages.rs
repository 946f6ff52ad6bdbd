use crate::models::TrackerState;
use crate::ui;
use chrono::NaiveDate;

pub type Renderer = fn(&TrackerState, NaiveDate) -> String;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    Stats,
    Focus,
}

pub const ALL: &[Page] = &[Page::Dashboard, Page::Stats, Page::Focus];

impl Page {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "dashboard" => Some(Self::Dashboard),
            "stats" => Some(Self::Stats),
            "focus" => Some(Self::Focus),
            _ => None,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Stats => "stats",
            Self::Focus => "focus",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Stats => "Stats",
            Self::Focus => "Focus",
        }
    }

    pub fn renderer(self) -> Renderer {
        match self {
            Self::Dashboard => ui::render_dashboard,
            Self::Stats => ui::render_stats,
            Self::Focus => ui::render_focus,
        }
    }
}

pub fn render(page: Page, state: &TrackerState, today: NaiveDate) -> String {
    let section = (page.renderer())(state, today);
    ui::render_shell(page, &section, state, today)
}
