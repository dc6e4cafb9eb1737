use songvote_core::{ResultsKind, RoundKind};

pub(crate) const MOUNT_ID: &str = "app";
const ROUND_ATTRIBUTE: &str = "data-semi";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Page {
    Dashboard,
    Round(RoundKind),
    Results(ResultsKind),
}

/// Entries of the dashboard menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MenuTarget {
    Semi1,
    Semi2,
    Final,
    Results,
    ResultsFinal,
}

impl MenuTarget {
    pub(crate) const ALL: [MenuTarget; 5] = [
        MenuTarget::Semi1,
        MenuTarget::Semi2,
        MenuTarget::Final,
        MenuTarget::Results,
        MenuTarget::ResultsFinal,
    ];

    pub(crate) fn data_target(self) -> &'static str {
        match self {
            MenuTarget::Semi1 => "semi1",
            MenuTarget::Semi2 => "semi2",
            MenuTarget::Final => "final",
            MenuTarget::Results => "results",
            MenuTarget::ResultsFinal => "results-final",
        }
    }

    pub(crate) fn href(self) -> &'static str {
        match self {
            MenuTarget::Semi1 => "/semi-final/1",
            MenuTarget::Semi2 => "/semi-final/2",
            MenuTarget::Final => "/final-page",
            MenuTarget::Results => "/results-page",
            MenuTarget::ResultsFinal => "/grand-results-page",
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            MenuTarget::Semi1 => "Semi-final 1",
            MenuTarget::Semi2 => "Semi-final 2",
            MenuTarget::Final => "Grand final",
            MenuTarget::Results => "Results",
            MenuTarget::ResultsFinal => "Grand final results",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct InitConfig {
    pub(crate) page: Option<Page>,
    pub(crate) api_base: String,
}

pub(crate) fn load_init_config() -> InitConfig {
    let path = web_sys::window()
        .and_then(|window| window.location().pathname().ok())
        .unwrap_or_default();
    InitConfig {
        page: parse_page(&path, mount_round_attribute().as_deref()),
        api_base: default_api_base(),
    }
}

/// Resolves the page from the location path, then from the mount node's
/// round attribute (`0` is the grand final).
pub(crate) fn parse_page(path: &str, round_attribute: Option<&str>) -> Option<Page> {
    let path = path.trim().trim_end_matches('/');
    let page = match path {
        "/dashboard" => Some(Page::Dashboard),
        "/final-page" => Some(Page::Round(RoundKind::GrandFinal)),
        "/results-page" => Some(Page::Results(ResultsKind::SemiFinals)),
        "/grand-results-page" | "/results-final-page" => {
            Some(Page::Results(ResultsKind::GrandFinal))
        }
        _ => path
            .strip_prefix("/semi-final/")
            .and_then(|index| index.parse::<u8>().ok())
            .filter(|index| *index > 0)
            .map(|index| Page::Round(RoundKind::SemiFinal(index))),
    };
    page.or_else(|| {
        round_attribute
            .and_then(|raw| raw.trim().parse::<u8>().ok())
            .map(|index| Page::Round(RoundKind::from_index(index)))
    })
}

pub(crate) fn default_api_base() -> String {
    if let Some(raw) = option_env!("SONGVOTE_API_BASE").or(option_env!("TRUNK_PUBLIC_API_BASE")) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return trimmed.trim_end_matches('/').to_string();
        }
    }
    web_sys::window()
        .and_then(|window| window.location().origin().ok())
        .unwrap_or_default()
}

pub(crate) fn navigate(href: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    if window.location().set_href(href).is_err() {
        gloo::console::warn!("navigation failed", href.to_string());
    }
}

pub(crate) fn go_back() {
    let Some(window) = web_sys::window() else {
        return;
    };
    if window.history().and_then(|history| history.back()).is_err() {
        gloo::console::warn!("history back failed");
    }
}

fn mount_round_attribute() -> Option<String> {
    let document = web_sys::window()?.document()?;
    document
        .get_element_by_id(MOUNT_ID)?
        .get_attribute(ROUND_ATTRIBUTE)
}
