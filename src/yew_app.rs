use std::rc::Rc;

use songvote_core::{
    score_label, CandidateId, Controller, Direction, Intent, Request, ResultRow, ResultsKind,
    RoundKind, RowView, Score, UNSET_SCORE_LABEL,
};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{EventTarget, HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::app_router::{self, InitConfig, MenuTarget, Page};
use crate::http;
use crate::session_core::{notice_text, Notice, SessionCore};
use crate::token_store;

#[derive(Properties, PartialEq)]
pub(crate) struct AppProps {
    pub(crate) config: InitConfig,
}

#[function_component(App)]
pub(crate) fn app(props: &AppProps) -> Html {
    let content = match props.config.page {
        Some(Page::Dashboard) => html! { <Dashboard /> },
        Some(Page::Round(kind)) => {
            html! { <RoundPage kind={kind} api_base={props.config.api_base.clone()} /> }
        }
        Some(Page::Results(kind)) => {
            html! { <ResultsPage kind={kind} api_base={props.config.api_base.clone()} /> }
        }
        None => html! { <p class="empty">{"Nothing to vote on here."}</p> },
    };
    html! {
        <main class="songvote">
            <nav class="toolbar">
                <BackLink />
                <LogoutLink />
            </nav>
            {content}
        </main>
    }
}

#[function_component(LogoutLink)]
fn logout_link() -> Html {
    let onclick = Callback::from(|event: MouseEvent| {
        event.prevent_default();
        token_store::clear();
        app_router::navigate("/");
    });
    html! { <a id="logout-link" href="/" {onclick}>{"Log out"}</a> }
}

#[function_component(BackLink)]
fn back_link() -> Html {
    let onclick = Callback::from(|event: MouseEvent| {
        event.prevent_default();
        app_router::go_back();
    });
    html! { <a id="back-button" href="#" {onclick}>{"Back"}</a> }
}

#[function_component(Dashboard)]
fn dashboard() -> Html {
    let buttons: Html = MenuTarget::ALL
        .iter()
        .map(|&target| {
            let onclick = Callback::from(move |_: MouseEvent| app_router::navigate(target.href()));
            html! {
                <button data-target={target.data_target()} {onclick}>{target.label()}</button>
            }
        })
        .collect();
    html! {
        <section class="dashboard">
            <h1>{"Song contest"}</h1>
            <div id="main-menu">{buttons}</div>
        </section>
    }
}

#[derive(Properties, PartialEq)]
struct TokenPromptProps {
    on_saved: Callback<()>,
}

#[function_component(TokenPrompt)]
fn token_prompt(props: &TokenPromptProps) -> Html {
    let input = use_node_ref();
    let onsubmit = {
        let input = input.clone();
        let on_saved = props.on_saved.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let Some(field) = input.cast::<HtmlInputElement>() else {
                return;
            };
            let value = field.value();
            if value.trim().is_empty() {
                return;
            }
            token_store::save(&value);
            on_saved.emit(());
        })
    };
    html! {
        <form class="token-prompt" {onsubmit}>
            <input ref={input} type="password" placeholder="Access token" />
            <button type="submit">{"Use token"}</button>
        </form>
    }
}

#[derive(Properties, PartialEq)]
struct RoundPageProps {
    kind: RoundKind,
    api_base: String,
}

fn round_title(kind: RoundKind) -> String {
    match kind {
        RoundKind::SemiFinal(index) => format!("Semi-final {index}"),
        RoundKind::GrandFinal => "Grand final".to_string(),
    }
}

#[function_component(RoundPage)]
fn round_page(props: &RoundPageProps) -> Html {
    let core = {
        let kind = props.kind;
        let api_base = props.api_base.clone();
        use_memo((), move |_| SessionCore::new(Controller::new(kind), api_base))
    };
    let core: Rc<SessionCore> = Rc::clone(&*core);
    let snapshot = use_state(|| core.snapshot());

    {
        let core = core.clone();
        let snapshot = snapshot.clone();
        use_effect_with((), move |_| {
            let core_for_cb = core.clone();
            let subscription = core.subscribe(Rc::new(move || {
                snapshot.set(core_for_cb.snapshot());
            }));
            core.dispatch(Intent::Load);
            move || drop(subscription)
        });
    }

    let reload = {
        let core = core.clone();
        Callback::from(move |()| core.dispatch(Intent::Load))
    };
    let notice = match &snapshot.notice {
        Some(Notice::Unauthorized) => html! {
            <div class="notice notice-auth">
                <p>{notice_text(&Notice::Unauthorized)}</p>
                <TokenPrompt on_saved={reload} />
            </div>
        },
        Some(notice) => html! { <p class="notice">{notice_text(notice)}</p> },
        None => html! {},
    };
    let busy = if snapshot.in_flight > 0 {
        html! { <span class="busy">{"saving…"}</span> }
    } else {
        html! {}
    };

    let table = if snapshot.loaded {
        let rows: Html = snapshot
            .rows
            .iter()
            .map(|row| {
                html! {
                    <CandidateRow
                        key={row.id.to_string()}
                        core={core.clone()}
                        row={row.clone()}
                        is_admin={snapshot.is_admin}
                    />
                }
            })
            .collect();
        let admin_head = if snapshot.is_admin {
            html! { <><th>{"Official"}</th><th>{"Order"}</th></> }
        } else {
            html! {}
        };
        html! {
            <table id="artists-table" data-semi={snapshot.kind.index().to_string()}>
                <thead>
                    <tr>
                        <th>{"#"}</th>
                        <th>{"Artist"}</th>
                        <th>{"Score"}</th>
                        <th>{if snapshot.policy.is_grand_final { "Winner" } else { "Final" }}</th>
                        {admin_head}
                    </tr>
                </thead>
                <tbody>{rows}</tbody>
            </table>
        }
    } else {
        html! {}
    };

    html! {
        <section class="round">
            <h1>{round_title(snapshot.kind)} {busy}</h1>
            {notice}
            {table}
        </section>
    }
}

#[derive(Properties)]
struct CandidateRowProps {
    core: Rc<SessionCore>,
    row: RowView,
    is_admin: bool,
}

impl PartialEq for CandidateRowProps {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.core, &other.core)
            && self.row == other.row
            && self.is_admin == other.is_admin
    }
}

/// Value of the `<select>` an event came from, if it came from one.
fn select_value(target: Option<EventTarget>) -> Option<String> {
    target?
        .dyn_into::<HtmlSelectElement>()
        .ok()
        .map(|select| select.value())
}

/// Parses the score selector value; the empty option clears the score.
fn parse_score_option(value: &str) -> Result<Option<Score>, songvote_core::ScoreError> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    value.parse::<Score>().map(Some)
}

#[function_component(CandidateRow)]
fn candidate_row(props: &CandidateRowProps) -> Html {
    let row = &props.row;
    let id: CandidateId = row.id;

    let on_score = {
        let core = props.core.clone();
        Callback::from(move |event: Event| {
            let Some(value) = select_value(event.target()) else {
                return;
            };
            match parse_score_option(&value) {
                Ok(score) => core.dispatch(Intent::SetScore { id, score }),
                Err(err) => gloo::console::warn!("bad score option", err.to_string()),
            }
        })
    };
    let on_advance = {
        let core = props.core.clone();
        Callback::from(move |_: MouseEvent| core.dispatch(Intent::ToggleAdvance { id }))
    };

    let current = row.score;
    let score_options: Html = std::iter::once(html! {
        <option value="" selected={current.is_none()}>{UNSET_SCORE_LABEL}</option>
    })
    .chain(Score::all().map(|score| {
        html! {
            <option value={score.to_string()} selected={current == Some(score)}>
                {score_label(Some(score))}
            </option>
        }
    }))
    .collect();

    let advance_class = classes!("advance", row.advance.active.then_some("active"));
    let admin_cells = if props.is_admin {
        let official = row.official.map(|official| {
            let core = props.core.clone();
            let onclick =
                Callback::from(move |_: MouseEvent| core.dispatch(Intent::ToggleOfficial { id }));
            let class = classes!("official", official.active.then_some("active"));
            html! { <button {class} {onclick}>{official.label}</button> }
        });
        let order = if row.reorderable {
            let up = {
                let core = props.core.clone();
                Callback::from(move |_: MouseEvent| {
                    core.dispatch(Intent::Move {
                        id,
                        direction: Direction::Up,
                    })
                })
            };
            let down = {
                let core = props.core.clone();
                Callback::from(move |_: MouseEvent| {
                    core.dispatch(Intent::Move {
                        id,
                        direction: Direction::Down,
                    })
                })
            };
            html! {
                <>
                    <button class="move" data-dir="up" onclick={up}>{"↑"}</button>
                    <button class="move" data-dir="down" onclick={down}>{"↓"}</button>
                </>
            }
        } else {
            html! {}
        };
        html! { <><td>{official}</td><td>{order}</td></> }
    } else {
        html! {}
    };

    html! {
        <tr data-id={id.to_string()}>
            <td>{row.ordinal}</td>
            <td>{row.name.clone()}</td>
            <td>
                <select class="score" onchange={on_score}>{score_options}</select>
            </td>
            <td>
                <button
                    class={advance_class}
                    disabled={row.advance.disabled}
                    onclick={on_advance}
                >
                    {row.advance.label}
                </button>
            </td>
            {admin_cells}
        </tr>
    }
}

#[derive(Properties, PartialEq)]
struct ResultsPageProps {
    kind: ResultsKind,
    api_base: String,
}

#[derive(Clone, PartialEq)]
enum ResultsState {
    Loading,
    Ready(Vec<ResultRow>),
    Failed(String),
    Unauthorized,
}

#[function_component(ResultsPage)]
fn results_page(props: &ResultsPageProps) -> Html {
    let state = use_state(|| ResultsState::Loading);
    let attempt = use_state(|| 0u32);

    {
        let state = state.clone();
        let kind = props.kind;
        let api_base = props.api_base.clone();
        use_effect_with(*attempt, move |_| {
            state.set(ResultsState::Loading);
            spawn_local(async move {
                let request = Request::FetchResults(kind).to_api();
                let next = match http::send(&api_base, &request).await {
                    Ok(songvote_core::ApiResponse::Results(rows)) => ResultsState::Ready(rows),
                    Ok(other) => ResultsState::Failed(format!("unexpected response {other:?}")),
                    Err(songvote_core::ApiError::Status(401 | 422)) => ResultsState::Unauthorized,
                    Err(err) => {
                        gloo::console::warn!("results load failed", err.to_string());
                        ResultsState::Failed(err.to_string())
                    }
                };
                state.set(next);
            });
            || ()
        });
    }

    let retry = {
        let attempt = attempt.clone();
        Callback::from(move |()| attempt.set(*attempt + 1))
    };
    let title = match props.kind {
        ResultsKind::SemiFinals => "Results",
        ResultsKind::GrandFinal => "Grand final results",
    };
    let body_id = match props.kind {
        ResultsKind::SemiFinals => "results-body",
        ResultsKind::GrandFinal => "results-final-body",
    };
    let content = match &*state {
        ResultsState::Loading => html! { <p class="busy">{"Loading…"}</p> },
        ResultsState::Unauthorized => html! {
            <div class="notice notice-auth">
                <p>{notice_text(&Notice::Unauthorized)}</p>
                <TokenPrompt on_saved={retry} />
            </div>
        },
        ResultsState::Failed(message) => html! { <p class="notice">{message.clone()}</p> },
        ResultsState::Ready(rows) => {
            let lines: Html = rows
                .iter()
                .map(|row| {
                    html! {
                        <tr>
                            <td>{row.name.clone()}</td>
                            <td>{row.average_label()}</td>
                            <td>{row.final_votes}</td>
                            <td>{row.voters_label()}</td>
                        </tr>
                    }
                })
                .collect();
            html! {
                <table class="results">
                    <thead>
                        <tr>
                            <th>{"Artist"}</th>
                            <th>{"Average"}</th>
                            <th>{"Final votes"}</th>
                            <th>{"Voters"}</th>
                        </tr>
                    </thead>
                    <tbody id={body_id}>{lines}</tbody>
                </table>
            }
        }
    };
    html! {
        <section class="results-page">
            <h1>{title}</h1>
            {content}
        </section>
    }
}

pub(crate) fn run(config: InitConfig) {
    let root = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id(app_router::MOUNT_ID));
    match root {
        Some(root) => {
            yew::Renderer::<App>::with_root_and_props(root, AppProps { config }).render();
        }
        None => {
            yew::Renderer::<App>::with_props(AppProps { config }).render();
        }
    }
}
