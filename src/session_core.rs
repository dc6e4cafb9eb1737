use std::cell::RefCell;
use std::rc::Rc;

use songvote_core::{
    ApiError, ApiResponse, Command, Controller, DispatchError, Intent, Request, RoundKind,
    RoundPolicy, RowView,
};
use wasm_bindgen_futures::spawn_local;

use crate::http;

pub(crate) type SessionSubscriber = Rc<dyn Fn()>;

/// Browser-side owner of the round controller. Commands run concurrently;
/// each completion is fed back and subscribers are told to re-render.
pub(crate) struct SessionCore {
    controller: RefCell<Controller>,
    api_base: String,
    notice: RefCell<Option<Notice>>,
    subscribers: Rc<RefCell<Vec<SessionSubscriber>>>,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Notice {
    Blocked(String),
    Failed(String),
    Unauthorized,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct SessionSnapshot {
    pub(crate) kind: RoundKind,
    pub(crate) policy: RoundPolicy,
    pub(crate) loaded: bool,
    pub(crate) is_admin: bool,
    pub(crate) in_flight: usize,
    pub(crate) rows: Vec<RowView>,
    pub(crate) notice: Option<Notice>,
}

impl SessionCore {
    pub(crate) fn new(controller: Controller, api_base: String) -> Rc<Self> {
        Rc::new(Self {
            controller: RefCell::new(controller),
            api_base,
            notice: RefCell::new(None),
            subscribers: Rc::new(RefCell::new(Vec::new())),
        })
    }

    pub(crate) fn subscribe(&self, subscriber: SessionSubscriber) -> SessionSubscription {
        self.subscribers.borrow_mut().push(subscriber.clone());
        SessionSubscription {
            subscriber,
            subscribers: Rc::clone(&self.subscribers),
        }
    }

    pub(crate) fn snapshot(&self) -> SessionSnapshot {
        let controller = self.controller.borrow();
        SessionSnapshot {
            kind: controller.kind(),
            policy: controller.policy(),
            loaded: controller.is_loaded(),
            is_admin: controller.is_admin(),
            in_flight: controller.in_flight(),
            rows: controller.rows(),
            notice: self.notice.borrow().clone(),
        }
    }

    pub(crate) fn dispatch(self: &Rc<Self>, intent: Intent) {
        let result = self.controller.borrow_mut().handle(intent);
        match result {
            Ok(commands) => {
                self.notice.replace(None);
                self.execute(commands);
            }
            Err(err) => {
                let notice = match err {
                    DispatchError::SelectionBlocked { .. } => Notice::Blocked(err.to_string()),
                    other => Notice::Failed(other.to_string()),
                };
                gloo::console::log!("intent rejected", notice_text(&notice));
                self.notice.replace(Some(notice));
            }
        }
        self.notify_subscribers();
    }

    fn execute(self: &Rc<Self>, commands: Vec<Command>) {
        for command in commands {
            let core = Rc::clone(self);
            spawn_local(async move {
                let outcome = http::send(&core.api_base, &command.request.to_api()).await;
                if let Err(err) = &outcome {
                    gloo::console::warn!("request failed", command.id.to_string(), err.to_string());
                }
                let current = core.notice.take();
                core.notice
                    .replace(settle_notice(current, &command.request, &outcome));
                let follow_up = core.controller.borrow_mut().complete(command.id, outcome);
                core.notify_subscribers();
                core.execute(follow_up);
            });
        }
    }

    fn notify_subscribers(&self) {
        let subscribers = self.subscribers.borrow().clone();
        for subscriber in subscribers {
            (subscriber)();
        }
    }
}

/// Notice left on screen once `request` settles. A fresh roster supersedes
/// whatever failed before it.
fn settle_notice(
    current: Option<Notice>,
    request: &Request,
    outcome: &Result<ApiResponse, ApiError>,
) -> Option<Notice> {
    match (request, outcome) {
        (_, Err(ApiError::Status(401 | 422))) => Some(Notice::Unauthorized),
        (_, Err(err)) => Some(Notice::Failed(err.to_string())),
        (Request::FetchRoster(_), Ok(ApiResponse::Roster(_))) => None,
        _ => current,
    }
}

pub(crate) fn notice_text(notice: &Notice) -> String {
    match notice {
        Notice::Blocked(message) | Notice::Failed(message) => message.clone(),
        Notice::Unauthorized => "Session expired or missing. Paste a token to continue.".to_string(),
    }
}

pub(crate) struct SessionSubscription {
    subscriber: SessionSubscriber,
    subscribers: Rc<RefCell<Vec<SessionSubscriber>>>,
}

impl Drop for SessionSubscription {
    fn drop(&mut self) {
        let mut subscribers = self.subscribers.borrow_mut();
        subscribers.retain(|item| !Rc::ptr_eq(item, &self.subscriber));
    }
}
