use std::cell::RefCell;

use gloo::storage::{LocalStorage, Storage};

pub(crate) const TOKEN_KEY: &str = "jwt";

thread_local! {
    static TOKEN_CACHE: RefCell<Option<Option<String>>> = RefCell::new(None);
}

/// The stored bearer token. The login page writes it as a raw string, so
/// this bypasses the JSON layer of `gloo::storage`.
pub(crate) fn token() -> Option<String> {
    if let Some(cached) = TOKEN_CACHE.with(|slot| slot.borrow().clone()) {
        return cached;
    }
    let token = LocalStorage::raw()
        .get_item(TOKEN_KEY)
        .ok()
        .flatten()
        .filter(|token| !token.trim().is_empty());
    TOKEN_CACHE.with(|slot| {
        *slot.borrow_mut() = Some(token.clone());
    });
    token
}

pub(crate) fn save(token: &str) {
    let token = token.trim();
    if LocalStorage::raw().set_item(TOKEN_KEY, token).is_err() {
        gloo::console::warn!("token could not be stored");
    }
    TOKEN_CACHE.with(|slot| {
        *slot.borrow_mut() = Some(Some(token.to_string()).filter(|token| !token.is_empty()));
    });
}

pub(crate) fn clear() {
    if LocalStorage::raw().remove_item(TOKEN_KEY).is_err() {
        gloo::console::warn!("token could not be removed");
    }
    TOKEN_CACHE.with(|slot| {
        *slot.borrow_mut() = Some(None);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn token_round_trips_through_local_storage() {
        clear();
        assert_eq!(token(), None);
        save(" abc.def ");
        assert_eq!(token().as_deref(), Some("abc.def"));
        assert_eq!(
            LocalStorage::raw().get_item(TOKEN_KEY).ok().flatten().as_deref(),
            Some("abc.def")
        );
        clear();
        assert_eq!(token(), None);
    }
}
