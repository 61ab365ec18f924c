//! Browser bindings for the platform traits of `turmaflow-core`.

use std::rc::Rc;
use std::time::Duration;

use leptos::prelude::*;
use tracing::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};

use turmaflow_core::scheduler::Tick;
use turmaflow_core::{
    default_config, ClientConfig, ClientError, HttpGateway, Interaction, KeyValueStore, Level,
    Session, SessionAccessor, Shell, TimerBackend,
};

use crate::components::toast::Toasts;

/// `window.localStorage`. Reads degrade to `None` when storage is unavailable.
#[derive(Clone, Copy, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn storage(&self) -> Result<web_sys::Storage, ClientError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or_else(|| ClientError::Storage("localStorage unavailable".to_string()))
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage().ok()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| ClientError::Storage(format!("set {}: {:?}", key, e)))
    }

    fn remove(&self, key: &str) -> Result<(), ClientError> {
        self.storage()?
            .remove_item(key)
            .map_err(|e| ClientError::Storage(format!("remove {}: {:?}", key, e)))
    }
}

pub fn sessions() -> SessionAccessor {
    SessionAccessor::new(Rc::new(BrowserStorage))
}

pub fn config() -> ClientConfig {
    default_config()
}

pub fn gateway(session: Session, config: &ClientConfig) -> HttpGateway {
    let origin = web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_default();
    HttpGateway::new(&config.resolved_api_base(&origin), session, config)
}

/// A live `setInterval`. The closure must outlive the interval, so it is
/// owned here and dropped only after the interval is cleared.
pub struct IntervalHandle {
    id: Option<i32>,
    _callback: Closure<dyn FnMut()>,
}

#[derive(Clone, Copy, Default)]
pub struct BrowserTimers;

impl TimerBackend for BrowserTimers {
    type Handle = IntervalHandle;

    fn start_interval(&self, period: Duration, mut tick: Tick) -> IntervalHandle {
        let callback = Closure::wrap(Box::new(move || {
            spawn_local(tick());
        }) as Box<dyn FnMut()>);

        let millis = i32::try_from(period.as_millis()).unwrap_or(i32::MAX);
        let id = web_sys::window().and_then(|w| {
            w.set_interval_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                millis,
            )
            .map_err(|e| warn!("setInterval failed: {:?}", e))
            .ok()
        });

        IntervalHandle {
            id,
            _callback: callback,
        }
    }

    fn cancel(&self, handle: IntervalHandle) {
        if let (Some(window), Some(id)) = (web_sys::window(), handle.id) {
            window.clear_interval_with_handle(id);
        }
    }
}

/// Toasts, dialogs and navigation for one page.
pub struct BrowserUi {
    toasts: Toasts,
    navigate: Rc<dyn Fn(&str)>,
}

impl BrowserUi {
    pub fn new(toasts: Toasts, navigate: impl Fn(&str) + 'static) -> Self {
        Self {
            toasts,
            navigate: Rc::new(navigate),
        }
    }
}

impl Interaction for BrowserUi {
    fn notify(&self, level: Level, message: &str) {
        self.toasts.push(level, message);
    }

    fn confirm(&self, question: &str) -> bool {
        web_sys::window()
            .and_then(|w| w.confirm_with_message(question).ok())
            .unwrap_or(false)
    }

    fn prompt(&self, question: &str) -> Option<String> {
        web_sys::window().and_then(|w| w.prompt_with_message(question).ok().flatten())
    }
}

impl Shell for BrowserUi {
    fn navigate(&self, path: &str) {
        (self.navigate)(path);
    }

    fn redirect_after(&self, path: &str, delay: Duration) {
        let navigate = self.navigate.clone();
        let path = path.to_string();
        set_timeout(move || navigate(&path), delay);
    }

    fn open_external(&self, url: &str) {
        let opened = web_sys::window().map(|w| w.open_with_url_and_target(url, "_blank"));
        if let Some(Err(e)) = opened {
            warn!("Failed to open {}: {:?}", url, e);
        }
    }

    fn copy_text(&self, text: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let promise = window.navigator().clipboard().write_text(text);
        spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                warn!("Clipboard write failed: {:?}", e);
            }
        });
    }

    fn download_text(&self, filename: &str, mime: &str, contents: &str) {
        if let Err(e) = download(filename, mime, contents) {
            warn!("Download of {} failed: {:?}", filename, e);
        }
    }
}

fn download(filename: &str, mime: &str, contents: &str) -> Result<(), wasm_bindgen::JsValue> {
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;

    let parts = js_sys::Array::of1(&wasm_bindgen::JsValue::from_str(contents));
    let options = web_sys::BlobPropertyBag::new();
    options.set_type(mime);
    let blob = web_sys::Blob::new_with_str_sequence_and_options(&parts, &options)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)?;

    let link: web_sys::HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    link.set_href(&url);
    link.set_download(filename);
    link.click();
    web_sys::Url::revoke_object_url(&url)
}
